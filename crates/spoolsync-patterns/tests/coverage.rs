//! Pattern coverage across every language and AMS hardware variant

use spoolsync_core::AmsNumber;
use spoolsync_patterns::{
    match_ams_humidity, match_external_spool, match_tray, AmsRule, Concept, EntityPatterns,
    LANGUAGES,
};

/// (AMS segment as it appears in entity ids, expected AMS number)
fn hardware_variants() -> Vec<(&'static str, AmsNumber)> {
    vec![
        ("ams_1", AmsNumber::Index(1)),
        ("ams_2", AmsNumber::Index(2)),
        ("ams_1_pro", AmsNumber::Index(1)),
        ("ams_lite", AmsNumber::Lite),
        ("ams", AmsNumber::Index(1)),
        ("ams_128", AmsNumber::Index(128)),
        ("ams_ht", AmsNumber::Ht),
    ]
}

#[test]
fn test_humidity_every_language_and_variant() {
    for pack in LANGUAGES {
        for (segment, expected) in hardware_variants() {
            let id = format!("sensor.x1c_test_{}_{}", segment, pack.ams_humidity);
            assert_eq!(match_ams_humidity(&id), Some(expected), "{} ({})", id, pack.code);

            let dup = format!("{}_2", id);
            assert_eq!(match_ams_humidity(&dup), Some(expected), "{} ({})", dup, pack.code);
        }
    }
}

#[test]
fn test_tray_every_language_and_variant() {
    for pack in LANGUAGES {
        for (segment, expected) in hardware_variants() {
            for tray in 1..=4u8 {
                let id = format!("sensor.x1c_test_{}_{}_{}", segment, pack.tray, tray);
                assert_eq!(match_tray(&id), Some((expected, tray)), "{} ({})", id, pack.code);
            }
        }
    }
}

#[test]
fn test_external_spool_every_language() {
    for pack in LANGUAGES {
        let plain = format!("sensor.x1c_test_{}", pack.external_spool);
        let device = format!("sensor.x1c_test_externalspool_{}", pack.external_spool);
        let dup = format!("sensor.x1c_test_externalspool_{}_2", pack.external_spool);
        assert!(match_external_spool(&plain), "{}", plain);
        assert!(match_external_spool(&device), "{}", device);
        assert!(match_external_spool(&dup), "{}", dup);
    }
}

#[test]
fn test_structural_sensors_every_language() {
    let patterns = EntityPatterns::for_prefix("x1c_test").unwrap();
    for pack in LANGUAGES {
        for (concept, fragment) in [
            (Concept::CurrentStage, pack.current_stage),
            (Concept::PrintWeight, pack.print_weight),
            (Concept::PrintProgress, pack.print_progress),
        ] {
            let id = format!("sensor.x1c_test_{}", fragment);
            assert!(patterns.sensor(concept, &id).is_some(), "{}", id);
        }
    }
}

#[test]
fn test_tray_without_number_never_matches() {
    for pack in LANGUAGES {
        let id = format!("sensor.x1c_test_ams_1_{}", pack.tray);
        assert_eq!(match_tray(&id), None, "{}", id);
    }
}

#[test]
fn test_near_misses() {
    // wrong sensor kind
    assert_eq!(match_ams_humidity("sensor.x1c_ams_1_temperature"), None);
    assert_eq!(match_tray("sensor.x1c_ams_1_humidity"), None);
    assert!(!match_external_spool("sensor.x1c_ams_1_tray_1"));
    // tray number out of range
    assert_eq!(match_tray("sensor.x1c_ams_1_tray_5"), None);
    assert_eq!(match_tray("sensor.x1c_ams_1_tray_12"), None);
    // wrong domain
    assert_eq!(match_tray("select.x1c_ams_1_tray_1"), None);
    assert_eq!(match_ams_humidity("binary_sensor.x1c_ams_1_humidity"), None);
}

#[test]
fn test_ht_token_resolves_before_other_rules() {
    let patterns = EntityPatterns::any().unwrap();
    let m = patterns.ams_humidity("sensor.h2d_ams_ht_humidity").unwrap();
    assert_eq!(m.rule, AmsRule::HtToken);
    assert_eq!(m.number, AmsNumber::Ht);

    let m = patterns.tray("sensor.h2d_ams_128_tray_1").unwrap();
    assert_eq!(m.rule, AmsRule::Indexed);
    assert_eq!(m.ams, AmsNumber::Index(128));
}

#[test]
fn test_disambiguation_suffix_captured() {
    let patterns = EntityPatterns::for_prefix("x1c").unwrap();
    let m = patterns.tray("sensor.x1c_ams_1_tray_2_3").unwrap();
    assert_eq!((m.ams, m.tray, m.suffix), (AmsNumber::Index(1), 2, 3));
    let m = patterns.ams_humidity("sensor.x1c_ams_2_humidity").unwrap();
    assert_eq!(m.suffix, 0);
}

#[test]
fn test_prefix_agnostic_matches_renamed_entities() {
    assert_eq!(match_tray("sensor.ams_1_tray_3"), Some((AmsNumber::Index(1), 3)));
    let patterns = EntityPatterns::any().unwrap();
    let m = patterns.tray("sensor.ams_1_tray_3").unwrap();
    assert_eq!(m.prefix, None);
    let m = patterns.tray("sensor.x1c_test_ams_1_tray_3").unwrap();
    assert_eq!(m.prefix.as_deref(), Some("x1c_test"));
}

#[test]
fn test_scoped_patterns_reject_other_printers() {
    let patterns = EntityPatterns::for_prefix("x1c").unwrap();
    assert!(patterns.tray("sensor.p1s_ams_1_tray_1").is_none());
    assert!(patterns.ams_humidity("sensor.p1s_ams_1_humidity").is_none());
    assert!(patterns.tray("sensor.x1c_ams_1_tray_1").is_some());
}
