//! Generation from discovered topologies

use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use spoolsync_automation::{AutomationConfig, Trigger};
use spoolsync_core::{CompositeTrayId, EntityState};
use spoolsync_discovery::discover_printers;
use spoolsync_generator::{
    build, generate, helpers, ActiveTrayCheck, GeneratedConfig, GeneratorOptions,
};

const WEBHOOK: &str = "http://spoolsync.local:3000/api/webhook";
const SPOOLMAN: &str = "http://spoolman.local:7912";

fn entity(id: &str, state: &str, attributes: Value) -> EntityState {
    let attributes: HashMap<String, Value> = serde_json::from_value(attributes).unwrap();
    EntityState::new(id.parse().unwrap(), state, attributes)
}

fn options() -> GeneratorOptions {
    GeneratorOptions::new(WEBHOOK, SPOOLMAN)
}

fn status(prefix: &str, friendly: &str) -> EntityState {
    entity(
        &format!("sensor.{}_print_status", prefix),
        "idle",
        json!({ "friendly_name": friendly }),
    )
}

fn tray(id: &str, name: &str, active: bool) -> EntityState {
    entity(
        id,
        name,
        json!({"name": name, "type": "PLA", "color": "#FFFFFFFF", "tag_uid": "0000000000000000", "active": active}),
    )
}

fn x1c_test_snapshot() -> Vec<EntityState> {
    vec![
        status("x1c_test", "X1C Test Print Status"),
        entity("sensor.x1c_test_ams_1_humidity", "3", json!({})),
        tray("sensor.x1c_test_ams_1_tray_1", "PLA Basic", true),
        entity(
            "sensor.x1c_test_ams_1_tray_2",
            "Empty",
            json!({"name": "", "type": "", "active": false}),
        ),
    ]
}

fn full_snapshot() -> Vec<EntityState> {
    let mut states = x1c_test_snapshot();
    states.extend([
        tray("sensor.x1c_test_externalspool_external_spool", "PETG", false),
        entity("sensor.x1c_test_current_stage", "printing", json!({})),
        entity("sensor.x1c_test_print_weight", "42.5", json!({})),
        entity("sensor.x1c_test_print_progress", "10", json!({})),
    ]);
    states
}

fn package_value(config: &GeneratedConfig) -> serde_yaml::Value {
    serde_yaml::from_str(&config.config_text).unwrap()
}

fn active_tray_state(config: &GeneratedConfig) -> String {
    package_value(config)["template"][0]["sensor"][0]["state"]
        .as_str()
        .unwrap()
        .to_string()
}

#[test]
fn test_x1c_test_scenario() {
    let printers = discover_printers(&x1c_test_snapshot());
    let config = generate(&printers, &options()).unwrap();

    assert_eq!(config.printer_count, 1);
    assert_eq!(config.tray_count, 2);
    assert!(config
        .automation_text
        .contains("#   11 = sensor.x1c_test_ams_1_tray_1 (AMS 1 Tray 1)"));
    assert!(config
        .automation_text
        .contains("#   12 = sensor.x1c_test_ams_1_tray_2 (AMS 1 Tray 2)"));

    let rules = build(&printers[0], &options());
    assert_eq!(rules.active_tray.ams_check_count(), 2);
    assert_eq!(rules.active_tray.external_check_count(), 0);

    let state = active_tray_state(&config);
    assert_eq!(state.matches("is_state_attr(").count(), 2);
    assert!(!state.contains("state_attr('sensor.x1c_test_ams_1_tray_1', 'type')"));
}

#[test]
fn test_output_is_deterministic() {
    let printers = discover_printers(&full_snapshot());
    let first = generate(&printers, &options()).unwrap();
    let second = generate(&discover_printers(&full_snapshot()), &options()).unwrap();
    assert_eq!(first.automation_text, second.automation_text);
    assert_eq!(first.config_text, second.config_text);
}

#[test]
fn test_timestamp_only_changes_comments() {
    let printers = discover_printers(&full_snapshot());
    let plain = generate(&printers, &options()).unwrap();

    let mut stamped_options = options();
    stamped_options.generated_at = Some(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap());
    let stamped = generate(&printers, &stamped_options).unwrap();

    assert!(stamped
        .automation_text
        .contains("# Generated at 2026-03-01T12:00:00Z"));
    let without_stamp: String = stamped
        .automation_text
        .lines()
        .filter(|line| !line.starts_with("# Generated at"))
        .map(|line| format!("{}\n", line))
        .collect();
    assert_eq!(without_stamp, plain.automation_text);
}

#[test]
fn test_external_spool_is_checked_first() {
    let printers = discover_printers(&full_snapshot());
    let rules = build(&printers[0], &options());

    let ids: Vec<u8> = rules
        .active_tray
        .checks
        .iter()
        .map(|check| check.composite_id().value())
        .collect();
    assert_eq!(ids, vec![0, 11, 12]);
    match &rules.active_tray.checks[0] {
        ActiveTrayCheck::External { suppressed_by, .. } => assert_eq!(suppressed_by.len(), 2),
        other => panic!("expected external check first, got {:?}", other),
    }

    let config = generate(&printers, &options()).unwrap();
    let state = active_tray_state(&config);
    let external = state.find("\n0\n").unwrap();
    let first_ams = state.find("\n11\n").unwrap();
    let second_ams = state.find("\n12\n").unwrap();
    assert!(external < first_ams && first_ams < second_ams);
    assert!(state.ends_with("{%- else -%}\n-1\n{%- endif -%}"));
    assert_eq!(config.tray_map[&CompositeTrayId::EXTERNAL].to_string(), "sensor.x1c_test_externalspool_external_spool");
}

#[test]
fn test_missing_structural_sensors() {
    let printers = discover_printers(&x1c_test_snapshot());
    let config = generate(&printers, &options()).unwrap();
    assert_eq!(
        config.missing_entities,
        vec![
            "sensor.x1c_test_current_stage",
            "sensor.x1c_test_print_weight",
            "sensor.x1c_test_print_progress",
        ]
    );

    let automations: Vec<AutomationConfig> =
        serde_yaml::from_str(&config.automation_text).unwrap();
    let ids: Vec<_> = automations.iter().filter_map(|a| a.id.as_deref()).collect();
    assert_eq!(ids, vec![helpers::USAGE_AUTOMATION_ID, helpers::TRAY_CHANGE_AUTOMATION_ID]);
}

#[test]
fn test_full_printer_gets_accumulator() {
    let printers = discover_printers(&full_snapshot());
    let config = generate(&printers, &options()).unwrap();
    assert!(config.missing_entities.is_empty());
    assert_eq!(config.tray_count, 3);

    let automations: Vec<AutomationConfig> =
        serde_yaml::from_str(&config.automation_text).unwrap();
    assert_eq!(automations.len(), 3);
    assert_eq!(
        automations[2].id.as_deref(),
        Some(helpers::ACCUMULATOR_AUTOMATION_ID)
    );
    assert_eq!(
        automations[2].triggers[0].entity_ids(),
        vec!["sensor.x1c_test_print_progress"]
    );

    let package = package_value(&config);
    assert_eq!(
        package["template"][0]["sensor"][0]["attributes"]["current_stage"].as_str(),
        Some("{{ states('sensor.x1c_test_current_stage') }}")
    );
}

#[test]
fn test_generated_automations_parse_back() {
    let printers = discover_printers(&full_snapshot());
    let rules = build(&printers[0], &options());
    let config = generate(&printers, &options()).unwrap();

    let parsed: Vec<AutomationConfig> = serde_yaml::from_str(&config.automation_text).unwrap();
    assert_eq!(parsed, rules.automations);

    let Trigger::State(tray_change) = &parsed[1].triggers[0];
    assert_eq!(tray_change.entity_id.ids().len(), 3);
}

#[test]
fn test_tray_map_feeds_usage_lookup() {
    let printers = discover_printers(&x1c_test_snapshot());
    let config = generate(&printers, &options()).unwrap();
    assert!(config.automation_text.contains(
        "{11: 'sensor.x1c_test_ams_1_tray_1', 12: 'sensor.x1c_test_ams_1_tray_2'}.get(previous_id, '')"
    ));
}

#[test]
fn test_package_helpers() {
    let printers = discover_printers(&x1c_test_snapshot());
    let config = generate(&printers, &options()).unwrap();
    let package = package_value(&config);

    let last = &package["input_number"]["spoolsync_last_active_tray"];
    assert_eq!(last["min"].as_f64(), Some(-1.0));
    // Left to Home Assistant's restore across restarts
    assert!(last.get("initial").is_none());
    assert!(package["input_number"]["spoolsync_pending_usage"].is_mapping());

    assert_eq!(
        package["sensor"][0]["resource"].as_str(),
        Some("http://spoolman.local:7912/api/v1/spool")
    );
    let usage = &package["rest_command"][helpers::REPORT_USAGE];
    assert_eq!(usage["url"].as_str(), Some(WEBHOOK));
    assert_eq!(usage["method"].as_str(), Some("POST"));
    assert!(usage["payload"]
        .as_str()
        .unwrap()
        .starts_with("{\"event\": \"spool_usage\""));
    assert!(package["rest_command"][helpers::REPORT_TRAY_CHANGE]["payload"]
        .as_str()
        .unwrap()
        .contains("\"trayEntityId\""));
}

#[test]
fn test_names_are_escaped() {
    let mut states = x1c_test_snapshot();
    states[0] = status("x1c_test", "Bob's {{ X1C }}\u{7} Print Status");
    let printers = discover_printers(&states);
    let config = generate(&printers, &options()).unwrap();

    assert!(!config.config_text.contains('\u{7}'));
    assert!(!config.automation_text.contains('\u{7}'));
    let package = package_value(&config);
    assert_eq!(
        package["template"][0]["sensor"][0]["attributes"]["printer"].as_str(),
        Some(r"{{ 'Bob\'s {{ X1C }}' }}")
    );
}

#[test]
fn test_empty_topologies() {
    let config = generate(&[], &options()).unwrap();
    assert_eq!(config, GeneratedConfig::empty(0));
    assert!(config.is_empty());

    let printers = discover_printers(&[status("a1", "A1 Print Status")]);
    let config = generate(&printers, &options()).unwrap();
    assert_eq!(config.printer_count, 1);
    assert_eq!(config.tray_count, 0);
    assert!(config.automation_text.is_empty());
    assert!(config.config_text.is_empty());
}

#[test]
fn test_only_first_printer_is_generated() {
    let mut states = x1c_test_snapshot();
    states.extend([
        status("p1s", "P1S Print Status"),
        tray("sensor.p1s_ams_1_tray_1", "PETG", false),
    ]);
    let printers = discover_printers(&states);
    assert_eq!(printers.len(), 2);

    let config = generate(&printers, &options()).unwrap();
    assert_eq!(config.printer_count, 2);
    assert!(config.automation_text.contains("sensor.x1c_test_print_status"));
    assert!(!config.automation_text.contains("sensor.p1s_"));
}
