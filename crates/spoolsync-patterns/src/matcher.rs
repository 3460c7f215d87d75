//! Prefix-agnostic entity matcher
//!
//! Classifies single entity ids without knowing which printer they belong
//! to. Patterns are compiled once on first use and shared by every caller.

use std::sync::OnceLock;

use spoolsync_core::AmsNumber;
use tracing::warn;

use crate::languages::LANGUAGES;
use crate::patterns::{EntityPatterns, TrayMatch};

static GLOBAL_PATTERNS: OnceLock<Option<EntityPatterns>> = OnceLock::new();

/// The shared prefix-agnostic patterns
///
/// `None` only if the built-in fragment table fails to compile, in which
/// case every matcher reports "no match".
pub fn global_patterns() -> Option<&'static EntityPatterns> {
    GLOBAL_PATTERNS
        .get_or_init(|| match EntityPatterns::any() {
            Ok(patterns) => Some(patterns),
            Err(e) => {
                warn!("Entity patterns unavailable: {}", e);
                None
            }
        })
        .as_ref()
}

/// Whether the entity is a printer's print status sensor
pub fn is_printer_status(entity_id: &str) -> bool {
    global_patterns()
        .and_then(|patterns| patterns.print_status(entity_id))
        .is_some()
}

/// Printer prefix of a status entity
///
/// Uses the status pattern when it matches. Otherwise strips the domain,
/// any trailing disambiguation number and the last `_segment`, returning
/// whatever remains.
pub fn extract_printer_prefix(entity_id: &str) -> String {
    if let Some(prefix) = global_patterns()
        .and_then(|patterns| patterns.print_status(entity_id))
        .and_then(|m| m.prefix)
    {
        return prefix;
    }

    let object_id = entity_id
        .split_once('.')
        .map_or(entity_id, |(_, object_id)| object_id);
    let object_id = strip_disambiguation(object_id);
    match object_id.rsplit_once('_') {
        Some((head, _)) if !head.is_empty() => head.to_string(),
        _ => object_id.to_string(),
    }
}

fn strip_disambiguation(object_id: &str) -> &str {
    match object_id.rsplit_once('_') {
        Some((head, tail))
            if !head.is_empty() && !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) =>
        {
            head
        }
        _ => object_id,
    }
}

/// AMS number of a humidity sensor
pub fn match_ams_humidity(entity_id: &str) -> Option<AmsNumber> {
    global_patterns()?
        .ams_humidity(entity_id)
        .map(|m| m.number)
}

/// AMS and tray number of a tray sensor
pub fn match_tray(entity_id: &str) -> Option<(AmsNumber, u8)> {
    global_patterns()?
        .tray(entity_id)
        .map(|TrayMatch { ams, tray, .. }| (ams, tray))
}

/// Whether the entity is an external spool sensor
pub fn match_external_spool(entity_id: &str) -> bool {
    global_patterns()
        .and_then(|patterns| patterns.external_spool(entity_id))
        .is_some()
}

/// Remove a localized "Print Status" label from the end of a friendly name
///
/// Comparison ignores case. Returns `None` if no language's label ends the
/// name or nothing but whitespace would remain.
pub fn strip_status_label(friendly_name: &str) -> Option<String> {
    LANGUAGES.iter().find_map(|pack| {
        let head = strip_suffix_ignore_case(friendly_name, pack.status_label)?;
        let head = head.trim_end_matches(|c: char| c.is_whitespace() || c == '-' || c == '_');
        let head = head.trim();
        (!head.is_empty()).then(|| head.to_string())
    })
}

fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let mut text_chars = text.char_indices().rev();
    let mut cut = text.len();
    for expected in suffix.chars().rev() {
        let (index, actual) = text_chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
        cut = index;
    }
    Some(&text[..cut])
}
