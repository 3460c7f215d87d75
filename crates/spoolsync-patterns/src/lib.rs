//! Localized entity pattern library for SpoolSync
//!
//! Printer integrations name their sensors in the user's language and vary
//! the AMS segment with the hardware revision. This crate recognizes those
//! names:
//!
//! - [`languages`]: one fragment record per supported language
//! - [`Concept`] and [`AMS_RULES`]: what is matched and in which order AMS
//!   naming variants are tried
//! - [`EntityPatterns`]: compiled matchers, either prefix-agnostic or scoped
//!   to one printer prefix
//! - free functions such as [`match_tray`] over a shared prefix-agnostic set
//!
//! Matching never fails. An entity that is not recognized yields `None` or
//! `false`.

mod concept;
mod error;
pub mod languages;
mod matcher;
mod patterns;

pub use concept::{AmsRule, Concept, AMS_RULES};
pub use error::{PatternError, PatternResult};
pub use languages::{LanguagePack, LANGUAGES};
pub use matcher::{
    extract_printer_prefix, global_patterns, is_printer_status, match_ams_humidity,
    match_external_spool, match_tray, strip_status_label,
};
pub use patterns::{AmsMatch, EntityPatterns, SensorMatch, TrayMatch};
