//! Concepts and AMS naming rules
//!
//! A [`Concept`] is one kind of sensor SpoolSync looks for. Its regex
//! alternation is built from every [`LanguagePack`](crate::LanguagePack), so
//! the matcher code never names a language.

use regex::Captures;
use spoolsync_core::AmsNumber;

use crate::languages::{LanguagePack, LANGUAGES};

/// A kind of sensor recognized by entity name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Concept {
    PrintStatus,
    AmsHumidity,
    Tray,
    ExternalSpool,
    CurrentStage,
    PrintWeight,
    PrintProgress,
}

impl Concept {
    /// All concepts that have an entity-id fragment
    pub const ALL: [Concept; 7] = [
        Concept::PrintStatus,
        Concept::AmsHumidity,
        Concept::Tray,
        Concept::ExternalSpool,
        Concept::CurrentStage,
        Concept::PrintWeight,
        Concept::PrintProgress,
    ];

    /// Short name used in logs and errors
    pub fn name(self) -> &'static str {
        match self {
            Concept::PrintStatus => "print status",
            Concept::AmsHumidity => "AMS humidity",
            Concept::Tray => "tray",
            Concept::ExternalSpool => "external spool",
            Concept::CurrentStage => "current stage",
            Concept::PrintWeight => "print weight",
            Concept::PrintProgress => "print progress",
        }
    }

    /// This concept's fragment in one language
    pub fn fragment(self, pack: &LanguagePack) -> &'static str {
        match self {
            Concept::PrintStatus => pack.print_status,
            Concept::AmsHumidity => pack.ams_humidity,
            Concept::Tray => pack.tray,
            Concept::ExternalSpool => pack.external_spool,
            Concept::CurrentStage => pack.current_stage,
            Concept::PrintWeight => pack.print_weight,
            Concept::PrintProgress => pack.print_progress,
        }
    }

    /// Distinct fragments across all languages, in table order
    pub fn fragments(self) -> Vec<&'static str> {
        let mut fragments: Vec<&'static str> = Vec::with_capacity(LANGUAGES.len());
        for pack in LANGUAGES {
            let fragment = self.fragment(pack);
            if !fragments.contains(&fragment) {
                fragments.push(fragment);
            }
        }
        fragments
    }

    /// Non-capturing regex alternation over every language's fragment
    pub fn alternation(self) -> String {
        let escaped: Vec<String> = self
            .fragments()
            .into_iter()
            .map(regex::escape)
            .collect();
        format!("(?:{})", escaped.join("|"))
    }
}

/// Revision infix allowed between the AMS index and the concept name
pub(crate) const REVISION_INFIX: &str = "(?:_(?:pro|ht))?";

/// One way an AMS unit can be named inside an entity id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmsRule {
    /// `ams_ht`: AMS HT addressed by literal token
    HtToken,
    /// `ams_<n>`: explicit index, including `128` for AMS HT
    Indexed,
    /// `ams_lite`
    LiteToken,
    /// `ams` with no index: AMS Lite on single-AMS printers, taken as unit 1
    Omitted,
}

/// AMS naming rules in resolution order; the first rule that matches wins
pub const AMS_RULES: [AmsRule; 4] = [
    AmsRule::HtToken,
    AmsRule::Indexed,
    AmsRule::LiteToken,
    AmsRule::Omitted,
];

impl AmsRule {
    /// Regex fragment for the AMS segment, without surrounding underscores
    pub(crate) fn segment(self) -> &'static str {
        match self {
            AmsRule::HtToken => "ams_ht",
            AmsRule::Indexed => r"ams_(?P<ams>\d+)",
            AmsRule::LiteToken => "ams_lite",
            AmsRule::Omitted => "ams",
        }
    }

    /// AMS number for a successful match of this rule
    pub(crate) fn number(self, caps: &Captures<'_>) -> Option<AmsNumber> {
        match self {
            AmsRule::HtToken => Some(AmsNumber::Ht),
            AmsRule::Indexed => caps
                .name("ams")
                .and_then(|m| m.as_str().parse::<u16>().ok())
                .map(AmsNumber::Index),
            AmsRule::LiteToken => Some(AmsNumber::Lite),
            AmsRule::Omitted => Some(AmsNumber::Index(1)),
        }
    }
}
