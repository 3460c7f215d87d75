//! Compiled entity patterns
//!
//! An [`EntityPatterns`] holds one compiled expression per concept (and, for
//! the AMS concepts, one per naming rule) for a single scope: either every
//! printer, or one known printer prefix.

use regex::{Captures, Regex};
use spoolsync_core::AmsNumber;
use tracing::trace;

use crate::concept::{AmsRule, Concept, AMS_RULES, REVISION_INFIX};
use crate::error::{PatternError, PatternResult};

/// Optional trailing disambiguation number, anchored at the end
const DUP_SUFFIX: &str = r"(?:_(?P<dup>\d+))?$";

/// Optional device segment some integrations put before the external spool name
const EXTERNAL_DEVICE: &str = "(?:externalspool_)?";

/// Domain every recognized entity lives in
const SENSOR_DOMAIN: &str = "sensor.";

/// Cheap pre-check run before any expression
pub(crate) fn admissible(entity_id: &str) -> bool {
    entity_id.starts_with(SENSOR_DOMAIN) && entity_id.is_ascii()
}

/// A single-entity sensor match (status, external spool, stage, weight, progress)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorMatch {
    /// Printer prefix, when the pattern captured one
    pub prefix: Option<String>,
    /// Disambiguation suffix (0 when absent)
    pub suffix: u32,
}

/// An AMS humidity sensor match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmsMatch {
    pub prefix: Option<String>,
    pub number: AmsNumber,
    /// Naming rule that produced the match
    pub rule: AmsRule,
    pub suffix: u32,
}

/// An AMS tray sensor match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayMatch {
    pub prefix: Option<String>,
    pub ams: AmsNumber,
    /// Tray number, always 1..=4
    pub tray: u8,
    pub rule: AmsRule,
    pub suffix: u32,
}

#[derive(Debug, Clone, Copy)]
enum Scope<'a> {
    Any,
    Prefix(&'a str),
}

impl Scope<'_> {
    /// Expression for everything between the domain and the concept
    fn head(self, prefix_required: bool) -> String {
        match self {
            Scope::Any if prefix_required => r"^sensor\.(?P<prefix>.+?)_".to_string(),
            Scope::Any => r"^sensor\.(?:(?P<prefix>.+?)_)?".to_string(),
            Scope::Prefix(prefix) => format!(r"^sensor\.{}_", regex::escape(prefix)),
        }
    }
}

fn compile(concept: Concept, pattern: &str) -> PatternResult<Regex> {
    trace!("Compiling {} pattern: {}", concept.name(), pattern);
    Regex::new(pattern).map_err(|source| PatternError::Compile {
        concept: concept.name(),
        source,
    })
}

fn suffix(caps: &Captures<'_>) -> u32 {
    caps.name("dup")
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

fn prefix(caps: &Captures<'_>) -> Option<String> {
    caps.name("prefix").map(|m| m.as_str().to_string())
}

/// Compiled matchers for one scope
#[derive(Debug, Clone)]
pub struct EntityPatterns {
    scope_prefix: Option<String>,
    sensors: Vec<(Concept, Regex)>,
    humidity: Vec<(AmsRule, Regex)>,
    trays: Vec<(AmsRule, Regex)>,
}

impl EntityPatterns {
    /// Patterns matching any printer's entities, capturing the prefix
    pub fn any() -> PatternResult<Self> {
        Self::build(Scope::Any)
    }

    /// Patterns matching only entities under one printer prefix
    pub fn for_prefix(prefix: &str) -> PatternResult<Self> {
        if prefix.is_empty() {
            return Err(PatternError::EmptyPrefix);
        }
        Self::build(Scope::Prefix(prefix))
    }

    fn build(scope: Scope<'_>) -> PatternResult<Self> {
        let mut sensors = Vec::with_capacity(5);
        for concept in [
            Concept::PrintStatus,
            Concept::ExternalSpool,
            Concept::CurrentStage,
            Concept::PrintWeight,
            Concept::PrintProgress,
        ] {
            let device = if concept == Concept::ExternalSpool {
                EXTERNAL_DEVICE
            } else {
                ""
            };
            let pattern = format!(
                "{}{}{}{}",
                scope.head(concept == Concept::PrintStatus),
                device,
                concept.alternation(),
                DUP_SUFFIX
            );
            sensors.push((concept, compile(concept, &pattern)?));
        }

        let head = scope.head(false);
        let humidity_alt = Concept::AmsHumidity.alternation();
        let tray_alt = Concept::Tray.alternation();

        let mut humidity = Vec::with_capacity(AMS_RULES.len());
        let mut trays = Vec::with_capacity(AMS_RULES.len());
        for rule in AMS_RULES {
            let pattern = format!(
                "{}{}{}_{}{}",
                head,
                rule.segment(),
                REVISION_INFIX,
                humidity_alt,
                DUP_SUFFIX
            );
            humidity.push((rule, compile(Concept::AmsHumidity, &pattern)?));

            let pattern = format!(
                "{}{}{}_{}_(?P<tray>[1-4]){}",
                head,
                rule.segment(),
                REVISION_INFIX,
                tray_alt,
                DUP_SUFFIX
            );
            trays.push((rule, compile(Concept::Tray, &pattern)?));
        }

        Ok(Self {
            scope_prefix: match scope {
                Scope::Any => None,
                Scope::Prefix(prefix) => Some(prefix.to_string()),
            },
            sensors,
            humidity,
            trays,
        })
    }

    /// The printer prefix these patterns are scoped to, if any
    pub fn scope_prefix(&self) -> Option<&str> {
        self.scope_prefix.as_deref()
    }

    fn captured_prefix(&self, caps: &Captures<'_>) -> Option<String> {
        prefix(caps).or_else(|| self.scope_prefix.clone())
    }

    /// Match a single-entity sensor concept
    ///
    /// Returns `None` for the AMS concepts; use [`Self::ams_humidity`] and
    /// [`Self::tray`] for those.
    pub fn sensor(&self, concept: Concept, entity_id: &str) -> Option<SensorMatch> {
        if !admissible(entity_id) {
            return None;
        }
        let (_, regex) = self.sensors.iter().find(|(c, _)| *c == concept)?;
        let caps = regex.captures(entity_id)?;
        Some(SensorMatch {
            prefix: self.captured_prefix(&caps),
            suffix: suffix(&caps),
        })
    }

    /// Match a print status sensor
    pub fn print_status(&self, entity_id: &str) -> Option<SensorMatch> {
        self.sensor(Concept::PrintStatus, entity_id)
    }

    /// Match an external spool sensor
    pub fn external_spool(&self, entity_id: &str) -> Option<SensorMatch> {
        self.sensor(Concept::ExternalSpool, entity_id)
    }

    /// Match an AMS humidity sensor, trying naming rules in priority order
    pub fn ams_humidity(&self, entity_id: &str) -> Option<AmsMatch> {
        if !admissible(entity_id) {
            return None;
        }
        self.humidity.iter().find_map(|(rule, regex)| {
            let caps = regex.captures(entity_id)?;
            Some(AmsMatch {
                prefix: self.captured_prefix(&caps),
                number: rule.number(&caps)?,
                rule: *rule,
                suffix: suffix(&caps),
            })
        })
    }

    /// Match an AMS tray sensor, trying naming rules in priority order
    pub fn tray(&self, entity_id: &str) -> Option<TrayMatch> {
        if !admissible(entity_id) {
            return None;
        }
        self.trays.iter().find_map(|(rule, regex)| {
            let caps = regex.captures(entity_id)?;
            let tray = caps.name("tray")?.as_str().parse().ok()?;
            Some(TrayMatch {
                prefix: self.captured_prefix(&caps),
                ams: rule.number(&caps)?,
                tray,
                rule: *rule,
                suffix: suffix(&caps),
            })
        })
    }
}
