//! Normalized printer topology
//!
//! Discovery rebuilds this graph from scratch on every call; nothing here is
//! persisted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::{CompositeTrayId, EntityId};

/// Error for AMS number tokens that are neither numeric, `lite`, nor `ht`
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid AMS number: {0}")]
pub struct AmsNumberError(pub String);

/// The number an AMS unit carries in its entity names
///
/// Usually a small integer, but AMS Lite hardware may be named `lite` and
/// AMS HT hardware either `ht` or a high index such as `128`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AmsNumber {
    /// Explicit numeric index
    Index(u16),
    /// `lite` token
    Lite,
    /// `ht` token
    Ht,
}

impl AmsNumber {
    /// Whether this number addresses AMS HT hardware
    pub fn is_ht(&self) -> bool {
        match self {
            AmsNumber::Ht => true,
            AmsNumber::Index(n) => *n >= 128,
            AmsNumber::Lite => false,
        }
    }

    /// Display name used for the unit ("AMS 1", "AMS Lite", "AMS HT")
    pub fn display_name(&self) -> String {
        match self {
            AmsNumber::Index(n) if *n >= 128 => format!("AMS HT {}", n - 127),
            AmsNumber::Index(n) => format!("AMS {}", n),
            AmsNumber::Lite => "AMS Lite".to_string(),
            AmsNumber::Ht => "AMS HT".to_string(),
        }
    }
}

impl FromStr for AmsNumber {
    type Err = AmsNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lite" => Ok(AmsNumber::Lite),
            "ht" => Ok(AmsNumber::Ht),
            digits => digits
                .parse::<u16>()
                .map(AmsNumber::Index)
                .map_err(|_| AmsNumberError(s.to_string())),
        }
    }
}

impl TryFrom<String> for AmsNumber {
    type Error = AmsNumberError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AmsNumber> for String {
    fn from(n: AmsNumber) -> String {
        n.to_string()
    }
}

impl fmt::Display for AmsNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmsNumber::Index(n) => write!(f, "{}", n),
            AmsNumber::Lite => f.write_str("lite"),
            AmsNumber::Ht => f.write_str("ht"),
        }
    }
}

/// One filament slot: an AMS tray or the external spool holder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tray {
    /// Tray sensor entity
    pub id: EntityId,

    /// 1..=4 within an AMS unit, 0 for the external spool
    pub tray_number: u8,

    /// Composite id used by generated automations
    pub composite_id: CompositeTrayId,

    /// Raw sensor state
    pub state: String,

    /// Loaded filament name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Loaded filament color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Loaded filament material
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,

    /// RFID serial of the loaded spool
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spool_serial: Option<String>,

    /// Remaining filament as reported by the hardware
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_weight: Option<f64>,

    /// Whether the tray is currently feeding the printer
    #[serde(default)]
    pub active: bool,
}

impl Tray {
    /// Whether this tray is the external spool holder
    pub fn is_external(&self) -> bool {
        self.composite_id.is_external()
    }
}

/// An AMS unit and its trays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmsUnit {
    /// Representative entity (humidity sensor, or lowest tray for units without one)
    pub id: EntityId,

    /// Number carried in the unit's entity names
    pub number: AmsNumber,

    /// Composite slot (1..=9) used when encoding this unit's trays
    pub slot: u8,

    /// Display name
    pub name: String,

    /// Trays ordered by tray number
    pub trays: Vec<Tray>,
}

/// Entities that drive usage accounting, besides the status entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterSensors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_stage: Option<EntityId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_weight: Option<EntityId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_progress: Option<EntityId>,
}

/// A printer reconstructed from its entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Printer {
    /// Print-status entity
    pub id: EntityId,

    /// Entity namespace shared by this printer's sensors
    pub prefix: String,

    /// Friendly name with the status label removed
    pub name: String,

    /// Current print status
    pub state: String,

    /// AMS units ordered by composite slot
    pub ams_units: Vec<AmsUnit>,

    /// External spool holder, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_spool: Option<Tray>,

    /// Structural sensors used by generated automations
    #[serde(default)]
    pub sensors: PrinterSensors,
}

impl Printer {
    /// AMS trays in ascending composite-id order
    pub fn ams_trays(&self) -> impl Iterator<Item = &Tray> {
        self.ams_units.iter().flat_map(|unit| unit.trays.iter())
    }

    /// All trays: AMS trays in composite order, then the external spool
    pub fn trays(&self) -> impl Iterator<Item = &Tray> {
        self.ams_trays().chain(self.external_spool.iter())
    }

    /// Number of trays including the external spool
    pub fn tray_count(&self) -> usize {
        self.trays().count()
    }

    /// Look up a tray by composite id
    pub fn tray(&self, id: CompositeTrayId) -> Option<&Tray> {
        self.trays().find(|tray| tray.composite_id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ams_number_parse() {
        assert_eq!("1".parse::<AmsNumber>().unwrap(), AmsNumber::Index(1));
        assert_eq!("128".parse::<AmsNumber>().unwrap(), AmsNumber::Index(128));
        assert_eq!("lite".parse::<AmsNumber>().unwrap(), AmsNumber::Lite);
        assert_eq!("ht".parse::<AmsNumber>().unwrap(), AmsNumber::Ht);
        assert!("pro".parse::<AmsNumber>().is_err());
    }

    #[test]
    fn test_ams_number_order_and_display() {
        let mut numbers = vec![AmsNumber::Ht, AmsNumber::Lite, AmsNumber::Index(2), AmsNumber::Index(1)];
        numbers.sort();
        assert_eq!(
            numbers,
            vec![AmsNumber::Index(1), AmsNumber::Index(2), AmsNumber::Lite, AmsNumber::Ht]
        );
        assert_eq!(AmsNumber::Index(2).display_name(), "AMS 2");
        assert_eq!(AmsNumber::Index(128).display_name(), "AMS HT 1");
        assert!(AmsNumber::Index(128).is_ht());
        assert!(AmsNumber::Ht.is_ht());
        assert!(!AmsNumber::Lite.is_ht());
    }

    #[test]
    fn test_ams_number_serde_as_string() {
        let json = serde_json::to_string(&AmsNumber::Lite).unwrap();
        assert_eq!(json, "\"lite\"");
        let parsed: AmsNumber = serde_json::from_str("\"3\"").unwrap();
        assert_eq!(parsed, AmsNumber::Index(3));
    }
}
