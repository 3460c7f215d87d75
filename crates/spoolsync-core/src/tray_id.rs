//! Composite tray id encoding
//!
//! Generated automations have no structured variables, so the active tray
//! is carried between rule evaluations as one integer: `slot * 10 + tray`,
//! where `slot` is the AMS unit's composite slot (1..=9) and `tray` is the
//! tray number (1..=4). The external spool is always `0`.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Highest tray number addressable within one AMS unit
pub const MAX_TRAY_NUMBER: u8 = 4;

/// Highest AMS slot that keeps composite ids within two digits
pub const MAX_AMS_SLOT: u8 = 9;

/// Error returned when encoding is asked for a pair outside its domain
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TrayEncodingError {
    #[error("tray number {0} is outside 0..=4")]
    InvalidTrayNumber(u8),

    #[error("AMS slot {0} is outside 1..=9")]
    InvalidAmsSlot(u8),
}

/// Integer id shared between generated templates to name one tray
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeTrayId(u8);

impl CompositeTrayId {
    /// The external spool
    pub const EXTERNAL: CompositeTrayId = CompositeTrayId(0);

    /// Encode an (AMS slot, tray number) pair
    ///
    /// Tray number `0` always encodes to the external spool regardless of
    /// the slot.
    pub fn encode(ams_slot: u8, tray_number: u8) -> Result<Self, TrayEncodingError> {
        if tray_number > MAX_TRAY_NUMBER {
            return Err(TrayEncodingError::InvalidTrayNumber(tray_number));
        }
        if tray_number == 0 {
            return Ok(Self::EXTERNAL);
        }
        if ams_slot == 0 || ams_slot > MAX_AMS_SLOT {
            return Err(TrayEncodingError::InvalidAmsSlot(ams_slot));
        }
        Ok(Self(ams_slot * 10 + tray_number))
    }

    /// Decode into (AMS slot, tray number)
    ///
    /// Only meaningful for ids produced by [`CompositeTrayId::encode`];
    /// the external spool decodes to `(0, 0)`.
    pub fn decode(self) -> (u8, u8) {
        (self.0 / 10, self.0 % 10)
    }

    /// Whether this id names the external spool
    pub fn is_external(self) -> bool {
        self.0 == 0
    }

    /// Raw integer value
    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for CompositeTrayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
