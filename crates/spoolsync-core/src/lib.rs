//! Core types for SpoolSync
//!
//! This crate provides the types shared by every other SpoolSync crate:
//! entity identifiers and state snapshots as reported by Home Assistant,
//! the normalized printer topology (printer → AMS units → trays), the
//! composite tray id encoding used inside generated automations, and the
//! inventory spool model.

mod entity_id;
mod spool;
mod state;
mod topology;
mod tray_id;

pub use entity_id::{EntityId, EntityIdError};
pub use spool::{find_assigned_spool, Filament, Spool, SpoolInfo, Vendor};
pub use state::EntityState;
pub use topology::{AmsNumber, AmsNumberError, AmsUnit, Printer, PrinterSensors, Tray};
pub use tray_id::{CompositeTrayId, TrayEncodingError, MAX_AMS_SLOT, MAX_TRAY_NUMBER};

/// State value reported by an entity whose device cannot be reached
pub const STATE_UNAVAILABLE: &str = "unavailable";

/// State value reported by an entity that has not produced a value yet
pub const STATE_UNKNOWN: &str = "unknown";

/// Attribute keys carried by tray and external-spool sensors
pub mod attrs {
    /// Friendly name assigned by the registry
    pub const FRIENDLY_NAME: &str = "friendly_name";

    /// Filament name loaded in the tray
    pub const NAME: &str = "name";

    /// Filament material (PLA, PETG, ...)
    pub const MATERIAL: &str = "type";

    /// Filament color as `#RRGGBBAA`
    pub const COLOR: &str = "color";

    /// RFID tag serial of the loaded spool
    pub const SERIAL: &str = "tag_uid";

    /// Remaining filament reported by the AMS
    pub const REMAINING: &str = "remain";

    /// Whether the tray is currently feeding the printer
    pub const ACTIVE: &str = "active";
}
