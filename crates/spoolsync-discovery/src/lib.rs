//! Printer topology discovery for SpoolSync
//!
//! Turns a Home Assistant entity snapshot into the normalized printer model
//! from `spoolsync-core`. Discovery is a pure function of the snapshot: it
//! performs no I/O, keeps no state between calls, and never fails. Entities
//! it does not recognize are skipped.

mod discover;
mod select;
mod slots;

pub use discover::{allocate_slots, discover_printers};
pub use select::{preference, select_best, Candidate};
pub use slots::{spool_options, tray_slots, TraySlot, NO_SPOOL};
