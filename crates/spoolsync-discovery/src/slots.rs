//! Tray slot descriptors
//!
//! Each discovered tray is exposed as a selectable slot that names the
//! inventory spool assigned to it. A slot carries a spool picker and an
//! info entity listing the assigned spool's details.

use serde::Serialize;
use spoolsync_core::{find_assigned_spool, CompositeTrayId, EntityId, Printer, Spool, SpoolInfo};

/// Option shown when no spool is assigned
pub const NO_SPOOL: &str = "None";

/// A selectable tray slot and the spool currently assigned to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraySlot {
    /// Stable id of the spool picker
    pub unique_id: String,
    /// Display name of the spool picker
    pub name: String,
    /// Stable id of the info entity
    pub info_unique_id: String,
    /// Display name of the info entity
    pub info_name: String,
    pub tray_entity_id: EntityId,
    pub composite_id: CompositeTrayId,
    /// Label of the assigned spool, or [`NO_SPOOL`]
    pub current_option: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spool_info: Option<SpoolInfo>,
}

/// Picker options: [`NO_SPOOL`] followed by every spool's label
pub fn spool_options(spools: &[Spool]) -> Vec<String> {
    std::iter::once(NO_SPOOL.to_string())
        .chain(spools.iter().map(Spool::label))
        .collect()
}

/// Slots for every tray of every printer, AMS trays first
pub fn tray_slots(printers: &[Printer], spools: &[Spool]) -> Vec<TraySlot> {
    let mut slots = Vec::new();
    for printer in printers {
        for unit in &printer.ams_units {
            for tray in &unit.trays {
                let name = format!("{} {} Tray {}", printer.name, unit.name, tray.tray_number);
                slots.push(slot(name, &tray.id, tray.composite_id, spools));
            }
        }
        if let Some(external) = &printer.external_spool {
            let name = format!("{} External Tray", printer.name);
            slots.push(slot(name, &external.id, external.composite_id, spools));
        }
    }
    slots
}

fn slot(
    name: String,
    tray_entity_id: &EntityId,
    composite_id: CompositeTrayId,
    spools: &[Spool],
) -> TraySlot {
    let tray = tray_entity_id.as_str();
    let assigned = find_assigned_spool(spools, &tray);
    TraySlot {
        unique_id: format!("spoolsync_{}", tray),
        info_unique_id: format!("spoolsync_sensor_{}", tray),
        info_name: format!("{} Info", name),
        name,
        tray_entity_id: tray_entity_id.clone(),
        composite_id,
        current_option: assigned.map_or_else(|| NO_SPOOL.to_string(), Spool::label),
        spool_info: assigned.map(Spool::info),
    }
}
