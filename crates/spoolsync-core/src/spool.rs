//! Inventory spool model
//!
//! Spools come from the inventory service. A spool is assigned to a tray by
//! storing the tray's entity id in its `extra.active_tray` field; the
//! inventory service stores extra values JSON-encoded, so the field holds
//! `"\"sensor.x1c_ams_1_tray_1\""`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key under `Spool::extra` holding the assigned tray entity id
pub const EXTRA_ACTIVE_TRAY: &str = "active_tray";

/// Filament vendor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    #[serde(default)]
    pub name: Option<String>,
}

/// Filament definition a spool is made of
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filament {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub color_hex: Option<String>,
    #[serde(default)]
    pub vendor: Option<Vendor>,
}

/// A physical spool tracked by the inventory service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spool {
    pub id: u64,
    #[serde(default)]
    pub filament: Filament,
    #[serde(default)]
    pub remaining_weight: Option<f64>,
    #[serde(default)]
    pub extra: HashMap<String, String>,
}

/// Spool details exposed next to a tray
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpoolInfo {
    pub spool_id: u64,
    pub vendor: Option<String>,
    pub material: Option<String>,
    pub filament_name: Option<String>,
    pub remaining_weight: Option<f64>,
    pub color_hex: Option<String>,
}

impl Spool {
    /// Vendor name, if the filament has one
    pub fn vendor_name(&self) -> Option<&str> {
        self.filament
            .vendor
            .as_ref()
            .and_then(|vendor| vendor.name.as_deref())
    }

    /// Selection label, e.g. `#12 Bambu Lab PLA Basic Black`
    pub fn label(&self) -> String {
        format!(
            "#{} {} {} {}",
            self.id,
            self.vendor_name().unwrap_or("Unknown"),
            self.filament.material.as_deref().unwrap_or("Unknown"),
            self.filament.name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }

    /// Tray entity id this spool is assigned to
    ///
    /// Accepts the JSON-encoded form and falls back to stripping quotes.
    pub fn assigned_tray(&self) -> Option<String> {
        let raw = self.extra.get(EXTRA_ACTIVE_TRAY)?;
        let tray = match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::String(s)) => s,
            _ => raw.trim_matches('"').to_string(),
        };
        (!tray.is_empty()).then_some(tray)
    }

    /// Info attributes for display next to the assigned tray
    pub fn info(&self) -> SpoolInfo {
        SpoolInfo {
            spool_id: self.id,
            vendor: self.vendor_name().map(str::to_string),
            material: self.filament.material.clone(),
            filament_name: self.filament.name.clone(),
            remaining_weight: self.remaining_weight,
            color_hex: self.filament.color_hex.clone(),
        }
    }
}

/// Find the spool assigned to a tray entity
pub fn find_assigned_spool<'a>(spools: &'a [Spool], tray_entity_id: &str) -> Option<&'a Spool> {
    spools
        .iter()
        .find(|spool| spool.assigned_tray().as_deref() == Some(tray_entity_id))
}
