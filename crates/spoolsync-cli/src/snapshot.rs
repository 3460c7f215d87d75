//! Reading entity snapshots and inventory exports

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use spoolsync_core::{EntityState, Spool};
use tracing::{debug, warn};

/// Parse an `/api/states` style array
///
/// Records that are not valid entity states are skipped with a warning so
/// one odd integration cannot block discovery.
pub fn parse_states(json: &str) -> Result<Vec<EntityState>> {
    let value: serde_json::Value =
        serde_json::from_str(json).context("snapshot is not valid JSON")?;
    let serde_json::Value::Array(records) = value else {
        bail!("snapshot must be a JSON array of entity states");
    };

    let total = records.len();
    let states: Vec<EntityState> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!("Skipping snapshot record {}: {}", index, e);
                None
            }
        })
        .collect();
    debug!("Parsed {} of {} snapshot records", states.len(), total);
    Ok(states)
}

pub fn load_states(path: &Path) -> Result<Vec<EntityState>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    parse_states(&json).with_context(|| format!("failed to parse snapshot {}", path.display()))
}

/// Load a spool list as exported by the inventory service
pub fn load_spools(path: &Path) -> Result<Vec<Spool>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read spools {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("failed to parse spools {}", path.display()))
}
