//! Entity ids and service names of the generated helpers
//!
//! Generated automations and the generated package refer to each other
//! only through these names.

/// Storage cell holding the last active composite tray id (-1 = none)
pub const LAST_ACTIVE_TRAY: &str = "input_number.spoolsync_last_active_tray";

/// Accumulator holding filament used since the last report, in grams
pub const PENDING_USAGE: &str = "input_number.spoolsync_pending_usage";

/// Template sensor exposing the active composite tray id
pub const ACTIVE_TRAY_SENSOR: &str = "sensor.spoolsync_active_tray";

/// REST sensor counting inventory spools
pub const INVENTORY_SENSOR: &str = "sensor.spoolsync_inventory_spools";

/// `rest_command` posting a usage report to the webhook
pub const REPORT_USAGE: &str = "spoolsync_report_usage";

/// `rest_command` posting a tray change to the webhook
pub const REPORT_TRAY_CHANGE: &str = "spoolsync_report_tray_change";

/// Automation ids, used by the merge layer to replace generated entries
pub const USAGE_AUTOMATION_ID: &str = "spoolsync_filament_usage";
pub const TRAY_CHANGE_AUTOMATION_ID: &str = "spoolsync_tray_change";
pub const ACCUMULATOR_AUTOMATION_ID: &str = "spoolsync_usage_accumulator";

/// Lifecycle states that end a print
pub const TERMINAL_STATES: &[&str] = &["finish", "failed", "idle"];

/// Previous states for which a terminal transition is a repeat, not a print end
pub const TERMINAL_GUARD_STATES: &[&str] = &["idle", "finish", "failed", "unavailable", "unknown"];

/// Lifecycle state while a print is running
pub const RUNNING_STATE: &str = "running";

/// Object id part of an entity id (`sensor.foo` -> `foo`)
pub(crate) fn object_id(entity_id: &str) -> &str {
    entity_id
        .split_once('.')
        .map_or(entity_id, |(_, object_id)| object_id)
}
