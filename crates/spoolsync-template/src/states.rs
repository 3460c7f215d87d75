//! Attribute lookups over a snapshot
//!
//! Backs `state_attr()` and `is_state_attr()`, the state functions the
//! generated active tray template calls.

use std::collections::HashMap;
use std::sync::Arc;

use minijinja::Value;
use spoolsync_core::EntityState;

/// Snapshot indexed by entity id
///
/// Later records for the same entity id replace earlier ones.
#[derive(Debug, Clone, Default)]
pub(crate) struct SnapshotStates {
    states: Arc<HashMap<String, EntityState>>,
}

impl SnapshotStates {
    pub(crate) fn new(states: &[EntityState]) -> Self {
        let states = states
            .iter()
            .map(|state| (state.entity_id.to_string(), state.clone()))
            .collect();
        Self {
            states: Arc::new(states),
        }
    }

    fn attribute(&self, entity_id: &str, attribute: &str) -> Option<&serde_json::Value> {
        self.states.get(entity_id)?.attributes.get(attribute)
    }

    /// Attribute value, undefined when the entity or attribute is missing
    pub(crate) fn state_attr(&self, entity_id: &str, attribute: &str) -> Value {
        self.attribute(entity_id, attribute)
            .map(Value::from_serialize)
            .unwrap_or(Value::UNDEFINED)
    }

    /// Compare an attribute against a template value
    ///
    /// Numbers compare by value. Anything else must match exactly, so an
    /// `active: true` attribute never equals the number `1`.
    pub(crate) fn is_state_attr(&self, entity_id: &str, attribute: &str, value: &Value) -> bool {
        let Some(current) = self.attribute(entity_id, attribute) else {
            return false;
        };
        let Ok(expected) = serde_json::to_value(value) else {
            return false;
        };
        match (current, &expected) {
            (serde_json::Value::Number(a), serde_json::Value::Number(b)) => a.as_f64() == b.as_f64(),
            _ => *current == expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_test_states() -> SnapshotStates {
        SnapshotStates::new(&[
            EntityState::new(
                "sensor.x1c_ams_1_tray_1".parse().unwrap(),
                "PLA Basic",
                HashMap::from([
                    ("active".to_string(), json!(true)),
                    ("remain".to_string(), json!(80)),
                    ("type".to_string(), json!("PLA")),
                ]),
            ),
            EntityState::new(
                "sensor.x1c_external_spool".parse().unwrap(),
                "unavailable",
                HashMap::from([("type".to_string(), json!(null))]),
            ),
        ])
    }

    #[test]
    fn test_later_record_wins() {
        let states = SnapshotStates::new(&[
            EntityState::new(
                "sensor.a".parse().unwrap(),
                "1",
                HashMap::from([("active".to_string(), json!(false))]),
            ),
            EntityState::new(
                "sensor.a".parse().unwrap(),
                "2",
                HashMap::from([("active".to_string(), json!(true))]),
            ),
        ]);
        assert!(states.is_state_attr("sensor.a", "active", &Value::from(true)));
    }

    #[test]
    fn test_is_state_attr_bool() {
        let states = make_test_states();
        assert!(states.is_state_attr("sensor.x1c_ams_1_tray_1", "active", &Value::from(true)));
        assert!(!states.is_state_attr("sensor.x1c_ams_1_tray_1", "active", &Value::from(false)));
        assert!(!states.is_state_attr("sensor.x1c_ams_1_tray_1", "active", &Value::from(1)));
        assert!(!states.is_state_attr("sensor.missing", "active", &Value::from(true)));
    }

    #[test]
    fn test_is_state_attr_number() {
        let states = make_test_states();
        assert!(states.is_state_attr("sensor.x1c_ams_1_tray_1", "remain", &Value::from(80.0)));
        assert!(!states.is_state_attr("sensor.x1c_ams_1_tray_1", "remain", &Value::from("80")));
    }

    #[test]
    fn test_state_attr() {
        let states = make_test_states();
        assert_eq!(
            states.state_attr("sensor.x1c_ams_1_tray_1", "remain").as_i64(),
            Some(80)
        );
        assert_eq!(
            states.state_attr("sensor.x1c_ams_1_tray_1", "type").as_str(),
            Some("PLA")
        );
        assert!(states.state_attr("sensor.x1c_external_spool", "type").is_none());
        assert!(states.state_attr("sensor.x1c_ams_1_tray_1", "missing").is_undefined());
    }
}
