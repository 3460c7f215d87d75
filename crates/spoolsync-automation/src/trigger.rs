//! Trigger types
//!
//! Triggers are the state changes that start a generated automation.

use serde::{Deserialize, Serialize};

/// Trigger definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "trigger", rename_all = "snake_case")]
pub enum Trigger {
    /// Fires when an entity's state (or one attribute) changes
    State(StateTrigger),
}

impl Trigger {
    /// Get the trigger's ID if set
    pub fn id(&self) -> Option<&str> {
        match self {
            Trigger::State(t) => t.id.as_deref(),
        }
    }

    /// Entities watched by this trigger
    pub fn entity_ids(&self) -> Vec<&str> {
        match self {
            Trigger::State(t) => t.entity_id.ids(),
        }
    }
}

/// State change trigger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTrigger {
    /// Optional trigger ID, referenced by `trigger` conditions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Entity IDs to monitor (single or list)
    pub entity_id: EntityIdSpec,

    /// Attribute to monitor instead of state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,

    /// Previous state to match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<StateMatch>,

    /// New state to match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<StateMatch>,

    /// Don't trigger if coming from these states
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub not_from: Vec<String>,

    /// Don't trigger if going to these states
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub not_to: Vec<String>,
}

impl StateTrigger {
    /// Trigger on any state change of the given entities
    pub fn new(entity_id: impl Into<EntityIdSpec>) -> Self {
        Self {
            id: None,
            entity_id: entity_id.into(),
            attribute: None,
            from: None,
            to: None,
            not_from: Vec::new(),
            not_to: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    pub fn to(mut self, states: StateMatch) -> Self {
        self.to = Some(states);
        self
    }

    pub fn not_from<S: Into<String>>(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.not_from = states.into_iter().map(Into::into).collect();
        self
    }

    pub fn not_to<S: Into<String>>(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.not_to = states.into_iter().map(Into::into).collect();
        self
    }
}

// --- Supporting types ---

/// Entity ID specification (single or list)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityIdSpec {
    Single(String),
    List(Vec<String>),
}

impl EntityIdSpec {
    /// Get all entity IDs
    pub fn ids(&self) -> Vec<&str> {
        match self {
            EntityIdSpec::Single(id) => vec![id.as_str()],
            EntityIdSpec::List(ids) => ids.iter().map(|s| s.as_str()).collect(),
        }
    }
}

impl From<String> for EntityIdSpec {
    fn from(id: String) -> Self {
        EntityIdSpec::Single(id)
    }
}

impl From<&str> for EntityIdSpec {
    fn from(id: &str) -> Self {
        EntityIdSpec::Single(id.to_string())
    }
}

impl From<Vec<String>> for EntityIdSpec {
    fn from(ids: Vec<String>) -> Self {
        EntityIdSpec::List(ids)
    }
}

/// State match specification (single value or list)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateMatch {
    Single(String),
    List(Vec<String>),
}

impl StateMatch {
    /// Check if a state matches
    pub fn matches(&self, state: &str) -> bool {
        match self {
            StateMatch::Single(s) => s == state,
            StateMatch::List(list) => list.iter().any(|s| s == state),
        }
    }

    /// A list match built from string slices
    pub fn any_of(states: &[&str]) -> Self {
        StateMatch::List(states.iter().map(|s| s.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_trigger_deserialize() {
        let json = r#"{
            "trigger": "state",
            "entity_id": "sensor.x1c_print_status",
            "to": ["finish", "failed"],
            "not_from": ["unavailable"]
        }"#;

        let trigger: Trigger = serde_json::from_str(json).unwrap();
        assert_eq!(trigger.entity_ids(), vec!["sensor.x1c_print_status"]);
        let Trigger::State(t) = trigger;
        assert!(t.to.unwrap().matches("failed"));
        assert_eq!(t.not_from, vec!["unavailable"]);
    }

    #[test]
    fn test_state_trigger_serialize_skips_empty() {
        let trigger = Trigger::State(StateTrigger::new("sensor.spoolsync_active_tray").with_id("tray_change"));
        let json = serde_json::to_value(&trigger).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "trigger": "state",
                "id": "tray_change",
                "entity_id": "sensor.spoolsync_active_tray"
            })
        );
    }

    #[test]
    fn test_template_trigger_rejected() {
        let json = r#"{"trigger": "template", "value_template": "{{ true }}"}"#;
        assert!(serde_json::from_str::<Trigger>(json).is_err());
    }

    #[test]
    fn test_entity_id_spec() {
        let single: EntityIdSpec = serde_json::from_str(r#""sensor.a""#).unwrap();
        assert_eq!(single.ids(), vec!["sensor.a"]);

        let list: EntityIdSpec = serde_json::from_str(r#"["sensor.a", "sensor.b"]"#).unwrap();
        assert_eq!(list.ids(), vec!["sensor.a", "sensor.b"]);
    }

    #[test]
    fn test_state_match() {
        let list = StateMatch::any_of(&["finish", "idle"]);
        assert!(list.matches("idle"));
        assert!(!list.matches("running"));
        assert!(StateMatch::Single("running".into()).matches("running"));
    }
}
