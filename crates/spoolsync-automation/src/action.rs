//! Action types
//!
//! Actions are the steps an automation runs. Only the step kinds the
//! generator emits are modeled.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::condition::Condition;

/// Deserialize a field that can be either a single string or an array of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrVec {
        String(String),
        Vec(Vec<String>),
    }

    match StringOrVec::deserialize(deserializer)? {
        StringOrVec::String(s) => Ok(vec![s]),
        StringOrVec::Vec(v) => Ok(v),
    }
}

/// Target specification for service calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Target {
    /// Target entity IDs
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "string_or_vec"
    )]
    pub entity_id: Vec<String>,
}

impl Target {
    /// Target a single entity
    pub fn entity(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: vec![entity_id.into()],
        }
    }
}

/// Automation action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Action {
    /// Call a service
    Service(ServiceAction),

    /// Set variables
    Variables(VariablesAction),

    /// If/then/else
    If(IfAction),
}

impl Action {
    /// Call a service with data and an optional target
    pub fn service(
        action: impl Into<String>,
        target: Option<Target>,
        data: IndexMap<String, serde_json::Value>,
    ) -> Self {
        Action::Service(ServiceAction {
            alias: None,
            action: action.into(),
            target,
            data,
        })
    }

    /// Set variables, evaluated in order
    pub fn variables(variables: IndexMap<String, serde_json::Value>) -> Self {
        Action::Variables(VariablesAction { variables })
    }

    /// Run `then` when all conditions hold
    pub fn when(conditions: Vec<Condition>, then: Vec<Action>) -> Self {
        Action::If(IfAction {
            alias: None,
            r#if: conditions,
            then,
            r#else: Vec::new(),
        })
    }

    /// Every service called by this action or any nested step, in order
    pub fn services(&self) -> Vec<&str> {
        match self {
            Action::Service(s) => vec![s.action.as_str()],
            Action::Variables(_) => Vec::new(),
            Action::If(i) => i
                .then
                .iter()
                .chain(i.r#else.iter())
                .flat_map(Action::services)
                .collect(),
        }
    }
}

/// Service call action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceAction {
    /// Optional alias for this step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Service to call (e.g., "input_number.set_value")
    #[serde(alias = "service")]
    pub action: String,

    /// Target entities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,

    /// Service data
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub data: IndexMap<String, serde_json::Value>,
}

/// Variables action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariablesAction {
    /// Variables to set (name -> template string)
    pub variables: IndexMap<String, serde_json::Value>,
}

/// If action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfAction {
    /// Optional alias
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Conditions to evaluate
    pub r#if: Vec<Condition>,

    /// Actions if the conditions hold
    pub then: Vec<Action>,

    /// Actions otherwise
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub r#else: Vec<Action>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_service_action_accepts_legacy_key() {
        let action: Action = serde_json::from_value(json!({
            "service": "input_number.set_value",
            "target": {"entity_id": "input_number.spoolsync_pending_usage"},
            "data": {"value": 0}
        }))
        .unwrap();

        let Action::Service(service) = &action else {
            panic!("Expected service action");
        };
        assert_eq!(service.action, "input_number.set_value");
        assert_eq!(
            service.target,
            Some(Target::entity("input_number.spoolsync_pending_usage"))
        );

        // Serializes with the current key
        let out = serde_json::to_value(&action).unwrap();
        assert_eq!(out["action"], "input_number.set_value");
        assert!(out.get("service").is_none());
    }

    #[test]
    fn test_untagged_variants() {
        let actions: Vec<Action> = serde_json::from_value(json!([
            {"variables": {"used": "{{ 1 }}"}},
            {"if": [{"condition": "template", "value_template": "{{ true }}"}], "then": []},
            {"action": "rest_command.report"}
        ]))
        .unwrap();

        assert!(matches!(actions[0], Action::Variables(_)));
        assert!(matches!(actions[1], Action::If(_)));
        assert!(matches!(actions[2], Action::Service(_)));
    }

    #[test]
    fn test_services_walks_nested_steps() {
        let action = Action::when(
            vec![Condition::template("{{ true }}")],
            vec![
                Action::service("rest_command.report", None, IndexMap::new()),
                Action::when(
                    vec![],
                    vec![Action::service("input_number.set_value", None, IndexMap::new())],
                ),
            ],
        );
        assert_eq!(
            action.services(),
            vec!["rest_command.report", "input_number.set_value"]
        );
    }
}
