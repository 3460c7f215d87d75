//! Condition types
//!
//! Conditions are evaluated when an automation or a branch is reached;
//! all must hold for its actions to run.

use serde::{Deserialize, Serialize};

use crate::trigger::{EntityIdSpec, StateMatch};

/// Condition definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "condition", rename_all = "snake_case")]
pub enum Condition {
    /// Check entity state
    State(StateCondition),

    /// Evaluate a template
    Template(TemplateCondition),
}

impl Condition {
    /// Create a template condition
    pub fn template(value_template: impl Into<String>) -> Self {
        Condition::Template(TemplateCondition {
            value_template: value_template.into(),
        })
    }

    /// Create a state condition
    pub fn state(entity_id: impl Into<EntityIdSpec>, state: StateMatch) -> Self {
        Condition::State(StateCondition {
            entity_id: entity_id.into(),
            state,
            attribute: None,
        })
    }
}

/// State condition - check entity state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateCondition {
    /// Entity IDs to check
    pub entity_id: EntityIdSpec,

    /// State to match (can be single or list)
    pub state: StateMatch,

    /// Attribute to check instead of state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

/// Template condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateCondition {
    pub value_template: String,
}
