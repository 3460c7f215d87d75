//! Automation definitions
//!
//! An automation ties together triggers, conditions, and actions. These
//! are written into the Home Assistant automation list.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::action::Action;
use crate::condition::Condition;
use crate::trigger::Trigger;

/// Automation errors
#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("Invalid automation configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for automation operations
pub type AutomationResult<T> = Result<T, AutomationError>;

/// Execution mode for automations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Default - ignore new triggers while running
    #[default]
    Single,

    /// Queue triggers (up to max)
    Queued,
}

/// Automation configuration as stored in `automations.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationConfig {
    /// Stable ID used to find and replace this automation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Human-readable name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Execution mode
    #[serde(default)]
    pub mode: ExecutionMode,

    /// Maximum number of queued runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,

    /// Triggers that start the automation
    #[serde(default, alias = "trigger")]
    pub triggers: Vec<Trigger>,

    /// Conditions that must be met
    #[serde(default, alias = "condition", skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,

    /// Actions to execute
    #[serde(default, alias = "action")]
    pub actions: Vec<Action>,
}

impl AutomationConfig {
    /// Create an empty automation with an id and alias
    pub fn new(id: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            alias: Some(alias.into()),
            description: None,
            mode: ExecutionMode::default(),
            max: None,
            triggers: Vec::new(),
            conditions: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Get display name (alias or ID)
    pub fn display_name(&self) -> &str {
        self.alias
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("<unnamed>")
    }

    /// Check the automation can be loaded by Home Assistant
    pub fn validate(&self) -> AutomationResult<()> {
        match self.id.as_deref() {
            Some(id) if !id.trim().is_empty() => {}
            _ => {
                return Err(AutomationError::InvalidConfig(format!(
                    "{}: missing id",
                    self.display_name()
                )))
            }
        }
        if self.triggers.is_empty() {
            return Err(AutomationError::InvalidConfig(format!(
                "{}: no triggers",
                self.display_name()
            )));
        }
        if self.actions.is_empty() {
            return Err(AutomationError::InvalidConfig(format!(
                "{}: no actions",
                self.display_name()
            )));
        }
        if self.max.is_some() && self.mode != ExecutionMode::Queued {
            return Err(AutomationError::InvalidConfig(format!(
                "{}: max is only valid for queued mode",
                self.display_name()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::StateTrigger;
    use indexmap::IndexMap;

    fn sample() -> AutomationConfig {
        let mut automation = AutomationConfig::new("spoolsync_test", "SpoolSync test");
        automation.triggers.push(Trigger::State(StateTrigger::new("sensor.a")));
        automation
            .actions
            .push(Action::service("input_number.set_value", None, IndexMap::new()));
        automation
    }

    #[test]
    fn test_validate() {
        assert!(sample().validate().is_ok());

        let mut no_triggers = sample();
        no_triggers.triggers.clear();
        assert!(no_triggers.validate().is_err());

        let mut no_id = sample();
        no_id.id = Some("  ".into());
        assert!(no_id.validate().is_err());

        let mut bad_max = sample();
        bad_max.max = Some(5);
        assert!(bad_max.validate().is_err());
        bad_max.mode = ExecutionMode::Queued;
        assert!(bad_max.validate().is_ok());
    }

    #[test]
    fn test_yaml_round_trip_keeps_field_order() {
        let yaml = serde_yaml::to_string(&sample()).unwrap();
        let id = yaml.find("id:").unwrap();
        let triggers = yaml.find("triggers:").unwrap();
        let actions = yaml.find("actions:").unwrap();
        assert!(id < triggers && triggers < actions);
        assert!(!yaml.contains("conditions:"));

        let parsed: AutomationConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_legacy_singular_keys() {
        let yaml = r#"
id: legacy
alias: Legacy
trigger:
  - trigger: state
    entity_id: sensor.a
action:
  - service: light.turn_on
    target:
      entity_id: light.kitchen
"#;
        let automation: AutomationConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(automation.triggers.len(), 1);
        assert_eq!(automation.actions[0].services(), vec!["light.turn_on"]);
        assert_eq!(automation.mode, ExecutionMode::Single);
    }
}
