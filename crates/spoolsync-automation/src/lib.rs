//! Typed Home Assistant automation model
//!
//! The subset of the automation schema SpoolSync writes: state triggers,
//! state and template conditions, and service, variables and if actions.
//! Every type serializes to the YAML Home Assistant reads back, with maps
//! kept in insertion order.

mod action;
mod automation;
mod condition;
mod trigger;

pub use action::{Action, IfAction, ServiceAction, Target, VariablesAction};
pub use automation::{AutomationConfig, AutomationError, AutomationResult, ExecutionMode};
pub use condition::{Condition, StateCondition, TemplateCondition};
pub use trigger::{EntityIdSpec, StateMatch, StateTrigger, Trigger};
