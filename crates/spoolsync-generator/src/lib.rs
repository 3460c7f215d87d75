//! Automation and helper configuration generator
//!
//! Renders one discovered printer into two YAML artifacts: an automation
//! list implementing the usage tracking state machine, and a package of
//! helper entities the automations keep their state in.
//!
//! Output is a pure function of the topology and [`GeneratorOptions`].

mod active_tray;
mod error;
mod generate;
pub mod helpers;
mod package;
mod rules;
mod text;

pub use active_tray::{ActiveTrayCheck, ActiveTrayTemplate};
pub use error::{GeneratorError, GeneratorResult};
pub use generate::{
    build, generate, render, GeneratedConfig, GeneratedRules, GeneratorOptions,
    DEFAULT_MIN_REPORTABLE_USAGE,
};
pub use package::{
    InputNumber, PackageConfig, RestCommand, RestSensor, TemplateBlock, TemplateSensor,
    TRAY_CHANGE_FIELDS, USAGE_FIELDS,
};
pub use rules::{TRIGGER_PRINT_END, TRIGGER_TRAY_CHANGE};
pub use text::{comment_text, jinja_string};
