//! Jinja2-compatible template evaluation over an entity snapshot
//!
//! Generated helpers carry their logic as Home Assistant templates. This
//! crate evaluates those templates locally, on minijinja, so the active tray
//! a configuration would report can be previewed from a snapshot.
//!
//! # State Access
//!
//! - `state_attr('entity_id', 'type')` - Get attribute value
//! - `is_state_attr('entity_id', 'active', true)` - Compare an attribute
//!
//! # Example
//!
//! ```ignore
//! use spoolsync_template::{preview_active_tray, TemplateEngine};
//!
//! let engine = TemplateEngine::new(&snapshot);
//! let active = preview_active_tray(&engine, &rules.active_tray.render())?;
//! ```

mod engine;
mod error;
mod filters;
mod preview;
mod states;

pub use engine::TemplateEngine;
pub use error::{TemplateError, TemplateResult};
pub use preview::preview_active_tray;
