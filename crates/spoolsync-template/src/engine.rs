//! Template engine over an entity snapshot
//!
//! Renders Home Assistant templates against a fixed list of states, so the
//! templates SpoolSync generates can be checked before they are installed.

use minijinja::{Environment, Value};
use spoolsync_core::EntityState;
use tracing::debug;

use crate::error::TemplateResult;
use crate::filters;
use crate::states::SnapshotStates;

/// Template engine with Home Assistant state functions
///
/// The engine provides:
/// - `state_attr()` and `is_state_attr()`
/// - forgiving `float` / `int` filters, `round`, `to_json`
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create an engine reading the given snapshot
    pub fn new(snapshot: &[EntityState]) -> Self {
        let states = SnapshotStates::new(snapshot);
        let mut env = Environment::new();
        env.set_debug(true);

        Self::register_filters(&mut env);
        Self::register_globals(&mut env, states);
        Self::register_tests(&mut env);

        Self { env }
    }

    fn register_filters(env: &mut Environment<'static>) {
        env.add_filter("float", filters::to_float);
        env.add_filter("int", filters::to_int);
        env.add_filter("round", filters::round_filter);
        env.add_filter("to_json", filters::to_json);
        env.add_filter("tojson", filters::to_json);
    }

    fn register_globals(env: &mut Environment<'static>, states: SnapshotStates) {
        let for_state_attr = states.clone();
        env.add_function("state_attr", move |entity_id: &str, attribute: &str| {
            for_state_attr.state_attr(entity_id, attribute)
        });

        env.add_function(
            "is_state_attr",
            move |entity_id: &str, attribute: &str, value: Value| {
                states.is_state_attr(entity_id, attribute, &value)
            },
        );
    }

    fn register_tests(env: &mut Environment<'static>) {
        env.add_test("number", filters::is_number);
        env.add_test("defined", filters::is_defined);
    }

    /// Render a template string
    pub fn render(&self, template: &str) -> TemplateResult<String> {
        debug!("Rendering template: {}", template);
        let tmpl = self.env.template_from_str(template)?;
        Ok(tmpl.render(())?)
    }
}
