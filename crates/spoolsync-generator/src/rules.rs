//! Generated automation rules
//!
//! Home Assistant rules cannot keep variables between runs, so usage
//! tracking is a small state machine over two helpers:
//!
//! - `last_active_tray` holds the composite id that was feeding the printer
//! - `pending_usage` accumulates grams used since the last report
//!
//! When the active tray changes, or a print ends, the usage accumulated on
//! the previous tray is reported, the accumulator is reset, and the new
//! tray is remembered.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde_json::{json, Value};
use spoolsync_automation::{
    Action, AutomationConfig, Condition, ExecutionMode, StateMatch, StateTrigger, Target, Trigger,
};
use spoolsync_core::{attrs, CompositeTrayId, EntityId, Printer, STATE_UNAVAILABLE, STATE_UNKNOWN};

use crate::helpers::{
    ACCUMULATOR_AUTOMATION_ID, ACTIVE_TRAY_SENSOR, LAST_ACTIVE_TRAY, PENDING_USAGE, REPORT_TRAY_CHANGE,
    REPORT_USAGE, RUNNING_STATE, TERMINAL_GUARD_STATES, TERMINAL_STATES, TRAY_CHANGE_AUTOMATION_ID,
    USAGE_AUTOMATION_ID,
};
use crate::text::{comment_text, jinja_string};

/// Trigger id of the active tray change
pub const TRIGGER_TRAY_CHANGE: &str = "tray_change";

/// Trigger id of the print end
pub const TRIGGER_PRINT_END: &str = "print_end";

const SET_VALUE: &str = "input_number.set_value";

fn data(entries: impl IntoIterator<Item = (&'static str, Value)>) -> IndexMap<String, Value> {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn set_value(entity_id: &str, value: Value) -> Action {
    Action::service(
        SET_VALUE,
        Some(Target::entity(entity_id)),
        data([("value", value)]),
    )
}

fn attribute(entity: &str, key: &str) -> String {
    format!("{{{{ state_attr({}, {}) or '' }}}}", entity, jinja_string(key))
}

/// Jinja dict literal mapping composite ids to tray entity ids
fn tray_lookup(tray_map: &BTreeMap<CompositeTrayId, EntityId>) -> String {
    let entries: Vec<String> = tray_map
        .iter()
        .map(|(id, entity)| format!("{}: {}", id, jinja_string(&entity.to_string())))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

/// Report usage of the previous tray on tray change or print end
pub fn filament_usage(
    printer: &Printer,
    tray_map: &BTreeMap<CompositeTrayId, EntityId>,
    min_reportable_usage: f64,
) -> AutomationConfig {
    let mut automation = AutomationConfig::new(USAGE_AUTOMATION_ID, "SpoolSync: Filament Usage");
    automation.description = Some(format!(
        "Reports filament used on {} when the active tray changes or a print ends",
        comment_text(&printer.name)
    ));
    automation.mode = ExecutionMode::Queued;

    let unusable = [STATE_UNAVAILABLE, STATE_UNKNOWN];
    automation.triggers = vec![
        Trigger::State(
            StateTrigger::new(ACTIVE_TRAY_SENSOR)
                .with_id(TRIGGER_TRAY_CHANGE)
                .not_from(unusable)
                .not_to(unusable),
        ),
        Trigger::State(
            StateTrigger::new(printer.id.to_string())
                .with_id(TRIGGER_PRINT_END)
                .to(StateMatch::any_of(TERMINAL_STATES))
                .not_from(TERMINAL_GUARD_STATES.iter().copied()),
        ),
    ];

    let is_tray_change = format!("trigger.id == {}", jinja_string(TRIGGER_TRAY_CHANGE));
    let mut variables = IndexMap::new();
    variables.insert(
        "previous_id".to_string(),
        json!(format!(
            "{{{{ (trigger.from_state.state if {} else states({})) | float(-1) | int }}}}",
            is_tray_change,
            jinja_string(LAST_ACTIVE_TRAY)
        )),
    );
    variables.insert(
        "new_id".to_string(),
        json!(format!(
            "{{{{ (trigger.to_state.state | float(-1) | int) if {} else -1 }}}}",
            is_tray_change
        )),
    );
    variables.insert(
        "used".to_string(),
        json!(format!(
            "{{{{ states({}) | float(0) }}}}",
            jinja_string(PENDING_USAGE)
        )),
    );
    variables.insert(
        "tray_entity".to_string(),
        json!(format!(
            "{{{{ {}.get(previous_id, '') }}}}",
            tray_lookup(tray_map)
        )),
    );

    let report = Action::service(
        format!("rest_command.{}", REPORT_USAGE),
        None,
        data([
            ("name", json!(attribute("tray_entity", attrs::NAME))),
            ("material", json!(attribute("tray_entity", attrs::MATERIAL))),
            ("serial", json!(attribute("tray_entity", attrs::SERIAL))),
            ("usedAmount", json!("{{ used | round(2) }}")),
            ("color", json!(attribute("tray_entity", attrs::COLOR))),
            ("activeTrayId", json!("{{ tray_entity }}")),
        ]),
    );

    automation.actions = vec![
        Action::variables(variables),
        Action::when(
            vec![Condition::template(format!(
                "{{{{ previous_id >= 0 and used >= {} and tray_entity != '' }}}}",
                min_reportable_usage
            ))],
            vec![report],
        ),
        set_value(PENDING_USAGE, json!(0)),
        Action::when(
            vec![Condition::template("{{ new_id >= 0 }}")],
            vec![set_value(LAST_ACTIVE_TRAY, json!("{{ new_id }}"))],
        ),
    ];

    automation
}

/// Report serial or name changes on any tray
pub fn tray_change(printer: &Printer) -> AutomationConfig {
    let mut automation =
        AutomationConfig::new(TRAY_CHANGE_AUTOMATION_ID, "SpoolSync: Tray Change");
    automation.description = Some(format!(
        "Reports spools loaded into or removed from {}",
        comment_text(&printer.name)
    ));
    automation.mode = ExecutionMode::Queued;

    let trays: Vec<String> = printer.trays().map(|tray| tray.id.to_string()).collect();
    automation.triggers = [attrs::SERIAL, attrs::NAME]
        .into_iter()
        .map(|key| Trigger::State(StateTrigger::new(trays.clone()).with_attribute(key)))
        .collect();

    let differs = |key: &str| {
        format!(
            "trigger.from_state.attributes.get({key}) != trigger.to_state.attributes.get({key})",
            key = jinja_string(key)
        )
    };
    automation.conditions = vec![Condition::template(format!(
        "{{{{ trigger.from_state is not none and trigger.to_state is not none and ({} or {}) }}}}",
        differs(attrs::SERIAL),
        differs(attrs::NAME)
    ))];

    let reported = |key: &str| {
        json!(format!(
            "{{{{ trigger.to_state.attributes.get({}, '') }}}}",
            jinja_string(key)
        ))
    };
    automation.actions = vec![Action::service(
        format!("rest_command.{}", REPORT_TRAY_CHANGE),
        None,
        data([
            ("trayEntityId", json!("{{ trigger.entity_id }}")),
            ("serial", reported(attrs::SERIAL)),
            ("name", reported(attrs::NAME)),
            ("material", reported(attrs::MATERIAL)),
            ("color", reported(attrs::COLOR)),
        ]),
    )];

    automation
}

/// Add print weight × progress delta to the accumulator while printing
///
/// `None` when the printer has no weight or no progress sensor.
pub fn usage_accumulator(printer: &Printer) -> Option<AutomationConfig> {
    let weight = printer.sensors.print_weight.as_ref()?;
    let progress = printer.sensors.print_progress.as_ref()?;

    let mut automation =
        AutomationConfig::new(ACCUMULATOR_AUTOMATION_ID, "SpoolSync: Usage Accumulator");
    automation.description = Some(format!(
        "Accumulates filament used by {} while printing",
        comment_text(&printer.name)
    ));
    automation.mode = ExecutionMode::Queued;
    automation.triggers = vec![Trigger::State(StateTrigger::new(progress.to_string()))];

    let progress_delta =
        "(trigger.to_state.state | float(0)) - (trigger.from_state.state | float(0))";
    automation.conditions = vec![
        Condition::state(printer.id.to_string(), StateMatch::Single(RUNNING_STATE.to_string())),
        Condition::template(format!(
            "{{{{ trigger.from_state is not none and trigger.to_state is not none and ({}) > 0 }}}}",
            progress_delta
        )),
    ];
    automation.actions = vec![set_value(
        PENDING_USAGE,
        json!(format!(
            "{{{{ (states({}) | float(0) + (states({}) | float(0)) * ({}) / 100) | round(3) }}}}",
            jinja_string(PENDING_USAGE),
            jinja_string(&weight.to_string()),
            progress_delta
        )),
    )];

    Some(automation)
}
