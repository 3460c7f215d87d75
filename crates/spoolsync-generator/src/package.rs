//! Helper configuration written to the package file
//!
//! The generated automations keep their state in two `input_number`
//! helpers and read the active tray from a template sensor. The package
//! also declares the inventory REST sensor and the `rest_command`s that
//! post reports to the webhook.

use indexmap::IndexMap;
use serde::Serialize;
use spoolsync_core::Printer;

use crate::active_tray::ActiveTrayTemplate;
use crate::helpers::{self, object_id};
use crate::text::{jinja_string, literal_template};

/// A package file fragment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageConfig {
    pub input_number: IndexMap<String, InputNumber>,
    pub template: Vec<TemplateBlock>,
    pub sensor: Vec<RestSensor>,
    pub rest_command: IndexMap<String, RestCommand>,
}

/// `input_number` helper
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputNumber {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// One entry of the `template:` integration list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateBlock {
    pub sensor: Vec<TemplateSensor>,
}

/// Template sensor definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateSensor {
    pub name: String,
    pub unique_id: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
}

/// REST sensor polling the inventory service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestSensor {
    pub platform: String,
    pub name: String,
    pub unique_id: String,
    pub resource: String,
    pub method: String,
    pub value_template: String,
    pub scan_interval: u32,
}

/// Outbound HTTP call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestCommand {
    pub url: String,
    pub method: String,
    pub content_type: String,
    pub payload: String,
}

/// Inventory REST sensor poll interval, in seconds
const INVENTORY_SCAN_INTERVAL: u32 = 300;

/// Fields of a usage report, in payload order
pub const USAGE_FIELDS: &[&str] = &[
    "name",
    "material",
    "serial",
    "usedAmount",
    "color",
    "activeTrayId",
];

/// Fields of a tray change report, in payload order
pub const TRAY_CHANGE_FIELDS: &[&str] = &["trayEntityId", "serial", "name", "material", "color"];

/// JSON payload template for a report with an `event` discriminator
///
/// `usedAmount` is sent as a number, everything else as a JSON string.
fn payload(event: &str, fields: &[&str]) -> String {
    let mut parts = vec![format!("\"event\": \"{}\"", event)];
    for field in fields {
        let value = if *field == "usedAmount" {
            format!("{{{{ {} | float(0) }}}}", field)
        } else {
            format!("{{{{ ({} or '') | string | tojson }}}}", field)
        };
        parts.push(format!("\"{}\": {}", field, value));
    }
    format!("{{{}}}", parts.join(", "))
}

impl PackageConfig {
    /// Helpers for one printer
    pub fn build(
        printer: &Printer,
        active_tray: &ActiveTrayTemplate,
        webhook_url: &str,
        spoolman_url: &str,
    ) -> Self {
        let mut input_number = IndexMap::new();
        input_number.insert(
            object_id(helpers::LAST_ACTIVE_TRAY).to_string(),
            InputNumber {
                name: "SpoolSync Last Active Tray".to_string(),
                min: -1.0,
                max: 99.0,
                step: 1.0,
                mode: "box".to_string(),
                unit_of_measurement: None,
                icon: Some("mdi:tray".to_string()),
            },
        );
        input_number.insert(
            object_id(helpers::PENDING_USAGE).to_string(),
            InputNumber {
                name: "SpoolSync Pending Usage".to_string(),
                min: 0.0,
                max: 100000.0,
                step: 0.001,
                mode: "box".to_string(),
                unit_of_measurement: Some("g".to_string()),
                icon: Some("mdi:weight-gram".to_string()),
            },
        );

        let mut attributes = IndexMap::new();
        attributes.insert("printer".to_string(), literal_template(&printer.name));
        attributes.insert(
            "printer_status".to_string(),
            literal_template(&printer.id.to_string()),
        );
        if let Some(stage) = &printer.sensors.current_stage {
            attributes.insert(
                "current_stage".to_string(),
                format!(
                    "{{{{ states({}) }}}}",
                    jinja_string(&stage.to_string())
                ),
            );
        }

        let template = vec![TemplateBlock {
            sensor: vec![TemplateSensor {
                name: "SpoolSync Active Tray".to_string(),
                unique_id: object_id(helpers::ACTIVE_TRAY_SENSOR).to_string(),
                state: active_tray.render(),
                icon: Some("mdi:printer-3d-nozzle".to_string()),
                attributes,
            }],
        }];

        let sensor = vec![RestSensor {
            platform: "rest".to_string(),
            name: "SpoolSync Inventory Spools".to_string(),
            unique_id: object_id(helpers::INVENTORY_SENSOR).to_string(),
            resource: format!("{}/api/v1/spool", spoolman_url.trim_end_matches('/')),
            method: "GET".to_string(),
            value_template: "{{ value_json | length }}".to_string(),
            scan_interval: INVENTORY_SCAN_INTERVAL,
        }];

        let mut rest_command = IndexMap::new();
        rest_command.insert(
            helpers::REPORT_USAGE.to_string(),
            RestCommand::post_json(webhook_url, payload("spool_usage", USAGE_FIELDS)),
        );
        rest_command.insert(
            helpers::REPORT_TRAY_CHANGE.to_string(),
            RestCommand::post_json(webhook_url, payload("tray_change", TRAY_CHANGE_FIELDS)),
        );

        Self {
            input_number,
            template,
            sensor,
            rest_command,
        }
    }
}

impl RestCommand {
    fn post_json(url: &str, payload: String) -> Self {
        Self {
            url: url.to_string(),
            method: "POST".to_string(),
            content_type: "application/json".to_string(),
            payload,
        }
    }
}
