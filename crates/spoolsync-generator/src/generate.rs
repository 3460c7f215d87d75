//! Generation entry point
//!
//! [`build`] turns a printer into typed rules and helpers, [`render`]
//! serializes them. [`generate`] does both for the first printer.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use spoolsync_automation::AutomationConfig;
use spoolsync_core::{CompositeTrayId, EntityId, Printer};
use tracing::{debug, info, warn};

use crate::active_tray::ActiveTrayTemplate;
use crate::error::GeneratorResult;
use crate::package::PackageConfig;
use crate::rules;
use crate::text::comment_text;

/// Default smallest usage, in grams, worth reporting
pub const DEFAULT_MIN_REPORTABLE_USAGE: f64 = 0.01;

/// Caller-supplied generation inputs
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorOptions {
    /// Endpoint receiving usage and tray change reports
    pub webhook_url: String,
    /// Inventory service base URL
    pub spoolman_url: String,
    /// Usage below this many grams is reset without a report
    pub min_reportable_usage: f64,
    /// Timestamp for the banner comment; `None` keeps output byte-stable
    pub generated_at: Option<DateTime<Utc>>,
}

impl GeneratorOptions {
    pub fn new(webhook_url: impl Into<String>, spoolman_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            spoolman_url: spoolman_url.into(),
            min_reportable_usage: DEFAULT_MIN_REPORTABLE_USAGE,
            generated_at: None,
        }
    }
}

/// Typed output of generation, before serialization
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedRules {
    pub printer_name: String,
    pub printer_id: EntityId,
    pub automations: Vec<AutomationConfig>,
    pub package: PackageConfig,
    pub active_tray: ActiveTrayTemplate,
    pub missing_entities: Vec<String>,
    pub tray_map: BTreeMap<CompositeTrayId, EntityId>,
    /// Display label per composite id, for comments
    pub tray_labels: BTreeMap<CompositeTrayId, String>,
}

/// Rendered artifacts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeneratedConfig {
    /// Automation list for `automations.yaml`
    pub automation_text: String,
    /// Helper package for the package file
    pub config_text: String,
    /// Printers discovered (only the first is generated)
    pub printer_count: usize,
    pub tray_count: usize,
    /// Structural entities the printer lacks
    pub missing_entities: Vec<String>,
    /// Tray entity per composite id
    pub tray_map: BTreeMap<CompositeTrayId, EntityId>,
}

impl GeneratedConfig {
    /// Nothing to configure
    pub fn empty(printer_count: usize) -> Self {
        Self {
            printer_count,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tray_count == 0
    }
}

/// Expected entity id of a structural sensor that was not found
fn expected_sensor(printer: &Printer, suffix: &str) -> String {
    format!("sensor.{}_{}", printer.prefix, suffix)
}

/// Build rules and helpers for one printer
pub fn build(printer: &Printer, options: &GeneratorOptions) -> GeneratedRules {
    let mut missing_entities = Vec::new();
    for (sensor, suffix) in [
        (&printer.sensors.current_stage, "current_stage"),
        (&printer.sensors.print_weight, "print_weight"),
        (&printer.sensors.print_progress, "print_progress"),
    ] {
        if sensor.is_none() {
            let expected = expected_sensor(printer, suffix);
            warn!("Printer {}: {} not found", printer.name, expected);
            missing_entities.push(expected);
        }
    }

    let mut tray_map = BTreeMap::new();
    let mut tray_labels = BTreeMap::new();
    for unit in &printer.ams_units {
        for tray in &unit.trays {
            tray_map.insert(tray.composite_id, tray.id.clone());
            tray_labels.insert(
                tray.composite_id,
                format!("{} Tray {}", unit.name, tray.tray_number),
            );
        }
    }
    if let Some(external) = &printer.external_spool {
        tray_map.insert(CompositeTrayId::EXTERNAL, external.id.clone());
        tray_labels.insert(CompositeTrayId::EXTERNAL, "External Spool".to_string());
    }

    let active_tray = ActiveTrayTemplate::for_printer(printer);
    let package = PackageConfig::build(
        printer,
        &active_tray,
        &options.webhook_url,
        &options.spoolman_url,
    );

    let mut automations = vec![
        rules::filament_usage(printer, &tray_map, options.min_reportable_usage),
        rules::tray_change(printer),
    ];
    match rules::usage_accumulator(printer) {
        Some(automation) => automations.push(automation),
        None => debug!(
            "Printer {}: no weight or progress sensor, usage accumulator skipped",
            printer.name
        ),
    }

    GeneratedRules {
        printer_name: printer.name.clone(),
        printer_id: printer.id.clone(),
        automations,
        package,
        active_tray,
        missing_entities,
        tray_map,
        tray_labels,
    }
}

fn header(title: &str, rules: &GeneratedRules, options: &GeneratorOptions) -> String {
    let mut lines = vec![format!(
        "# {} for {} ({})",
        title,
        comment_text(&rules.printer_name),
        rules.printer_id
    )];
    if let Some(at) = options.generated_at {
        lines.push(format!(
            "# Generated at {}",
            at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
    }
    lines.push("# Composite tray ids:".to_string());
    for (id, entity) in &rules.tray_map {
        let label = rules
            .tray_labels
            .get(id)
            .map(|label| comment_text(label))
            .unwrap_or_default();
        lines.push(format!("#   {} = {} ({})", id, entity, label));
    }
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Serialize built rules
pub fn render(
    rules: &GeneratedRules,
    options: &GeneratorOptions,
    printer_count: usize,
) -> GeneratorResult<GeneratedConfig> {
    for automation in &rules.automations {
        automation.validate()?;
    }

    let automation_text = format!(
        "{}{}",
        header("SpoolSync automations", rules, options),
        serde_yaml::to_string(&rules.automations)?
    );
    let config_text = format!(
        "{}{}",
        header("SpoolSync helpers", rules, options),
        serde_yaml::to_string(&rules.package)?
    );

    Ok(GeneratedConfig {
        automation_text,
        config_text,
        printer_count,
        tray_count: rules.tray_map.len(),
        missing_entities: rules.missing_entities.clone(),
        tray_map: rules.tray_map.clone(),
    })
}

/// Generate configuration for the first discovered printer
///
/// Zero printers, or a first printer without trays, yield an empty result.
pub fn generate(printers: &[Printer], options: &GeneratorOptions) -> GeneratorResult<GeneratedConfig> {
    let Some(printer) = printers.first() else {
        info!("No printers discovered, nothing to generate");
        return Ok(GeneratedConfig::empty(0));
    };
    if printers.len() > 1 {
        info!(
            "{} printers discovered, generating for {} only",
            printers.len(),
            printer.name
        );
    }
    if printer.tray_count() == 0 {
        info!("Printer {} has no trays, nothing to generate", printer.name);
        return Ok(GeneratedConfig::empty(printers.len()));
    }

    let rules = build(printer, options);
    let config = render(&rules, options, printers.len())?;
    info!(
        "Generated {} automations for {} with {} trays",
        rules.automations.len(),
        printer.name,
        config.tray_count
    );
    Ok(config)
}
