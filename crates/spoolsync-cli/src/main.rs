//! SpoolSync command line
//!
//! Reads an entity snapshot (the JSON array returned by `/api/states`),
//! discovers printers and either prints or merges the generated
//! automations and helpers.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use spoolsync_config::{apply_to_file, MergeKind, Settings};
use spoolsync_discovery::{discover_printers, tray_slots};
use spoolsync_generator::{generate, ActiveTrayTemplate, GeneratorOptions};
use spoolsync_template::{preview_active_tray, TemplateEngine};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod snapshot;

#[derive(Parser)]
#[command(name = "spoolsync")]
#[command(about = "Filament tracking automations for AMS printers", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the discovered printers and tray slots as JSON
    Discover {
        /// Entity state snapshot
        #[arg(long, env = "SPOOLSYNC_STATES")]
        states: PathBuf,
        /// Spool list exported from the inventory service
        #[arg(long)]
        spools: Option<PathBuf>,
    },
    /// Generate automations and helpers for the first printer
    Generate {
        /// Entity state snapshot
        #[arg(long, env = "SPOOLSYNC_STATES")]
        states: PathBuf,
        /// Settings file
        #[arg(long, env = "SPOOLSYNC_SETTINGS", default_value = "spoolsync.yaml")]
        settings: PathBuf,
        /// Merge into the Home Assistant configuration instead of printing
        #[arg(long)]
        write: bool,
        /// Add a generation timestamp to the header comments
        #[arg(long)]
        stamp: bool,
    },
    /// Evaluate the active tray template against the snapshot
    Preview {
        /// Entity state snapshot
        #[arg(long, env = "SPOOLSYNC_STATES")]
        states: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Discover { states, spools } => discover(&states, spools.as_deref()),
        Commands::Generate {
            states,
            settings,
            write,
            stamp,
        } => generate_config(&states, &settings, write, stamp),
        Commands::Preview { states } => preview(&states),
    }
}

fn discover(states: &Path, spools: Option<&Path>) -> Result<()> {
    let states = snapshot::load_states(states)?;
    let printers = discover_printers(&states);
    let spools = match spools {
        Some(path) => snapshot::load_spools(path)?,
        None => Vec::new(),
    };

    let output = serde_json::json!({
        "printers": printers,
        "tray_slots": tray_slots(&printers, &spools),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn generate_config(states: &Path, settings: &Path, write: bool, stamp: bool) -> Result<()> {
    let settings = Settings::load(settings)
        .with_context(|| format!("failed to load settings from {}", settings.display()))?;
    let states = snapshot::load_states(states)?;
    let printers = discover_printers(&states);

    let options = GeneratorOptions {
        min_reportable_usage: settings.min_reportable_usage,
        generated_at: stamp.then(Utc::now),
        ..GeneratorOptions::new(&settings.webhook_url, &settings.spoolman_url)
    };
    let config = generate(&printers, &options).context("failed to render configuration")?;

    if config.is_empty() {
        warn!(
            "Nothing to generate: {} printers discovered, none with trays",
            config.printer_count
        );
        return Ok(());
    }
    for entity in &config.missing_entities {
        warn!("Missing entity: {}", entity);
    }

    if !write {
        print!("{}", config.automation_text);
        println!("---");
        print!("{}", config.config_text);
        return Ok(());
    }

    for (path, text, kind) in [
        (
            settings.automations_path(),
            &config.automation_text,
            MergeKind::Automations,
        ),
        (settings.package_path(), &config.config_text, MergeKind::Block),
    ] {
        let changed = apply_to_file(&path, text, kind)
            .with_context(|| format!("failed to update {}", path.display()))?;
        if changed {
            info!("Wrote {}", path.display());
        } else {
            info!("{} already up to date", path.display());
        }
    }
    Ok(())
}

fn preview(states: &Path) -> Result<()> {
    let states = snapshot::load_states(states)?;
    let printers = discover_printers(&states);
    let Some(printer) = printers.first() else {
        warn!("No printers discovered");
        println!("none");
        return Ok(());
    };

    let template = ActiveTrayTemplate::for_printer(printer).render();
    let engine = TemplateEngine::new(&states);
    match preview_active_tray(&engine, &template).context("failed to evaluate template")? {
        Some(id) => match printer.tray(id) {
            Some(tray) => println!("{} ({})", id, tray.id),
            None => println!("{}", id),
        },
        None => println!("none"),
    }
    Ok(())
}
