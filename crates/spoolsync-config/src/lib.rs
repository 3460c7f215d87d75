//! SpoolSync settings and file merging
//!
//! Settings are read from YAML with support for:
//!
//! - `!include path` - Include another YAML file
//! - `!secret key` - Substitute from secrets.yaml
//! - `!env_var VAR` - Environment variable substitution
//!
//! Generated automations and helpers are merged into the Home Assistant
//! configuration without touching anything the user wrote.
//!
//! # Example
//!
//! ```ignore
//! use spoolsync_config::{apply_to_file, MergeKind, Settings};
//!
//! let settings = Settings::load("/config/spoolsync.yaml")?;
//! apply_to_file(&settings.package_path(), &package_yaml, MergeKind::Block)?;
//! ```

mod error;
mod loader;
mod merge;
mod secrets;
mod settings;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_yaml, YamlLoader};
pub use merge::{
    apply_to_file, merge_automations, merge_block, MergeKind, BEGIN_BANNER, END_BANNER,
    GENERATED_ID_PREFIX,
};
pub use secrets::Secrets;
pub use settings::{normalize_url, Settings};

// Re-export serde_yaml::Value for convenience
pub use serde_yaml::Value;
