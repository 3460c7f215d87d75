//! SpoolSync settings
//!
//! Loaded from a YAML file (usually `spoolsync.yaml`) that may use
//! `!secret`, `!env_var` and `!include`.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::loader::YamlLoader;

/// Settings for generation and for writing the generated files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Endpoint receiving usage and tray change reports
    pub webhook_url: String,

    /// Inventory service base URL
    pub spoolman_url: String,

    /// Home Assistant configuration directory
    #[serde(default = "default_ha_config_dir")]
    pub ha_config_dir: PathBuf,

    /// Automation list, relative to `ha_config_dir`
    #[serde(default = "default_automations_file")]
    pub automations_file: PathBuf,

    /// Helper package, relative to `ha_config_dir`
    #[serde(default = "default_package_file")]
    pub package_file: PathBuf,

    /// Usage below this many grams is not reported
    #[serde(default = "default_min_reportable_usage")]
    pub min_reportable_usage: f64,
}

fn default_ha_config_dir() -> PathBuf {
    PathBuf::from("/config")
}

fn default_automations_file() -> PathBuf {
    PathBuf::from("automations.yaml")
}

fn default_package_file() -> PathBuf {
    PathBuf::from("packages/spoolsync.yaml")
}

fn default_min_reportable_usage() -> f64 {
    0.01
}

impl Settings {
    /// Load settings from a file, resolving secrets next to it
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut loader = YamlLoader::new(dir)?;
        let yaml = loader.load_file(path.file_name().map_or(path, Path::new))?;
        let settings = Self::from_yaml(yaml)?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Parse and validate settings from a processed YAML value
    pub fn from_yaml(yaml: Value) -> ConfigResult<Self> {
        if !yaml.is_mapping() {
            return Err(ConfigError::InvalidValue {
                key: "root".to_string(),
                reason: "settings must be a mapping".to_string(),
            });
        }

        let settings: Settings =
            serde_yaml::from_value(yaml).map_err(|e| ConfigError::InvalidValue {
                key: "settings".to_string(),
                reason: e.to_string(),
            })?;
        settings.normalized()
    }

    fn normalized(mut self) -> ConfigResult<Self> {
        self.webhook_url = normalize_url("webhook_url", &self.webhook_url)?;
        self.spoolman_url = normalize_url("spoolman_url", &self.spoolman_url)?;
        if !self.min_reportable_usage.is_finite() || self.min_reportable_usage < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "min_reportable_usage".to_string(),
                reason: format!(
                    "must be a non-negative number, got {}",
                    self.min_reportable_usage
                ),
            });
        }
        Ok(self)
    }

    /// Full path of the automation list
    pub fn automations_path(&self) -> PathBuf {
        self.ha_config_dir.join(&self.automations_file)
    }

    /// Full path of the helper package
    pub fn package_path(&self) -> PathBuf {
        self.ha_config_dir.join(&self.package_file)
    }
}

/// Trim whitespace and trailing slashes; require an http(s) URL with a host
pub fn normalize_url(key: &str, value: &str) -> ConfigResult<String> {
    let url = value.trim().trim_end_matches('/');
    let host = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    match host {
        Some(host) if !host.is_empty() && !host.contains(char::is_whitespace) => {
            Ok(url.to_string())
        }
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("'{}' is not an http(s) URL", value),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> ConfigResult<Settings> {
        Settings::from_yaml(serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn test_defaults() {
        let settings = parse(
            "webhook_url: http://spoolsync:3000/api/webhook\nspoolman_url: http://spoolman:7912\n",
        )
        .unwrap();
        assert_eq!(settings.ha_config_dir, PathBuf::from("/config"));
        assert_eq!(settings.min_reportable_usage, 0.01);
        assert_eq!(
            settings.automations_path(),
            PathBuf::from("/config/automations.yaml")
        );
        assert_eq!(
            settings.package_path(),
            PathBuf::from("/config/packages/spoolsync.yaml")
        );
    }

    #[test]
    fn test_urls_are_trimmed() {
        let settings = parse(
            "webhook_url: ' https://spoolsync.example/api/webhook/ '\nspoolman_url: http://spoolman:7912//\n",
        )
        .unwrap();
        assert_eq!(settings.webhook_url, "https://spoolsync.example/api/webhook");
        assert_eq!(settings.spoolman_url, "http://spoolman:7912");
    }

    #[test]
    fn test_invalid_url() {
        let result = parse("webhook_url: spoolsync.local\nspoolman_url: http://spoolman\n");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { key, .. }) if key == "webhook_url"
        ));
        assert!(normalize_url("spoolman_url", "http://").is_err());
    }

    #[test]
    fn test_missing_required_field() {
        assert!(matches!(
            parse("webhook_url: http://a\n"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_negative_threshold() {
        assert!(parse("webhook_url: http://a\nspoolman_url: http://b\nmin_reportable_usage: -1\n").is_err());
    }

    #[test]
    fn test_not_a_mapping() {
        assert!(parse("- a\n- b\n").is_err());
    }
}
