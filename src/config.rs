//! Configuration module for the object graph serializer.
//!
//! Provides a layered configuration system:
//! - Default values
//! - TOML configuration file (`.h5graph/settings.toml`)
//! - Environment variable overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `H5GRAPH_` and use double
//! underscores to separate nested levels:
//! - `H5GRAPH_ARRAY__GZIP_LEVEL=9` sets `array.gzip_level`
//! - `H5GRAPH_WALKER__PIN_LIVE_VALUES=false` sets `walker.pin_live_values`

use figment::{Figment, providers::{Format, Toml, Env, Serialized}};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::Encoding;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Array (dataset) encoding settings
    #[serde(default)]
    pub array: ArrayConfig,

    /// Graph walker settings
    #[serde(default)]
    pub walker: WalkerConfig,

    /// Default encoding policy for legacy (`py2_bytes`) byte nodes
    #[serde(default = "default_legacy_encoding")]
    pub legacy_encoding: Encoding,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default level applied when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-module level overrides, merged into the `EnvFilter` directive
    #[serde(default)]
    pub modules: std::collections::HashMap<String, String>,
}

fn default_log_level() -> String { "warn".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: std::collections::HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ArrayConfig {
    /// gzip compression level applied to array datasets (0 disables it)
    #[serde(default = "default_gzip_level")]
    pub gzip_level: u8,

    /// Attach a fletcher32 checksum filter to array datasets
    #[serde(default = "default_true")]
    pub checksum: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WalkerConfig {
    /// Keep every memoized value alive for the duration of a save, guarding
    /// against identity-hazard false aliasing (spec.md Sec.5).
    #[serde(default = "default_true")]
    pub pin_live_values: bool,

    /// Fail fast on the first `Dict`/`Set` child-name collision rather than
    /// continuing the traversal.
    #[serde(default = "default_true")]
    pub fail_on_name_collision: bool,
}

fn default_version() -> u32 { 1 }
fn default_gzip_level() -> u8 { 4 }
fn default_true() -> bool { true }
fn default_legacy_encoding() -> Encoding { Encoding::Bytes }

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            array: ArrayConfig::default(),
            walker: WalkerConfig::default(),
            legacy_encoding: default_legacy_encoding(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self {
            gzip_level: default_gzip_level(),
            checksum: true,
        }
    }
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            pin_live_values: true,
            fail_on_name_collision: true,
        }
    }
}

impl Settings {
    /// Load configuration from all sources, searching for a workspace
    /// `.h5graph` directory from the current directory upward.
    pub fn load() -> Result<Self, figment::Error> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(".h5graph/settings.toml"));

        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            .merge(
                Env::prefixed("H5GRAPH_")
                    .map(|key| key.as_str().to_lowercase().replace("__", ".").into()),
            )
            .extract()
    }

    /// Load configuration from a specific file, still layering defaults and
    /// environment variables on top.
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("H5GRAPH_").split("__"))
            .extract()
    }

    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(".h5graph");
            if config_dir.is_dir() {
                return Some(config_dir.join("settings.toml"));
            }
        }
        None
    }

    /// Save current configuration to file.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> anyhow::Result<()> {
        let parent = path
            .as_ref()
            .parent()
            .ok_or_else(|| anyhow::anyhow!("invalid path: {}", path.as_ref().display()))?;
        std::fs::create_dir_all(parent)?;
        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }

    /// Create a default settings file under `.h5graph/settings.toml`.
    pub fn init_config_file(force: bool) -> anyhow::Result<PathBuf> {
        let config_path = PathBuf::from(".h5graph/settings.toml");
        if !force && config_path.exists() {
            anyhow::bail!("configuration file already exists. Use --force to overwrite");
        }
        Settings::default().save(&config_path)?;
        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.version, 1);
        assert_eq!(settings.array.gzip_level, 4);
        assert!(settings.walker.pin_live_values);
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("settings.toml");

        let toml_content = r#"
version = 2

[array]
gzip_level = 9
checksum = false

[walker]
pin_live_values = false
"#;
        fs::write(&config_path, toml_content).unwrap();

        let settings = Settings::load_from(&config_path).unwrap();
        assert_eq!(settings.version, 2);
        assert_eq!(settings.array.gzip_level, 9);
        assert!(!settings.array.checksum);
        assert!(!settings.walker.pin_live_values);
    }

    #[test]
    fn test_save_settings() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("settings.toml");

        let mut settings = Settings::default();
        settings.array.gzip_level = 1;

        settings.save(&config_path).unwrap();

        let loaded = Settings::load_from(&config_path).unwrap();
        assert_eq!(loaded.array.gzip_level, 1);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("settings.toml");

        fs::write(&config_path, "[array]\ngzip_level = 2\n").unwrap();

        let settings = Settings::load_from(&config_path).unwrap();
        assert_eq!(settings.array.gzip_level, 2);
        assert!(settings.walker.fail_on_name_collision);
    }
}
