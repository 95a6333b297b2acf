//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files, merging
//! configurations with proper precedence rules, and reading `TF_*`
//! environment variables.

use crate::classifier::validate_tld_entry;
use crate::error::TldFilterError;
use crate::utils::parse_bool;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// Extra global -> localized TLD pairs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localized_tlds: Option<BTreeMap<String, String>>,

    /// Output formatting preferences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Default target suffix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    /// Default pretty output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,

    /// Show localized TLD and reference count columns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<bool>,
}

/// Output formatting configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Emit JSON instead of text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

/// Configuration discovery and loading functionality.
#[derive(Debug, Default)]
pub struct ConfigManager;

impl ConfigManager {
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// `FileError` if the file is missing or unreadable, `ConfigError` if it
    /// is not valid TOML or fails validation.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, TldFilterError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(TldFilterError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            TldFilterError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            TldFilterError::config(format!("Failed to parse TOML configuration: {}", e))
        })?;

        self.validate_config(&config)?;
        debug!(path = %path.display(), "loaded configuration file");

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config is lowest, then the global file in `$HOME`, then the local
    /// file in the working directory. A file that fails to load is skipped
    /// with a warning.
    pub fn discover_and_load(&self) -> Result<FileConfig, TldFilterError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    merged_config = self.merge_configs(merged_config, config);
                    loaded_files.push(path);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "skipping config file"),
            }
        }

        if loaded_files.len() > 1 {
            debug!(
                files = ?loaded_files,
                "multiple config files merged, later files take precedence"
            );
        }

        Ok(merged_config)
    }

    /// Local configuration file in the current directory.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./tld-filter.toml", "./.tld-filter.toml"];

        candidates
            .iter()
            .map(|candidate| Path::new(*candidate))
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    /// Global configuration file in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        [".tld-filter.toml", "tld-filter.toml"]
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// XDG configuration file, following the XDG Base Directory Specification.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("tld-filter").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations; values from `higher` win.
    pub fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: match (lower.defaults, higher.defaults) {
                (Some(mut lower_defaults), Some(higher_defaults)) => {
                    if higher_defaults.suffix.is_some() {
                        lower_defaults.suffix = higher_defaults.suffix;
                    }
                    if higher_defaults.pretty.is_some() {
                        lower_defaults.pretty = higher_defaults.pretty;
                    }
                    if higher_defaults.info.is_some() {
                        lower_defaults.info = higher_defaults.info;
                    }
                    Some(lower_defaults)
                }
                (lower_defaults, higher_defaults) => higher_defaults.or(lower_defaults),
            },
            localized_tlds: match (lower.localized_tlds, higher.localized_tlds) {
                (Some(mut lower_pairs), Some(higher_pairs)) => {
                    lower_pairs.extend(higher_pairs);
                    Some(lower_pairs)
                }
                (lower_pairs, higher_pairs) => higher_pairs.or(lower_pairs),
            },
            output: higher.output.or(lower.output),
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), TldFilterError> {
        if let Some(suffix) = config.defaults.as_ref().and_then(|d| d.suffix.as_ref()) {
            validate_suffix(suffix)?;
        }

        if let Some(pairs) = &config.localized_tlds {
            for (tld, localized) in pairs {
                validate_tld_entry(tld)?;
                validate_tld_entry(localized)?;
            }
        }

        Ok(())
    }
}

/// Check that a target suffix is usable.
///
/// Any string without whitespace is accepted, including the empty string
/// (which matches every record).
pub fn validate_suffix(suffix: &str) -> Result<(), TldFilterError> {
    if suffix.chars().any(char::is_whitespace) {
        return Err(TldFilterError::config(format!(
            "Invalid suffix '{}': must not contain whitespace",
            suffix
        )));
    }
    Ok(())
}

/// Configuration values set through `TF_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub suffix: Option<String>,
    pub pretty: Option<bool>,
    pub info: Option<bool>,
    pub json: Option<bool>,
    pub config: Option<String>,
}

impl EnvConfig {
    /// Build from an arbitrary variable lookup. Invalid values are logged and
    /// ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut env_config = EnvConfig::default();

        if let Some(suffix) = lookup("TF_SUFFIX") {
            match validate_suffix(&suffix) {
                Ok(()) => {
                    debug!(value = %suffix, "using TF_SUFFIX");
                    env_config.suffix = Some(suffix);
                }
                Err(e) => warn!(error = %e, "ignoring TF_SUFFIX"),
            }
        }

        env_config.pretty = lookup_bool(&lookup, "TF_PRETTY");
        env_config.info = lookup_bool(&lookup, "TF_INFO");
        env_config.json = lookup_bool(&lookup, "TF_JSON");

        if let Some(path) = lookup("TF_CONFIG") {
            if !path.trim().is_empty() {
                debug!(value = %path, "using TF_CONFIG");
                env_config.config = Some(path);
            }
        }

        env_config
    }
}

fn lookup_bool<F>(lookup: &F, key: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match parse_bool(&raw) {
        Some(value) => {
            debug!(key, value, "using boolean environment setting");
            Some(value)
        }
        None => {
            warn!(key, value = %raw, "invalid boolean, use true/false");
            None
        }
    }
}

/// Load configuration from the process environment.
pub fn load_env_config() -> EnvConfig {
    EnvConfig::from_lookup(|key| env::var(key).ok())
}
