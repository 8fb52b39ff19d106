//! Configuration discovery and loading.
//!
//! Merge order (later overrides earlier):
//! 1. Built-in catalog embedded from `defaults/`
//! 2. User config (`~/.toolsmith/config.yml`), when present
//! 3. Explicit `--config <path>`, which must exist

use crate::config::builtin::builtin_layers;
use crate::config::merger::merge_configs;
use crate::config::schema::ToolkitConfig;
use crate::config::validator::validate;
use crate::error::{Result, ToolsmithError};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Config files that contributed to a loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// User config: ~/.toolsmith/config.yml
    pub user: Option<PathBuf>,

    /// File passed with `--config`
    pub explicit: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover the user config and pair it with an explicit override.
    pub fn discover(explicit: Option<&Path>) -> Self {
        Self {
            user: Self::find_user_config(),
            explicit: explicit.map(Path::to_path_buf),
        }
    }

    /// Only the given explicit file, ignoring the user config.
    pub fn explicit_only(path: &Path) -> Self {
        Self {
            user: None,
            explicit: Some(path.to_path_buf()),
        }
    }

    fn find_user_config() -> Option<PathBuf> {
        let path = user_config_path()?;
        path.exists().then_some(path)
    }

    /// Existing override files in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.user.iter().chain(self.explicit.iter()).collect()
    }
}

/// Location of the per-user config file.
pub fn user_config_path() -> Option<PathBuf> {
    Some(dirs::home_dir()?.join(".toolsmith").join("config.yml"))
}

/// Load a config file as a raw YAML value (for merging).
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist and
/// `ConfigParseError` if the YAML is invalid.
pub fn load_config_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ToolsmithError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ToolsmithError::Io(e)
        }
    })?;

    serde_yaml::from_str(&content).map_err(|e| ToolsmithError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parse YAML text into a configuration (no built-ins, no validation).
pub fn parse_config(content: &str, source_path: &Path) -> Result<ToolkitConfig> {
    let mut config: ToolkitConfig =
        serde_yaml::from_str(content).map_err(|e| ToolsmithError::ConfigParseError {
            path: source_path.to_path_buf(),
            message: e.to_string(),
        })?;
    config.fill_tool_names();
    Ok(config)
}

/// Merge the built-in catalog with the given override files and validate.
pub fn load_with_paths(paths: &ConfigPaths) -> Result<ToolkitConfig> {
    let mut layers: Vec<Value> = builtin_layers()?
        .into_iter()
        .map(|(_, value)| value)
        .collect();

    for path in paths.all_existing() {
        tracing::debug!("Loading config override {}", path.display());
        layers.push(load_config_value(path)?);
    }

    let merged = merge_configs(&layers);
    let source = paths
        .explicit
        .clone()
        .or_else(|| paths.user.clone())
        .unwrap_or_else(|| PathBuf::from("defaults"));

    let mut config: ToolkitConfig =
        serde_yaml::from_value(merged).map_err(|e| ToolsmithError::ConfigParseError {
            path: source,
            message: format!("Failed to parse merged config: {}", e),
        })?;
    config.fill_tool_names();

    validate(&config)?;
    Ok(config)
}

/// Load configuration: built-ins, then the user file, then `config_override`.
pub fn load_config(config_override: Option<&Path>) -> Result<ToolkitConfig> {
    load_with_paths(&ConfigPaths::discover(config_override))
}

/// The built-in catalog alone.
pub fn load_builtin() -> Result<ToolkitConfig> {
    load_with_paths(&ConfigPaths::default())
}
