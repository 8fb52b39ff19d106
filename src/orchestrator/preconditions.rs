//! Environment checks run before an orchestrator is created.

use crate::config::Settings;
use crate::error::{Result, ToolsmithError};
use crate::shell::{is_elevated, parse_system_path, resolve_tool_path, Platform};
use std::path::PathBuf;

/// Validates that the environment can run toolsmith.
pub trait PreconditionValidator {
    /// Fail with [`ToolsmithError::PreconditionFailed`] on the first unmet check.
    fn validate(&self, settings: &Settings) -> Result<()>;
}

/// Checks platform support, elevation, required commands and a home directory.
#[derive(Debug, Clone)]
pub struct PlatformPreconditions {
    platform: Platform,
    elevated: bool,
    search_path: Vec<PathBuf>,
    home: Option<PathBuf>,
}

impl PlatformPreconditions {
    /// Snapshot of the current process environment.
    pub fn current() -> Self {
        Self {
            platform: Platform::current(),
            elevated: is_elevated(),
            search_path: parse_system_path(),
            home: dirs::home_dir(),
        }
    }

    /// Explicit environment, for tests and embedding.
    pub fn new(
        platform: Platform,
        elevated: bool,
        search_path: Vec<PathBuf>,
        home: Option<PathBuf>,
    ) -> Self {
        Self {
            platform,
            elevated,
            search_path,
            home,
        }
    }
}

fn failed(check: &str, message: String) -> ToolsmithError {
    ToolsmithError::PreconditionFailed {
        check: check.to_string(),
        message,
    }
}

impl PreconditionValidator for PlatformPreconditions {
    fn validate(&self, settings: &Settings) -> Result<()> {
        if !self.platform.is_supported() {
            return Err(failed(
                "platform",
                format!("{} is not a supported platform", self.platform),
            ));
        }

        if settings.require_elevated && !self.elevated {
            let how = if self.platform == Platform::Windows {
                "run from an elevated (Administrator) prompt"
            } else {
                "run as root"
            };
            return Err(failed("elevated", format!("administrator rights required; {}", how)));
        }

        if let Some(missing) = settings
            .required_commands
            .iter()
            .find(|cmd| resolve_tool_path(cmd, &self.search_path).is_none())
        {
            return Err(failed(
                "required-command",
                format!("'{}' was not found on PATH", missing),
            ));
        }

        if self.home.is_none() {
            return Err(failed(
                "home",
                "could not determine the home directory".to_string(),
            ));
        }

        tracing::debug!("Preconditions passed on {}", self.platform);
        Ok(())
    }
}

/// Validator that accepts any environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPreconditions;

impl PreconditionValidator for NoPreconditions {
    fn validate(&self, _settings: &Settings) -> Result<()> {
        Ok(())
    }
}
