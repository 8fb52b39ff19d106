//! Config command implementation.
//!
//! The `toolsmith config` command shows the resolved configuration.

use std::path::{Path, PathBuf};

use crate::cli::args::ConfigArgs;
use crate::config::{load_config, ConfigPaths};
use crate::error::{Result, ToolsmithError};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display::print_json;

/// The config command implementation.
pub struct ConfigCommand {
    config_path: Option<PathBuf>,
    args: ConfigArgs,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(config_path: Option<&Path>, args: ConfigArgs) -> Self {
        Self {
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = load_config(self.config_path.as_deref())?;

        if self.args.json {
            print_json(ui, &config)?;
            return Ok(CommandResult::success());
        }

        let paths = ConfigPaths::discover(self.config_path.as_deref());
        ui.message("# built-in catalog");
        for path in paths.all_existing() {
            ui.message(&format!("# {}", path.display()));
        }
        ui.message("");

        let yaml = serde_yaml::to_string(&config).map_err(|e| ToolsmithError::Other(e.into()))?;
        ui.raw(&yaml);

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn prints_merged_yaml_with_sources() {
        let temp = TempDir::new().unwrap();
        let extra = temp.path().join("extra.yml");
        fs::write(&extra, "settings:\n  functionality_threshold: 0.5\n").unwrap();

        let mut ui = MockUI::new();
        let result = ConfigCommand::new(Some(&extra), ConfigArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert!(ui.messages().iter().any(|m| m.contains("extra.yml")));
        assert!(ui.raw_output()[0].contains("functionality_threshold: 0.5"));
    }

    #[test]
    fn json_output() {
        let temp = TempDir::new().unwrap();
        let extra = temp.path().join("extra.yml");
        fs::write(&extra, "settings:\n  max_parallel: 2\n").unwrap();

        let mut ui = MockUI::new();
        ConfigCommand::new(Some(&extra), ConfigArgs { json: true })
            .execute(&mut ui)
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&ui.raw_output()[0]).unwrap();
        assert_eq!(json["settings"]["max_parallel"], 2);
        assert!(json["tools"]["git"].is_object());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let mut ui = MockUI::new();
        let err = ConfigCommand::new(
            Some(Path::new("/nonexistent/toolsmith.yml")),
            ConfigArgs::default(),
        )
        .execute(&mut ui)
        .unwrap_err();
        assert!(matches!(err, ToolsmithError::ConfigNotFound { .. }));
    }
}
