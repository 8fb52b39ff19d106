//! Install, reinstall, update and uninstall commands.

use std::path::{Path, PathBuf};

use crate::cli::args::InstallArgs;
use crate::error::Result;
use crate::orchestrator::{Category, InstallMode, InstallOptions, Orchestrator};
use crate::ui::UserInterface;

use super::dispatcher::{load_orchestrator, Command, CommandResult};
use super::display::{print_json, show_install};

/// One install-mode command.
pub struct InstallCommand {
    config_path: Option<PathBuf>,
    mode: InstallMode,
    args: InstallArgs,
}

impl InstallCommand {
    pub fn new(config_path: Option<&Path>, mode: InstallMode, args: InstallArgs) -> Self {
        Self {
            config_path: config_path.map(Path::to_path_buf),
            mode,
            args,
        }
    }

    /// Run against an existing orchestrator.
    pub fn run(
        &self,
        orchestrator: &mut Orchestrator,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let category: Category = self.args.category.parse()?;

        if self.mode == InstallMode::Uninstall && !self.args.dry_run && !self.args.yes {
            let question = format!("Uninstall tools in {}?", category);
            if !ui.confirm(&question, false)? {
                ui.warning("Uninstall cancelled (pass --yes to skip this question)");
                return Ok(CommandResult::failure(1));
            }
        }

        let options = InstallOptions {
            mode: self.mode,
            tools: self.args.tools.clone(),
            dry_run: self.args.dry_run,
        };

        if !self.args.json {
            ui.show_header(&format!("{} {}", self.mode, category));
        }
        let result = orchestrator.install(category, &options);

        if self.args.json {
            print_json(ui, &result)?;
        } else {
            show_install(ui, &result);
        }

        Ok(CommandResult::from_outcome(result.success()))
    }
}

impl Command for InstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        // Unknown category names fail before preconditions and probes run.
        self.args.category.parse::<Category>()?;
        let mut orchestrator = load_orchestrator(self.config_path.as_deref())?;
        self.run(&mut orchestrator, ui)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::test_support::{config_with, fake_tool, orchestrator};
    use crate::error::ToolsmithError;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn args(category: &str) -> InstallArgs {
        InstallArgs {
            category: category.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn installed_tool_is_skipped() {
        let temp = TempDir::new().unwrap();
        fake_tool(temp.path(), "aws");
        let mut orch = orchestrator(config_with(&["aws"]), temp.path());
        let mut ui = MockUI::new();

        let cmd = InstallCommand::new(None, InstallMode::Install, args("cloud-tools"));
        let result = cmd.run(&mut orch, &mut ui).unwrap();

        assert!(result.success);
        assert!(ui.messages().iter().any(|m| m.contains("already installed")));
        assert_eq!(ui.headers(), ["install cloud-tools"]);
    }

    #[test]
    fn missing_install_commands_fail() {
        let temp = TempDir::new().unwrap();
        let mut orch = orchestrator(config_with(&["aws"]), temp.path());
        let mut ui = MockUI::new();

        let cmd = InstallCommand::new(None, InstallMode::Install, args("cloud-tools"));
        let result = cmd.run(&mut orch, &mut ui).unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.errors()[0].contains("no install commands"));
    }

    #[test]
    fn uninstall_asks_first() {
        let temp = TempDir::new().unwrap();
        let mut orch = orchestrator(config_with(&["aws"]), temp.path());
        let mut ui = MockUI::new();
        ui.queue_confirm(false);

        let cmd = InstallCommand::new(None, InstallMode::Uninstall, args("cloud-tools"));
        let result = cmd.run(&mut orch, &mut ui).unwrap();

        assert!(!result.success);
        assert_eq!(ui.confirms_shown().len(), 1);
        assert!(orch.status().install_results.is_empty());
    }

    #[test]
    fn uninstall_with_yes_does_not_ask() {
        let temp = TempDir::new().unwrap();
        let mut orch = orchestrator(config_with(&["aws"]), temp.path());
        let mut ui = MockUI::new();

        let mut install_args = args("cloud-tools");
        install_args.yes = true;
        let cmd = InstallCommand::new(None, InstallMode::Uninstall, install_args);
        let result = cmd.run(&mut orch, &mut ui).unwrap();

        // aws is not installed, so uninstall skips it.
        assert!(result.success);
        assert!(ui.confirms_shown().is_empty());
        assert!(orch.status().install_results.contains_key("cloud-tools"));
    }

    #[test]
    fn json_output() {
        let temp = TempDir::new().unwrap();
        fake_tool(temp.path(), "aws");
        let mut orch = orchestrator(config_with(&["aws"]), temp.path());
        let mut ui = MockUI::new();

        let mut install_args = args("cloud-tools");
        install_args.json = true;
        InstallCommand::new(None, InstallMode::Install, install_args)
            .run(&mut orch, &mut ui)
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&ui.raw_output()[0]).unwrap();
        assert_eq!(json["category"], "cloud-tools");
        assert_eq!(json["outcomes"][0]["action"], "skipped");
    }

    #[test]
    fn unknown_category_is_an_error() {
        let temp = TempDir::new().unwrap();
        let mut orch = orchestrator(config_with(&["aws"]), temp.path());
        let mut ui = MockUI::new();

        let err = InstallCommand::new(None, InstallMode::Install, args("terminal"))
            .run(&mut orch, &mut ui)
            .unwrap_err();
        assert!(matches!(err, ToolsmithError::UnknownCategory { .. }));
    }
}
