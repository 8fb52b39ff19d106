//! The `test` command: verify a category, or every category.

use std::path::{Path, PathBuf};

use crate::cli::args::TestArgs;
use crate::error::Result;
use crate::orchestrator::{Orchestrator, TestOptions, TestTarget};
use crate::ui::UserInterface;

use super::dispatcher::{load_orchestrator, Command, CommandResult};
use super::display::{print_json, show_category, summary_line};

pub struct TestCommand {
    config_path: Option<PathBuf>,
    args: TestArgs,
}

impl TestCommand {
    pub fn new(config_path: Option<&Path>, args: TestArgs) -> Self {
        Self {
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Run against an existing orchestrator.
    pub fn run(
        &self,
        orchestrator: &mut Orchestrator,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let target: TestTarget = self.args.category.parse()?;
        let options = TestOptions {
            tools: self.args.tools.clone(),
        };

        if self.args.json {
            let result = orchestrator.test(target, &options);
            print_json(ui, &result)?;
            return Ok(CommandResult::from_outcome(result.all_healthy()));
        }

        ui.show_header(&format!("Testing {}", target));
        let mut spinner = ui.start_spinner(&format!("Checking {}...", target));
        let result = orchestrator.test(target, &options);
        if result.all_healthy() {
            spinner.finish_success(&summary_line(&result));
        } else {
            spinner.finish_warning(&summary_line(&result));
        }

        show_category(ui, &result);
        Ok(CommandResult::from_outcome(result.all_healthy()))
    }
}

impl Command for TestCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.args.category.parse::<TestTarget>()?;
        let mut orchestrator = load_orchestrator(self.config_path.as_deref())?;
        self.run(&mut orchestrator, ui)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::test_support::{config_with, fake_tool, orchestrator};
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn args(category: &str) -> TestArgs {
        TestArgs {
            category: category.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn healthy_category_exits_zero() {
        let temp = TempDir::new().unwrap();
        fake_tool(temp.path(), "kubectl");
        let mut orch = orchestrator(config_with(&["kubectl"]), temp.path());
        let mut ui = MockUI::new();

        let result = TestCommand::new(None, args("cloud-tools"))
            .run(&mut orch, &mut ui)
            .unwrap();

        assert!(result.success);
        assert!(ui.spinner_results()[0].starts_with("ok:"));
        assert!(ui.messages()[0].contains("kubectl"));
        assert!(ui.messages()[0].contains("1.0.0"));
    }

    #[test]
    fn missing_tool_exits_one() {
        let temp = TempDir::new().unwrap();
        fake_tool(temp.path(), "kubectl");
        let mut orch = orchestrator(config_with(&["kubectl", "helm"]), temp.path());
        let mut ui = MockUI::new();

        let result = TestCommand::new(None, args("cloud-tools"))
            .run(&mut orch, &mut ui)
            .unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.spinner_results()[0].contains("1 not found"));
    }

    #[test]
    fn json_for_all_categories() {
        let temp = TempDir::new().unwrap();
        let mut orch = orchestrator(config_with(&["helm"]), temp.path());
        let mut ui = MockUI::new();

        let mut test_args = args("all");
        test_args.json = true;
        TestCommand::new(None, test_args)
            .run(&mut orch, &mut ui)
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&ui.raw_output()[0]).unwrap();
        assert_eq!(json["category"], "all");
        assert_eq!(json["not_found"], 1);
        assert_eq!(json["results"][0]["tool"], "helm");
        assert_eq!(json["results"][0]["version"], "unknown");
    }

    #[test]
    fn tool_filter_is_applied() {
        let temp = TempDir::new().unwrap();
        fake_tool(temp.path(), "kubectl");
        let mut orch = orchestrator(config_with(&["kubectl", "helm"]), temp.path());
        let mut ui = MockUI::new();

        let mut test_args = args("cloud-tools");
        test_args.tools = vec!["kubectl".into()];
        let result = TestCommand::new(None, test_args)
            .run(&mut orch, &mut ui)
            .unwrap();
        assert!(result.success);
    }
}
