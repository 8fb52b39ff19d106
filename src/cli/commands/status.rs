//! The `status` command: test every category and summarize.

use std::path::{Path, PathBuf};

use crate::cli::args::StatusArgs;
use crate::error::Result;
use crate::orchestrator::{Orchestrator, TestOptions, TestTarget};
use crate::ui::{format_duration, Table, UserInterface};

use super::dispatcher::{load_orchestrator, Command, CommandResult};
use super::display::{print_json, summary_line};

pub struct StatusCommand {
    config_path: Option<PathBuf>,
    args: StatusArgs,
}

impl StatusCommand {
    pub fn new(config_path: Option<&Path>, args: StatusArgs) -> Self {
        Self {
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Run against an existing orchestrator.
    ///
    /// Always exits 0: status reports, it does not judge.
    pub fn run(
        &self,
        orchestrator: &mut Orchestrator,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        if self.args.json {
            orchestrator.test(TestTarget::All, &TestOptions::default());
            print_json(ui, &orchestrator.status())?;
            return Ok(CommandResult::success());
        }

        ui.show_header(&format!("toolsmith {}", env!("CARGO_PKG_VERSION")));
        let mut spinner = ui.start_spinner("Checking all categories...");
        let total = orchestrator.test(TestTarget::All, &TestOptions::default());
        spinner.finish_success(&summary_line(&total));

        let snapshot = orchestrator.status();
        let mut table = Table::new(&["Category", "Tools", "Installed", "Not found", "Warnings", "Time"]);
        for (category, result) in &snapshot.test_results {
            table.add_row([
                category.clone(),
                result.len().to_string(),
                result.installed.to_string(),
                result.not_found.to_string(),
                result.warnings.to_string(),
                format_duration(result.duration),
            ]);
        }
        ui.message(&table.render());

        let missing: Vec<&str> = total
            .results
            .iter()
            .filter(|r| !r.installed)
            .map(|r| r.tool.as_str())
            .collect();
        if !missing.is_empty() {
            ui.warning(&format!("Not found: {}", missing.join(", ")));
        }

        Ok(CommandResult::success())
    }
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut orchestrator = load_orchestrator(self.config_path.as_deref())?;
        self.run(&mut orchestrator, ui)
    }
}
