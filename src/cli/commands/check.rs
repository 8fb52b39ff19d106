//! The `check` command: verify tools by name.

use std::path::{Path, PathBuf};

use crate::cli::args::CheckArgs;
use crate::error::Result;
use crate::orchestrator::Orchestrator;
use crate::ui::UserInterface;

use super::dispatcher::{load_orchestrator, Command, CommandResult};
use super::display::{print_json, show_category};

pub struct CheckCommand {
    config_path: Option<PathBuf>,
    args: CheckArgs,
}

impl CheckCommand {
    pub fn new(config_path: Option<&Path>, args: CheckArgs) -> Self {
        Self {
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    pub fn run(
        &self,
        orchestrator: &Orchestrator,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let result = orchestrator.check(&self.args.tools);

        if self.args.json {
            print_json(ui, &result)?;
        } else {
            show_category(ui, &result);
        }

        Ok(CommandResult::from_outcome(result.all_healthy()))
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let orchestrator = load_orchestrator(self.config_path.as_deref())?;
        self.run(&orchestrator, ui)
    }
}
