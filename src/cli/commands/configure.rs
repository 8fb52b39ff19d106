//! The `configure` command.

use std::path::{Path, PathBuf};

use crate::cli::args::ConfigureArgs;
use crate::error::Result;
use crate::orchestrator::{ConfigureCategory, ConfigureOptions, Orchestrator};
use crate::ui::UserInterface;

use super::dispatcher::{load_orchestrator, Command, CommandResult};
use super::display::{print_json, show_config_result};

pub struct ConfigureCommand {
    config_path: Option<PathBuf>,
    args: ConfigureArgs,
}

impl ConfigureCommand {
    pub fn new(config_path: Option<&Path>, args: ConfigureArgs) -> Self {
        Self {
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    pub fn run(
        &self,
        orchestrator: &mut Orchestrator,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let category: ConfigureCategory = self.args.category.parse()?;
        let options = ConfigureOptions {
            dry_run: self.args.dry_run,
        };

        if !self.args.json {
            ui.show_header(&format!("Configuring {}", category));
        }
        let result = orchestrator.configure(category, &options);

        if self.args.json {
            print_json(ui, &result)?;
        } else {
            show_config_result(ui, &result);
        }

        Ok(CommandResult::from_outcome(result.success))
    }
}

impl Command for ConfigureCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.args.category.parse::<ConfigureCategory>()?;
        let mut orchestrator = load_orchestrator(self.config_path.as_deref())?;
        self.run(&mut orchestrator, ui)
    }
}
