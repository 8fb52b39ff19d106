//! The `fix-path` command.
//!
//! Tools found through common install locations or install records often
//! live in directories that are not on PATH. This command collects those
//! directories and prints (or appends) the shell line that adds them.

use std::path::{Path, PathBuf};

use crate::cli::args::FixPathArgs;
use crate::error::Result;
use crate::orchestrator::Orchestrator;
use crate::shell::{detect_shell, parse_system_path, PathFixPlan};
use crate::ui::UserInterface;
use crate::verification::VerificationResult;

use super::dispatcher::{load_orchestrator, Command, CommandResult};

pub struct FixPathCommand {
    config_path: Option<PathBuf>,
    args: FixPathArgs,
}

/// Executable directories of installed tools, in result order.
pub fn executable_dirs(results: &[VerificationResult]) -> Vec<PathBuf> {
    results
        .iter()
        .filter(|r| r.installed)
        .filter_map(|r| r.executable_path.as_deref()?.parent().map(Path::to_path_buf))
        .collect()
}

/// Locate every catalog tool and return the directories they were found in.
///
/// Detection only; smoke tests are not run.
pub fn detected_dirs(orchestrator: &Orchestrator) -> Vec<PathBuf> {
    let detector = orchestrator.verifier().detector();
    let results: Vec<VerificationResult> = orchestrator
        .config()
        .tools
        .values()
        .map(|definition| detector.detect(definition))
        .collect();
    executable_dirs(&results)
}

impl FixPathCommand {
    pub fn new(config_path: Option<&Path>, args: FixPathArgs) -> Self {
        Self {
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Apply or print `plan`.
    pub fn run_plan(&self, plan: &PathFixPlan, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if !plan.needs_refresh() {
            ui.success("Every detected tool is already on PATH");
            return Ok(CommandResult::success());
        }

        for dir in &plan.missing_dirs {
            ui.warning(&format!("Not on PATH: {}", dir.display()));
        }

        if !self.args.apply {
            ui.message("Add these lines to your shell profile (or rerun with --apply):");
            for line in plan.export_lines() {
                ui.raw(&line);
            }
            return Ok(CommandResult::success());
        }

        match plan.apply()? {
            Some(file) => {
                ui.success(&format!(
                    "Updated {}; open a new shell to pick up the change",
                    file.display()
                ));
                Ok(CommandResult::success())
            }
            None if plan.config_file.is_none() => {
                ui.error("No shell profile found; add these lines manually:");
                for line in plan.export_lines() {
                    ui.raw(&line);
                }
                Ok(CommandResult::failure(1))
            }
            None => {
                ui.success("Shell profile already contains the PATH entries");
                Ok(CommandResult::success())
            }
        }
    }

    /// Detect every catalog tool and fix PATH for the ones found off-PATH.
    pub fn run(&self, orchestrator: &Orchestrator, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let total = orchestrator.config().tools.len();
        let mut spinner = ui.start_spinner(&format!("Locating {} tools...", total));
        let dirs = detected_dirs(orchestrator);
        spinner.finish_success(&format!("{} tools located", dirs.len()));

        let plan = PathFixPlan::for_shell(dirs, &parse_system_path(), &detect_shell());
        self.run_plan(&plan, ui)
    }
}

impl Command for FixPathCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let orchestrator = load_orchestrator(self.config_path.as_deref())?;
        self.run(&orchestrator, ui)
    }
}
