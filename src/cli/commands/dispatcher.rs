//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::orchestrator::{InstallMode, Orchestrator};
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Success when `ok`, otherwise failure with exit code 1.
    pub fn from_outcome(ok: bool) -> Self {
        if ok {
            Self::success()
        } else {
            Self::failure(1)
        }
    }
}

/// Build an orchestrator from the environment and an optional config file.
pub(crate) fn load_orchestrator(config_path: Option<&Path>) -> Result<Orchestrator> {
    Orchestrator::from_environment(config_path)
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    config_path: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a new dispatcher using an optional explicit config file.
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }

    /// Get the explicit config path.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.config_path();
        match &cli.command {
            Commands::Install(args) => {
                super::install::InstallCommand::new(config, InstallMode::Install, args.clone())
                    .execute(ui)
            }
            Commands::Reinstall(args) => {
                super::install::InstallCommand::new(config, InstallMode::Reinstall, args.clone())
                    .execute(ui)
            }
            Commands::Update(args) => {
                super::install::InstallCommand::new(config, InstallMode::Update, args.clone())
                    .execute(ui)
            }
            Commands::Uninstall(args) => {
                super::install::InstallCommand::new(config, InstallMode::Uninstall, args.clone())
                    .execute(ui)
            }
            Commands::Test(args) => super::test::TestCommand::new(config, args.clone()).execute(ui),
            Commands::Check(args) => {
                super::check::CheckCommand::new(config, args.clone()).execute(ui)
            }
            Commands::Status(args) => {
                super::status::StatusCommand::new(config, args.clone()).execute(ui)
            }
            Commands::Configure(args) => {
                super::configure::ConfigureCommand::new(config, args.clone()).execute(ui)
            }
            Commands::FixPath(args) => {
                super::fix_path::FixPathCommand::new(config, args.clone()).execute(ui)
            }
            Commands::Config(args) => {
                super::config::ConfigCommand::new(config, args.clone()).execute(ui)
            }
            Commands::Completions(args) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
        }
    }
}
