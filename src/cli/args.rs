//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// toolsmith - Detect, smoke-test, and install developer tools by category.
#[derive(Debug, Parser)]
#[command(name = "toolsmith")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to an extra config file layered over the built-in catalog
    #[arg(short, long, global = true, env = "TOOLSMITH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show per-tool details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install missing tools in a category
    Install(InstallArgs),

    /// Re-run install commands for every tool in a category
    Reinstall(InstallArgs),

    /// Update installed tools in a category
    Update(InstallArgs),

    /// Uninstall tools in a category
    Uninstall(InstallArgs),

    /// Verify a category's tools (or `all`)
    Test(TestArgs),

    /// Verify individual tools by name
    Check(CheckArgs),

    /// Test every category and show a summary
    Status(StatusArgs),

    /// Run a configure category's steps
    Configure(ConfigureArgs),

    /// Put detected tool directories on PATH
    FixPath(FixPathArgs),

    /// Show resolved configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for `install`, `reinstall`, `update` and `uninstall`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InstallArgs {
    /// Category to act on
    pub category: String,

    /// Only these tools (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub tools: Vec<String>,

    /// Show what would run without running it
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the uninstall confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `test` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct TestArgs {
    /// Category to test, or `all`
    pub category: String,

    /// Only these tools (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub tools: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Tool names; unknown names are probed as `<name> --version`
    #[arg(required = true)]
    pub tools: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Output the session snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `configure` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigureArgs {
    /// Configure category (terminal, powershell, tools, ai-tools)
    pub category: String,

    /// Show the steps without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `fix-path` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FixPathArgs {
    /// Append the export lines to the shell config file
    #[arg(long)]
    pub apply: bool,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Output as JSON instead of YAML
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
