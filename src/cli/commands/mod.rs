//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Commands that act on tools build
//! an [`Orchestrator`](crate::orchestrator::Orchestrator) in `execute` and
//! do their work in a separate `run` method that tests can call with a
//! pre-built orchestrator.

pub mod check;
pub mod completions;
pub mod config;
pub mod configure;
pub mod dispatcher;
pub mod display;
pub mod fix_path;
pub mod install;
pub mod status;
pub mod test;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
