//! Toolsmith - Detect, smoke-test, and install developer tools by category.
//!
//! Toolsmith keeps a catalog of developer tools grouped into categories
//! (package managers, development tools, cloud tools, applications, AI
//! tools). For each tool it can tell whether the tool is installed, which
//! version is present, where the executable lives and whether a handful of
//! smoke-test commands still work.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Catalog loading, merging, and validation
//! - [`detection`] - Multi-strategy tool detection
//! - [`error`] - Error types and result aliases
//! - [`orchestrator`] - Category operations and session state
//! - [`shell`] - Process probes, PATH handling, and platform facts
//! - [`ui`] - Terminal output, spinners, and prompts
//! - [`verification`] - Detection plus smoke tests, and result types
//!
//! # Example
//!
//! ```
//! use toolsmith::orchestrator::{Category, TestTarget};
//!
//! let category: Category = "cloud_tools".parse().unwrap();
//! assert_eq!(category.as_str(), "cloud-tools");
//!
//! let target: TestTarget = "all".parse().unwrap();
//! assert_eq!(target.categories().len(), 5);
//! assert!("terminal".parse::<Category>().is_err());
//! ```

pub mod cli;
pub mod config;
pub mod detection;
pub mod error;
pub mod orchestrator;
pub mod shell;
pub mod ui;
pub mod verification;

pub use error::{Result, ToolsmithError};
