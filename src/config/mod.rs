//! Configuration loading, parsing, and validation for toolsmith.
//!
//! - Schema definitions in [`schema`]
//! - The embedded catalog in [`builtin`]
//! - Discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use toolsmith::config::load_builtin;
//!
//! let config = load_builtin().unwrap();
//! assert!(config.tool("git").is_some());
//! assert!(!config.category_tools("cloud-tools").is_empty());
//! ```

pub mod builtin;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use builtin::{builtin_files, builtin_layers};
pub use loader::{
    load_builtin, load_config, load_config_value, load_with_paths, parse_config,
    user_config_path, ConfigPaths,
};
pub use merger::{deep_merge, merge_configs};
pub use schema::{
    ConfigureStep, PlatformCommands, Settings, TestCommand, ToolDefinition, ToolkitConfig,
};
pub use validator::{validate, validate_config, ValidationError};
