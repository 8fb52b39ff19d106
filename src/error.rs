//! Error types for toolsmith operations.
//!
//! This module defines [`ToolsmithError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Per-tool and per-command failures are recorded in result data, not raised
//! - Use `ToolsmithError` for structural errors (bad config, unknown category,
//!   failed preconditions) that need distinct handling
//! - Use `anyhow::Error` (via `ToolsmithError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for toolsmith operations.
#[derive(Debug, Error)]
pub enum ToolsmithError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Category name is not one of the fixed categories for the operation.
    #[error("Unknown category '{name}' (expected one of: {expected})")]
    UnknownCategory { name: String, expected: String },

    /// Tool name has no definition and no fallback is allowed.
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    /// An environment precondition failed while initializing the orchestrator.
    #[error("Precondition '{check}' failed: {message}")]
    PreconditionFailed { check: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ToolsmithError {
    /// Process exit code: 2 for usage and configuration errors, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            ToolsmithError::ConfigNotFound { .. }
            | ToolsmithError::ConfigParseError { .. }
            | ToolsmithError::ConfigValidationError { .. }
            | ToolsmithError::UnknownCategory { .. }
            | ToolsmithError::UnknownTool { .. } => 2,
            _ => 1,
        }
    }
}

/// Result type alias for toolsmith operations.
pub type Result<T> = std::result::Result<T, ToolsmithError>;
