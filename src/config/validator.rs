//! Configuration validation rules.
//!
//! - `functionality_threshold` must lie in `[0, 1]`
//! - `max_parallel` and `version_lines` must be at least 1
//! - Category keys must be one of the known categories
//! - Category entries must reference defined tools
//! - Every tool needs at least one executable name

use crate::config::schema::ToolkitConfig;
use crate::error::{Result, ToolsmithError};
use crate::orchestrator::Category;

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
    /// Tool name if error is tool-specific
    pub tool: Option<String>,
    /// Category name if error is category-specific
    pub category: Option<String>,
}

/// Validate a configuration and return all errors.
///
/// Collects every problem rather than stopping at the first one.
pub fn validate_config(config: &ToolkitConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_settings(config));
    errors.extend(validate_tools(config));
    errors.extend(validate_categories(config));

    errors
}

fn setting_error(rule: &str, message: String) -> ValidationError {
    ValidationError {
        rule: rule.to_string(),
        message,
        tool: None,
        category: None,
    }
}

fn validate_settings(config: &ToolkitConfig) -> Vec<ValidationError> {
    let settings = &config.settings;
    let mut errors = Vec::new();

    let threshold = settings.functionality_threshold;
    if !(0.0..=1.0).contains(&threshold) {
        errors.push(setting_error(
            "threshold-range",
            format!(
                "functionality_threshold must be between 0 and 1, got {}",
                threshold
            ),
        ));
    }

    if settings.max_parallel == 0 {
        errors.push(setting_error(
            "max-parallel",
            "max_parallel must be at least 1".to_string(),
        ));
    }

    if settings.version_lines == 0 {
        errors.push(setting_error(
            "version-lines",
            "version_lines must be at least 1".to_string(),
        ));
    }

    errors
}

fn validate_tools(config: &ToolkitConfig) -> Vec<ValidationError> {
    config
        .tools
        .iter()
        .filter(|(_, tool)| tool.executable_names.iter().all(|n| n.trim().is_empty()))
        .map(|(name, _)| ValidationError {
            rule: "missing-executable".to_string(),
            message: format!("Tool '{}' must list at least one executable name", name),
            tool: Some(name.clone()),
            category: None,
        })
        .collect()
}

fn validate_categories(config: &ToolkitConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (category, tools) in &config.categories {
        if !Category::ALL.iter().any(|known| known.as_str() == category) {
            let expected: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
            errors.push(ValidationError {
                rule: "unknown-category".to_string(),
                message: format!(
                    "Unknown category '{}' (expected one of: {})",
                    category,
                    expected.join(", ")
                ),
                tool: None,
                category: Some(category.clone()),
            });
        }
        for tool in tools {
            if !config.tools.contains_key(tool) {
                errors.push(ValidationError {
                    rule: "unknown-tool".to_string(),
                    message: format!(
                        "Category '{}' references tool '{}' which is not defined",
                        category, tool
                    ),
                    tool: Some(tool.clone()),
                    category: Some(category.clone()),
                });
            }
        }
    }

    errors
}

/// Validate and return Result (for convenience).
///
/// # Errors
///
/// Returns `ConfigValidationError` if any validation rules fail.
pub fn validate(config: &ToolkitConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(ToolsmithError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}
