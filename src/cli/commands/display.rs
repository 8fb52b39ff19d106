//! Shared rendering of verification, install and configure results.

use serde::Serialize;

use crate::detection::short_version;
use crate::error::{Result, ToolsmithError};
use crate::orchestrator::{ConfigResult, InstallAction, InstallResult};
use crate::ui::{format_duration, Table, ToolsmithTheme, UserInterface};
use crate::verification::{CategoryResult, VerificationResult};

/// Print `value` as pretty JSON.
pub fn print_json<T: Serialize>(ui: &mut dyn UserInterface, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| ToolsmithError::Other(e.into()))?;
    ui.raw(&json);
    Ok(())
}

/// One-line count summary for a batch.
pub fn summary_line(result: &CategoryResult) -> String {
    format!(
        "{} tools: {} installed, {} not found, {} warnings ({})",
        result.len(),
        result.installed,
        result.not_found,
        result.warnings,
        format_duration(result.duration)
    )
}

fn path_cell(result: &VerificationResult) -> String {
    result
        .executable_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}

fn tests_cell(result: &VerificationResult) -> String {
    match &result.functionality {
        Some(f) if f.total > 0 => format!("{}/{}", f.passed, f.total),
        Some(_) => "-".to_string(),
        None => String::new(),
    }
}

/// Render a batch as a table followed by its summary line.
///
/// Verbose mode adds evidence, notes and failed smoke tests per tool.
pub fn show_category(ui: &mut dyn UserInterface, result: &CategoryResult) {
    if result.is_empty() {
        ui.message("No tools to check.");
        return;
    }

    let theme = ToolsmithTheme::detect();
    let mut table = Table::new(&["", "Tool", "Version", "Tests", "Path"]);
    for tool in &result.results {
        table.add_row([
            theme.status_icon(tool.status),
            tool.tool.clone(),
            short_version(&tool.version),
            tests_cell(tool),
            path_cell(tool),
        ]);
    }
    ui.message(&table.render());

    if ui.output_mode().shows_details() {
        for tool in &result.results {
            show_details(ui, tool);
        }
    }

    let line = summary_line(result);
    if result.all_healthy() {
        ui.success(&line);
    } else {
        ui.warning(&line);
    }
}

fn show_details(ui: &mut dyn UserInterface, result: &VerificationResult) {
    let has_details = !result.evidence.is_empty()
        || !result.notes.is_empty()
        || result.error.is_some()
        || result
            .functionality
            .as_ref()
            .is_some_and(|f| f.outcomes.iter().any(|o| !o.passed));
    if !has_details {
        return;
    }

    ui.message(&format!("{} ({})", result.tool, result.status));
    if let Some(strategy) = result.strategy {
        ui.message(&format!("  found via {}", strategy));
    }
    for path in &result.evidence {
        ui.message(&format!("  evidence: {}", path.display()));
    }
    for note in &result.notes {
        ui.warning(&format!("  {}", note));
    }
    if let Some(error) = &result.error {
        ui.error(&format!("  {}", error));
    }
    if let Some(functionality) = &result.functionality {
        for outcome in functionality.outcomes.iter().filter(|o| !o.passed) {
            let reason = outcome
                .error
                .clone()
                .or_else(|| outcome.expected.as_ref().map(|e| format!("expected /{}/", e)))
                .unwrap_or_else(|| "failed".to_string());
            ui.warning(&format!("  test '{}': {}", outcome.command, reason));
        }
    }
}

/// Render an install run.
pub fn show_install(ui: &mut dyn UserInterface, result: &InstallResult) {
    for outcome in &result.outcomes {
        let detail = outcome.message.as_deref().unwrap_or_default();
        let line = if detail.is_empty() {
            format!("{}: {:?}", outcome.tool, outcome.action)
        } else {
            format!("{}: {:?} ({})", outcome.tool, outcome.action, detail)
        };
        match outcome.action {
            InstallAction::Failed => ui.error(&line),
            InstallAction::Skipped | InstallAction::Planned => ui.message(&line),
            _ => ui.success(&line),
        }
    }

    if result.outcomes.is_empty() {
        ui.message("No tools selected.");
    } else if result.success() {
        ui.success(&format!(
            "{} {}: {} succeeded",
            result.mode,
            result.category,
            result.succeeded()
        ));
    } else {
        ui.warning(&format!(
            "{} {}: {} succeeded, {} failed",
            result.mode,
            result.category,
            result.succeeded(),
            result.failed()
        ));
    }
}

/// Render a configure run.
pub fn show_config_result(ui: &mut dyn UserInterface, result: &ConfigResult) {
    if result.steps.is_empty() {
        ui.message(&format!("No {} steps for this platform.", result.category));
        return;
    }

    for step in &result.steps {
        if step.skipped {
            ui.message(&format!("{}: would run `{}`", step.description, step.command));
        } else if step.success {
            ui.success(&step.description);
        } else {
            let error = step.error.as_deref().unwrap_or("failed");
            ui.error(&format!("{}: {}", step.description, error));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::{InstallMode, StepOutcome, ToolInstallOutcome};
    use crate::ui::{MockUI, OutputMode};
    use crate::verification::VerificationStatus;
    use std::path::PathBuf;
    use std::time::Duration;

    fn installed(tool: &str) -> VerificationResult {
        let mut result = VerificationResult::not_installed(tool);
        result.installed = true;
        result.status = VerificationStatus::Installed;
        result.version = "1.0.0".into();
        result.executable_path = Some(PathBuf::from(format!("/usr/bin/{tool}")));
        result
    }

    #[test]
    fn summary_counts() {
        let result = CategoryResult::from_results(
            vec![installed("git"), VerificationResult::not_installed("go")],
            Duration::from_millis(20),
        );
        assert_eq!(
            summary_line(&result),
            "2 tools: 1 installed, 1 not found, 0 warnings (20ms)"
        );
    }

    #[test]
    fn show_category_renders_table_and_summary() {
        let mut ui = MockUI::new();
        let result = CategoryResult::from_results(
            vec![installed("git"), VerificationResult::not_installed("go")],
            Duration::ZERO,
        );
        show_category(&mut ui, &result);

        assert!(ui.messages()[0].contains("/usr/bin/git"));
        assert!(ui.messages()[0].contains("unknown"));
        assert!(ui.warnings()[0].contains("1 not found"));
    }

    #[test]
    fn table_shows_short_version() {
        let mut ui = MockUI::new();
        let mut tool = installed("git");
        tool.version = "git version 2.43.0 (Apple Git-143)\nextra banner".into();
        let result = CategoryResult::from_results(vec![tool], Duration::ZERO);
        show_category(&mut ui, &result);

        assert!(ui.messages()[0].contains("2.43.0"));
        assert!(!ui.messages()[0].contains("Apple"));
        assert!(!ui.messages()[0].contains("banner"));
    }

    #[test]
    fn healthy_batch_reports_success() {
        let mut ui = MockUI::new();
        let result = CategoryResult::from_results(vec![installed("git")], Duration::ZERO);
        show_category(&mut ui, &result);
        assert!(ui.successes()[0].contains("1 installed"));
    }

    #[test]
    fn verbose_shows_notes() {
        let mut ui = MockUI::with_mode(OutputMode::Verbose);
        let mut tool = installed("az");
        tool.notes.push("install location missing".into());
        let result = CategoryResult::from_results(vec![tool], Duration::ZERO);
        show_category(&mut ui, &result);
        assert!(ui.warnings().iter().any(|w| w.contains("install location missing")));
    }

    #[test]
    fn install_failures_are_errors() {
        let mut ui = MockUI::new();
        let mut result = InstallResult::new("cloud-tools", InstallMode::Install, false);
        result.outcomes.push(ToolInstallOutcome {
            tool: "aws".into(),
            action: InstallAction::Failed,
            success: false,
            executable_path: None,
            message: Some("no install commands for linux".into()),
        });
        show_install(&mut ui, &result);

        assert!(ui.errors()[0].contains("no install commands"));
        assert!(ui.warnings()[0].contains("1 failed"));
    }

    #[test]
    fn config_steps_render_by_outcome() {
        let mut ui = MockUI::new();
        let result = ConfigResult::from_steps(
            "tools",
            vec![
                StepOutcome {
                    description: "git defaults".into(),
                    command: "git config --global init.defaultBranch main".into(),
                    success: true,
                    skipped: false,
                    output: None,
                    error: None,
                },
                StepOutcome {
                    description: "npm prefix".into(),
                    command: "npm config set prefix ~/.npm".into(),
                    success: false,
                    skipped: false,
                    output: None,
                    error: Some("exited with code 1".into()),
                },
            ],
        );
        show_config_result(&mut ui, &result);
        assert_eq!(ui.successes(), ["git defaults"]);
        assert!(ui.errors()[0].contains("exited with code 1"));
    }
}
