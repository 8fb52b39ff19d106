//! Post-install configuration collaborators.

use crate::config::ConfigureStep;
use crate::orchestrator::category::ConfigureCategory;
use crate::shell::{Platform, ProbeOptions, ProcessProbe};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Options for a configure run.
#[derive(Debug, Clone, Default)]
pub struct ConfigureOptions {
    /// Report the steps without running them.
    pub dry_run: bool,
}

/// Outcome of one configure step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    pub description: String,
    pub command: String,
    pub success: bool,
    /// True when the step was only planned (dry run).
    #[serde(default)]
    pub skipped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a configure run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigResult {
    pub category: String,
    pub steps: Vec<StepOutcome>,
    pub success: bool,
}

impl ConfigResult {
    /// Build from step outcomes; success means no step failed.
    pub fn from_steps(category: &str, steps: Vec<StepOutcome>) -> Self {
        let success = steps.iter().all(|s| s.success);
        Self {
            category: category.to_string(),
            steps,
            success,
        }
    }
}

/// Applies the steps of a configure category.
pub trait Configurator: Send + Sync {
    fn configure(
        &self,
        category: ConfigureCategory,
        steps: &[ConfigureStep],
        options: &ConfigureOptions,
    ) -> ConfigResult;
}

/// [`Configurator`] that runs each step's argv command in order.
///
/// Steps for other platforms are left out. A failing step is recorded and
/// the remaining steps still run.
pub struct CommandConfigurator {
    probe: Arc<dyn ProcessProbe>,
    platform: Platform,
    timeout: Duration,
}

impl CommandConfigurator {
    pub fn new(probe: Arc<dyn ProcessProbe>, platform: Platform, timeout: Duration) -> Self {
        Self {
            probe,
            platform,
            timeout,
        }
    }
}

impl Configurator for CommandConfigurator {
    fn configure(
        &self,
        category: ConfigureCategory,
        steps: &[ConfigureStep],
        options: &ConfigureOptions,
    ) -> ConfigResult {
        let probe_options = ProbeOptions::with_timeout(self.timeout);

        let outcomes = steps
            .iter()
            .filter(|step| step.applies_to(self.platform))
            .map(|step| {
                let mut outcome = StepOutcome {
                    description: step.description.clone(),
                    command: step.command.to_string(),
                    success: true,
                    skipped: options.dry_run,
                    output: None,
                    error: None,
                };
                if options.dry_run {
                    return outcome;
                }

                tracing::info!("{}: {}", category, step.description);
                let output = self.probe.execute(&step.command, &probe_options);
                let captured = output.combined_output().trim().to_string();
                outcome.output = (!captured.is_empty()).then_some(captured);
                if !output.success() {
                    outcome.success = false;
                    outcome.error = output.failure_reason();
                    tracing::warn!(
                        "{}: '{}' failed: {}",
                        category,
                        step.description,
                        outcome.error.as_deref().unwrap_or_default()
                    );
                }
                outcome
            })
            .collect();

        ConfigResult::from_steps(category.as_str(), outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{CommandLine, ProbeOutput};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingProbe {
        calls: Mutex<Vec<String>>,
    }

    impl ProcessProbe for RecordingProbe {
        fn execute(&self, command: &CommandLine, _options: &ProbeOptions) -> ProbeOutput {
            self.calls.lock().unwrap().push(command.to_string());
            let code = if command.program() == "false" { 1 } else { 0 };
            ProbeOutput {
                exit_code: Some(code),
                stdout: "done".into(),
                ..Default::default()
            }
        }
    }

    fn step(description: &str, command: &str, platforms: Vec<Platform>) -> ConfigureStep {
        ConfigureStep {
            description: description.to_string(),
            command: CommandLine::parse(command).unwrap(),
            platforms,
        }
    }

    #[test]
    fn runs_steps_for_platform_and_continues_after_failure() {
        let probe = Arc::new(RecordingProbe::default());
        let configurator =
            CommandConfigurator::new(probe.clone(), Platform::Linux, Duration::from_secs(5));

        let steps = vec![
            step("first", "git config --global a b", vec![]),
            step("windows only", "reg add X", vec![Platform::Windows]),
            step("broken", "false", vec![Platform::Linux]),
            step("last", "git config --global c d", vec![]),
        ];
        let result =
            configurator.configure(ConfigureCategory::Tools, &steps, &ConfigureOptions::default());

        assert_eq!(result.category, "tools");
        assert_eq!(result.steps.len(), 3);
        assert!(!result.success);
        assert!(!result.steps[1].success);
        assert!(result.steps[2].success);
        assert_eq!(result.steps[0].output.as_deref(), Some("done"));
        assert_eq!(probe.calls.lock().unwrap().len(), 3);
    }

    #[test]
    fn dry_run_runs_nothing() {
        let probe = Arc::new(RecordingProbe::default());
        let configurator =
            CommandConfigurator::new(probe.clone(), Platform::MacOS, Duration::from_secs(5));

        let steps = vec![step("first", "git config --global a b", vec![])];
        let result = configurator.configure(
            ConfigureCategory::Terminal,
            &steps,
            &ConfigureOptions { dry_run: true },
        );

        assert!(result.success);
        assert!(result.steps[0].skipped);
        assert!(probe.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn empty_step_list_succeeds() {
        let probe = Arc::new(RecordingProbe::default());
        let configurator = CommandConfigurator::new(probe, Platform::Linux, Duration::from_secs(5));
        let result =
            configurator.configure(ConfigureCategory::AiTools, &[], &ConfigureOptions::default());
        assert!(result.success);
        assert!(result.steps.is_empty());
    }
}
