//! Smoke testing of installed tools.

use crate::config::TestCommand;
use crate::shell::{ProbeOptions, ProcessProbe};
use crate::verification::result::{FunctionalityTestResult, TestOutcome};
use regex::Regex;
use std::sync::Arc;
use std::time::Instant;

/// Runs smoke-test commands and scores them against a threshold.
pub struct FunctionalityTester {
    probe: Arc<dyn ProcessProbe>,
    threshold: f64,
}

impl FunctionalityTester {
    pub fn new(probe: Arc<dyn ProcessProbe>, threshold: f64) -> Self {
        Self { probe, threshold }
    }

    /// Pass ratio required for success.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Run every command in order. A failing command never stops the rest.
    pub fn run(&self, commands: &[TestCommand], options: &ProbeOptions) -> FunctionalityTestResult {
        let start = Instant::now();
        let outcomes: Vec<TestOutcome> = commands
            .iter()
            .map(|test| self.run_one(test, options))
            .collect();

        let result = FunctionalityTestResult::score(outcomes, self.threshold, start.elapsed());
        tracing::debug!(
            "Smoke tests: {}/{} passed (threshold {})",
            result.passed,
            result.total,
            self.threshold
        );
        result
    }

    fn run_one(&self, test: &TestCommand, options: &ProbeOptions) -> TestOutcome {
        let output = self.probe.execute(&test.command, options);
        let captured = output.combined_output().trim().to_string();

        let mut outcome = TestOutcome {
            command: test.command.to_string(),
            output: captured,
            expected: test.expected_output.clone(),
            passed: false,
            error: None,
        };

        if !output.completed() {
            outcome.error = output.failure_reason();
            return outcome;
        }

        outcome.passed = match &test.expected_output {
            None => true,
            Some(pattern) => !outcome.output.is_empty() && output_matches(&outcome.output, pattern),
        };
        outcome
    }
}

/// Case-sensitive regex match, falling back to a literal substring when the
/// pattern is not a valid regex.
pub fn output_matches(output: &str, pattern: &str) -> bool {
    match Regex::new(pattern) {
        Ok(re) => re.is_match(output),
        Err(_) => output.contains(pattern),
    }
}
