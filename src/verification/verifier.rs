//! Per-tool verification and batch verification.

use crate::config::{Settings, TestCommand, ToolDefinition};
use crate::detection::{Detector, InstallRecords, SystemInstallRecords};
use crate::shell::{parse_system_path, ProcessProbe, SystemProbe};
use crate::verification::functionality::FunctionalityTester;
use crate::verification::result::{CategoryResult, VerificationResult};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

/// Detects a tool, then smoke-tests it if it is installed.
pub struct ToolVerifier {
    detector: Detector,
    tester: FunctionalityTester,
    max_parallel: usize,
}

impl ToolVerifier {
    pub fn new(detector: Detector, tester: FunctionalityTester) -> Self {
        Self {
            detector,
            tester,
            max_parallel: 1,
        }
    }

    /// Verifier wired to real processes, the current PATH and `settings`.
    pub fn system(settings: &Settings) -> Self {
        let probe: Arc<dyn ProcessProbe> = Arc::new(SystemProbe);
        Self::with_probe(probe, settings, parse_system_path())
    }

    /// Verifier over a given probe and search path.
    pub fn with_probe(
        probe: Arc<dyn ProcessProbe>,
        settings: &Settings,
        search_path: Vec<std::path::PathBuf>,
    ) -> Self {
        let timeout = Duration::from_secs(settings.probe_timeout_secs);
        let records: Arc<dyn InstallRecords> =
            Arc::new(SystemInstallRecords::new(probe.clone(), timeout));
        let detector = Detector::new(probe.clone(), records, search_path)
            .with_timeout(timeout)
            .with_version_lines(settings.version_lines);
        let tester = FunctionalityTester::new(probe, settings.functionality_threshold);

        Self::new(detector, tester).with_max_parallel(settings.max_parallel)
    }

    /// Number of worker threads for [`verify_many`](Self::verify_many).
    pub fn with_max_parallel(mut self, workers: usize) -> Self {
        self.max_parallel = workers.max(1);
        self
    }

    pub fn detector(&self) -> &Detector {
        &self.detector
    }

    /// Verify one tool.
    pub fn verify(&self, definition: &ToolDefinition) -> VerificationResult {
        let start = Instant::now();
        let mut result = self.detector.detect(definition);

        if result.installed {
            let executable = result.executable_path.clone();
            let commands: Vec<TestCommand> = definition
                .test_commands
                .iter()
                .map(|test| TestCommand {
                    command: self
                        .detector
                        .resolve(&test.command, definition, executable.as_deref()),
                    expected_output: test.expected_output.clone(),
                })
                .collect();
            let options = self.detector.probe_options(executable.as_deref());
            result.attach_functionality(self.tester.run(&commands, &options));
        } else {
            tracing::warn!("{} is not installed", definition.name);
        }

        result.duration = start.elapsed();
        result
    }

    /// Verify `names` in order, using a bare-name definition for unknown names.
    ///
    /// Runs on up to `max_parallel` scoped worker threads; results come back
    /// over a channel and are assembled in caller order on this thread.
    pub fn verify_many(
        &self,
        names: &[String],
        definitions: &BTreeMap<String, ToolDefinition>,
    ) -> CategoryResult {
        let start = Instant::now();
        let workers = self.max_parallel.min(names.len()).max(1);

        let results = if workers == 1 {
            names
                .iter()
                .map(|name| self.verify_named(name, definitions))
                .collect()
        } else {
            self.verify_parallel(names, definitions, workers)
        };

        CategoryResult::from_results(results, start.elapsed())
    }

    fn verify_named(
        &self,
        name: &str,
        definitions: &BTreeMap<String, ToolDefinition>,
    ) -> VerificationResult {
        let mut result = match definitions.get(name) {
            Some(definition) => self.verify(definition),
            None => {
                tracing::debug!("No definition for '{}'; probing by name", name);
                self.verify(&ToolDefinition::bare(name))
            }
        };
        result.tool = name.to_string();
        result
    }

    fn verify_parallel(
        &self,
        names: &[String],
        definitions: &BTreeMap<String, ToolDefinition>,
        workers: usize,
    ) -> Vec<VerificationResult> {
        let next = AtomicUsize::new(0);
        let mut slots: Vec<Option<VerificationResult>> = vec![None; names.len()];

        thread::scope(|scope| {
            let (tx, rx) = mpsc::channel();
            let next = &next;

            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    let tx = tx.clone();
                    scope.spawn(move || loop {
                        let index = next.fetch_add(1, Ordering::SeqCst);
                        let Some(name) = names.get(index) else {
                            break;
                        };
                        let result = self.verify_named(name, definitions);
                        if tx.send((index, result)).is_err() {
                            break;
                        }
                    })
                })
                .collect();
            drop(tx);

            for (index, result) in rx {
                slots[index] = Some(result);
            }

            for handle in handles {
                if handle.join().is_err() {
                    tracing::error!("A verification worker panicked");
                }
            }
        });

        slots
            .into_iter()
            .zip(names)
            .map(|(slot, name)| {
                slot.unwrap_or_else(|| {
                    VerificationResult::error(name, "verification did not complete")
                })
            })
            .collect()
    }
}
