//! Install-state detection for one tool definition.
//!
//! Strategies run in a fixed order and the first one that finds the tool
//! decides `installed` and `executable_path`:
//!
//! 1. PATH lookup of each executable name
//! 2. Common install locations (globs with placeholders)
//! 3. Persisted install records
//!
//! Once installed, version probes run regardless of which strategy won.
//! Probe output is preferred; an install record's version is only used
//! when every probe failed, and the tool then stays at Warning.

use crate::config::ToolDefinition;
use crate::detection::common_paths::expand_common_path;
use crate::detection::install_records::InstallRecords;
use crate::detection::version::trim_version_output;
use crate::shell::{
    executable_extensions, find_in_dir, resolve_tool_path, CommandLine, ProbeOptions,
    ProcessProbe,
};
use crate::verification::result::{DetectionStrategy, VerificationResult, VerificationStatus};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// What a successful strategy found.
#[derive(Debug, Default)]
struct Found {
    executable: Option<PathBuf>,
    evidence: Vec<PathBuf>,
    notes: Vec<String>,
    record_version: Option<String>,
}

/// Determines whether a tool is installed and which version.
pub struct Detector {
    probe: Arc<dyn ProcessProbe>,
    records: Arc<dyn InstallRecords>,
    search_path: Vec<PathBuf>,
    probe_timeout: Duration,
    version_lines: usize,
}

impl Detector {
    /// Create a detector over the given search path.
    pub fn new(
        probe: Arc<dyn ProcessProbe>,
        records: Arc<dyn InstallRecords>,
        search_path: Vec<PathBuf>,
    ) -> Self {
        Self {
            probe,
            records,
            search_path,
            probe_timeout: Duration::from_secs(30),
            version_lines: 1,
        }
    }

    /// Set the deadline for each version probe.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Set how many lines of version output to keep.
    pub fn with_version_lines(mut self, lines: usize) -> Self {
        self.version_lines = lines.max(1);
        self
    }

    /// Directories searched for executables.
    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    /// Probe options for commands run against a resolved executable.
    ///
    /// The executable's directory is put in front of the search path so
    /// sibling binaries (`cargo` next to `rustc`) resolve too.
    pub fn probe_options(&self, executable: Option<&Path>) -> ProbeOptions {
        let mut search_path = Vec::with_capacity(self.search_path.len() + 1);
        if let Some(dir) = executable.and_then(Path::parent) {
            search_path.push(dir.to_path_buf());
        }
        search_path.extend(self.search_path.iter().cloned());

        ProbeOptions {
            timeout: Some(self.probe_timeout),
            search_path: Some(search_path),
            ..Default::default()
        }
    }

    /// Detect one tool. Never fails; absence is a result.
    pub fn detect(&self, definition: &ToolDefinition) -> VerificationResult {
        let start = Instant::now();
        let mut result = VerificationResult::not_installed(&definition.name);

        let found = self
            .find_on_path(definition)
            .map(|f| (DetectionStrategy::Path, f))
            .or_else(|| {
                self.find_in_common_paths(definition)
                    .map(|f| (DetectionStrategy::CommonPath, f))
            })
            .or_else(|| {
                self.find_in_install_records(definition)
                    .map(|f| (DetectionStrategy::InstallRecord, f))
            });

        if let Some((strategy, found)) = found {
            tracing::debug!("{} found via {}", definition.name, strategy);
            result.installed = true;
            result.strategy = Some(strategy);
            result.executable_path = found.executable;
            result.evidence = found.evidence;
            for note in found.notes {
                result.add_note(note);
            }
            self.probe_version(definition, found.record_version, &mut result);
        } else {
            tracing::debug!("{} not found by any strategy", definition.name);
        }

        result.checked_at = Utc::now();
        result.duration = start.elapsed();
        result
    }

    fn find_on_path(&self, definition: &ToolDefinition) -> Option<Found> {
        definition.executable_names.iter().find_map(|name| {
            resolve_tool_path(name, &self.search_path).map(|path| Found {
                evidence: vec![path.clone()],
                executable: Some(path),
                ..Default::default()
            })
        })
    }

    fn find_in_common_paths(&self, definition: &ToolDefinition) -> Option<Found> {
        let existing = definition
            .common_paths
            .iter()
            .flat_map(|pattern| expand_common_path(pattern))
            .find(|path| path.exists())?;

        let executable = locate_executable(&existing, &definition.executable_names);
        let mut found = Found {
            evidence: vec![existing.clone()],
            executable,
            ..Default::default()
        };
        if found.executable.is_none() {
            found.notes.push(format!(
                "found {} but no executable inside it",
                existing.display()
            ));
        }
        Some(found)
    }

    fn find_in_install_records(&self, definition: &ToolDefinition) -> Option<Found> {
        let record = definition
            .install_records
            .iter()
            .find_map(|locator| self.records.lookup(locator))?;

        let mut found = Found {
            record_version: record.version.clone(),
            ..Default::default()
        };

        match record.location.filter(|l| l.exists()) {
            Some(location) => {
                found.executable = locate_executable(&location, &definition.executable_names);
                found.evidence.push(location);
                if found.executable.is_none() {
                    found.notes.push(format!(
                        "install record {} has no executable in its location",
                        record.locator
                    ));
                }
            }
            None => found.notes.push(format!(
                "install record {} has no readable install location",
                record.locator
            )),
        }

        Some(found)
    }

    fn probe_version(
        &self,
        definition: &ToolDefinition,
        record_version: Option<String>,
        result: &mut VerificationResult,
    ) {
        if definition.version_commands.is_empty() {
            if let Some(version) = record_version {
                result.version = version;
            }
            result.status = VerificationStatus::Installed;
            return;
        }

        let options = self.probe_options(result.executable_path.as_deref());
        let probed = definition.version_commands.iter().find_map(|command| {
            let command = self.resolve(command, definition, result.executable_path.as_deref());
            let output = self.probe.execute(&command, &options);
            if !output.success() {
                tracing::debug!(
                    "Version probe '{}' failed: {}",
                    command,
                    output.failure_reason().unwrap_or_default()
                );
                return None;
            }
            trim_version_output(output.primary_output(), self.version_lines)
        });

        match (probed, record_version) {
            (Some(version), _) => {
                result.version = version;
                result.status = VerificationStatus::Installed;
            }
            (None, Some(version)) => {
                result.version = version;
                result.status = VerificationStatus::Warning;
                result.add_note("version probes failed; version taken from install record");
            }
            (None, None) => {
                result.status = VerificationStatus::Warning;
                result.add_note("installed but no version probe succeeded");
            }
        }
    }

    /// Point `command` at the resolved executable when it names the tool.
    pub fn resolve(
        &self,
        command: &CommandLine,
        definition: &ToolDefinition,
        executable: Option<&Path>,
    ) -> CommandLine {
        match executable {
            Some(path) => command.with_resolved_program(&definition.executable_names, path),
            None => command.clone(),
        }
    }
}

/// Find a candidate executable at `location`.
///
/// A file is accepted when its name matches a candidate; a directory is
/// searched directly and then in its `bin/` child.
fn locate_executable(location: &Path, names: &[String]) -> Option<PathBuf> {
    let extensions = executable_extensions();

    if location.is_file() {
        let parent = location.parent()?;
        return names
            .iter()
            .filter_map(|name| find_in_dir(name, parent, &extensions))
            .find(|candidate| candidate == location);
    }

    let bin = location.join("bin");
    names.iter().find_map(|name| {
        find_in_dir(name, location, &extensions).or_else(|| find_in_dir(name, &bin, &extensions))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::install_records::InstallRecord;
    use crate::shell::ProbeOutput;
    use std::collections::HashMap;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Probe answering by full command line; unknown commands fail to spawn.
    #[derive(Default)]
    struct ScriptedProbe {
        answers: HashMap<String, ProbeOutput>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedProbe {
        fn answer(mut self, command: &str, stdout: &str) -> Self {
            self.answers.insert(
                command.to_string(),
                ProbeOutput {
                    exit_code: Some(0),
                    stdout: stdout.to_string(),
                    ..Default::default()
                },
            );
            self
        }
    }

    impl ProcessProbe for ScriptedProbe {
        fn execute(&self, command: &CommandLine, _options: &ProbeOptions) -> ProbeOutput {
            let rendered = command.to_string();
            self.calls.lock().unwrap().push(rendered.clone());
            self.answers
                .get(&rendered)
                .cloned()
                .unwrap_or_else(|| ProbeOutput::spawn_failed("not found", Duration::ZERO))
        }
    }

    #[derive(Default)]
    struct FakeRecords(HashMap<String, InstallRecord>);

    impl InstallRecords for FakeRecords {
        fn lookup(&self, locator: &str) -> Option<InstallRecord> {
            self.0.get(locator).cloned()
        }
    }

    fn fake_binary(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    fn definition(name: &str) -> ToolDefinition {
        ToolDefinition::bare(name)
    }

    fn detector(probe: ScriptedProbe, records: FakeRecords, path: Vec<PathBuf>) -> Detector {
        Detector::new(Arc::new(probe), Arc::new(records), path)
    }

    #[test]
    fn absent_tool_honours_invariant() {
        let temp = TempDir::new().unwrap();
        let mut def = definition("toolsmith-absent");
        def.common_paths = vec![temp.path().join("missing/*").to_string_lossy().into_owned()];
        def.install_records = vec!["dpkg:toolsmith-absent".into()];

        let d = detector(
            ScriptedProbe::default(),
            FakeRecords::default(),
            vec![temp.path().to_path_buf()],
        );
        let result = d.detect(&def);

        assert!(!result.installed);
        assert_eq!(result.status, VerificationStatus::NotInstalled);
        assert_eq!(result.version, "unknown");
        assert!(result.executable_path.is_none());
        assert!(result.strategy.is_none());
    }

    #[test]
    fn path_lookup_wins_and_probes_resolved_binary() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        let exe = bin.join("toolx");
        fake_binary(&exe);

        let probe = ScriptedProbe::default()
            .answer(&format!("{} --version", exe.display()), "toolx 1.2.3\nextra\n");
        let d = detector(probe, FakeRecords::default(), vec![bin]);
        let result = d.detect(&definition("toolx"));

        assert!(result.installed);
        assert_eq!(result.strategy, Some(DetectionStrategy::Path));
        assert_eq!(result.executable_path, Some(exe));
        assert_eq!(result.version, "toolx 1.2.3");
        assert_eq!(result.status, VerificationStatus::Installed);
    }

    #[test]
    fn second_executable_name_is_tried() {
        let temp = TempDir::new().unwrap();
        fake_binary(&temp.path().join("python"));

        let mut def = definition("python");
        def.executable_names = vec!["python3".into(), "python".into()];
        def.version_commands = Vec::new();

        let d = detector(
            ScriptedProbe::default(),
            FakeRecords::default(),
            vec![temp.path().to_path_buf()],
        );
        let result = d.detect(&def);
        assert!(result.executable_path.unwrap().ends_with("python"));
        assert_eq!(result.status, VerificationStatus::Installed);
    }

    #[test]
    fn failed_version_probes_mean_warning() {
        let temp = TempDir::new().unwrap();
        fake_binary(&temp.path().join("toolx"));

        let d = detector(
            ScriptedProbe::default(),
            FakeRecords::default(),
            vec![temp.path().to_path_buf()],
        );
        let result = d.detect(&definition("toolx"));

        assert!(result.installed);
        assert_eq!(result.version, "unknown");
        assert_eq!(result.status, VerificationStatus::Warning);
        assert!(!result.notes.is_empty());
    }

    #[test]
    fn common_path_directory_with_bin_child() {
        let temp = TempDir::new().unwrap();
        let install = temp.path().join("Tool-2.0");
        let exe = install.join("bin").join("toolx");
        fake_binary(&exe);

        let mut def = definition("toolx");
        def.common_paths = vec![
            temp.path().join("nothing-here").to_string_lossy().into_owned(),
            temp.path().join("Tool-*").to_string_lossy().into_owned(),
        ];

        let probe = ScriptedProbe::default()
            .answer(&format!("{} --version", exe.display()), "2.0.0");
        let d = detector(probe, FakeRecords::default(), Vec::new());
        let result = d.detect(&def);

        assert_eq!(result.strategy, Some(DetectionStrategy::CommonPath));
        assert_eq!(result.evidence, vec![install]);
        assert_eq!(result.executable_path, Some(exe));
        assert_eq!(result.version, "2.0.0");
    }

    #[test]
    fn common_path_file_is_accepted_as_executable() {
        let temp = TempDir::new().unwrap();
        let exe = temp.path().join("toolx");
        fake_binary(&exe);

        let mut def = definition("toolx");
        def.version_commands = Vec::new();
        def.common_paths = vec![exe.to_string_lossy().into_owned()];

        let d = detector(ScriptedProbe::default(), FakeRecords::default(), Vec::new());
        let result = d.detect(&def);
        assert_eq!(result.executable_path, Some(exe));
    }

    #[test]
    fn common_path_without_executable_is_installed_with_note() {
        let temp = TempDir::new().unwrap();
        let mut def = definition("toolx");
        def.version_commands = Vec::new();
        def.common_paths = vec![temp.path().to_string_lossy().into_owned()];

        let d = detector(ScriptedProbe::default(), FakeRecords::default(), Vec::new());
        let result = d.detect(&def);
        assert!(result.installed);
        assert!(result.executable_path.is_none());
        assert_eq!(result.notes.len(), 1);
    }

    #[test]
    fn install_record_without_location_keeps_installed() {
        let mut def = definition("toolx");
        def.install_records = vec!["dpkg:toolx".into()];

        let mut records = FakeRecords::default();
        records.0.insert(
            "dpkg:toolx".into(),
            InstallRecord::new("dpkg:toolx").with_version("9.9"),
        );

        let d = detector(ScriptedProbe::default(), records, Vec::new());
        let result = d.detect(&def);

        assert!(result.installed);
        assert_eq!(result.strategy, Some(DetectionStrategy::InstallRecord));
        assert!(result.executable_path.is_none());
        // Probes failed, so the record's version is used but status is Warning.
        assert_eq!(result.version, "9.9");
        assert_eq!(result.status, VerificationStatus::Warning);
        assert!(result
            .notes
            .iter()
            .any(|n| n.contains("no readable install location")));
    }

    #[test]
    fn install_record_location_is_searched() {
        let temp = TempDir::new().unwrap();
        let exe = temp.path().join("toolx");
        fake_binary(&exe);

        let mut def = definition("toolx");
        def.install_records = vec!["reg:HKLM\\SOFTWARE\\Toolx".into()];
        let mut records = FakeRecords::default();
        records.0.insert(
            "reg:HKLM\\SOFTWARE\\Toolx".into(),
            InstallRecord::new("reg:HKLM\\SOFTWARE\\Toolx")
                .with_location(temp.path())
                .with_version("1.0"),
        );

        let probe = ScriptedProbe::default()
            .answer(&format!("{} --version", exe.display()), "toolx 1.0.1");
        let d = detector(probe, records, Vec::new());
        let result = d.detect(&def);

        assert_eq!(result.executable_path, Some(exe));
        // Probe output wins over the record's version.
        assert_eq!(result.version, "toolx 1.0.1");
        assert_eq!(result.status, VerificationStatus::Installed);
    }

    #[test]
    fn probe_options_prepend_executable_dir() {
        let d = detector(
            ScriptedProbe::default(),
            FakeRecords::default(),
            vec![PathBuf::from("/usr/bin")],
        );
        let options = d.probe_options(Some(Path::new("/opt/tool/bin/tool")));
        assert_eq!(
            options.search_path.unwrap(),
            vec![PathBuf::from("/opt/tool/bin"), PathBuf::from("/usr/bin")]
        );
    }
}
