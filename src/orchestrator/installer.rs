//! Install, update and uninstall collaborators.
//!
//! The orchestrator only needs a pass/fail outcome and an executable
//! location per tool. [`CommandInstaller`] provides that by running the
//! argv commands declared in each tool's catalog entry for the current
//! platform, then re-detecting the tool.

use crate::config::{PlatformCommands, ToolDefinition, ToolkitConfig};
use crate::orchestrator::category::Category;
use crate::shell::{Platform, ProbeOptions, ProcessProbe};
use crate::verification::ToolVerifier;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// What an install run does to each tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallMode {
    /// Install tools that are missing; skip the ones already present.
    #[default]
    Install,
    /// Run install commands even for tools already present.
    Reinstall,
    /// Run update commands for installed tools.
    Update,
    /// Run uninstall commands for installed tools.
    Uninstall,
}

impl fmt::Display for InstallMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InstallMode::Install => "install",
            InstallMode::Reinstall => "reinstall",
            InstallMode::Update => "update",
            InstallMode::Uninstall => "uninstall",
        };
        f.write_str(label)
    }
}

/// Options for an install run.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    pub mode: InstallMode,
    /// Restrict the run to these tools (empty = whole category).
    pub tools: Vec<String>,
    /// Report what would run without running it.
    pub dry_run: bool,
}

/// What happened to one tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallAction {
    Installed,
    Updated,
    Uninstalled,
    /// Nothing to do (already installed, or not installed for update/uninstall).
    Skipped,
    /// Dry run: the commands that would have run are in the message.
    Planned,
    Failed,
}

/// Per-tool install outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInstallOutcome {
    pub tool: String,
    pub action: InstallAction,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ToolInstallOutcome {
    fn new(tool: &str, action: InstallAction, success: bool) -> Self {
        Self {
            tool: tool.to_string(),
            action,
            success,
            executable_path: None,
            message: None,
        }
    }

    fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Result of an install run over one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallResult {
    pub category: String,
    pub mode: InstallMode,
    pub dry_run: bool,
    pub outcomes: Vec<ToolInstallOutcome>,
}

impl InstallResult {
    pub fn new(category: &str, mode: InstallMode, dry_run: bool) -> Self {
        Self {
            category: category.to_string(),
            mode,
            dry_run,
            outcomes: Vec::new(),
        }
    }

    /// Whether every tool succeeded (skips count as success).
    pub fn success(&self) -> bool {
        self.outcomes.iter().all(|o| o.success)
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.success).count()
    }
}

/// Performs install-mode actions for a category.
pub trait Installer: Send + Sync {
    fn install(
        &self,
        category: Category,
        tools: &[String],
        config: &ToolkitConfig,
        options: &InstallOptions,
    ) -> InstallResult;
}

/// [`Installer`] that runs each tool's catalog commands for this platform.
pub struct CommandInstaller {
    probe: Arc<dyn ProcessProbe>,
    verifier: Arc<ToolVerifier>,
    platform: Platform,
    timeout: Duration,
}

impl CommandInstaller {
    pub fn new(
        probe: Arc<dyn ProcessProbe>,
        verifier: Arc<ToolVerifier>,
        platform: Platform,
        timeout: Duration,
    ) -> Self {
        Self {
            probe,
            verifier,
            platform,
            timeout,
        }
    }

    fn commands<'a>(&self, definition: &'a ToolDefinition, mode: InstallMode) -> &'a PlatformCommands {
        match mode {
            InstallMode::Install | InstallMode::Reinstall => &definition.install,
            InstallMode::Update => &definition.update,
            InstallMode::Uninstall => &definition.uninstall,
        }
    }

    fn handle(&self, definition: &ToolDefinition, options: &InstallOptions) -> ToolInstallOutcome {
        let name = definition.name.as_str();
        let before = self.verifier.detector().detect(definition);

        let skip = match options.mode {
            InstallMode::Install => before.installed.then_some("already installed"),
            InstallMode::Update | InstallMode::Uninstall => {
                (!before.installed).then_some("not installed")
            }
            InstallMode::Reinstall => None,
        };
        if let Some(reason) = skip {
            let mut outcome =
                ToolInstallOutcome::new(name, InstallAction::Skipped, true).with_message(reason);
            outcome.executable_path = before.executable_path;
            return outcome;
        }

        let commands = self
            .commands(definition, options.mode)
            .for_platform(self.platform);
        if commands.is_empty() {
            return ToolInstallOutcome::new(name, InstallAction::Failed, false).with_message(
                format!("no {} commands for {}", options.mode, self.platform),
            );
        }

        if options.dry_run {
            let planned: Vec<String> = commands.iter().map(|c| c.to_string()).collect();
            return ToolInstallOutcome::new(name, InstallAction::Planned, true)
                .with_message(planned.join(" && "));
        }

        let probe_options = ProbeOptions::with_timeout(self.timeout);
        for command in commands {
            tracing::info!("{}: running {}", name, command);
            let output = self.probe.execute(command, &probe_options);
            if !output.success() {
                let reason = output.failure_reason().unwrap_or_default();
                tracing::warn!("{}: '{}' failed: {}", name, command, reason);
                return ToolInstallOutcome::new(name, InstallAction::Failed, false)
                    .with_message(format!("{}: {}", command, reason));
            }
        }

        let after = self.verifier.detector().detect(definition);
        match options.mode {
            InstallMode::Uninstall if after.installed => {
                ToolInstallOutcome::new(name, InstallAction::Failed, false)
                    .with_message("still detected after uninstall")
            }
            InstallMode::Uninstall => ToolInstallOutcome::new(name, InstallAction::Uninstalled, true),
            _ if !after.installed => ToolInstallOutcome::new(name, InstallAction::Failed, false)
                .with_message("commands succeeded but the tool was not detected"),
            mode => {
                let action = if mode == InstallMode::Update {
                    InstallAction::Updated
                } else {
                    InstallAction::Installed
                };
                let mut outcome = ToolInstallOutcome::new(name, action, true);
                outcome.message = after.has_version().then(|| after.version.clone());
                outcome.executable_path = after.executable_path;
                outcome
            }
        }
    }
}

impl Installer for CommandInstaller {
    fn install(
        &self,
        category: Category,
        tools: &[String],
        config: &ToolkitConfig,
        options: &InstallOptions,
    ) -> InstallResult {
        let mut result = InstallResult::new(category.as_str(), options.mode, options.dry_run);

        for name in tools {
            let outcome = match config.tool(name) {
                Some(definition) => self.handle(definition, options),
                None => ToolInstallOutcome::new(name, InstallAction::Failed, false)
                    .with_message("no catalog entry"),
            };
            result.outcomes.push(outcome);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::shell::{CommandLine, ProbeOutput};
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records commands; "install-ok" creates the tool, anything else fails.
    struct InstallProbe {
        bin: PathBuf,
        calls: Mutex<Vec<String>>,
    }

    impl ProcessProbe for InstallProbe {
        fn execute(&self, command: &CommandLine, _options: &ProbeOptions) -> ProbeOutput {
            self.calls.lock().unwrap().push(command.to_string());
            match command.program() {
                "install-ok" => {
                    let path = self.bin.join(&command.args()[0]);
                    fs::write(&path, "#!/bin/sh\n").unwrap();
                    #[cfg(unix)]
                    {
                        use std::os::unix::fs::PermissionsExt;
                        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
                    }
                    ProbeOutput {
                        exit_code: Some(0),
                        ..Default::default()
                    }
                }
                _ => ProbeOutput {
                    exit_code: Some(1),
                    stderr: "boom".into(),
                    ..Default::default()
                },
            }
        }
    }

    fn setup(temp: &Path) -> (Arc<InstallProbe>, CommandInstaller) {
        let probe = Arc::new(InstallProbe {
            bin: temp.to_path_buf(),
            calls: Mutex::new(Vec::new()),
        });
        let verifier = Arc::new(ToolVerifier::with_probe(
            probe.clone(),
            &Settings::default(),
            vec![temp.to_path_buf()],
        ));
        let installer =
            CommandInstaller::new(probe.clone(), verifier, Platform::Linux, Duration::from_secs(5));
        (probe, installer)
    }

    fn config_with(name: &str, install: &str) -> ToolkitConfig {
        let mut def = ToolDefinition::bare(name);
        def.install.all = vec![CommandLine::parse(install).unwrap()];
        let mut config = ToolkitConfig::default();
        config.tools.insert(name.to_string(), def);
        config
    }

    #[test]
    fn installs_missing_tool_and_reports_path() {
        let temp = TempDir::new().unwrap();
        let (_, installer) = setup(temp.path());
        let config = config_with("toolx", "install-ok toolx");

        let result = installer.install(
            Category::DevelopmentTools,
            &["toolx".to_string()],
            &config,
            &InstallOptions::default(),
        );

        assert!(result.success());
        let outcome = &result.outcomes[0];
        assert_eq!(outcome.action, InstallAction::Installed);
        assert_eq!(outcome.executable_path, Some(temp.path().join("toolx")));
    }

    #[test]
    fn skips_installed_tool_unless_reinstalling() {
        let temp = TempDir::new().unwrap();
        let (probe, installer) = setup(temp.path());
        let config = config_with("toolx", "install-ok toolx");
        let tools = vec!["toolx".to_string()];

        installer.install(Category::AiTools, &tools, &config, &InstallOptions::default());
        let again = installer.install(Category::AiTools, &tools, &config, &InstallOptions::default());
        assert_eq!(again.outcomes[0].action, InstallAction::Skipped);

        let calls_before = probe.calls.lock().unwrap().len();
        let reinstall = InstallOptions {
            mode: InstallMode::Reinstall,
            ..Default::default()
        };
        let result = installer.install(Category::AiTools, &tools, &config, &reinstall);
        assert_eq!(result.outcomes[0].action, InstallAction::Installed);
        assert!(probe.calls.lock().unwrap().len() > calls_before);
    }

    #[test]
    fn failing_command_is_recorded() {
        let temp = TempDir::new().unwrap();
        let (_, installer) = setup(temp.path());
        let config = config_with("toolx", "broken-installer toolx");

        let result = installer.install(
            Category::CloudTools,
            &["toolx".to_string()],
            &config,
            &InstallOptions::default(),
        );
        assert!(!result.success());
        assert_eq!(result.failed(), 1);
        assert!(result.outcomes[0]
            .message
            .as_deref()
            .unwrap()
            .contains("exited with code 1"));
    }

    #[test]
    fn dry_run_plans_without_running() {
        let temp = TempDir::new().unwrap();
        let (probe, installer) = setup(temp.path());
        let config = config_with("toolx", "install-ok toolx");

        let options = InstallOptions {
            dry_run: true,
            ..Default::default()
        };
        let result = installer.install(Category::Applications, &["toolx".into()], &config, &options);

        assert_eq!(result.outcomes[0].action, InstallAction::Planned);
        assert_eq!(result.outcomes[0].message.as_deref(), Some("install-ok toolx"));
        // The install command itself never ran.
        assert!(!probe
            .calls
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.starts_with("install-ok")));
    }

    #[test]
    fn update_skips_missing_tool() {
        let temp = TempDir::new().unwrap();
        let (_, installer) = setup(temp.path());
        let config = config_with("toolx", "install-ok toolx");

        let options = InstallOptions {
            mode: InstallMode::Update,
            ..Default::default()
        };
        let result = installer.install(Category::Applications, &["toolx".into()], &config, &options);
        assert_eq!(result.outcomes[0].action, InstallAction::Skipped);
        assert!(result.success());
    }

    #[test]
    fn unknown_tool_and_missing_commands_fail() {
        let temp = TempDir::new().unwrap();
        let (_, installer) = setup(temp.path());
        let mut config = ToolkitConfig::default();
        config
            .tools
            .insert("bare".to_string(), ToolDefinition::bare("bare"));

        let result = installer.install(
            Category::Applications,
            &["ghost".to_string(), "bare".to_string()],
            &config,
            &InstallOptions::default(),
        );
        assert_eq!(result.failed(), 2);
        assert!(result.outcomes[1]
            .message
            .as_deref()
            .unwrap()
            .contains("no install commands"));
    }
}
