//! Configuration schema definitions for toolsmith.
//!
//! These structs map onto the YAML catalog format. The built-in catalog in
//! `defaults/` and any user overrides deserialize into [`ToolkitConfig`].

use crate::shell::{CommandLine, Platform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root configuration: settings, tool catalog, categories, configure steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolkitConfig {
    /// Global settings.
    pub settings: Settings,

    /// Tool definitions keyed by tool name.
    pub tools: BTreeMap<String, ToolDefinition>,

    /// Install/test category name -> ordered tool names.
    pub categories: BTreeMap<String, Vec<String>>,

    /// Configure category name -> ordered steps.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub configure: BTreeMap<String, Vec<ConfigureStep>>,
}

impl ToolkitConfig {
    /// Look up a tool definition by name.
    pub fn tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// Tool names listed under a category, in declaration order.
    pub fn category_tools(&self, category: &str) -> &[String] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Steps listed under a configure category.
    pub fn configure_steps(&self, category: &str) -> &[ConfigureStep] {
        self.configure
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Copy each map key into the definition's `name` field when unset.
    pub(crate) fn fill_tool_names(&mut self) {
        for (name, tool) in self.tools.iter_mut() {
            if tool.name.is_empty() {
                tool.name = name.clone();
            }
        }
    }
}

/// Global settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fraction of smoke tests that must pass for a tool to count as working.
    pub functionality_threshold: f64,

    /// Deadline for version and smoke-test probes, in seconds.
    pub probe_timeout_secs: u64,

    /// Deadline for install/update/uninstall and configure commands, in seconds.
    pub install_timeout_secs: u64,

    /// Worker threads used for batch verification (1 = sequential).
    pub max_parallel: usize,

    /// Number of version-output lines to keep.
    pub version_lines: usize,

    /// Refuse to start unless running as root/Administrator.
    pub require_elevated: bool,

    /// Programs that must be resolvable on PATH before anything runs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required_commands: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            functionality_threshold: 0.7,
            probe_timeout_secs: 30,
            install_timeout_secs: 900,
            max_parallel: 4,
            version_lines: 1,
            require_elevated: false,
            required_commands: Vec::new(),
        }
    }
}

/// How to detect, smoke-test and (optionally) install one piece of software.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolDefinition {
    /// Tool name. Filled from the catalog key when omitted.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Candidate executable names, most preferred first.
    pub executable_names: Vec<String>,

    /// Version probes, tried in order.
    pub version_commands: Vec<CommandLine>,

    /// Smoke tests.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub test_commands: Vec<TestCommand>,

    /// Install location globs (`$VAR`, `${VAR}`, `%VAR%`, `~`, wildcards).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub common_paths: Vec<String>,

    /// Install-record locators (`reg:`, `dpkg:`, `rpm:`, `brew:`).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub install_records: Vec<String>,

    /// Install commands per platform.
    #[serde(skip_serializing_if = "PlatformCommands::is_empty")]
    pub install: PlatformCommands,

    /// Update commands per platform.
    #[serde(skip_serializing_if = "PlatformCommands::is_empty")]
    pub update: PlatformCommands,

    /// Uninstall commands per platform.
    #[serde(skip_serializing_if = "PlatformCommands::is_empty")]
    pub uninstall: PlatformCommands,
}

impl ToolDefinition {
    /// Minimal definition for a tool with no catalog entry.
    ///
    /// Looks for an executable called `name` and asks it for `--version`.
    pub fn bare(name: &str) -> Self {
        Self {
            name: name.to_string(),
            executable_names: vec![name.to_string()],
            version_commands: vec![CommandLine::new(name, &["--version"])],
            ..Default::default()
        }
    }
}

/// One smoke test: a command plus an optional expected-output pattern.
///
/// Accepts a bare command (`"git status"`) or a mapping with `command` and
/// `expected_output`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTestCommand")]
pub struct TestCommand {
    pub command: CommandLine,

    /// Regex (or literal, if it does not compile) the output must contain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTestCommand {
    Full {
        command: CommandLine,
        #[serde(default)]
        expected_output: Option<String>,
    },
    Command(CommandLine),
}

impl From<RawTestCommand> for TestCommand {
    fn from(raw: RawTestCommand) -> Self {
        match raw {
            RawTestCommand::Full {
                command,
                expected_output,
            } => Self {
                command,
                expected_output,
            },
            RawTestCommand::Command(command) => Self {
                command,
                expected_output: None,
            },
        }
    }
}

impl TestCommand {
    /// A smoke test with an expected pattern.
    pub fn expecting(command: CommandLine, pattern: &str) -> Self {
        Self {
            command,
            expected_output: Some(pattern.to_string()),
        }
    }
}

/// Commands keyed by platform.
///
/// A platform-specific list wins over `all` when it is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformCommands {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub windows: Vec<CommandLine>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub macos: Vec<CommandLine>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub linux: Vec<CommandLine>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub all: Vec<CommandLine>,
}

impl PlatformCommands {
    /// Whether no commands are declared at all.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty() && self.macos.is_empty() && self.linux.is_empty() && self.all.is_empty()
    }

    /// Commands to run on `platform`.
    pub fn for_platform(&self, platform: Platform) -> &[CommandLine] {
        let specific = match platform {
            Platform::Windows => &self.windows,
            Platform::MacOS => &self.macos,
            Platform::Linux => &self.linux,
            Platform::Other => &self.all,
        };
        if specific.is_empty() {
            &self.all
        } else {
            specific
        }
    }
}

/// One step of a configure category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigureStep {
    /// What the step does, shown to the user.
    pub description: String,

    pub command: CommandLine,

    /// Platforms the step applies to (empty = all).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<Platform>,
}

impl ConfigureStep {
    /// Whether the step should run on `platform`.
    pub fn applies_to(&self, platform: Platform) -> bool {
        self.platforms.is_empty() || self.platforms.contains(&platform)
    }
}
