//! Verification result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Version reported for tools whose version could not be determined.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Overall state of one tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// No detection strategy found the tool.
    NotInstalled,
    /// Found, version probe ran clean and smoke tests met the threshold.
    Installed,
    /// Found, but a version probe or the smoke tests failed.
    Warning,
    /// Verification itself could not complete.
    Error,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VerificationStatus::NotInstalled => "not installed",
            VerificationStatus::Installed => "installed",
            VerificationStatus::Warning => "warning",
            VerificationStatus::Error => "error",
        };
        write!(f, "{}", label)
    }
}

/// Detection strategy that located a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStrategy {
    /// An executable name resolved on the search path.
    Path,
    /// A common install location exists.
    CommonPath,
    /// A persisted install record exists.
    InstallRecord,
}

impl fmt::Display for DetectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DetectionStrategy::Path => "PATH",
            DetectionStrategy::CommonPath => "common path",
            DetectionStrategy::InstallRecord => "install record",
        };
        write!(f, "{}", label)
    }
}

/// Everything known about one tool after detection and smoke testing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub tool: String,
    pub installed: bool,

    /// Trimmed version output, or [`UNKNOWN_VERSION`].
    pub version: String,

    /// Resolved executable; `None` when not installed or not locatable.
    pub executable_path: Option<PathBuf>,

    /// Every path that supported the verdict.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<PathBuf>,

    pub status: VerificationStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Warning-level observations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<DetectionStrategy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functionality: Option<FunctionalityTestResult>,

    pub checked_at: DateTime<Utc>,

    #[serde(rename = "duration_ms", with = "duration_ms")]
    pub duration: Duration,
}

impl VerificationResult {
    /// A not-installed result for `tool`.
    pub fn not_installed(tool: &str) -> Self {
        Self {
            tool: tool.to_string(),
            installed: false,
            version: UNKNOWN_VERSION.to_string(),
            executable_path: None,
            evidence: Vec::new(),
            status: VerificationStatus::NotInstalled,
            error: None,
            notes: Vec::new(),
            strategy: None,
            functionality: None,
            checked_at: Utc::now(),
            duration: Duration::ZERO,
        }
    }

    /// A result for a verification that could not complete.
    pub fn error(tool: &str, message: impl Into<String>) -> Self {
        Self {
            status: VerificationStatus::Error,
            error: Some(message.into()),
            ..Self::not_installed(tool)
        }
    }

    /// Whether the version is known.
    pub fn has_version(&self) -> bool {
        self.version != UNKNOWN_VERSION
    }

    /// Record a warning-level observation.
    pub fn add_note(&mut self, note: impl Into<String>) {
        let note = note.into();
        tracing::warn!("{}: {}", self.tool, note);
        self.notes.push(note);
    }

    /// Attach smoke-test results; a failed run downgrades Installed to Warning.
    pub fn attach_functionality(&mut self, functionality: FunctionalityTestResult) {
        if !functionality.success && self.status == VerificationStatus::Installed {
            self.status = VerificationStatus::Warning;
        }
        self.functionality = Some(functionality);
    }
}

/// One smoke-test command outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Command as run.
    pub command: String,
    /// Captured stdout followed by stderr, trimmed.
    pub output: String,
    /// Expected pattern, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    pub passed: bool,
    /// Set when the command did not spawn or timed out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Scored outcome of a tool's smoke tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionalityTestResult {
    pub outcomes: Vec<TestOutcome>,
    pub passed: usize,
    pub total: usize,
    pub success: bool,
    pub threshold: f64,
    #[serde(rename = "duration_ms", with = "duration_ms")]
    pub duration: Duration,
}

impl FunctionalityTestResult {
    /// Score `outcomes` against `threshold`.
    ///
    /// No outcomes at all is a success: a tool with no smoke tests is
    /// considered functional.
    pub fn score(outcomes: Vec<TestOutcome>, threshold: f64, duration: Duration) -> Self {
        let total = outcomes.len();
        let passed = outcomes.iter().filter(|o| o.passed).count();
        let success = total == 0 || meets_threshold(passed, total, threshold);

        Self {
            outcomes,
            passed,
            total,
            success,
            threshold,
            duration,
        }
    }
}

/// `passed / total >= threshold`, tolerant of float rounding at the boundary.
pub fn meets_threshold(passed: usize, total: usize, threshold: f64) -> bool {
    if total == 0 {
        return true;
    }
    passed as f64 / total as f64 + f64::EPSILON >= threshold
}

/// Ordered results for a batch of tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryResult {
    /// Category the batch belongs to (empty for ad-hoc batches).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,

    /// Results in the order the tools were requested.
    pub results: Vec<VerificationResult>,

    pub installed: usize,
    pub not_found: usize,
    pub warnings: usize,

    #[serde(rename = "duration_ms", with = "duration_ms")]
    pub duration: Duration,
}

impl CategoryResult {
    /// Build from results, computing the counts.
    pub fn from_results(results: Vec<VerificationResult>, duration: Duration) -> Self {
        let mut category = Self {
            duration,
            ..Default::default()
        };
        for result in results {
            category.push(result);
        }
        category
    }

    /// Append one result and update counts.
    pub fn push(&mut self, result: VerificationResult) {
        if result.installed {
            self.installed += 1;
        } else if result.status == VerificationStatus::NotInstalled {
            self.not_found += 1;
        }
        if result.status == VerificationStatus::Warning {
            self.warnings += 1;
        }
        self.results.push(result);
    }

    /// Append every result of `other`.
    pub fn extend(&mut self, other: CategoryResult) {
        self.duration += other.duration;
        for result in other.results {
            self.push(result);
        }
    }

    /// Set the category label.
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    /// Result for a tool by name.
    pub fn get(&self, tool: &str) -> Option<&VerificationResult> {
        self.results.iter().find(|r| r.tool == tool)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Every tool installed and healthy.
    pub fn all_healthy(&self) -> bool {
        self.results
            .iter()
            .all(|r| r.status == VerificationStatus::Installed)
    }
}

/// Serialize [`Duration`] as integer milliseconds.
pub(crate) mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
