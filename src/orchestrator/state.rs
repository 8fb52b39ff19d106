//! In-memory session state owned by the orchestrator.

use crate::config::ToolkitConfig;
use crate::orchestrator::configurator::ConfigResult;
use crate::orchestrator::installer::InstallResult;
use crate::verification::CategoryResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Latest result per category for each operation kind.
///
/// Never persisted. Only the orchestrator's category operations write it.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    is_initialized: bool,
    install_results: BTreeMap<String, InstallResult>,
    test_results: BTreeMap<String, CategoryResult>,
    config_results: BTreeMap<String, ConfigResult>,
}

impl SessionState {
    /// State for an orchestrator whose preconditions passed.
    pub fn initialized() -> Self {
        Self {
            is_initialized: true,
            ..Default::default()
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.is_initialized
    }

    pub fn record_install(&mut self, result: InstallResult) {
        self.install_results.insert(result.category.clone(), result);
    }

    pub fn record_test(&mut self, result: CategoryResult) {
        self.test_results.insert(result.category.clone(), result);
    }

    pub fn record_config(&mut self, result: ConfigResult) {
        self.config_results.insert(result.category.clone(), result);
    }

    /// Clear every result map. `is_initialized` is untouched.
    pub fn clear(&mut self) {
        self.install_results.clear();
        self.test_results.clear();
        self.config_results.clear();
    }

    /// Read-only copy of the state plus the active configuration.
    pub fn snapshot(&self, configuration: &ToolkitConfig) -> SessionSnapshot {
        SessionSnapshot {
            is_initialized: self.is_initialized,
            version: env!("CARGO_PKG_VERSION").to_string(),
            install_results: self.install_results.clone(),
            test_results: self.test_results.clone(),
            config_results: self.config_results.clone(),
            configuration: configuration.clone(),
        }
    }
}

/// Serializable view of a session, returned by `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub is_initialized: bool,
    pub version: String,
    pub install_results: BTreeMap<String, InstallResult>,
    pub test_results: BTreeMap<String, CategoryResult>,
    pub config_results: BTreeMap<String, ConfigResult>,
    pub configuration: ToolkitConfig,
}

impl SessionSnapshot {
    /// Whether no operation has recorded anything yet.
    pub fn is_empty(&self) -> bool {
        self.install_results.is_empty()
            && self.test_results.is_empty()
            && self.config_results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::installer::InstallMode;
    use std::time::Duration;

    #[test]
    fn records_latest_result_per_category() {
        let mut state = SessionState::initialized();
        state.record_test(CategoryResult::default().with_category("cloud-tools"));
        let mut second = CategoryResult::from_results(Vec::new(), Duration::from_millis(5));
        second.category = "cloud-tools".into();
        state.record_test(second);

        let snapshot = state.snapshot(&ToolkitConfig::default());
        assert_eq!(snapshot.test_results.len(), 1);
        assert_eq!(
            snapshot.test_results["cloud-tools"].duration,
            Duration::from_millis(5)
        );
    }

    #[test]
    fn clear_keeps_initialized_flag() {
        let mut state = SessionState::initialized();
        state.record_install(InstallResult::new("applications", InstallMode::Install, false));
        state.record_config(ConfigResult::from_steps("terminal", Vec::new()));
        state.clear();

        assert!(state.is_initialized());
        assert!(state.snapshot(&ToolkitConfig::default()).is_empty());
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let mut state = SessionState::initialized();
        state.record_test(CategoryResult::default().with_category("ai-tools"));
        let snapshot = state.snapshot(&ToolkitConfig::default());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["is_initialized"], true);
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert!(json["test_results"]["ai-tools"].is_object());
        assert!(json["configuration"]["settings"].is_object());
        assert!(!snapshot.is_empty());
    }
}
