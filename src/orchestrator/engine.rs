//! The orchestrator: category-scoped operations over session state.

use crate::config::{load_config, ToolkitConfig};
use crate::error::Result;
use crate::orchestrator::category::{Category, ConfigureCategory, TestTarget};
use crate::orchestrator::configurator::{
    CommandConfigurator, ConfigResult, ConfigureOptions, Configurator,
};
use crate::orchestrator::installer::{CommandInstaller, InstallOptions, InstallResult, Installer};
use crate::orchestrator::preconditions::{PlatformPreconditions, PreconditionValidator};
use crate::orchestrator::state::{SessionSnapshot, SessionState};
use crate::shell::{Platform, ProcessProbe, SystemProbe};
use crate::verification::{CategoryResult, ToolVerifier};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Options for a test run.
#[derive(Debug, Clone, Default)]
pub struct TestOptions {
    /// Restrict the run to these tools (empty = whole category).
    pub tools: Vec<String>,
}

/// Runs install, test and configure operations per category and keeps the
/// latest result of each.
pub struct Orchestrator {
    config: ToolkitConfig,
    installer: Box<dyn Installer>,
    configurator: Box<dyn Configurator>,
    verifier: Arc<ToolVerifier>,
    state: SessionState,
}

impl Orchestrator {
    /// Validate preconditions and build an orchestrator.
    ///
    /// Returns the first failed precondition; no instance is produced then.
    pub fn new(
        config: ToolkitConfig,
        preconditions: &dyn PreconditionValidator,
        installer: Box<dyn Installer>,
        configurator: Box<dyn Configurator>,
        verifier: Arc<ToolVerifier>,
    ) -> Result<Self> {
        preconditions.validate(&config.settings)?;
        tracing::debug!(
            "Orchestrator ready with {} tools in {} categories",
            config.tools.len(),
            config.categories.len()
        );

        Ok(Self {
            config,
            installer,
            configurator,
            verifier,
            state: SessionState::initialized(),
        })
    }

    /// Load configuration and wire the system collaborators.
    pub fn from_environment(config_path: Option<&Path>) -> Result<Self> {
        let config = load_config(config_path)?;
        let settings = &config.settings;
        let platform = Platform::current();
        let install_timeout = Duration::from_secs(settings.install_timeout_secs);

        let probe: Arc<dyn ProcessProbe> = Arc::new(SystemProbe);
        let verifier = Arc::new(ToolVerifier::system(settings));
        let installer =
            CommandInstaller::new(probe.clone(), verifier.clone(), platform, install_timeout);
        let configurator = CommandConfigurator::new(probe, platform, install_timeout);

        Self::new(
            config,
            &PlatformPreconditions::current(),
            Box::new(installer),
            Box::new(configurator),
            verifier,
        )
    }

    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    pub fn verifier(&self) -> &ToolVerifier {
        &self.verifier
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }

    /// Install (or reinstall, update, uninstall) a category.
    pub fn install(&mut self, category: Category, options: &InstallOptions) -> InstallResult {
        tracing::info!("{} {}", options.mode, category);
        let tools = self.select_tools(category, &options.tools);
        let result = self
            .installer
            .install(category, &tools, &self.config, options);
        self.state.record_install(result.clone());
        result
    }

    /// Verify a category, or every category for [`TestTarget::All`].
    ///
    /// Each category's result is recorded under its own key; the returned
    /// result concatenates them in declaration order.
    pub fn test(&mut self, target: TestTarget, options: &TestOptions) -> CategoryResult {
        let mut combined = CategoryResult::default().with_category(target.as_str());

        for category in target.categories() {
            tracing::info!("Testing {}", category);
            let tools = self.select_tools(category, &options.tools);
            let result = self
                .verifier
                .verify_many(&tools, &self.config.tools)
                .with_category(category.as_str());
            tracing::info!(
                "{}: {} installed, {} not found, {} warnings",
                category,
                result.installed,
                result.not_found,
                result.warnings
            );
            self.state.record_test(result.clone());
            combined.extend(result);
        }

        combined
    }

    /// Run a configure category's steps.
    pub fn configure(
        &mut self,
        category: ConfigureCategory,
        options: &ConfigureOptions,
    ) -> ConfigResult {
        tracing::info!("Configuring {}", category);
        let steps = self.config.configure_steps(category.as_str());
        let result = self.configurator.configure(category, steps, options);
        self.state.record_config(result.clone());
        result
    }

    /// [`install`](Self::install) by category name.
    pub fn install_category(
        &mut self,
        name: &str,
        options: &InstallOptions,
    ) -> Result<InstallResult> {
        let category: Category = name.parse()?;
        Ok(self.install(category, options))
    }

    /// [`test`](Self::test) by category name; accepts `all`.
    pub fn test_category(&mut self, name: &str, options: &TestOptions) -> Result<CategoryResult> {
        let target: TestTarget = name.parse()?;
        Ok(self.test(target, options))
    }

    /// [`configure`](Self::configure) by category name.
    pub fn configure_category(
        &mut self,
        name: &str,
        options: &ConfigureOptions,
    ) -> Result<ConfigResult> {
        let category: ConfigureCategory = name.parse()?;
        Ok(self.configure(category, options))
    }

    /// Verify arbitrary tools by name without recording anything.
    pub fn check(&self, tools: &[String]) -> CategoryResult {
        self.verifier.verify_many(tools, &self.config.tools)
    }

    /// Snapshot of the session and configuration.
    pub fn status(&self) -> SessionSnapshot {
        self.state.snapshot(&self.config)
    }

    /// Clear recorded results. Preconditions are not re-run.
    pub fn reset(&mut self) {
        tracing::debug!("Resetting session state");
        self.state.clear();
    }

    /// The category's tools, narrowed to `filter` when it is non-empty.
    fn select_tools(&self, category: Category, filter: &[String]) -> Vec<String> {
        let tools = self.config.category_tools(category.as_str());
        if filter.is_empty() {
            return tools.to_vec();
        }
        for name in filter.iter().filter(|name| !tools.contains(name)) {
            tracing::warn!("{} is not in {}; skipping", name, category);
        }
        tools
            .iter()
            .filter(|name| filter.contains(name))
            .cloned()
            .collect()
    }
}
