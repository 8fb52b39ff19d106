//! Category-scoped orchestration of install, test and configure runs.
//!
//! [`Orchestrator`] validates environment preconditions once at
//! construction, then dispatches each operation to its collaborator
//! ([`Installer`], [`ToolVerifier`](crate::verification::ToolVerifier),
//! [`Configurator`]) and keeps the latest result per category.

pub mod category;
pub mod configurator;
pub mod engine;
pub mod installer;
pub mod preconditions;
pub mod state;

pub use category::{Category, ConfigureCategory, TestTarget};
pub use configurator::{
    CommandConfigurator, ConfigResult, ConfigureOptions, Configurator, StepOutcome,
};
pub use engine::{Orchestrator, TestOptions};
pub use installer::{
    CommandInstaller, InstallAction, InstallMode, InstallOptions, InstallResult, Installer,
    ToolInstallOutcome,
};
pub use preconditions::{NoPreconditions, PlatformPreconditions, PreconditionValidator};
pub use state::{SessionSnapshot, SessionState};
