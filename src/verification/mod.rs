//! Tool verification: detection plus smoke testing.
//!
//! [`ToolVerifier`] composes a [`Detector`](crate::detection::Detector) and a
//! [`FunctionalityTester`] into one [`VerificationResult`] per tool, and
//! verifies batches into a [`CategoryResult`].

pub mod functionality;
pub mod result;
pub mod verifier;

pub use functionality::{output_matches, FunctionalityTester};
pub use result::{
    meets_threshold, CategoryResult, DetectionStrategy, FunctionalityTestResult, TestOutcome,
    VerificationResult, VerificationStatus, UNKNOWN_VERSION,
};
pub use verifier::ToolVerifier;
