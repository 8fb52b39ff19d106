//! Detection of installed tools.

pub mod common_paths;
pub mod detector;
pub mod install_records;
pub mod version;

pub use common_paths::{expand_common_path, expand_placeholders};
pub use detector::Detector;
pub use install_records::{
    InstallRecord, InstallRecords, RecordLocator, SystemInstallRecords,
};
pub use version::{extract_version, short_version, trim_version_output};
