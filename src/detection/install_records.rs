//! Persisted install records.
//!
//! Package databases and the Windows registry remember software that was
//! installed even when its binaries are not on PATH. A locator names one
//! record:
//!
//! | Locator                       | Backend                          |
//! |-------------------------------|----------------------------------|
//! | `reg:HKLM\...` / `HKLM\...`   | `reg query` (Windows registry)   |
//! | `dpkg:<package>`              | `dpkg-query -W`                  |
//! | `rpm:<package>`               | `rpm -q`                         |
//! | `brew:<formula>`              | `brew list --versions`/`--prefix`|
//!
//! Each backend runs through a [`ProcessProbe`]; output parsing is kept in
//! pure functions.

use crate::shell::{CommandLine, ProbeOptions, ProcessProbe};
use regex::Regex;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// A record found for a locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRecord {
    /// Locator that produced the record.
    pub locator: String,
    /// Install location, when the record has one.
    pub location: Option<PathBuf>,
    /// Version, when the record has one.
    pub version: Option<String>,
}

impl InstallRecord {
    pub fn new(locator: &str) -> Self {
        Self {
            locator: locator.to_string(),
            location: None,
            version: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }
}

/// Source of persisted install records.
pub trait InstallRecords: Send + Sync {
    /// Look up one locator. `None` means no record (or no backend).
    fn lookup(&self, locator: &str) -> Option<InstallRecord>;
}

/// A parsed locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordLocator {
    Registry(String),
    Dpkg(String),
    Rpm(String),
    Brew(String),
}

impl RecordLocator {
    /// Parse a locator string. Unknown prefixes yield `None`.
    pub fn parse(locator: &str) -> Option<Self> {
        let locator = locator.trim();
        let upper = locator.to_ascii_uppercase();

        if let Some(key) = locator.strip_prefix("reg:") {
            return non_empty(key).map(Self::Registry);
        }
        if ["HKLM\\", "HKCU\\", "HKEY_LOCAL_MACHINE\\", "HKEY_CURRENT_USER\\"]
            .iter()
            .any(|p| upper.starts_with(p))
        {
            return Some(Self::Registry(locator.to_string()));
        }
        if let Some(pkg) = locator.strip_prefix("dpkg:") {
            return non_empty(pkg).map(Self::Dpkg);
        }
        if let Some(pkg) = locator.strip_prefix("rpm:") {
            return non_empty(pkg).map(Self::Rpm);
        }
        if let Some(formula) = locator.strip_prefix("brew:") {
            return non_empty(formula).map(Self::Brew);
        }
        None
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// [`InstallRecords`] backed by the real registry and package databases.
pub struct SystemInstallRecords {
    probe: Arc<dyn ProcessProbe>,
    timeout: Duration,
}

impl SystemInstallRecords {
    pub fn new(probe: Arc<dyn ProcessProbe>, timeout: Duration) -> Self {
        Self { probe, timeout }
    }

    fn run(&self, command: CommandLine) -> Option<String> {
        let output = self
            .probe
            .execute(&command, &ProbeOptions::with_timeout(self.timeout));
        if output.success() {
            Some(output.stdout)
        } else {
            tracing::debug!(
                "Install record query '{}' failed: {}",
                command,
                output.failure_reason().unwrap_or_default()
            );
            None
        }
    }
}

impl InstallRecords for SystemInstallRecords {
    fn lookup(&self, locator: &str) -> Option<InstallRecord> {
        let parsed = match RecordLocator::parse(locator) {
            Some(parsed) => parsed,
            None => {
                tracing::warn!("Unrecognized install record locator '{}'", locator);
                return None;
            }
        };

        match parsed {
            RecordLocator::Registry(key) => {
                let stdout = self.run(CommandLine::new("reg", &["query", &key]))?;
                Some(parse_reg_query(locator, &stdout))
            }
            RecordLocator::Dpkg(pkg) => {
                let stdout = self.run(CommandLine::new(
                    "dpkg-query",
                    &["-W", "--showformat=${Status}\t${Version}\n", &pkg],
                ))?;
                parse_dpkg_query(locator, &stdout)
            }
            RecordLocator::Rpm(pkg) => {
                let stdout = self.run(CommandLine::new(
                    "rpm",
                    &["-q", "--queryformat", "%{VERSION}-%{RELEASE}\n", &pkg],
                ))?;
                parse_rpm_query(locator, &stdout)
            }
            RecordLocator::Brew(formula) => {
                let stdout =
                    self.run(CommandLine::new("brew", &["list", "--versions", &formula]))?;
                let mut record = parse_brew_versions(locator, &stdout)?;
                record.location = self
                    .run(CommandLine::new("brew", &["--prefix", &formula]))
                    .and_then(|out| non_empty(&out))
                    .map(PathBuf::from);
                Some(record)
            }
        }
    }
}

/// Value names that hold an install directory.
const REG_LOCATION_NAMES: &[&str] = &["InstallLocation", "InstallDir", "InstallPath", "Path"];

/// Value names that hold a version.
const REG_VERSION_NAMES: &[&str] = &["DisplayVersion", "Version", "ProductVersion"];

/// Parse `reg query` output into a record.
///
/// A successful query means the key exists, so a record is always
/// produced; location and version are filled when their values are present
/// and non-empty.
pub fn parse_reg_query(locator: &str, output: &str) -> InstallRecord {
    static VALUE_LINE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = VALUE_LINE.get_or_init(|| Regex::new(r"^\s+(.+?)\s+REG_[A-Z0-9_]+(?:\s+(.*?))?\s*$").ok());

    let mut record = InstallRecord::new(locator);
    let Some(re) = re else {
        return record;
    };

    let values: Vec<(String, String)> = output
        .lines()
        .filter_map(|line| re.captures(line))
        .map(|caps| {
            let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let data = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
            (name.to_string(), data.to_string())
        })
        .collect();

    let find = |names: &[&str]| {
        names.iter().find_map(|wanted| {
            values
                .iter()
                .find(|(name, data)| name.eq_ignore_ascii_case(wanted) && !data.is_empty())
                .map(|(_, data)| data.trim_matches('"').to_string())
        })
    };

    record.location = find(REG_LOCATION_NAMES).map(PathBuf::from);
    record.version = find(REG_VERSION_NAMES);
    record
}

/// Parse `dpkg-query -W -f='${Status}\t${Version}\n'` output.
///
/// Only packages whose status ends in `installed` count; removed packages
/// with leftover config (`deinstall ok config-files`) do not.
pub fn parse_dpkg_query(locator: &str, output: &str) -> Option<InstallRecord> {
    let line = output.lines().find(|l| !l.trim().is_empty())?;
    let (status, version) = line.split_once('\t').unwrap_or((line, ""));
    let status_word = status.split_whitespace().last()?;

    if status_word != "installed" {
        return None;
    }

    let mut record = InstallRecord::new(locator);
    if !version.trim().is_empty() {
        record.version = Some(version.trim().to_string());
    }
    Some(record)
}

/// Parse `rpm -q --queryformat '%{VERSION}-%{RELEASE}\n'` output.
pub fn parse_rpm_query(locator: &str, output: &str) -> Option<InstallRecord> {
    let line = output.lines().map(str::trim).find(|l| !l.is_empty())?;
    if line.contains("is not installed") {
        return None;
    }
    Some(InstallRecord::new(locator).with_version(line))
}

/// Parse `brew list --versions <formula>` output (`git 2.43.0 2.42.1`).
///
/// The newest version is listed first.
pub fn parse_brew_versions(locator: &str, output: &str) -> Option<InstallRecord> {
    let line = output.lines().map(str::trim).find(|l| !l.is_empty())?;
    let mut parts = line.split_whitespace();
    parts.next()?;

    let mut record = InstallRecord::new(locator);
    record.version = parts.next().map(str::to_string);
    Some(record)
}
