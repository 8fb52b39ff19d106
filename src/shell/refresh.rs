//! PATH repair for tools found outside of PATH.
//!
//! Detection can find a tool through a common install location or an
//! install record even when its directory never made it onto PATH. A
//! [`PathFixPlan`] collects those directories and renders (or appends) the
//! shell lines that put them back.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::path::path_contains;
use super::platform::{ShellInfo, ShellType};
use crate::error::Result;

/// Marker written above lines appended by `fix-path --apply`.
const MARKER: &str = "# Added by toolsmith fix-path";

/// Directories that need to be added to PATH, and how to add them.
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use toolsmith::shell::{PathFixPlan, ShellType};
///
/// let plan = PathFixPlan::compute(
///     vec![PathBuf::from("/opt/tool/bin")],
///     &[PathBuf::from("/usr/bin")],
///     ShellType::Bash,
///     None,
/// );
/// assert!(plan.needs_refresh());
/// assert_eq!(plan.export_lines(), vec!["export PATH=\"/opt/tool/bin:$PATH\""]);
/// ```
#[derive(Debug, Clone)]
pub struct PathFixPlan {
    /// Directories missing from PATH, in discovery order.
    pub missing_dirs: Vec<PathBuf>,
    /// Shell syntax to render exports in.
    pub shell: ShellType,
    /// File that `apply` appends to.
    pub config_file: Option<PathBuf>,
}

impl PathFixPlan {
    /// Compute the plan from candidate directories and the current PATH.
    pub fn compute(
        dirs: impl IntoIterator<Item = PathBuf>,
        path_entries: &[PathBuf],
        shell: ShellType,
        config_file: Option<PathBuf>,
    ) -> Self {
        let mut missing_dirs: Vec<PathBuf> = Vec::new();
        for dir in dirs {
            if !path_contains(path_entries, &dir) && !path_contains(&missing_dirs, &dir) {
                missing_dirs.push(dir);
            }
        }

        Self {
            missing_dirs,
            shell,
            config_file,
        }
    }

    /// Compute the plan for the detected shell.
    pub fn for_shell(
        dirs: impl IntoIterator<Item = PathBuf>,
        path_entries: &[PathBuf],
        shell: &ShellInfo,
    ) -> Self {
        Self::compute(
            dirs,
            path_entries,
            shell.name,
            shell.primary_config_file().map(Path::to_path_buf),
        )
    }

    /// Whether any directory is missing from PATH.
    pub fn needs_refresh(&self) -> bool {
        !self.missing_dirs.is_empty()
    }

    /// One export line per missing directory.
    pub fn export_lines(&self) -> Vec<String> {
        self.missing_dirs
            .iter()
            .map(|dir| self.shell.path_export_line(dir))
            .collect()
    }

    /// Append export lines to the shell config file.
    ///
    /// Lines already present in the file are skipped. Returns the file that
    /// was written, or `None` when there was nothing to write.
    pub fn apply(&self) -> Result<Option<PathBuf>> {
        let Some(config_file) = &self.config_file else {
            return Ok(None);
        };

        let existing = fs::read_to_string(config_file).unwrap_or_default();
        let new_lines: Vec<String> = self
            .export_lines()
            .into_iter()
            .filter(|line| !existing.lines().any(|l| l.trim() == line))
            .collect();

        if new_lines.is_empty() {
            return Ok(None);
        }

        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(config_file)?;
        if !existing.is_empty() && !existing.ends_with('\n') {
            writeln!(file)?;
        }
        writeln!(file, "\n{}", MARKER)?;
        for line in &new_lines {
            writeln!(file, "{}", line)?;
        }

        tracing::info!(
            "Appended {} PATH entr{} to {}",
            new_lines.len(),
            if new_lines.len() == 1 { "y" } else { "ies" },
            config_file.display()
        );

        Ok(Some(config_file.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn skips_directories_already_on_path() {
        let plan = PathFixPlan::compute(
            vec![PathBuf::from("/usr/bin"), PathBuf::from("/opt/go/bin")],
            &[PathBuf::from("/usr/bin")],
            ShellType::Bash,
            None,
        );
        assert_eq!(plan.missing_dirs, vec![PathBuf::from("/opt/go/bin")]);
    }

    #[test]
    fn deduplicates_candidates() {
        let plan = PathFixPlan::compute(
            vec![PathBuf::from("/opt/go/bin"), PathBuf::from("/opt/go/bin/")],
            &[],
            ShellType::Zsh,
            None,
        );
        assert_eq!(plan.missing_dirs.len(), 1);
    }

    #[test]
    fn no_refresh_when_nothing_missing() {
        let plan = PathFixPlan::compute(Vec::new(), &[], ShellType::Bash, None);
        assert!(!plan.needs_refresh());
        assert!(plan.export_lines().is_empty());
    }

    #[test]
    fn apply_without_config_file_is_noop() {
        let plan = PathFixPlan::compute(
            vec![PathBuf::from("/opt/go/bin")],
            &[],
            ShellType::Bash,
            None,
        );
        assert!(plan.apply().unwrap().is_none());
    }

    #[test]
    fn apply_appends_once() {
        let temp = TempDir::new().unwrap();
        let rc = temp.path().join(".bashrc");
        fs::write(&rc, "alias ll='ls -l'").unwrap();

        let plan = PathFixPlan::compute(
            vec![PathBuf::from("/opt/go/bin")],
            &[],
            ShellType::Bash,
            Some(rc.clone()),
        );

        assert_eq!(plan.apply().unwrap(), Some(rc.clone()));
        // Second run finds the line and writes nothing.
        assert!(plan.apply().unwrap().is_none());

        let content = fs::read_to_string(&rc).unwrap();
        assert!(content.starts_with("alias ll='ls -l'\n"));
        assert_eq!(content.matches("export PATH=\"/opt/go/bin:$PATH\"").count(), 1);
        assert!(content.contains(MARKER));
    }

    #[test]
    fn apply_creates_missing_config_file() {
        let temp = TempDir::new().unwrap();
        let rc = temp.path().join(".config/fish/config.fish");

        let plan = PathFixPlan::compute(
            vec![PathBuf::from("/opt/go/bin")],
            &[],
            ShellType::Fish,
            Some(rc.clone()),
        );
        plan.apply().unwrap();

        let content = fs::read_to_string(&rc).unwrap();
        assert!(content.contains("fish_add_path \"/opt/go/bin\""));
    }
}
