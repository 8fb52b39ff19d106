//! PATH parsing and executable resolution.
//!
//! Resolution walks PATH entries directly instead of shelling out to
//! `which`/`where`, whose behavior varies across systems and is sometimes a
//! shell builtin with inconsistent error handling.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| split_path_value(&path))
        .unwrap_or_default()
}

/// Split a PATH-style value, dropping empty entries.
pub fn split_path_value(value: &OsString) -> Vec<PathBuf> {
    std::env::split_paths(value)
        .filter(|p| !p.as_os_str().is_empty())
        .collect()
}

/// Executable extensions to try for a bare name.
///
/// On Windows this is `PATHEXT` (falling back to the usual set); elsewhere a
/// name is only ever tried as-is.
pub fn executable_extensions() -> Vec<String> {
    if cfg!(windows) {
        std::env::var("PATHEXT")
            .unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string())
            .split(';')
            .filter(|e| !e.is_empty())
            .map(|e| e.to_lowercase())
            .collect()
    } else {
        Vec::new()
    }
}

/// Candidate file names for a tool name in one directory.
fn candidate_names(tool: &str, extensions: &[String]) -> Vec<String> {
    let mut names = vec![tool.to_string()];
    let has_extension = Path::new(tool).extension().is_some();
    if !has_extension {
        names.extend(extensions.iter().map(|ext| format!("{}{}", tool, ext)));
    }
    names
}

/// Look for `tool` directly inside `dir`.
pub fn find_in_dir(tool: &str, dir: &Path, extensions: &[String]) -> Option<PathBuf> {
    candidate_names(tool, extensions)
        .into_iter()
        .map(|name| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    let extensions = executable_extensions();
    path_entries
        .iter()
        .find_map(|dir| find_in_dir(tool, dir, &extensions))
}

/// Whether `dir` is already one of `path_entries`.
///
/// Trailing separators are ignored, and comparison is case-insensitive on
/// Windows.
pub fn path_contains(path_entries: &[PathBuf], dir: &Path) -> bool {
    let normalize = |p: &Path| {
        let s = p.to_string_lossy();
        let trimmed = s.trim_end_matches(['/', '\\']).to_string();
        if cfg!(windows) {
            trimmed.to_lowercase()
        } else {
            trimmed
        }
    };
    let wanted = normalize(dir);
    path_entries.iter().any(|entry| normalize(entry) == wanted)
}
