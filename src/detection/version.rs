//! Version output handling.

use regex::Regex;
use std::sync::OnceLock;

/// Keep the first `lines` non-empty lines of probe output, trimmed.
///
/// Returns `None` when nothing is left.
pub fn trim_version_output(output: &str, lines: usize) -> Option<String> {
    let kept: Vec<&str> = output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(lines.max(1))
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept.join("\n"))
    }
}

/// Pull a dotted version number out of free-form version output.
pub fn extract_version(output: &str) -> Option<String> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        [r"(\d+\.\d+\.\d+)", r"version\s+(\d+\.\d+)", r"v(\d+\.\d+)"]
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect()
    });

    patterns.iter().find_map(|re| {
        re.captures(output)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// Short form for tables: the extracted number, else the first line.
///
/// ```
/// use toolsmith::detection::short_version;
///
/// assert_eq!(short_version("git version 2.43.0\nmore"), "2.43.0");
/// assert_eq!(short_version("unknown"), "unknown");
/// ```
pub fn short_version(version: &str) -> String {
    extract_version(version)
        .or_else(|| version.lines().next().map(|l| l.trim().to_string()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_keeps_first_line() {
        let output = "\n  git version 2.43.0  \nmore stuff\n";
        assert_eq!(
            trim_version_output(output, 1),
            Some("git version 2.43.0".to_string())
        );
    }

    #[test]
    fn trim_keeps_requested_lines() {
        let output = "Terraform v1.7.0\non linux_amd64\n\nextra";
        assert_eq!(
            trim_version_output(output, 2),
            Some("Terraform v1.7.0\non linux_amd64".to_string())
        );
    }

    #[test]
    fn trim_empty_output_is_none() {
        assert!(trim_version_output("  \n\n", 1).is_none());
    }

    #[test]
    fn extract_version_semver() {
        let output = "ruby 3.2.1 (2023-02-08 revision 31819e82c8)";
        assert_eq!(extract_version(output), Some("3.2.1".to_string()));
    }

    #[test]
    fn extract_version_with_v() {
        assert_eq!(extract_version("v18.17.0"), Some("18.17.0".to_string()));
        assert_eq!(extract_version("helm v3.14"), Some("3.14".to_string()));
    }

    #[test]
    fn extract_version_no_match() {
        assert!(extract_version("no version here").is_none());
    }

    #[test]
    fn short_version_falls_back_to_first_line() {
        assert_eq!(short_version("git version 2.43.0"), "2.43.0");
        assert_eq!(short_version("nightly\nbuild"), "nightly");
        assert_eq!(short_version(""), "");
    }
}
