//! Expansion of common install-path globs.
//!
//! A common path may contain environment placeholders in any of the three
//! spellings tool catalogs use (`$VAR`, `${VAR}`, `%VAR%`), a leading `~`,
//! and glob wildcards (`*`, `?`, `[..]`). Placeholders are substituted
//! first, with their values escaped so a directory name containing `[` is
//! not read as a character class; the result is then globbed.

use std::path::{Path, PathBuf};

/// Substitute placeholders in `pattern`.
///
/// Returns `None` when a referenced variable is unset or empty, in which
/// case the path cannot exist on this machine and is skipped.
pub fn expand_placeholders(
    pattern: &str,
    lookup: &dyn Fn(&str) -> Option<String>,
    home: Option<&Path>,
) -> Option<String> {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    if let Some(after) = rest.strip_prefix('~') {
        if after.is_empty() || after.starts_with('/') || after.starts_with('\\') {
            out.push_str(&escape(&home?.to_string_lossy()));
            rest = after;
        }
    }

    let chars: Vec<char> = rest.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '$' if chars.get(i + 1) == Some(&'{') => {
                let close = chars[i + 2..].iter().position(|&c| c == '}');
                match close {
                    Some(len) => {
                        let name: String = chars[i + 2..i + 2 + len].iter().collect();
                        out.push_str(&escape(&non_empty(lookup(&name))?));
                        i += len + 3;
                    }
                    None => {
                        out.push('$');
                        i += 1;
                    }
                }
            }
            '$' => {
                let len = chars[i + 1..]
                    .iter()
                    .take_while(|c| c.is_ascii_alphanumeric() || **c == '_')
                    .count();
                let starts_ok = chars
                    .get(i + 1)
                    .is_some_and(|c| c.is_ascii_alphabetic() || *c == '_');
                if len > 0 && starts_ok {
                    let name: String = chars[i + 1..i + 1 + len].iter().collect();
                    out.push_str(&escape(&non_empty(lookup(&name))?));
                    i += len + 1;
                } else {
                    out.push('$');
                    i += 1;
                }
            }
            '%' => {
                let close = chars[i + 1..].iter().position(|&c| c == '%');
                let name: Option<String> = close
                    .map(|len| chars[i + 1..i + 1 + len].iter().collect())
                    .filter(|n: &String| is_windows_var_name(n));
                match name {
                    Some(name) => {
                        let len = name.chars().count();
                        out.push_str(&escape(&non_empty(lookup(&name))?));
                        i += len + 2;
                    }
                    None => {
                        out.push('%');
                        i += 1;
                    }
                }
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    Some(out)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn is_windows_var_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '(' | ')'))
}

fn escape(value: &str) -> String {
    glob::Pattern::escape(value)
}

/// Expand `pattern` against the process environment and return existing
/// matches in glob order.
pub fn expand_common_path(pattern: &str) -> Vec<PathBuf> {
    let home = dirs::home_dir();
    let lookup = |name: &str| std::env::var(name).ok();
    let Some(expanded) = expand_placeholders(pattern, &lookup, home.as_deref()) else {
        tracing::debug!("Skipping common path '{}': unset variable", pattern);
        return Vec::new();
    };

    glob_existing(&expanded)
}

/// Glob an already-expanded pattern, keeping readable matches.
pub fn glob_existing(expanded: &str) -> Vec<PathBuf> {
    match glob::glob(expanded) {
        Ok(paths) => paths.filter_map(|entry| entry.ok()).collect(),
        Err(e) => {
            tracing::debug!("Invalid glob '{}': {}", expanded, e);
            let literal = PathBuf::from(expanded);
            if literal.exists() {
                vec![literal]
            } else {
                Vec::new()
            }
        }
    }
}
