//! Built-in catalog embedded at compile time.

use crate::error::{Result, ToolsmithError};
use include_dir::{include_dir, Dir, File};
use serde_yaml::Value;
use std::path::PathBuf;

/// Embedded `defaults/` directory.
static DEFAULTS_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/defaults");

/// Parse every embedded YAML file, ordered by path.
///
/// The settings and configure files sit at the top level and category
/// catalogs under `categories/`; each is a partial [`ToolkitConfig`]
/// document and they are merged in this order.
///
/// [`ToolkitConfig`]: crate::config::ToolkitConfig
pub fn builtin_layers() -> Result<Vec<(PathBuf, Value)>> {
    let mut files = Vec::new();
    collect_yaml_files(&DEFAULTS_DIR, &mut files);
    files.sort_by(|a, b| a.path().cmp(b.path()));

    files.into_iter().map(parse_file).collect()
}

/// Names of the embedded catalog files.
pub fn builtin_files() -> Vec<PathBuf> {
    let mut files = Vec::new();
    collect_yaml_files(&DEFAULTS_DIR, &mut files);
    let mut paths: Vec<PathBuf> = files.iter().map(|f| f.path().to_path_buf()).collect();
    paths.sort();
    paths
}

fn collect_yaml_files<'a>(dir: &'a Dir<'a>, out: &mut Vec<&'a File<'a>>) {
    for file in dir.files() {
        let is_yaml = file
            .path()
            .extension()
            .is_some_and(|ext| ext == "yml" || ext == "yaml");
        if is_yaml {
            out.push(file);
        }
    }
    for sub in dir.dirs() {
        collect_yaml_files(sub, out);
    }
}

fn parse_file(file: &File<'_>) -> Result<(PathBuf, Value)> {
    let path = PathBuf::from("defaults").join(file.path());
    let content = file
        .contents_utf8()
        .ok_or_else(|| ToolsmithError::ConfigParseError {
            path: path.clone(),
            message: "Invalid UTF-8".to_string(),
        })?;

    let value = serde_yaml::from_str(content).map_err(|e| ToolsmithError::ConfigParseError {
        path: path.clone(),
        message: e.to_string(),
    })?;

    Ok((path, value))
}
