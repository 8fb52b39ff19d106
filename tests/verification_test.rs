//! Integration tests for detection and smoke testing against real processes.
#![cfg(unix)]

use std::collections::BTreeMap;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use toolsmith::config::{Settings, TestCommand, ToolDefinition};
use toolsmith::shell::{CommandLine, ProbeOptions, ProcessProbe, SystemProbe};
use toolsmith::verification::{
    DetectionStrategy, FunctionalityTester, ToolVerifier, VerificationStatus, UNKNOWN_VERSION,
};

const TOOLX: &str = r#"#!/bin/sh
case "$1" in
  --version) echo "toolX 1.2.3" ;;
  --help) echo "usage: toolX [options]" ;;
  *) echo "unknown flag" >&2; exit 2 ;;
esac
"#;

fn install_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn toolx_definition() -> ToolDefinition {
    ToolDefinition {
        name: "toolX".into(),
        executable_names: vec!["toolX".into()],
        version_commands: vec![CommandLine::new("toolX", &["--version"])],
        test_commands: vec![TestCommand::expecting(
            CommandLine::new("toolX", &["--help"]),
            "toolX",
        )],
        ..Default::default()
    }
}

fn verifier(search_path: Vec<PathBuf>) -> ToolVerifier {
    let probe: Arc<dyn ProcessProbe> = Arc::new(SystemProbe);
    ToolVerifier::with_probe(probe, &Settings::default(), search_path)
}

#[test]
fn installed_tool_on_path_is_verified() {
    let temp = TempDir::new().unwrap();
    let path = install_script(temp.path(), "toolX", TOOLX);

    let result = verifier(vec![temp.path().to_path_buf()]).verify(&toolx_definition());

    assert!(result.installed);
    assert!(result.version.contains("1.2.3"));
    assert_eq!(result.status, VerificationStatus::Installed);
    assert_eq!(result.strategy, Some(DetectionStrategy::Path));
    assert_eq!(result.executable_path, Some(path));
    let functionality = result.functionality.unwrap();
    assert!(functionality.success);
    assert_eq!((functionality.passed, functionality.total), (1, 1));
}

#[test]
fn absent_tool_is_not_installed_and_counted() {
    let temp = TempDir::new().unwrap();
    let verifier = verifier(vec![temp.path().to_path_buf()]);

    let result = verifier.verify(&toolx_definition());
    assert!(!result.installed);
    assert_eq!(result.status, VerificationStatus::NotInstalled);
    assert_eq!(result.version, UNKNOWN_VERSION);
    assert!(result.functionality.is_none());

    let mut definitions = BTreeMap::new();
    definitions.insert("toolX".to_string(), toolx_definition());
    let batch = verifier.verify_many(&["toolX".to_string()], &definitions);
    assert_eq!(batch.not_found, 1);
    assert_eq!(batch.installed, 0);
}

#[test]
fn failing_smoke_test_downgrades_to_warning() {
    let temp = TempDir::new().unwrap();
    install_script(temp.path(), "toolX", TOOLX);

    let mut definition = toolx_definition();
    definition.test_commands = vec![TestCommand::expecting(
        CommandLine::new("toolX", &["--bogus"]),
        "toolX",
    )];

    let result = verifier(vec![temp.path().to_path_buf()]).verify(&definition);
    assert!(result.installed);
    assert_eq!(result.status, VerificationStatus::Warning);
}

#[test]
fn common_path_finds_tool_off_path() {
    let temp = TempDir::new().unwrap();
    let opt = temp.path().join("opt").join("toolX").join("bin");
    fs::create_dir_all(&opt).unwrap();
    install_script(&opt, "toolX", TOOLX);

    let mut definition = toolx_definition();
    definition.common_paths = vec![format!("{}/opt/*/bin", temp.path().display())];

    let result = verifier(Vec::new()).verify(&definition);
    assert!(result.installed);
    assert_eq!(result.strategy, Some(DetectionStrategy::CommonPath));
    assert!(result.version.contains("1.2.3"));
}

fn threshold_run(passing: usize, total: usize) -> bool {
    let commands: Vec<TestCommand> = (0..total)
        .map(|i| {
            let pattern = if i < passing { "ok" } else { "never-printed" };
            TestCommand::expecting(CommandLine::new("echo", &["ok"]), pattern)
        })
        .collect();
    let tester = FunctionalityTester::new(Arc::new(SystemProbe), 0.7);
    tester.run(&commands, &ProbeOptions::default()).success
}

#[test]
fn threshold_boundary_at_seven_of_ten() {
    assert!(threshold_run(7, 10));
    assert!(!threshold_run(6, 10));
}

#[test]
fn empty_smoke_test_list_succeeds() {
    let tester = FunctionalityTester::new(Arc::new(SystemProbe), 0.7);
    let result = tester.run(&[], &ProbeOptions::default());
    assert!(result.success);
    assert_eq!(result.total, 0);
}
