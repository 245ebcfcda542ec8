//! Runs the built binary for commands that need no remote calls.

use std::process::{Command, Stdio};
use tempfile::TempDir;

fn stackwright(workspace: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_stackwright"));
    cmd.env("XDG_CONFIG_HOME", workspace.path().join("config"))
        .env_remove("STACKWRIGHT_LOG")
        .arg("--workspace")
        .arg(workspace.path())
        .arg("--quiet")
        .stdin(Stdio::null());
    cmd
}

#[test]
fn accounts_lists_directory() {
    let workspace = TempDir::new().unwrap();
    let output = stackwright(&workspace).arg("accounts").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("management"));
    assert!(stdout.contains("StackwrightCLIRole"));
}

#[test]
fn bad_parameter_exits_non_zero() {
    let workspace = TempDir::new().unwrap();
    let template = workspace.path().join("t.json");
    std::fs::write(&template, "{}").unwrap();
    let output = stackwright(&workspace)
        .args(["apply", "--stack-name", "s", "--param", "oops"])
        .arg("--template")
        .arg(&template)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("oops"));
}

#[test]
fn delete_without_confirmation_exits_non_zero() {
    let workspace = TempDir::new().unwrap();
    let output = stackwright(&workspace)
        .args(["delete", "legacy"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
}
