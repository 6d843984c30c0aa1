//! Integration tests for the pinst CLI

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const FAKE_PACMAN: &str = r#"
case "$1" in
  -S)
    echo "resolving dependencies..."
    echo "(1/1) installing $5"
    exit 0
    ;;
esac
exit 1
"#;

/// Run pinst against a fake pacman with all state inside `dir`
fn pinst(dir: &Path, args: &[&str]) -> Output {
    let script = dir.join("pacman.sh");
    std::fs::write(&script, FAKE_PACMAN).unwrap();
    let config = dir.join("config.toml");
    std::fs::write(&config, "[general]\ncolor = \"never\"\n").unwrap();

    Command::new(env!("CARGO_BIN_EXE_pinst"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .env("PINST_ESCALATION", "/bin/sh")
        .env("PINST_PACMAN", &script)
        .env("PINST_LOCK_FILE", dir.join("pinst.lck"))
        .env("PINST_DB_LOCK", dir.join("db.lck"))
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute pinst")
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_pinst"))
        .arg("--help")
        .output()
        .expect("Failed to execute pinst");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[list of packages]"));
    assert!(stdout.contains("for remove add -"));
}

#[test]
fn test_help_among_packages() {
    let dir = TempDir::new().unwrap();
    let output = pinst(dir.path(), &["vlc", "-h", "-vi"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("example: pinst vlc -vi"));
    // no service interaction
    assert!(!dir.path().join("pinst.lck").exists());
}

#[test]
fn test_nothing_to_do() {
    let dir = TempDir::new().unwrap();
    let output = pinst(dir.path(), &["--no-edit"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Nothing to do."));
}

#[cfg(unix)]
#[test]
fn test_non_interactive_install() {
    let dir = TempDir::new().unwrap();
    let output = pinst(dir.path(), &["--no-edit", "--yes", "vlc"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout: {stdout}");
    assert!(stdout.contains("-> resolving dependencies..."));
    assert!(stdout.contains("   ::installing vlc 1/1"));
    assert!(stdout.contains("End."));
    assert!(!dir.path().join("pinst.lck").exists());
    assert!(dir.path().join("config/pinst/installer.toml").exists());
}

#[test]
fn test_busy_service_exits_with_failure() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("db.lck"), "").unwrap();
    let output = pinst(dir.path(), &["--no-edit", "--yes", "vlc"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("!!! ERROR: privileged service is busy"));
}

#[cfg(unix)]
#[test]
fn test_failed_transaction_exits_with_failure() {
    let dir = TempDir::new().unwrap();
    let output = pinst(dir.path(), &["--no-edit", "--yes", "-vi"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("!!! remove failed (exit code 1)"));
}
