//! Integration tests for the `ovpnadmin` CLI binary.
//!
//! These exercise the CLI as a subprocess, verifying exit codes and
//! stdout/stderr. They never reach a docker daemon: the only subcommand
//! paths taken either need no toolchain at all (`hash-password`) or fail
//! on name validation before any process is spawned.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;
use std::process::Command;

/// Helper: locate the `ovpnadmin` binary built by `cargo test`.
fn ovpnadmin_bin() -> String {
    let path = env!("CARGO_BIN_EXE_ovpnadmin");
    assert!(
        Path::new(path).exists(),
        "ovpnadmin binary not found at {path}"
    );
    path.to_owned()
}

/// Helper: run ovpnadmin with args and return (`exit_code`, stdout, stderr).
fn run(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(ovpnadmin_bin())
        .args(args)
        .env_remove("EASYRSA_PASSWORD")
        .output()
        .expect("failed to execute ovpnadmin");

    let code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (code, stdout, stderr)
}

// ── Version & help ───────────────────────────────────────────────────

#[test]
fn version_flag_exits_zero() {
    let (code, stdout, _) = run(&["--version"]);
    assert_eq!(code, 0, "ovpnadmin --version should exit 0");
    assert!(
        stdout.contains("ovpnadmin"),
        "version output should contain 'ovpnadmin': {stdout}"
    );
}

#[test]
fn help_lists_subcommands() {
    let (code, stdout, _) = run(&["--help"]);
    assert_eq!(code, 0);
    for subcommand in ["hash-password", "list", "revoke", "export"] {
        assert!(stdout.contains(subcommand), "help should mention {subcommand}");
    }
}

#[test]
fn unknown_subcommand_fails() {
    let (code, _, stderr) = run(&["frobnicate"]);
    assert_ne!(code, 0);
    assert!(!stderr.is_empty());
}

// ── hash-password ────────────────────────────────────────────────────

#[test]
fn hash_password_prints_known_sha256() {
    let (code, stdout, _) = run(&["hash-password", "--password", "foo"]);
    assert_eq!(code, 0);
    assert_eq!(
        stdout.trim(),
        // sha256("foo")
        "2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae"
    );
}

#[test]
fn hash_password_is_deterministic() {
    let (_, first, _) = run(&["hash-password", "--password", "hunter2"]);
    let (_, second, _) = run(&["hash-password", "--password", "hunter2"]);
    assert_eq!(first, second);
    assert_eq!(first.trim().len(), 64, "hex SHA-256 is 64 chars");
}

#[test]
fn hash_password_rejects_empty_password() {
    let (code, _, stderr) = run(&["hash-password", "--password", ""]);
    assert_ne!(code, 0);
    assert!(stderr.contains("empty"));
}

// ── Name validation happens before any toolchain call ────────────────

#[test]
fn revoke_rejects_invalid_name_without_docker() {
    let (code, _, stderr) = run(&["revoke", "bad name; rm -rf /"]);
    assert_ne!(code, 0);
    assert!(
        stderr.contains("invalid client name"),
        "expected validation error, got: {stderr}"
    );
}

#[test]
fn export_with_invalid_name_creates_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("ghost.ovpn");

    let (code, _, stderr) = run(&[
        "export",
        "no/such/client",
        "-o",
        out_path.to_str().unwrap(),
    ]);
    assert_ne!(code, 0);
    assert!(stderr.contains("invalid client name"));
    assert!(!out_path.exists(), "no profile file should be written");
}
