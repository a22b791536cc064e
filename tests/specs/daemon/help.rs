//! Daemon help and version specs
//!
//! Verify chimed --help, --version, and related flags work without
//! reading a schedule file.

use crate::prelude::*;

#[yare::parameterized(
    long    = { "--version" },
    short   = { "-v" },
    capital = { "-V" },
)]
fn version_flags(flag: &str) {
    let output = chimed().arg(flag).output().unwrap();
    assert!(output.status.success());
    similar_asserts::assert_eq!(stdout(&output), "chimed 0.1.0\n");
}

#[yare::parameterized(
    long       = { "--help" },
    short      = { "-h" },
    subcommand = { "help" },
)]
fn help_flags(flag: &str) {
    let output = chimed().arg(flag).output().unwrap();
    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("USAGE:"), "expected USAGE section, got: {stdout}");
    assert!(stdout.contains("--help"), "expected --help in output");
    assert!(stdout.contains("--version"), "expected --version in output");
    assert!(stdout.contains("CHIME_CONFIG"), "expected env docs in output");
}

#[test]
fn unknown_flag_fails() {
    let output = chimed().arg("--bogus").output().unwrap();
    assert!(!output.status.success());
    let stderr = stderr(&output);
    assert!(
        stderr.contains("unexpected argument '--bogus'"),
        "expected error message, got: {stderr}"
    );
}
