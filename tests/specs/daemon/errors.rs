//! Schedule file error specs
//!
//! chimed refuses to start on a bad schedule and says why on stderr.

use crate::prelude::*;

#[test]
fn no_schedule_file_given() {
    let state = tempfile::tempdir().unwrap();
    let output = chimed()
        .env("CHIME_STATE_DIR", state.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("no schedule file given"));
}

#[test]
fn missing_schedule_file() {
    let daemon = Daemon::with_schedule("");
    let output = chimed()
        .arg(daemon.path().join("absent.toml"))
        .env("CHIME_STATE_DIR", daemon.state_path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = stderr(&output);
    assert!(
        stderr.contains("failed to read") && stderr.contains("absent.toml"),
        "got: {stderr}"
    );
}

#[yare::parameterized(
    no_kind     = { "[triggers.job]\nrun = \"true\"\n",                 "trigger 'job': one of" },
    two_kinds   = { "[triggers.job]\nevery = \"1s\"\ncron = \"* * * * * *\"\n", "trigger 'job': only one of" },
    bad_cron    = { "[triggers.job]\ncron = \"every tuesday\"\n",      "invalid cron expression" },
    bad_period  = { "[triggers.job]\nevery = \"often\"\n",             "invalid every" },
    unknown_key = { "[triggers.job]\nevery = \"1s\"\nshell = \"bash\"\n", "invalid schedule file" },
    zero_pool   = { "[scheduler]\nmax_in_flight = 0\n",                "max_in_flight must be at least 1" },
)]
fn invalid_schedule(schedule: &str, message: &str) {
    let daemon = Daemon::with_schedule(schedule);
    let output = daemon.command().output().unwrap();

    assert!(!output.status.success());
    let stderr = stderr(&output);
    assert!(stderr.contains(message), "expected {message:?} in: {stderr}");
}
