//! Daemon lifecycle specs
//!
//! Startup with a valid schedule, logging into the state directory and
//! clean shutdown on SIGTERM.

use crate::prelude::*;

const IDLE_SCHEDULE: &str = r#"
[triggers.heartbeat]
every = "1h"
"#;

#[test]
fn starts_and_stops_on_sigterm() {
    let mut daemon = Daemon::with_schedule(IDLE_SCHEDULE);
    daemon.start();

    let status = daemon.terminate();
    assert!(status.success(), "chimed exited with {status}");
}

#[test]
fn writes_log_into_state_dir() {
    let mut daemon = Daemon::with_schedule(IDLE_SCHEDULE);
    daemon.start();
    daemon.terminate();

    let log = daemon.log();
    assert!(log.contains("--- chimed: starting (pid: "), "log: {log}");
    assert!(log.contains("starting chimed"), "log: {log}");
    assert!(log.contains("registered trigger"), "log: {log}");
    assert!(log.contains("heartbeat"), "log: {log}");
    assert!(log.contains("chimed stopped"), "log: {log}");
}

#[test]
fn schedule_from_environment() {
    let daemon = Daemon::with_schedule(IDLE_SCHEDULE);
    let mut child = chimed()
        .env("CHIME_CONFIG", daemon.schedule_path())
        .env("CHIME_STATE_DIR", daemon.state_path())
        .stdout(std::process::Stdio::piped())
        .spawn()
        .unwrap();

    let mut stdout = std::io::BufReader::new(child.stdout.take().unwrap());
    let mut line = String::new();
    std::io::BufRead::read_line(&mut stdout, &mut line).unwrap();
    let _ = child.kill();
    let _ = child.wait();

    assert_eq!(line.trim(), "READY");
}

#[test]
fn empty_schedule_still_runs() {
    let mut daemon = Daemon::with_schedule("");
    daemon.start();
    assert!(daemon.terminate().success());
}
