//! Trigger firing specs
//!
//! Commands run by chimed append to marker files in the schedule's
//! directory; the specs read those files back.

use crate::prelude::*;

#[test]
fn periodic_command_runs_repeatedly() {
    let mut daemon = Daemon::with_schedule(
        r#"
        [triggers.tick]
        every = "100ms"
        run = "echo tick >> {dir}/ticks"
        "#,
    );
    daemon.start();

    assert!(
        wait_for(SPEC_WAIT_MAX_MS, || daemon.lines("ticks").len() >= 3),
        "log: {}",
        daemon.log()
    );
    daemon.terminate();
}

#[test]
fn one_shot_command_runs_once() {
    let mut daemon = Daemon::with_schedule(
        r#"
        [triggers.once]
        after = "50ms"
        run = "echo $CHIME_TRIGGER >> {dir}/once"
        "#,
    );
    daemon.start();

    assert!(wait_for(SPEC_WAIT_MAX_MS, || !daemon.lines("once").is_empty()));
    std::thread::sleep(std::time::Duration::from_millis(300));
    daemon.terminate();

    similar_asserts::assert_eq!(daemon.lines("once"), vec!["once".to_string()]);
}

#[test]
fn earlier_trigger_fires_first() {
    let mut daemon = Daemon::with_schedule(
        r#"
        [triggers.a]
        after = "300ms"
        run = "echo a >> {dir}/order"

        [triggers.b]
        after = "50ms"
        run = "echo b >> {dir}/order"
        "#,
    );
    daemon.start();

    assert!(wait_for(SPEC_WAIT_MAX_MS, || daemon.lines("order").len() == 2));
    daemon.terminate();

    similar_asserts::assert_eq!(
        daemon.lines("order"),
        vec!["b".to_string(), "a".to_string()]
    );
}

#[test]
fn failing_command_is_logged_and_rescheduled() {
    let mut daemon = Daemon::with_schedule(
        r#"
        [triggers.flaky]
        every = "100ms"
        run = "echo try >> {dir}/tries; exit 1"
        "#,
    );
    daemon.start();

    assert!(wait_for(SPEC_WAIT_MAX_MS, || daemon.lines("tries").len() >= 2));
    daemon.terminate();

    let log = daemon.log();
    assert!(log.contains("exception executing trigger"), "log: {log}");
    assert!(log.contains("command exited with 1"), "log: {log}");
}

#[test]
fn timed_out_command_is_reported() {
    let mut daemon = Daemon::with_schedule(
        r#"
        [triggers.slow]
        after = "10ms"
        run = "sleep 5"
        timeout = "100ms"
        "#,
    );
    daemon.start();

    assert!(wait_for(SPEC_WAIT_MAX_MS, || daemon
        .log()
        .contains("command timed out after 100ms")));
    daemon.terminate();
}

#[test]
fn log_only_trigger_records_firing() {
    let mut daemon = Daemon::with_schedule(
        r#"
        [triggers.quiet]
        after = "10ms"
        "#,
    );
    daemon.start();

    assert!(wait_for(SPEC_WAIT_MAX_MS, || daemon.log().contains("trigger fired")));
    daemon.terminate();
}
