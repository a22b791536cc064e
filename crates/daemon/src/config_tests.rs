// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

fn resolve(content: &str) -> Result<Vec<TriggerDef>, ConfigError> {
    ScheduleFile::parse(content)?.triggers()
}

#[test]
fn parses_every_kind_of_trigger() {
    let triggers = resolve(
        r#"
        [triggers.heartbeat]
        every = "30s"
        offset = "5s"
        run = "echo tick"
        timeout = "1m"

        [triggers.nightly]
        cron = "0 0 2 * * *"

        [triggers.once]
        after = "10s"
        "#,
    )
    .unwrap();

    assert_eq!(
        triggers,
        vec![
            TriggerDef {
                name: "heartbeat".to_string(),
                schedule: Schedule::Every {
                    period: secs(30),
                    offset: Some(secs(5)),
                },
                run: Some("echo tick".to_string()),
                timeout: secs(60),
            },
            TriggerDef {
                name: "nightly".to_string(),
                schedule: Schedule::Cron("0 0 2 * * *".to_string()),
                run: None,
                timeout: DEFAULT_COMMAND_TIMEOUT,
            },
            TriggerDef {
                name: "once".to_string(),
                schedule: Schedule::After(secs(10)),
                run: None,
                timeout: DEFAULT_COMMAND_TIMEOUT,
            },
        ]
    );
}

#[test]
fn empty_file_has_no_triggers() {
    let file = ScheduleFile::parse("").unwrap();
    assert!(file.triggers().unwrap().is_empty());
    assert_eq!(file.scheduler.max_in_flight, None);
}

#[yare::parameterized(
    none       = { "",                                   "one of `every`, `after` or `cron` is required" },
    two_kinds  = { "every = \"1s\"\nafter = \"1s\"",     "only one of" },
    all_kinds  = { "every = \"1s\"\nafter = \"1s\"\ncron = \"* * * * * *\"", "only one of" },
    bad_offset = { "after = \"1s\"\noffset = \"1s\"",    "`offset` is only valid with `every`" },
    orphan_timeout = { "every = \"1s\"\ntimeout = \"1s\"", "`timeout` requires `run`" },
    bad_every  = { "every = \"soon\"",                   "invalid every" },
    bad_suffix = { "after = \"5 fortnights\"",           "invalid after" },
    zero_every = { "every = \"0s\"",                     "period" },
    bad_cron   = { "cron = \"not a cron\"",              "not a cron" },
    huge_every = { "every = \"213503982335000d\"",       "invalid every: duration too large" },
)]
fn invalid_trigger_tables(body: &str, message: &str) {
    let content = format!("[triggers.job]\n{body}\n");
    let err = resolve(&content).unwrap_err();
    let text = err.to_string();
    assert!(text.starts_with("trigger 'job'"), "got: {text}");
    assert!(text.contains(message), "expected {message:?} in {text:?}");
}

#[test]
fn unknown_keys_are_rejected() {
    let err = ScheduleFile::parse("[triggers.job]\nevery = \"1s\"\ncommand = \"ls\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn built_triggers_match_their_schedule() {
    let triggers = resolve(
        r#"
        [triggers.a]
        every = "10s"
        [triggers.b]
        every = "10s"
        offset = "2s"
        [triggers.c]
        after = "3s"
        "#,
    )
    .unwrap();

    let now = 1_000_000;
    let first: Vec<_> = triggers
        .iter()
        .map(|def| def.trigger().unwrap().next_fire_time(now))
        .collect();
    assert_eq!(first, [Some(now + 10_000), Some(now + 2_000), Some(now + 3_000)]);
}

#[test]
fn loads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chime.toml");
    std::fs::write(
        &path,
        "[scheduler]\nmax_in_flight = 4\n\n[triggers.tick]\nevery = \"1s\"\n",
    )
    .unwrap();

    let config = Config::from_parts(dir.path().join("state"), path.clone()).unwrap();

    assert_eq!(config.max_in_flight, Some(4));
    assert_eq!(config.triggers.len(), 1);
    assert_eq!(config.schedule_path, path);
    assert_eq!(config.log_path, dir.path().join("state/chimed.log"));
}

#[test]
fn zero_in_flight_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chime.toml");
    std::fs::write(&path, "[scheduler]\nmax_in_flight = 0\n").unwrap();

    let err = Config::from_parts(dir.path().to_path_buf(), path).unwrap_err();
    assert!(matches!(err, ConfigError::ZeroInFlight));
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = Config::from_parts(dir.path().to_path_buf(), path).unwrap_err();
    assert!(err.to_string().contains("absent.toml"), "got: {err}");
}

#[test]
#[serial]
fn load_uses_env_when_no_path_given() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chime.toml");
    std::fs::write(&path, "[triggers.tick]\nafter = \"1s\"\n").unwrap();
    std::env::set_var("CHIME_CONFIG", &path);
    std::env::set_var("CHIME_STATE_DIR", dir.path());

    let config = Config::load(None).unwrap();
    assert_eq!(config.schedule_path, path);
    assert_eq!(config.state_dir, dir.path());

    std::env::remove_var("CHIME_CONFIG");
    std::env::remove_var("CHIME_STATE_DIR");
}

#[test]
#[serial]
fn load_without_any_schedule_fails() {
    std::env::remove_var("CHIME_CONFIG");
    assert!(matches!(
        Config::load(None),
        Err(ConfigError::NoScheduleFile)
    ));
}
