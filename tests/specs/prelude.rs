//! Test helpers for behavioral specifications.
//!
//! Provides a small harness for running chimed against a schedule file.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Output, Stdio};

// Spec polling timeouts
pub const SPEC_POLL_INTERVAL_MS: u64 = 10;
pub const SPEC_WAIT_MAX_MS: u64 = 3000;

/// Returns the path to a binary, checking llvm-cov target directory first.
/// Falls back to resolving relative to the test binary itself when
/// CARGO_MANIFEST_DIR is stale.
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    // The test binary lives at target/debug/deps/specs-<hash>, so its
    // grandparent is target/debug/ where chimed is built.
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

pub fn chimed_binary() -> PathBuf {
    binary_path("chimed")
}

/// Command for chimed with a scrubbed environment.
pub fn chimed() -> Command {
    let mut cmd = Command::new(chimed_binary());
    cmd.env_remove("CHIME_CONFIG")
        .env_remove("CHIME_STATE_DIR")
        .env_remove("RUST_LOG");
    cmd
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// =============================================================================
// Polling
// =============================================================================

/// Poll a condition until it returns true or timeout is reached.
pub fn wait_for<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);
    let poll_interval = std::time::Duration::from_millis(SPEC_POLL_INTERVAL_MS);

    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(poll_interval);
    }
    false
}

// =============================================================================
// Daemon
// =============================================================================

/// A schedule file in a temporary directory, plus the daemon running it.
///
/// `{dir}` in the schedule is replaced with the directory path so commands
/// can write marker files next to it.
pub struct Daemon {
    dir: tempfile::TempDir,
    child: Option<Child>,
}

impl Daemon {
    pub fn with_schedule(schedule: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let content = schedule.replace("{dir}", &dir.path().display().to_string());
        std::fs::write(dir.path().join("chime.toml"), content).unwrap();
        Self { dir, child: None }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn schedule_path(&self) -> PathBuf {
        self.path().join("chime.toml")
    }

    pub fn state_path(&self) -> PathBuf {
        self.path().join("state")
    }

    /// chimed pointed at this schedule and state directory
    pub fn command(&self) -> Command {
        let mut cmd = chimed();
        cmd.arg(self.schedule_path())
            .env("CHIME_STATE_DIR", self.state_path())
            .env("RUST_LOG", "debug");
        cmd
    }

    /// Spawn the daemon and wait until it prints READY.
    pub fn start(&mut self) {
        let mut child = self
            .command()
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("chimed should spawn");

        let stdout = child.stdout.take().unwrap();
        let mut line = String::new();
        BufReader::new(stdout).read_line(&mut line).unwrap();
        assert_eq!(
            line.trim(),
            "READY",
            "chimed did not become ready\nlog: {}",
            self.log()
        );
        self.child = Some(child);
    }

    /// Send SIGTERM and wait for the daemon to exit.
    pub fn terminate(&mut self) -> ExitStatus {
        let mut child = self.child.take().expect("daemon should be running");
        Command::new("kill")
            .args(["-TERM", &child.id().to_string()])
            .status()
            .unwrap();
        child.wait().unwrap()
    }

    /// Daemon log contents
    pub fn log(&self) -> String {
        std::fs::read_to_string(self.state_path().join("chimed.log"))
            .unwrap_or_else(|_| "(no daemon log)".to_string())
    }

    /// Lines in a marker file written by a fired command
    pub fn lines(&self, file: &str) -> Vec<String> {
        std::fs::read_to_string(self.path().join(file))
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

impl Drop for Daemon {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
