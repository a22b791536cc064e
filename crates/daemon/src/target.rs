// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Targets the daemon can fire: log-only and shell commands.

use std::process::Output;
use std::time::{Duration, Instant};

use chime_core::{format_elapsed_ms, Target, TargetError};
use tokio::process::Command;
use tokio::runtime::Handle;
use tracing::{debug, info};

/// Logs each firing and does nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTarget;

impl Target for LogTarget {
    fn fired(&self, name: &str) -> Result<(), TargetError> {
        info!(trigger = name, "trigger fired");
        Ok(())
    }
}

/// Runs a shell command through `sh -c`, killing it after `timeout`.
///
/// `fired` blocks its pool thread until the command exits, driving the
/// process future on the daemon's runtime.
#[derive(Debug, Clone)]
pub struct CommandTarget {
    command: String,
    timeout: Duration,
    handle: Handle,
}

impl CommandTarget {
    pub fn new(command: impl Into<String>, timeout: Duration, handle: Handle) -> Self {
        Self {
            command: command.into(),
            timeout,
            handle,
        }
    }
}

impl Target for CommandTarget {
    fn fired(&self, name: &str) -> Result<(), TargetError> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(&self.command)
            .env("CHIME_TRIGGER", name)
            .kill_on_drop(true);

        let started = Instant::now();
        let output = self
            .handle
            .block_on(run_with_timeout(cmd, self.timeout, "command"))?;
        let elapsed = format_elapsed_ms(started.elapsed().as_millis() as u64);

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!(trigger = name, stdout = %stdout.trim_end(), "command output");
        }

        if output.status.success() {
            info!(trigger = name, %elapsed, "command completed");
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let status = output
            .status
            .code()
            .map_or_else(|| "signal".to_string(), |c| c.to_string());
        Err(format!("command exited with {status}: {}", stderr.trim()).into())
    }
}

/// Run a command, giving up after `timeout`.
async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    description: &str,
) -> Result<Output, String> {
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(io_err)) => Err(format!("{} failed: {}", description, io_err)),
        Err(_elapsed) => Err(format!(
            "{} timed out after {}",
            description,
            format_elapsed_ms(timeout.as_millis() as u64)
        )),
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
