// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chime Daemon (chimed)
//!
//! Loads a schedule file, registers each trigger with a time scheduler
//! running on the tokio blocking pool, and fires until SIGTERM or SIGINT.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::path::PathBuf;
use std::sync::Arc;

use chime_core::{Target, TimeTrigger};
use chime_daemon::{CommandTarget, Config, ConfigError, LogTarget};
use chime_scheduler::{SchedulerConfig, TimeScheduler, TokioPool};
use tokio::runtime::Handle;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut schedule_path = None;
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("chimed {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("chimed {}", env!("CARGO_PKG_VERSION"));
                println!("Chime Daemon - fires scheduled commands from a TOML schedule file");
                println!();
                println!("USAGE:");
                println!("    chimed [SCHEDULE]");
                println!();
                println!("SCHEDULE defaults to $CHIME_CONFIG. Logs are written to");
                println!("$CHIME_STATE_DIR/chimed.log; RUST_LOG sets the filter.");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            flag if flag.starts_with('-') => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: chimed [--help | --version | <schedule>]");
                std::process::exit(1);
            }
            path => schedule_path = Some(PathBuf::from(path)),
        }
    }

    let config = match Config::load(schedule_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    write_startup_marker(&config)?;
    let log_guard = setup_logging(&config)?;

    info!(
        schedule = %config.schedule_path.display(),
        triggers = config.triggers.len(),
        "starting chimed"
    );

    let scheduler = match build_scheduler(&config) {
        Ok(scheduler) => scheduler,
        Err(e) => {
            error!("failed to start scheduler: {}", e);
            drop(log_guard);
            return Err(e);
        }
    };

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    // Signal ready for parent process
    println!("READY");

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
    }

    scheduler.dispose();
    info!("chimed stopped");
    Ok(())
}

fn build_scheduler(config: &Config) -> Result<TimeScheduler, Box<dyn std::error::Error>> {
    let mut pool = TokioPool::current()?;
    if let Some(max) = config.max_in_flight {
        // One slot is held by the dispatch loop for the scheduler's lifetime.
        pool = pool.with_max_in_flight(max + 1);
    }

    let scheduler = TimeScheduler::with_clock(
        Arc::new(pool),
        chime_core::SystemClock,
        SchedulerConfig::new().with_name("chimed"),
    );

    for def in &config.triggers {
        let trigger: Box<dyn TimeTrigger> = def.trigger()?;
        let target: Arc<dyn Target> = match &def.run {
            Some(command) => Arc::new(CommandTarget::new(
                command.clone(),
                def.timeout,
                Handle::current(),
            )),
            None => Arc::new(LogTarget),
        };
        scheduler.add_trigger(def.name.clone(), trigger, target)?;
        info!(trigger = %def.name, schedule = ?def.schedule, "registered trigger");
    }

    scheduler.start()?;
    Ok(scheduler)
}

/// Startup marker prefix written to the log before anything else.
/// Full format: "--- chimed: starting (pid: 12345) ---"
const STARTUP_MARKER_PREFIX: &str = "--- chimed: starting (pid: ";

fn write_startup_marker(config: &Config) -> Result<(), std::io::Error> {
    use std::io::Write;

    std::fs::create_dir_all(&config.state_dir)?;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    writeln!(file, "{}{}) ---", STARTUP_MARKER_PREFIX, std::process::id())?;
    Ok(())
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, ConfigError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let file_name = config
        .log_path
        .file_name()
        .ok_or(ConfigError::NoStateDir)?;
    let file_appender = tracing_appender::rolling::never(&config.state_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();

    Ok(guard)
}
