// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration and the TOML schedule file.
//!
//! ```toml
//! [scheduler]
//! max_in_flight = 8
//!
//! [triggers.heartbeat]
//! every = "30s"
//! run = "echo tick"
//!
//! [triggers.nightly]
//! cron = "0 0 2 * * *"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chime_core::{
    parse_duration, CronTrigger, DurationError, PeriodicTrigger, TimeTrigger, TriggerError,
};
use serde::Deserialize;
use thiserror::Error;

/// Command timeout when a trigger does not set one.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine state directory")]
    NoStateDir,
    #[error("no schedule file given (pass a path or set CHIME_CONFIG)")]
    NoScheduleFile,
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid schedule file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("trigger '{trigger}': invalid {field}: {source}")]
    Duration {
        trigger: String,
        field: &'static str,
        source: DurationError,
    },
    #[error("trigger '{trigger}': {source}")]
    Trigger {
        trigger: String,
        source: TriggerError,
    },
    #[error("trigger '{trigger}': {reason}")]
    Invalid { trigger: String, reason: String },
    #[error("scheduler.max_in_flight must be at least 1")]
    ZeroInFlight,
}

/// Raw schedule file contents.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleFile {
    #[serde(default)]
    pub scheduler: SchedulerSection,
    #[serde(default)]
    pub triggers: BTreeMap<String, TriggerSpec>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerSection {
    /// Maximum concurrently running targets
    pub max_in_flight: Option<usize>,
}

/// One `[triggers.NAME]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriggerSpec {
    pub every: Option<String>,
    pub after: Option<String>,
    pub cron: Option<String>,
    pub offset: Option<String>,
    pub run: Option<String>,
    pub timeout: Option<String>,
}

/// When a trigger fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    /// Every `period`; the first firing is `offset` from start, defaulting
    /// to one period.
    Every {
        period: Duration,
        offset: Option<Duration>,
    },
    /// Once, `delay` after start.
    After(Duration),
    Cron(String),
}

/// A validated trigger definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerDef {
    pub name: String,
    pub schedule: Schedule,
    /// Shell command; `None` only logs the firing
    pub run: Option<String>,
    pub timeout: Duration,
}

impl TriggerDef {
    /// Build a fresh trigger for this definition.
    pub fn trigger(&self) -> Result<Box<dyn TimeTrigger>, TriggerError> {
        Ok(match &self.schedule {
            Schedule::Every { period, offset } => Box::new(PeriodicTrigger::new(
                Some(offset.unwrap_or(*period)),
                Some(*period),
            )?),
            Schedule::After(delay) => Box::new(PeriodicTrigger::once_after(*delay)),
            Schedule::Cron(expression) => Box::new(CronTrigger::parse(expression)?),
        })
    }
}

impl ScheduleFile {
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Validate every trigger table, in name order.
    pub fn triggers(&self) -> Result<Vec<TriggerDef>, ConfigError> {
        self.triggers
            .iter()
            .map(|(name, spec)| spec.resolve(name))
            .collect()
    }
}

impl TriggerSpec {
    fn resolve(&self, name: &str) -> Result<TriggerDef, ConfigError> {
        let duration = |field: &'static str, value: &str| {
            parse_duration(value).map_err(|source| ConfigError::Duration {
                trigger: name.to_string(),
                field,
                source,
            })
        };
        let invalid = |reason: &str| ConfigError::Invalid {
            trigger: name.to_string(),
            reason: reason.to_string(),
        };

        let schedule = match (&self.every, &self.after, &self.cron) {
            (Some(every), None, None) => Schedule::Every {
                period: duration("every", every)?,
                offset: self
                    .offset
                    .as_deref()
                    .map(|o| duration("offset", o))
                    .transpose()?,
            },
            (None, Some(after), None) => Schedule::After(duration("after", after)?),
            (None, None, Some(cron)) => Schedule::Cron(cron.clone()),
            (None, None, None) => {
                return Err(invalid("one of `every`, `after` or `cron` is required"))
            }
            _ => return Err(invalid("only one of `every`, `after` or `cron` may be set")),
        };
        if self.offset.is_some() && !matches!(schedule, Schedule::Every { .. }) {
            return Err(invalid("`offset` is only valid with `every`"));
        }

        let timeout = match &self.timeout {
            Some(t) => duration("timeout", t)?,
            None => DEFAULT_COMMAND_TIMEOUT,
        };
        if self.run.is_none() && self.timeout.is_some() {
            return Err(invalid("`timeout` requires `run`"));
        }

        let def = TriggerDef {
            name: name.to_string(),
            schedule,
            run: self.run.clone(),
            timeout,
        };
        def.trigger().map_err(|source| ConfigError::Trigger {
            trigger: name.to_string(),
            source,
        })?;
        Ok(def)
    }
}

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/chime)
    pub state_dir: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// Schedule file the triggers were read from
    pub schedule_path: PathBuf,
    pub max_in_flight: Option<usize>,
    pub triggers: Vec<TriggerDef>,
}

impl Config {
    /// Load configuration from the schedule file at `path`, falling back to
    /// CHIME_CONFIG.
    pub fn load(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let schedule_path = path
            .or_else(crate::env::config_path)
            .ok_or(ConfigError::NoScheduleFile)?;
        let state_dir = crate::env::state_dir()?;
        Self::from_parts(state_dir, schedule_path)
    }

    pub fn from_parts(state_dir: PathBuf, schedule_path: PathBuf) -> Result<Self, ConfigError> {
        let file = ScheduleFile::load(&schedule_path)?;
        if file.scheduler.max_in_flight == Some(0) {
            return Err(ConfigError::ZeroInFlight);
        }
        let triggers = file.triggers()?;

        Ok(Self {
            log_path: state_dir.join("chimed.log"),
            state_dir,
            schedule_path,
            max_in_flight: file.scheduler.max_in_flight,
            triggers,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
