// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler configuration

use std::time::Duration;

/// Configuration for a [`crate::TimeScheduler`].
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Name attached to the dispatch loop's tracing span.
    pub name: String,
    /// Wait used when the next entry is due exactly now. Firing on the same
    /// millisecond tick is deferred by this amount instead of spinning.
    pub min_wait: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            name: "scheduler".to_string(),
            min_wait: Duration::from_millis(1),
        }
    }
}

impl SchedulerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Zero is raised to one millisecond.
    pub fn with_min_wait(mut self, min_wait: Duration) -> Self {
        self.min_wait = min_wait.max(Duration::from_millis(1));
        self
    }
}
