// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduled entries and their queue nodes

use crate::listener::panic_message;
use chime_core::{Target, TimeTrigger};
use std::cmp::Ordering;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Key of an entry in the scheduler's entry table. Never reused within one
/// scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct EntryId(pub(crate) u64);

/// A named trigger/target pair tracked by the scheduler.
pub(crate) struct ScheduledEntry {
    name: String,
    trigger: Box<dyn TimeTrigger>,
    target: Arc<dyn Target>,
    next_fire_time: Option<u64>,
    valid: bool,
    /// Stamp of the queue node that may still fire this entry.
    queued_stamp: Option<u64>,
}

impl ScheduledEntry {
    pub(crate) fn new(name: String, trigger: Box<dyn TimeTrigger>, target: Arc<dyn Target>) -> Self {
        Self {
            name,
            trigger,
            target,
            next_fire_time: None,
            valid: true,
            queued_stamp: None,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn next_fire_time(&self) -> Option<u64> {
        self.next_fire_time
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.valid
    }

    pub(crate) fn target(&self) -> &Arc<dyn Target> {
        &self.target
    }

    /// Once invalid, no queue node of this entry is ever dispatched.
    pub(crate) fn invalidate(&mut self) {
        self.valid = false;
    }

    pub(crate) fn is_queued(&self) -> bool {
        self.queued_stamp.is_some()
    }

    pub(crate) fn mark_queued(&mut self, stamp: Option<u64>) {
        self.queued_stamp = stamp;
    }

    /// Whether `node` is the one live queue node for this entry.
    pub(crate) fn owns(&self, node: &QueuedEntry) -> bool {
        self.queued_stamp == Some(node.stamp)
    }

    /// Ask the trigger for the next fire time and cache it.
    ///
    /// A trigger that panics is treated as exhausted: the entry stays
    /// registered but is not queued again until it is reset.
    pub(crate) fn compute_next(&mut self, now_ms: u64) -> Option<u64> {
        let trigger = &mut self.trigger;
        self.next_fire_time =
            match panic::catch_unwind(AssertUnwindSafe(|| trigger.next_fire_time(now_ms))) {
                Ok(next) => next,
                Err(payload) => {
                    tracing::warn!(
                        trigger = %self.name,
                        error = %panic_message(payload.as_ref()),
                        "trigger panicked computing next fire time, unscheduling"
                    );
                    None
                }
            };
        self.next_fire_time
    }

    pub(crate) fn reset_trigger(&mut self, now_ms: u64) {
        self.trigger.reset(now_ms);
    }

    pub(crate) fn summary(&self) -> EntrySummary {
        EntrySummary {
            name: self.name.clone(),
            next_fire_time: if self.is_queued() {
                self.next_fire_time
            } else {
                None
            },
            trigger: format!("{:?}", self.trigger),
        }
    }
}

impl std::fmt::Debug for ScheduledEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledEntry")
            .field("name", &self.name)
            .field("trigger", &self.trigger)
            .field("next_fire_time", &self.next_fire_time)
            .field("valid", &self.valid)
            .finish()
    }
}

/// Monitoring snapshot of a registered entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    pub name: String,
    /// `None` when the trigger has no upcoming occurrence.
    pub next_fire_time: Option<u64>,
    /// Debug rendering of the trigger
    pub trigger: String,
}

/// Heap node pointing at an entry.
///
/// Ordered by fire time alone. `stamp` identifies the insertion so a node
/// left behind by a reset or replacement can be recognized as stale.
#[derive(Debug, Clone, Copy)]
pub(crate) struct QueuedEntry {
    pub(crate) fire_at: u64,
    pub(crate) stamp: u64,
    pub(crate) id: EntryId,
}

impl PartialEq for QueuedEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at
    }
}

impl Eq for QueuedEntry {}

impl PartialOrd for QueuedEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fire_at.cmp(&other.fire_at)
    }
}
