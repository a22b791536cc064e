// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry and queue bookkeeping guarded by the scheduler lock.
//!
//! Everything here is synchronous and takes `now` explicitly; the threading
//! lives in [`crate::scheduler`].

use crate::entry::{EntryId, EntrySummary, QueuedEntry, ScheduledEntry};
use crate::error::SchedulerError;
use crate::queue::PriorityQueue;
use chime_core::{Target, TimeTrigger};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Lifecycle of a scheduler. There is no way back from `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Initialized,
    Running,
    Stopped,
}

/// What the dispatch loop should do next.
#[derive(Debug)]
pub(crate) enum NextAction {
    /// Queue is empty; wait until notified.
    Idle,
    /// Nothing due yet; wait at most this long.
    Wait(Duration),
    /// Entry popped from the queue and due to fire.
    Fire(Dispatch),
}

/// Everything needed to run a target outside the lock.
pub(crate) struct Dispatch {
    pub(crate) id: EntryId,
    pub(crate) name: String,
    pub(crate) target: Arc<dyn Target>,
}

impl std::fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatch")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Debug)]
pub(crate) struct SchedulerState {
    pub(crate) lifecycle: Lifecycle,
    /// Entries that are registered or still referenced by a queue node.
    entries: HashMap<EntryId, ScheduledEntry>,
    /// Live entry per name.
    names: HashMap<String, EntryId>,
    queue: PriorityQueue<QueuedEntry>,
    next_id: u64,
    next_stamp: u64,
}

impl SchedulerState {
    pub(crate) fn new() -> Self {
        Self {
            lifecycle: Lifecycle::Initialized,
            entries: HashMap::new(),
            names: HashMap::new(),
            queue: PriorityQueue::new(),
            next_id: 0,
            next_stamp: 0,
        }
    }

    /// Register an entry, replacing any live entry with the same name.
    ///
    /// Returns true when the entry became the earliest in the queue.
    pub(crate) fn add(
        &mut self,
        name: String,
        trigger: Box<dyn TimeTrigger>,
        target: Arc<dyn Target>,
        now_ms: u64,
    ) -> bool {
        if let Some(old) = self.names.remove(&name) {
            self.retire(old);
        }

        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries
            .insert(id, ScheduledEntry::new(name.clone(), trigger, target));
        self.names.insert(name, id);
        self.enqueue(id, now_ms)
    }

    pub(crate) fn remove(&mut self, name: &str) -> Result<(), SchedulerError> {
        let id = self
            .names
            .remove(name)
            .ok_or_else(|| SchedulerError::NotFound(name.to_string()))?;
        self.retire(id);
        Ok(())
    }

    /// Reset the entry's trigger and queue it afresh.
    ///
    /// Returns true when the entry became the earliest in the queue.
    pub(crate) fn reset(&mut self, name: &str, now_ms: u64) -> Result<bool, SchedulerError> {
        let id = *self
            .names
            .get(name)
            .ok_or_else(|| SchedulerError::NotFound(name.to_string()))?;
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.reset_trigger(now_ms);
        }
        Ok(self.enqueue(id, now_ms))
    }

    /// Purge stale nodes from the top of the queue, then pop the top entry
    /// if it is overdue.
    pub(crate) fn next_action(&mut self, now_ms: u64, min_wait: Duration) -> NextAction {
        while let Ok(top) = self.queue.peek().copied() {
            if !self.is_live(&top) {
                let _ = self.queue.pop();
                self.release(&top);
                continue;
            }

            if top.fire_at > now_ms {
                return NextAction::Wait(Duration::from_millis(top.fire_at - now_ms));
            }
            if top.fire_at == now_ms {
                return NextAction::Wait(min_wait);
            }

            let _ = self.queue.pop();
            let Some(entry) = self.entries.get_mut(&top.id) else {
                continue;
            };
            entry.mark_queued(None);
            return NextAction::Fire(Dispatch {
                id: top.id,
                name: entry.name().to_string(),
                target: Arc::clone(entry.target()),
            });
        }
        NextAction::Idle
    }

    /// Queue a dispatched entry for its next occurrence.
    ///
    /// Entries removed or replaced while in flight are skipped, as are
    /// entries a reset already queued again. Returns the next fire time if
    /// the entry was queued.
    pub(crate) fn reschedule(&mut self, id: EntryId, now_ms: u64) -> Option<u64> {
        let entry = self.entries.get(&id)?;
        if !entry.is_valid() || entry.is_queued() {
            return None;
        }
        self.enqueue(id, now_ms);
        self.entries.get(&id).and_then(|e| {
            if e.is_queued() {
                e.next_fire_time()
            } else {
                None
            }
        })
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }

    pub(crate) fn summaries(&self) -> Vec<EntrySummary> {
        let mut summaries: Vec<_> = self
            .names
            .values()
            .filter_map(|id| self.entries.get(id))
            .map(ScheduledEntry::summary)
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.names.clear();
        self.queue.clear();
    }

    /// Compute the entry's next fire time and insert a fresh queue node.
    /// Any older node for the entry goes stale.
    fn enqueue(&mut self, id: EntryId, now_ms: u64) -> bool {
        let Some(entry) = self.entries.get_mut(&id) else {
            return false;
        };
        let Some(fire_at) = entry.compute_next(now_ms) else {
            entry.mark_queued(None);
            return false;
        };

        let stamp = self.next_stamp;
        self.next_stamp += 1;
        entry.mark_queued(Some(stamp));

        let earliest = self.queue.peek().map_or(true, |top| fire_at < top.fire_at);
        self.queue.insert(QueuedEntry { fire_at, stamp, id });
        earliest
    }

    /// Invalidate an entry that is no longer registered. It is dropped now
    /// if no queue node refers to it, otherwise when that node surfaces.
    fn retire(&mut self, id: EntryId) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.invalidate();
            if !entry.is_queued() {
                self.entries.remove(&id);
            }
        }
    }

    fn is_live(&self, node: &QueuedEntry) -> bool {
        self.entries
            .get(&node.id)
            .is_some_and(|e| e.is_valid() && e.owns(node))
    }

    /// Drop the entry behind a stale node once nothing can fire it.
    fn release(&mut self, node: &QueuedEntry) {
        let orphaned = self
            .entries
            .get(&node.id)
            .is_some_and(|e| !e.is_valid() && e.owns(node));
        if orphaned {
            self.entries.remove(&node.id);
        }
    }

    #[cfg(test)]
    pub(crate) fn queued_nodes(&self) -> usize {
        self.queue.len()
    }

    #[cfg(test)]
    pub(crate) fn tracked_entries(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
