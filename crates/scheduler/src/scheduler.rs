// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time scheduler engine
//!
//! A single dispatch loop, submitted to the thread pool by [`TimeScheduler::start`],
//! sleeps on a condition variable until the earliest queued entry is due, then
//! hands its target to the pool and reschedules it. Client calls from any
//! thread mutate the same state under one lock and wake the loop when they
//! produce a new earliest entry.

use crate::config::SchedulerConfig;
use crate::entry::EntrySummary;
use crate::error::SchedulerError;
use crate::listener::{fire_target, FailureListener, Listeners};
use crate::pool::ThreadPool;
use crate::state::{Dispatch, Lifecycle, NextAction, SchedulerState};
use chime_core::{Clock, SystemClock, Target, TimeTrigger};
use parking_lot::{Condvar, Mutex, MutexGuard, RwLock};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Fires targets when their triggers come due.
///
/// Dropping the scheduler stops it. In-flight target executions are never
/// cancelled.
pub struct TimeScheduler<C: Clock = SystemClock> {
    inner: Arc<Inner<C>>,
}

struct Inner<C: Clock> {
    state: Mutex<SchedulerState>,
    wakeup: Condvar,
    pool: Arc<dyn ThreadPool>,
    clock: C,
    config: SchedulerConfig,
    listeners: Listeners,
}

impl TimeScheduler<SystemClock> {
    pub fn new(pool: Arc<dyn ThreadPool>) -> Self {
        Self::with_clock(pool, SystemClock, SchedulerConfig::default())
    }
}

impl<C: Clock> TimeScheduler<C> {
    pub fn with_clock(pool: Arc<dyn ThreadPool>, clock: C, config: SchedulerConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(SchedulerState::new()),
                wakeup: Condvar::new(),
                pool,
                clock,
                config,
                listeners: Arc::new(RwLock::new(Vec::new())),
            }),
        }
    }

    /// Register `target` to fire whenever `trigger` comes due.
    ///
    /// An entry already registered under `name` is replaced; if its dispatch
    /// is in flight it is not rescheduled afterwards. A trigger with no
    /// upcoming occurrence is registered but never queued.
    pub fn add_trigger(
        &self,
        name: impl Into<String>,
        trigger: impl TimeTrigger + 'static,
        target: Arc<dyn Target>,
    ) -> Result<(), SchedulerError> {
        let name = name.into();
        let mut state = self.inner.state.lock();
        if state.lifecycle == Lifecycle::Stopped {
            return Err(SchedulerError::Stopped);
        }

        let now = self.inner.clock.epoch_ms();
        debug!(trigger = %name, "adding trigger");
        if state.add(name, Box::new(trigger), target, now) {
            self.inner.wakeup.notify_all();
        }
        Ok(())
    }

    /// Unregister the entry. A dispatch already handed to the pool still
    /// runs to completion.
    pub fn remove_trigger(&self, name: &str) -> Result<(), SchedulerError> {
        self.inner.state.lock().remove(name)?;
        debug!(trigger = name, "removed trigger");
        Ok(())
    }

    /// Reset the entry's trigger and queue it from now.
    pub fn reset_trigger(&self, name: &str) -> Result<(), SchedulerError> {
        let mut state = self.inner.state.lock();
        let now = self.inner.clock.epoch_ms();
        if state.reset(name, now)? {
            self.inner.wakeup.notify_all();
        }
        debug!(trigger = name, "reset trigger");
        Ok(())
    }

    /// Submit the dispatch loop to the pool and return.
    pub fn start(&self) -> Result<(), SchedulerError> {
        {
            let mut state = self.inner.state.lock();
            match state.lifecycle {
                Lifecycle::Running => return Err(SchedulerError::AlreadyRunning),
                Lifecycle::Stopped => return Err(SchedulerError::Stopped),
                Lifecycle::Initialized => state.lifecycle = Lifecycle::Running,
            }
        }

        let inner = Arc::clone(&self.inner);
        if let Err(e) = self.inner.pool.execute(Box::new(move || inner.run())) {
            let mut state = self.inner.state.lock();
            if state.lifecycle == Lifecycle::Running {
                state.lifecycle = Lifecycle::Initialized;
            }
            return Err(e.into());
        }

        info!(scheduler = %self.inner.config.name, "scheduler started");
        Ok(())
    }

    /// Ask the dispatch loop to exit. Does not wait for it. Idempotent.
    pub fn stop(&self) {
        {
            let mut state = self.inner.state.lock();
            if state.lifecycle == Lifecycle::Stopped {
                return;
            }
            state.lifecycle = Lifecycle::Stopped;
        }
        self.inner.wakeup.notify_all();
        info!(scheduler = %self.inner.config.name, "scheduler stopped");
    }

    /// Stop and forget every entry and listener.
    pub fn dispose(&self) {
        self.stop();
        self.inner.state.lock().clear();
        self.inner.listeners.write().clear();
    }

    pub fn state(&self) -> Lifecycle {
        self.inner.state.lock().lifecycle
    }

    /// Registered entries, sorted by name.
    pub fn entries(&self) -> Vec<EntrySummary> {
        self.inner.state.lock().summaries()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.state.lock().contains(name)
    }

    pub fn len(&self) -> usize {
        self.inner.state.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add_failure_listener(&self, listener: Arc<dyn FailureListener>) {
        self.inner.listeners.write().push(listener);
    }

    /// Returns false if the listener was not registered.
    pub fn remove_failure_listener(&self, listener: &Arc<dyn FailureListener>) -> bool {
        let mut listeners = self.inner.listeners.write();
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        listeners.len() != before
    }
}

impl<C: Clock> Drop for TimeScheduler<C> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<C: Clock> std::fmt::Debug for TimeScheduler<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("TimeScheduler")
            .field("name", &self.inner.config.name)
            .field("lifecycle", &state.lifecycle)
            .field("entries", &state.len())
            .finish()
    }
}

impl<C: Clock> Inner<C> {
    fn run(&self) {
        let span = tracing::info_span!("dispatch", scheduler = %self.config.name);
        let _enter = span.enter();
        debug!("dispatch loop started");

        let mut state = self.state.lock();
        while state.lifecycle == Lifecycle::Running {
            let now = self.clock.epoch_ms();
            match state.next_action(now, self.config.min_wait) {
                NextAction::Idle => {
                    trace!("queue empty, waiting");
                    self.wakeup.wait(&mut state);
                }
                NextAction::Wait(timeout) => {
                    trace!(wait_ms = timeout.as_millis() as u64, "waiting for next trigger");
                    self.wakeup.wait_for(&mut state, timeout);
                }
                NextAction::Fire(dispatch) => {
                    let id = dispatch.id;
                    MutexGuard::unlocked(&mut state, || self.dispatch(dispatch));
                    let now = self.clock.epoch_ms();
                    if let Some(next) = state.reschedule(id, now) {
                        trace!(next_fire_time = next, "rescheduled");
                    }
                }
            }
        }

        debug!("dispatch loop exited");
    }

    fn dispatch(&self, dispatch: Dispatch) {
        let Dispatch { name, target, .. } = dispatch;
        debug!(trigger = %name, "firing trigger");

        let listeners = Arc::clone(&self.listeners);
        let job_name = name.clone();
        let job = Box::new(move || fire_target(&job_name, target.as_ref(), &listeners));
        if let Err(e) = self.pool.execute(job) {
            warn!(trigger = %name, error = %e, "failed to submit trigger to thread pool");
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests/mod.rs"]
mod tests;
