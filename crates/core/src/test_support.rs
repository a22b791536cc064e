// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::target::{Target, TargetError};
use crate::trigger::TimeTrigger;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

// ── Targets ─────────────────────────────────────────────────────────────────

/// One recorded call to [`Target::fired`].
#[derive(Debug, Clone)]
pub struct Firing {
    /// Label of the target that received the call
    pub label: String,
    /// Trigger name passed to `fired`
    pub name: String,
    pub at: Instant,
}

/// Ordered record of firings, shareable between several targets.
#[derive(Debug, Clone, Default)]
pub struct FiringLog {
    inner: Arc<Mutex<Vec<Firing>>>,
}

impl FiringLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, label: &str, name: &str) {
        self.inner.lock().push(Firing {
            label: label.to_string(),
            name: name.to_string(),
            at: Instant::now(),
        });
    }

    pub fn firings(&self) -> Vec<Firing> {
        self.inner.lock().clone()
    }

    /// Target labels in firing order.
    pub fn labels(&self) -> Vec<String> {
        self.inner.lock().iter().map(|f| f.label.clone()).collect()
    }

    pub fn count(&self, label: &str) -> usize {
        self.inner.lock().iter().filter(|f| f.label == label).count()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

/// How a [`FakeTarget`] behaves when fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeBehavior {
    Succeed,
    Fail,
    Panic,
}

/// Target that records every firing and then succeeds, errors or panics.
#[derive(Debug, Clone)]
pub struct FakeTarget {
    label: String,
    log: FiringLog,
    behavior: FakeBehavior,
}

impl FakeTarget {
    pub fn new(label: &str, log: &FiringLog) -> Self {
        Self::with_behavior(label, log, FakeBehavior::Succeed)
    }

    pub fn with_behavior(label: &str, log: &FiringLog, behavior: FakeBehavior) -> Self {
        Self {
            label: label.to_string(),
            log: log.clone(),
            behavior,
        }
    }
}

impl Target for FakeTarget {
    #[allow(clippy::panic)]
    fn fired(&self, name: &str) -> Result<(), TargetError> {
        self.log.record(&self.label, name);
        match self.behavior {
            FakeBehavior::Succeed => Ok(()),
            FakeBehavior::Fail => Err(format!("{} failed", self.label).into()),
            FakeBehavior::Panic => panic!("{} panicked", self.label),
        }
    }
}

// ── Triggers ────────────────────────────────────────────────────────────────

/// Trigger that fires a fixed number of times, `interval` apart.
#[derive(Debug, Clone)]
pub struct CountdownTrigger {
    interval: Duration,
    remaining: usize,
    initial: usize,
    resets: Arc<AtomicUsize>,
}

impl CountdownTrigger {
    pub fn new(interval: Duration, times: usize) -> Self {
        Self {
            interval,
            remaining: times,
            initial: times,
            resets: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter of `reset` calls, readable after the trigger is moved
    /// into a scheduler.
    pub fn reset_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.resets)
    }
}

impl TimeTrigger for CountdownTrigger {
    fn next_fire_time(&mut self, now_ms: u64) -> Option<u64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(now_ms + self.interval.as_millis() as u64)
    }

    fn reset(&mut self, _now_ms: u64) {
        self.remaining = self.initial;
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

/// Trigger that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverTrigger;

impl TimeTrigger for NeverTrigger {
    fn next_fire_time(&mut self, _now_ms: u64) -> Option<u64> {
        None
    }
}

// ── Polling ─────────────────────────────────────────────────────────────────

/// Poll `condition` every few milliseconds until it holds or `timeout` elapses.
pub fn wait_for(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
}
