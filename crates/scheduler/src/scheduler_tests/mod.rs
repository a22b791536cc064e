// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler engine tests

mod failures;
mod lifecycle;
mod ordering;
mod replace;

use super::*;
use crate::listener::DispatchFailure;
use crate::pool::{Job, PoolError, TokioPool};
use chime_core::test_support::{wait_for, FakeBehavior, FakeTarget, FiringLog};
use chime_core::PeriodicTrigger;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::runtime::Runtime;

const SETTLE: Duration = Duration::from_millis(150);
const TIMEOUT: Duration = Duration::from_secs(3);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .build()
        .unwrap()
}

fn once_after(n: u64) -> PeriodicTrigger {
    PeriodicTrigger::once_after(ms(n))
}

fn every(n: u64) -> PeriodicTrigger {
    PeriodicTrigger::every(ms(n)).unwrap()
}

/// Scheduler on a private runtime. The scheduler is declared first so it
/// stops before the runtime shuts down.
struct Harness {
    scheduler: TimeScheduler,
    log: FiringLog,
    _rt: Runtime,
}

impl Harness {
    fn new() -> Self {
        let rt = runtime();
        let pool = Arc::new(TokioPool::new(rt.handle().clone()));
        Self::with_pool(rt, pool)
    }

    fn with_pool(rt: Runtime, pool: Arc<dyn ThreadPool>) -> Self {
        Self {
            scheduler: TimeScheduler::new(pool),
            log: FiringLog::new(),
            _rt: rt,
        }
    }

    fn started() -> Self {
        let harness = Self::new();
        harness.scheduler.start().unwrap();
        harness
    }

    fn target(&self, label: &str) -> Arc<dyn Target> {
        Arc::new(FakeTarget::new(label, &self.log))
    }

    fn failing(&self, label: &str, behavior: FakeBehavior) -> Arc<dyn Target> {
        Arc::new(FakeTarget::with_behavior(label, &self.log, behavior))
    }

    fn wait_for_count(&self, label: &str, count: usize) -> bool {
        wait_for(TIMEOUT, || self.log.count(label) >= count)
    }
}

/// Accepts a fixed number of jobs, then rejects everything.
struct RejectingPool {
    inner: TokioPool,
    remaining: AtomicUsize,
    rejected: Arc<AtomicUsize>,
}

impl RejectingPool {
    fn new(rt: &Runtime, accept: usize) -> Self {
        Self {
            inner: TokioPool::new(rt.handle().clone()),
            remaining: AtomicUsize::new(accept),
            rejected: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl ThreadPool for RejectingPool {
    fn execute(&self, job: Job) -> Result<(), PoolError> {
        let accepted = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if accepted {
            return self.inner.execute(job);
        }
        self.rejected.fetch_add(1, Ordering::SeqCst);
        Err(PoolError::Rejected("pool is shut down".to_string()))
    }
}

#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<(String, DispatchFailure)>>,
}

impl FailureListener for Recorder {
    fn trigger_failed(&self, name: &str, failure: &DispatchFailure) {
        self.seen.lock().push((name.to_string(), failure.clone()));
    }
}
