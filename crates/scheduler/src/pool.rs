// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thread pool collaborator

use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;

/// Unit of work submitted to a pool.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("pool rejected job: {0}")]
    Rejected(String),
    #[error("pool saturated ({0} jobs in flight)")]
    Saturated(usize),
}

/// Executes jobs asynchronously on threads the scheduler does not own.
///
/// A pool may refuse work; the scheduler tolerates that.
pub trait ThreadPool: Send + Sync + 'static {
    fn execute(&self, job: Job) -> Result<(), PoolError>;
}

#[derive(Debug)]
struct Limit {
    max: usize,
    permits: Arc<Semaphore>,
}

/// Runs jobs on a tokio runtime's blocking thread pool.
///
/// Jobs may block, so they go through `spawn_blocking` rather than onto the
/// async workers. An optional bound rejects jobs once `max` are in flight.
#[derive(Debug)]
pub struct TokioPool {
    handle: Handle,
    limit: Option<Limit>,
}

impl TokioPool {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            limit: None,
        }
    }

    /// Pool on the runtime the caller is running in.
    pub fn current() -> Result<Self, PoolError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| PoolError::Rejected(e.to_string()))
    }

    pub fn with_max_in_flight(mut self, max: usize) -> Self {
        self.limit = Some(Limit {
            max,
            permits: Arc::new(Semaphore::new(max)),
        });
        self
    }

    /// Jobs currently holding a slot. Always zero for an unbounded pool.
    pub fn in_flight(&self) -> usize {
        self.limit
            .as_ref()
            .map_or(0, |l| l.max - l.permits.available_permits())
    }
}

impl ThreadPool for TokioPool {
    fn execute(&self, job: Job) -> Result<(), PoolError> {
        let permit = match &self.limit {
            Some(limit) => Some(
                Arc::clone(&limit.permits)
                    .try_acquire_owned()
                    .map_err(|_| PoolError::Saturated(limit.max))?,
            ),
            None => None,
        };

        self.handle.spawn_blocking(move || {
            let _permit = permit;
            job();
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
