// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for scheduler operations

use crate::pool::PoolError;
use thiserror::Error;

/// Errors returned synchronously by [`crate::TimeScheduler`] calls.
///
/// Failures inside the dispatch loop never surface here; they are logged
/// and reported to failure listeners.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("trigger not found: {0}")]
    NotFound(String),
    #[error("scheduler is already running")]
    AlreadyRunning,
    #[error("scheduler has been stopped")]
    Stopped,
    #[error("thread pool error: {0}")]
    Pool(#[from] PoolError),
}
