// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! chime-scheduler: min-heap time scheduler with a single dispatch loop

mod config;
mod entry;
mod error;
mod listener;
mod pool;
mod queue;
mod scheduler;
mod state;

pub use config::SchedulerConfig;
pub use entry::EntrySummary;
pub use error::SchedulerError;
pub use listener::{DispatchFailure, FailureListener};
pub use pool::{Job, PoolError, ThreadPool, TokioPool};
pub use queue::{PriorityQueue, QueueError};
pub use scheduler::TimeScheduler;
pub use state::Lifecycle;
