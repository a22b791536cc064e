// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time trigger contract.
//!
//! A trigger is the policy half of a scheduled entry: given the current time
//! it answers when the entry should fire next, or that it never will again.

use std::fmt;
use thiserror::Error;

/// Errors raised while building a trigger.
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("invalid cron expression '{expression}': {reason}")]
    InvalidCron { expression: String, reason: String },
    #[error("invalid cron field {field}: {value} (expected {range})")]
    FieldOutOfRange {
        field: &'static str,
        value: u32,
        range: &'static str,
    },
    #[error("period must be greater than zero")]
    ZeroPeriod,
}

/// Computes fire times for a scheduled entry.
///
/// Times are absolute epoch milliseconds. The scheduler only ever calls a
/// trigger while holding its lock, so implementations may keep mutable state.
pub trait TimeTrigger: Send + fmt::Debug {
    /// Next time at which the entry should fire, given `now_ms`.
    ///
    /// `None` means the schedule is exhausted and the entry is dropped from
    /// the queue.
    fn next_fire_time(&mut self, now_ms: u64) -> Option<u64>;

    /// Recompute internal schedule state before the next `next_fire_time`
    /// call. Stateless triggers keep the default.
    fn reset(&mut self, _now_ms: u64) {}
}

impl<T: TimeTrigger + ?Sized> TimeTrigger for Box<T> {
    fn next_fire_time(&mut self, now_ms: u64) -> Option<u64> {
        (**self).next_fire_time(now_ms)
    }

    fn reset(&mut self, now_ms: u64) {
        (**self).reset(now_ms)
    }
}
