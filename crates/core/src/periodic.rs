// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Offset-and-period trigger

use crate::trigger::{TimeTrigger, TriggerError};
use std::time::Duration;

/// Fires once at `offset` after it is first evaluated, then every `period`.
///
/// Without a period the trigger is one-shot. Without an offset the first
/// firing is immediate. Later firings stay on the grid anchored at the first
/// one, so a late dispatch does not drift the schedule.
#[derive(Debug, Clone)]
pub struct PeriodicTrigger {
    offset: Option<Duration>,
    period: Option<Duration>,
    anchor_ms: Option<u64>,
}

impl PeriodicTrigger {
    pub fn new(offset: Option<Duration>, period: Option<Duration>) -> Result<Self, TriggerError> {
        if period.is_some_and(|p| p.as_millis() == 0) {
            return Err(TriggerError::ZeroPeriod);
        }
        Ok(Self {
            offset,
            period,
            anchor_ms: None,
        })
    }

    /// Repeating trigger whose first firing is one period from now.
    pub fn every(period: Duration) -> Result<Self, TriggerError> {
        Self::new(Some(period), Some(period))
    }

    /// One-shot trigger firing `delay` from now.
    pub fn once_after(delay: Duration) -> Self {
        Self {
            offset: Some(delay),
            period: None,
            anchor_ms: None,
        }
    }

}

impl TimeTrigger for PeriodicTrigger {
    fn next_fire_time(&mut self, now_ms: u64) -> Option<u64> {
        // Times beyond the u64 millisecond range never arrive.
        let anchor = match self.anchor_ms {
            Some(anchor) => anchor,
            None => {
                let offset_ms = self.offset.map_or(Some(0), millis)?;
                let anchor = now_ms.checked_add(offset_ms)?;
                self.anchor_ms = Some(anchor);
                anchor
            }
        };
        if now_ms <= anchor {
            return Some(anchor);
        }

        let period_ms = millis(self.period?)?;
        let remainder = (now_ms - anchor) % period_ms;
        now_ms.checked_add(period_ms - remainder)
    }

    fn reset(&mut self, _now_ms: u64) {
        self.anchor_ms = None;
    }
}

fn millis(duration: Duration) -> Option<u64> {
    u64::try_from(duration.as_millis()).ok()
}

#[cfg(test)]
#[path = "periodic_tests.rs"]
mod tests;
