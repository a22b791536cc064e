// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! chime-core: time triggers, targets and clocks shared by the scheduler crates

pub mod clock;
pub mod cron_trigger;
pub mod periodic;
pub mod target;
pub mod time_fmt;
pub mod trigger;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use cron_trigger::{CronFields, CronTrigger};
pub use periodic::PeriodicTrigger;
pub use target::{Target, TargetError};
pub use time_fmt::{format_elapsed, format_elapsed_ms, parse_duration, DurationError};
pub use trigger::{TimeTrigger, TriggerError};
