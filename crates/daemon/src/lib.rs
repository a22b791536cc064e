// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chime daemon library
//!
//! Schedule file parsing and the targets `chimed` registers with its
//! scheduler.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod env;
pub mod target;

pub use config::{
    Config, ConfigError, Schedule, ScheduleFile, TriggerDef, DEFAULT_COMMAND_TIMEOUT,
};
pub use target::{CommandTarget, LogTarget};
