// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Callback invoked when a trigger fires.

/// Error returned by a failing target.
pub type TargetError = Box<dyn std::error::Error + Send + Sync>;

/// Receiver of trigger firings.
///
/// `fired` runs on a pool thread, never on the dispatch loop. Errors and
/// panics are caught by the scheduler and reported to its failure listeners.
pub trait Target: Send + Sync + 'static {
    fn fired(&self, name: &str) -> Result<(), TargetError>;
}
