// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Target failure reporting

use chime_core::Target;
use parking_lot::RwLock;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;

/// Why a target invocation failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchFailure {
    #[error("target returned error: {0}")]
    Error(String),
    #[error("target panicked: {0}")]
    Panic(String),
}

/// Notified whenever a target fails.
///
/// Called on the pool thread that ran the target.
pub trait FailureListener: Send + Sync + 'static {
    fn trigger_failed(&self, name: &str, failure: &DispatchFailure);
}

pub(crate) type Listeners = Arc<RwLock<Vec<Arc<dyn FailureListener>>>>;

/// Invoke a target, containing any error or panic.
pub(crate) fn fire_target(name: &str, target: &dyn Target, listeners: &Listeners) {
    let failure = match panic::catch_unwind(AssertUnwindSafe(|| target.fired(name))) {
        Ok(Ok(())) => {
            tracing::trace!(trigger = name, "target completed");
            return;
        }
        Ok(Err(e)) => {
            let failure = DispatchFailure::Error(e.to_string());
            tracing::warn!(trigger = name, error = %failure, "exception executing trigger");
            failure
        }
        Err(payload) => {
            let failure = DispatchFailure::Panic(panic_message(payload.as_ref()));
            tracing::error!(trigger = name, error = %failure, "panic executing trigger");
            failure
        }
    };

    // Snapshot so a listener may add or remove listeners without deadlocking.
    let snapshot: Vec<_> = listeners.read().iter().cloned().collect();
    for listener in snapshot {
        listener.trigger_failed(name, &failure);
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
