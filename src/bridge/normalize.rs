//! Maps provider outcomes and faults onto [`BridgeError`].
//!
//! This is the only place a provider fault turns into a caller-visible error.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::device::Outcome;
use crate::error::BridgeError;

/// Run a provider call, turning a panic into an ordinary fault.
pub fn guarded<T>(f: impl FnOnce() -> anyhow::Result<T>) -> anyhow::Result<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(anyhow::anyhow!(
            "provider panicked: {}",
            panic_message(payload.as_ref())
        )),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}

pub fn normalize<T>(operation: &str, result: anyhow::Result<Outcome<T>>) -> Result<T, BridgeError> {
    match result {
        Ok(Outcome::Success(value)) => Ok(value),
        Ok(Outcome::Unavailable(reason)) => {
            tracing::debug!(operation, %reason, "Operation unavailable");
            Err(BridgeError::Unavailable(reason.to_string()))
        }
        Ok(Outcome::Rejected(reason)) => {
            tracing::info!(operation, %reason, "Operation rejected by target");
            Err(BridgeError::OperationRejected(reason))
        }
        Err(fault) => {
            tracing::error!(operation, error = ?fault, "Provider fault");
            Err(BridgeError::Internal(format!("{} failed unexpectedly", operation)))
        }
    }
}
