//! Call-boundary timing wrapper.
//!
//! Wraps a public operation, measures its wall-clock duration and emits one
//! `op_timing` event. The wrapped value is returned unchanged.

use crate::service::loader::LoadReport;
use log::debug;
use std::time::Instant;

/// Classifies an operation's return value as ok/error for logging.
pub trait Outcome {
    fn is_ok_outcome(&self) -> bool;
}

impl Outcome for bool {
    fn is_ok_outcome(&self) -> bool {
        *self
    }
}

/// A lookup miss is a normal answer, not an error.
impl<T> Outcome for Option<T> {
    fn is_ok_outcome(&self) -> bool {
        true
    }
}

impl<T, E> Outcome for Result<T, E> {
    fn is_ok_outcome(&self) -> bool {
        self.is_ok()
    }
}

impl<T> Outcome for Vec<T> {
    fn is_ok_outcome(&self) -> bool {
        true
    }
}

impl Outcome for LoadReport {
    fn is_ok_outcome(&self) -> bool {
        self.is_success()
    }
}

/// Runs `operation`, logging its duration under the name `op`.
pub fn timed<T: Outcome>(op: &str, operation: impl FnOnce() -> T) -> T {
    let started_at = Instant::now();
    let value = operation();
    let status = if value.is_ok_outcome() { "ok" } else { "error" };
    debug!(
        "event=op_timing module=api op={op} status={status} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    value
}

#[cfg(test)]
mod tests {
    use super::{timed, Outcome};

    #[test]
    fn timed_returns_wrapped_value() {
        assert!(timed("noop", || true));
        assert_eq!(timed("lookup", || Some(7)), Some(7));
    }

    #[test]
    fn option_miss_counts_as_ok() {
        assert!(None::<u8>.is_ok_outcome());
        assert!(!false.is_ok_outcome());
    }
}
