//! Top-level execution policies.
//!
//! [`ok`] stops at the first error and reports only that one; [`all`] keeps
//! going and reports every error. Both run one compiled check against one
//! value with a fresh [`Log`] tree.

use crate::core::error::{Halt, ValidationError, ValidationErrors};
use crate::core::error_log::{Log, Policy};
use crate::core::types::Value;
use crate::execution::check::CompiledCheck;

/// Message used when a run halted without a recorded error.
const HALTED_MESSAGE: &str = "Validation error";

/// Validate `value`, stopping at the first error.
///
/// Returns the transformed value, or the first error recorded (in
/// execution order).
pub async fn ok(value: impl Into<Value>, check: &CompiledCheck) -> Result<Value, ValidationError> {
    let log = Log::root(Policy::FailFast);
    let outcome = check.run(value.into(), log.clone()).await;

    match (outcome, log.first_error()) {
        (Ok(value), None) => {
            log::debug!("validation passed");
            Ok(value)
        }
        (Ok(_), Some(first)) | (Err(Halt(())), Some(first)) => {
            log::debug!("validation failed at '{}': {}", first.path, first.message);
            Err(first)
        }
        (Err(Halt(())), None) => Err(ValidationError::new(HALTED_MESSAGE)),
    }
}

/// Validate `value`, collecting every error.
///
/// Sibling schema fields keep running after an error, but a single
/// compiled check still stops at its first failing validator.
pub async fn all(value: impl Into<Value>, check: &CompiledCheck) -> Result<Value, ValidationErrors> {
    let log = Log::root(Policy::CollectAll);
    let outcome = check.run(value.into(), log.clone()).await;
    let errors = log.take_errors();

    match outcome {
        Ok(value) if errors.is_empty() => {
            log::debug!("validation passed");
            Ok(value)
        }
        _ => {
            log::debug!("validation failed with {} error(s)", errors.len());
            Err(ValidationErrors::new(errors))
        }
    }
}

/// [`ok`], driven to completion on the current thread.
///
/// Suitable for synchronous checks and for async checks that do not depend
/// on a specific runtime (timers, I/O reactors).
pub fn ok_blocking(value: impl Into<Value>, check: &CompiledCheck) -> Result<Value, ValidationError> {
    futures::executor::block_on(ok(value, check))
}

/// [`all`], driven to completion on the current thread.
pub fn all_blocking(
    value: impl Into<Value>,
    check: &CompiledCheck,
) -> Result<Value, ValidationErrors> {
    futures::executor::block_on(all(value, check))
}
