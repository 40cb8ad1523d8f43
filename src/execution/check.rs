//! Executable form of a spec.

use crate::core::error::CheckResult;
use crate::core::error_log::Log;
use crate::core::types::Value;
use futures::future::{self, BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Future returned by running a check.
pub type CheckFuture = BoxFuture<'static, CheckResult>;

type CheckFn = dyn Fn(Value, Log) -> CheckFuture + Send + Sync;

/// A compiled, reusable check.
///
/// Stateless and immutable: the same check may run any number of times,
/// concurrently, each run with its own [`Log`].
#[derive(Clone)]
pub struct CompiledCheck {
    run: Arc<CheckFn>,
}

impl CompiledCheck {
    /// Wrap a function that already returns a boxed future.
    pub fn new<F>(run: F) -> Self
    where
        F: Fn(Value, Log) -> CheckFuture + Send + Sync + 'static,
    {
        Self { run: Arc::new(run) }
    }

    /// Wrap a synchronous check.
    pub fn from_fn<F>(check: F) -> Self
    where
        F: Fn(Value, &Log) -> CheckResult + Send + Sync + 'static,
    {
        Self::new(move |value, log| future::ready(check(value, &log)).boxed())
    }

    /// Wrap an asynchronous check.
    pub fn from_async<F, Fut>(check: F) -> Self
    where
        F: Fn(Value, Log) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CheckResult> + Send + 'static,
    {
        Self::new(move |value, log| check(value, log).boxed())
    }

    /// Check that returns its input unchanged.
    pub fn identity() -> Self {
        Self::from_fn(|value, _| Ok(value))
    }

    /// Run the check against `value`, reporting into `log`.
    pub fn run(&self, value: Value, log: Log) -> CheckFuture {
        (self.run)(value, log)
    }
}

impl fmt::Debug for CompiledCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledCheck").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error_log::Policy;
    use futures::executor::block_on;

    #[test]
    fn test_from_fn_runs_synchronously() {
        let check = CompiledCheck::from_fn(|value, _| Ok(Value::Number(value.as_f64().unwrap() * 2.0)));
        let result = check.run(Value::Number(4.0), Log::root(Policy::CollectAll)).now_or_never();
        assert_eq!(result, Some(Ok(Value::Number(8.0))));
    }

    #[test]
    fn test_from_async() {
        let check = CompiledCheck::from_async(|value, _log| async move { Ok::<_, crate::core::error::Halt>(value) });
        let result = block_on(check.run(Value::from("x"), Log::root(Policy::FailFast)));
        assert_eq!(result, Ok(Value::from("x")));
    }

    #[test]
    fn test_identity_and_clone() {
        let check = CompiledCheck::identity();
        let copy = check.clone();
        let result = block_on(copy.run(Value::Bool(true), Log::root(Policy::CollectAll)));
        assert_eq!(result, Ok(Value::Bool(true)));
        assert_eq!(format!("{:?}", check), "CompiledCheck { .. }");
    }
}
