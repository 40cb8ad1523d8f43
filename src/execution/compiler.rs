//! Spec compiler.
//!
//! Turns a [`Spec`] into one [`CompiledCheck`] by resolving every validator
//! key through a [`Registry`] and chaining the resulting checks in declared
//! order.

use crate::core::error::{CheckResult, SpecError, SpecResult};
use crate::core::error_log::Log;
use crate::core::spec::Spec;
use crate::core::types::Value;
use crate::execution::check::{CheckFuture, CompiledCheck};
use crate::validators::registry::Registry;
use futures::future::{self, FutureExt};
use std::sync::Arc;

/// Message logged for null input that is neither nullable nor defaulted.
pub const NULL_MESSAGE: &str = "Can't be null";

/// One resolved `(validator, check)` pair.
struct Step {
    name: String,
    check: CompiledCheck,
}

/// Compile a spec against a registry.
///
/// Fails with [`SpecError::UnknownValidator`] as soon as a key has no
/// registered factory; factory errors are returned unchanged.
pub fn compile(spec: &Spec, registry: &Registry) -> SpecResult<CompiledCheck> {
    let mut steps = Vec::with_capacity(spec.entries().len());

    for (name, argument) in spec.entries() {
        let factory = registry
            .factory(name)
            .ok_or_else(|| SpecError::UnknownValidator(name.clone()))?;
        let check = factory(argument, registry)?;
        steps.push(Step {
            name: name.clone(),
            check,
        });
    }

    log::trace!(
        "compiled spec with validators [{}]",
        steps.iter().map(|s| s.name.as_str()).collect::<Vec<_>>().join(", ")
    );

    let steps: Arc<[Step]> = steps.into();
    let nullable = spec.is_nullable();
    let default = spec.default_value().cloned();

    Ok(CompiledCheck::new(move |value, log| {
        if value.is_null() {
            return future::ready(on_null(nullable, default.as_ref(), &log)).boxed();
        }
        run_steps(Arc::clone(&steps), value, log)
    }))
}

/// Parse a spec value and compile it.
pub fn compile_value(spec: &Value, registry: &Registry) -> SpecResult<CompiledCheck> {
    compile(&Spec::from_value(spec)?, registry)
}

fn on_null(nullable: bool, default: Option<&Value>, log: &Log) -> CheckResult {
    if nullable {
        return Ok(Value::Null);
    }
    if let Some(default) = default {
        return Ok(default.clone());
    }
    log.error(NULL_MESSAGE)?;
    Ok(Value::Null)
}

/// Run each step on the output of the previous one.
///
/// A step that records any error (at its scope or deeper) ends the chain;
/// the value it returned is the chain's result. This holds under both
/// policies, unlike sibling schema fields, which keep going.
fn run_steps(steps: Arc<[Step]>, value: Value, log: Log) -> CheckFuture {
    async move {
        let mut value = value;
        for step in steps.iter() {
            let seen = log.error_count();
            value = step.check.run(value, log.clone()).await?;
            if log.error_count() > seen {
                log::trace!("'{}' failed at '{}', skipping remaining checks", step.name, log.path());
                break;
            }
        }
        Ok(value)
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error_log::Policy;
    use crate::validators::registry::RegistryBuilder;
    use futures::executor::block_on;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_registry() -> Registry {
        RegistryBuilder::new()
            .with_builtins(false)
            .register("inc", |_, _| {
                Ok(CompiledCheck::from_fn(|value, _| {
                    Ok(Value::Number(value.as_f64().unwrap_or(0.0) + 1.0))
                }))
            })
            .register("double", |_, _| {
                Ok(CompiledCheck::from_fn(|value, _| {
                    Ok(Value::Number(value.as_f64().unwrap_or(0.0) * 2.0))
                }))
            })
            .build()
    }

    #[test]
    fn test_steps_run_in_declared_order() {
        let registry = counting_registry();
        let a = compile(&Spec::new().with("inc", true).with("double", true), &registry).unwrap();
        let b = compile(&Spec::new().with("double", true).with("inc", true), &registry).unwrap();

        let log = Log::root(Policy::CollectAll);
        assert_eq!(block_on(a.run(Value::Number(1.0), log.clone())), Ok(Value::Number(4.0)));
        assert_eq!(block_on(b.run(Value::Number(1.0), log)), Ok(Value::Number(3.0)));
    }

    #[test]
    fn test_unknown_validator_fails_at_compile_time() {
        let registry = counting_registry();
        let err = compile(&Spec::new().with("inc", true).with("nope", 1), &registry).unwrap_err();
        assert_eq!(err, SpecError::UnknownValidator("nope".to_string()));
    }

    #[test]
    fn test_factory_receives_argument() {
        let registry = RegistryBuilder::new()
            .with_builtins(false)
            .register("add", |argument, _| {
                let amount = argument
                    .as_f64()
                    .ok_or_else(|| SpecError::invalid_argument("add", "expected a number"))?;
                Ok(CompiledCheck::from_fn(move |value, _| {
                    Ok(Value::Number(value.as_f64().unwrap_or(0.0) + amount))
                }))
            })
            .build();

        let check = compile_value(&Value::from(json!({"add": 5})), &registry).unwrap();
        let result = block_on(check.run(Value::Number(1.0), Log::root(Policy::CollectAll)));
        assert_eq!(result, Ok(Value::Number(6.0)));

        let err = compile_value(&Value::from(json!({"add": "x"})), &registry).unwrap_err();
        assert!(matches!(err, SpecError::InvalidArgument { .. }));
    }

    #[test]
    fn test_null_handling() {
        let registry = counting_registry();
        let log = Log::root(Policy::CollectAll);

        let nullable = compile(&Spec::new().with("inc", true).nullable(true), &registry).unwrap();
        assert_eq!(block_on(nullable.run(Value::Null, log.clone())), Ok(Value::Null));

        let defaulted = compile(&Spec::new().with("inc", true).def(3), &registry).unwrap();
        assert_eq!(block_on(defaulted.run(Value::Null, log.clone())), Ok(Value::Number(3.0)));
        assert_eq!(log.error_count(), 0);

        let strict = compile(&Spec::new().with("inc", true), &registry).unwrap();
        assert_eq!(block_on(strict.run(Value::Null, log.clone())), Ok(Value::Null));
        assert_eq!(log.first_error().unwrap().message, NULL_MESSAGE);
    }

    #[test]
    fn test_stops_chain_after_erroring_step() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let registry = RegistryBuilder::new()
            .with_builtins(false)
            .register("fail", |_, _| {
                Ok(CompiledCheck::from_fn(|value, log| {
                    log.error("a")?;
                    log.error("b")?;
                    Ok(value)
                }))
            })
            .register("after", move |_, _| {
                let counter = Arc::clone(&counter);
                Ok(CompiledCheck::from_fn(move |value, _| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(value)
                }))
            })
            .build();

        let check = compile(&Spec::new().with("fail", true).with("after", true), &registry).unwrap();
        let log = Log::root(Policy::CollectAll);
        let result = block_on(check.run(Value::Number(10.0), log.clone()));

        assert_eq!(result, Ok(Value::Number(10.0)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let messages: Vec<String> = log.take_errors().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["a", "b"]);
    }

    #[test]
    fn test_reusable_across_runs() {
        let registry = counting_registry();
        let check = compile(&Spec::new().with("inc", true), &registry).unwrap();
        for i in 0..3 {
            let log = Log::root(Policy::FailFast);
            let result = block_on(check.run(Value::Number(i as f64), log));
            assert_eq!(result, Ok(Value::Number(i as f64 + 1.0)));
        }
    }
}
