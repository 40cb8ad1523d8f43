//! Path-scoped error log threaded through every check.
//!
//! A log tree is created by a policy for exactly one run. Child scopes made
//! with [`Log::at`] carry the concatenated path prefix of their ancestors and
//! share the root collector, so every recorded error lands in one ordered
//! sequence with its full dotted path already resolved.

use crate::core::error::{Halt, ValidationError};
use parking_lot::Mutex;
use std::sync::Arc;

/// How the root of a log tree reacts to errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    /// Stop the whole run after the first error.
    FailFast,
    /// Record errors and keep going.
    CollectAll,
}

/// Root collector shared by every scope of one run.
#[derive(Debug)]
struct Collector {
    policy: Policy,
    errors: Mutex<Vec<ValidationError>>,
}

/// A scope in the error log.
///
/// Cloning is cheap and yields a handle to the same scope.
#[derive(Debug, Clone)]
pub struct Log {
    collector: Arc<Collector>,
    path: String,
}

impl Log {
    /// Create the root scope of a new run.
    pub fn root(policy: Policy) -> Self {
        Self {
            collector: Arc::new(Collector {
                policy,
                errors: Mutex::new(Vec::new()),
            }),
            path: String::new(),
        }
    }

    /// Create a child scope whose errors are prefixed with `path`.
    ///
    /// `path` is relative and is appended verbatim, e.g. `log.at(".nested")`.
    pub fn at(&self, path: &str) -> Log {
        let mut full = String::with_capacity(self.path.len() + path.len());
        full.push_str(&self.path);
        full.push_str(path);
        Log {
            collector: Arc::clone(&self.collector),
            path: full,
        }
    }

    /// Full path prefix of this scope.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Policy of the run this scope belongs to.
    pub fn policy(&self) -> Policy {
        self.collector.policy
    }

    /// Record an error at this scope.
    ///
    /// Returns `Err(Halt)` when the run is fail-fast; checks must propagate
    /// it with `?` so nothing else runs.
    pub fn error(&self, message: impl Into<String>) -> Result<(), Halt> {
        self.error_with(ValidationError::new(message))
    }

    /// Record a fully described error. Its `path` is relative to this scope.
    pub fn error_with(&self, mut error: ValidationError) -> Result<(), Halt> {
        error.path.insert_str(0, &self.path);
        log::debug!("validation error at '{}': {}", error.path, error.message);
        self.collector.errors.lock().push(error);

        match self.collector.policy {
            Policy::FailFast => Err(Halt(())),
            Policy::CollectAll => Ok(()),
        }
    }

    /// Number of errors recorded so far in this run.
    pub fn error_count(&self) -> usize {
        self.collector.errors.lock().len()
    }

    /// Copy of the first recorded error, if any.
    pub fn first_error(&self) -> Option<ValidationError> {
        self.collector.errors.lock().first().cloned()
    }

    /// Take every recorded error, leaving the collector empty.
    pub fn take_errors(&self) -> Vec<ValidationError> {
        std::mem::take(&mut *self.collector.errors.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_paths_concatenate() {
        let root = Log::root(Policy::CollectAll);
        let nested = root.at(".nested");
        let leaf = nested.at(".a");

        assert_eq!(leaf.path(), ".nested.a");
        leaf.error("Not a number").unwrap();
        nested
            .error_with(ValidationError::new("required, but not given").with_path(".b"))
            .unwrap();

        let errors = root.take_errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].path, ".nested.a");
        assert_eq!(errors[1].path, ".nested.b");
    }

    #[test]
    fn test_fail_fast_halts() {
        let root = Log::root(Policy::FailFast);
        assert_eq!(root.at(".x").error("boom"), Err(Halt(())));
        assert_eq!(root.error_count(), 1);
        assert_eq!(root.first_error().unwrap().path, ".x");
    }

    #[test]
    fn test_collect_all_continues() {
        let root = Log::root(Policy::CollectAll);
        assert!(root.error("a").is_ok());
        assert!(root.error("b").is_ok());
        assert_eq!(root.error_count(), 2);
        assert_eq!(root.policy(), Policy::CollectAll);
    }

    #[test]
    fn test_extra_fields_are_kept() {
        let root = Log::root(Policy::CollectAll);
        root.error_with(ValidationError::new("Too long").with_field("max", 5))
            .unwrap();
        let errors = root.take_errors();
        assert_eq!(errors[0].path, "");
        assert!(errors[0].field("max").is_some());
        assert_eq!(root.error_count(), 0);
    }
}
