//! Error types for datacheck.
//!
//! Uses thiserror for structured errors with context. There are two
//! families that must never be confused:
//! - [`SpecError`]: a malformed spec, raised synchronously at compile time
//! - [`ValidationError`] / [`ValidationErrors`]: problems with the data,
//!   collected through the [`Log`](crate::core::error_log::Log) during a run

use crate::core::types::{Map, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Top-level error type for datacheck.
///
/// This enum encompasses all error categories and enables automatic
/// conversion between specific error types.
#[derive(Error, Debug)]
pub enum DatacheckError {
    /// The spec failed to compile.
    #[error("Spec error: {0}")]
    Spec(#[from] SpecError),

    /// First error of a fail-fast run.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Every error of a collect-all run.
    #[error("{0}")]
    Validations(#[from] ValidationErrors),

    /// Reading a spec or value failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON text could not be parsed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration errors found while compiling a spec.
///
/// These are programmer mistakes, not data problems, and never pass
/// through the validation log.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpecError {
    /// A spec key names no registered validator.
    #[error("Unknown validator {0}")]
    UnknownValidator(String),

    /// A `type` argument names no registered leaf type.
    #[error("Unknown type {0}")]
    UnknownType(String),

    /// A validator rejected its spec argument.
    #[error("Invalid argument for validator '{validator}': {reason}")]
    InvalidArgument {
        /// Validator key the argument belongs to.
        validator: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The spec itself is malformed (not an object, bad `nullable`).
    #[error("Invalid spec: {0}")]
    InvalidSpec(String),
}

impl SpecError {
    /// Shorthand for an [`SpecError::InvalidArgument`].
    pub fn invalid_argument(validator: impl Into<String>, reason: impl Into<String>) -> Self {
        SpecError::InvalidArgument {
            validator: validator.into(),
            reason: reason.into(),
        }
    }
}

/// Short-circuit signal for fail-fast runs.
///
/// Only [`Log`](crate::core::error_log::Log) hands these out, right after
/// recording the error that caused them. Every composing layer propagates
/// it with `?` until the policy boundary catches it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Validation halted")]
pub struct Halt(pub(crate) ());

/// Result of running a single check.
pub type CheckResult = Result<Value, Halt>;

/// Result type alias for compile-time operations.
pub type SpecResult<T> = Result<T, SpecError>;

// ============================================================================
// Validation Errors
// ============================================================================

/// Keys that `extra` may never hold, since they would shadow the named fields.
pub const RESERVED_FIELDS: [&str; 2] = ["message", "path"];

/// A single problem found in the data.
///
/// `path` is the dotted location of the offending value (e.g. `.nested.a`,
/// empty for the root). Extra fields supplied by checks are flattened next to
/// `message` and `path` when serialized.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Human-readable description.
    pub message: String,
    /// Dotted path of the value, resolved when the error was recorded.
    #[serde(default)]
    pub path: String,
    /// Additional check-specific details.
    #[serde(flatten)]
    pub extra: Map,
}

impl ValidationError {
    /// Create an error at the current path.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: String::new(),
            extra: Map::new(),
        }
    }

    /// Set the path relative to the node the error is reported on.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Attach an extra detail field.
    ///
    /// `message` and `path` are reserved; attempts to set them are ignored.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if RESERVED_FIELDS.contains(&key.as_str()) {
            log::warn!("ignoring reserved error field '{}'", key);
            return self;
        }
        self.extra.insert(key, value.into());
        self
    }

    /// Look up an extra detail field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Every problem found by a collect-all run, in the order recorded.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("Validation errors")]
pub struct ValidationErrors {
    /// Errors in execution order.
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Wrap a list of errors.
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether there are no errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate over the errors.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// Get the paths of all errors, in order.
    pub fn paths(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.path.as_str()).collect()
    }

    /// Get detailed error messages, one per line.
    pub fn detailed_errors(&self) -> Vec<String> {
        self.errors
            .iter()
            .enumerate()
            .map(|(i, error)| format!("{}. {}", i + 1, error))
            .collect()
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
