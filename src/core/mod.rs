//! Core types for the datacheck validation engine.
//!
//! This module contains the foundational pieces every check works with:
//! - The plain data value type
//! - Declarative specs
//! - The path-scoped error log
//! - Error types

pub mod error;
pub mod error_log;
pub mod spec;
pub mod types;

// Re-export commonly used types
pub use error::{
    CheckResult, DatacheckError, Halt, SpecError, SpecResult, ValidationError, ValidationErrors,
};
pub use error_log::{Log, Policy};
pub use spec::Spec;
pub use types::{Map, Value, ValueKind};
