//! # Datacheck - Declarative Data Validation
//!
//! Datacheck validates and sanitizes plain data (request bodies, config
//! files, anything shaped like JSON) against a declarative spec. A spec is
//! compiled once into a reusable check; running the check either returns the
//! coerced value or structured, path-annotated errors.
//!
//! ## Features
//!
//! - **Compiled specs**: Validators are resolved once, at compile time; unknown
//!   validators are reported immediately as [`SpecError`]s
//! - **Two policies**: [`ok`] stops at the first error, [`all`] collects them
//! - **Nested schemas**: Required, defaulted and optional fields with dotted
//!   error paths like `.nested.a`
//! - **Async checks**: Any validator may suspend; checks still run in declared order
//! - **Extensible**: Register custom validators and leaf types on a [`Registry`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use datacheck::prelude::*;
//! use serde_json::json;
//!
//! let check = DEFAULT_REGISTRY.compile_value(&Value::from(json!({
//!     "schema": {
//!         "id": { "type": "number", "required": true },
//!         "name": { "type": "string" },
//!         "limit": { "type": "number", "def": 10 }
//!     }
//! })))?;
//!
//! let clean = ok_blocking(Value::from(json!({"id": "7", "name": 42})), &check)?;
//! assert_eq!(clean, Value::from(json!({"id": 7, "limit": 10, "name": "42"})));
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`core`]: Values, specs, the error log and error types
//! - [`execution`]: The spec compiler and the `ok` / `all` policies
//! - [`validators`]: The validator registry and built-in validators
//!
//! ## Custom Validators
//!
//! A validator is a factory: it receives its spec argument and the registry,
//! and returns a [`CompiledCheck`]:
//!
//! ```rust,ignore
//! use datacheck::prelude::*;
//!
//! let registry = RegistryBuilder::new()
//!     .register("min_len", |argument, _registry| {
//!         let min = argument
//!             .as_f64()
//!             .ok_or_else(|| SpecError::invalid_argument("min_len", "expected a number"))?;
//!         Ok(CompiledCheck::from_fn(move |value, log| {
//!             if value.as_str().map_or(0, |s| s.chars().count()) < min as usize {
//!                 log.error_with(ValidationError::new("Too short").with_field("min", min))?;
//!             }
//!             Ok(value)
//!         }))
//!     })
//!     .build();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod execution;
pub mod validators;

pub use crate::core::error::{SpecError, ValidationError, ValidationErrors};
pub use crate::execution::check::CompiledCheck;
pub use crate::execution::compiler::{compile, compile_value};
pub use crate::execution::policy::{all, all_blocking, ok, ok_blocking};
pub use crate::validators::registry::{Registry, DEFAULT_REGISTRY};

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use datacheck::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::spec::Spec;
    pub use crate::core::types::{Map, Value, ValueKind};

    // Log
    pub use crate::core::error_log::{Log, Policy};

    // Errors
    pub use crate::core::error::{
        CheckResult, DatacheckError, Halt, SpecError, SpecResult, ValidationError,
        ValidationErrors,
    };

    // Execution
    pub use crate::execution::check::{CheckFuture, CompiledCheck};
    pub use crate::execution::compiler::{compile, compile_value};
    pub use crate::execution::policy::{all, all_blocking, ok, ok_blocking};

    // Validators
    pub use crate::validators::builtin::{FieldKind, SchemaField};
    pub use crate::validators::registry::{
        Registry, RegistryBuilder, TypeChecker, ValidatorFactory, DEFAULT_REGISTRY,
    };
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
