//! Built-in validators and leaf types.
//!
//! This module contains the validators every default registry ships with:
//! `type`, `schema` and `required`, plus the `string`, `number`, `date`,
//! `object`, `array` and `boolean` leaf types.

pub mod schema;
pub mod types;

use crate::validators::registry::Registry;

/// Register all built-in validators and types.
pub fn register_all(registry: &mut Registry) {
    types::register(registry);
    schema::register(registry);
}

// Re-export for direct access
pub use schema::{FieldKind, SchemaField, REQUIRED_MESSAGE};
