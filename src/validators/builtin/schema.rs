//! The `schema` validator: nested object validation.
//!
//! Fields are classified once, at compile time:
//! - **required**: truthy `required`; missing input is an error
//! - **with default**: non-null `def`; missing input takes the default
//!   without running the field's check
//! - **optional**: everything else; checked only when present
//!
//! Undeclared keys are dropped from the output. An error in one field never
//! stops its siblings from being checked.

use crate::core::error::{CheckResult, SpecError, ValidationError};
use crate::core::error_log::Log;
use crate::core::spec::Spec;
use crate::core::types::{Map, Value};
use crate::execution::check::CompiledCheck;
use crate::execution::compiler::compile;
use crate::validators::registry::Registry;
use futures::future::{self, FutureExt};
use std::sync::Arc;

/// Message recorded for a missing required field.
pub const REQUIRED_MESSAGE: &str = "required, but not given";

/// Static classification of a schema field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Must be present and non-null.
    Required,
    /// Replaced by the default when missing.
    WithDefault(Value),
    /// Checked only when present.
    Optional,
}

/// A compiled schema field.
#[derive(Debug, Clone)]
pub struct SchemaField {
    /// Field name in the input object.
    pub name: String,
    /// Classification decided from the field spec.
    pub kind: FieldKind,
    check: CompiledCheck,
}

impl SchemaField {
    /// Compile one field spec and classify it.
    pub fn compile(name: &str, spec: &Spec, registry: &Registry) -> Result<Self, SpecError> {
        let check = compile(spec, registry)?;
        let kind = if spec.is_required() {
            FieldKind::Required
        } else if let Some(default) = spec.default_value() {
            FieldKind::WithDefault(default.clone())
        } else {
            FieldKind::Optional
        };

        Ok(Self {
            name: name.to_string(),
            kind,
            check,
        })
    }

    fn scope(&self) -> String {
        format!(".{}", self.name)
    }
}

/// Register the `schema` and `required` validators.
pub fn register(registry: &mut Registry) {
    registry.register("schema", schema_validator);
    registry.register("required", required_validator);
}

/// `required`: a marker read by `schema`; passes values through unchanged.
pub fn required_validator(_argument: &Value, _registry: &Registry) -> Result<CompiledCheck, SpecError> {
    Ok(CompiledCheck::identity())
}

/// `schema`: compile every field spec of an object argument.
pub fn schema_validator(argument: &Value, registry: &Registry) -> Result<CompiledCheck, SpecError> {
    let fields = argument.as_object().ok_or_else(|| {
        SpecError::invalid_argument(
            "schema",
            format!("expected an object of field specs, got {}", argument.kind()),
        )
    })?;

    let mut compiled = Vec::with_capacity(fields.len());
    for (name, field_spec) in fields {
        let spec = Spec::from_value(field_spec).map_err(|e| {
            SpecError::invalid_argument("schema", format!("field '{}': {}", name, e))
        })?;
        compiled.push(SchemaField::compile(name, &spec, registry)?);
    }

    // Partition once so each run walks the groups in declared order.
    let (required, rest): (Vec<_>, Vec<_>) = compiled
        .into_iter()
        .partition(|f| f.kind == FieldKind::Required);
    let (defaulted, optional): (Vec<_>, Vec<_>) = rest
        .into_iter()
        .partition(|f| matches!(f.kind, FieldKind::WithDefault(_)));

    log::trace!(
        "compiled schema: {} required, {} defaulted, {} optional",
        required.len(),
        defaulted.len(),
        optional.len()
    );

    let schema = Arc::new(Schema {
        required,
        defaulted,
        optional,
    });

    Ok(CompiledCheck::new(move |value, log| {
        let schema = Arc::clone(&schema);
        match value {
            Value::Object(input) => async move { schema.run(input, log).await }.boxed(),
            _ => future::ready(not_an_object(&log)).boxed(),
        }
    }))
}

fn not_an_object(log: &Log) -> CheckResult {
    log.error("Not an object")?;
    Ok(Value::Null)
}

/// Fields grouped by kind, each group in declared order.
struct Schema {
    required: Vec<SchemaField>,
    defaulted: Vec<SchemaField>,
    optional: Vec<SchemaField>,
}

impl Schema {
    async fn run(&self, mut input: Map, log: Log) -> CheckResult {
        let mut output = Map::new();

        for field in &self.required {
            match take_present(&mut input, &field.name) {
                None => {
                    log.error_with(ValidationError::new(REQUIRED_MESSAGE).with_path(field.scope()))?;
                }
                Some(value) => {
                    let checked = field.check.run(value, log.at(&field.scope())).await?;
                    output.insert(field.name.clone(), checked);
                }
            }
        }

        for field in &self.defaulted {
            let default = match &field.kind {
                FieldKind::WithDefault(default) => default,
                _ => continue,
            };
            match take_present(&mut input, &field.name) {
                None => {
                    output.insert(field.name.clone(), default.clone());
                }
                Some(value) => {
                    let checked = field.check.run(value, log.at(&field.scope())).await?;
                    output.insert(field.name.clone(), checked);
                }
            }
        }

        for field in &self.optional {
            // Present-but-null values still run, so non-nullable specs reject them.
            if let Some(value) = input.shift_remove(&field.name) {
                let checked = field.check.run(value, log.at(&field.scope())).await?;
                output.insert(field.name.clone(), checked);
            }
        }

        if !input.is_empty() {
            log::trace!(
                "dropping undeclared keys at '{}': {}",
                log.path(),
                input.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
            );
        }

        Ok(Value::Object(output))
    }
}

/// Remove `key` from `input`, treating null like absence.
fn take_present(input: &mut Map, key: &str) -> Option<Value> {
    input.shift_remove(key).filter(|value| !value.is_null())
}
