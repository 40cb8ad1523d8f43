//! Declarative spec describing how one value is validated.
//!
//! A spec is an explicit ordered list of `(validator, argument)` entries plus
//! the two reserved cross-cutting keys, `nullable` and `def`. Entry order is
//! execution order.

use crate::core::error::{SpecError, SpecResult};
use crate::core::types::{Map, Value};

/// Reserved key allowing null input to pass through unchanged.
pub const NULLABLE_KEY: &str = "nullable";
/// Reserved key holding the default substituted for null input.
pub const DEFAULT_KEY: &str = "def";

/// Validation spec for a single value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Spec {
    entries: Vec<(String, Value)>,
    nullable: bool,
    default: Option<Value>,
}

impl Spec {
    /// Create an empty spec (accepts any non-null value).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a spec from an object value.
    ///
    /// Keys are kept in the object's order. `nullable` must be a boolean;
    /// a null `def` is the same as no default.
    pub fn from_value(value: &Value) -> SpecResult<Self> {
        let map = value.as_object().ok_or_else(|| {
            SpecError::InvalidSpec(format!("expected an object, got {}", value.kind()))
        })?;
        Self::from_map(map)
    }

    /// Parse a spec from an ordered map.
    pub fn from_map(map: &Map) -> SpecResult<Self> {
        let mut spec = Spec::new();
        for (key, argument) in map {
            match key.as_str() {
                NULLABLE_KEY => {
                    spec.nullable = match argument {
                        Value::Null => false,
                        Value::Bool(b) => *b,
                        other => {
                            return Err(SpecError::InvalidSpec(format!(
                                "'{}' must be a boolean, got {}",
                                NULLABLE_KEY,
                                other.kind()
                            )))
                        }
                    };
                }
                DEFAULT_KEY => {
                    spec.default = (!argument.is_null()).then(|| argument.clone());
                }
                _ => spec.entries.push((key.clone(), argument.clone())),
            }
        }
        Ok(spec)
    }

    /// Parse a spec from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, crate::core::error::DatacheckError> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Ok(Self::from_value(&Value::from(json))?)
    }

    /// Append a validator entry.
    pub fn with(mut self, validator: impl Into<String>, argument: impl Into<Value>) -> Self {
        self.entries.push((validator.into(), argument.into()));
        self
    }

    /// Shorthand for `with("type", name)`.
    pub fn of_type(self, name: &str) -> Self {
        self.with("type", name)
    }

    /// Shorthand for `with("required", true)`.
    pub fn required(self) -> Self {
        self.with("required", true)
    }

    /// Allow null input to pass through unchanged.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Substitute `default` for null input.
    pub fn def(mut self, default: impl Into<Value>) -> Self {
        let default = default.into();
        self.default = (!default.is_null()).then_some(default);
        self
    }

    /// Validator entries in declared order.
    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    /// Argument of the first entry named `validator`.
    pub fn argument(&self, validator: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == validator)
            .map(|(_, argument)| argument)
    }

    /// Whether null input passes through unchanged.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Default substituted for null input.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether the spec marks its value as required (truthy `required`).
    pub fn is_required(&self) -> bool {
        self.argument("required").map_or(false, Value::is_truthy)
    }

    /// Convert back into an object value, reserved keys last.
    pub fn to_value(&self) -> Value {
        let mut map: Map = self.entries.iter().cloned().collect();
        if self.nullable {
            map.insert(NULLABLE_KEY.to_string(), Value::Bool(true));
        }
        if let Some(default) = &self.default {
            map.insert(DEFAULT_KEY.to_string(), default.clone());
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_splits_reserved_keys() {
        let spec = Spec::from_value(&Value::from(json!({
            "type": "number",
            "nullable": true,
            "required": true,
            "def": 3
        })))
        .unwrap();

        let names: Vec<&str> = spec.entries().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["type", "required"]);
        assert!(spec.is_nullable());
        assert!(spec.is_required());
        assert_eq!(spec.default_value(), Some(&Value::Number(3.0)));
    }

    #[test]
    fn test_null_default_is_absent() {
        let spec = Spec::from_value(&Value::from(json!({"type": "string", "def": null}))).unwrap();
        assert!(spec.default_value().is_none());
        assert!(Spec::new().def(Value::Null).default_value().is_none());
    }

    #[test]
    fn test_rejects_non_object() {
        let err = Spec::from_value(&Value::from("number")).unwrap_err();
        assert!(matches!(err, SpecError::InvalidSpec(_)));
    }

    #[test]
    fn test_rejects_non_boolean_nullable() {
        let err = Spec::from_value(&Value::from(json!({"nullable": "yes"}))).unwrap_err();
        assert!(err.to_string().contains("nullable"));
    }

    #[test]
    fn test_builder_matches_parsed() {
        let built = Spec::new().of_type("number").required().def(10);
        let parsed =
            Spec::from_value(&Value::from(json!({"type": "number", "required": true, "def": 10})))
                .unwrap();
        assert_eq!(built, parsed);
        assert_eq!(Spec::from_value(&built.to_value()).unwrap(), built);
    }

    #[test]
    fn test_from_json_str() {
        let spec = Spec::from_json_str(r#"{"type": "date", "nullable": false}"#).unwrap();
        assert_eq!(spec.argument("type"), Some(&Value::from("date")));
        assert!(Spec::from_json_str("not json").is_err());
    }
}
