//! Leaf type checkers and the `type` validator.
//!
//! Each checker either returns the (possibly coerced) value or records an
//! error and returns null.

use crate::core::error::{CheckResult, SpecError};
use crate::core::error_log::Log;
use crate::core::types::Value;
use crate::execution::check::CompiledCheck;
use crate::validators::registry::Registry;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::sync::Arc;

/// Register the built-in leaf types and the `type` validator.
pub fn register(registry: &mut Registry) {
    registry.register_type("string", string);
    registry.register_type("number", number);
    registry.register_type("date", date);
    registry.register_type("object", object);
    registry.register_type("array", array);
    registry.register_type("boolean", boolean);
    registry.register("type", type_validator);
}

/// `type`: look up the named leaf checker once, at compile time.
pub fn type_validator(argument: &Value, registry: &Registry) -> Result<CompiledCheck, SpecError> {
    let name = argument
        .as_str()
        .ok_or_else(|| SpecError::invalid_argument("type", "expected a type name"))?;
    let checker = registry
        .type_checker(name)
        .ok_or_else(|| SpecError::UnknownType(name.to_string()))?;

    let checker = Arc::clone(checker);
    Ok(CompiledCheck::from_fn(move |value, log| checker(value, log)))
}

/// Stringify anything that is not already a string.
pub fn string(value: Value, _log: &Log) -> CheckResult {
    match value {
        Value::String(_) => Ok(value),
        other => Ok(Value::String(other.to_string())),
    }
}

/// Coerce to a finite number.
pub fn number(value: Value, log: &Log) -> CheckResult {
    match to_number(&value) {
        Some(n) if n.is_finite() => Ok(Value::Number(n)),
        _ => {
            log.error("Not a number")?;
            Ok(Value::Null)
        }
    }
}

/// Coerce to a date. Numbers are milliseconds since the Unix epoch.
pub fn date(value: Value, log: &Log) -> CheckResult {
    let parsed = match &value {
        Value::Date(_) => return Ok(value),
        Value::Number(millis) => Value::date_from_millis(*millis),
        Value::String(s) => parse_date(s).map(Value::Date),
        _ => None,
    };

    match parsed {
        Some(date) => Ok(date),
        None => {
            log.error("Not a date")?;
            Ok(Value::Null)
        }
    }
}

/// Accept objects (not arrays).
pub fn object(value: Value, log: &Log) -> CheckResult {
    if let Value::Object(_) = value {
        return Ok(value);
    }
    log.error("Not an object")?;
    Ok(Value::Null)
}

/// Accept arrays. Elements are not inspected.
pub fn array(value: Value, log: &Log) -> CheckResult {
    if let Value::Array(_) = value {
        return Ok(value);
    }
    log.error("Not an array")?;
    Ok(Value::Null)
}

/// Accept booleans and the strings `"true"` / `"false"`.
pub fn boolean(value: Value, log: &Log) -> CheckResult {
    match &value {
        Value::Bool(_) => Ok(value),
        Value::String(s) if s == "true" => Ok(Value::Bool(true)),
        Value::String(s) if s == "false" => Ok(Value::Bool(false)),
        _ => {
            log.error("Not a boolean")?;
            Ok(Value::Null)
        }
    }
}

fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => parse_number(s),
        Value::Date(d) => Some(d.timestamp_millis() as f64),
        _ => None,
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0.0);
    }

    let radix = match text.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &text[2..];
        if digits.starts_with(['+', '-']) {
            return None;
        }
        return u64::from_str_radix(digits, radix).ok().map(|n| n as f64);
    }

    // Rust also parses "inf"/"nan" spellings; those are rejected as non-finite.
    text.parse::<f64>().ok()
}

fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error_log::Policy;
    use chrono::{Datelike, TimeZone};
    use serde_json::json;

    fn collect() -> Log {
        Log::root(Policy::CollectAll)
    }

    #[test]
    fn test_string_coercion() {
        let log = collect();
        assert_eq!(string(Value::from("a"), &log), Ok(Value::from("a")));
        assert_eq!(string(Value::Number(20.0), &log), Ok(Value::from("20")));
        assert_eq!(string(Value::Bool(false), &log), Ok(Value::from("false")));
        assert_eq!(log.error_count(), 0);
    }

    #[test]
    fn test_number_coercion() {
        let log = collect();
        assert_eq!(number(Value::Number(1.5), &log), Ok(Value::Number(1.5)));
        assert_eq!(number(Value::from(" 42 "), &log), Ok(Value::Number(42.0)));
        assert_eq!(number(Value::from("0x10"), &log), Ok(Value::Number(16.0)));
        assert_eq!(number(Value::from(""), &log), Ok(Value::Number(0.0)));
        assert_eq!(number(Value::Bool(true), &log), Ok(Value::Number(1.0)));
        assert_eq!(log.error_count(), 0);
    }

    #[test]
    fn test_number_rejects_garbage() {
        let log = collect();
        assert_eq!(number(Value::from("foo"), &log), Ok(Value::Null));
        assert_eq!(number(Value::from("Infinity"), &log), Ok(Value::Null));
        assert_eq!(number(Value::from(json!({"a": 1})), &log), Ok(Value::Null));
        assert_eq!(number(Value::from("0x+5"), &log), Ok(Value::Null));
        assert_eq!(number(Value::from("0b-1"), &log), Ok(Value::Null));
        let errors = log.take_errors();
        assert_eq!(errors.len(), 5);
        assert!(errors.iter().all(|e| e.message == "Not a number"));
    }

    #[test]
    fn test_number_is_idempotent() {
        let log = collect();
        let once = number(Value::from("12.5"), &log).unwrap();
        assert_eq!(number(once.clone(), &log), Ok(once));
    }

    #[test]
    fn test_date_coercion() {
        let log = collect();
        let epoch = date(Value::Number(0.0), &log).unwrap();
        assert_eq!(epoch.as_date().unwrap().timestamp(), 0);

        let parsed = date(Value::from("2024-03-01T12:00:00Z"), &log).unwrap();
        assert_eq!(parsed.as_date().unwrap(), Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());

        let day = date(Value::from("2024-03-01"), &log).unwrap();
        assert_eq!(day.as_date().unwrap().day(), 1);

        assert_eq!(date(parsed.clone(), &log), Ok(parsed));
        assert_eq!(log.error_count(), 0);

        assert_eq!(date(Value::from("yesterday"), &log), Ok(Value::Null));
        assert_eq!(date(Value::Bool(true), &log), Ok(Value::Null));
        assert_eq!(log.error_count(), 2);
    }

    #[test]
    fn test_object_and_array() {
        let log = collect();
        let obj = Value::from(json!({"a": 1}));
        let arr = Value::from(json!([1, 2]));

        assert_eq!(object(obj.clone(), &log), Ok(obj.clone()));
        assert_eq!(array(arr.clone(), &log), Ok(arr.clone()));
        assert_eq!(log.error_count(), 0);

        assert_eq!(object(arr, &log), Ok(Value::Null));
        assert_eq!(array(obj, &log), Ok(Value::Null));
        let messages: Vec<String> = log.take_errors().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["Not an object", "Not an array"]);
    }

    #[test]
    fn test_boolean() {
        let log = collect();
        assert_eq!(boolean(Value::Bool(true), &log), Ok(Value::Bool(true)));
        assert_eq!(boolean(Value::from("false"), &log), Ok(Value::Bool(false)));
        assert_eq!(boolean(Value::Number(1.0), &log), Ok(Value::Null));
        assert_eq!(log.error_count(), 1);
    }

    #[test]
    fn test_failure_halts_under_fail_fast() {
        let log = Log::root(Policy::FailFast);
        assert!(number(Value::from("nope"), &log).is_err());
    }

    #[test]
    fn test_unknown_type_is_a_spec_error() {
        let registry = Registry::with_builtins();
        let err = type_validator(&Value::from("uuid"), &registry).unwrap_err();
        assert_eq!(err, SpecError::UnknownType("uuid".to_string()));

        let err = type_validator(&Value::Number(1.0), &registry).unwrap_err();
        assert!(matches!(err, SpecError::InvalidArgument { .. }));
    }
}
