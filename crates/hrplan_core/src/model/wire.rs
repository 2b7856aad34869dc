//! Lenient serde adapters for hand-edited metadata.
//!
//! Front matter is edited by people, so scalars arrive as whatever YAML
//! guessed (`name: 2026` is an integer, `price: "3000"` is a string). These
//! adapters coerce instead of failing the whole metadata block.

use crate::numeric::parse_lenient;
use serde::{Deserialize, Deserializer, Serializer};
use serde_yaml::Value;

pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

pub(crate) fn scalar_to_number(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number.as_f64().filter(|n| n.is_finite()).unwrap_or(0.0),
        Value::String(text) => parse_lenient(text),
        Value::Tagged(tagged) => scalar_to_number(&tagged.value),
        _ => 0.0,
    }
}

pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value).unwrap_or_default())
}

pub(crate) fn lenient_rate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_number(&value).max(0.0))
}

/// Writes whole numbers as integers (`3000`, not `3000.0`).
pub(crate) fn number<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.fract() == 0.0 && value.abs() < 1e15 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
