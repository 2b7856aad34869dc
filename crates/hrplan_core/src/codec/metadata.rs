//! YAML front matter (de)serialization.
//!
//! Uses `serde_yaml`; field coercion lives in `model::wire` so one malformed
//! scalar does not discard the whole block.

use crate::model::wire::{self, scalar_to_string};
use crate::model::{Member, Month, PlanDocument, Theme};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

/// Metadata as read from a document, before defaulting.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawMetadata {
    #[serde(default, deserialize_with = "optional_scalar")]
    pub period: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar_list")]
    pub months: Option<Vec<Month>>,
    #[serde(default)]
    pub themes: Option<Vec<Theme>>,
    #[serde(default)]
    pub members: Option<Vec<Member>>,
    /// Keys under `totals` except the derived `results`, which is recomputed.
    #[serde(default, rename = "totals", deserialize_with = "totals_without_results")]
    pub totals_extra: IndexMap<String, Value>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

const RESULTS_KEY: &str = "results";

#[derive(Serialize)]
struct WireMetadata<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    period: Option<&'a str>,
    months: &'a [Month],
    themes: &'a [Theme],
    members: &'a [Member],
    totals: WireTotals<'a>,
    #[serde(flatten)]
    extra: &'a IndexMap<String, Value>,
}

#[derive(Serialize)]
struct WireTotals<'a> {
    results: IndexMap<&'a str, WireNumber>,
    #[serde(flatten)]
    extra: IndexMap<&'a str, &'a Value>,
}

#[derive(Serialize)]
struct WireNumber(#[serde(serialize_with = "wire::number")] f64);

/// Parses a front matter block.
///
/// Empty text or an explicit YAML `null` yields empty metadata.
///
/// # Errors
/// - Returns the YAML error for invalid syntax or a non-mapping document.
pub fn decode_metadata(text: &str) -> Result<RawMetadata, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(RawMetadata::default());
    }
    let value: Value = serde_yaml::from_str(text)?;
    if value.is_null() {
        return Ok(RawMetadata::default());
    }
    serde_yaml::from_value(value)
}

/// Serializes document metadata, including the current totals cache.
///
/// # Errors
/// - Returns the YAML error if serialization fails.
pub fn encode_metadata(doc: &PlanDocument) -> Result<String, serde_yaml::Error> {
    let wire = WireMetadata {
        period: doc.period.as_deref(),
        months: &doc.months,
        themes: &doc.themes,
        members: &doc.members,
        totals: WireTotals {
            results: doc
                .totals
                .iter()
                .map(|(month, total)| (month.as_str(), WireNumber(*total)))
                .collect(),
            extra: doc
                .totals_extra
                .iter()
                .filter(|(key, _)| key.as_str() != RESULTS_KEY)
                .map(|(key, value)| (key.as_str(), value))
                .collect(),
        },
        extra: &doc.extra_metadata,
    };
    serde_yaml::to_string(&wire)
}

fn optional_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value))
}

fn optional_scalar_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(None),
        Value::Sequence(items) => Ok(Some(items.iter().filter_map(scalar_to_string).collect())),
        other => Err(serde::de::Error::custom(format!(
            "expected a list of months, got {}",
            value_kind(&other)
        ))),
    }
}

fn totals_without_results<'de, D>(deserializer: D) -> Result<IndexMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Mapping(mapping) = value else {
        return Ok(IndexMap::new());
    };
    Ok(mapping
        .into_iter()
        .filter_map(|(key, value)| scalar_to_string(&key).map(|key| (key, value)))
        .filter(|(key, _)| key != RESULTS_KEY)
        .collect())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
