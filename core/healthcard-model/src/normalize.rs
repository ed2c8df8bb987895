//! Field lookup over a raw record object.
//!
//! The server is inconsistent about key casing and value types for the same
//! logical field, so each entity reads its fields through [`WireFields`],
//! naming every key variant it accepts in priority order. A variant that is
//! absent, `null` or an empty string falls through to the next one.

use crate::error::{ModelError, ModelResult};
use healthcard_types::RecordId;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub(crate) struct WireFields {
    map: Map<String, Value>,
}

impl WireFields {
    pub(crate) fn new(map: Map<String, Value>) -> Self {
        Self { map }
    }

    fn first(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|k| self.map.get(*k))
            .find(|v| !is_empty(v))
    }

    /// The record id. Required on every entity.
    pub(crate) fn id(&self) -> ModelResult<RecordId> {
        let value = self.first(&["id"]).ok_or(ModelError::MissingField("id"))?;
        Ok(serde_json::from_value(value.clone())?)
    }

    /// A scalar rendered as text. Numbers and booleans are stringified.
    pub(crate) fn text(&self, keys: &[&str]) -> Option<String> {
        self.first(keys).and_then(scalar_text)
    }

    /// A non-negative count from a number or numeric string; anything else
    /// is zero.
    pub(crate) fn count(&self, keys: &[&str]) -> u64 {
        match self.first(keys) {
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
                .unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    /// A boolean, also accepting `"true"`/`"false"`, `1`/`0` and `"yes"`/`"no"`.
    pub(crate) fn flag(&self, keys: &[&str]) -> Option<bool> {
        match self.first(keys)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_i64().map(|n| n != 0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Some(true),
                "false" | "0" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// An array of strings. A single comma-separated string is split.
    pub(crate) fn strings(&self, keys: &[&str]) -> Vec<String> {
        match self.first(keys) {
            Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
            Some(Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// A nested structure, accepted either as JSON or as a string holding JSON.
    ///
    /// A string that does not parse as `T` is dropped rather than failing the
    /// whole record.
    pub(crate) fn embedded<T: DeserializeOwned>(&self, keys: &[&str]) -> Option<T> {
        match self.first(keys)? {
            Value::String(s) => serde_json::from_str(s).ok(),
            other => serde_json::from_value(other.clone()).ok(),
        }
    }
}

/// `deserialize_with` helper: any scalar as text, anything else as `None`.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .filter(|v| !is_empty(v))
        .and_then(scalar_text))
}

/// `deserialize_with` helper for counters: `null`, negative or unparseable
/// values count as zero, numeric strings are accepted.
pub fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
