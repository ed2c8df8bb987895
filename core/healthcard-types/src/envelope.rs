//! The response envelope every health card endpoint wraps its payload in.
//!
//! Application-level outcome is carried in the body (`success` plus an
//! optional human-readable `message`), independent of the HTTP status. The
//! payload itself sits next to those keys under a module-specific name
//! (`allergies`, `records`, `stats`, ...), so it is kept as a raw map and
//! pulled out by key.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A decoded `{success, message?, error?, ...}` response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Application-level outcome. Absent is treated as failure.
    #[serde(default)]
    pub success: bool,
    /// Human-readable message, usually present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Some endpoints report failures under `error` instead of `message`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Every other key of the body.
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl Envelope {
    /// Builds a successful envelope around the given body keys.
    pub fn ok(body: Map<String, Value>) -> Self {
        Self {
            success: true,
            message: None,
            error: None,
            body,
        }
    }

    /// Builds a failed envelope carrying `message`.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            error: None,
            body: Map::new(),
        }
    }

    /// Decodes an envelope from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> crate::Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// The server-supplied failure text: `message`, else `error`.
    pub fn failure_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .or_else(|| self.error.as_deref().filter(|e| !e.is_empty()))
    }

    /// Like [`failure_message`](Self::failure_message) with a fallback.
    pub fn failure_message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.failure_message().unwrap_or(fallback)
    }

    /// Returns the raw value stored under `key`, if any.
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    /// Decodes the array stored under `key`.
    ///
    /// A missing or `null` key is an empty collection.
    pub fn collection<T: DeserializeOwned>(&self, key: &str) -> crate::Result<Vec<T>> {
        match self.body.get(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => {
                serde_json::from_value(value.clone()).map_err(|source| crate::Error::FieldShape {
                    key: key.to_string(),
                    source,
                })
            }
        }
    }

    /// Decodes the optional object stored under `key`.
    pub fn field<T: DeserializeOwned>(&self, key: &str) -> crate::Result<Option<T>> {
        match self.body.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|source| crate::Error::FieldShape {
                    key: key.to_string(),
                    source,
                }),
        }
    }
}
