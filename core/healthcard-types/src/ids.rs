//! Identifier types used throughout the health card client.
//!
//! Record ids are server-assigned integers. They arrive as JSON numbers from
//! the REST endpoints but as strings from form fields and data attributes, so
//! deserialization accepts both.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-assigned identifier of a record within its module's collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Wraps a raw server id.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn get(&self) -> i64 {
        self.0
    }

    /// Parses a record id from a string, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, crate::Error> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| crate::Error::InvalidId(s.to_string()))
    }
}

impl From<i64> for RecordId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Self(n)),
            Raw::Text(s) => Self::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

/// Monotonic token stamped on every load a synchronizer issues.
///
/// A load result is applied only while its generation is still the latest
/// one issued; anything older is stale and gets dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadGeneration(u64);

impl LoadGeneration {
    /// The generation before any load was issued.
    pub const ZERO: Self = Self(0);

    /// Returns the generation following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns the raw counter.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Whether a result stamped with `self` may still be applied when
    /// `latest` is the newest generation issued.
    #[must_use]
    pub fn is_current(&self, latest: LoadGeneration) -> bool {
        *self == latest
    }
}

impl From<u64> for LoadGeneration {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for LoadGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen-{}", self.0)
    }
}
