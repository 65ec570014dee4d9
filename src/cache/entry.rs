//! On-disk cache entry format.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::cache::expiry;

/// Disjoint storage trees inside a segment.
///
/// An entry written to one partition is never visible through the other,
/// even when both were derived from the same query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Partition {
    /// Entries only reachable by exact key (`-` on disk).
    #[default]
    Exact,
    /// Entries that also take part in similarity search (`+` on disk).
    Semantic,
}

impl Partition {
    /// Partition selected by an `is_semantic` flag.
    pub fn from_semantic(is_semantic: bool) -> Self {
        if is_semantic { Self::Semantic } else { Self::Exact }
    }

    /// Directory name of the partition.
    pub fn sign(&self) -> &'static str {
        match self {
            Self::Exact => "-",
            Self::Semantic => "+",
        }
    }

    /// Metric label value.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Semantic => "semantic",
        }
    }

    pub fn is_semantic(&self) -> bool {
        matches!(self, Self::Semantic)
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// One cached query→response pair; exactly one file per entry.
///
/// Serialized as
/// `{"query": ..., "response": ..., "stored": <epoch ms>, "ttl": <ms>, "isSemantic": true}`
/// where `isSemantic` is only written when true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Original query text, case preserved.
    pub query: String,
    /// Opaque cached value.
    pub response: serde_json::Value,
    /// Capture time, milliseconds since the Unix epoch.
    pub stored: i64,
    /// Lifetime in milliseconds; negative means the entry never expires.
    pub ttl: i64,
    #[serde(rename = "isSemantic", default, skip_serializing_if = "is_false")]
    pub is_semantic: bool,
}

impl CacheEntry {
    /// Whether the entry's TTL has elapsed at `now` (epoch ms).
    pub fn is_expired(&self, now: i64) -> bool {
        expiry::is_expired(self, now)
    }

    /// Deserialize the cached response into a concrete type.
    pub fn response_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.response.clone())?)
    }

    /// Partition the entry was written to.
    pub fn partition(&self) -> Partition {
        Partition::from_semantic(self.is_semantic)
    }
}
