//! Cache configuration.
//!
//! A [`CacheConfig`] can be built in code with fluent setters or loaded from
//! a TOML file. Every field is optional in TOML and falls back to its
//! default:
//!
//! ```toml
//! dir = "/var/cache/mimir"
//! segment = "answers"
//! ttl_ms = 3600000           # negative = entries never expire
//! similarity_threshold = 0.85
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cache::expiry::NEVER_EXPIRES;
use crate::{MimirError, Result};

/// Default entry lifetime: one day.
pub const DEFAULT_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Default minimum similarity for a semantic hit.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.9;

/// Configuration for a [`SemanticCache`](crate::SemanticCache).
///
/// ```rust
/// # use mimir::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .dir("/tmp/mimir")
///     .segment("answers")
///     .ttl(Duration::from_secs(3600))
///     .similarity_threshold(0.85);
/// assert_eq!(config.ttl_ms, 3_600_000);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CacheConfig {
    /// Base directory holding every segment. Default: `$MIMIR_CACHE_DIR` or `./cache`.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    /// Segment used by callers that have no namespace of their own. Default: `"default"`.
    #[serde(default = "default_segment")]
    pub segment: String,
    /// Default entry lifetime in milliseconds; negative means never. Default: one day.
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: i64,
    /// Minimum similarity for a semantic hit. Default: 0.9.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,
}

fn default_dir() -> PathBuf {
    std::env::var("MIMIR_CACHE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("cache"))
}

fn default_segment() -> String {
    "default".to_string()
}

fn default_ttl_ms() -> i64 {
    DEFAULT_TTL_MS
}

fn default_similarity_threshold() -> f32 {
    DEFAULT_SIMILARITY_THRESHOLD
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            segment: default_segment(),
            ttl_ms: default_ttl_ms(),
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

impl CacheConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MimirError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MimirError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| MimirError::Configuration(format!("Failed to parse config: {e}")))
    }

    /// Set the base cache directory.
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Set the default segment.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = segment.into();
        self
    }

    /// Set the default entry lifetime.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        self
    }

    /// Make entries written with the default TTL live until removed.
    pub fn never_expire(mut self) -> Self {
        self.ttl_ms = NEVER_EXPIRES;
        self
    }

    /// Set the minimum similarity for a semantic hit.
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Check the values a cache cannot work with.
    pub(crate) fn validate(&self) -> Result<()> {
        if !self.similarity_threshold.is_finite() || !(-1.0..=1.0).contains(&self.similarity_threshold) {
            return Err(MimirError::Configuration(format!(
                "similarity_threshold must be within [-1, 1], got {}",
                self.similarity_threshold
            )));
        }
        crate::cache::key::validate_segment(&self.segment)
    }
}
