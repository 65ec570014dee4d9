//! Query → key → path mapping.
//!
//! Keys are the hex SHA-256 digest of the lower-cased query text, so case
//! variants of one query collapse onto a single entry. Entry files live at
//!
//! ```text
//! <base>/<segment>/<sign>/<k[0]>/<k[0..2]>/<k[0..3]>/<key>.json
//! ```
//!
//! where `<sign>` is `+` for the semantic partition and `-` for the exact
//! one. The three fan-out levels bound how many files share a directory.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::cache::entry::Partition;
use crate::{MimirError, Result};

/// File extension of entry files.
pub const ENTRY_EXTENSION: &str = "json";

/// Hex digest identifying one query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for `query`. Case-insensitive.
    pub fn from_query(query: &str) -> Self {
        let digest = Sha256::digest(query.to_lowercase().as_bytes());
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The three fan-out directory names: first 1, 2 and 3 hex characters.
    pub fn shards(&self) -> [&str; 3] {
        [&self.0[..1], &self.0[..2], &self.0[..3]]
    }

    /// File name of the entry: `<key>.json`.
    pub fn file_name(&self) -> String {
        format!("{}.{ENTRY_EXTENSION}", self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where an entry lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLocation {
    pub key: CacheKey,
    pub path: PathBuf,
}

/// Pure mapping from (segment, partition, query) to entry paths under a base directory.
#[derive(Debug, Clone)]
pub struct KeyPathMapper {
    base: PathBuf,
}

impl KeyPathMapper {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// `<base>/<segment>`
    pub fn segment_root(&self, segment: &str) -> PathBuf {
        self.base.join(segment)
    }

    /// `<base>/<segment>/<sign>`
    pub fn partition_root(&self, segment: &str, partition: Partition) -> PathBuf {
        self.segment_root(segment).join(partition.sign())
    }

    /// Locate the entry file for `query`.
    ///
    /// Returns `None` for an empty query, which has no key. No I/O.
    pub fn locate(&self, segment: &str, partition: Partition, query: &str) -> Option<EntryLocation> {
        if query.is_empty() {
            return None;
        }
        let key = CacheKey::from_query(query);
        let [one, two, three] = key.shards();
        let path = self
            .partition_root(segment, partition)
            .join(one)
            .join(two)
            .join(three)
            .join(key.file_name());
        Some(EntryLocation { key, path })
    }
}

/// Key of an entry file, taken from its file stem.
pub(crate) fn key_from_path(path: &Path) -> Option<String> {
    path.file_stem().and_then(OsStr::to_str).map(str::to_string)
}

/// Reject segment names that are not exactly one normal path component.
pub(crate) fn validate_segment(segment: &str) -> Result<()> {
    let mut components = Path::new(segment).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(c)), None) if c == OsStr::new(segment) => Ok(()),
        _ => Err(MimirError::InvalidSegment(segment.to_string())),
    }
}
