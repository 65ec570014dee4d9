//! Single-entry filesystem operations.
//!
//! "Not found" is never an error here: missing files read as `None`,
//! remove as `false`. Every other I/O failure is returned with the path
//! it happened on. Writes go straight to the target file, so concurrent
//! writers to one key race and the last physical write wins.

use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;
use tracing::debug;

use crate::cache::entry::CacheEntry;
use crate::telemetry;
use crate::{MimirError, Result};

/// Reads, writes and deletes individual entry files.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryStore;

impl EntryStore {
    pub fn new() -> Self {
        Self
    }

    /// Write `entry` to `path`, creating the directory chain and replacing
    /// any previous content.
    pub async fn write(&self, path: &Path, entry: CacheEntry) -> Result<CacheEntry> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| MimirError::io(parent, e))?;
        }
        let json = serde_json::to_vec(&entry)?;
        fs::write(path, json)
            .await
            .map_err(|e| MimirError::io(path, e))?;
        metrics::counter!(
            telemetry::ENTRIES_WRITTEN_TOTAL,
            "partition" => entry.partition().label()
        )
        .increment(1);
        Ok(entry)
    }

    /// Parse the entry at `path` without looking at its TTL.
    ///
    /// `None` if the file does not exist.
    pub async fn load(&self, path: &Path) -> Result<Option<CacheEntry>> {
        let bytes = match fs::read(path).await {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(MimirError::io(path, e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| MimirError::CorruptEntry {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Read a live entry.
    ///
    /// An entry whose TTL has elapsed at `now` is deleted and reported as
    /// `None`, the same as a missing file.
    pub async fn read(&self, path: &Path, now: i64) -> Result<Option<CacheEntry>> {
        match self.load(path).await? {
            Some(entry) if entry.is_expired(now) => {
                self.expire(path, &entry).await?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Delete an entry found to be expired. Returns whether this call deleted it.
    ///
    /// Another reader may have deleted it first; that is not an error.
    pub(crate) async fn expire(&self, path: &Path, entry: &CacheEntry) -> Result<bool> {
        let removed = self.remove(path).await?;
        if removed {
            debug!(path = %path.display(), query = %entry.query, "removed expired entry");
            metrics::counter!(
                telemetry::ENTRIES_EXPIRED_TOTAL,
                "partition" => entry.partition().label()
            )
            .increment(1);
        }
        Ok(removed)
    }

    /// Delete the file at `path`. Returns whether a file was deleted.
    pub async fn remove(&self, path: &Path) -> Result<bool> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(MimirError::io(path, e)),
        }
    }

    /// Whether a file exists at `path`. Does not check expiry.
    pub async fn exists(&self, path: &Path) -> Result<bool> {
        fs::try_exists(path)
            .await
            .map_err(|e| MimirError::io(path, e))
    }

    /// Recursively delete the directory tree at `dir`. Returns whether it existed.
    pub async fn remove_tree(&self, dir: &Path) -> Result<bool> {
        match fs::remove_dir_all(dir).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(MimirError::io(dir, e)),
        }
    }
}
