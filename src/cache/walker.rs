//! Depth-first enumeration of entry files under a directory.
//!
//! Sibling order is whatever the filesystem lists and is not stable.
//! Callers that need an order must sort.
//!
//! Scans are O(n) in the number of files under the root, with no index
//! and no pagination. That is the scalability ceiling of both `queries`/
//! `prune` and semantic lookups.

use std::ffi::OsStr;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::{self, ReadDir};

use crate::cache::key::ENTRY_EXTENSION;
use crate::{MimirError, Result};

/// Pull-based cursor over the entry files below a root directory.
///
/// Keeps an explicit stack of open directory listings instead of
/// recursing. Symlinks and files without the `.json` extension are
/// skipped. Directories that vanish mid-walk (a concurrent `clear`)
/// are treated as empty.
pub struct SegmentWalker {
    root: Option<PathBuf>,
    stack: Vec<(PathBuf, ReadDir)>,
}

impl SegmentWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            stack: Vec::new(),
        }
    }

    /// Next entry file, or `None` once the tree is exhausted.
    ///
    /// A missing root yields no files.
    pub async fn next_file(&mut self) -> Result<Option<PathBuf>> {
        if let Some(root) = self.root.take() {
            self.descend(root).await?;
        }

        while let Some((dir, listing)) = self.stack.last_mut() {
            let next = listing
                .next_entry()
                .await
                .map_err(|e| MimirError::io(dir.as_path(), e))?;
            let Some(entry) = next else {
                self.stack.pop();
                continue;
            };

            let path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| MimirError::io(&path, e))?;

            if file_type.is_dir() {
                self.descend(path).await?;
            } else if file_type.is_file() && path.extension() == Some(OsStr::new(ENTRY_EXTENSION)) {
                return Ok(Some(path));
            }
        }

        Ok(None)
    }

    async fn descend(&mut self, dir: PathBuf) -> Result<()> {
        match fs::read_dir(&dir).await {
            Ok(listing) => {
                self.stack.push((dir, listing));
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MimirError::io(dir, e)),
        }
    }
}

/// Visit every entry file under `root`, one at a time.
///
/// `visit` receives the accumulator and the file path and returns the
/// next accumulator; each visit completes before the next file is listed.
/// The first error stops the walk.
pub async fn walk<S, F, Fut>(root: &Path, init: S, mut visit: F) -> Result<S>
where
    F: FnMut(S, PathBuf) -> Fut,
    Fut: Future<Output = Result<S>>,
{
    let mut walker = SegmentWalker::new(root);
    let mut acc = init;
    while let Some(path) = walker.next_file().await? {
        acc = visit(acc, path).await?;
    }
    Ok(acc)
}
