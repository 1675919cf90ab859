//! Feed sources the listings store can load from.

use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use crate::error::{GuideError, GuideResult};

/// Cheap change token for a source. Two equal fingerprints mean "nothing to reload".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFingerprint {
    /// File metadata
    File {
        modified: Option<SystemTime>,
        len: u64,
    },
    /// Revision counter of an in-memory source
    Revision(u64),
}

/// Backing store for the raw feed document.
///
/// Reads are blocking and must only be issued from the refresh path, never
/// from request handling.
pub trait FeedSource: Send + Sync {
    /// Label for logs and error messages.
    fn name(&self) -> String;

    /// Read the whole document.
    fn read(&self) -> GuideResult<String>;

    /// Current change token.
    fn fingerprint(&self) -> GuideResult<SourceFingerprint>;
}

/// XMLTV file on local disk.
#[derive(Debug, Clone)]
pub struct FileFeedSource {
    path: PathBuf,
}

impl FileFeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FeedSource for FileFeedSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> GuideResult<String> {
        fs::read_to_string(&self.path)
            .map_err(|e| GuideError::source_unavailable(self.name(), format!("read failed: {}", e)))
    }

    fn fingerprint(&self) -> GuideResult<SourceFingerprint> {
        let metadata = fs::metadata(&self.path).map_err(|e| {
            GuideError::source_unavailable(self.name(), format!("stat failed: {}", e))
        })?;

        Ok(SourceFingerprint::File {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

/// In-memory document, replaceable at runtime.
#[derive(Debug)]
pub struct StaticFeedSource {
    name: String,
    content: RwLock<Option<String>>,
    revision: AtomicU64,
}

impl StaticFeedSource {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: RwLock::new(Some(content.into())),
            revision: AtomicU64::new(1),
        }
    }

    /// Swap in a new document and bump the revision.
    pub fn replace(&self, content: impl Into<String>) {
        *self.content.write() = Some(content.into());
        self.revision.fetch_add(1, Ordering::SeqCst);
    }

    /// Make subsequent reads fail, as if the backing file disappeared.
    pub fn make_unavailable(&self) {
        *self.content.write() = None;
        self.revision.fetch_add(1, Ordering::SeqCst);
    }
}

impl FeedSource for StaticFeedSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn read(&self) -> GuideResult<String> {
        self.content
            .read()
            .clone()
            .ok_or_else(|| GuideError::source_unavailable(self.name(), "content removed"))
    }

    fn fingerprint(&self) -> GuideResult<SourceFingerprint> {
        Ok(SourceFingerprint::Revision(
            self.revision.load(Ordering::SeqCst),
        ))
    }
}
