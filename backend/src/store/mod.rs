//! Listings store: the live, refreshable index over the feed.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────┐      refresh()       ┌──────────────────────┐
//! │  FeedSource (file, memory) │ ───────────────────▶ │  parse + index       │
//! └───────────────────────────┘   (watcher thread)    │  (outside any lock)  │
//!                                                     └──────────┬───────────┘
//!                                                                │ swap Arc
//! ┌──────────────────────────────────────────────────────────────▼───────────┐
//! │  current: RwLock<Option<Arc<Snapshot>>>                                   │
//! └──────────────────────────────────────────────────────────────┬───────────┘
//!                                                                │ clone Arc
//!                                                     request handlers / grid engine
//! ```
//!
//! The lock only guards the pointer swap. Parsing happens before the write
//! lock is taken, so readers never wait on a refresh and never observe a
//! half-built snapshot. Refreshes are serialized by a separate mutex.

pub mod snapshot;

pub use snapshot::Snapshot;

use chrono::{DateTime, FixedOffset};
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{GuideError, GuideResult};
use crate::feed::{parse_document, FeedSource};
use crate::models::{ChannelIndex, RawProgramme};

/// What a successful refresh did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum RefreshOutcome {
    /// A new snapshot was installed.
    Installed {
        generation: u64,
        channels: usize,
        programmes: usize,
    },
    /// The source content matched the installed snapshot; nothing was swapped.
    Unchanged { generation: u64 },
}

/// Owner of the current feed snapshot.
pub struct ListingsStore {
    source: Arc<dyn FeedSource>,
    current: RwLock<Option<Arc<Snapshot>>>,
    refresh_lock: Mutex<()>,
}

impl ListingsStore {
    /// Create an empty store. Nothing is loaded until [`ListingsStore::refresh`] runs.
    pub fn new(source: Arc<dyn FeedSource>) -> Self {
        Self {
            source,
            current: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn source(&self) -> &Arc<dyn FeedSource> {
        &self.source
    }

    /// Re-read the source and install a new snapshot.
    ///
    /// On failure the previously installed snapshot (if any) stays current.
    /// Safe to call redundantly: identical content is detected by checksum
    /// and leaves the current snapshot in place.
    pub fn refresh(&self) -> GuideResult<RefreshOutcome> {
        let _serialized = self.refresh_lock.lock();

        match self.load_next() {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                match self.current_generation() {
                    Some(generation) => warn!(
                        "Refresh of {} failed, keeping snapshot generation {}: {}",
                        self.source.name(),
                        generation,
                        e
                    ),
                    None => warn!(
                        "Refresh of {} failed, no snapshot loaded yet: {}",
                        self.source.name(),
                        e
                    ),
                }
                Err(e)
            }
        }
    }

    fn load_next(&self) -> GuideResult<RefreshOutcome> {
        let text = self.source.read()?;
        let checksum = content_checksum(&text);
        let previous = self.current.read().clone();

        if let Some(previous) = previous.as_ref() {
            if previous.checksum() == checksum {
                debug!(
                    "Feed {} unchanged (checksum {}), keeping generation {}",
                    self.source.name(),
                    &checksum[..12],
                    previous.generation()
                );
                return Ok(RefreshOutcome::Unchanged {
                    generation: previous.generation(),
                });
            }
        }

        let generation = previous.map_or(1, |p| p.generation() + 1);
        let feed = parse_document(&text, &self.source.name())?;
        let snapshot = Snapshot::build(feed, generation, checksum, self.source.name())?;

        let outcome = RefreshOutcome::Installed {
            generation,
            channels: snapshot.channel_index().len(),
            programmes: snapshot.programme_count(),
        };

        *self.current.write() = Some(Arc::new(snapshot));
        info!(
            "Installed listings snapshot generation {} from {} ({:?})",
            generation,
            self.source.name(),
            outcome
        );

        Ok(outcome)
    }

    /// The current snapshot. Hold on to it for the duration of a request to
    /// get a consistent view even if a refresh completes meanwhile.
    pub fn snapshot(&self) -> GuideResult<Arc<Snapshot>> {
        self.current.read().clone().ok_or(GuideError::NotReady)
    }

    pub fn is_ready(&self) -> bool {
        self.current.read().is_some()
    }

    pub fn current_generation(&self) -> Option<u64> {
        self.current.read().as_ref().map(|s| s.generation())
    }

    /// Channel index of the current snapshot.
    pub fn channel_index(&self) -> GuideResult<Arc<ChannelIndex>> {
        Ok(Arc::clone(self.snapshot()?.channel_index()))
    }

    /// Programmes touching `[from, to]` in the current snapshot.
    pub fn query(
        &self,
        from: DateTime<FixedOffset>,
        to: DateTime<FixedOffset>,
        channel_ids: Option<HashSet<String>>,
    ) -> GuideResult<ProgrammeQuery> {
        Ok(ProgrammeQuery {
            snapshot: self.snapshot()?,
            from,
            to,
            channel_ids,
        })
    }
}

/// A pending programme query bound to one snapshot.
///
/// Nothing is filtered until [`ProgrammeQuery::iter`] is consumed.
#[derive(Debug, Clone)]
pub struct ProgrammeQuery {
    snapshot: Arc<Snapshot>,
    from: DateTime<FixedOffset>,
    to: DateTime<FixedOffset>,
    channel_ids: Option<HashSet<String>>,
}

impl ProgrammeQuery {
    pub fn iter(&self) -> impl Iterator<Item = &RawProgramme> + '_ {
        self.snapshot
            .query(self.from, self.to, self.channel_ids.as_ref())
    }

    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }
}

/// Hex SHA-256 of the feed text, compared across refreshes.
fn content_checksum(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}
