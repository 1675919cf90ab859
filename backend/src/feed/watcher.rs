//! Polling change watcher for the feed source.
//!
//! The watcher compares the source fingerprint on a fixed interval and calls
//! [`ListingsStore::refresh`] when it moves. Any number of writes between two
//! polls collapse into a single refresh. Polls run on tokio's blocking pool so
//! source I/O never lands on a request thread.

use log::{debug, error, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::source::SourceFingerprint;
use crate::error::GuideError;
use crate::store::{ListingsStore, RefreshOutcome};

/// Result of one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Fingerprint unchanged since the previous poll.
    Unchanged,
    /// Fingerprint moved and the store was refreshed.
    Refreshed(RefreshOutcome),
    /// Fingerprint or refresh failed; the store kept its snapshot.
    Failed(GuideError),
}

pub struct FeedWatcher {
    store: Arc<ListingsStore>,
    interval: Duration,
    last_seen: Mutex<Option<SourceFingerprint>>,
}

impl FeedWatcher {
    pub fn new(store: Arc<ListingsStore>, interval: Duration) -> Self {
        Self {
            store,
            interval,
            last_seen: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Remember the current fingerprint without refreshing.
    ///
    /// Call before the startup refresh so a write racing with it is still
    /// picked up by the first poll.
    pub fn prime(&self) -> Result<(), GuideError> {
        let fingerprint = self.store.source().fingerprint()?;
        *self.last_seen.lock() = Some(fingerprint);
        Ok(())
    }

    /// Check the source once and refresh if it changed. Blocking.
    pub fn poll_once(&self) -> PollOutcome {
        let fingerprint = match self.store.source().fingerprint() {
            Ok(fingerprint) => fingerprint,
            Err(e) => {
                let mut last_seen = self.last_seen.lock();
                if last_seen.take().is_some() {
                    warn!("Feed source became unreadable: {}", e);
                } else {
                    debug!("Feed source still unreadable: {}", e);
                }
                return PollOutcome::Failed(e);
            }
        };

        {
            let mut last_seen = self.last_seen.lock();
            if last_seen.as_ref() == Some(&fingerprint) {
                return PollOutcome::Unchanged;
            }
            // Recorded before refreshing: a failed refresh is retried on the next change.
            *last_seen = Some(fingerprint);
        }

        match self.store.refresh() {
            Ok(outcome) => PollOutcome::Refreshed(outcome),
            Err(e) => PollOutcome::Failed(e),
        }
    }

    /// Run the poll loop until the returned handle is aborted.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let watcher = Arc::clone(&self);
                match tokio::task::spawn_blocking(move || watcher.poll_once()).await {
                    Ok(PollOutcome::Refreshed(outcome)) => {
                        debug!("Feed watcher refreshed listings: {:?}", outcome)
                    }
                    Ok(_) => {}
                    Err(e) => error!("Feed watcher poll task failed: {}", e),
                }
            }
        })
    }
}
