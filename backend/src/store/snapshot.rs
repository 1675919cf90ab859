use chrono::{DateTime, FixedOffset, Utc};
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{GuideError, GuideResult};
use crate::feed::FeedDocument;
use crate::models::{ChannelIndex, RawProgramme};

/// One complete, immutable parse of the feed plus its derived channel index.
///
/// Snapshots are never modified after construction; the store replaces the
/// whole value on refresh.
#[derive(Debug, Clone)]
pub struct Snapshot {
    generation: u64,
    checksum: String,
    source_name: String,
    loaded_at: DateTime<Utc>,
    channels: Arc<ChannelIndex>,
    /// Sorted by start instant.
    programmes: Vec<RawProgramme>,
}

impl Snapshot {
    pub fn build(
        feed: FeedDocument,
        generation: u64,
        checksum: impl Into<String>,
        source_name: impl Into<String>,
    ) -> GuideResult<Self> {
        let source_name = source_name.into();
        let channels = ChannelIndex::from_feed_order(feed.channels).map_err(|id| {
            GuideError::source_unavailable(&source_name, format!("duplicate channel id '{}'", id))
        })?;

        let mut programmes = feed.programmes;
        programmes.sort_by_key(|p| p.start);

        let orphaned = programmes
            .iter()
            .filter(|p| !channels.contains(&p.channel_id))
            .count();
        if orphaned > 0 {
            log::debug!(
                "{} programme(s) in {} reference channels missing from the channel list",
                orphaned,
                source_name
            );
        }

        Ok(Self {
            generation,
            checksum: checksum.into(),
            source_name,
            loaded_at: Utc::now(),
            channels: Arc::new(channels),
            programmes,
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// SHA-256 of the document text this snapshot was parsed from.
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn channel_index(&self) -> &Arc<ChannelIndex> {
        &self.channels
    }

    pub fn programme_count(&self) -> usize {
        self.programmes.len()
    }

    /// Programmes touching `[from, to]`, optionally limited to `channel_ids`.
    ///
    /// A programme is left out only if it ends strictly before `from` or starts
    /// strictly after `to`. Yields in start order, lazily.
    pub fn query<'a>(
        &'a self,
        from: DateTime<FixedOffset>,
        to: DateTime<FixedOffset>,
        channel_ids: Option<&'a HashSet<String>>,
    ) -> impl Iterator<Item = &'a RawProgramme> + 'a {
        let candidates = self.programmes.partition_point(|p| p.start <= to);

        self.programmes[..candidates]
            .iter()
            .filter(move |p| p.touches(from, to))
            .filter(move |p| channel_ids.map_or(true, |ids| ids.contains(&p.channel_id)))
    }
}
