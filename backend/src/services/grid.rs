//! Grid projection: turns the current listings snapshot into the channel-by-
//! channel view of one time window.
//!
//! The projection is synchronous and deterministic. For a fixed snapshot and
//! request it always produces the same [`GuideData`], which is what lets the
//! HTTP layer cache responses by snapshot generation.

use chrono::{DateTime, FixedOffset};
use log::debug;
use std::collections::{HashMap, HashSet};

use crate::api::{ChannelListings, GuideData, ListingEntry};
use crate::error::{GuideError, GuideResult};
use crate::models::{
    current_instant, validate_grid_shape, whole_minutes, Category, GridWindow, RawProgramme,
};
use crate::store::{ListingsStore, Snapshot};

pub const DEFAULT_SLOT_COUNT: u32 = 3;
pub const DEFAULT_SLOT_WIDTH: u32 = 30;

/// Display-number filter `[lower, upper)`. A missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChannelRange {
    pub lower: Option<u32>,
    pub upper: Option<u32>,
}

impl ChannelRange {
    pub fn new(lower: Option<u32>, upper: Option<u32>) -> GuideResult<Self> {
        if let (Some(lower), Some(upper)) = (lower, upper) {
            if lower >= upper {
                return Err(GuideError::invalid_argument(format!(
                    "lower channel limit {} must be below upper limit {}",
                    lower, upper
                )));
            }
        }
        Ok(Self { lower, upper })
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    /// Whether a channel with this display number passes the filter.
    ///
    /// Unnumbered channels only pass an unbounded range.
    pub fn admits(&self, display_number: Option<u32>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        match display_number {
            Some(number) => {
                self.lower.map_or(true, |lower| number >= lower)
                    && self.upper.map_or(true, |upper| number < upper)
            }
            None => false,
        }
    }
}

/// Parameters of one grid request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRequest {
    /// Reference instant; the current local time when absent.
    pub now: Option<DateTime<FixedOffset>>,
    pub slot_count: u32,
    pub slot_width: u32,
    pub lower_channel: Option<u32>,
    pub upper_channel: Option<u32>,
}

impl Default for GridRequest {
    fn default() -> Self {
        Self {
            now: None,
            slot_count: DEFAULT_SLOT_COUNT,
            slot_width: DEFAULT_SLOT_WIDTH,
            lower_channel: None,
            upper_channel: None,
        }
    }
}

impl GridRequest {
    pub fn at(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Some(now),
            ..Self::default()
        }
    }

    pub fn with_slots(mut self, slot_count: u32, slot_width: u32) -> Self {
        self.slot_count = slot_count;
        self.slot_width = slot_width;
        self
    }

    pub fn with_channel_range(mut self, lower: Option<u32>, upper: Option<u32>) -> Self {
        self.lower_channel = lower;
        self.upper_channel = upper;
        self
    }

    /// Validate the request and fix its window.
    ///
    /// `now` is sampled here when the request does not carry one, so callers
    /// that need the window before projecting (for caching) see the same
    /// window the projection uses.
    pub fn resolve(&self) -> GuideResult<(GridWindow, ChannelRange)> {
        validate_grid_shape(self.slot_count, self.slot_width)?;
        let range = ChannelRange::new(self.lower_channel, self.upper_channel)?;
        let now = self.now.unwrap_or_else(current_instant);
        let window = GridWindow::starting_at_or_before(now, self.slot_count, self.slot_width)?;
        Ok((window, range))
    }
}

/// How much of a programme is visible in a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clip {
    pub span_minutes: i64,
    pub continued_left: bool,
    pub continued_right: bool,
}

impl Clip {
    const HIDDEN: Clip = Clip {
        span_minutes: 0,
        continued_left: false,
        continued_right: false,
    };

    pub fn is_visible(&self) -> bool {
        self.span_minutes > 0
    }
}

/// Clip `[start, stop)` to the window `[window.start, window.end)`.
///
/// Each minute difference is truncated on its own, so a programme with
/// sub-minute edges may lose up to a minute per clipped side.
pub fn clip(
    start: DateTime<FixedOffset>,
    stop: DateTime<FixedOffset>,
    window: &GridWindow,
) -> Clip {
    if stop <= window.start || start >= window.end {
        return Clip::HIDDEN;
    }

    if start < window.start && stop > window.end {
        return Clip {
            span_minutes: window.length_minutes(),
            continued_left: true,
            continued_right: true,
        };
    }

    let mut clip = Clip {
        span_minutes: whole_minutes(start, stop),
        continued_left: false,
        continued_right: false,
    };
    if start < window.start {
        clip.span_minutes -= whole_minutes(start, window.start);
        clip.continued_left = true;
    }
    if stop > window.end {
        clip.span_minutes -= whole_minutes(window.end, stop);
        clip.continued_right = true;
    }
    clip
}

fn listing_entry(programme: &RawProgramme, clip: Clip) -> ListingEntry {
    let category = programme.highlighted_category();
    let rating = programme
        .rating_for(Category::rating_system(category))
        .map(str::to_string);

    ListingEntry {
        channel_id: programme.channel_id.clone(),
        start: programme.start,
        span: clip.span_minutes,
        continued_left: clip.continued_left,
        continued_right: clip.continued_right,
        title: programme.title.clone(),
        category,
        stereo: programme.stereo.is_some(),
        subtitled: programme.subtitles.is_some(),
        rating,
    }
}

/// Project one snapshot onto a resolved window.
pub fn project_snapshot(snapshot: &Snapshot, window: &GridWindow, range: ChannelRange) -> GuideData {
    let index = snapshot.channel_index();

    let restriction: Option<HashSet<String>> = if range.is_unbounded() {
        None
    } else {
        Some(
            index
                .iter()
                .filter(|channel| range.admits(channel.display_number))
                .map(|channel| channel.id.clone())
                .collect(),
        )
    };

    let mut grouped: HashMap<&str, Vec<ListingEntry>> = HashMap::new();
    let mut unknown_channel = 0usize;
    for programme in snapshot.query(window.start, window.end, restriction.as_ref()) {
        if !index.contains(&programme.channel_id) {
            unknown_channel += 1;
            continue;
        }
        let clipped = clip(programme.start, programme.stop, window);
        if !clipped.is_visible() {
            continue;
        }
        grouped
            .entry(programme.channel_id.as_str())
            .or_default()
            .push(listing_entry(programme, clipped));
    }
    if unknown_channel > 0 {
        debug!(
            "Skipped {} programme(s) on channels missing from snapshot generation {}",
            unknown_channel,
            snapshot.generation()
        );
    }

    let channels = index
        .iter()
        .filter(|channel| range.admits(channel.display_number))
        .map(|channel| {
            let mut listings = grouped.remove(channel.id.as_str()).unwrap_or_default();
            listings.sort_by_key(|entry| entry.start);
            ChannelListings {
                channel: channel.clone(),
                listings,
            }
        })
        .collect();

    GuideData {
        window: *window,
        channels,
    }
}

/// Build the grid for `request` against the store's current snapshot.
///
/// Argument errors are reported before readiness: a malformed request fails
/// with `InvalidArgument` even when nothing is loaded yet.
pub fn get_data(store: &ListingsStore, request: &GridRequest) -> GuideResult<GuideData> {
    let (window, range) = request.resolve()?;
    let snapshot = store.snapshot()?;
    Ok(project_snapshot(&snapshot, &window, range))
}

#[cfg(test)]
#[path = "grid_tests.rs"]
mod grid_tests;
