//! Public API surface of the guide.
//!
//! This file consolidates the DTO types returned by the grid engine and the
//! HTTP API. All types derive Serialize/Deserialize for JSON serialization.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

pub use crate::models::{Category, ChannelInfo, GridWindow};

/// One programme projected onto the grid window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingEntry {
    /// Owning channel. Implied by the enclosing [`ChannelListings`] in JSON.
    #[serde(skip)]
    pub channel_id: String,
    /// True (unclipped) start instant.
    pub start: DateTime<FixedOffset>,
    /// Minutes of the programme that fall inside the window.
    pub span: i64,
    /// The programme started before the window.
    pub continued_left: bool,
    /// The programme ends after the window.
    pub continued_right: bool,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub stereo: bool,
    pub subtitled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
}

/// A channel and its listings for the window, in start order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelListings {
    #[serde(flatten)]
    pub channel: ChannelInfo,
    pub listings: Vec<ListingEntry>,
}

/// Complete grid response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideData {
    pub window: GridWindow,
    /// Channels in presentation order.
    pub channels: Vec<ChannelListings>,
}

impl GuideData {
    pub fn total_listings(&self) -> usize {
        self.channels.iter().map(|c| c.listings.len()).sum()
    }

    pub fn channel(&self, id: &str) -> Option<&ChannelListings> {
        self.channels.iter().find(|c| c.channel.id == id)
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod api_tests;
