//! Channel metadata and the presentation-ordered channel index.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Display names that are a channel number, e.g. `"15"`.
static DISPLAY_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+$").expect("Failed to compile display number regex"));

/// Display names that are a call-sign style abbreviation, e.g. `"KTVU"` or `"WGN9"`.
static ABBREVIATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]+[A-Z0-9]*$").expect("Failed to compile abbreviation regex")
});

/// One channel as exposed to guide consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelInfo {
    #[serde(rename = "channelId")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_number: Option<u32>,
}

impl ChannelInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            abbreviation: None,
            display_number: None,
        }
    }

    pub fn with_display_number(mut self, number: u32) -> Self {
        self.display_number = Some(number);
        self
    }

    pub fn with_abbreviation(mut self, abbreviation: impl Into<String>) -> Self {
        self.abbreviation = Some(abbreviation.into());
        self
    }

    /// Derive number and abbreviation from a channel's `display-name` values.
    ///
    /// The first all-digit name becomes the display number and the first
    /// upper-case call-sign becomes the abbreviation. Names are matched as
    /// written, without trimming. A digit string too large for `u32` is not a
    /// usable channel number and is skipped.
    pub fn from_display_names<S: AsRef<str>>(id: impl Into<String>, names: &[S]) -> Self {
        let display_number = names
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| DISPLAY_NUMBER_REGEX.is_match(name))
            .find_map(|name| name.parse::<u32>().ok());

        let abbreviation = names
            .iter()
            .map(AsRef::as_ref)
            .find(|name| ABBREVIATION_REGEX.is_match(name))
            .map(str::to_string);

        Self {
            id: id.into(),
            abbreviation,
            display_number,
        }
    }
}

/// Channels keyed by id, iterated in presentation order.
///
/// Presentation order is ascending display number; channels without a number
/// come after every numbered channel. Ties keep feed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelIndex {
    ordered: Vec<ChannelInfo>,
    positions: HashMap<String, usize>,
}

impl ChannelIndex {
    /// Build the index from channels in feed order.
    ///
    /// Returns the offending id if the same channel id appears twice.
    pub fn from_feed_order(channels: Vec<ChannelInfo>) -> Result<Self, String> {
        let mut ordered = channels;
        // Stable sort keeps feed order for equal keys.
        ordered.sort_by_key(|c| (c.display_number.is_none(), c.display_number));

        let mut positions = HashMap::with_capacity(ordered.len());
        for (position, channel) in ordered.iter().enumerate() {
            if positions.insert(channel.id.clone(), position).is_some() {
                return Err(channel.id.clone());
            }
        }

        Ok(Self { ordered, positions })
    }

    pub fn get(&self, id: &str) -> Option<&ChannelInfo> {
        self.positions.get(id).map(|&position| &self.ordered[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Channels in presentation order.
    pub fn iter(&self) -> impl Iterator<Item = &ChannelInfo> {
        self.ordered.iter()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}
