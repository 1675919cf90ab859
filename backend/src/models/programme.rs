use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::time::whole_minutes;

/// Rating system consulted for movies.
pub const MOVIE_RATING_SYSTEM: &str = "MPAA";

/// Rating system consulted for everything else.
pub const TV_RATING_SYSTEM: &str = "VCHIP";

/// A `(system, value)` rating pair from the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub system: Option<String>,
    pub value: String,
}

/// The colour-coded categories the guide highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "sports event")]
    SportsEvent,
    #[serde(rename = "news")]
    News,
    #[serde(rename = "kids")]
    Kids,
    #[serde(rename = "movie")]
    Movie,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::SportsEvent,
        Category::News,
        Category::Kids,
        Category::Movie,
    ];

    /// Lower-case label used in guide output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::SportsEvent => "sports event",
            Category::News => "news",
            Category::Kids => "kids",
            Category::Movie => "movie",
        }
    }

    /// Match a feed category tag, ignoring case.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(tag))
    }

    /// Rating system that applies to programmes of this category.
    pub fn rating_system(category: Option<Category>) -> &'static str {
        match category {
            Some(Category::Movie) => MOVIE_RATING_SYSTEM,
            _ => TV_RATING_SYSTEM,
        }
    }
}

/// One programme record exactly as read from the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProgramme {
    pub channel_id: String,
    pub start: DateTime<FixedOffset>,
    pub stop: DateTime<FixedOffset>,
    pub title: String,
    pub categories: Vec<String>,
    /// Contents of the stereo marker, when present.
    pub stereo: Option<String>,
    /// Subtitle type, when present.
    pub subtitles: Option<String>,
    pub ratings: Vec<Rating>,
}

impl RawProgramme {
    /// Full (unclipped) length in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        whole_minutes(self.start, self.stop)
    }

    /// Inclusive overlap test: only programmes ending strictly before `from`
    /// or starting strictly after `to` are outside.
    pub fn touches(&self, from: DateTime<FixedOffset>, to: DateTime<FixedOffset>) -> bool {
        !(self.stop < from || self.start > to)
    }

    /// First category tag that is one of the highlighted categories.
    pub fn highlighted_category(&self) -> Option<Category> {
        self.categories.iter().find_map(|tag| Category::from_tag(tag))
    }

    /// Value of the first rating filed under `system`.
    pub fn rating_for(&self, system: &str) -> Option<&str> {
        self.ratings
            .iter()
            .find(|r| r.system.as_deref() == Some(system))
            .map(|r| r.value.as_str())
    }
}
