//! Data Transfer Objects for the HTTP API.
//!
//! The grid response itself is [`crate::api::GuideData`]; this module holds
//! the request query and the health payload.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

pub use crate::api::{ChannelListings, GuideData, ListingEntry};

use super::error::AppError;
use crate::config::GridSettings;
use crate::services::GridRequest;

/// Query string of `GET /guide`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuideQuery {
    /// Reference instant, RFC 3339. Server local time when absent.
    pub now: Option<String>,
    pub slot_count: Option<u32>,
    pub slot_width: Option<u32>,
    pub lower_channel: Option<u32>,
    pub upper_channel: Option<u32>,
}

impl GuideQuery {
    /// Fill missing parameters from `defaults` and parse `now`.
    pub fn into_request(self, defaults: &GridSettings) -> Result<GridRequest, AppError> {
        let now = self.now.as_deref().map(parse_now).transpose()?;
        Ok(GridRequest {
            now,
            slot_count: self.slot_count.unwrap_or(defaults.slot_count),
            slot_width: self.slot_width.unwrap_or(defaults.slot_width),
            lower_channel: self.lower_channel,
            upper_channel: self.upper_channel,
        })
    }
}

/// Parse an RFC 3339 instant. An unencoded `+` in a query string arrives
/// as a space, so that spelling is accepted too.
fn parse_now(value: &str) -> Result<DateTime<FixedOffset>, AppError> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|e| {
            if value.contains(' ') {
                DateTime::parse_from_rfc3339(&value.replace(' ', "+"))
            } else {
                Err(e)
            }
        })
        .map_err(|e| {
            AppError::BadRequest(format!(
                "'now' must be an RFC 3339 timestamp, got '{}': {}",
                value, e
            ))
        })
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "ok" once a snapshot is loaded, "loading" before
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SnapshotStatus>,
}

/// Summary of the installed snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotStatus {
    pub generation: u64,
    pub source: String,
    pub channels: usize,
    pub programmes: usize,
    pub loaded_at: DateTime<Utc>,
}
