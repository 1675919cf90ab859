//! Service layer for the guide.
//!
//! This module contains the grid projection that sits between the listings
//! store and the HTTP handlers, plus the response cache the handlers use to
//! avoid recomputing identical projections.

pub mod cache;
pub mod grid;

pub use cache::GuideCache;
pub use grid::{
    clip, get_data, project_snapshot, ChannelRange, Clip, GridRequest, DEFAULT_SLOT_COUNT,
    DEFAULT_SLOT_WIDTH,
};
