//! # TVSL Guide
//!
//! Listings store and grid projection engine for a TV programme guide.
//!
//! This crate loads an XMLTV listings feed into an immutable, atomically
//! swapped snapshot and projects it onto a fixed time window split into
//! equal slots, producing per-channel listings clipped to the window. The
//! server binary exposes the projection as a REST API via Axum.
//!
//! ## Features
//!
//! - **Feed Loading**: Parse XMLTV channels and programmes with strict timestamp checks
//! - **Listings Store**: Lock-light snapshot swapping with change detection by checksum
//! - **Change Watching**: Poll the feed source and refresh on change
//! - **Grid Projection**: Window alignment, clipping, classification and channel ordering
//! - **HTTP API**: Cached guide endpoint for frontend integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Channel, programme, time and window types
//! - [`feed`]: Feed sources, the XMLTV reader and the change watcher
//! - [`store`]: The listings store and its snapshots
//! - [`services`]: Grid projection and the response cache
//! - [`api`]: Data Transfer Objects (DTOs) for engine and API responses
//! - [`config`]: TOML configuration with environment overrides
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tvsl_guide::feed::FileFeedSource;
//! use tvsl_guide::services::{get_data, GridRequest};
//! use tvsl_guide::store::ListingsStore;
//!
//! let store = ListingsStore::new(Arc::new(FileFeedSource::new("listings.xml")));
//! store.refresh()?;
//! let grid = get_data(&store, &GridRequest::default().with_channel_range(Some(2), Some(20)))?;
//! println!("{} channels in window starting {}", grid.channels.len(), grid.window.start);
//! # Ok::<(), tvsl_guide::error::GuideError>(())
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod services;
pub mod store;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{GuideError, GuideResult};
