//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::GridSettings;
use crate::services::GuideCache;
use crate::store::ListingsStore;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Listings store the grid is projected from
    pub store: Arc<ListingsStore>,
    /// Projections already computed for the current snapshot
    pub cache: Arc<GuideCache>,
    /// Slot defaults for parameters a request leaves out
    pub defaults: GridSettings,
}

impl AppState {
    /// Create a new application state with a cache sized from `defaults`.
    pub fn new(store: Arc<ListingsStore>, defaults: GridSettings) -> Self {
        Self {
            store,
            cache: Arc::new(GuideCache::new(defaults.cache_capacity)),
            defaults,
        }
    }
}
