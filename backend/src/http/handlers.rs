//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the grid
//! service for the actual projection.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use std::sync::Arc;

use super::dto::{GuideData, GuideQuery, HealthResponse, SnapshotStatus};
use super::error::AppError;
use super::state::AppState;
use crate::services::project_snapshot;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Reports whether a listings snapshot is loaded and which one.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.store.snapshot().ok().map(|s| SnapshotStatus {
        generation: s.generation(),
        source: s.source_name().to_string(),
        channels: s.channel_index().len(),
        programmes: s.programme_count(),
        loaded_at: s.loaded_at(),
    });

    Json(HealthResponse {
        status: if snapshot.is_some() { "ok" } else { "loading" }.to_string(),
        version: "v1".to_string(),
        snapshot,
    })
}

// =============================================================================
// Guide
// =============================================================================

/// GET /guide, GET /v1/guide
///
/// Project the current snapshot onto the requested window.
pub async fn get_guide(
    State(state): State<AppState>,
    query: Result<Query<GuideQuery>, QueryRejection>,
) -> HandlerResult<Arc<GuideData>> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let request = query.into_request(&state.defaults)?;

    let (window, range) = request.resolve()?;
    let snapshot = state.store.snapshot()?;
    let generation = snapshot.generation();

    if let Some(cached) = state.cache.get(generation, &window, range) {
        return Ok(Json(cached));
    }

    // Projection is CPU-bound; keep it off the async workers
    let data = tokio::task::spawn_blocking(move || project_snapshot(&snapshot, &window, range))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;

    tracing::debug!(
        generation,
        window_start = %window.start,
        channels = data.channels.len(),
        listings = data.total_listings(),
        "Projected guide"
    );

    Ok(Json(state.cache.insert(generation, &window, range, data)))
}
