//! Health and cache maintenance handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::cache::CacheStats;
use crate::AppState;

/// Liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Cache statistics for monitoring
pub async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}

/// Drop a venue's cached pricing inputs after its rules were edited
pub async fn invalidate_venue(
    State(state): State<AppState>,
    Path(venue_id): Path<i64>,
) -> StatusCode {
    state.cache.invalidate_venue(venue_id).await;
    StatusCode::NO_CONTENT
}

/// Drop every cached venue, e.g. after a bulk rule import
pub async fn invalidate_all(State(state): State<AppState>) -> StatusCode {
    state.cache.invalidate_all();
    StatusCode::NO_CONTENT
}
