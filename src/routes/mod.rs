//! Service route handlers

pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

/// Health and cache endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/cache/stats", get(health::cache_stats))
        .route("/api/cache/invalidate", post(health::invalidate_all))
        .route(
            "/api/cache/venues/:venue_id/invalidate",
            post(health::invalidate_venue),
        )
}
