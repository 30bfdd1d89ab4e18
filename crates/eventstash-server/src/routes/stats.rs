//! # Cache statistics
//!
//! - GET /stats — store counters as JSON

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use eventstash_core::CacheStats;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(stats))
}

async fn stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats().await)
}
