// src/api.rs
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::FixedOffset;
use tower_http::cors::CorsLayer;

use crate::aggregate::AggregatedSeries;
use crate::store::SeriesStore;
use crate::timefmt;

/// Shared handles for the render boundary. The store is read-only here; only
/// the poll pipeline replaces it.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SeriesStore>,
    pub display_offset: FixedOffset,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/series", get(series))
        .route("/series/display", get(series_display))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Snapshot as four index-aligned arrays; absent values serialize as `null`
/// so the chart gaps the line instead of drawing a false zero.
async fn series(State(state): State<AppState>) -> Json<AggregatedSeries> {
    Json(state.store.snapshot())
}

/// Same snapshot with timestamps re-rendered at the configured display offset.
async fn series_display(State(state): State<AppState>) -> Json<AggregatedSeries> {
    let mut snap = state.store.snapshot();
    for ts in &mut snap.timestamps {
        *ts = timefmt::to_display(ts, state.display_offset);
    }
    Json(snap)
}
