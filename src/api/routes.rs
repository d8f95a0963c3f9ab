//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::projection::{AggregateSnapshot, Materializer, PlayerTotals};

/// Shared state handed to every route
pub type AppState = Arc<Materializer>;

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/materialized", get(get_materialized))
        .route("/materialized/players/:player_id", get(get_player_totals))
        .route("/health", get(health_check))
}

/// Current materialized statistics
async fn get_materialized(State(materializer): State<AppState>) -> Json<AggregateSnapshot> {
    Json(materializer.snapshot())
}

/// All-time totals for one player
async fn get_player_totals(
    State(materializer): State<AppState>,
    Path(player_id): Path<i64>,
) -> AppResult<Json<PlayerTotals>> {
    materializer
        .player_totals(player_id)
        .map(Json)
        .ok_or(AppError::PlayerNotFound(player_id))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
