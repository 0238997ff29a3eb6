//! Liveness check.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Active storage backend ("s3" or "local")
    pub storage: String,
    /// Upload sessions currently holding staged assets
    pub tracked_sessions: usize,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is alive", body = HealthResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        storage: state.storage.backend_type().to_string(),
        tracked_sessions: state.assets.registry().len(),
    })
}
