//! Health and config endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::{AppState, RouteStats};

#[derive(Serialize, utoipa::ToSchema)]
pub struct EmbeddingInfo {
    pub provider: String,
    pub dimensions: usize,
}

/// Per-route counters since startup.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RouteReport {
    pub split_size: RouteStats,
    pub split_similarity: RouteStats,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub segmenter: String,
    pub embedding: EmbeddingInfo,
    pub routes: RouteReport,
}

/// Liveness, loaded models and request counters
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Server is up", body = HealthResponse))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let embedder = state.splitter.embedder();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        segmenter: state.splitter.segmenter().name().to_string(),
        embedding: EmbeddingInfo {
            provider: embedder.provider().to_string(),
            dimensions: embedder.dimensions(),
        },
        routes: RouteReport {
            split_size: state.metrics.split_size.snapshot(),
            split_similarity: state.metrics.split_similarity.snapshot(),
        },
    })
}

/// Active configuration with secrets removed
#[utoipa::path(
    get,
    path = "/config",
    tag = "Health",
    responses((status = 200, description = "Redacted config"))
)]
pub async fn config(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(state.config.redacted_summary())
}
