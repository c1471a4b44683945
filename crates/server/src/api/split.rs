//! Splitting endpoints: size/overlap packing and similarity breakpoints.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use chunkwise_core::{
    LengthMetric, ProfileMode, SimilarityOptions, SizeOptions, SplitError, ThresholdPolicy,
};
use chunkwise_splitter::SimilaritySplit;

use super::ApiError;
use crate::state::{AppState, RouteMetrics};

// ── Request/Response types ────────────────────────

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SizeRequest {
    pub text: String,
    /// Defaults to the configured chunk size (4000).
    pub chunk_size: Option<i64>,
    /// Defaults to the configured overlap (200).
    pub chunk_overlap: Option<i64>,
    /// "chars" (default) or "words".
    #[schema(value_type = Option<String>)]
    pub metric: Option<LengthMetric>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SizeResponse {
    pub chunks: Vec<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SimilarityRequest {
    pub text: String,
    pub smoothing_window: Option<i64>,
    pub min_chunk_sentences: Option<i64>,
    /// `{"policy": "std_dev", "k": 1.0}`, `{"policy": "percentile", "percentile": 10}`
    /// or `{"policy": "fixed", "value": 0.5}`.
    #[schema(value_type = Option<Object>)]
    pub threshold: Option<ThresholdPolicy>,
    pub order: Option<i64>,
    /// `{"mode": "adjacent"}` or `{"mode": "activated", "reach": 10}`.
    #[schema(value_type = Option<Object>)]
    pub mode: Option<ProfileMode>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SimilarityResponse {
    pub chunks: Vec<String>,
    pub profile: Vec<f32>,
    pub breakpoints: Vec<usize>,
    pub threshold: Option<f64>,
}

impl From<SimilaritySplit> for SimilarityResponse {
    fn from(split: SimilaritySplit) -> Self {
        Self {
            chunks: split.texts(),
            profile: split.profile,
            breakpoints: split.breakpoints,
            threshold: split.threshold,
        }
    }
}

// ── Option merging ────────────────────────────────

fn positive(name: &str, value: i64) -> Result<usize, SplitError> {
    if value < 1 {
        return Err(SplitError::invalid(format!("{name} must be >= 1 (got {value})")));
    }
    Ok(value as usize)
}

impl SizeRequest {
    pub fn options(&self, defaults: SizeOptions) -> Result<SizeOptions, SplitError> {
        let size = self.chunk_size.unwrap_or(defaults.chunk_size as i64);
        let overlap = self.chunk_overlap.unwrap_or(defaults.chunk_overlap as i64);
        Ok(SizeOptions::new(size, overlap)?.with_metric(self.metric.unwrap_or(defaults.metric)))
    }
}

impl SimilarityRequest {
    pub fn options(&self, defaults: SimilarityOptions) -> Result<SimilarityOptions, SplitError> {
        let mut options = defaults;
        if let Some(w) = self.smoothing_window {
            options.smoothing_window = positive("smoothing_window", w)?;
        }
        if let Some(m) = self.min_chunk_sentences {
            options.min_chunk_sentences = positive("min_chunk_sentences", m)?;
        }
        if let Some(o) = self.order {
            options.order = positive("order", o)?;
        }
        if let Some(t) = self.threshold {
            options.threshold = t;
        }
        if let Some(m) = self.mode {
            options.mode = m;
        }
        options.validate()?;
        Ok(options)
    }
}

fn track<T>(metrics: &RouteMetrics, started: Instant, result: &Result<T, ApiError>) {
    let error = result.as_ref().err().map(|e| e.body.error.as_str());
    metrics.record(started.elapsed(), error);
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(v)| v)
        .map_err(|rejection| SplitError::invalid(rejection.body_text()).into())
}

// ── POST /split/size ──────────────────────────────

/// Split text into size-bounded chunks with sentence overlap
#[utoipa::path(
    post,
    path = "/split/size",
    tag = "Split",
    request_body = SizeRequest,
    responses(
        (status = 200, description = "Chunks in document order", body = SizeResponse),
        (status = 400, description = "Invalid parameters", body = super::ErrorBody),
        (status = 500, description = "Segmentation failed", body = super::ErrorBody)
    )
)]
pub async fn split_size(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SizeRequest>, JsonRejection>,
) -> Result<Json<SizeResponse>, ApiError> {
    let started = Instant::now();
    let result = run_split_size(&state, payload).await;
    track(&state.metrics.split_size, started, &result);
    result
}

async fn run_split_size(
    state: &AppState,
    payload: Result<Json<SizeRequest>, JsonRejection>,
) -> Result<Json<SizeResponse>, ApiError> {
    let req = body(payload)?;
    let options = req.options(state.config.split.size_options())?;

    // Segmentation and packing are CPU-bound; keep them off the reactor.
    let splitter = state.splitter.clone();
    let chunks = tokio::task::spawn_blocking(move || splitter.split_by_size_with(&req.text, &options))
        .await
        .map_err(|e| ApiError::internal(format!("split task failed: {e}")))??;

    Ok(Json(SizeResponse {
        chunks: chunks.into_iter().map(|c| c.text).collect(),
    }))
}

// ── POST /split/similarity ────────────────────────

/// Split text where adjacent sentence embeddings diverge
#[utoipa::path(
    post,
    path = "/split/similarity",
    tag = "Split",
    request_body = SimilarityRequest,
    responses(
        (status = 200, description = "Chunks, profile and breakpoints", body = SimilarityResponse),
        (status = 400, description = "Invalid parameters", body = super::ErrorBody),
        (status = 500, description = "Segmentation or embedding failed", body = super::ErrorBody),
        (status = 503, description = "Embedding model unavailable", body = super::ErrorBody)
    )
)]
pub async fn split_similarity(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SimilarityRequest>, JsonRejection>,
) -> Result<Json<SimilarityResponse>, ApiError> {
    let started = Instant::now();
    let result = run_split_similarity(&state, payload).await;
    track(&state.metrics.split_similarity, started, &result);
    result
}

async fn run_split_similarity(
    state: &AppState,
    payload: Result<Json<SimilarityRequest>, JsonRejection>,
) -> Result<Json<SimilarityResponse>, ApiError> {
    let req = body(payload)?;
    let options = req.options(state.config.split.similarity_options())?;
    let split = state.splitter.split_by_similarity(&req.text, &options).await?;
    Ok(Json(split.into()))
}
