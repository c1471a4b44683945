//! HTTP endpoint modules.
//!
//! Shared error mapping lives here; each sub-module owns one area.

pub mod doc;
mod health;
mod split;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use chunkwise_core::SplitError;

pub use health::{config, health};
pub use split::{split_similarity, split_size, SimilarityResponse, SizeResponse};


// ── Error response ───────────────────────────────────────────────

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}

/// Failed request: status plus `{error, kind}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody {
                error: msg.into(),
                kind: "internal".to_string(),
            },
        }
    }
}

fn status_for(err: &SplitError) -> StatusCode {
    match err {
        SplitError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
        SplitError::SegmentationFailure(_) | SplitError::EmbeddingFailure(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        SplitError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl From<SplitError> for ApiError {
    fn from(err: SplitError) -> Self {
        Self {
            status: status_for(&err),
            body: ErrorBody {
                error: err.to_string(),
                kind: err.kind().to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(kind = %self.body.kind, "{}", self.body.error);
        } else {
            tracing::warn!(kind = %self.body.kind, "{}", self.body.error);
        }
        (self.status, Json(self.body)).into_response()
    }
}
