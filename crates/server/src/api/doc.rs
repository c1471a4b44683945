//! OpenAPI documentation aggregator, served via Scalar UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "chunkwise API",
        version = "0.1.0",
        description = "Sentence-aware text splitting by size/overlap or by embedding similarity.",
    ),
    tags(
        (name = "Health", description = "Liveness, loaded models and redacted config"),
        (name = "Split", description = "Size-bounded and similarity-based chunking"),
    ),
    paths(
        crate::api::health::health,
        crate::api::health::config,
        crate::api::split::split_size,
        crate::api::split::split_similarity,
    ),
    components(schemas(
        crate::api::ErrorBody,
        crate::api::health::HealthResponse,
        crate::api::health::EmbeddingInfo,
        crate::api::health::RouteReport,
        crate::state::RouteStats,
        crate::api::split::SizeRequest,
        crate::api::split::SizeResponse,
        crate::api::split::SimilarityRequest,
        crate::api::split::SimilarityResponse,
    ))
)]
pub struct ApiDoc;
