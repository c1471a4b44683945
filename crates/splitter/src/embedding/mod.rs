pub mod batcher;
pub mod hashing;
pub mod ollama;
pub mod openai;
pub mod traits;

use std::sync::Arc;

use chunkwise_core::{Config, SplitError, SplitResult};

pub use batcher::EmbeddingBatcher;
pub use hashing::HashingEmbedder;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;
pub use traits::{Embedder, EmbeddingError};

/// Build the configured embedding provider. Does not touch the network.
pub fn from_config(config: &Config) -> SplitResult<Arc<dyn Embedder>> {
    let dims = config.embedding.dimensions;
    match config.embedding.provider.as_str() {
        "ollama" => Ok(Arc::new(OllamaEmbedder::from_config(&config.ollama, dims))),
        "openai" => OpenAiEmbedder::from_config(&config.openai, dims)
            .map(|e| Arc::new(e) as Arc<dyn Embedder>)
            .ok_or_else(|| {
                SplitError::ModelUnavailable("openai provider selected but OPENAI_API_KEY is not set".into())
            }),
        "hashing" => Ok(Arc::new(HashingEmbedder::new(dims))),
        other => Err(SplitError::ModelUnavailable(format!(
            "unknown embedding provider '{other}' (expected ollama, openai or hashing)"
        ))),
    }
}

/// Embed a probe sentence so an unreachable or misconfigured model fails at
/// startup instead of on the first request.
pub async fn warm_up(embedder: &dyn Embedder) -> SplitResult<()> {
    let probe = ["Warm-up sentence for the embedding model."];
    let vectors = embedder.embed_batch(&probe).await.map_err(|e| {
        SplitError::ModelUnavailable(format!("{} embedder warm-up failed: {e}", embedder.provider()))
    })?;
    match vectors.first() {
        Some(v) if vectors.len() == 1 && v.len() == embedder.dimensions() => {
            tracing::info!(
                provider = embedder.provider(),
                dims = v.len(),
                "embedding model ready"
            );
            Ok(())
        }
        Some(v) => Err(SplitError::ModelUnavailable(format!(
            "{} embedder returned {} vectors of width {} (expected 1 of width {})",
            embedder.provider(),
            vectors.len(),
            v.len(),
            embedder.dimensions()
        ))),
        None => Err(SplitError::ModelUnavailable(format!(
            "{} embedder returned no vectors",
            embedder.provider()
        ))),
    }
}
