use async_trait::async_trait;
use thiserror::Error;

use chunkwise_core::SplitError;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Count mismatch: sent {expected} texts, got {actual} vectors")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Vector {index} contains a non-finite component")]
    NonFinite { index: usize },
}

impl From<EmbeddingError> for SplitError {
    fn from(e: EmbeddingError) -> Self {
        SplitError::EmbeddingFailure(e.to_string())
    }
}

/// Trait for embedding backends (Ollama, OpenAI, local hashing).
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, returning one vector per input text (in order).
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// The dimensionality of the output vectors.
    fn dimensions(&self) -> usize;

    /// Provider label for logs and health output.
    fn provider(&self) -> &str;
}
