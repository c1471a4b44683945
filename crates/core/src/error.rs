use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SplitError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Sentence segmentation failed: {0}")]
    SegmentationFailure(String),

    #[error("Embedding failed: {0}")]
    EmbeddingFailure(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
}

impl SplitError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        SplitError::InvalidParameter(msg.into())
    }

    /// Stable label for logs and API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            SplitError::InvalidParameter(_) => "invalid_parameter",
            SplitError::SegmentationFailure(_) => "segmentation_failure",
            SplitError::EmbeddingFailure(_) => "embedding_failure",
            SplitError::ModelUnavailable(_) => "model_unavailable",
        }
    }
}

pub type SplitResult<T> = Result<T, SplitError>;
