use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};

use chunkwise_core::Sentence;

use super::traits::{Embedder, EmbeddingError};

/// Splits a sentence sequence into provider-sized batches and checks every
/// response against the request.
pub struct EmbeddingBatcher {
    embedder: Arc<dyn Embedder>,
    batch_size: usize,
    concurrency: usize,
}

impl EmbeddingBatcher {
    pub fn new(embedder: Arc<dyn Embedder>, batch_size: usize) -> Self {
        Self {
            embedder,
            batch_size: batch_size.max(1),
            concurrency: 1,
        }
    }

    /// Number of batches allowed in flight at once. Output order is unaffected.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// One embedding per sentence, in sentence order.
    pub async fn embed_sentences(
        &self,
        sentences: &[Sentence],
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let texts: Vec<&str> = sentences.iter().map(|s| s.text.as_str()).collect();
        self.embed_texts(&texts).await
    }

    pub async fn embed_texts(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let expected_dims = self.embedder.dimensions();

        let requests: Vec<_> = texts
            .chunks(self.batch_size)
            .map(|batch| self.embed_checked(batch, expected_dims))
            .collect();
        let batches: Vec<Vec<Vec<f32>>> = stream::iter(requests)
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let embeddings: Vec<Vec<f32>> = batches.into_iter().flatten().collect();
        if let Some(index) = embeddings
            .iter()
            .position(|v| v.iter().any(|x| !x.is_finite()))
        {
            return Err(EmbeddingError::NonFinite { index });
        }
        tracing::debug!(
            texts = texts.len(),
            batch_size = self.batch_size,
            dims = expected_dims,
            "embedded sentences"
        );
        Ok(embeddings)
    }

    async fn embed_checked(
        &self,
        batch: &[&str],
        expected_dims: usize,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let vectors = self.embedder.embed_batch(batch).await?;
        if vectors.len() != batch.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: batch.len(),
                actual: vectors.len(),
            });
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != expected_dims) {
            return Err(EmbeddingError::DimensionMismatch {
                expected: expected_dims,
                actual: bad.len(),
            });
        }
        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeEmbedder {
        call_count: AtomicUsize,
        dims: usize,
        drop_last: bool,
    }

    impl FakeEmbedder {
        fn new(dims: usize) -> Self {
            Self {
                call_count: AtomicUsize::new(0),
                dims,
                drop_last: false,
            }
        }
    }

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            let mut out: Vec<Vec<f32>> = texts
                .iter()
                .map(|t| vec![t.len() as f32; self.dims])
                .collect();
            if self.drop_last {
                out.pop();
            }
            Ok(out)
        }

        fn dimensions(&self) -> usize {
            self.dims
        }

        fn provider(&self) -> &str {
            "fake"
        }
    }

    struct WrongDims;

    #[async_trait]
    impl Embedder for WrongDims {
        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(texts.iter().map(|_| vec![1.0; 3]).collect())
        }

        fn dimensions(&self) -> usize {
            4
        }

        fn provider(&self) -> &str {
            "wrong-dims"
        }
    }

    #[tokio::test]
    async fn batches_by_size_and_keeps_order() {
        let embedder = Arc::new(FakeEmbedder::new(2));
        let batcher = EmbeddingBatcher::new(embedder.clone(), 2).with_concurrency(3);

        let out = batcher.embed_texts(&["a", "bb", "ccc", "dddd", "eeeee"]).await.unwrap();
        assert_eq!(out.len(), 5);
        let firsts: Vec<f32> = out.iter().map(|v| v[0]).collect();
        assert_eq!(firsts, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(embedder.call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn empty_input_skips_provider() {
        let embedder = Arc::new(FakeEmbedder::new(4));
        let batcher = EmbeddingBatcher::new(embedder.clone(), 10);

        assert!(batcher.embed_sentences(&[]).await.unwrap().is_empty());
        assert_eq!(embedder.call_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn short_response_is_count_mismatch() {
        let embedder = Arc::new(FakeEmbedder {
            drop_last: true,
            ..FakeEmbedder::new(4)
        });
        let batcher = EmbeddingBatcher::new(embedder, 8);

        let err = batcher.embed_texts(&["a", "b"]).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::CountMismatch { expected: 2, actual: 1 }));
    }

    #[tokio::test]
    async fn wrong_width_is_dimension_mismatch() {
        let batcher = EmbeddingBatcher::new(Arc::new(WrongDims), 8);
        let err = batcher.embed_texts(&["a"]).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::DimensionMismatch { expected: 4, actual: 3 }));
    }

    #[tokio::test]
    async fn zero_batch_size_is_clamped() {
        let embedder = Arc::new(FakeEmbedder::new(1));
        let batcher = EmbeddingBatcher::new(embedder.clone(), 0);
        assert_eq!(batcher.embed_texts(&["a", "b"]).await.unwrap().len(), 2);
        assert_eq!(embedder.call_count.load(Ordering::SeqCst), 2);
    }
}
