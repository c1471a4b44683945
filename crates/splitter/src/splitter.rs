//! Request-level entry points for both splitting paths.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use chunkwise_core::{
    Chunk, Sentence, SentenceIndex, SimilarityOptions, SizeOptions, SplitResult,
};

use crate::chunker::assemble;
use crate::embedding::{Embedder, EmbeddingBatcher};
use crate::segment::{merge_blank_spans, validate_spans, SentenceSegmenter};
use crate::similarity::{chunks_from_breakpoints, profile, select_with_order};

/// Output of the semantic path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimilaritySplit {
    pub chunks: Vec<Chunk>,
    /// Smoothed gap similarities, one per adjacent sentence pair.
    pub profile: Vec<f32>,
    pub breakpoints: Vec<SentenceIndex>,
    pub threshold: Option<f64>,
}

impl SimilaritySplit {
    pub fn texts(&self) -> Vec<String> {
        self.chunks.iter().map(|c| c.text.clone()).collect()
    }
}

/// Shared, read-only model handles plus the splitting algorithms.
///
/// Cheap to clone and safe to share across concurrent requests; every call
/// keeps its state on the stack.
#[derive(Clone)]
pub struct Splitter {
    segmenter: Arc<dyn SentenceSegmenter>,
    embedder: Arc<dyn Embedder>,
    batch_size: usize,
    concurrency: usize,
}

impl Splitter {
    pub fn new(segmenter: Arc<dyn SentenceSegmenter>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            segmenter,
            embedder,
            batch_size: 64,
            concurrency: 1,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn segmenter(&self) -> &dyn SentenceSegmenter {
        self.segmenter.as_ref()
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    /// Segment `text`, check the spans tile it and fold whitespace-only
    /// spans (paragraph breaks) into their neighbours.
    pub fn sentences(&self, text: &str) -> SplitResult<Vec<Sentence>> {
        let sentences = self.segmenter.segment(text)?;
        validate_spans(text, &sentences)?;
        Ok(merge_blank_spans(sentences))
    }

    /// Size-bounded split with raw request parameters.
    pub fn split_by_size(
        &self,
        text: &str,
        chunk_size: i64,
        chunk_overlap: i64,
    ) -> SplitResult<Vec<String>> {
        let options = SizeOptions::new(chunk_size, chunk_overlap)?;
        let chunks = self.split_by_size_with(text, &options)?;
        Ok(chunks.into_iter().map(|c| c.text).collect())
    }

    #[instrument(skip_all, fields(bytes = text.len(), chunk_size = options.chunk_size))]
    pub fn split_by_size_with(&self, text: &str, options: &SizeOptions) -> SplitResult<Vec<Chunk>> {
        options.validate()?;
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let sentences = self.sentences(text)?;
        let chunks = assemble(&sentences, options)?;
        debug!(sentences = sentences.len(), chunks = chunks.len(), "size split done");
        Ok(chunks)
    }

    #[instrument(skip_all, fields(bytes = text.len(), provider = self.embedder.provider()))]
    pub async fn split_by_similarity(
        &self,
        text: &str,
        options: &SimilarityOptions,
    ) -> SplitResult<SimilaritySplit> {
        options.validate()?;
        if text.is_empty() {
            return Ok(SimilaritySplit::default());
        }
        let sentences = self.sentences(text)?;
        if sentences.len() < 2 {
            return Ok(SimilaritySplit {
                chunks: chunks_from_breakpoints(&sentences, &[]),
                ..Default::default()
            });
        }

        let embeddings = EmbeddingBatcher::new(self.embedder.clone(), self.batch_size)
            .with_concurrency(self.concurrency)
            .embed_sentences(&sentences)
            .await?;
        let profile = profile(&embeddings, options)?;
        let selection = select_with_order(
            &profile,
            options.min_chunk_sentences,
            &options.threshold,
            options.order,
        );
        let chunks = chunks_from_breakpoints(&sentences, &selection.breakpoints);

        debug!(
            sentences = sentences.len(),
            breakpoints = selection.breakpoints.len(),
            chunks = chunks.len(),
            "similarity split done"
        );
        Ok(SimilaritySplit {
            chunks,
            profile,
            breakpoints: selection.breakpoints,
            threshold: selection.threshold,
        })
    }
}
