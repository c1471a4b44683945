use serde::{Deserialize, Serialize};

/// Index into a document's sentence sequence.
pub type SentenceIndex = usize;

/// A sentence span over the original document.
///
/// Offsets are UTF-8 byte offsets into the source text; `text` is exactly
/// `source[start_offset..end_offset]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub start_offset: usize,
    pub end_offset: usize,
    pub text: String,
}

impl Sentence {
    /// Build a sentence from a byte range of `source`.
    ///
    /// The range must fall on `char` boundaries.
    pub fn from_span(source: &str, start_offset: usize, end_offset: usize) -> Self {
        Self {
            start_offset,
            end_offset,
            text: source[start_offset..end_offset].to_string(),
        }
    }

    /// True when the span holds only whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// An ordered run of sentences emitted as one unit of output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// 0-based position within the output.
    pub index: usize,
    /// Chunk text: the concatenation of its sentences.
    pub text: String,
    /// Byte offset of the first sentence in the original document.
    pub start_offset: usize,
    /// Byte offset one past the last sentence.
    pub end_offset: usize,
    /// Index of the first sentence (inclusive).
    pub first_sentence: SentenceIndex,
    /// Index of the last sentence (inclusive).
    pub last_sentence: SentenceIndex,
    /// Leading sentences repeated from the previous chunk.
    pub overlap_sentences: usize,
}

impl Chunk {
    /// Build a chunk from a non-empty, contiguous run of sentences.
    pub fn from_sentences(
        index: usize,
        sentences: &[Sentence],
        first_sentence: SentenceIndex,
        overlap_sentences: usize,
    ) -> Self {
        let text: String = sentences.iter().map(|s| s.text.as_str()).collect();
        let start_offset = sentences.first().map(|s| s.start_offset).unwrap_or(0);
        let end_offset = sentences.last().map(|s| s.end_offset).unwrap_or(start_offset);
        Self {
            index,
            text,
            start_offset,
            end_offset,
            first_sentence,
            last_sentence: first_sentence + sentences.len().saturating_sub(1),
            overlap_sentences,
        }
    }

    /// Number of sentences in the chunk.
    pub fn sentence_count(&self) -> usize {
        self.last_sentence - self.first_sentence + 1
    }
}
