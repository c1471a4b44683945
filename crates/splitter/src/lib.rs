//! Sentence-aware text splitting.
//!
//! Two paths share one segmentation step: [`Splitter::split_by_size`] packs
//! sentences into size-bounded, overlapping chunks, and
//! [`Splitter::split_by_similarity`] cuts where neighbouring sentence
//! embeddings stop resembling each other.

pub mod chunker;
pub mod embedding;
pub mod segment;
pub mod similarity;
mod splitter;

pub use splitter::{SimilaritySplit, Splitter};
