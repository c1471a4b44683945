//! Size/overlap-bounded chunk assembly.
//!
//! Packs whole sentences greedily into chunks no longer than `chunk_size`,
//! carrying a trailing run of sentences (at most `chunk_overlap` long) into
//! the next chunk. Sentences are never split, so a single sentence longer
//! than `chunk_size` becomes a chunk of its own.

mod assembler;

pub use assembler::{assemble, overlap_seed};
