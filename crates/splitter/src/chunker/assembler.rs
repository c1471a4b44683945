use std::ops::Range;

use chunkwise_core::{Chunk, Sentence, SizeOptions, SplitResult};

// ── Buffer ──────────────────────────────────────────────────────────────────

/// The chunk being filled: a contiguous run of sentence indices.
struct Buffer {
    range: Range<usize>,
    len: usize,
    overlap: usize,
}

impl Buffer {
    fn start_at(index: usize, len: usize) -> Self {
        Self {
            range: index..index + 1,
            len,
            overlap: 0,
        }
    }

    fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

fn emit(chunks: &mut Vec<Chunk>, sentences: &[Sentence], range: Range<usize>, overlap: usize) {
    let chunk = Chunk::from_sentences(chunks.len(), &sentences[range.clone()], range.start, overlap);
    chunks.push(chunk);
}

// ── Assembly ────────────────────────────────────────────────────────────────

/// Start index of the longest trailing run of `lengths[range]` whose total
/// is at most `overlap`, with that total. Returns `range.end` when nothing
/// fits.
pub fn overlap_seed(lengths: &[usize], range: Range<usize>, overlap: usize) -> (usize, usize) {
    let mut start = range.end;
    let mut total = 0usize;
    if overlap == 0 {
        return (start, total);
    }
    while start > range.start {
        let len = lengths[start - 1];
        if total + len > overlap {
            break;
        }
        total += len;
        start -= 1;
    }
    (start, total)
}

/// Pack `sentences` into size-bounded chunks with sentence-level overlap.
///
/// Chunk text is the exact concatenation of its sentences.
pub fn assemble(sentences: &[Sentence], options: &SizeOptions) -> SplitResult<Vec<Chunk>> {
    options.validate()?;

    let lengths: Vec<usize> = sentences
        .iter()
        .map(|s| options.metric.measure(&s.text))
        .collect();
    let mut chunks = Vec::new();
    let mut buf = Buffer {
        range: 0..0,
        len: 0,
        overlap: 0,
    };

    for (i, &len) in lengths.iter().enumerate() {
        if buf.is_empty() {
            buf = Buffer::start_at(i, len);
            continue;
        }
        if buf.len + len <= options.chunk_size {
            buf.range.end = i + 1;
            buf.len += len;
            continue;
        }

        emit(&mut chunks, sentences, buf.range.clone(), buf.overlap);
        let closed = buf.range.clone();
        let (seed_start, seed_len) = overlap_seed(&lengths, closed.clone(), options.chunk_overlap);

        if seed_start < closed.end && seed_len + len <= options.chunk_size {
            buf = Buffer {
                range: seed_start..i + 1,
                len: seed_len + len,
                overlap: i - seed_start,
            };
            continue;
        }

        // The seed cannot host the pending sentence. It still goes out as
        // its own chunk unless it is the whole chunk just emitted.
        if seed_start < closed.end && seed_start > closed.start {
            emit(&mut chunks, sentences, seed_start..closed.end, closed.end - seed_start);
        }
        buf = Buffer::start_at(i, len);
    }

    if !buf.is_empty() {
        emit(&mut chunks, sentences, buf.range.clone(), buf.overlap);
    }

    tracing::debug!(
        sentences = sentences.len(),
        chunks = chunks.len(),
        chunk_size = options.chunk_size,
        chunk_overlap = options.chunk_overlap,
        "assembled size-bounded chunks"
    );
    Ok(chunks)
}
