use serde::{Deserialize, Serialize};

use chunkwise_core::{Chunk, Sentence, SentenceIndex, ThresholdPolicy};

/// Selected breakpoints and the threshold that produced them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BreakpointSelection {
    /// Gap indices, strictly increasing. Breakpoint `b` ends a chunk after
    /// sentence `b`.
    pub breakpoints: Vec<SentenceIndex>,
    /// `None` when the profile is empty.
    pub threshold: Option<f64>,
}

/// Select breakpoints with the default local-minimum order of 1.
pub fn select(
    profile: &[f32],
    min_chunk_sentences: usize,
    policy: &ThresholdPolicy,
) -> BreakpointSelection {
    select_with_order(profile, min_chunk_sentences, policy, 1)
}

fn is_local_minimum(profile: &[f32], i: usize, order: usize) -> bool {
    let lo = i.saturating_sub(order);
    let hi = (i + order).min(profile.len() - 1);
    (lo..=hi).all(|j| j == i || profile[i] < profile[j])
}

/// Local minima below the policy threshold, thinned so that accepted
/// breakpoints are at least `min_chunk_sentences` apart. Deeper minima win;
/// equal values favour the earlier gap.
pub fn select_with_order(
    profile: &[f32],
    min_chunk_sentences: usize,
    policy: &ThresholdPolicy,
    order: usize,
) -> BreakpointSelection {
    let Some(threshold) = policy.threshold(profile) else {
        return BreakpointSelection::default();
    };
    let order = order.max(1);

    let mut candidates: Vec<usize> = (0..profile.len())
        .filter(|&i| (profile[i] as f64) < threshold && is_local_minimum(profile, i, order))
        .collect();
    candidates.sort_by(|&a, &b| profile[a].total_cmp(&profile[b]).then(a.cmp(&b)));

    let mut accepted: Vec<usize> = Vec::with_capacity(candidates.len());
    for c in candidates {
        if accepted.iter().all(|&b| b.abs_diff(c) >= min_chunk_sentences) {
            accepted.push(c);
        }
    }
    accepted.sort_unstable();
    accepted.dedup();

    tracing::debug!(
        gaps = profile.len(),
        threshold,
        breakpoints = accepted.len(),
        "selected breakpoints"
    );
    BreakpointSelection {
        breakpoints: accepted,
        threshold: Some(threshold),
    }
}

/// Partition `sentences` at `breakpoints`.
///
/// Breakpoints must be strictly increasing and below `sentences.len() - 1`;
/// anything else is skipped. Yields `breakpoints.len() + 1` chunks for a
/// non-empty sentence list.
pub fn chunks_from_breakpoints(sentences: &[Sentence], breakpoints: &[SentenceIndex]) -> Vec<Chunk> {
    if sentences.is_empty() {
        return Vec::new();
    }
    let mut chunks = Vec::with_capacity(breakpoints.len() + 1);
    let mut start = 0usize;
    for &b in breakpoints {
        if b < start || b + 1 >= sentences.len() {
            continue;
        }
        chunks.push(Chunk::from_sentences(chunks.len(), &sentences[start..=b], start, 0));
        start = b + 1;
    }
    chunks.push(Chunk::from_sentences(chunks.len(), &sentences[start..], start, 0));
    chunks
}
