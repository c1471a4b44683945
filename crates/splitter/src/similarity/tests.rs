//! Tests for profiles and breakpoint selection.

use chunkwise_core::{ProfileMode, Sentence, SimilarityOptions, SplitError, ThresholdPolicy};

use super::*;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

fn fixed(value: f64) -> ThresholdPolicy {
    ThresholdPolicy::Fixed { value }
}

fn sentences(n: usize) -> Vec<Sentence> {
    let source: String = (0..n).map(|i| format!("S{i}. ")).collect();
    let mut out = Vec::new();
    let mut offset = 0;
    for i in 0..n {
        let len = format!("S{i}. ").len();
        out.push(Sentence::from_span(&source, offset, offset + len));
        offset += len;
    }
    out
}

// ── Cosine and weights ──────────────────────────────────────────────

#[test]
fn cosine_basics() {
    assert!(close(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]), 1.0));
    assert!(close(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0));
    assert!(close(cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]), -1.0));
    assert!(close(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0));
}

#[test]
fn activation_weights_decrease() {
    let w = activation_weights(10);
    assert_eq!(w.len(), 10);
    assert!(w.windows(2).all(|p| p[0] > p[1]));
    assert!(w[0] > 0.99 && w[9] < 0.01);
    assert!(activation_weights(0).is_empty());
}

// ── Profile ─────────────────────────────────────────────────────────

#[test]
fn adjacent_profile_has_one_value_per_gap() {
    let emb = vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]];
    let p = profile(&emb, &SimilarityOptions::default()).unwrap();
    assert_eq!(p.len(), 2);
    assert!(close(p[0], 1.0));
    assert!(close(p[1], 0.0));
}

#[test]
fn short_inputs_have_empty_profile() {
    let opts = SimilarityOptions::default();
    assert!(profile(&[], &opts).unwrap().is_empty());
    assert!(profile(&[vec![1.0, 2.0]], &opts).unwrap().is_empty());
}

#[test]
fn mismatched_widths_fail() {
    let emb = vec![vec![1.0, 0.0], vec![1.0]];
    let err = profile(&emb, &SimilarityOptions::default()).unwrap_err();
    assert!(matches!(err, SplitError::EmbeddingFailure(_)));
}

#[test]
fn activated_reach_one_matches_adjacent() {
    let emb = vec![vec![1.0, 0.2], vec![0.3, 1.0], vec![0.9, 0.1], vec![0.5, 0.5]];
    let adjacent = profile(&emb, &SimilarityOptions::default()).unwrap();
    let activated = profile(
        &emb,
        &SimilarityOptions {
            mode: ProfileMode::Activated { reach: 1 },
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(adjacent.len(), activated.len());
    for (a, b) in adjacent.iter().zip(&activated) {
        assert!(close(*a, *b));
    }
}

#[test]
fn activated_profile_looks_ahead() {
    // Sentence 0 is identical to 2 but orthogonal to 1.
    let emb = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]];
    let opts = SimilarityOptions {
        mode: ProfileMode::Activated { reach: 2 },
        ..Default::default()
    };
    let p = profile(&emb, &opts).unwrap();
    assert_eq!(p.len(), 2);
    // Gap 0 mixes cos(0,1)=0 and cos(0,2)=1, weighted toward the nearer one.
    assert!(p[0] > 0.0 && p[0] < 0.5, "p[0] = {}", p[0]);
    // Gap 1 only has one neighbour left and normalises by its weight.
    assert!(close(p[1], 0.0));
}

#[test]
fn smoothing_is_centered_and_truncated() {
    let values = [1.0, 2.0, 3.0, 4.0];
    assert_eq!(smooth(&values, 1), values.to_vec());
    let s3 = smooth(&values, 3);
    assert!(close(s3[0], 1.5));
    assert!(close(s3[1], 2.0));
    assert!(close(s3[3], 3.5));
    // Even windows lean right: [i, i + 1].
    let s2 = smooth(&values, 2);
    assert!(close(s2[0], 1.5));
    assert!(close(s2[3], 4.0));
    assert!(smooth(&[], 5).is_empty());
}

#[test]
fn profile_applies_smoothing() {
    let emb = vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0], vec![0.0, 1.0]];
    let opts = SimilarityOptions {
        smoothing_window: 3,
        ..Default::default()
    };
    let p = profile(&emb, &opts).unwrap();
    assert!(close(p[0], 0.5));
    assert!(close(p[1], 2.0 / 3.0));
    assert!(close(p[2], 0.5));
}

// ── Selection ───────────────────────────────────────────────────────

#[test]
fn single_dip_gives_single_breakpoint() {
    let p = [0.90, 0.85, 0.20, 0.88];
    let sel = select(&p, 1, &ThresholdPolicy::default());
    assert_eq!(sel.breakpoints, vec![2]);
    let t = sel.threshold.unwrap();
    assert!(t > 0.20 && t < 0.85);

    let chunks = chunks_from_breakpoints(&sentences(5), &sel.breakpoints);
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].sentence_count(), 3);
    assert_eq!(chunks[1].sentence_count(), 2);
}

#[test]
fn empty_profile_selects_nothing() {
    let sel = select(&[], 1, &ThresholdPolicy::default());
    assert!(sel.breakpoints.is_empty());
    assert!(sel.threshold.is_none());
}

#[test]
fn minima_must_be_strict() {
    // A flat valley has no strict minimum.
    let p = [0.9, 0.2, 0.2, 0.9];
    assert!(select(&p, 1, &fixed(0.5)).breakpoints.is_empty());
}

#[test]
fn edges_count_as_satisfied() {
    let p = [0.1, 0.9, 0.8, 0.05];
    assert_eq!(select(&p, 1, &fixed(0.5)).breakpoints, vec![0, 3]);
}

#[test]
fn values_at_threshold_are_not_candidates() {
    let p = [0.9, 0.5, 0.9];
    assert!(select(&p, 1, &fixed(0.5)).breakpoints.is_empty());
    assert_eq!(select(&p, 1, &fixed(0.51)).breakpoints, vec![1]);
}

#[test]
fn min_distance_keeps_deeper_minimum() {
    let p = [0.9, 0.3, 0.9, 0.1, 0.9];
    assert_eq!(select(&p, 1, &fixed(0.5)).breakpoints, vec![1, 3]);
    assert_eq!(select(&p, 3, &fixed(0.5)).breakpoints, vec![3]);
}

#[test]
fn equal_depth_prefers_earlier_gap() {
    let p = [0.9, 0.2, 0.9, 0.2, 0.9];
    assert_eq!(select(&p, 3, &fixed(0.5)).breakpoints, vec![1]);
}

#[test]
fn min_distance_holds_pairwise() {
    let p = [0.5, 0.1, 0.6, 0.2, 0.7, 0.15, 0.8, 0.3, 0.9, 0.05, 0.6];
    let min = 3;
    let sel = select(&p, min, &fixed(0.4));
    for pair in sel.breakpoints.windows(2) {
        assert!(pair[1] - pair[0] >= min, "{pair:?}");
    }
    assert!(sel.breakpoints.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn wider_order_needs_wider_valley() {
    let p = [0.9, 0.4, 0.8, 0.3, 0.85, 0.9];
    assert_eq!(select_with_order(&p, 1, &fixed(0.5), 1).breakpoints, vec![1, 3]);
    assert_eq!(select_with_order(&p, 1, &fixed(0.5), 2).breakpoints, vec![3]);
}

#[test]
fn percentile_policy_selects_lowest_dips() {
    let p = [0.8, 0.3, 0.85, 0.6, 0.9, 0.7, 0.95];
    let sel = select(&p, 1, &ThresholdPolicy::Percentile { percentile: 10.0 });
    assert_eq!(sel.breakpoints, vec![1]);
}

// ── Materialisation ─────────────────────────────────────────────────

#[test]
fn chunks_partition_sentences() {
    let s = sentences(6);
    let chunks = chunks_from_breakpoints(&s, &[0, 3]);
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].text, "S0. ");
    assert_eq!(chunks[1].text, "S1. S2. S3. ");
    assert_eq!(chunks[2].text, "S4. S5. ");
    let joined: String = chunks.iter().map(|c| c.text.as_str()).collect();
    let original: String = s.iter().map(|x| x.text.as_str()).collect();
    assert_eq!(joined, original);
    assert!(chunks.iter().all(|c| c.overlap_sentences == 0));
}

#[test]
fn no_breakpoints_single_chunk() {
    let chunks = chunks_from_breakpoints(&sentences(3), &[]);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].sentence_count(), 3);
    assert!(chunks_from_breakpoints(&[], &[]).is_empty());
}
