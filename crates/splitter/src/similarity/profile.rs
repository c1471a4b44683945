use chunkwise_core::{ProfileMode, SimilarityOptions, SplitError, SplitResult};

/// Cosine similarity of two equal-length vectors. Zero when either is zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        dot += x as f64 * y as f64;
        norm_a += x as f64 * x as f64;
        norm_b += y as f64 * y as f64;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())) as f32
}

/// Reversed-sigmoid weights `1 / (1 + e^(0.5x))` over `reach` points spread
/// evenly across `[-10, 10]`. Nearer sentences weigh more.
pub fn activation_weights(reach: usize) -> Vec<f64> {
    let xs: Vec<f64> = match reach {
        0 => Vec::new(),
        1 => vec![-10.0],
        n => (0..n)
            .map(|i| -10.0 + 20.0 * i as f64 / (n - 1) as f64)
            .collect(),
    };
    xs.into_iter().map(|x| 1.0 / (1.0 + (0.5 * x).exp())).collect()
}

fn adjacent(embeddings: &[Vec<f32>]) -> Vec<f32> {
    embeddings
        .windows(2)
        .map(|pair| cosine_similarity(&pair[0], &pair[1]))
        .collect()
}

/// Weighted similarity of each sentence to the next `reach` sentences,
/// normalised by the weights actually used near the end of the document.
fn activated(embeddings: &[Vec<f32>], reach: usize) -> Vec<f32> {
    let weights = activation_weights(reach);
    let n = embeddings.len();
    (0..n.saturating_sub(1))
        .map(|i| {
            let mut acc = 0.0f64;
            let mut total = 0.0f64;
            for (d, w) in weights.iter().enumerate() {
                let j = i + d + 1;
                if j >= n {
                    break;
                }
                acc += w * cosine_similarity(&embeddings[i], &embeddings[j]) as f64;
                total += w;
            }
            if total > 0.0 {
                (acc / total) as f32
            } else {
                0.0
            }
        })
        .collect()
}

/// Centered moving average, truncated at the sequence edges.
///
/// Position `i` averages `values[i - (w-1)/2 ..= i + w/2]` clipped to the
/// valid range, so the output length matches the input.
pub fn smooth(values: &[f32], window: usize) -> Vec<f32> {
    if window <= 1 || values.is_empty() {
        return values.to_vec();
    }
    let left = (window - 1) / 2;
    let right = window / 2;
    (0..values.len())
        .map(|i| {
            let lo = i.saturating_sub(left);
            let hi = (i + right).min(values.len() - 1);
            let slice = &values[lo..=hi];
            (slice.iter().map(|&v| v as f64).sum::<f64>() / slice.len() as f64) as f32
        })
        .collect()
}

/// Build the (smoothed) similarity profile for a sentence embedding sequence.
///
/// Returns `embeddings.len() - 1` values, or nothing for fewer than two
/// sentences.
pub fn profile(embeddings: &[Vec<f32>], options: &SimilarityOptions) -> SplitResult<Vec<f32>> {
    if let Some(first) = embeddings.first() {
        if let Some((i, bad)) = embeddings
            .iter()
            .enumerate()
            .find(|(_, e)| e.len() != first.len())
        {
            return Err(SplitError::EmbeddingFailure(format!(
                "embedding {i} has {} dimensions, expected {}",
                bad.len(),
                first.len()
            )));
        }
    }

    let raw = match options.mode {
        ProfileMode::Adjacent => adjacent(embeddings),
        ProfileMode::Activated { reach } => activated(embeddings, reach),
    };
    if raw.iter().any(|v| !v.is_finite()) {
        return Err(SplitError::EmbeddingFailure(
            "similarity profile contains non-finite values".into(),
        ));
    }
    Ok(smooth(&raw, options.smoothing_window))
}
