//! Split options and breakpoint threshold policies.

use serde::{Deserialize, Serialize};

use crate::error::{SplitError, SplitResult};

// ── Length metric ───────────────────────────────────────────────────────────

/// How the length of a sentence or chunk is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthMetric {
    /// Unicode scalar values.
    #[default]
    Chars,
    /// Whitespace-separated tokens.
    Words,
}

impl LengthMetric {
    pub fn measure(&self, text: &str) -> usize {
        match self {
            LengthMetric::Chars => text.chars().count(),
            LengthMetric::Words => text.split_whitespace().count(),
        }
    }
}

impl std::str::FromStr for LengthMetric {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chars" => Ok(LengthMetric::Chars),
            "words" => Ok(LengthMetric::Words),
            other => Err(SplitError::invalid(format!(
                "unknown length metric '{other}' (expected 'chars' or 'words')"
            ))),
        }
    }
}

// ── Size path ───────────────────────────────────────────────────────────────

/// Options for the size/overlap-bounded packer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeOptions {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    #[serde(default)]
    pub metric: LengthMetric,
}

impl SizeOptions {
    /// Validate raw (possibly negative) request values.
    pub fn new(chunk_size: i64, chunk_overlap: i64) -> SplitResult<Self> {
        if chunk_size <= 0 {
            return Err(SplitError::invalid(format!(
                "chunk_size must be > 0 (got {chunk_size})"
            )));
        }
        if chunk_overlap < 0 {
            return Err(SplitError::invalid(format!(
                "chunk_overlap must be >= 0 (got {chunk_overlap})"
            )));
        }
        let options = Self {
            chunk_size: chunk_size as usize,
            chunk_overlap: chunk_overlap as usize,
            metric: LengthMetric::default(),
        };
        options.validate()?;
        Ok(options)
    }

    pub fn with_metric(mut self, metric: LengthMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn validate(&self) -> SplitResult<()> {
        if self.chunk_size == 0 {
            return Err(SplitError::invalid("chunk_size must be > 0"));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(SplitError::invalid(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

impl Default for SizeOptions {
    fn default() -> Self {
        Self {
            chunk_size: 4000,
            chunk_overlap: 200,
            metric: LengthMetric::Chars,
        }
    }
}

// ── Threshold policy ────────────────────────────────────────────────────────

/// How the breakpoint threshold is derived from a similarity profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ThresholdPolicy {
    /// `mean - k * stddev` (population stddev).
    StdDev { k: f64 },
    /// Linear-interpolated percentile of the profile, in `[0, 100]`.
    Percentile { percentile: f64 },
    /// A fixed cutoff.
    Fixed { value: f64 },
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        ThresholdPolicy::StdDev { k: 1.0 }
    }
}

impl ThresholdPolicy {
    pub fn validate(&self) -> SplitResult<()> {
        match *self {
            ThresholdPolicy::StdDev { k } if !k.is_finite() => {
                Err(SplitError::invalid("threshold k must be finite"))
            }
            ThresholdPolicy::Percentile { percentile }
                if !(0.0..=100.0).contains(&percentile) =>
            {
                Err(SplitError::invalid(format!(
                    "percentile must be within [0, 100] (got {percentile})"
                )))
            }
            ThresholdPolicy::Fixed { value } if !value.is_finite() => {
                Err(SplitError::invalid("fixed threshold must be finite"))
            }
            _ => Ok(()),
        }
    }

    /// Compute the scalar threshold for `profile`. `None` for an empty profile.
    pub fn threshold(&self, profile: &[f32]) -> Option<f64> {
        if profile.is_empty() {
            return None;
        }
        let values: Vec<f64> = profile.iter().map(|&v| v as f64).collect();
        Some(match *self {
            ThresholdPolicy::StdDev { k } => {
                let n = values.len() as f64;
                let mean = values.iter().sum::<f64>() / n;
                let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
                mean - k * variance.sqrt()
            }
            ThresholdPolicy::Percentile { percentile } => percentile_of(&values, percentile),
            ThresholdPolicy::Fixed { value } => value,
        })
    }
}

/// Linear interpolation between closest ranks.
fn percentile_of(values: &[f64], percentile: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = percentile.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

// ── Semantic path ───────────────────────────────────────────────────────────

/// How gap similarities are derived from sentence embeddings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ProfileMode {
    /// Cosine similarity of each adjacent pair.
    #[default]
    Adjacent,
    /// Reversed-sigmoid weighted similarity to the next `reach` sentences.
    Activated { reach: usize },
}

/// Options for the similarity-based splitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityOptions {
    /// Centered moving-average width; 1 disables smoothing.
    pub smoothing_window: usize,
    /// Minimum distance, in sentences, between two breakpoints.
    pub min_chunk_sentences: usize,
    pub threshold: ThresholdPolicy,
    /// Neighbours on each side a local minimum must be lower than.
    pub order: usize,
    pub mode: ProfileMode,
}

impl Default for SimilarityOptions {
    fn default() -> Self {
        Self {
            smoothing_window: 1,
            min_chunk_sentences: 1,
            threshold: ThresholdPolicy::default(),
            order: 1,
            mode: ProfileMode::Adjacent,
        }
    }
}

impl SimilarityOptions {
    pub fn validate(&self) -> SplitResult<()> {
        if self.smoothing_window == 0 {
            return Err(SplitError::invalid("smoothing_window must be >= 1"));
        }
        if self.min_chunk_sentences == 0 {
            return Err(SplitError::invalid("min_chunk_sentences must be >= 1"));
        }
        if self.order == 0 {
            return Err(SplitError::invalid("order must be >= 1"));
        }
        if let ProfileMode::Activated { reach: 0 } = self.mode {
            return Err(SplitError::invalid("activation reach must be >= 1"));
        }
        self.threshold.validate()
    }
}
