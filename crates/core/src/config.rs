use std::env;

use serde::{Deserialize, Serialize};

use crate::error::SplitError;
use crate::options::{LengthMetric, ProfileMode, SimilarityOptions, SizeOptions, ThresholdPolicy};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_parse<T: std::str::FromStr>(profile: &str, key: &str, default: T) -> T {
    match profiled_env_opt(profile, key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "unparseable config value, using default");
            default
        }),
        None => default,
    }
}

fn profiled_env_bool(profile: &str, key: &str, default: bool) -> bool {
    match profiled_env_opt(profile, key) {
        Some(v) => matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        None => default,
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub split: SplitConfig,
    pub embedding: EmbeddingConfig,
    pub ollama: OllamaConfig,
    pub openai: OpenAiConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `CHUNKWISE_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("CHUNKWISE_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            server: ServerConfig::from_env_profiled(p),
            split: SplitConfig::from_env_profiled(p),
            embedding: EmbeddingConfig::from_env_profiled(p),
            ollama: OllamaConfig::from_env_profiled(p),
            openai: OpenAiConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:      {}:{}, timeout={}s", self.server.host, self.server.port, self.server.request_timeout_secs);
        tracing::info!(
            "  split:       chunk_size={}, chunk_overlap={}, segmenter={}",
            self.split.chunk_size, self.split.chunk_overlap, self.split.segmenter
        );
        tracing::info!(
            "  embedding:   provider={}, dimensions={}, batch_size={}",
            self.embedding.provider, self.embedding.dimensions, self.embedding.batch_size
        );
        tracing::info!("  ollama:      url={}, model={}", self.ollama.url, self.ollama.embedding_model);
        tracing::info!(
            "  openai:      base_url={}, key={}",
            self.openai.base_url,
            if self.openai.api_key.is_some() { "set" } else { "(none)" }
        );
    }

    /// Return a redacted view safe for API responses (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "server": { "host": self.server.host, "port": self.server.port },
            "split": {
                "chunk_size": self.split.chunk_size,
                "chunk_overlap": self.split.chunk_overlap,
                "segmenter": self.split.segmenter,
            },
            "embedding": {
                "provider": self.embedding.provider,
                "dimensions": self.embedding.dimensions,
                "batch_size": self.embedding.batch_size,
            },
            "ollama": { "url": self.ollama.url, "model": self.ollama.embedding_model },
            "openai": {
                "base_url": self.openai.base_url,
                "model": self.openai.embedding_model,
                "configured": self.openai.is_configured(),
            },
        })
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "HOST", "0.0.0.0"),
            port: profiled_env_parse(p, "PORT", 8000),
            cors_origin: profiled_env_or(p, "CORS_ORIGIN", "*"),
            request_timeout_secs: profiled_env_parse(p, "REQUEST_TIMEOUT_SECS", 120),
        }
    }
}

// ── Split defaults ────────────────────────────────────────────

/// Which threshold policy `THRESHOLD_VALUE` parameterises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdKind {
    #[default]
    StdDev,
    Percentile,
    Fixed,
}

impl std::str::FromStr for ThresholdKind {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stddev" | "std_dev" => Ok(ThresholdKind::StdDev),
            "percentile" => Ok(ThresholdKind::Percentile),
            "fixed" => Ok(ThresholdKind::Fixed),
            other => Err(SplitError::invalid(format!(
                "unknown threshold policy '{other}' (expected 'stddev', 'percentile' or 'fixed')"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub length_metric: LengthMetric,
    pub smoothing_window: usize,
    pub min_chunk_sentences: usize,
    pub threshold_policy: ThresholdKind,
    /// k, percentile or cutoff depending on `threshold_policy`.
    pub threshold_value: f64,
    pub minima_order: usize,
    /// 0 = adjacent profile, otherwise activated profile reach.
    pub activation_reach: usize,
    /// "unicode" or "rules"
    pub segmenter: String,
}

impl SplitConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            chunk_size: profiled_env_parse(p, "CHUNK_SIZE", 4000),
            chunk_overlap: profiled_env_parse(p, "CHUNK_OVERLAP", 200),
            length_metric: profiled_env_parse(p, "LENGTH_METRIC", LengthMetric::Chars),
            smoothing_window: profiled_env_parse(p, "SMOOTHING_WINDOW", 1),
            min_chunk_sentences: profiled_env_parse(p, "MIN_CHUNK_SENTENCES", 1),
            threshold_policy: profiled_env_parse(p, "THRESHOLD_POLICY", ThresholdKind::StdDev),
            threshold_value: profiled_env_parse(p, "THRESHOLD_VALUE", 1.0),
            minima_order: profiled_env_parse(p, "MINIMA_ORDER", 1),
            activation_reach: profiled_env_parse(p, "ACTIVATION_REACH", 0),
            segmenter: profiled_env_or(p, "SEGMENTER", "unicode"),
        }
    }

    /// Default size options (not validated; requests validate on use).
    pub fn size_options(&self) -> SizeOptions {
        SizeOptions {
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            metric: self.length_metric,
        }
    }

    pub fn threshold(&self) -> ThresholdPolicy {
        match self.threshold_policy {
            ThresholdKind::StdDev => ThresholdPolicy::StdDev { k: self.threshold_value },
            ThresholdKind::Percentile => ThresholdPolicy::Percentile { percentile: self.threshold_value },
            ThresholdKind::Fixed => ThresholdPolicy::Fixed { value: self.threshold_value },
        }
    }

    pub fn similarity_options(&self) -> SimilarityOptions {
        SimilarityOptions {
            smoothing_window: self.smoothing_window,
            min_chunk_sentences: self.min_chunk_sentences,
            threshold: self.threshold(),
            order: self.minima_order,
            mode: match self.activation_reach {
                0 => ProfileMode::Adjacent,
                reach => ProfileMode::Activated { reach },
            },
        }
    }
}

// ── Embedding ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "ollama", "openai", "hashing"
    pub provider: String,
    pub dimensions: usize,
    pub batch_size: usize,
    /// Embed a probe sentence at startup and fail fast if the model is unreachable.
    pub warmup: bool,
}

impl EmbeddingConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "EMBEDDING_PROVIDER", "ollama"),
            dimensions: profiled_env_parse(p, "EMBEDDING_DIMENSIONS", 768),
            batch_size: profiled_env_parse(p, "EMBEDDING_BATCH_SIZE", 64),
            warmup: profiled_env_bool(p, "EMBEDDING_WARMUP", true),
        }
    }
}

// ── Ollama (local models) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    pub embedding_model: String,
}

impl OllamaConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_or(p, "OLLAMA_URL", "http://localhost:11434"),
            embedding_model: profiled_env_or(p, "OLLAMA_EMBEDDING_MODEL", "nomic-embed-text"),
        }
    }
}

// ── OpenAI-compatible embeddings ──────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub embedding_model: String,
}

impl OpenAiConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            base_url: profiled_env_or(p, "OPENAI_BASE_URL", "https://api.openai.com"),
            embedding_model: profiled_env_or(p, "OPENAI_EMBEDDING_MODEL", "text-embedding-3-small"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
