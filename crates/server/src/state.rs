use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use serde::Serialize;

use chunkwise_core::Config;
use chunkwise_splitter::Splitter;

/// State shared by every request.
///
/// Model handles are loaded once at startup and never mutated; only the
/// request counters change.
pub struct AppState {
    pub splitter: Splitter,
    pub config: Config,
    pub metrics: RequestMetrics,
}

impl AppState {
    pub fn new(splitter: Splitter, config: Config) -> Self {
        Self {
            splitter,
            config,
            metrics: RequestMetrics::default(),
        }
    }
}

/// Counters for one split route.
#[derive(Debug, Default)]
pub struct RouteMetrics {
    pub requests: AtomicU64,
    pub errors: AtomicU64,
    pub total_time_us: AtomicU64,
    last_error: RwLock<Option<String>>,
}

impl RouteMetrics {
    pub fn record(&self, elapsed: Duration, error: Option<&str>) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.total_time_us
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
        if let Some(msg) = error {
            self.errors.fetch_add(1, Ordering::Relaxed);
            let mut last = self.last_error.write().unwrap_or_else(|e| e.into_inner());
            *last = Some(msg.to_string());
        }
    }

    pub fn snapshot(&self) -> RouteStats {
        let requests = self.requests.load(Ordering::Relaxed);
        let total_time_us = self.total_time_us.load(Ordering::Relaxed);
        let avg_latency_ms = if requests > 0 {
            (total_time_us as f64 / requests as f64) / 1000.0
        } else {
            0.0
        };
        RouteStats {
            requests,
            errors: self.errors.load(Ordering::Relaxed),
            avg_latency_ms,
            last_error: self
                .last_error
                .read()
                .unwrap_or_else(|e| e.into_inner())
                .clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct RequestMetrics {
    pub split_size: RouteMetrics,
    pub split_similarity: RouteMetrics,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct RouteStats {
    pub requests: u64,
    pub errors: u64,
    pub avg_latency_ms: f64,
    pub last_error: Option<String>,
}
