//! Server startup: model loading and shared state initialization.

use std::sync::Arc;

use tracing::info;

use chunkwise_core::{Config, SplitResult};
use chunkwise_splitter::{embedding, segment, Splitter};

use crate::state::AppState;

/// Build the splitter from config without touching the network.
pub fn build_splitter(config: &Config) -> SplitResult<Splitter> {
    let segmenter = segment::from_name(&config.split.segmenter)?;
    let embedder = embedding::from_config(config)?;
    info!(
        segmenter = segmenter.name(),
        provider = embedder.provider(),
        dims = embedder.dimensions(),
        "splitter ready"
    );
    Ok(Splitter::new(segmenter, embedder).with_batch_size(config.embedding.batch_size))
}

/// Build `AppState`, warming up the embedding model first when configured.
pub async fn build_app_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let splitter = build_splitter(config)?;
    if config.embedding.warmup {
        embedding::warm_up(splitter.embedder()).await?;
    } else {
        info!("embedding warm-up disabled, model checked on first request");
    }
    Ok(Arc::new(AppState::new(splitter, config.clone())))
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let state = build_app_state(config).await?;
    let app = crate::router::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
