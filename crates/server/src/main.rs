mod api;
mod cli;
mod router;
mod startup;
mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn load_config() -> chunkwise_core::Config {
    chunkwise_core::config::load_dotenv();
    chunkwise_core::Config::from_env()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `split` output on stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = cli::Cli::parse();
    let config = load_config();
    cli::dispatch(cli, config).await
}
