//! CLI argument parsing and subcommand dispatch.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

use chunkwise_core::{
    Config, LengthMetric, ProfileMode, SimilarityOptions, SizeOptions, ThresholdPolicy,
};

use crate::api::{SimilarityResponse, SizeResponse};
use crate::startup;

#[derive(Parser, Debug)]
#[command(name = "chunkwise", version, about = "Sentence-aware text splitting service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Override the configured bind host
        #[arg(long)]
        host: Option<String>,
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Split a document and print the result as JSON
    Split {
        #[command(subcommand)]
        mode: SplitCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum SplitCommand {
    /// Pack sentences into size-bounded, overlapping chunks
    Size(SizeArgs),
    /// Cut where adjacent sentences stop resembling each other
    Similarity(SimilarityArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum MetricArg {
    Chars,
    Words,
}

impl From<MetricArg> for LengthMetric {
    fn from(m: MetricArg) -> Self {
        match m {
            MetricArg::Chars => LengthMetric::Chars,
            MetricArg::Words => LengthMetric::Words,
        }
    }
}

#[derive(Args, Debug)]
pub struct SizeArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub chunk_size: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    pub chunk_overlap: Option<i64>,
    #[arg(long, value_enum)]
    pub metric: Option<MetricArg>,
    /// Input file (stdin when omitted)
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("threshold").args(["threshold_k", "percentile", "fixed"])))]
pub struct SimilarityArgs {
    #[arg(long)]
    pub smoothing_window: Option<usize>,
    #[arg(long)]
    pub min_chunk_sentences: Option<usize>,
    /// Threshold = mean - K * stddev
    #[arg(long, allow_negative_numbers = true)]
    pub threshold_k: Option<f64>,
    /// Threshold = P-th percentile of the profile
    #[arg(long)]
    pub percentile: Option<f64>,
    /// Fixed threshold
    #[arg(long, allow_negative_numbers = true)]
    pub fixed: Option<f64>,
    /// Neighbours on each side a minimum must undercut
    #[arg(long)]
    pub order: Option<usize>,
    /// Use the activated profile with this look-ahead
    #[arg(long)]
    pub reach: Option<usize>,
    /// Override the configured embedding provider (ollama, openai, hashing)
    #[arg(long)]
    pub provider: Option<String>,
    /// Input file (stdin when omitted)
    pub file: Option<PathBuf>,
}

impl SizeArgs {
    pub fn options(&self, defaults: SizeOptions) -> chunkwise_core::SplitResult<SizeOptions> {
        let size = self.chunk_size.unwrap_or(defaults.chunk_size as i64);
        let overlap = self.chunk_overlap.unwrap_or(defaults.chunk_overlap as i64);
        let metric = self.metric.map(LengthMetric::from).unwrap_or(defaults.metric);
        Ok(SizeOptions::new(size, overlap)?.with_metric(metric))
    }
}

impl SimilarityArgs {
    pub fn options(&self, defaults: SimilarityOptions) -> SimilarityOptions {
        let mut options = defaults;
        if let Some(w) = self.smoothing_window {
            options.smoothing_window = w;
        }
        if let Some(m) = self.min_chunk_sentences {
            options.min_chunk_sentences = m;
        }
        if let Some(o) = self.order {
            options.order = o;
        }
        if let Some(reach) = self.reach {
            options.mode = ProfileMode::Activated { reach };
        }
        if let Some(k) = self.threshold_k {
            options.threshold = ThresholdPolicy::StdDev { k };
        } else if let Some(percentile) = self.percentile {
            options.threshold = ThresholdPolicy::Percentile { percentile };
        } else if let Some(value) = self.fixed {
            options.threshold = ThresholdPolicy::Fixed { value };
        }
        options
    }
}

/// Read the whole input from `path`, or stdin when `None`.
pub fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", p.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Run the parsed command.
pub async fn dispatch(cli: Cli, mut config: Config) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.log_summary();
            startup::serve(&config).await
        }
        Command::Split { mode: SplitCommand::Size(args) } => {
            let options = args.options(config.split.size_options())?;
            let text = read_input(args.file.as_deref())?;
            let splitter = startup::build_splitter(&config)?;
            let chunks = splitter.split_by_size_with(&text, &options)?;
            let out = SizeResponse {
                chunks: chunks.into_iter().map(|c| c.text).collect(),
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
        Command::Split { mode: SplitCommand::Similarity(args) } => {
            if let Some(provider) = &args.provider {
                config.embedding.provider = provider.clone();
            }
            let options = args.options(config.split.similarity_options());
            let text = read_input(args.file.as_deref())?;
            let splitter = startup::build_splitter(&config)?;
            let split = splitter.split_by_similarity(&text, &options).await?;
            let out = SimilarityResponse::from(split);
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
    }
}
