//! Verdant campaign CLI
//!
//! Runs a vegetation campaign on an in-process rank group and prints the
//! final report.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use verdant_simulator::{CampaignFile, Simulator};
use verdant_types::SeedScheme;

#[derive(Parser)]
#[command(name = "verdant-sim")]
#[command(about = "Monte Carlo campaign of the vegetation automaton")]
#[command(version)]
struct Cli {
    /// TOML file with campaign parameters; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid width (1 to 500)
    #[arg(long)]
    width: Option<u32>,

    /// Grid height (1 to 500)
    #[arg(long)]
    height: Option<u32>,

    /// Probability that a cell starts vegetated (0.0 to 1.0)
    #[arg(short, long)]
    probability: Option<f64>,

    /// Total number of runs
    #[arg(short, long)]
    runs: Option<u64>,

    /// Base seed
    #[arg(short, long, allow_hyphen_values = true)]
    seed: Option<i64>,

    /// Number of ranks, coordinator included
    #[arg(short, long)]
    workers: Option<u32>,

    /// Step budget per run
    #[arg(long)]
    max_steps: Option<u32>,

    /// Consecutive unchanged steps that count as converged
    #[arg(long)]
    max_unchanged: Option<u32>,

    /// Per-cell draw scheme (minimal-standard, chacha)
    #[arg(long, value_parser = parse_seed_scheme)]
    seed_scheme: Option<SeedScheme>,
}

impl Cli {
    fn overrides(&self) -> CampaignFile {
        CampaignFile {
            width: self.width,
            height: self.height,
            probability: self.probability,
            runs: self.runs,
            seed: self.seed,
            workers: self.workers,
            max_steps: self.max_steps,
            max_unchanged: self.max_unchanged,
            seed_scheme: self.seed_scheme,
        }
    }
}

fn parse_seed_scheme(s: &str) -> Result<SeedScheme, String> {
    match s.to_lowercase().as_str() {
        "minimal-standard" | "minimalstandard" | "park-miller" => Ok(SeedScheme::MinimalStandard),
        "chacha" | "chacha8" => Ok(SeedScheme::ChaCha),
        _ => Err(format!("Unknown seed scheme: {}", s)),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => CampaignFile::load(path)
            .with_context(|| format!("loading campaign from {}", path.display()))?,
        None => CampaignFile::default(),
    };
    let config = file
        .merge(cli.overrides())
        .into_config()
        .context("invalid campaign parameters")?;

    let report = Simulator::new(config).run()?;
    report.print();

    Ok(())
}
