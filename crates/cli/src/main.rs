mod artifact;
mod report;
mod run;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "alertsift",
    version,
    about = "Dump NRQL alert conditions and hunt for near-duplicates"
)]
pub struct Opts {
    /// New Relic account id; omit to walk every account the key can see
    #[arg(long)]
    account_id: Option<i64>,

    /// New Relic API key
    #[arg(long)]
    api_key: String,

    /// Similarity percentage threshold for the pair report; 0 runs
    /// clustering mode instead
    #[arg(long, default_value_t = 0)]
    similarity: u8,

    /// Where the flattened table lands
    #[arg(long, default_value = "alert_policies.csv")]
    output_file: PathBuf,

    /// Dump raw records as a JSON array instead of CSV
    #[arg(long)]
    json: bool,

    /// Delete any cached output and re-harvest via the API
    #[arg(long)]
    purge_cache: bool,

    /// Verbose logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let opts = Opts::parse();

    let default_filter = if opts.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    run::run(opts).await
}
