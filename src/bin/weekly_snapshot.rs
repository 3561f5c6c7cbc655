// Builds one weekly snapshot file from a directory of raw player stat exports
use std::path::PathBuf;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use weekly_stats_chart::infrastructure::config::load_app_config;
use weekly_stats_chart::infrastructure::snapshot::{
    HttpProfileLookup, build_snapshot, write_snapshot,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let output: PathBuf = std::env::args()
        .nth(1)
        .context("usage: weekly-snapshot <output.json>")?
        .into();
    let config = load_app_config()?;

    let lookup = HttpProfileLookup::new(reqwest::Client::new(), config.snapshot.profile_lookup_url);
    let records = build_snapshot(config.snapshot.raw_dir.as_ref(), &lookup).await?;
    write_snapshot(&output, &records).await?;

    tracing::info!("Stats for {} players saved to {}", records.len(), output.display());
    Ok(())
}
