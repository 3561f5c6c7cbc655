// Main entry point - Wires configuration, sources and the chart, then writes the page
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use weekly_stats_chart::application::chart::ChartState;
use weekly_stats_chart::application::ingestor::DataIngestor;
use weekly_stats_chart::domain::error::ChartError;
use weekly_stats_chart::infrastructure::config::load_app_config;
use weekly_stats_chart::infrastructure::weekly_sources::{
    FileWeeklySource, HttpWeeklySource, RoutedWeeklySource,
};
use weekly_stats_chart::presentation::page::render_page;
use weekly_stats_chart::presentation::svg::SvgSurface;

const FRAME: Duration = Duration::from_millis(16);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create sources (infrastructure layer)
    let source = Arc::new(RoutedWeeklySource::new(
        HttpWeeklySource::new(reqwest::Client::new()),
        FileWeeklySource::new("."),
    ));

    // Create ingestor and chart (application layer)
    let ingestor = DataIngestor::new(source);
    let mut chart = ChartState::new(config.chart.clone());

    match chart
        .load_and_render(
            &ingestor,
            &config.data.sources,
            SvgSurface::default(),
            config.data.initial_metric,
        )
        .await
    {
        Ok(_) | Err(ChartError::EmptyDataset { .. }) => chart.settle(FRAME),
        Err(e) => tracing::error!("{}", e),
    }

    // Write page (presentation layer)
    let selected = chart.metric().unwrap_or(config.data.initial_metric);
    if let Some(surface) = chart.surface() {
        tokio::fs::write(&config.data.output, render_page(surface, selected)).await?;
        tracing::info!("Chart written to {}", config.data.output);
    }

    Ok(())
}
