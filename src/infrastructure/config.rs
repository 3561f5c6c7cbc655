use crate::domain::metric::Metric;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    /// Width of the plot container; the legend column is added on top.
    pub width: f64,
    pub height_ratio: f64,
    pub margin: Margin,
    pub legend_width: f64,
    pub legend_row_height: f64,
    pub jitter_unit: f64,
    pub point_radius: f64,
    pub line_width: f64,
    pub transition_ms: u64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height_ratio: 0.5625,
            margin: Margin::default(),
            legend_width: 160.0,
            legend_row_height: 20.0,
            jitter_unit: 6.0,
            point_radius: 4.0,
            line_width: 2.0,
            transition_ms: 750,
        }
    }
}

impl ChartConfig {
    pub fn height(&self) -> f64 {
        self.width * self.height_ratio
    }

    pub fn plot_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    pub fn plot_height(&self) -> f64 {
        (self.height() - self.margin.top - self.margin.bottom).max(0.0)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 10.0,
            right: 30.0,
            bottom: 30.0,
            left: 60.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    /// Weekly sources in week order
    pub sources: Vec<String>,
    pub initial_metric: Metric,
    pub output: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            initial_metric: Metric::TotalDeaths,
            output: "chart.html".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SnapshotConfig {
    pub raw_dir: String,
    pub profile_lookup_url: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            raw_dir: "utils/raw".to_string(),
            profile_lookup_url: "https://api.minecraftservices.com/minecraft/profile/lookup/"
                .to_string(),
        }
    }
}

/// `config/chart.toml`, overridden by `STATS_CHART__SECTION__KEY` variables.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/chart").required(false))
        .add_source(config::Environment::with_prefix("STATS_CHART").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = parse("");

        assert_eq!(config.chart, ChartConfig::default());
        assert_eq!(config.data.initial_metric, Metric::TotalDeaths);
        assert!(config.data.sources.is_empty());
        assert_eq!(config.snapshot.raw_dir, "utils/raw");
    }

    #[test]
    fn test_partial_overrides() {
        let config = parse(
            r#"
            [chart]
            width = 800
            transition_ms = 0

            [chart.margin]
            left = 40

            [data]
            sources = ["data/week1.json", "data/week2.json"]
            initial_metric = "damage_dealt"
            "#,
        );

        assert_eq!(config.chart.width, 800.0);
        assert_eq!(config.chart.margin.left, 40.0);
        assert_eq!(config.chart.margin.top, 10.0);
        assert_eq!(config.chart.transition(), Duration::ZERO);
        assert_eq!(config.data.sources.len(), 2);
        assert_eq!(config.data.initial_metric, Metric::DamageDealt);
        assert_eq!(config.data.output, "chart.html");
    }

    #[test]
    fn test_plot_area() {
        let chart = ChartConfig::default();

        assert_eq!(chart.height(), 540.0);
        assert_eq!(chart.plot_width(), 870.0);
        assert_eq!(chart.plot_height(), 500.0);
    }
}
