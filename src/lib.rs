//! Weekly player statistics line chart: ingestion, scales, jitter layout and
//! keyed mark reconciliation behind `ChartState::render` / `ChartState::update`.
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application::chart::{ChartState, Phase};
pub use domain::error::{ChartError, LoadError};
pub use domain::metric::Metric;
