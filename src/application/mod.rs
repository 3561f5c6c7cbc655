// Application layer - Ingestion, layout, binding and the chart lifecycle
pub mod binding;
pub mod chart;
pub mod ingestor;
pub mod jitter;
pub mod legend;
pub mod palette;
pub mod reconcile;
pub mod scales;
pub mod surface;
pub mod weekly_source;
