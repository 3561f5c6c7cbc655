// Error taxonomy for loading and rendering the chart
use crate::domain::metric::Metric;
use thiserror::Error;

/// Failure to produce the observation set. Terminal for chart initialization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("weekly source {uri} is unreachable: {reason}")]
    Unreachable { uri: String, reason: String },

    #[error("weekly source {uri} responded with status {status}")]
    Status { uri: String, status: u16 },

    #[error("weekly source {uri} is malformed: {reason}")]
    Malformed { uri: String, reason: String },

    #[error("weekly source {uri} lists player {username} more than once")]
    DuplicatePlayer { uri: String, username: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("no data points for metric {metric}")]
    EmptyDataset { metric: Metric },

    #[error("unknown metric {0:?}")]
    UnknownMetric(String),
}
