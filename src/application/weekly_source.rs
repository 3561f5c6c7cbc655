// Source trait for weekly record sets
use crate::domain::error::LoadError;
use crate::domain::observation::RawWeeklyRecord;
use async_trait::async_trait;

#[async_trait]
pub trait WeeklySource: Send + Sync {
    /// Fetch and parse the records of one week, identified by `uri`
    async fn fetch_week(&self, uri: &str) -> Result<Vec<RawWeeklyRecord>, LoadError>;
}
