// Data ingestor - Loads every weekly source and flattens them into observations
use crate::application::weekly_source::WeeklySource;
use crate::domain::error::LoadError;
use crate::domain::observation::{ObservationPoint, RawWeeklyRecord};
use futures::future::try_join_all;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Clone)]
pub struct DataIngestor {
    source: Arc<dyn WeeklySource>,
}

impl DataIngestor {
    pub fn new(source: Arc<dyn WeeklySource>) -> Self {
        Self { source }
    }

    /// Fetch all sources concurrently and tag each record with the 1-based
    /// position of its source. Any failure fails the whole load.
    pub async fn load(&self, sources: &[String]) -> Result<Vec<ObservationPoint>, LoadError> {
        tracing::info!("Loading {} weekly sources", sources.len());

        let weeks = try_join_all(sources.iter().map(|uri| self.source.fetch_week(uri))).await?;

        let mut points = Vec::with_capacity(weeks.iter().map(Vec::len).sum());
        for (index, (uri, records)) in sources.iter().zip(weeks).enumerate() {
            let week = index as u32 + 1;
            ensure_unique_players(uri, &records)?;

            tracing::debug!("Week {} ({}) has {} records", week, uri, records.len());
            points.extend(
                records
                    .into_iter()
                    .map(|record| ObservationPoint::from_record(record, week)),
            );
        }

        tracing::info!("Loaded {} observations", points.len());
        Ok(points)
    }
}

fn ensure_unique_players(uri: &str, records: &[RawWeeklyRecord]) -> Result<(), LoadError> {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.username.as_str()) {
            return Err(LoadError::DuplicatePlayer {
                uri: uri.to_string(),
                username: record.username.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metric::Metric;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;

    /// In-memory source; each week answers after its configured delay.
    struct FakeSource {
        weeks: HashMap<String, (u64, Result<Vec<RawWeeklyRecord>, LoadError>)>,
    }

    #[async_trait]
    impl WeeklySource for FakeSource {
        async fn fetch_week(&self, uri: &str) -> Result<Vec<RawWeeklyRecord>, LoadError> {
            let (delay_ms, result) = self.weeks.get(uri).cloned().unwrap_or_else(|| {
                (
                    0,
                    Err(LoadError::Status {
                        uri: uri.to_string(),
                        status: 404,
                    }),
                )
            });
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            result
        }
    }

    fn record(username: &str, deaths: f64) -> RawWeeklyRecord {
        RawWeeklyRecord {
            username: username.to_string(),
            total_deaths: deaths,
            total_playtime: 0.0,
            damage_dealt: 0.0,
            damage_taken: 0.0,
        }
    }

    fn ingestor(weeks: Vec<(&str, u64, Vec<RawWeeklyRecord>)>) -> DataIngestor {
        let weeks = weeks
            .into_iter()
            .map(|(uri, delay, records)| (uri.to_string(), (delay, Ok(records))))
            .collect();
        DataIngestor::new(Arc::new(FakeSource { weeks }))
    }

    #[tokio::test]
    async fn test_week_follows_request_order_not_completion_order() {
        // week1 finishes last
        let ingestor = ingestor(vec![
            ("week1.json", 60, vec![record("alice", 3.0), record("bob", 3.0)]),
            ("week2.json", 0, vec![record("alice", 5.0), record("bob", 7.0)]),
        ]);
        let sources = vec!["week1.json".to_string(), "week2.json".to_string()];

        let points = ingestor.load(&sources).await.unwrap();

        assert_eq!(points.len(), 4);
        let bob_week2 = points
            .iter()
            .find(|p| p.username == "bob" && p.week == 2)
            .unwrap();
        assert_eq!(bob_week2.value(Metric::TotalDeaths), 7.0);
        assert!(points.iter().all(|p| (1..=2).contains(&p.week)));
        assert_eq!(points[0].week, 1);
    }

    #[tokio::test]
    async fn test_one_failing_source_fails_everything() {
        let ingestor = ingestor(vec![("week1.json", 0, vec![record("alice", 3.0)])]);
        let sources = vec!["week1.json".to_string(), "week2.json".to_string()];

        let err = ingestor.load(&sources).await.unwrap_err();

        assert_eq!(
            err,
            LoadError::Status {
                uri: "week2.json".to_string(),
                status: 404
            }
        );
    }

    #[tokio::test]
    async fn test_duplicate_player_in_week_is_malformed() {
        let ingestor = ingestor(vec![(
            "week1.json",
            0,
            vec![record("alice", 3.0), record("alice", 4.0)],
        )]);

        let err = ingestor.load(&["week1.json".to_string()]).await.unwrap_err();

        assert!(matches!(err, LoadError::DuplicatePlayer { ref username, .. } if username == "alice"));
    }

    #[tokio::test]
    async fn test_no_sources_loads_nothing() {
        let ingestor = ingestor(vec![]);
        assert!(ingestor.load(&[]).await.unwrap().is_empty());
    }
}
