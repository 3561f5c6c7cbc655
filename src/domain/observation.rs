// Observation domain models - Weekly records, tagged observations and series
use crate::domain::metric::Metric;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One player's statistics for one week, as stored in a weekly JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWeeklyRecord {
    pub username: String,
    #[serde(default)]
    pub total_deaths: f64,
    #[serde(default)]
    pub total_playtime: f64,
    #[serde(default)]
    pub damage_dealt: f64,
    #[serde(default)]
    pub damage_taken: f64,
}

impl RawWeeklyRecord {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::TotalDeaths => self.total_deaths,
            Metric::TotalPlaytime => self.total_playtime,
            Metric::DamageDealt => self.damage_dealt,
            Metric::DamageTaken => self.damage_taken,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObservationPoint {
    pub username: String,
    /// 1-based position of the weekly source this record came from.
    pub week: u32,
    pub metrics: BTreeMap<Metric, f64>,
}

impl ObservationPoint {
    pub fn from_record(record: RawWeeklyRecord, week: u32) -> Self {
        let metrics = Metric::ALL
            .into_iter()
            .map(|metric| (metric, record.value(metric)))
            .collect();

        Self {
            username: record.username,
            week,
            metrics,
        }
    }

    pub fn value(&self, metric: Metric) -> f64 {
        self.metrics.get(&metric).copied().unwrap_or_default()
    }
}

/// Week-ordered observations of a single player.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub username: String,
    pub points: Vec<ObservationPoint>,
}

impl Series {
    pub fn latest(&self) -> Option<&ObservationPoint> {
        self.points.last()
    }
}

/// Group observations by username. Series come out sorted by username and
/// each series is sorted by week.
pub fn group_series(points: &[ObservationPoint]) -> Vec<Series> {
    let mut grouped: BTreeMap<&str, Vec<ObservationPoint>> = BTreeMap::new();
    for point in points {
        grouped
            .entry(point.username.as_str())
            .or_default()
            .push(point.clone());
    }

    grouped
        .into_iter()
        .map(|(username, mut points)| {
            points.sort_by_key(|p| p.week);
            Series {
                username: username.to_string(),
                points,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(username: &str, deaths: f64) -> RawWeeklyRecord {
        RawWeeklyRecord {
            username: username.to_string(),
            total_deaths: deaths,
            total_playtime: 1.5,
            damage_dealt: 10.0,
            damage_taken: 20.0,
        }
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let json = r#"[{"username": "alice", "total_deaths": 3, "total_playtime": 12.25}]"#;
        let records: Vec<RawWeeklyRecord> = serde_json::from_str(json).unwrap();

        assert_eq!(records[0].total_deaths, 3.0);
        assert_eq!(records[0].total_playtime, 12.25);
        assert_eq!(records[0].damage_dealt, 0.0);
        assert_eq!(records[0].damage_taken, 0.0);
    }

    #[test]
    fn test_observation_carries_every_metric() {
        let point = ObservationPoint::from_record(record("alice", 3.0), 2);

        assert_eq!(point.week, 2);
        assert_eq!(point.metrics.len(), Metric::ALL.len());
        assert_eq!(point.value(Metric::TotalDeaths), 3.0);
        assert_eq!(point.value(Metric::DamageTaken), 20.0);
    }

    #[test]
    fn test_group_series_sorts_players_and_weeks() {
        let points = vec![
            ObservationPoint::from_record(record("bob", 7.0), 2),
            ObservationPoint::from_record(record("alice", 5.0), 2),
            ObservationPoint::from_record(record("bob", 3.0), 1),
            ObservationPoint::from_record(record("alice", 3.0), 1),
        ];

        let series = group_series(&points);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].username, "alice");
        assert_eq!(series[1].username, "bob");
        let weeks: Vec<u32> = series[1].points.iter().map(|p| p.week).collect();
        assert_eq!(weeks, vec![1, 2]);
        assert_eq!(series[1].latest().unwrap().value(Metric::TotalDeaths), 7.0);
    }

    #[test]
    fn test_group_series_empty() {
        assert!(group_series(&[]).is_empty());
    }
}
