// Jitter layout - Deterministic lateral offsets for points sharing a value
use crate::domain::metric::Metric;
use crate::domain::observation::ObservationPoint;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JitterLayout {
    unit: f64,
}

impl JitterLayout {
    pub fn new(unit: f64) -> Self {
        Self { unit }
    }

    /// Offsets for the points of a single week, keyed by username.
    ///
    /// Points are grouped by exact value. Inside a group of `n`, members are
    /// ordered by username and the i-th gets `(i - (n-1)/2) * unit`, so the
    /// group is centred on the unjittered position.
    pub fn layout(&self, week_points: &[&ObservationPoint], metric: Metric) -> BTreeMap<String, f64> {
        let mut groups: BTreeMap<u64, Vec<&str>> = BTreeMap::new();
        for point in week_points {
            groups
                .entry(value_key(point.value(metric)))
                .or_default()
                .push(point.username.as_str());
        }

        let mut offsets = BTreeMap::new();
        for mut members in groups.into_values() {
            members.sort_unstable();
            let center = (members.len() as f64 - 1.0) / 2.0;
            for (index, username) in members.into_iter().enumerate() {
                offsets.insert(username.to_string(), (index as f64 - center) * self.unit);
            }
        }
        offsets
    }

    /// Offsets for every observation, computed independently per week.
    pub fn layout_all(
        &self,
        points: &[ObservationPoint],
        metric: Metric,
    ) -> BTreeMap<(String, u32), f64> {
        let mut by_week: BTreeMap<u32, Vec<&ObservationPoint>> = BTreeMap::new();
        for point in points {
            by_week.entry(point.week).or_default().push(point);
        }

        by_week
            .into_iter()
            .flat_map(|(week, week_points)| {
                self.layout(&week_points, metric)
                    .into_iter()
                    .map(move |(username, offset)| ((username, week), offset))
            })
            .collect()
    }
}

/// Exact-value grouping key; folds -0.0 into 0.0.
fn value_key(value: f64) -> u64 {
    if value == 0.0 { 0.0f64.to_bits() } else { value.to_bits() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::observation::RawWeeklyRecord;

    fn point(username: &str, week: u32, deaths: f64) -> ObservationPoint {
        ObservationPoint::from_record(
            RawWeeklyRecord {
                username: username.to_string(),
                total_deaths: deaths,
                total_playtime: 0.0,
                damage_dealt: 0.0,
                damage_taken: 0.0,
            },
            week,
        )
    }

    #[test]
    fn test_pair_gets_opposite_offsets() {
        let points = [point("bob", 1, 3.0), point("alice", 1, 3.0)];
        let refs: Vec<&ObservationPoint> = points.iter().collect();

        let offsets = JitterLayout::new(6.0).layout(&refs, Metric::TotalDeaths);

        assert_eq!(offsets["alice"], -3.0);
        assert_eq!(offsets["bob"], 3.0);
    }

    #[test]
    fn test_singletons_stay_centred() {
        let points = [point("alice", 1, 3.0), point("bob", 1, 4.0)];
        let refs: Vec<&ObservationPoint> = points.iter().collect();

        let offsets = JitterLayout::new(6.0).layout(&refs, Metric::TotalDeaths);

        assert_eq!(offsets["alice"], 0.0);
        assert_eq!(offsets["bob"], 0.0);
    }

    #[test]
    fn test_groups_are_symmetric() {
        for n in 1..=6 {
            let points: Vec<ObservationPoint> =
                (0..n).map(|i| point(&format!("p{i}"), 1, 9.0)).collect();
            let refs: Vec<&ObservationPoint> = points.iter().collect();

            let offsets = JitterLayout::new(4.0).layout(&refs, Metric::TotalDeaths);
            let mut values: Vec<f64> = offsets.values().copied().collect();
            values.sort_by(f64::total_cmp);

            assert!(values.iter().sum::<f64>().abs() < 1e-9, "n = {n}");
            for (low, high) in values.iter().zip(values.iter().rev()) {
                assert!((low + high).abs() < 1e-9, "n = {n}");
            }
            if n % 2 == 0 {
                assert!(values.iter().all(|v| *v != 0.0), "n = {n}");
            }
        }
    }

    #[test]
    fn test_order_does_not_depend_on_input_order() {
        let forward = [point("alice", 1, 2.0), point("bob", 1, 2.0), point("carol", 1, 2.0)];
        let backward = [point("carol", 1, 2.0), point("bob", 1, 2.0), point("alice", 1, 2.0)];
        let layout = JitterLayout::new(5.0);

        let a = layout.layout(&forward.iter().collect::<Vec<_>>(), Metric::TotalDeaths);
        let b = layout.layout(&backward.iter().collect::<Vec<_>>(), Metric::TotalDeaths);

        assert_eq!(a, b);
        assert_eq!(a["alice"], -5.0);
        assert_eq!(a["bob"], 0.0);
        assert_eq!(a["carol"], 5.0);
    }

    #[test]
    fn test_weeks_are_independent() {
        let points = vec![
            point("alice", 1, 3.0),
            point("bob", 1, 3.0),
            point("alice", 2, 5.0),
            point("bob", 2, 7.0),
        ];

        let offsets = JitterLayout::new(6.0).layout_all(&points, Metric::TotalDeaths);

        assert_eq!(offsets.len(), 4);
        assert_eq!(offsets[&("alice".to_string(), 1)], -3.0);
        assert_eq!(offsets[&("bob".to_string(), 1)], 3.0);
        assert_eq!(offsets[&("alice".to_string(), 2)], 0.0);
        assert_eq!(offsets[&("bob".to_string(), 2)], 0.0);
    }

    #[test]
    fn test_empty_week() {
        assert!(JitterLayout::new(6.0).layout(&[], Metric::TotalDeaths).is_empty());
        assert!(JitterLayout::new(6.0).layout_all(&[], Metric::TotalDeaths).is_empty());
    }
}
