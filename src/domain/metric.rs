// Metric domain model - The selectable statistics driving the Y axis
use crate::domain::error::ChartError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TotalDeaths,
    TotalPlaytime,
    DamageDealt,
    DamageTaken,
}

impl Metric {
    /// Selector order.
    pub const ALL: [Metric; 4] = [
        Metric::TotalDeaths,
        Metric::TotalPlaytime,
        Metric::DamageDealt,
        Metric::DamageTaken,
    ];

    /// Field name used both in the weekly JSON files and by the selector.
    pub fn name(self) -> &'static str {
        match self {
            Metric::TotalDeaths => "total_deaths",
            Metric::TotalPlaytime => "total_playtime",
            Metric::DamageDealt => "damage_dealt",
            Metric::DamageTaken => "damage_taken",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::TotalDeaths => "Total deaths",
            Metric::TotalPlaytime => "Total playtime (h)",
            Metric::DamageDealt => "Damage dealt",
            Metric::DamageTaken => "Damage taken",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|metric| metric.name() == s)
            .ok_or_else(|| ChartError::UnknownMetric(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_metrics() {
        for metric in Metric::ALL {
            assert_eq!(metric.name().parse::<Metric>().unwrap(), metric);
        }
    }

    #[test]
    fn test_parse_unknown_metric() {
        let err = "kills".parse::<Metric>().unwrap_err();
        assert!(matches!(err, ChartError::UnknownMetric(ref name) if name == "kills"));

        // Names are matched exactly, labels are not accepted
        assert!("Total deaths".parse::<Metric>().is_err());
    }

    #[test]
    fn test_deserialize_from_config_value() {
        let metric: Metric = serde_json::from_str("\"damage_taken\"").unwrap();
        assert_eq!(metric, Metric::DamageTaken);
    }
}
