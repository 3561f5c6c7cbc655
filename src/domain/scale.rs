// Axis scale domain model

/// Linear map from a numeric domain onto a pixel range, with its tick values.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
    pub ticks: Vec<f64>,
}

impl AxisScale {
    pub fn new(domain: (f64, f64), range: (f64, f64), ticks: Vec<f64>) -> Self {
        Self {
            domain,
            range,
            ticks,
        }
    }

    /// Map a domain value to its pixel position. A degenerate domain maps
    /// everything to the start of the range.
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }
}

/// Integers print without decimals, everything else with at most two.
pub fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let text = format!("{:.2}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_inverted_range() {
        let scale = AxisScale::new((0.0, 10.0), (200.0, 0.0), vec![]);
        assert_eq!(scale.map(0.0), 200.0);
        assert_eq!(scale.map(10.0), 0.0);
        assert_eq!(scale.map(5.0), 100.0);
    }

    #[test]
    fn test_map_degenerate_domain() {
        let scale = AxisScale::new((1.0, 1.0), (0.0, 500.0), vec![1.0]);
        assert_eq!(scale.map(1.0), 0.0);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(70.0), "70");
        assert_eq!(format_tick(12.5), "12.5");
        assert_eq!(format_tick(0.333), "0.33");
    }
}
