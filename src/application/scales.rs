// Scale computer - Axis domains, ranges and ticks for the current metric
use crate::domain::error::ChartError;
use crate::domain::metric::Metric;
use crate::domain::observation::ObservationPoint;
use crate::domain::scale::AxisScale;

/// Upper bound on Y ticks is 11 (0 plus ten steps).
const TARGET_TICK_INTERVALS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleComputer {
    width: f64,
    height: f64,
}

impl ScaleComputer {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Week axis: domain `[1, week_count]`, one tick per week.
    pub fn compute_x_scale(&self, week_count: u32) -> AxisScale {
        let ticks = (1..=week_count).map(f64::from).collect();
        AxisScale::new((1.0, f64::from(week_count.max(1))), (0.0, self.width), ticks)
    }

    /// Metric axis: domain `[0, max]` of the selected metric, inverted range.
    pub fn compute_y_scale(
        &self,
        points: &[ObservationPoint],
        metric: Metric,
    ) -> Result<AxisScale, ChartError> {
        let max = points
            .iter()
            .map(|p| p.value(metric))
            .reduce(f64::max)
            .ok_or(ChartError::EmptyDataset { metric })?;

        let step = (max / TARGET_TICK_INTERVALS).ceil().max(1.0);
        let ticks = tick_values(max, step);

        tracing::debug!(
            "Y scale for {}: max={} step={} ticks={}",
            metric,
            max,
            step,
            ticks.len()
        );

        Ok(AxisScale::new((0.0, max), (self.height, 0.0), ticks))
    }
}

fn tick_values(max: f64, step: f64) -> Vec<f64> {
    let count = (max / step).floor().max(0.0) as u64;
    (0..=count).map(|i| i as f64 * step).collect()
}
