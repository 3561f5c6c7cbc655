// Legend controller - Ranked legend entries and their marks
use crate::application::palette::Palette;
use crate::domain::mark::{Attrs, MarkKey, MarkTarget};
use crate::domain::metric::Metric;
use crate::domain::observation::Series;
use crate::domain::scale::format_tick;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub username: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendController {
    x: f64,
    top: f64,
    row_height: f64,
}

impl LegendController {
    pub fn new(x: f64, top: f64, row_height: f64) -> Self {
        Self { x, top, row_height }
    }

    /// One entry per series, highest value at the series' latest week first.
    /// Equal values fall back to username order.
    pub fn build_legend(series: &[Series], metric: Metric) -> Vec<LegendEntry> {
        let mut entries: Vec<LegendEntry> = series
            .iter()
            .map(|s| LegendEntry {
                username: s.username.clone(),
                value: s.latest().map(|p| p.value(metric)).unwrap_or_default(),
            })
            .collect();

        entries.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.username.cmp(&b.username))
        });
        entries
    }

    /// Legend rows keyed by username and positioned by rank, so a re-rank
    /// moves existing rows instead of recreating them.
    pub fn targets(&self, entries: &[LegendEntry], palette: &Palette) -> Vec<MarkTarget> {
        entries
            .iter()
            .enumerate()
            .map(|(rank, entry)| MarkTarget {
                key: MarkKey::LegendEntry(entry.username.clone()),
                series: Some(entry.username.clone()),
                color: palette.color(&entry.username).to_string(),
                tooltip: None,
                attrs: Attrs::at(self.x, self.top + rank as f64 * self.row_height)
                    .with_label(format!("{} ({})", entry.username, format_tick(entry.value))),
            })
            .collect()
    }
}
