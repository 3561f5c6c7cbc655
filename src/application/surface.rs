// Rendering port - What the chart hands to whatever displays it
use crate::domain::mark::{MarkSnapshot, Tooltip};
use crate::domain::metric::Metric;
use crate::infrastructure::config::Margin;

/// A complete picture of the chart at one instant, in plot coordinates
/// (origin at the top-left corner of the plot area, inside the margins).
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub legend_width: f64,
    pub plot_width: f64,
    pub plot_height: f64,
    pub metric: Metric,
    pub x_ticks: Vec<(f64, String)>,
    pub marks: Vec<MarkSnapshot>,
    pub tooltip: Option<Tooltip>,
}

/// The container the chart is mounted into.
pub trait Surface {
    fn draw(&mut self, frame: &Frame);

    /// Replace whatever is shown with a message; used when loading fails.
    fn show_placeholder(&mut self, message: &str);
}
