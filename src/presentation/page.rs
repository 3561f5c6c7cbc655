// HTML page - The host page around the chart: metric selector plus the chart container
use crate::domain::metric::Metric;
use crate::presentation::svg::{SvgSurface, escape};
use std::fmt::{self, Write};

/// Wrap the surface's current content in a page. A placeholder, when set,
/// replaces the chart.
pub fn render_page(surface: &SvgSurface, selected: Metric) -> String {
    let mut html = String::new();
    if let Err(e) = write_page(&mut html, surface, selected) {
        tracing::error!("Page serialization failed: {}", e);
    }
    html
}

fn write_page(html: &mut String, surface: &SvgSurface, selected: Metric) -> fmt::Result {
    writeln!(html, "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">")?;
    writeln!(html, "<title>Weekly player stats</title>\n</head>\n<body>")?;

    writeln!(html, "<select id=\"metric-select\">")?;
    for metric in Metric::ALL {
        let selected_attr = if metric == selected { " selected" } else { "" };
        writeln!(
            html,
            "<option value=\"{}\"{}>{}</option>",
            metric.name(),
            selected_attr,
            escape(metric.label())
        )?;
    }
    writeln!(html, "</select>")?;

    writeln!(html, "<div id=\"line-chart-div\">")?;
    match surface.placeholder() {
        Some(message) => {
            writeln!(html, "<p class=\"chart-placeholder\">{}</p>", escape(message))?;
        }
        None => html.push_str(surface.document()),
    }
    writeln!(html, "</div>\n</body>\n</html>")
}
