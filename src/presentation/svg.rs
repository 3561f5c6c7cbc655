// SVG surface - Serializes a frame into a standalone SVG document
use crate::application::surface::{Frame, Surface};
use crate::domain::mark::{MarkKind, MarkSnapshot};
use std::fmt::{Result, Write};

const TICK_SIZE: f64 = 6.0;

#[derive(Debug, Clone, Default)]
pub struct SvgSurface {
    document: String,
    placeholder: Option<String>,
}

impl SvgSurface {
    /// Latest SVG document; empty until the first draw.
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }
}

impl Surface for SvgSurface {
    fn draw(&mut self, frame: &Frame) {
        let mut out = String::new();
        match render_svg(&mut out, frame) {
            Ok(()) => {
                self.document = out;
                self.placeholder = None;
            }
            Err(e) => tracing::error!("SVG serialization failed: {}", e),
        }
    }

    fn show_placeholder(&mut self, message: &str) {
        self.document.clear();
        self.placeholder = Some(message.to_string());
    }
}

pub fn render_svg(out: &mut String, frame: &Frame) -> Result {
    writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
        w = frame.width,
        h = frame.height
    )?;
    writeln!(
        out,
        "<g transform=\"translate({},{})\">",
        frame.margin.left, frame.margin.top
    )?;

    draw_x_axis(out, frame)?;
    draw_y_axis(out, frame)?;

    for mark in &frame.marks {
        match mark.key.kind() {
            MarkKind::Line => draw_line(out, mark)?,
            MarkKind::Point => draw_point(out, mark)?,
            MarkKind::LegendEntry => draw_legend_entry(out, mark)?,
            MarkKind::YTick => draw_y_tick(out, mark)?,
        }
    }

    if let Some(tooltip) = &frame.tooltip {
        let (x, y) = tooltip.anchor;
        writeln!(
            out,
            "<text class=\"tooltip\" x=\"{:.2}\" y=\"{:.2}\" font-size=\"12\">{}</text>",
            x + 8.0,
            y - 8.0,
            escape(&tooltip.text)
        )?;
    }

    writeln!(out, "</g>")?;
    writeln!(out, "</svg>")?;
    Ok(())
}

fn draw_x_axis(out: &mut String, frame: &Frame) -> Result {
    writeln!(
        out,
        "<g class=\"x-axis\" transform=\"translate(0,{})\">",
        frame.plot_height
    )?;
    writeln!(
        out,
        "<line x1=\"0\" y1=\"0\" x2=\"{}\" y2=\"0\" stroke=\"#333333\"/>",
        frame.plot_width
    )?;
    for (x, label) in &frame.x_ticks {
        writeln!(
            out,
            "<line x1=\"{x:.2}\" y1=\"0\" x2=\"{x:.2}\" y2=\"{TICK_SIZE}\" stroke=\"#333333\"/>"
        )?;
        writeln!(
            out,
            "<text x=\"{x:.2}\" y=\"{}\" text-anchor=\"middle\" font-size=\"10\">{}</text>",
            TICK_SIZE + 12.0,
            escape(label)
        )?;
    }
    writeln!(out, "</g>")
}

fn draw_y_axis(out: &mut String, frame: &Frame) -> Result {
    writeln!(
        out,
        "<line class=\"y-axis\" x1=\"0\" y1=\"0\" x2=\"0\" y2=\"{}\" stroke=\"#333333\"/>",
        frame.plot_height
    )?;
    writeln!(
        out,
        "<text class=\"y-label\" transform=\"rotate(-90)\" x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"12\">{}</text>",
        -frame.plot_height / 2.0,
        -frame.margin.left + 14.0,
        escape(frame.metric.label())
    )
}

fn draw_line(out: &mut String, mark: &MarkSnapshot) -> Result {
    let mut path = String::new();
    for (i, (x, y)) in mark.anchors.iter().enumerate() {
        write!(path, "{}{:.2},{:.2}", if i == 0 { "M" } else { "L" }, x, y)?;
    }
    writeln!(
        out,
        "<path class=\"line\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.2}\" opacity=\"{:.3}\"/>",
        path, mark.color, mark.stroke_width, mark.opacity
    )
}

fn draw_point(out: &mut String, mark: &MarkSnapshot) -> Result {
    let Some((x, y)) = mark.anchors.first() else {
        return Ok(());
    };
    writeln!(
        out,
        "<circle class=\"point\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\" opacity=\"{:.3}\"/>",
        x, y, mark.radius, mark.color, mark.opacity
    )
}

fn draw_legend_entry(out: &mut String, mark: &MarkSnapshot) -> Result {
    let Some((x, y)) = mark.anchors.first() else {
        return Ok(());
    };
    writeln!(
        out,
        "<g class=\"legend-entry\" opacity=\"{:.3}\"><circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\"/><text x=\"{:.2}\" y=\"{:.2}\" font-size=\"12\" dominant-baseline=\"middle\">{}</text></g>",
        mark.opacity,
        x,
        y,
        mark.radius,
        mark.color,
        x + mark.radius + 6.0,
        y,
        escape(mark.label.as_deref().unwrap_or_default())
    )
}

fn draw_y_tick(out: &mut String, mark: &MarkSnapshot) -> Result {
    let Some((x, y)) = mark.anchors.first() else {
        return Ok(());
    };
    writeln!(
        out,
        "<g class=\"y-tick\" opacity=\"{:.3}\"><line x1=\"{:.2}\" y1=\"{y:.2}\" x2=\"{:.2}\" y2=\"{y:.2}\" stroke=\"{}\"/><text x=\"{:.2}\" y=\"{y:.2}\" text-anchor=\"end\" font-size=\"10\" dominant-baseline=\"middle\">{}</text></g>",
        mark.opacity,
        x - TICK_SIZE,
        x,
        mark.color,
        x - TICK_SIZE - 3.0,
        escape(mark.label.as_deref().unwrap_or_default())
    )
}

pub(crate) fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
