// Binding engine - Owns every visual mark and keeps it in step with the data
use crate::application::jitter::JitterLayout;
use crate::application::palette::Palette;
use crate::application::reconcile::reconcile;
use crate::domain::mark::{
    Attrs, Emphasis, MarkKey, MarkKind, MarkPhase, MarkSnapshot, MarkTarget, Tooltip, VisualMark,
};
use crate::domain::metric::Metric;
use crate::domain::observation::{ObservationPoint, Series};
use crate::domain::scale::{AxisScale, format_tick};
use std::collections::BTreeMap;
use std::time::Duration;

const DIMMED_OPACITY: f64 = 0.15;
const FOCUSED_LINE_SCALE: f64 = 2.0;
const FOCUSED_POINT_SCALE: f64 = 1.5;
const AXIS_COLOR: &str = "#333333";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkStyle {
    pub line_width: f64,
    pub point_radius: f64,
}

/// Everything needed to position marks for one metric.
pub struct BindInput<'a> {
    pub series: &'a [Series],
    pub points: &'a [ObservationPoint],
    pub metric: Metric,
    pub x: &'a AxisScale,
    /// `None` when there is nothing to plot; every data mark then exits.
    pub y: Option<&'a AxisScale>,
    pub palette: &'a Palette,
    pub legend: Vec<MarkTarget>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KindReport {
    pub entering: Vec<MarkKey>,
    pub updating: Vec<MarkKey>,
    pub exiting: Vec<MarkKey>,
}

impl KindReport {
    pub fn is_unchanged_identity(&self) -> bool {
        self.entering.is_empty() && self.exiting.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderReport {
    pub lines: KindReport,
    pub points: KindReport,
    pub legend: KindReport,
    pub ticks: KindReport,
}

impl RenderReport {
    pub fn for_kind(&self, kind: MarkKind) -> &KindReport {
        match kind {
            MarkKind::Line => &self.lines,
            MarkKind::Point => &self.points,
            MarkKind::LegendEntry => &self.legend,
            MarkKind::YTick => &self.ticks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverTarget {
    Point { username: String, week: u32 },
    Legend { username: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum HoverEvent {
    Entered {
        username: String,
        tooltip: Option<Tooltip>,
    },
    Exited,
}

/// Handle returned by [`BindingEngine::subscribe`]; pass it back to
/// [`BindingEngine::unsubscribe`] to release the listener.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type HoverListener = Box<dyn FnMut(&HoverEvent)>;

#[derive(Debug, Clone, PartialEq)]
struct ActiveHover {
    target: HoverTarget,
    username: String,
    tooltip: Option<Tooltip>,
}

pub struct BindingEngine {
    marks: BTreeMap<MarkKey, VisualMark>,
    clock: Duration,
    duration: Duration,
    jitter: JitterLayout,
    style: MarkStyle,
    hover: Option<ActiveHover>,
    listeners: Vec<(u64, HoverListener)>,
    next_subscription: u64,
}

impl BindingEngine {
    pub fn new(duration: Duration, jitter: JitterLayout, style: MarkStyle) -> Self {
        Self {
            marks: BTreeMap::new(),
            clock: Duration::ZERO,
            duration,
            jitter,
            style,
            hover: None,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn mark(&self, key: &MarkKey) -> Option<&VisualMark> {
        self.marks.get(key)
    }

    pub fn marks(&self) -> impl Iterator<Item = &VisualMark> {
        self.marks.values()
    }

    /// Reconcile lines, points, Y ticks and legend rows against `input`.
    /// In-flight transitions are retargeted from their current value.
    pub fn bind(&mut self, input: BindInput<'_>) -> RenderReport {
        let (lines, points, ticks) = match input.y {
            Some(y) => (
                self.line_targets(&input, y),
                self.point_targets(&input, y),
                tick_targets(y),
            ),
            None => (Vec::new(), Vec::new(), Vec::new()),
        };
        let legend = if input.y.is_some() { input.legend } else { Vec::new() };

        let report = RenderReport {
            lines: self.reconcile_kind(MarkKind::Line, lines),
            points: self.reconcile_kind(MarkKind::Point, points),
            legend: self.reconcile_kind(MarkKind::LegendEntry, legend),
            ticks: self.reconcile_kind(MarkKind::YTick, ticks),
        };

        tracing::debug!(
            "Bound {}: lines +{}/~{}/-{}, points +{}/~{}/-{}",
            input.metric,
            report.lines.entering.len(),
            report.lines.updating.len(),
            report.lines.exiting.len(),
            report.points.entering.len(),
            report.points.updating.len(),
            report.points.exiting.len(),
        );

        self.refresh_hover();
        report
    }

    fn line_targets(&self, input: &BindInput<'_>, y: &AxisScale) -> Vec<MarkTarget> {
        input
            .series
            .iter()
            .map(|series| MarkTarget {
                key: MarkKey::Line(series.username.clone()),
                series: Some(series.username.clone()),
                color: input.palette.color(&series.username).to_string(),
                tooltip: None,
                attrs: Attrs {
                    anchors: series
                        .points
                        .iter()
                        .map(|p| (input.x.map(f64::from(p.week)), y.map(p.value(input.metric))))
                        .collect(),
                    opacity: 1.0,
                    label: None,
                },
            })
            .collect()
    }

    fn point_targets(&self, input: &BindInput<'_>, y: &AxisScale) -> Vec<MarkTarget> {
        let offsets = self.jitter.layout_all(input.points, input.metric);

        input
            .points
            .iter()
            .map(|p| {
                let value = p.value(input.metric);
                let offset = offsets
                    .get(&(p.username.clone(), p.week))
                    .copied()
                    .unwrap_or_default();
                MarkTarget {
                    key: MarkKey::Point(p.username.clone(), p.week),
                    series: Some(p.username.clone()),
                    color: input.palette.color(&p.username).to_string(),
                    tooltip: Some(format!(
                        "{} · week {} · {}: {}",
                        p.username,
                        p.week,
                        input.metric.label(),
                        format_tick(value)
                    )),
                    attrs: Attrs::at(input.x.map(f64::from(p.week)) + offset, y.map(value)),
                }
            })
            .collect()
    }

    fn reconcile_kind(&mut self, kind: MarkKind, targets: Vec<MarkTarget>) -> KindReport {
        let now = self.clock;
        let duration = self.duration;

        let (prev, rest): (BTreeMap<MarkKey, VisualMark>, BTreeMap<MarkKey, VisualMark>) =
            std::mem::take(&mut self.marks)
                .into_iter()
                .partition(|(key, _)| key.kind() == kind);
        self.marks = rest;

        let next: BTreeMap<MarkKey, MarkTarget> =
            targets.into_iter().map(|t| (t.key.clone(), t)).collect();
        let join = reconcile(prev, next);

        let mut report = KindReport::default();
        for (key, target) in join.entering {
            report.entering.push(key.clone());
            self.marks.insert(key, VisualMark::entering(target, now, duration));
        }
        for (key, mut mark, target) in join.updating {
            report.updating.push(key.clone());
            mark.retarget(target, now, duration);
            self.marks.insert(key, mark);
        }
        for (key, mut mark) in join.exiting {
            if mark.phase == MarkPhase::Live {
                report.exiting.push(key.clone());
            }
            mark.begin_exit(now, duration);
            self.marks.insert(key, mark);
        }
        report
    }

    /// Move the animation clock forward. Finished transitions land exactly on
    /// their targets and finished exits are dropped.
    pub fn advance(&mut self, dt: Duration) {
        self.clock += dt;
        let now = self.clock;
        self.marks.retain(|_, mark| !mark.settle(now));
    }

    pub fn is_animating(&self) -> bool {
        self.marks.values().any(|mark| mark.transition.is_some())
    }

    /// Renderable state of every resident mark at the current clock.
    pub fn snapshot(&self) -> Vec<MarkSnapshot> {
        self.marks
            .values()
            .map(|mark| {
                let attrs = mark.sample(self.clock);
                let kind = mark.key.kind();
                let emphasis_scale = |focused: f64| {
                    if mark.emphasis == Emphasis::Focused { focused } else { 1.0 }
                };
                let opacity = match mark.emphasis {
                    Emphasis::Dimmed => attrs.opacity * DIMMED_OPACITY,
                    _ => attrs.opacity,
                };
                let (stroke_width, radius) = match kind {
                    MarkKind::Line => (self.style.line_width * emphasis_scale(FOCUSED_LINE_SCALE), 0.0),
                    MarkKind::Point => (0.0, self.style.point_radius * emphasis_scale(FOCUSED_POINT_SCALE)),
                    MarkKind::LegendEntry => (0.0, self.style.point_radius),
                    MarkKind::YTick => (1.0, 0.0),
                };

                MarkSnapshot {
                    key: mark.key.clone(),
                    series: mark.series.clone(),
                    color: mark.color.clone(),
                    anchors: attrs.anchors,
                    opacity,
                    stroke_width,
                    radius,
                    label: attrs.label,
                    emphasis: mark.emphasis,
                }
            })
            .collect()
    }

    /// Where every live mark is headed, ignoring in-flight progress.
    pub fn settled(&self) -> BTreeMap<MarkKey, Attrs> {
        self.marks
            .values()
            .filter(|mark| mark.phase == MarkPhase::Live)
            .map(|mark| (mark.key.clone(), mark.target.clone()))
            .collect()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hover.as_ref().map(|h| h.username.as_str())
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.hover.as_ref().and_then(|h| h.tooltip.as_ref())
    }

    /// Focus the series under the pointer and dim everything else. Returns
    /// `None` and changes nothing when the target has no live mark.
    pub fn pointer_enter(&mut self, target: HoverTarget) -> Option<HoverEvent> {
        let hover = self.resolve_hover(target)?;
        let event = HoverEvent::Entered {
            username: hover.username.clone(),
            tooltip: hover.tooltip.clone(),
        };

        self.apply_emphasis(Some(&hover.username));
        self.hover = Some(hover);
        self.emit(&event);
        Some(event)
    }

    /// Restore every mark to normal emphasis.
    pub fn pointer_exit(&mut self) {
        self.apply_emphasis(None);
        if self.hover.take().is_some() {
            self.emit(&HoverEvent::Exited);
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&HoverEvent) + 'static) -> Subscription {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        Subscription(id)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription.0);
        self.listeners.len() != before
    }

    fn resolve_hover(&self, target: HoverTarget) -> Option<ActiveHover> {
        let key = match &target {
            HoverTarget::Point { username, week } => MarkKey::Point(username.clone(), *week),
            HoverTarget::Legend { username } => MarkKey::LegendEntry(username.clone()),
        };
        let mark = self
            .marks
            .get(&key)
            .filter(|mark| mark.phase == MarkPhase::Live)?;

        let tooltip = match &target {
            HoverTarget::Point { .. } => Some(Tooltip {
                text: mark.tooltip.clone().unwrap_or_default(),
                anchor: mark.target.anchors.first().copied().unwrap_or_default(),
            }),
            HoverTarget::Legend { .. } => None,
        };

        Some(ActiveHover {
            username: mark.series.clone()?,
            target,
            tooltip,
        })
    }

    /// Re-apply the active hover after a bind: new marks pick up the emphasis,
    /// tooltips follow the new data and a vanished target ends the hover.
    fn refresh_hover(&mut self) {
        let Some(active) = self.hover.take() else {
            return;
        };
        match self.resolve_hover(active.target) {
            Some(hover) => {
                self.apply_emphasis(Some(&hover.username));
                self.hover = Some(hover);
            }
            None => {
                self.apply_emphasis(None);
                self.emit(&HoverEvent::Exited);
            }
        }
    }

    fn apply_emphasis(&mut self, focused: Option<&str>) {
        for mark in self.marks.values_mut() {
            mark.emphasis = match (focused, mark.series.as_deref()) {
                (Some(username), Some(series)) if series == username => Emphasis::Focused,
                (Some(_), Some(_)) => Emphasis::Dimmed,
                _ => Emphasis::Normal,
            };
        }
    }

    fn emit(&mut self, event: &HoverEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }
}

fn tick_targets(y: &AxisScale) -> Vec<MarkTarget> {
    y.ticks
        .iter()
        .map(|tick| {
            let label = format_tick(*tick);
            MarkTarget {
                key: MarkKey::YTick(label.clone()),
                series: None,
                color: AXIS_COLOR.to_string(),
                tooltip: None,
                attrs: Attrs::at(0.0, y.map(*tick)).with_label(label),
            }
        })
        .collect()
}
