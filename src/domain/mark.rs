// Visual mark domain models - Keyed marks, their attributes and transitions
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkKind {
    Line,
    Point,
    LegendEntry,
    YTick,
}

/// Stable identity of a mark. Never changes across metric switches.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkKey {
    Line(String),
    Point(String, u32),
    LegendEntry(String),
    YTick(String),
}

impl MarkKey {
    pub fn kind(&self) -> MarkKind {
        match self {
            MarkKey::Line(_) => MarkKind::Line,
            MarkKey::Point(..) => MarkKind::Point,
            MarkKey::LegendEntry(_) => MarkKind::LegendEntry,
            MarkKey::YTick(_) => MarkKind::YTick,
        }
    }
}

/// Animatable attributes. Lines carry one anchor per week, every other kind
/// carries exactly one anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct Attrs {
    pub anchors: Vec<(f64, f64)>,
    pub opacity: f64,
    pub label: Option<String>,
}

impl Attrs {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            anchors: vec![(x, y)],
            opacity: 1.0,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn hidden(&self) -> Self {
        Self {
            opacity: 0.0,
            ..self.clone()
        }
    }

    /// Geometry interpolates vertex by vertex when both sides have the same
    /// shape and snaps to `to` otherwise. Labels always snap.
    pub fn lerp(from: &Attrs, to: &Attrs, t: f64) -> Attrs {
        let anchors = if from.anchors.len() == to.anchors.len() {
            from.anchors
                .iter()
                .zip(&to.anchors)
                .map(|(a, b)| (lerp(a.0, b.0, t), lerp(a.1, b.1, t)))
                .collect()
        } else {
            to.anchors.clone()
        };

        Attrs {
            anchors,
            opacity: lerp(from.opacity, to.opacity, t),
            label: to.label.clone(),
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: Attrs,
    pub to: Attrs,
    pub started: Duration,
    pub duration: Duration,
}

impl Transition {
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }

    pub fn sample(&self, now: Duration) -> Attrs {
        if self.is_finished(now) {
            return self.to.clone();
        }
        Attrs::lerp(&self.from, &self.to, ease_cubic_in_out(self.progress(now)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkPhase {
    Live,
    Exiting,
}

/// Hover overlay. Kept apart from attributes so clearing it always restores
/// the undecorated mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emphasis {
    #[default]
    Normal,
    Focused,
    Dimmed,
}

/// What a mark should look like once bound to the current data.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkTarget {
    pub key: MarkKey,
    /// Username the mark belongs to, if any.
    pub series: Option<String>,
    pub color: String,
    pub tooltip: Option<String>,
    pub attrs: Attrs,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisualMark {
    pub key: MarkKey,
    pub series: Option<String>,
    pub color: String,
    pub tooltip: Option<String>,
    pub current: Attrs,
    pub target: Attrs,
    pub transition: Option<Transition>,
    pub phase: MarkPhase,
    pub emphasis: Emphasis,
}

impl VisualMark {
    /// New marks appear at their final geometry, fading in from invisible.
    pub fn entering(target: MarkTarget, now: Duration, duration: Duration) -> Self {
        let start = target.attrs.hidden();
        Self {
            key: target.key,
            series: target.series,
            color: target.color,
            tooltip: target.tooltip,
            current: start.clone(),
            transition: Some(Transition {
                from: start,
                to: target.attrs.clone(),
                started: now,
                duration,
            }),
            target: target.attrs,
            phase: MarkPhase::Live,
            emphasis: Emphasis::Normal,
        }
    }

    pub fn sample(&self, now: Duration) -> Attrs {
        match &self.transition {
            Some(transition) => transition.sample(now),
            None => self.current.clone(),
        }
    }

    /// Start a transition from wherever the mark is right now. Any in-flight
    /// transition is replaced, not queued.
    pub fn retarget(&mut self, target: MarkTarget, now: Duration, duration: Duration) {
        let from = self.sample(now);
        self.transition = Some(Transition {
            from: from.clone(),
            to: target.attrs.clone(),
            started: now,
            duration,
        });
        self.current = from;
        self.target = target.attrs;
        self.color = target.color;
        self.tooltip = target.tooltip;
        self.series = target.series;
        self.phase = MarkPhase::Live;
    }

    /// Fade out from the current geometry. No-op when already exiting.
    pub fn begin_exit(&mut self, now: Duration, duration: Duration) {
        if self.phase == MarkPhase::Exiting {
            return;
        }
        let from = self.sample(now);
        let to = from.hidden();
        self.transition = Some(Transition {
            from: from.clone(),
            to: to.clone(),
            started: now,
            duration,
        });
        self.current = from;
        self.target = to;
        self.phase = MarkPhase::Exiting;
    }

    /// Sample the transition at `now`, landing exactly on the target once it
    /// completes. Returns true when the mark has finished exiting.
    pub fn settle(&mut self, now: Duration) -> bool {
        let finished = match &self.transition {
            Some(transition) if transition.is_finished(now) => true,
            Some(transition) => {
                self.current = transition.sample(now);
                false
            }
            None => true,
        };

        if finished {
            if let Some(transition) = self.transition.take() {
                self.current = transition.to;
            }
        }
        finished && self.phase == MarkPhase::Exiting
    }
}

/// Renderable state of one mark at the engine clock, hover styling applied.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkSnapshot {
    pub key: MarkKey,
    pub series: Option<String>,
    pub color: String,
    pub anchors: Vec<(f64, f64)>,
    pub opacity: f64,
    pub stroke_width: f64,
    pub radius: f64,
    pub label: Option<String>,
    pub emphasis: Emphasis,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub text: String,
    pub anchor: (f64, f64),
}
