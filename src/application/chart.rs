// Chart state - Loading lifecycle, cached data and the render/update entry points
use crate::application::binding::{
    BindInput, BindingEngine, HoverEvent, HoverTarget, MarkStyle, RenderReport, Subscription,
};
use crate::application::ingestor::DataIngestor;
use crate::application::jitter::JitterLayout;
use crate::application::legend::LegendController;
use crate::application::palette::Palette;
use crate::application::scales::ScaleComputer;
use crate::application::surface::{Frame, Surface};
use crate::domain::error::{ChartError, LoadError};
use crate::domain::metric::Metric;
use crate::domain::observation::{ObservationPoint, Series, group_series};
use crate::domain::scale::{AxisScale, format_tick};
use crate::infrastructure::config::ChartConfig;
use std::time::Duration;

/// Gap between the plot's right margin and the legend column.
const LEGEND_GAP: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Loading,
    Ready,
    Failed,
}

enum ChartPhase {
    Uninitialized,
    Loading,
    Ready(Box<LoadedData>),
    Failed(LoadError),
}

/// Observations cached after the first successful load, with what was
/// derived from them for the current metric.
struct LoadedData {
    points: Vec<ObservationPoint>,
    series: Vec<Series>,
    palette: Palette,
    x: AxisScale,
    y: Option<AxisScale>,
    metric: Metric,
}

pub struct ChartState<S: Surface> {
    config: ChartConfig,
    phase: ChartPhase,
    /// Latest metric requested before the data was ready
    pending: Option<Metric>,
    surface: Option<S>,
    engine: BindingEngine,
    scales: ScaleComputer,
    legend: LegendController,
}

impl<S: Surface> ChartState<S> {
    pub fn new(config: ChartConfig) -> Self {
        let engine = BindingEngine::new(
            config.transition(),
            JitterLayout::new(config.jitter_unit),
            MarkStyle {
                line_width: config.line_width,
                point_radius: config.point_radius,
            },
        );
        let scales = ScaleComputer::new(config.plot_width(), config.plot_height());
        let legend = LegendController::new(
            config.plot_width() + config.margin.right + LEGEND_GAP,
            config.legend_row_height / 2.0,
            config.legend_row_height,
        );

        Self {
            config,
            phase: ChartPhase::Uninitialized,
            pending: None,
            surface: None,
            engine,
            scales,
            legend,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.phase {
            ChartPhase::Uninitialized => Phase::Uninitialized,
            ChartPhase::Loading => Phase::Loading,
            ChartPhase::Ready(_) => Phase::Ready,
            ChartPhase::Failed(_) => Phase::Failed,
        }
    }

    pub fn metric(&self) -> Option<Metric> {
        match &self.phase {
            ChartPhase::Ready(data) => Some(data.metric),
            _ => self.pending,
        }
    }

    pub fn y_scale(&self) -> Option<&AxisScale> {
        match &self.phase {
            ChartPhase::Ready(data) => data.y.as_ref(),
            _ => None,
        }
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn engine(&self) -> &BindingEngine {
        &self.engine
    }

    /// Only a fresh chart can start loading; the data is fetched once.
    pub fn begin_loading(&mut self) -> bool {
        match self.phase {
            ChartPhase::Uninitialized => {
                tracing::debug!("Chart loading");
                self.phase = ChartPhase::Loading;
                true
            }
            _ => {
                tracing::warn!("Ignoring load request in phase {:?}", self.phase());
                false
            }
        }
    }

    /// Load every source, then render, or show the placeholder if any source
    /// failed.
    pub async fn load_and_render(
        &mut self,
        ingestor: &DataIngestor,
        sources: &[String],
        container: S,
        metric: Metric,
    ) -> Result<RenderReport, ChartError> {
        match &self.phase {
            ChartPhase::Failed(err) => {
                tracing::warn!("Not reloading a failed chart");
                return Err(ChartError::Load(err.clone()));
            }
            ChartPhase::Ready(_) => {
                tracing::debug!("Data already loaded; switching to {}", metric);
                return self.switch(metric).map(Option::unwrap_or_default);
            }
            ChartPhase::Uninitialized => {
                self.begin_loading();
            }
            ChartPhase::Loading => {}
        }

        match ingestor.load(sources).await {
            Ok(points) => self.render(container, points, sources.len() as u32, metric),
            Err(err) => Err(self.fail(container, err)),
        }
    }

    /// Mount the chart into `container` and draw `data`, loaded from
    /// `week_count` weekly sources, for `metric`. A metric requested while
    /// loading takes precedence over `metric`. A failed chart stays failed.
    pub fn render(
        &mut self,
        container: S,
        data: Vec<ObservationPoint>,
        week_count: u32,
        metric: Metric,
    ) -> Result<RenderReport, ChartError> {
        if let ChartPhase::Failed(err) = &self.phase {
            tracing::warn!("Ignoring render of a failed chart");
            return Err(ChartError::Load(err.clone()));
        }

        let metric = self.pending.take().unwrap_or(metric);
        let series = group_series(&data);
        let palette = Palette::for_usernames(series.iter().map(|s| s.username.as_str()));

        tracing::info!(
            "Rendering {} players over {} weeks ({})",
            series.len(),
            week_count,
            metric
        );

        let mut loaded = LoadedData {
            x: self.scales.compute_x_scale(week_count),
            y: None,
            points: data,
            series,
            palette,
            metric,
        };
        let result = self.bind(&mut loaded, metric);

        self.surface = Some(container);
        self.phase = ChartPhase::Ready(Box::new(loaded));
        self.redraw();
        result
    }

    /// Show the load failure in `container`. No marks are drawn and the chart
    /// stays failed.
    pub fn fail(&mut self, mut container: S, error: LoadError) -> ChartError {
        tracing::error!("Chart data failed to load: {}", error);
        container.show_placeholder(&format!("Could not load chart data: {error}"));
        self.surface = Some(container);
        self.phase = ChartPhase::Failed(error.clone());
        ChartError::Load(error)
    }

    /// Switch to the metric named `selection`. Unknown names are rejected
    /// before anything changes; before the data is ready the request is kept
    /// and applied by [`ChartState::render`]. Returns `None` when queued.
    pub fn update(&mut self, selection: &str) -> Result<Option<RenderReport>, ChartError> {
        let metric: Metric = selection.parse()?;
        self.switch(metric)
    }

    fn switch(&mut self, metric: Metric) -> Result<Option<RenderReport>, ChartError> {
        match &mut self.phase {
            ChartPhase::Uninitialized | ChartPhase::Loading => {
                tracing::debug!("Queueing metric {} until data is ready", metric);
                self.pending = Some(metric);
                Ok(None)
            }
            ChartPhase::Failed(err) => Err(ChartError::Load(err.clone())),
            ChartPhase::Ready(loaded) => {
                let mut loaded = std::mem::replace(loaded, Box::new(LoadedData::empty()));
                let result = self.bind(&mut loaded, metric);
                self.phase = ChartPhase::Ready(loaded);
                self.redraw();
                result.map(Some)
            }
        }
    }

    pub fn advance(&mut self, dt: Duration) {
        self.engine.advance(dt);
        self.redraw();
    }

    /// Step the animation until every transition has landed.
    pub fn settle(&mut self, step: Duration) {
        let step = if step.is_zero() { self.config.transition() } else { step };
        while self.engine.is_animating() {
            self.engine.advance(step.max(Duration::from_millis(1)));
        }
        self.redraw();
    }

    pub fn pointer_enter(&mut self, target: HoverTarget) -> Option<HoverEvent> {
        let event = self.engine.pointer_enter(target);
        if event.is_some() {
            self.redraw();
        }
        event
    }

    pub fn pointer_exit(&mut self) {
        self.engine.pointer_exit();
        self.redraw();
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&HoverEvent) + 'static) -> Subscription {
        self.engine.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.engine.unsubscribe(subscription)
    }

    fn bind(&mut self, loaded: &mut LoadedData, metric: Metric) -> Result<RenderReport, ChartError> {
        let y = self.scales.compute_y_scale(&loaded.points, metric);
        loaded.metric = metric;
        loaded.y = y.as_ref().ok().cloned();

        let entries = LegendController::build_legend(&loaded.series, metric);
        let report = self.engine.bind(BindInput {
            series: &loaded.series,
            points: &loaded.points,
            metric,
            x: &loaded.x,
            y: loaded.y.as_ref(),
            palette: &loaded.palette,
            legend: self.legend.targets(&entries, &loaded.palette),
        });

        if let Err(err) = &y {
            tracing::warn!("{}; drawing empty axes", err);
        }
        y.map(|_| report)
    }

    fn redraw(&mut self) {
        let ChartPhase::Ready(loaded) = &self.phase else {
            return;
        };
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        let frame = Frame {
            width: self.config.width + self.config.legend_width,
            height: self.config.height(),
            margin: self.config.margin,
            legend_width: self.config.legend_width,
            plot_width: self.config.plot_width(),
            plot_height: self.config.plot_height(),
            metric: loaded.metric,
            x_ticks: loaded
                .x
                .ticks
                .iter()
                .map(|tick| (loaded.x.map(*tick), format_tick(*tick)))
                .collect(),
            marks: self.engine.snapshot(),
            tooltip: self.engine.tooltip().cloned(),
        };
        surface.draw(&frame);
    }
}

impl LoadedData {
    fn empty() -> Self {
        Self {
            points: Vec::new(),
            series: Vec::new(),
            palette: Palette::default(),
            x: AxisScale::new((1.0, 1.0), (0.0, 0.0), Vec::new()),
            y: None,
            metric: Metric::TotalDeaths,
        }
    }
}
