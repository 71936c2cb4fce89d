//! Chart Plotter Module
//! Interactive render surface drawing requests with egui_plot.

use super::{
    AnimationPatch, DashStyle, DataSeries, Easing, RenderError, RenderRequest, RenderSurface,
    TextPosition, TraceKind, TransitionSpec,
};
use crate::state::{Color, MarkerShape};
use egui::{Align2, Color32, RichText, Stroke};
use egui_plot::{
    Bar, BarChart, Legend, Line, LineStyle, Plot, PlotPoint, PlotPoints, Points, Polygon, Text,
};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Total width shared by the bars of one category.
const GROUP_WIDTH: f64 = 0.8;

/// A running transition of one trace's y values.
#[derive(Debug, Clone)]
struct ActiveTransition {
    trace: usize,
    from: Vec<f64>,
    to: Vec<f64>,
    started: Instant,
    duration: Duration,
    easing: Easing,
}

impl ActiveTransition {
    fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        self.easing
            .apply(elapsed.as_secs_f64() / self.duration.as_secs_f64())
    }

    fn values_at(&self, now: Instant) -> Vec<f64> {
        let t = self.progress(now);
        self.from
            .iter()
            .zip(&self.to)
            .map(|(a, b)| a + (b - a) * t)
            .collect()
    }

    fn finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}

#[derive(Debug, Clone)]
struct SurfaceState {
    request: RenderRequest,
    /// Bumped on resize so the plot forgets its zoom/pan and re-fits.
    generation: u64,
    transition: Option<ActiveTransition>,
}

impl SurfaceState {
    fn trace_values(&self, trace: usize, now: Instant) -> Option<Vec<f64>> {
        match &self.transition {
            Some(t) if t.trace == trace => Some(t.values_at(now)),
            _ => self.request.series.get(trace).map(|s| s.y.clone()),
        }
    }
}

/// Converts a stored color into an egui color.
pub fn to_color32(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.alpha_u8())
}

fn plot_marker(shape: MarkerShape) -> egui_plot::MarkerShape {
    match shape {
        MarkerShape::Circle => egui_plot::MarkerShape::Circle,
        MarkerShape::Square => egui_plot::MarkerShape::Square,
        MarkerShape::Diamond => egui_plot::MarkerShape::Diamond,
        MarkerShape::TriangleUp => egui_plot::MarkerShape::Up,
        MarkerShape::Cross => egui_plot::MarkerShape::Plus,
        MarkerShape::X => egui_plot::MarkerShape::Cross,
    }
}

fn plot_line_style(dash: DashStyle) -> LineStyle {
    match dash {
        DashStyle::Solid => LineStyle::Solid,
        DashStyle::Dash => LineStyle::Dashed { length: 10.0 },
        DashStyle::Dot => LineStyle::Dotted { spacing: 5.0 },
    }
}

/// Render surface backed by egui_plot.
///
/// `render`, `resize` and `animate` only update the retained requests; the
/// plots themselves are drawn each frame by [`PlotSurface::show`].
#[derive(Debug, Default)]
pub struct PlotSurface {
    surfaces: HashMap<String, SurfaceState>,
}

impl PlotSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self, surface_id: &str) -> Option<&RenderRequest> {
        self.surfaces.get(surface_id).map(|s| &s.request)
    }

    /// Whether any surface has a transition still running.
    pub fn is_animating(&self) -> bool {
        let now = Instant::now();
        self.surfaces
            .values()
            .any(|s| s.transition.as_ref().is_some_and(|t| !t.finished(now)))
    }

    /// Draw one surface into `ui`.
    pub fn show(&mut self, ui: &mut egui::Ui, surface_id: &str, height: f32) {
        let now = Instant::now();
        let Some(state) = self.surfaces.get_mut(surface_id) else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(16.0));
            });
            return;
        };

        if state.transition.as_ref().is_some_and(|t| t.finished(now)) {
            if let Some(t) = state.transition.take() {
                if let Some(series) = state.request.series.get_mut(t.trace) {
                    series.y = t.to;
                }
            }
        }

        Self::draw_request(ui, state, now, height);
    }

    fn draw_request(ui: &mut egui::Ui, state: &SurfaceState, now: Instant, height: f32) {
        let request = &state.request;
        let layout = &request.layout;

        let mut plot = Plot::new((request.surface_id.as_str(), state.generation))
            .height(height)
            .allow_scroll(false)
            .show_axes([layout.x_axis.show_tick_labels, layout.y_axis.show_tick_labels])
            .show_grid([layout.x_axis.show_grid, layout.y_axis.show_grid]);

        if request.series.iter().any(|s| s.name.is_some()) {
            plot = plot.legend(Legend::default());
        }
        if let Some(title) = &layout.x_axis.title {
            plot = plot.x_axis_label(title.clone());
        }
        if let Some(title) = &layout.y_axis.title {
            plot = plot.y_axis_label(title.clone());
        }
        if let Some([min, max]) = layout.y_axis.range {
            plot = plot.include_y(min).include_y(max);
        }
        if let Some([min, max]) = layout.x_axis.range {
            plot = plot.include_x(min).include_x(max);
        }
        if layout.lock_aspect {
            plot = plot.data_aspect(1.0);
        }
        if let Some(labels) = request.categories() {
            let labels = labels.to_vec();
            plot = plot.x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            });
        }

        let bar_count = request
            .series
            .iter()
            .filter(|s| s.kind == TraceKind::Bar)
            .count();

        plot.show(ui, |plot_ui| {
            let mut bar_index = 0;
            for (i, series) in request.series.iter().enumerate() {
                let y = state.trace_values(i, now).unwrap_or_default();
                match series.kind {
                    TraceKind::Bar => {
                        plot_ui.bar_chart(Self::bar_chart(series, &y, bar_index, bar_count));
                        bar_index += 1;
                    }
                    TraceKind::Scatter => Self::draw_scatter(plot_ui, series, &y, i),
                }
            }
        });
    }

    fn bar_chart(series: &DataSeries, y: &[f64], index: usize, count: usize) -> BarChart {
        let width = GROUP_WIDTH / count.max(1) as f64;
        let offset = (index as f64 - (count as f64 - 1.0) / 2.0) * width;
        let color = to_color32(series.stroke_color(index));

        let bars = y
            .iter()
            .enumerate()
            .map(|(j, &v)| Bar::new(series.x.position(j) + offset, v).width(width))
            .collect();

        BarChart::new(bars)
            .color(color)
            .name(series.name.clone().unwrap_or_default())
    }

    fn draw_scatter(plot_ui: &mut egui_plot::PlotUi, series: &DataSeries, y: &[f64], index: usize) {
        let points: Vec<[f64; 2]> = y
            .iter()
            .enumerate()
            .map(|(j, &v)| [series.x.position(j), v])
            .collect();
        let stroke_color = to_color32(series.stroke_color(index));
        let name = series.name.clone().unwrap_or_default();

        if let Some(fill) = &series.fill {
            let width = series.line.as_ref().map_or(1.0, |l| l.width);
            plot_ui.polygon(
                Polygon::new(PlotPoints::from(points.clone()))
                    .fill_color(to_color32(fill.color))
                    .stroke(Stroke::new(width, stroke_color))
                    .name(&name),
            );
        } else if series.mode.lines {
            let mut line = Line::new(PlotPoints::from(points.clone()))
                .color(stroke_color)
                .name(&name);
            if let Some(spec) = &series.line {
                line = line.width(spec.width).style(plot_line_style(spec.dash));
            }
            plot_ui.line(line);
        }

        if series.mode.markers {
            let mut markers = Points::new(PlotPoints::from(points.clone()))
                .color(stroke_color)
                .radius(3.0)
                .name(&name);
            if let Some(spec) = &series.marker {
                markers = markers
                    .shape(plot_marker(spec.symbol))
                    .radius(spec.size / 2.0)
                    .color(to_color32(spec.color));
            }
            plot_ui.points(markers);
        }

        if let Some(text) = series.text.as_ref().filter(|_| series.mode.text) {
            let anchor = match text.position {
                TextPosition::TopCenter => Align2::CENTER_BOTTOM,
                TextPosition::BottomCenter => Align2::CENTER_TOP,
            };
            for (point, label) in points.iter().zip(&text.labels) {
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(point[0], point[1]),
                        RichText::new(label).size(text.font_size as f32),
                    )
                    .anchor(anchor)
                    .color(stroke_color),
                );
            }
        }
    }
}

impl RenderSurface for PlotSurface {
    fn render(&mut self, request: &RenderRequest) -> Result<(), RenderError> {
        let generation = self
            .surfaces
            .get(&request.surface_id)
            .map_or(0, |s| s.generation);
        self.surfaces.insert(
            request.surface_id.clone(),
            SurfaceState {
                request: request.clone(),
                generation,
                transition: None,
            },
        );
        Ok(())
    }

    fn resize(&mut self, surface_id: &str) -> Result<(), RenderError> {
        let state = self
            .surfaces
            .get_mut(surface_id)
            .ok_or_else(|| RenderError::UnknownSurface(surface_id.to_string()))?;
        state.generation += 1;
        debug!(surface_id, generation = state.generation, "resized plot");
        Ok(())
    }

    fn animate(
        &mut self,
        surface_id: &str,
        patch: &AnimationPatch,
        transition: &TransitionSpec,
    ) -> Result<(), RenderError> {
        let now = Instant::now();
        let state = self
            .surfaces
            .get_mut(surface_id)
            .ok_or_else(|| RenderError::UnknownSurface(surface_id.to_string()))?;

        let from = state
            .trace_values(patch.trace, now)
            .ok_or_else(|| RenderError::TraceOutOfRange {
                surface_id: surface_id.to_string(),
                trace: patch.trace,
            })?;
        if from.len() != patch.y.len() {
            warn!(surface_id, trace = patch.trace, "animation patch length mismatch");
            return Err(RenderError::PatchLength {
                surface_id: surface_id.to_string(),
                trace: patch.trace,
                expected: from.len(),
                found: patch.y.len(),
            });
        }

        state.transition = Some(ActiveTransition {
            trace: patch.trace,
            from,
            to: patch.y.clone(),
            started: now,
            duration: transition.duration(),
            easing: transition.easing,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{AxisSpec, LayoutSpec, RenderOptions, TraceMode, XValues};

    fn request(id: &str, y: Vec<f64>) -> RenderRequest {
        RenderRequest {
            surface_id: id.to_string(),
            series: vec![DataSeries::scatter(
                XValues::Numbers((0..y.len()).map(|i| i as f64).collect()),
                y,
                TraceMode::LINES,
            )],
            layout: LayoutSpec::new("t", AxisSpec::default(), AxisSpec::default()),
            options: RenderOptions::default(),
        }
    }

    #[test]
    fn resize_and_animate_need_a_drawn_surface() {
        let mut surface = PlotSurface::new();
        assert!(matches!(
            surface.resize("book-chart"),
            Err(RenderError::UnknownSurface(_))
        ));

        surface.render(&request("book-chart", vec![1.0, 2.0])).unwrap();
        surface.resize("book-chart").unwrap();
        assert_eq!(surface.surfaces["book-chart"].generation, 1);

        // Re-rendering keeps the resize generation.
        surface.render(&request("book-chart", vec![3.0, 4.0])).unwrap();
        assert_eq!(surface.surfaces["book-chart"].generation, 1);
    }

    #[test]
    fn animate_rejects_bad_patches() {
        let mut surface = PlotSurface::new();
        surface.render(&request("exchange-chart", vec![1.0, 2.0])).unwrap();
        let transition = TransitionSpec {
            duration_ms: 100.0,
            easing: Easing::CubicInOut,
        };

        let wrong_trace = AnimationPatch { trace: 3, y: vec![1.0, 2.0] };
        assert!(matches!(
            surface.animate("exchange-chart", &wrong_trace, &transition),
            Err(RenderError::TraceOutOfRange { trace: 3, .. })
        ));

        let wrong_len = AnimationPatch { trace: 0, y: vec![1.0] };
        assert!(matches!(
            surface.animate("exchange-chart", &wrong_len, &transition),
            Err(RenderError::PatchLength { expected: 2, found: 1, .. })
        ));

        let ok = AnimationPatch { trace: 0, y: vec![5.0, 6.0] };
        surface.animate("exchange-chart", &ok, &transition).unwrap();
        assert!(surface.is_animating());
    }

    #[test]
    fn transition_interpolates_between_values() {
        let started = Instant::now();
        let t = ActiveTransition {
            trace: 0,
            from: vec![0.0, 10.0],
            to: vec![10.0, 0.0],
            started,
            duration: Duration::from_millis(100),
            easing: Easing::Linear,
        };
        assert_eq!(t.values_at(started), vec![0.0, 10.0]);
        let mid = t.values_at(started + Duration::from_millis(50));
        assert!((mid[0] - 5.0).abs() < 1e-9 && (mid[1] - 5.0).abs() < 1e-9);
        assert_eq!(t.values_at(started + Duration::from_millis(200)), vec![10.0, 0.0]);
        assert!(t.finished(started + Duration::from_millis(100)));
    }

    #[test]
    fn colors_convert_with_alpha() {
        let c = to_color32(Color::rgb(255, 0, 0).with_alpha(0.0));
        assert_eq!(c.a(), 0);
        assert_eq!(to_color32(Color::rgb(1, 2, 3)), Color32::from_rgb(1, 2, 3));
    }
}
