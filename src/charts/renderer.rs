//! Static Chart Renderer
//! Draws render requests into PNG files with plotters.
//!
//! Layout per image:
//! 1. Caption: the request title
//! 2. Plot area with optional mesh and axis descriptions
//! 3. Legend box (upper right) when any series is named

use super::{DashStyle, DataSeries, RenderError, RenderRequest, TextPosition, TraceKind};
use crate::state::{Color as StateColor, MarkerShape};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use tracing::debug;

const FONT: &str = "sans-serif";
const GROUP_WIDTH: f64 = 0.8;
const RANGE_PADDING: f64 = 0.08;

fn rgba(color: StateColor) -> RGBAColor {
    RGBAColor(color.r, color.g, color.b, f64::from(color.a))
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `request` to a PNG at `path`.
    pub fn render_to_png(
        request: &RenderRequest,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        Self::draw(request, &root, size)
            .map_err(|e| RenderError::draw(&request.surface_id, e))?;
        debug!(surface = %request.surface_id, path = %path.display(), "wrote png");
        Ok(())
    }

    fn draw(
        request: &RenderRequest,
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        size: (u32, u32),
    ) -> anyhow::Result<()> {
        root.fill(&WHITE)?;

        let layout = &request.layout;
        let (x_range, y_range) = Self::plot_ranges(request, size);

        let mut chart = ChartBuilder::on(root)
            .caption(&layout.title, (FONT, 22))
            .margin(15)
            .x_label_area_size(if layout.x_axis.show_tick_labels { 40 } else { 0 })
            .y_label_area_size(if layout.y_axis.show_tick_labels { 60 } else { 0 })
            .build_cartesian_2d(x_range, y_range)?;

        let categories: Option<Vec<String>> = request.categories().map(<[String]>::to_vec);
        let x_formatter = |v: &f64| match &categories {
            Some(labels) => {
                let idx = v.round();
                if (v - idx).abs() > 1e-6 || idx < 0.0 {
                    String::new()
                } else {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                }
            }
            None => format!("{v}"),
        };

        let mut mesh = chart.configure_mesh();
        mesh.x_label_formatter(&x_formatter);
        if let Some(labels) = &categories {
            mesh.x_labels(labels.len());
        }
        if let Some(title) = &layout.x_axis.title {
            mesh.x_desc(title.as_str());
        }
        if let Some(title) = &layout.y_axis.title {
            mesh.y_desc(title.as_str());
        }
        if !layout.x_axis.show_grid && !layout.y_axis.show_grid {
            mesh.disable_mesh();
        }
        if !layout.x_axis.show_tick_labels && !layout.y_axis.show_tick_labels {
            mesh.disable_axes();
        }
        mesh.draw()?;

        let bar_count = request
            .series
            .iter()
            .filter(|s| s.kind == TraceKind::Bar)
            .count();
        let mut bar_index = 0;
        let mut any_named = false;

        for (i, series) in request.series.iter().enumerate() {
            let color = rgba(series.stroke_color(i));
            let points: Vec<(f64, f64)> = series.points().into_iter().map(|[x, y]| (x, y)).collect();

            let anno = match series.kind {
                TraceKind::Bar => {
                    let width = GROUP_WIDTH / bar_count.max(1) as f64;
                    let offset = (bar_index as f64 - (bar_count as f64 - 1.0) / 2.0) * width;
                    bar_index += 1;
                    chart.draw_series(points.iter().map(|&(x, y)| {
                        let x0 = x + offset - width / 2.0;
                        Rectangle::new([(x0, 0.0), (x0 + width, y)], color.filled())
                    }))?
                }
                TraceKind::Scatter => {
                    Self::draw_scatter(&mut chart, series, &points, color)?;
                    // Empty series carrying the legend entry.
                    chart.draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())?
                }
            };

            if let Some(name) = &series.name {
                any_named = true;
                anno.label(name.as_str()).legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled())
                });
            }
        }

        if any_named {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .label_font((FONT, 14))
                .draw()?;
        }

        root.present()?;
        Ok(())
    }

    fn draw_scatter<DB: DrawingBackend>(
        chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
        series: &DataSeries,
        points: &[(f64, f64)],
        color: RGBAColor,
    ) -> anyhow::Result<()>
    where
        DB::ErrorType: 'static,
    {
        let width = series.line.as_ref().map_or(2.0, |l| l.width);
        let line_style = color.stroke_width(width.round().max(1.0) as u32);

        if let Some(fill) = &series.fill {
            chart.draw_series(std::iter::once(Polygon::new(
                points.to_vec(),
                rgba(fill.color).filled(),
            )))?;
            let mut outline = points.to_vec();
            outline.extend(points.first().copied());
            chart.draw_series(std::iter::once(PathElement::new(outline, line_style)))?;
        } else if series.mode.lines {
            match series.line.as_ref().map_or(DashStyle::Solid, |l| l.dash) {
                DashStyle::Solid => {
                    chart.draw_series(LineSeries::new(points.to_vec(), line_style))?;
                }
                DashStyle::Dash => {
                    chart.draw_series(DashedLineSeries::new(points.to_vec(), 10, 6, line_style))?;
                }
                DashStyle::Dot => {
                    chart.draw_series(DashedLineSeries::new(points.to_vec(), 2, 4, line_style))?;
                }
            }
        }

        if series.mode.markers {
            let (shape, size, marker_color) = series.marker.as_ref().map_or(
                (MarkerShape::Circle, 6.0, color),
                |m| (m.symbol, m.size, rgba(m.color)),
            );
            Self::draw_markers(chart, points, shape, (size / 2.0).round() as i32, marker_color)?;
        }

        if let Some(text) = series.text.as_ref().filter(|_| series.mode.text) {
            let font_size = f64::from(text.font_size);
            let dy = match text.position {
                TextPosition::TopCenter => -(font_size as i32) - 6,
                TextPosition::BottomCenter => 6,
            };
            chart.draw_series(points.iter().zip(&text.labels).map(|(&p, label)| {
                // Roughly center the label horizontally on the point.
                let dx = -((label.chars().count() as f64 * font_size * 0.3) as i32);
                EmptyElement::at(p)
                    + plotters::element::Text::new(
                        label.clone(),
                        (dx, dy),
                        (FONT, font_size).into_font().color(&color),
                    )
            }))?;
        }

        Ok(())
    }

    fn draw_markers<DB: DrawingBackend>(
        chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
        points: &[(f64, f64)],
        shape: MarkerShape,
        r: i32,
        color: RGBAColor,
    ) -> anyhow::Result<()>
    where
        DB::ErrorType: 'static,
    {
        let style = color.filled();
        let stroke = color.stroke_width(2);
        let pts = points.iter().copied();
        match shape {
            MarkerShape::Circle => {
                chart.draw_series(pts.map(|c| Circle::new(c, r, style)))?;
            }
            MarkerShape::Square => {
                chart.draw_series(
                    pts.map(|c| EmptyElement::at(c) + Rectangle::new([(-r, -r), (r, r)], style)),
                )?;
            }
            MarkerShape::Diamond => {
                chart.draw_series(pts.map(|c| {
                    EmptyElement::at(c) + Polygon::new(vec![(0, -r), (r, 0), (0, r), (-r, 0)], style)
                }))?;
            }
            MarkerShape::TriangleUp => {
                chart.draw_series(pts.map(|c| TriangleMarker::new(c, r, style)))?;
            }
            MarkerShape::Cross => {
                chart.draw_series(pts.map(|c| {
                    EmptyElement::at(c)
                        + PathElement::new(vec![(-r, 0), (r, 0)], stroke)
                        + PathElement::new(vec![(0, -r), (0, r)], stroke)
                }))?;
            }
            MarkerShape::X => {
                chart.draw_series(pts.map(|c| Cross::new(c, r, stroke)))?;
            }
        }
        Ok(())
    }

    /// Data ranges for both axes, honoring fixed ranges and locked aspect.
    pub fn plot_ranges(request: &RenderRequest, size: (u32, u32)) -> (Range<f64>, Range<f64>) {
        let layout = &request.layout;

        let x_range = match (layout.x_axis.range, request.categories()) {
            (Some([min, max]), _) => min..max,
            (None, Some(labels)) => -0.5..labels.len() as f64 - 0.5,
            (None, None) => {
                let xs = request.series.iter().flat_map(|s| s.x.positions());
                Self::padded(xs, false)
            }
        };

        let y_range = match layout.y_axis.range {
            Some([min, max]) => min..max,
            None => {
                let include_zero = request.series.iter().any(|s| s.kind == TraceKind::Bar);
                let ys = request.series.iter().flat_map(|s| s.y.iter().copied());
                Self::padded(ys, include_zero)
            }
        };

        if layout.lock_aspect {
            Self::lock_aspect(x_range, y_range, size)
        } else {
            (x_range, y_range)
        }
    }

    fn padded(values: impl Iterator<Item = f64>, include_zero: bool) -> Range<f64> {
        let (mut min, mut max) = values
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if min > max {
            return 0.0..1.0;
        }
        if include_zero {
            min = min.min(0.0);
            max = max.max(0.0);
        }
        let span = if max > min { max - min } else { 1.0 };
        let pad = span * RANGE_PADDING;
        let lo = if include_zero && min >= 0.0 { min } else { min - pad };
        lo..max + pad
    }

    /// Widen one axis so one data unit spans the same number of pixels on both.
    fn lock_aspect(x: Range<f64>, y: Range<f64>, size: (u32, u32)) -> (Range<f64>, Range<f64>) {
        let (w, h) = (f64::from(size.0.max(1)), f64::from(size.1.max(1)));
        let (x_span, y_span) = (x.end - x.start, y.end - y.start);
        let (x_mid, y_mid) = ((x.start + x.end) / 2.0, (y.start + y.end) / 2.0);

        let units_per_px = (x_span / w).max(y_span / h);
        let half_x = units_per_px * w / 2.0;
        let half_y = units_per_px * h / 2.0;
        (x_mid - half_x..x_mid + half_x, y_mid - half_y..y_mid + half_y)
    }
}
