//! Render Request Types
//! Backend-neutral description of what a panel wants drawn.

use crate::state::{Color, MarkerShape};
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// Fallback trace colors, in trace order, for series that do not set one.
pub const DEFAULT_TRACE_COLORS: [Color; 4] = [
    Color::rgb(0x1f, 0x77, 0xb4),
    Color::rgb(0xff, 0x7f, 0x0e),
    Color::rgb(0x2c, 0xa0, 0x2c),
    Color::rgb(0xd6, 0x27, 0x28),
];

pub fn default_trace_color(index: usize) -> Color {
    DEFAULT_TRACE_COLORS[index % DEFAULT_TRACE_COLORS.len()]
}

/// X coordinates of a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum XValues {
    Categories(Vec<String>),
    Numbers(Vec<f64>),
}

impl XValues {
    pub fn categories<S: AsRef<str>>(labels: &[S]) -> Self {
        XValues::Categories(labels.iter().map(|s| s.as_ref().to_string()).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            XValues::Categories(c) => c.len(),
            XValues::Numbers(n) => n.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric position of point `i`. Categories sit at their index.
    pub fn position(&self, i: usize) -> f64 {
        match self {
            XValues::Categories(_) => i as f64,
            XValues::Numbers(n) => n[i],
        }
    }

    pub fn positions(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.position(i)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    Bar,
    Scatter,
}

/// Which parts of a scatter trace are drawn, serialized as e.g. `"lines+markers"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraceMode {
    pub lines: bool,
    pub markers: bool,
    pub text: bool,
}

impl TraceMode {
    pub const LINES: TraceMode = TraceMode {
        lines: true,
        markers: false,
        text: false,
    };
    pub const LINES_MARKERS: TraceMode = TraceMode {
        lines: true,
        markers: true,
        text: false,
    };
    pub const LINES_MARKERS_TEXT: TraceMode = TraceMode {
        lines: true,
        markers: true,
        text: true,
    };
}

impl fmt::Display for TraceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [(self.lines, "lines"), (self.markers, "markers"), (self.text, "text")]
            .into_iter()
            .filter_map(|(on, name)| on.then_some(name))
            .collect();
        if parts.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&parts.join("+"))
        }
    }
}

impl Serialize for TraceMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DashStyle {
    Solid,
    Dash,
    Dot,
}

impl DashStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            DashStyle::Solid => "solid",
            DashStyle::Dash => "dash",
            DashStyle::Dot => "dot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSpec {
    pub color: Color,
    pub dash: DashStyle,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    pub symbol: MarkerShape,
    pub size: f32,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextPosition {
    TopCenter,
    BottomCenter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSpec {
    pub labels: Vec<String>,
    pub position: TextPosition,
    pub font_size: u32,
    pub family: String,
}

/// Area fill closing the trace back onto its first point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillSpec {
    pub color: Color,
}

/// One named data trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSeries {
    pub name: Option<String>,
    pub kind: TraceKind,
    pub mode: TraceMode,
    pub x: XValues,
    pub y: Vec<f64>,
    pub bar_color: Option<Color>,
    pub line: Option<LineSpec>,
    pub marker: Option<MarkerSpec>,
    pub text: Option<TextSpec>,
    pub fill: Option<FillSpec>,
}

impl DataSeries {
    pub fn bar(name: &str, x: XValues, y: Vec<f64>, color: Color) -> Self {
        Self {
            name: Some(name.to_string()),
            kind: TraceKind::Bar,
            mode: TraceMode::default(),
            x,
            y,
            bar_color: Some(color),
            line: None,
            marker: None,
            text: None,
            fill: None,
        }
    }

    pub fn scatter(x: XValues, y: Vec<f64>, mode: TraceMode) -> Self {
        Self {
            name: None,
            kind: TraceKind::Scatter,
            mode,
            x,
            y,
            bar_color: None,
            line: None,
            marker: None,
            text: None,
            fill: None,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_line(mut self, line: LineSpec) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_marker(mut self, marker: MarkerSpec) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn with_text(mut self, text: TextSpec) -> Self {
        self.text = Some(text);
        self
    }

    pub fn with_fill(mut self, fill: FillSpec) -> Self {
        self.fill = Some(fill);
        self
    }

    /// Stroke color, falling back to the default trace palette.
    pub fn stroke_color(&self, index: usize) -> Color {
        self.line
            .as_ref()
            .map(|l| l.color)
            .or(self.bar_color)
            .or_else(|| self.marker.as_ref().map(|m| m.color))
            .unwrap_or_else(|| default_trace_color(index))
    }

    pub fn points(&self) -> Vec<[f64; 2]> {
        self.y
            .iter()
            .enumerate()
            .map(|(i, &y)| [self.x.position(i), y])
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSpec {
    pub title: Option<String>,
    pub range: Option<[f64; 2]>,
    pub show_grid: bool,
    pub zero_line: bool,
    pub show_tick_labels: bool,
}

impl AxisSpec {
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Self::default()
        }
    }

    /// Axis with no grid, zero line, ticks or title.
    pub fn hidden() -> Self {
        Self {
            title: None,
            range: None,
            show_grid: false,
            zero_line: false,
            show_tick_labels: false,
        }
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some([min, max]);
        self
    }
}

impl Default for AxisSpec {
    fn default() -> Self {
        Self {
            title: None,
            range: None,
            show_grid: true,
            zero_line: true,
            show_tick_labels: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    Group,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSpec {
    pub title: String,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub bar_mode: Option<BarMode>,
    /// One x unit is as long as one y unit on screen.
    pub lock_aspect: bool,
}

impl LayoutSpec {
    pub fn new(title: impl Into<String>, x_axis: AxisSpec, y_axis: AxisSpec) -> Self {
        Self {
            title: title.into(),
            x_axis,
            y_axis,
            bar_mode: None,
            lock_aspect: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderOptions {
    pub responsive: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { responsive: true }
    }
}

/// Everything a surface needs to draw one panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderRequest {
    pub surface_id: String,
    pub series: Vec<DataSeries>,
    pub layout: LayoutSpec,
    pub options: RenderOptions,
}

impl RenderRequest {
    /// Category labels of the first categorical series, if any.
    pub fn categories(&self) -> Option<&[String]> {
        self.series.iter().find_map(|s| match &s.x {
            XValues::Categories(c) => Some(c.as_slice()),
            XValues::Numbers(_) => None,
        })
    }
}

/// New y values for one trace of an already drawn surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationPatch {
    pub trace: usize,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    CubicInOut,
}

impl Easing {
    /// Map linear progress `t` in `0..=1` onto eased progress.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransitionSpec {
    pub duration_ms: f64,
    pub easing: Easing,
}

impl TransitionSpec {
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_ms.max(0.0) / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_mode_serializes_like_plot_modes() {
        assert_eq!(TraceMode::LINES_MARKERS.to_string(), "lines+markers");
        assert_eq!(TraceMode::LINES_MARKERS_TEXT.to_string(), "lines+markers+text");
        assert_eq!(
            serde_json::to_string(&TraceMode::LINES).unwrap(),
            "\"lines\""
        );
    }

    #[test]
    fn cubic_in_out_is_symmetric() {
        let e = Easing::CubicInOut;
        assert_eq!(e.apply(0.0), 0.0);
        assert_eq!(e.apply(1.0), 1.0);
        assert!((e.apply(0.5) - 0.5).abs() < 1e-12);
        assert!((e.apply(0.25) + e.apply(0.75) - 1.0).abs() < 1e-12);
        assert!(e.apply(0.1) < 0.1);
    }

    #[test]
    fn categorical_points_use_indices() {
        let s = DataSeries::bar(
            "a",
            XValues::categories(&["x", "y"]),
            vec![3.0, 4.0],
            Color::rgb(0, 0, 0),
        );
        assert_eq!(s.points(), vec![[0.0, 3.0], [1.0, 4.0]]);
    }
}
