//! Charts module - Render requests, panel renderers and drawing surfaces

mod panels;
mod plotter;
mod renderer;
mod request;
mod surface;

pub use panels::{
    dash_for, transition_for_speed, PanelRenderer, BOOK_CATEGORIES, EXCHANGE_2017, EXCHANGE_2019,
    EXCHANGE_DATES, SALES_FIXED_COLORS, SALES_QUARTERS, SNOWFLAKE_FILL_ALPHA, TEMPERATURE_HIGH,
    TEMPERATURE_LOW,
};
pub use plotter::{to_color32, PlotSurface};
pub use renderer::StaticChartRenderer;
pub use request::{
    default_trace_color, AnimationPatch, AxisSpec, BarMode, DashStyle, DataSeries, Easing,
    FillSpec, LayoutSpec, LineSpec, MarkerSpec, RenderOptions, RenderRequest, TextPosition,
    TextSpec, TraceKind, TraceMode, TransitionSpec, XValues, DEFAULT_TRACE_COLORS,
};
pub use surface::{RecordingSurface, RenderError, RenderSurface, SurfaceCall};
