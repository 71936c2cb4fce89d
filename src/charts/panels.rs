//! Panel Renderer
//! Turns a panel's stored configuration into a render request.

use super::{
    AnimationPatch, AxisSpec, BarMode, DashStyle, DataSeries, Easing, FillSpec, LayoutSpec,
    LineSpec, MarkerSpec, RenderError, RenderOptions, RenderRequest, RenderSurface, TextPosition,
    TextSpec, TraceMode, TransitionSpec, XValues,
};
use crate::fractal::KochCache;
use crate::state::{BookRegion, ChartStateStore, Color, LineStyle, PanelKey};
use tracing::debug;

pub const BOOK_CATEGORIES: [&str; 5] = ["Family", "Fiction", "Psychology", "Science", "Children"];

/// Days of July with a recorded EUR/CNY rate.
pub const EXCHANGE_DATES: [f64; 19] = [
    3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 17.0, 18.0, 19.0, 24.0, 25.0,
    26.0, 31.0,
];
pub const EXCHANGE_2017: [f64; 19] = [
    6.8007, 6.8007, 6.8015, 6.8015, 6.8060, 6.8060, 6.8060, 6.8036, 6.8025, 6.7877, 6.7835, 6.7758,
    6.7700, 6.7463, 6.7519, 6.7511, 6.7511, 6.7539, 6.7265,
];
pub const EXCHANGE_2019: [f64; 19] = [
    6.8640, 6.8705, 6.8697, 6.8697, 6.8697, 6.8881, 6.8853, 6.8856, 6.8677, 6.8662, 6.8662, 6.8662,
    6.8827, 6.8761, 6.8635, 6.8860, 6.8737, 6.8796, 6.8841,
];
const EXCHANGE_COLORS: [Color; 2] = [Color::rgb(0x00, 0x63, 0x74), Color::rgb(0x8a, 0x2e, 0x76)];

pub const SALES_QUARTERS: [&str; 4] = ["Q1", "Q2", "Q3", "Q4"];
const SALES: [(&str, [f64; 4]); 3] = [
    ("Product A", [2144.0, 4617.0, 7674.0, 6666.0]),
    ("Product B", [853.0, 1214.0, 2414.0, 4409.0]),
    ("Product C", [153.0, 155.0, 292.0, 680.0]),
];
/// Colors of products B and C; product A uses the stored color.
pub const SALES_FIXED_COLORS: [Color; 2] = [Color::rgb(0xff, 0x7f, 0x0e), Color::rgb(0x2c, 0xa0, 0x2c)];
const SALES_MARKER_SIZE: f32 = 10.0;

pub const TEMPERATURE_HIGH: [f64; 15] = [
    32.0, 33.0, 34.0, 34.0, 33.0, 31.0, 30.0, 29.0, 30.0, 29.0, 26.0, 23.0, 21.0, 25.0, 31.0,
];
pub const TEMPERATURE_LOW: [f64; 15] = [
    19.0, 19.0, 20.0, 22.0, 22.0, 21.0, 22.0, 16.0, 18.0, 18.0, 17.0, 14.0, 15.0, 16.0, 16.0,
];
const TEMPERATURE_FIRST_DAY: u32 = 4;
const TEMPERATURE_FONT: &str = "sans-serif";

const SNOWFLAKE_LINE_WIDTH: f32 = 3.0;
pub const SNOWFLAKE_FILL_ALPHA: f32 = 0.3;

pub fn dash_for(style: LineStyle) -> DashStyle {
    match style {
        LineStyle::Solid => DashStyle::Solid,
        LineStyle::Dashed => DashStyle::Dash,
        LineStyle::Dotted => DashStyle::Dot,
    }
}

/// Transition length for an animation speed; faster speeds give shorter transitions.
pub fn transition_for_speed(speed: u32) -> TransitionSpec {
    TransitionSpec {
        duration_ms: 1000.0 / f64::from(speed.max(1)),
        easing: Easing::CubicInOut,
    }
}

/// Builds and issues render requests for every panel.
///
/// Holds the snowflake polygon cache; never mutates the state store.
#[derive(Debug, Default)]
pub struct PanelRenderer {
    koch: KochCache,
}

impl PanelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw `panel` on `surface`, followed by the exchange animation when enabled.
    pub fn render<S: RenderSurface + ?Sized>(
        &mut self,
        panel: PanelKey,
        store: &ChartStateStore,
        surface: &mut S,
    ) -> Result<(), RenderError> {
        let request = self.request(panel, store);
        debug!(surface = %request.surface_id, series = request.series.len(), "render panel");
        surface.render(&request)?;

        let exchange = store.exchange();
        if panel == PanelKey::Exchange && exchange.animation {
            let patch = AnimationPatch {
                trace: 0,
                y: EXCHANGE_2017.to_vec(),
            };
            let transition = transition_for_speed(exchange.animation_speed);
            debug!(duration_ms = transition.duration_ms, "animate exchange panel");
            surface.animate(panel.surface_id(), &patch, &transition)?;
        }
        Ok(())
    }

    pub fn request(&mut self, panel: PanelKey, store: &ChartStateStore) -> RenderRequest {
        let (series, layout) = match panel {
            PanelKey::Book => Self::book(store),
            PanelKey::Exchange => Self::exchange(store),
            PanelKey::Sales => Self::sales(store),
            PanelKey::Temperature => Self::temperature(store),
            PanelKey::Snowflake => self.snowflake(store),
        };
        RenderRequest {
            surface_id: panel.surface_id().to_string(),
            series,
            layout,
            options: RenderOptions::default(),
        }
    }

    fn book(store: &ChartStateStore) -> (Vec<DataSeries>, LayoutSpec) {
        let book = store.book();
        let series = BookRegion::ALL
            .iter()
            .map(|&region| {
                DataSeries::bar(
                    region.label(),
                    XValues::categories(&BOOK_CATEGORIES),
                    book.region(region).to_vec(),
                    book.colors[region.index()],
                )
            })
            .collect();

        let mut layout = LayoutSpec::new(
            "Book Purchases by Category",
            AxisSpec::titled("Category"),
            AxisSpec::titled("Copies purchased"),
        );
        layout.bar_mode = Some(BarMode::Group);
        (series, layout)
    }

    fn exchange(store: &ChartStateStore) -> (Vec<DataSeries>, LayoutSpec) {
        let dash = dash_for(store.exchange().style);
        let series = [("July 2017", &EXCHANGE_2017), ("July 2019", &EXCHANGE_2019)]
            .into_iter()
            .zip(EXCHANGE_COLORS)
            .map(|((name, rates), color)| {
                DataSeries::scatter(
                    XValues::Numbers(EXCHANGE_DATES.to_vec()),
                    rates.to_vec(),
                    TraceMode::LINES_MARKERS,
                )
                .named(name)
                .with_line(LineSpec {
                    color,
                    dash,
                    width: 2.0,
                })
            })
            .collect();

        let layout = LayoutSpec::new(
            "USD/CNY Exchange Rate",
            AxisSpec::titled("Date"),
            AxisSpec::titled("Rate"),
        );
        (series, layout)
    }

    fn sales(store: &ChartStateStore) -> (Vec<DataSeries>, LayoutSpec) {
        let sales = store.sales();
        let colors = [sales.color, SALES_FIXED_COLORS[0], SALES_FIXED_COLORS[1]];
        let series = SALES
            .iter()
            .zip(colors)
            .map(|((name, values), color)| {
                DataSeries::scatter(
                    XValues::categories(&SALES_QUARTERS),
                    values.to_vec(),
                    TraceMode::LINES_MARKERS,
                )
                .named(name)
                .with_marker(MarkerSpec {
                    symbol: sales.marker,
                    size: SALES_MARKER_SIZE,
                    color,
                })
            })
            .collect();

        let layout = LayoutSpec::new(
            "Quarterly Product Sales",
            AxisSpec::titled("Quarter"),
            AxisSpec::titled("Sales (10k CNY)"),
        );
        (series, layout)
    }

    fn temperature(store: &ChartStateStore) -> (Vec<DataSeries>, LayoutSpec) {
        // font_style is tracked by the store only.
        let font_size = store.temperature().font_size;
        let days: Vec<f64> = (0..TEMPERATURE_HIGH.len() as u32)
            .map(|i| f64::from(TEMPERATURE_FIRST_DAY + i))
            .collect();

        let series = [
            ("High", &TEMPERATURE_HIGH, TextPosition::TopCenter),
            ("Low", &TEMPERATURE_LOW, TextPosition::BottomCenter),
        ]
        .into_iter()
        .map(|(name, temps, position)| {
            DataSeries::scatter(
                XValues::Numbers(days.clone()),
                temps.to_vec(),
                TraceMode::LINES_MARKERS_TEXT,
            )
            .named(name)
            .with_text(TextSpec {
                labels: temps.iter().map(|t| format!("{t}°C")).collect(),
                position,
                font_size,
                family: TEMPERATURE_FONT.to_string(),
            })
        })
        .collect();

        let layout = LayoutSpec::new(
            "15-Day Temperature Forecast",
            AxisSpec::titled("Date"),
            AxisSpec::titled("Temperature (°C)").with_range(0.0, 40.0),
        );
        (series, layout)
    }

    fn snowflake(&mut self, store: &ChartStateStore) -> (Vec<DataSeries>, LayoutSpec) {
        let config = store.snowflake();
        let polygon = self.koch.get(config.iterations);

        let series = DataSeries::scatter(
            XValues::Numbers(polygon.xs()),
            polygon.ys(),
            TraceMode::LINES,
        )
        .with_line(LineSpec {
            color: config.color,
            dash: DashStyle::Solid,
            width: SNOWFLAKE_LINE_WIDTH,
        })
        .with_fill(FillSpec {
            color: config.color.with_alpha(SNOWFLAKE_FILL_ALPHA),
        });

        let mut layout = LayoutSpec::new(
            format!("Koch Snowflake (iterations: {})", config.iterations),
            AxisSpec::hidden(),
            AxisSpec::hidden(),
        );
        layout.lock_aspect = true;
        (vec![series], layout)
    }
}
