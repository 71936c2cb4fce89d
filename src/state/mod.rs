//! State module - per-panel chart configuration

mod color;
mod error;
mod panels;
mod store;

pub use color::Color;
pub use error::{ParseError, StateError, ValidationError};
pub use panels::{
    BookConfig, BookRegion, ExchangeConfig, FontStyle, LineStyle, MarkerShape, PanelConfig,
    PanelKey, SalesConfig, SnowflakeConfig, TemperatureConfig, ANIMATION_SPEED_RANGE,
    BOOK_CATEGORY_COUNT, DEFAULT_BOOK_COLORS, DEFAULT_REGION1, DEFAULT_REGION2, FONT_SIZE_RANGE,
    ITERATION_RANGE,
};
pub use store::ChartStateStore;
