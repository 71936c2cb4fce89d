//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;

pub use app::GalleryApp;
pub use chart_viewer::{column_count, ChartViewer};
pub use control_panel::{
    ControlPanel, ControlPanelAction, BOOK_SWATCHES, SALES_SWATCHES, SNOWFLAKE_SWATCHES,
};
