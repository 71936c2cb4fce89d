//! Chart Gallery - Interactive dashboard of five configurable charts
//!
//! Book purchases, exchange rates, quarterly sales, a temperature forecast
//! and a Koch snowflake, each driven by its own state record.

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod export;
pub mod fractal;
pub mod gui;
pub mod logging;
pub mod resize;
pub mod state;

pub use dashboard::{Dashboard, DashboardError, PanelCommand};
