//! Chart Gallery - Interactive dashboard of five configurable charts

use anyhow::anyhow;
use chart_gallery::config::AppConfig;
use chart_gallery::gui::GalleryApp;
use chart_gallery::logging;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    logging::init(&config.log_filter);
    tracing::info!(?config, "starting chart gallery");

    let window = &config.window;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([window.width, window.height])
            .with_min_inner_size([window.min_width, window.min_height])
            .with_title("Chart Gallery"),
        ..Default::default()
    };

    eframe::run_native(
        "Chart Gallery",
        options,
        Box::new(move |cc| Ok(Box::new(GalleryApp::new(cc, config)))),
    )
    .map_err(|e| anyhow!("eframe error: {e}"))
}
