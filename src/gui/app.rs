//! Chart Gallery Main Application
//! Main window with control panel and chart viewer.

use crate::charts::{PlotSurface, RenderError, RenderRequest};
use crate::config::AppConfig;
use crate::dashboard::{Dashboard, PanelCommand};
use crate::export;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::resize::ResizeDebouncer;
use crate::state::PanelKey;
use egui::SidePanel;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use std::time::Instant;
use tracing::{info, warn};

/// PNG export result from background thread
enum ExportResult {
    Complete { dir: PathBuf, count: usize },
    Error(String),
}

/// Main application window.
pub struct GalleryApp {
    dashboard: Dashboard,
    surface: PlotSurface,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    debouncer: ResizeDebouncer,
    last_size: Option<egui::Vec2>,
    export_size: (u32, u32),

    // Async export
    export_rx: Option<Receiver<ExportResult>>,
    is_exporting: bool,
}

impl GalleryApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let mut app = Self {
            dashboard: Dashboard::new(),
            surface: PlotSurface::new(),
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            debouncer: ResizeDebouncer::new(config.resize_debounce()),
            last_size: None,
            export_size: config.export.size(),
            export_rx: None,
            is_exporting: false,
        };

        let failures = app.dashboard.render_all(&mut app.surface);
        app.report_failures("Render", &failures);
        app
    }

    fn report_failures(&mut self, what: &str, failures: &[(PanelKey, RenderError)]) {
        if let Some((panel, err)) = failures.first() {
            self.control_panel.set_progress(
                0.0,
                &format!("{what} error ({} of 5 panels): {panel}: {err}", failures.len()),
            );
        }
    }

    fn handle_command(&mut self, command: PanelCommand) {
        let panel = command.panel();
        match self.dashboard.apply(command, &mut self.surface) {
            Ok(()) => {
                self.chart_viewer.active = Some(panel);
                self.control_panel
                    .set_progress(0.0, &format!("Updated {}", panel.display_name()));
            }
            Err(e) => {
                self.control_panel.set_progress(0.0, &format!("Error: {e}"));
            }
        }
    }

    /// Coalesce window size changes into one resize sweep.
    fn track_window_size(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        let size = ctx.screen_rect().size();
        if self.last_size.is_some_and(|last| last != size) {
            self.debouncer.schedule_at(now);
        }
        self.last_size = Some(size);

        if self.debouncer.poll_at(now) {
            let failures = self.dashboard.resize_all(&mut self.surface);
            self.report_failures("Resize", &failures);
        }
        if let Some(wait) = self.debouncer.time_until_fire(now) {
            ctx.request_repaint_after(wait);
        }
    }

    /// Handle PNG export - render charts on a background thread
    fn handle_export_png(&mut self) {
        if self.is_exporting {
            return;
        }
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return; // User cancelled
        };

        let requests: Vec<RenderRequest> = self.dashboard.requests();
        let size = self.export_size;
        let (tx, rx) = channel();
        self.export_rx = Some(rx);
        self.is_exporting = true;
        self.control_panel.set_progress(10.0, "Rendering charts...");

        thread::spawn(move || {
            let result = match export::export_requests_png(&requests, &dir, size) {
                Ok(paths) => ExportResult::Complete {
                    dir,
                    count: paths.len(),
                },
                Err(e) => ExportResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    fn handle_export_json(&mut self) {
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };
        match export::export_json_all(&mut self.dashboard, &dir) {
            Ok(paths) => self.finish_export(&dir, paths.len()),
            Err(e) => self.control_panel.set_progress(0.0, &format!("Error: {e}")),
        }
    }

    fn finish_export(&mut self, dir: &Path, count: usize) {
        info!(count, dir = %dir.display(), "export finished");
        self.control_panel
            .set_progress(100.0, &format!("Exported {count} files to {}", dir.display()));
        if let Err(e) = open::that(dir) {
            warn!(error = %e, "could not open export folder");
        }
    }

    /// Check for export results
    fn check_export_results(&mut self) {
        let Some(rx) = self.export_rx.take() else {
            return;
        };
        match rx.try_recv() {
            Ok(ExportResult::Complete { dir, count }) => {
                self.is_exporting = false;
                self.finish_export(&dir, count);
            }
            Ok(ExportResult::Error(error)) => {
                self.is_exporting = false;
                self.control_panel
                    .set_progress(0.0, &format!("Error: {error}"));
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => self.export_rx = Some(rx),
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.is_exporting = false;
                self.control_panel
                    .set_progress(0.0, "Error: export thread stopped");
            }
        }
    }
}

impl eframe::App for GalleryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_export_results();
        self.track_window_size(ctx);

        if self.is_exporting || self.surface.is_animating() {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action =
                        self.control_panel
                            .show(ui, self.dashboard.store(), self.chart_viewer.active);

                    match action {
                        ControlPanelAction::Command(command) => self.handle_command(command),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::ExportJson => self.handle_export_json(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, &mut self.surface);
        });
    }
}
