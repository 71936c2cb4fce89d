//! Chart Viewer Widget
//! Scrollable card grid showing the five chart surfaces.
//! Supports responsive multi-column layout based on available width.

use crate::charts::PlotSurface;
use crate::state::PanelKey;
use egui::{Color32, RichText, ScrollArea};

const CHART_SPACING: f32 = 15.0;
const CARD_HEIGHT: f32 = 420.0;
const MIN_CARD_WIDTH: f32 = 520.0;
const MAX_COLUMNS: usize = 3;

/// Scrollable chart display area.
///
/// Cards share the available width evenly; the column count follows the
/// window width.
#[derive(Default)]
pub struct ChartViewer {
    /// Card last clicked by the user.
    pub active: Option<PanelKey>,
}

/// Number of card columns that fit in `available_width`.
pub fn column_count(available_width: f32) -> usize {
    let fit = ((available_width + CHART_SPACING) / (MIN_CARD_WIDTH + CHART_SPACING)).floor();
    (fit as usize).clamp(1, MAX_COLUMNS)
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw every card. Returns the panel whose card was clicked this frame.
    pub fn show(&mut self, ui: &mut egui::Ui, surface: &mut PlotSurface) -> Option<PanelKey> {
        let avail_width = ui.available_width();
        let num_columns = column_count(avail_width);
        let card_width =
            (avail_width - CHART_SPACING * num_columns as f32) / num_columns as f32;

        let mut clicked = None;
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for row in PanelKey::ALL.chunks(num_columns) {
                    ui.horizontal(|ui| {
                        for &panel in row {
                            let active = self.active == Some(panel);
                            if Self::draw_card(ui, surface, panel, card_width, active) {
                                clicked = Some(panel);
                            }
                            ui.add_space(CHART_SPACING);
                        }
                    });
                    ui.add_space(CHART_SPACING);
                }
            });

        if let Some(panel) = clicked {
            self.active = Some(panel);
        }
        clicked
    }

    /// Draw one card; true when it was clicked.
    fn draw_card(
        ui: &mut egui::Ui,
        surface: &mut PlotSurface,
        panel: PanelKey,
        card_width: f32,
        active: bool,
    ) -> bool {
        let border_color = if active {
            Color32::from_rgb(100, 149, 237)
        } else {
            ui.visuals().widgets.noninteractive.bg_stroke.color
        };
        let title = surface
            .request(panel.surface_id())
            .map(|r| r.layout.title.clone())
            .unwrap_or_else(|| panel.display_name().to_string());

        let card = egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(if active { 2.5 } else { 1.0 }, border_color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(card_width - 24.0);
                ui.vertical(|ui| {
                    ui.label(RichText::new(title).size(16.0).strong());
                    ui.add_space(6.0);
                    surface.show(ui, panel.surface_id(), CARD_HEIGHT);
                });
            });

        card.response.interact(egui::Sense::click()).clicked()
    }
}
