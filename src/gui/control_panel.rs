//! Control Panel Widget
//! Left side panel with the controls of every chart.

use crate::charts::to_color32;
use crate::dashboard::{PanelCommand, BOOK_INCREASE_FACTOR};
use crate::state::{
    BookRegion, ChartStateStore, Color, FontStyle, LineStyle, MarkerShape, PanelKey,
    ANIMATION_SPEED_RANGE, FONT_SIZE_RANGE, ITERATION_RANGE,
};
use egui::{Color32, RichText, Slider, TextEdit};

/// Swatches offered for the sales line.
pub const SALES_SWATCHES: [Color; 5] = [
    Color::rgb(0x1f, 0x77, 0xb4),
    Color::rgb(0xd6, 0x27, 0x28),
    Color::rgb(0x94, 0x67, 0xbd),
    Color::rgb(0x8c, 0x56, 0x4b),
    Color::rgb(0x17, 0xbe, 0xcf),
];

/// Swatches offered for the snowflake outline.
pub const SNOWFLAKE_SWATCHES: [Color; 5] = [
    Color::rgb(0xff, 0x6b, 0x6b),
    Color::rgb(0x4e, 0xcd, 0xc4),
    Color::rgb(0x45, 0xb7, 0xd1),
    Color::rgb(0x96, 0xce, 0xb4),
    Color::rgb(0xff, 0xd9, 0x3d),
];

/// Swatches offered for each book region.
pub const BOOK_SWATCHES: [Color; 4] = [
    Color::rgb(0xff, 0xcc, 0x00),
    Color::rgb(0xb0, 0xc4, 0xde),
    Color::rgb(0x66, 0xbb, 0x6a),
    Color::rgb(0xef, 0x53, 0x50),
];

const SWATCH_SIZE: f32 = 22.0;

/// Left side control panel.
pub struct ControlPanel {
    pub region1_text: String,
    pub region2_text: String,
    pub progress: f32,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            region1_text: String::new(),
            region2_text: String::new(),
            progress: 0.0,
            status: "Ready".to_string(),
        }
    }
}

fn section(ui: &mut egui::Ui, panel: PanelKey, active: Option<PanelKey>, add: impl FnOnce(&mut egui::Ui)) {
    let title = RichText::new(panel.display_name()).size(14.0).strong();
    let title = if active == Some(panel) {
        title.color(Color32::from_rgb(100, 149, 237))
    } else {
        title
    };
    egui::CollapsingHeader::new(title)
        .id_salt(panel.as_str())
        .default_open(true)
        .show(ui, add);
    ui.add_space(6.0);
}

/// A clickable color square, outlined when it is the current color.
fn swatch(ui: &mut egui::Ui, color: Color, selected: bool) -> egui::Response {
    let (rect, response) =
        ui.allocate_exact_size(egui::vec2(SWATCH_SIZE, SWATCH_SIZE), egui::Sense::click());
    let painter = ui.painter();
    painter.rect_filled(rect, 4.0, to_color32(color));
    if selected {
        painter.rect_stroke(rect.expand(2.0), 5.0, egui::Stroke::new(2.0, Color32::WHITE));
    } else if response.hovered() {
        painter.rect_stroke(rect.expand(1.0), 5.0, egui::Stroke::new(1.0, Color32::GRAY));
    }
    response.on_hover_text(color.to_hex())
}

fn swatch_row(ui: &mut egui::Ui, swatches: &[Color], current: Color) -> Option<Color> {
    let mut picked = None;
    ui.horizontal(|ui| {
        for &color in swatches {
            if swatch(ui, color, color == current).clicked() {
                picked = Some(color);
            }
        }
    });
    picked
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the control panel
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        store: &ChartStateStore,
        active: Option<PanelKey>,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;
        let mut emit = |command: PanelCommand| action = ControlPanelAction::Command(command);

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Chart Gallery")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Book purchases =====
        section(ui, PanelKey::Book, active, |ui| {
            let book = store.book();
            for region in BookRegion::ALL.iter().copied() {
                ui.horizontal(|ui| {
                    if ui.button(format!("+10% {}", region.label())).clicked() {
                        emit(PanelCommand::ScaleBook {
                            region,
                            factor: BOOK_INCREASE_FACTOR,
                        });
                    }
                    if let Some(color) = swatch_row(ui, &BOOK_SWATCHES, book.colors[region.index()]) {
                        emit(PanelCommand::SetBookColor { region, color });
                    }
                });
            }

            ui.add_space(4.0);
            ui.label("Custom data (5 comma separated values):");
            ui.add(
                TextEdit::singleline(&mut self.region1_text)
                    .hint_text(join_series(&book.region1)),
            );
            ui.add(
                TextEdit::singleline(&mut self.region2_text)
                    .hint_text(join_series(&book.region2)),
            );
            ui.horizontal(|ui| {
                if ui.button("Apply").clicked() {
                    emit(PanelCommand::SetBookData {
                        region1: self.region1_text.clone(),
                        region2: self.region2_text.clone(),
                    });
                }
                if ui.button("Reset").clicked() {
                    self.region1_text.clear();
                    self.region2_text.clear();
                    emit(PanelCommand::ResetPanel(PanelKey::Book));
                }
            });
        });

        // ===== Exchange rate =====
        section(ui, PanelKey::Exchange, active, |ui| {
            let exchange = store.exchange();
            ui.horizontal(|ui| {
                for &style in LineStyle::ALL {
                    if ui
                        .selectable_label(exchange.style == style, style.as_str())
                        .clicked()
                    {
                        emit(PanelCommand::SetLineStyle(style));
                    }
                }
            });
            let toggle = if exchange.animation {
                "⏸ Animation: On"
            } else {
                "▶ Animation: Off"
            };
            if ui.button(toggle).clicked() {
                emit(PanelCommand::ToggleAnimation);
            }
            let mut speed = exchange.animation_speed;
            if ui
                .add(Slider::new(&mut speed, ANIMATION_SPEED_RANGE).text("Speed"))
                .changed()
            {
                emit(PanelCommand::SetAnimationSpeed(speed));
            }
        });

        // ===== Sales =====
        section(ui, PanelKey::Sales, active, |ui| {
            let sales = store.sales();
            ui.horizontal_wrapped(|ui| {
                for &marker in MarkerShape::ALL {
                    if ui
                        .selectable_label(sales.marker == marker, marker.as_str())
                        .clicked()
                    {
                        emit(PanelCommand::SetMarker(marker));
                    }
                }
            });
            if let Some(color) = swatch_row(ui, &SALES_SWATCHES, sales.color) {
                emit(PanelCommand::SetSalesColor(color));
            }
        });

        // ===== Temperature =====
        section(ui, PanelKey::Temperature, active, |ui| {
            let temperature = store.temperature();
            let mut size = temperature.font_size;
            if ui
                .add(Slider::new(&mut size, FONT_SIZE_RANGE).text("Label size"))
                .changed()
            {
                emit(PanelCommand::SetFontSize(size));
            }
            ui.horizontal(|ui| {
                for &style in FontStyle::ALL {
                    if ui
                        .selectable_label(temperature.font_style == style, style.as_str())
                        .clicked()
                    {
                        emit(PanelCommand::SetFontStyle(style));
                    }
                }
            });
        });

        // ===== Snowflake =====
        section(ui, PanelKey::Snowflake, active, |ui| {
            let snowflake = store.snowflake();
            let mut iterations = snowflake.iterations;
            if ui
                .add(Slider::new(&mut iterations, ITERATION_RANGE).text("Iterations"))
                .changed()
            {
                emit(PanelCommand::SetIterations(iterations));
            }
            if let Some(color) = swatch_row(ui, &SNOWFLAKE_SWATCHES, snowflake.color) {
                emit(PanelCommand::SetSnowflakeColor(color));
            }
        });

        ui.separator();
        ui.add_space(10.0);

        // ===== Export =====
        ui.vertical_centered(|ui| {
            let png_button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                .min_size(egui::vec2(150.0, 30.0));
            if ui.add(png_button).clicked() {
                action = ControlPanelAction::ExportPng;
            }
            ui.add_space(6.0);
            let json_button = egui::Button::new(RichText::new("📄 Export JSON").size(14.0))
                .min_size(egui::vec2(150.0, 30.0));
            if ui.add(json_button).clicked() {
                action = ControlPanelAction::ExportJson;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status =====
        if self.progress > 0.0 && self.progress < 100.0 {
            ui.add(
                egui::ProgressBar::new(self.progress / 100.0)
                    .show_percentage()
                    .animate(true),
            );
            ui.add_space(5.0);
        }

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

fn join_series(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{v:.0}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Command(PanelCommand),
    ExportPng,
    ExportJson,
}
