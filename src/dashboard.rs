//! Dashboard Controller
//! Owns the chart state and turns each UI command into one mutation plus one redraw.

use crate::charts::{PanelRenderer, RenderError, RenderRequest, RenderSurface};
use crate::state::{
    BookRegion, ChartStateStore, Color, FontStyle, LineStyle, MarkerShape, PanelKey, StateError,
};
use thiserror::Error;
use tracing::{info, warn};

/// Factor applied by the "increase 10%" buttons.
pub const BOOK_INCREASE_FACTOR: f64 = 1.1;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// One user action against one panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelCommand {
    ScaleBook { region: BookRegion, factor: f64 },
    ResetPanel(PanelKey),
    SetBookSeries { region: BookRegion, text: String },
    SetBookData { region1: String, region2: String },
    SetBookColor { region: BookRegion, color: Color },
    SetLineStyle(LineStyle),
    ToggleAnimation,
    SetAnimationSpeed(u32),
    SetMarker(MarkerShape),
    SetSalesColor(Color),
    SetFontSize(u32),
    SetFontStyle(FontStyle),
    SetIterations(u32),
    SetSnowflakeColor(Color),
    /// Textual setter, e.g. from a config script: `("sales", "marker", "square")`.
    SetField {
        panel: PanelKey,
        field: String,
        value: String,
    },
}

impl PanelCommand {
    /// The panel whose state this command changes.
    pub fn panel(&self) -> PanelKey {
        match self {
            PanelCommand::ScaleBook { .. }
            | PanelCommand::SetBookSeries { .. }
            | PanelCommand::SetBookData { .. }
            | PanelCommand::SetBookColor { .. } => PanelKey::Book,
            PanelCommand::SetLineStyle(_)
            | PanelCommand::ToggleAnimation
            | PanelCommand::SetAnimationSpeed(_) => PanelKey::Exchange,
            PanelCommand::SetMarker(_) | PanelCommand::SetSalesColor(_) => PanelKey::Sales,
            PanelCommand::SetFontSize(_) | PanelCommand::SetFontStyle(_) => PanelKey::Temperature,
            PanelCommand::SetIterations(_) | PanelCommand::SetSnowflakeColor(_) => {
                PanelKey::Snowflake
            }
            PanelCommand::ResetPanel(panel) | PanelCommand::SetField { panel, .. } => *panel,
        }
    }
}

/// The single owner of the chart state.
#[derive(Debug, Default)]
pub struct Dashboard {
    store: ChartStateStore,
    renderer: PanelRenderer,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &ChartStateStore {
        &self.store
    }

    /// Apply `command` and redraw its panel once.
    ///
    /// On a state error nothing is changed and nothing is drawn.
    pub fn apply<S: RenderSurface + ?Sized>(
        &mut self,
        command: PanelCommand,
        surface: &mut S,
    ) -> Result<(), DashboardError> {
        let panel = command.panel();
        if let Err(err) = self.mutate(command) {
            warn!(%panel, error = %err, "rejected panel command");
            return Err(err.into());
        }
        self.render(panel, surface)?;
        Ok(())
    }

    fn mutate(&mut self, command: PanelCommand) -> Result<(), StateError> {
        let store = &mut self.store;
        match command {
            PanelCommand::ScaleBook { region, factor } => store.scale_book(region, factor)?,
            PanelCommand::ResetPanel(panel) => store.reset_to_default(panel),
            PanelCommand::SetBookSeries { region, text } => {
                store.parse_and_set(PanelKey::Book, region.as_str(), &text)?
            }
            PanelCommand::SetBookData { region1, region2 } => {
                store.parse_and_set_book(&region1, &region2)?
            }
            PanelCommand::SetBookColor { region, color } => store.set_book_color(region, color),
            PanelCommand::SetLineStyle(style) => store.set_line_style(style),
            PanelCommand::ToggleAnimation => {
                store.toggle_animation();
            }
            PanelCommand::SetAnimationSpeed(speed) => store.set_animation_speed(speed)?,
            PanelCommand::SetMarker(marker) => store.set_marker(marker),
            PanelCommand::SetSalesColor(color) => store.set_sales_color(color),
            PanelCommand::SetFontSize(size) => store.set_font_size(size)?,
            PanelCommand::SetFontStyle(style) => store.set_font_style(style),
            PanelCommand::SetIterations(iterations) => store.set_iterations(iterations)?,
            PanelCommand::SetSnowflakeColor(color) => store.set_snowflake_color(color),
            PanelCommand::SetField {
                panel,
                field,
                value,
            } => store.set_field(panel, &field, &value)?,
        }
        Ok(())
    }

    pub fn render<S: RenderSurface + ?Sized>(
        &mut self,
        panel: PanelKey,
        surface: &mut S,
    ) -> Result<(), RenderError> {
        self.renderer.render(panel, &self.store, surface)
    }

    pub fn request(&mut self, panel: PanelKey) -> RenderRequest {
        self.renderer.request(panel, &self.store)
    }

    /// Requests for every panel, in [`PanelKey::ALL`] order.
    pub fn requests(&mut self) -> Vec<RenderRequest> {
        PanelKey::ALL.iter().map(|&p| self.request(p)).collect()
    }

    /// Draw every panel. A failing panel does not stop the others.
    pub fn render_all<S: RenderSurface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> Vec<(PanelKey, RenderError)> {
        let failures: Vec<_> = PanelKey::ALL
            .into_iter()
            .filter_map(|panel| self.render(panel, surface).err().map(|e| (panel, e)))
            .collect();
        info!(failed = failures.len(), "rendered all panels");
        failures
    }

    /// Resize every panel's surface. A failing panel does not stop the others.
    pub fn resize_all<S: RenderSurface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> Vec<(PanelKey, RenderError)> {
        let failures: Vec<_> = PanelKey::ALL
            .into_iter()
            .filter_map(|panel| {
                surface
                    .resize(panel.surface_id())
                    .err()
                    .map(|e| (panel, e))
            })
            .collect();
        for (panel, err) in &failures {
            warn!(%panel, error = %err, "resize failed");
        }
        info!("resized all panels");
        failures
    }
}
