//! Render surfaces: the drawing backends panels hand their requests to.

use super::{AnimationPatch, RenderRequest, TransitionSpec};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Surface '{0}' has not been drawn yet")]
    UnknownSurface(String),
    #[error("Surface '{surface_id}' has no trace {trace}")]
    TraceOutOfRange { surface_id: String, trace: usize },
    #[error("Patch for trace {trace} of '{surface_id}' has {found} values, expected {expected}")]
    PatchLength {
        surface_id: String,
        trace: usize,
        expected: usize,
        found: usize,
    },
    #[error("Failed to draw '{surface_id}': {message}")]
    Draw { surface_id: String, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RenderError {
    pub fn draw(surface_id: &str, err: impl std::fmt::Display) -> Self {
        RenderError::Draw {
            surface_id: surface_id.to_string(),
            message: err.to_string(),
        }
    }
}

/// A charting backend keyed by surface id.
pub trait RenderSurface {
    /// Replace everything drawn on `request.surface_id`.
    fn render(&mut self, request: &RenderRequest) -> Result<(), RenderError>;

    /// Re-fit a drawn surface to its current container size.
    fn resize(&mut self, surface_id: &str) -> Result<(), RenderError>;

    /// Transition one trace of a drawn surface to new y values.
    fn animate(
        &mut self,
        surface_id: &str,
        patch: &AnimationPatch,
        transition: &TransitionSpec,
    ) -> Result<(), RenderError>;
}

/// One call received by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Render(RenderRequest),
    Resize(String),
    Animate {
        surface_id: String,
        patch: AnimationPatch,
        transition: TransitionSpec,
    },
}

impl SurfaceCall {
    pub fn surface_id(&self) -> &str {
        match self {
            SurfaceCall::Render(request) => &request.surface_id,
            SurfaceCall::Resize(id) => id,
            SurfaceCall::Animate { surface_id, .. } => surface_id,
        }
    }
}

/// Surface that only records what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<SurfaceCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn renders(&self) -> impl Iterator<Item = &RenderRequest> {
        self.calls.iter().filter_map(|c| match c {
            SurfaceCall::Render(request) => Some(request),
            _ => None,
        })
    }

    /// Most recent request drawn on `surface_id`.
    pub fn last_request(&self, surface_id: &str) -> Option<&RenderRequest> {
        self.renders().filter(|r| r.surface_id == surface_id).last()
    }
}

impl RenderSurface for RecordingSurface {
    fn render(&mut self, request: &RenderRequest) -> Result<(), RenderError> {
        self.calls.push(SurfaceCall::Render(request.clone()));
        Ok(())
    }

    fn resize(&mut self, surface_id: &str) -> Result<(), RenderError> {
        self.calls.push(SurfaceCall::Resize(surface_id.to_string()));
        Ok(())
    }

    fn animate(
        &mut self,
        surface_id: &str,
        patch: &AnimationPatch,
        transition: &TransitionSpec,
    ) -> Result<(), RenderError> {
        self.calls.push(SurfaceCall::Animate {
            surface_id: surface_id.to_string(),
            patch: patch.clone(),
            transition: *transition,
        });
        Ok(())
    }
}
