//! Toolbar widgets a tool declares during its setup phase.
//!
//! Widgets are created only through [`SetupBuilder`], which the host hands to
//! a tool while it runs [`crate::tools::Tool::build_setup_widget`]. The
//! [`WidgetRegistry`] additionally refuses creation when no setup phase is
//! open, so no id can leak out of that window.

use std::fmt;
use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

use crate::tools::ToolId;

mod builder;
mod canvas;
mod registry;

pub use builder::SetupBuilder;
pub use canvas::{Canvas, CanvasStore};
pub use registry::WidgetRegistry;

/// Opaque handle of a widget or canvas, unique within a session.
///
/// The ABI reports failed creation as `0`; here that is unrepresentable and
/// [`WidgetId::raw_or_sentinel`] recovers the ABI value when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(NonZeroU64);

impl WidgetId {
    /// The ABI value for "not created".
    pub const SENTINEL: u64 = 0;

    pub fn from_raw(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    pub fn raw(self) -> u64 {
        self.0.get()
    }

    pub fn raw_or_sentinel<E>(result: &Result<WidgetId, E>) -> u64 {
        result.as_ref().map_or(Self::SENTINEL, |id| id.raw())
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Placement of a widget on the tool's setup panel, in panel pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetRect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl WidgetRect {
    pub fn new(x: usize, y: usize, w: usize, h: usize) -> Self {
        Self { x, y, w, h }
    }

    pub fn to_egui(self) -> egui::Rect {
        egui::Rect::from_min_size(
            egui::pos2(self.x as f32, self.y as f32),
            egui::vec2(self.w as f32, self.h as f32),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetKind {
    Button { text: String },
    Label { text: String },
    Slider { min: i64, max: i64, value: i64 },
    Canvas,
}

impl WidgetKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Button { .. } => "button",
            Self::Label { .. } => "label",
            Self::Slider { .. } => "slider",
            Self::Canvas => "canvas",
        }
    }
}

/// Everything the host remembers about one created widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetInfo {
    pub id: WidgetId,
    pub owner: ToolId,
    pub rect: WidgetRect,
    pub kind: WidgetKind,
}
