use std::path::PathBuf;

use thiserror::Error;

use crate::tools::{ToolId, ToolState};
use crate::widget::WidgetId;

/// Errors raised by bounds-checked pixel access
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("Pixel ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("Image dimensions {width}x{height} do not fit in memory")]
    InvalidDimensions { width: usize, height: usize },
    #[error("Failed to decode or encode image: {0}")]
    Codec(String),
}

impl From<image::ImageError> for ImageError {
    fn from(err: image::ImageError) -> Self {
        Self::Codec(err.to_string())
    }
}

/// Reasons a widget creation call produced no id.
///
/// Each variant corresponds to the ABI sentinel `0`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    #[error("Widgets can only be created while a tool builds its setup widget")]
    OutsideSetup,
    #[error("Widget size {w}x{h} must be non-zero")]
    EmptyRect { w: usize, h: usize },
    #[error("Widget extent {extent} exceeds the limit of {limit}")]
    TooLarge { extent: usize, limit: usize },
    #[error("Slider range {min}..={max} is empty")]
    EmptyRange { min: i64, max: i64 },
    #[error("Slider start value {start} is outside {min}..={max}")]
    StartOutOfRange { start: i64, min: i64, max: i64 },
    #[error("Canvas of {w}x{h} pixels cannot be allocated")]
    CanvasTooLarge { w: usize, h: usize },
    #[error("Widget id space exhausted")]
    IdsExhausted,
}

/// Errors raised by canvas mutation
#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("No canvas with id {0}")]
    UnknownCanvas(WidgetId),
    #[error("Pixel ({x}, {y}) is outside canvas {id}")]
    OutOfBounds { id: WidgetId, x: usize, y: usize },
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Errors raised while resolving or loading textures
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Texture path must be relative and stay inside the asset root: {0:?}")]
    InvalidPath(String),
    #[error("Failed to load texture {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Sprite size {w}x{h} must be non-zero")]
    EmptySprite { w: usize, h: usize },
}

/// Errors raised by `Registrar::add_tool` / `Registrar::add_filter`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Tool {name:?} has an empty texture path")]
    EmptyTexture { name: String },
    #[error("Texture {texture:?} is already used by tool {existing}")]
    DuplicateTexture { texture: String, existing: ToolId },
}

/// Errors raised while loading the host configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised by the host session
#[derive(Error, Debug)]
pub enum HostError {
    #[error("The session has been shut down")]
    SessionClosed,
    #[error("The session failed after a tool panicked and accepts no more calls")]
    SessionFailed,
    #[error("Tool {tool} panicked during {during}: {message}")]
    ToolPanicked {
        tool: ToolId,
        during: &'static str,
        message: String,
    },
    #[error("Module {module} panicked during init_module: {message}")]
    ModulePanicked { module: String, message: String },
    #[error("Event {0:?} is image-scoped but no image was supplied")]
    MissingImage(crate::event::EventType),
    #[error("Tool {0} declared no setup widgets")]
    EmptySetup(ToolId),
    #[error("No tool with id {0}")]
    UnknownTool(ToolId),
    #[error("Tool {tool} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        tool: ToolId,
        from: ToolState,
        to: ToolState,
    },
    #[error("No {kind} with id {id}")]
    UnknownWidget { kind: &'static str, id: WidgetId },
    #[error("Slider {id} value {value} is outside {min}..={max}")]
    SliderOutOfRange {
        id: WidgetId,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("Position ({x}, {y}) is outside canvas {id}")]
    CanvasPositionOutOfBounds { id: WidgetId, x: usize, y: usize },
}

/// Errors raised while replaying a session script
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to read script: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Step {step}: no button labelled {text:?}")]
    NoSuchButton { step: usize, text: String },
    #[error("Step {step}: no {kind} at index {index}")]
    NoSuchWidget {
        step: usize,
        kind: &'static str,
        index: usize,
    },
    #[error("Step {step}: {source}")]
    Host {
        step: usize,
        #[source]
        source: HostError,
    },
}
