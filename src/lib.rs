#![warn(clippy::all, rust_2018_idioms)]

pub mod assets;
pub mod color;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod host;
pub mod image;
pub mod plugins;
pub mod script;
pub mod toolbar;
pub mod tools;
pub mod widget;

pub use assets::AssetLibrary;
pub use color::Color;
pub use config::HostConfig;
pub use context::{ApplicationContext, SharedContext};
pub use error::{AssetError, CanvasError, HostError, ImageError, RegistrationError, ScriptError, WidgetError};
pub use event::{Event, EventType};
pub use host::{Host, LoadedModule, SessionId, SessionStatus};
pub use crate::image::{Image, PixelBuffer};
pub use script::{ScriptStep, SessionScript};
pub use toolbar::{Toolbar, ToolbarEntry};
pub use tools::{Placement, PluginModule, Registrar, Tool, ToolContext, ToolId, ToolState, module_fn};
pub use widget::{SetupBuilder, WidgetId};
