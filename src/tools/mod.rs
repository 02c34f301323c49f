use std::fmt;

use serde::{Deserialize, Serialize};

use crate::assets::AssetLibrary;
use crate::color::Color;
use crate::context::SharedContext;
use crate::error::CanvasError;
use crate::event::Event;
use crate::image::Image;
use crate::widget::{Canvas, CanvasStore, SetupBuilder, WidgetId};

mod lifecycle;
mod module;

pub use lifecycle::{RegisteredTool, ToolState};
pub use module::{FnModule, PluginModule, Registrar, module_fn};

/// The unit a plugin module registers with the host.
///
/// Once registered the host owns the tool: it calls
/// [`Tool::build_setup_widget`] exactly once, then [`Tool::apply`] for every
/// event, and drops the tool at shutdown. Tools and filters share this trait
/// and differ only in their [`Placement`].
pub trait Tool: Send {
    /// Reacts to one event.
    ///
    /// `image` is `Some` exactly for image-scoped events and is only borrowed
    /// for this call. `event` always matches its payload.
    fn apply(&mut self, image: Option<&mut dyn Image>, event: &Event, ctx: &mut ToolContext<'_>);

    /// Icon path, relative to the host's asset root.
    fn texture(&self) -> &str;

    /// Declares the tool's toolbar widgets. Called once, right after registration.
    fn build_setup_widget(&mut self, builder: &mut SetupBuilder<'_>);

    fn name(&self) -> &str {
        self.texture()
    }
}

/// Host-assigned tool identifier, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolId(pub u32);

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where the host places a tool's icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Placement {
    Tool,
    Filter,
}

/// Host services available to a tool while it handles an event.
///
/// Replaces the ABI's global context pointer and free canvas functions.
pub struct ToolContext<'a> {
    tool: ToolId,
    app: &'a SharedContext,
    canvases: &'a mut CanvasStore,
    assets: &'a mut AssetLibrary,
}

impl<'a> ToolContext<'a> {
    pub(crate) fn new(
        tool: ToolId,
        app: &'a SharedContext,
        canvases: &'a mut CanvasStore,
        assets: &'a mut AssetLibrary,
    ) -> Self {
        Self {
            tool,
            app,
            canvases,
            assets,
        }
    }

    /// The tool receiving this call.
    pub fn tool_id(&self) -> ToolId {
        self.tool
    }

    pub fn app(&self) -> &SharedContext {
        self.app
    }

    pub fn fg_color(&self) -> Color {
        self.app.fg_color()
    }

    pub fn bg_color(&self) -> Color {
        self.app.bg_color()
    }

    pub fn set_fg_color(&self, color: Color) {
        self.app.set_fg_color(color);
    }

    pub fn set_bg_color(&self, color: Color) {
        self.app.set_bg_color(color);
    }

    /// Read access to one of the session's canvases.
    pub fn canvas(&self, id: WidgetId) -> Option<&Canvas> {
        self.canvases.get(id)
    }

    pub fn put_pixel(&mut self, canvas: WidgetId, x: usize, y: usize, color: Color) -> Result<(), CanvasError> {
        self.canvases.put_pixel(canvas, x, y, color)
    }

    /// Draws `texture` scaled to `w`x`h` at `(x, y)`, clipped to the canvas.
    pub fn put_sprite(
        &mut self,
        canvas: WidgetId,
        x: usize,
        y: usize,
        w: usize,
        h: usize,
        texture: &str,
    ) -> Result<(), CanvasError> {
        self.canvases.put_sprite(self.assets, canvas, x, y, w, h, texture)
    }

    pub fn clean_canvas(&mut self, canvas: WidgetId, color: Color) -> Result<(), CanvasError> {
        self.canvases.clean(canvas, color)
    }
}
