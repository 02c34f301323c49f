use log::error;

use super::{Canvas, CanvasStore, WidgetId, WidgetKind, WidgetRect, WidgetRegistry};
use crate::assets::AssetLibrary;
use crate::color::Color;
use crate::error::{CanvasError, WidgetError};
use crate::image::PixelBuffer;
use crate::tools::ToolId;

/// Widget factory handed to a tool for the duration of its setup phase.
///
/// Every `create_*` call returns the new widget's id, or the reason the host
/// refused it (the ABI's `0`).
pub struct SetupBuilder<'a> {
    owner: ToolId,
    widgets: &'a mut WidgetRegistry,
    canvases: &'a mut CanvasStore,
    assets: &'a mut AssetLibrary,
}

impl<'a> SetupBuilder<'a> {
    pub(crate) fn new(
        owner: ToolId,
        widgets: &'a mut WidgetRegistry,
        canvases: &'a mut CanvasStore,
        assets: &'a mut AssetLibrary,
    ) -> Self {
        Self {
            owner,
            widgets,
            canvases,
            assets,
        }
    }

    /// The tool whose setup panel is being built.
    pub fn owner(&self) -> ToolId {
        self.owner
    }

    /// Creates a button; clicking it sends `ButtonClicked` to every tool.
    pub fn create_button(&mut self, x: usize, y: usize, w: usize, h: usize, text: &str) -> Result<WidgetId, WidgetError> {
        let kind = WidgetKind::Button {
            text: text.to_string(),
        };
        self.widgets.create(WidgetRect::new(x, y, w, h), kind)
    }

    pub fn create_label(&mut self, x: usize, y: usize, w: usize, h: usize, text: &str) -> Result<WidgetId, WidgetError> {
        let kind = WidgetKind::Label {
            text: text.to_string(),
        };
        self.widgets.create(WidgetRect::new(x, y, w, h), kind)
    }

    /// Creates a slider over `min_value..=max_value` starting at `start_value`.
    #[allow(clippy::too_many_arguments)]
    pub fn create_slider(
        &mut self,
        x: usize,
        y: usize,
        w: usize,
        h: usize,
        min_value: i64,
        max_value: i64,
        start_value: i64,
    ) -> Result<WidgetId, WidgetError> {
        let kind = WidgetKind::Slider {
            min: min_value,
            max: max_value,
            value: start_value,
        };
        self.widgets.create(WidgetRect::new(x, y, w, h), kind)
    }

    /// Creates a `w`x`h` canvas, initially transparent.
    pub fn create_canvas(&mut self, x: usize, y: usize, w: usize, h: usize) -> Result<WidgetId, WidgetError> {
        let rect = WidgetRect::new(x, y, w, h);
        self.widgets.check(rect, &WidgetKind::Canvas)?;
        // Allocate before recording the widget so a failure leaves no trace.
        let buffer = PixelBuffer::new(w, h, Color::TRANSPARENT).map_err(|err| {
            error!("Failed to allocate a {}x{} canvas: {}", w, h, err);
            WidgetError::CanvasTooLarge { w, h }
        })?;
        let id = self.widgets.create(rect, WidgetKind::Canvas)?;
        self.canvases.insert(Canvas::from_buffer(id, buffer));
        Ok(id)
    }

    pub fn put_pixel(&mut self, canvas: WidgetId, x: usize, y: usize, color: Color) -> Result<(), CanvasError> {
        self.canvases.put_pixel(canvas, x, y, color)
    }

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
