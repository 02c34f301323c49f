use std::collections::HashMap;

use super::WidgetId;
use crate::assets::AssetLibrary;
use crate::color::Color;
use crate::error::{CanvasError, ImageError};
use crate::image::{Image, PixelBuffer};

/// A host-managed drawing surface owned by one tool's setup panel
#[derive(Debug, Clone)]
pub struct Canvas {
    id: WidgetId,
    buffer: PixelBuffer,
}

impl Canvas {
    pub fn new(id: WidgetId, width: usize, height: usize) -> Result<Self, ImageError> {
        Ok(Self {
            id,
            buffer: PixelBuffer::new(width, height, Color::TRANSPARENT)?,
        })
    }

    pub(crate) fn from_buffer(id: WidgetId, buffer: PixelBuffer) -> Self {
        Self { id, buffer }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.buffer.contains(x, y)
    }

    /// Reads one pixel, `None` when outside the canvas.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        self.buffer.get_pixel(x, y).ok()
    }
}

/// Every canvas created in a session, keyed by id
#[derive(Debug, Default)]
pub struct CanvasStore {
    canvases: HashMap<WidgetId, Canvas>,
}

impl CanvasStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, canvas: Canvas) {
        self.canvases.insert(canvas.id, canvas);
    }

    /// Looks up a canvas by its widget id.
    pub fn get(&self, id: WidgetId) -> Option<&Canvas> {
        self.canvases.get(&id)
    }

    /// Number of canvases created so far.
    pub fn len(&self) -> usize {
        self.canvases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canvases.is_empty()
    }

    fn get_mut(&mut self, id: WidgetId) -> Result<&mut Canvas, CanvasError> {
        self.canvases.get_mut(&id).ok_or(CanvasError::UnknownCanvas(id))
    }

    /// Sets one pixel of a canvas, bounds-checked.
    pub fn put_pixel(&mut self, id: WidgetId, x: usize, y: usize, color: Color) -> Result<(), CanvasError> {
        let canvas = self.get_mut(id)?;
        canvas
            .buffer
            .set_pixel(x, y, color)
            .map_err(|_| CanvasError::OutOfBounds { id, x, y })
    }

    /// Blits `texture` scaled to `w`x`h` at `(x, y)`; parts outside the canvas are clipped.
    #[allow(clippy::too_many_arguments)]
    pub fn put_sprite(
        &mut self,
        assets: &mut AssetLibrary,
        id: WidgetId,
        x: usize,
        y: usize,
        w: usize,
        h: usize,
        texture: &str,
    ) -> Result<(), CanvasError> {
        // Look the canvas up first so an unknown id never touches the disk.
        self.get_mut(id)?;
        let sprite = assets.load(texture, w, h)?;
        self.get_mut(id)?.buffer.blit(&sprite, x, y);
        Ok(())
    }

    /// Fills the whole canvas with `color`.
    pub fn clean(&mut self, id: WidgetId, color: Color) -> Result<(), CanvasError> {
        self.get_mut(id)?.buffer.fill(color);
        Ok(())
    }
}
