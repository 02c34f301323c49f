use log::warn;

use crate::color::Color;
use crate::event::{Event, MouseButton};
use crate::image::Image;
use crate::tools::{Tool, ToolContext};
use crate::widget::{SetupBuilder, WidgetId};

const MIN_SIZE: i64 = 1;
const MAX_SIZE: i64 = 16;
const PREVIEW_SIZE: usize = MAX_SIZE as usize;

/// Freehand drawing with a square brush.
///
/// The left button paints the foreground color, the right button the
/// background color.
pub struct Pencil {
    size: usize,
    held: Option<MouseButton>,
    slider: Option<WidgetId>,
    preview: Option<WidgetId>,
}

impl Pencil {
    pub fn new() -> Self {
        Self {
            size: 1,
            held: None,
            slider: None,
            preview: None,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn stamp(&self, image: &mut dyn Image, x: usize, y: usize, color: Color) {
        let half = self.size / 2;
        let left = x.saturating_sub(half);
        let top = y.saturating_sub(half);
        // Brush is clipped at the image border.
        let bottom = top.saturating_add(self.size).min(image.height());
        let right = left.saturating_add(self.size).min(image.width());
        for py in top..bottom {
            for px in left..right {
                image.write(px, py, color);
            }
        }
    }

    fn color_for(button: MouseButton, ctx: &ToolContext<'_>) -> Color {
        match button {
            MouseButton::Left => ctx.fg_color(),
            MouseButton::Right => ctx.bg_color(),
        }
    }

    fn redraw_preview(&self, ctx: &mut ToolContext<'_>) {
        let Some(canvas) = self.preview else {
            return;
        };
        let color = ctx.fg_color();
        let offset = (PREVIEW_SIZE - self.size) / 2;
        let mut paint = || -> Result<(), crate::error::CanvasError> {
            ctx.clean_canvas(canvas, Color::TRANSPARENT)?;
            for y in offset..offset + self.size {
                for x in offset..offset + self.size {
                    ctx.put_pixel(canvas, x, y, color)?;
                }
            }
            Ok(())
        };
        if let Err(err) = paint() {
            warn!("Pencil preview not updated: {}", err);
        }
    }
}

impl Default for Pencil {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for Pencil {
    fn apply(&mut self, image: Option<&mut dyn Image>, event: &Event, ctx: &mut ToolContext<'_>) {
        match event {
            Event::MousePressed(data) => {
                self.held = Some(data.button);
                if let Some(image) = image {
                    self.stamp(image, data.x, data.y, Self::color_for(data.button, ctx));
                }
            }
            Event::MouseMoved(data) => {
                if let (Some(button), Some(image)) = (self.held, image) {
                    self.stamp(image, data.x, data.y, Self::color_for(button, ctx));
                }
            }
            Event::MouseReleased(_) => self.held = None,
            Event::SliderMoved(data) if Some(data.id) == self.slider => {
                self.size = data.value.clamp(MIN_SIZE, MAX_SIZE) as usize;
                self.redraw_preview(ctx);
            }
            _ => {}
        }
    }

    fn texture(&self) -> &str {
        "tools/pencil.png"
    }

    fn build_setup_widget(&mut self, builder: &mut SetupBuilder<'_>) {
        match builder.create_slider(0, 0, 128, 16, MIN_SIZE, MAX_SIZE, self.size as i64) {
            Ok(id) => self.slider = Some(id),
            Err(err) => warn!("Pencil size slider refused: {}", err),
        }
        match builder.create_canvas(0, 24, PREVIEW_SIZE, PREVIEW_SIZE) {
            Ok(id) => {
                self.preview = Some(id);
                let offset = (PREVIEW_SIZE - self.size) / 2;
                if let Err(err) = builder.put_pixel(id, offset, offset, Color::BLACK) {
                    warn!("Pencil preview not drawn: {}", err);
                }
            }
            Err(err) => warn!("Pencil preview canvas refused: {}", err),
        }
    }

    fn name(&self) -> &str {
        "Pencil"
    }
}
