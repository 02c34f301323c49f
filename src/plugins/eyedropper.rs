use log::{debug, warn};

use crate::color::Color;
use crate::event::{Event, MouseButton};
use crate::image::Image;
use crate::tools::{Tool, ToolContext};
use crate::widget::{SetupBuilder, WidgetId};

const SWATCH_SIZE: usize = 16;

/// Samples the image under the cursor into the foreground (left button) or
/// background (right button) color. Its canvas shows the foreground color.
pub struct Eyedropper {
    swatch: Option<WidgetId>,
}

impl Eyedropper {
    pub fn new() -> Self {
        Self { swatch: None }
    }
}

impl Default for Eyedropper {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for Eyedropper {
    fn apply(&mut self, image: Option<&mut dyn Image>, event: &Event, ctx: &mut ToolContext<'_>) {
        let (Event::MousePressed(data), Some(image)) = (event, image) else {
            return;
        };
        let color = match image.get_pixel(data.x, data.y) {
            Ok(color) => color,
            Err(err) => {
                debug!("Eyedropper ignored press: {}", err);
                return;
            }
        };
        match data.button {
            MouseButton::Left => ctx.set_fg_color(color),
            MouseButton::Right => ctx.set_bg_color(color),
        }

        if let Some(swatch) = self.swatch {
            let fg = ctx.fg_color();
            if let Err(err) = ctx.clean_canvas(swatch, fg) {
                warn!("Eyedropper swatch not updated: {}", err);
            }
        }
    }

    fn texture(&self) -> &str {
        "tools/eyedropper.png"
    }

    fn build_setup_widget(&mut self, builder: &mut SetupBuilder<'_>) {
        if let Err(err) = builder.create_label(0, 0, 96, 16, "Foreground") {
            warn!("Eyedropper label refused: {}", err);
        }
        match builder.create_canvas(0, 20, SWATCH_SIZE, SWATCH_SIZE) {
            Ok(id) => {
                self.swatch = Some(id);
                if let Err(err) = builder.clean_canvas(id, Color::BLACK) {
                    warn!("Eyedropper swatch not drawn: {}", err);
                }
            }
            Err(err) => warn!("Eyedropper swatch canvas refused: {}", err),
        }
    }

    fn name(&self) -> &str {
        "Eyedropper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Host;
    use crate::image::PixelBuffer;
    use crate::tools::module_fn;

    #[test]
    fn test_samples_into_context() {
        let mut host = Host::default();
        host.load_module(&module_fn("eyedropper", |r| {
            r.add_tool(Box::new(Eyedropper::new())).unwrap();
        }))
        .unwrap();
        let swatch = host.widgets().nth_of_kind("canvas", 0).unwrap().id;

        let mut image = PixelBuffer::new(2, 1, Color::WHITE).unwrap();
        image.set_pixel(0, 0, Color::RED).unwrap();
        image.set_pixel(1, 0, Color::BLUE).unwrap();

        host.dispatch(Some(&mut image), &Event::mouse_pressed(0, 0, MouseButton::Left))
            .unwrap();
        host.dispatch(Some(&mut image), &Event::mouse_pressed(1, 0, MouseButton::Right))
            .unwrap();

        assert_eq!(host.context().fg_color(), Color::RED);
        assert_eq!(host.context().bg_color(), Color::BLUE);
        assert_eq!(host.canvases().get(swatch).unwrap().pixel(3, 3), Some(Color::RED));
    }

    #[test]
    fn test_press_outside_image_changes_nothing() {
        let mut host = Host::default();
        host.load_module(&module_fn("eyedropper", |r| {
            r.add_tool(Box::new(Eyedropper::new())).unwrap();
        }))
        .unwrap();
        let mut image = PixelBuffer::new(2, 2, Color::RED).unwrap();

        host.dispatch(Some(&mut image), &Event::mouse_pressed(9, 9, MouseButton::Left))
            .unwrap();
        assert_eq!(host.context().fg_color(), Color::BLACK);
    }
}
