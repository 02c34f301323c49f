use log::{info, warn};

use crate::event::Event;
use crate::image::Image;
use crate::tools::{Tool, ToolContext};
use crate::widget::{SetupBuilder, WidgetId};

/// Inverts the whole image. Clicking "Invert" arms the filter and the next
/// press on the image applies it once.
pub struct Invert {
    button: Option<WidgetId>,
    armed: bool,
}

impl Invert {
    pub fn new() -> Self {
        Self {
            button: None,
            armed: false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

impl Default for Invert {
    fn default() -> Self {
        Self::new()
    }
}

fn invert(image: &mut dyn Image) {
    for y in 0..image.height() {
        for x in 0..image.width() {
            let color = image.read(x, y);
            image.write(x, y, color.inverted());
        }
    }
}

impl Tool for Invert {
    fn apply(&mut self, image: Option<&mut dyn Image>, event: &Event, _ctx: &mut ToolContext<'_>) {
        match (event, image) {
            (Event::ButtonClicked(data), _) if Some(data.id) == self.button => self.armed = true,
            (Event::MousePressed(_), Some(image)) if self.armed => {
                invert(image);
                self.armed = false;
                info!("Inverted {}x{} image", image.width(), image.height());
            }
            _ => {}
        }
    }

    fn texture(&self) -> &str {
        "filters/invert.png"
    }

    fn build_setup_widget(&mut self, builder: &mut SetupBuilder<'_>) {
        match builder.create_button(0, 0, 96, 24, "Invert") {
            Ok(id) => self.button = Some(id),
            Err(err) => warn!("Invert button refused: {}", err),
        }
    }

    fn name(&self) -> &str {
        "Invert"
    }
}
