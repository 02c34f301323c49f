use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{HostError, ScriptError};
use crate::event::{CanvasAction, Event};
use crate::host::Host;
use crate::image::PixelBuffer;

/// One interaction replayed against a host.
///
/// Widgets are addressed the way a user finds them: buttons by their text,
/// sliders and canvases by creation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    Event { event: Event },
    Click { text: String },
    Slide { index: usize, value: i64 },
    Canvas {
        index: usize,
        action: CanvasAction,
        x: usize,
        y: usize,
    },
    Foreground { color: Color },
    Background { color: Color },
}

/// A recorded sequence of interactions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionScript {
    pub steps: Vec<ScriptStep>,
}

impl SessionScript {
    pub fn from_json_str(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let json = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Replays every step in order, stopping at the first failure.
    pub fn run(&self, host: &mut Host, image: &mut PixelBuffer) -> Result<(), ScriptError> {
        for (step, action) in self.steps.iter().enumerate() {
            let host_err = |source: HostError| ScriptError::Host { step, source };
            match action {
                ScriptStep::Event { event } => {
                    host.dispatch(Some(image), event).map_err(host_err)?;
                }
                ScriptStep::Click { text } => {
                    let id = host
                        .widgets()
                        .find_button(text)
                        .map(|info| info.id)
                        .ok_or_else(|| ScriptError::NoSuchButton {
                            step,
                            text: text.clone(),
                        })?;
                    host.click_button(id).map_err(host_err)?;
                }
                ScriptStep::Slide { index, value } => {
                    let id = nth_widget(host, step, "slider", *index)?;
                    host.move_slider(id, *value).map_err(host_err)?;
                }
                ScriptStep::Canvas { index, action, x, y } => {
                    let id = nth_widget(host, step, "canvas", *index)?;
                    host.canvas_mouse(id, *action, *x, *y).map_err(host_err)?;
                }
                ScriptStep::Foreground { color } => host.context().set_fg_color(*color),
                ScriptStep::Background { color } => host.context().set_bg_color(*color),
            }
        }
        info!("Replayed {} script step(s)", self.steps.len());
        Ok(())
    }
}

fn nth_widget(host: &Host, step: usize, kind: &'static str, index: usize) -> Result<crate::widget::WidgetId, ScriptError> {
    host.widgets()
        .nth_of_kind(kind, index)
        .map(|info| info.id)
        .ok_or(ScriptError::NoSuchWidget { step, kind, index })
}
