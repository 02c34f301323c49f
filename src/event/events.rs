use serde::{Deserialize, Serialize};

use crate::widget::WidgetId;

/// Discriminant of an [`Event`].
///
/// The numeric codes are part of the plugin ABI and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum EventType {
    NoEvent = 0,
    MouseMoved = 1,
    MousePressed = 2,
    MouseReleased = 3,
    ButtonClicked = 4,
    SliderMoved = 5,
    CanvasMPressed = 6,
    CanvasMReleased = 7,
    CanvasMMoved = 8,
}

impl EventType {
    pub const ALL: [EventType; 9] = [
        Self::NoEvent,
        Self::MouseMoved,
        Self::MousePressed,
        Self::MouseReleased,
        Self::ButtonClicked,
        Self::SliderMoved,
        Self::CanvasMPressed,
        Self::CanvasMReleased,
        Self::CanvasMMoved,
    ];

    /// The numeric ABI code.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Maps an ABI code back to its type; unknown codes give `None`.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
}

/// Modifier keys held while a mouse button changed state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        alt: false,
        ctrl: false,
    };
}

/// Pointer motion over the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionEventData {
    pub x: usize,
    pub y: usize,
    /// Relative to the previous pointer position, may be negative.
    pub rel_x: i64,
    pub rel_y: i64,
}

/// Mouse button pressed or released over the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseButtonEventData {
    pub x: usize,
    pub y: usize,
    pub button: MouseButton,
    #[serde(default)]
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonClickedEventData {
    pub id: WidgetId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliderMovedEventData {
    pub id: WidgetId,
    pub value: i64,
}

/// Mouse activity on a canvas; `x`/`y` are local to that canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasEventData {
    pub id: WidgetId,
    pub x: usize,
    pub y: usize,
}

/// Kind of mouse activity on a canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanvasAction {
    Pressed,
    Released,
    Moved,
}

impl CanvasAction {
    pub fn into_event(self, data: CanvasEventData) -> Event {
        match self {
            Self::Pressed => Event::CanvasMPressed(data),
            Self::Released => Event::CanvasMReleased(data),
            Self::Moved => Event::CanvasMMoved(data),
        }
    }
}

/// One occurrence delivered to every registered tool.
///
/// Each variant carries exactly the payload its [`EventType`] names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    NoEvent,
    MouseMoved(MotionEventData),
    MousePressed(MouseButtonEventData),
    MouseReleased(MouseButtonEventData),
    ButtonClicked(ButtonClickedEventData),
    SliderMoved(SliderMovedEventData),
    CanvasMPressed(CanvasEventData),
    CanvasMReleased(CanvasEventData),
    CanvasMMoved(CanvasEventData),
}

impl Event {
    /// The discriminant of this event.
    pub fn event_type(&self) -> EventType {
        match self {
            Self::NoEvent => EventType::NoEvent,
            Self::MouseMoved(_) => EventType::MouseMoved,
            Self::MousePressed(_) => EventType::MousePressed,
            Self::MouseReleased(_) => EventType::MouseReleased,
            Self::ButtonClicked(_) => EventType::ButtonClicked,
            Self::SliderMoved(_) => EventType::SliderMoved,
            Self::CanvasMPressed(_) => EventType::CanvasMPressed,
            Self::CanvasMReleased(_) => EventType::CanvasMReleased,
            Self::CanvasMMoved(_) => EventType::CanvasMMoved,
        }
    }

    /// True for events that happen over the edited image.
    pub fn is_image_scoped(&self) -> bool {
        matches!(
            self,
            Self::MouseMoved(_) | Self::MousePressed(_) | Self::MouseReleased(_)
        )
    }

    pub fn motion(&self) -> Option<&MotionEventData> {
        match self {
            Self::MouseMoved(data) => Some(data),
            _ => None,
        }
    }

    pub fn mouse_button(&self) -> Option<&MouseButtonEventData> {
        match self {
            Self::MousePressed(data) | Self::MouseReleased(data) => Some(data),
            _ => None,
        }
    }

    pub fn button_clicked(&self) -> Option<&ButtonClickedEventData> {
        match self {
            Self::ButtonClicked(data) => Some(data),
            _ => None,
        }
    }

    pub fn slider_moved(&self) -> Option<&SliderMovedEventData> {
        match self {
            Self::SliderMoved(data) => Some(data),
            _ => None,
        }
    }

    pub fn canvas(&self) -> Option<&CanvasEventData> {
        match self {
            Self::CanvasMPressed(data) | Self::CanvasMReleased(data) | Self::CanvasMMoved(data) => {
                Some(data)
            }
            _ => None,
        }
    }

    /// Id of the widget or canvas the event is scoped to, if any.
    pub fn widget_id(&self) -> Option<WidgetId> {
        match self {
            Self::ButtonClicked(data) => Some(data.id),
            Self::SliderMoved(data) => Some(data.id),
            _ => self.canvas().map(|data| data.id),
        }
    }

    pub fn mouse_moved(x: usize, y: usize, rel_x: i64, rel_y: i64) -> Self {
        Self::MouseMoved(MotionEventData { x, y, rel_x, rel_y })
    }

    pub fn mouse_pressed(x: usize, y: usize, button: MouseButton) -> Self {
        Self::MousePressed(MouseButtonEventData {
            x,
            y,
            button,
            modifiers: Modifiers::NONE,
        })
    }

    pub fn mouse_released(x: usize, y: usize, button: MouseButton) -> Self {
        Self::MouseReleased(MouseButtonEventData {
            x,
            y,
            button,
            modifiers: Modifiers::NONE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(raw: u64) -> WidgetId {
        WidgetId::from_raw(raw).unwrap()
    }

    #[test]
    fn test_codes_match_abi() {
        for (code, ty) in EventType::ALL.iter().enumerate() {
            assert_eq!(ty.code(), code as u32);
            assert_eq!(EventType::from_code(code as u32), Some(*ty));
        }
        assert_eq!(EventType::from_code(9), None);
    }

    #[test]
    fn test_payload_matches_discriminant() {
        let event = Event::mouse_moved(3, 4, -2, 7);
        assert_eq!(event.event_type(), EventType::MouseMoved);
        let motion = event.motion().unwrap();
        assert_eq!((motion.x, motion.y, motion.rel_x, motion.rel_y), (3, 4, -2, 7));
        assert!(event.mouse_button().is_none());
        assert!(event.canvas().is_none());

        let event = Event::SliderMoved(SliderMovedEventData {
            id: widget(9),
            value: -3,
        });
        assert_eq!(event.event_type(), EventType::SliderMoved);
        assert_eq!(event.slider_moved().unwrap().value, -3);
        assert_eq!(event.widget_id(), Some(widget(9)));
        assert!(event.button_clicked().is_none());
    }

    #[test]
    fn test_modifier_flags_are_independent() {
        let event = Event::MouseReleased(MouseButtonEventData {
            x: 1,
            y: 2,
            button: MouseButton::Right,
            modifiers: Modifiers {
                shift: true,
                alt: false,
                ctrl: true,
            },
        });
        let data = event.mouse_button().unwrap();
        assert_eq!(data.button, MouseButton::Right);
        assert!(data.modifiers.shift && !data.modifiers.alt && data.modifiers.ctrl);
    }

    #[test]
    fn test_image_scope() {
        assert!(Event::mouse_pressed(0, 0, MouseButton::Left).is_image_scoped());
        assert!(!Event::NoEvent.is_image_scoped());
        let canvas = Event::CanvasMMoved(CanvasEventData {
            id: widget(1),
            x: 0,
            y: 0,
        });
        assert!(!canvas.is_image_scoped());
        assert_eq!(canvas.canvas().unwrap().id, widget(1));
    }

    #[test]
    fn test_canvas_action_variants() {
        let data = CanvasEventData {
            id: widget(2),
            x: 5,
            y: 6,
        };
        assert_eq!(CanvasAction::Pressed.into_event(data).event_type(), EventType::CanvasMPressed);
        assert_eq!(CanvasAction::Released.into_event(data).event_type(), EventType::CanvasMReleased);
        assert_eq!(CanvasAction::Moved.into_event(data).canvas(), Some(&data));
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{"type":"ButtonClicked","data":{"id":12}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.button_clicked().unwrap().id, widget(12));

        let json = r#"{"type":"MousePressed","data":{"x":1,"y":2,"button":"Left"}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event, Event::mouse_pressed(1, 2, MouseButton::Left));
    }
}
