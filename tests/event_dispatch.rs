use std::sync::Arc;

use paint_plugin_host::event::{ButtonClickedEventData, MouseButton};
use paint_plugin_host::{
    Color, Event, EventType, Host, HostError, Image, PixelBuffer, SessionStatus, SetupBuilder, Tool, ToolContext,
    WidgetId, module_fn,
};
use parking_lot::Mutex;

type Calls = Arc<Mutex<Vec<(&'static str, Event)>>>;

// Records every event it receives; the first instance also owns a button.
struct Listener {
    name: &'static str,
    calls: Calls,
    with_button: bool,
}

impl Tool for Listener {
    fn apply(&mut self, _image: Option<&mut dyn Image>, event: &Event, _ctx: &mut ToolContext<'_>) {
        self.calls.lock().push((self.name, *event));
    }

    fn texture(&self) -> &str {
        self.name
    }

    fn build_setup_widget(&mut self, builder: &mut SetupBuilder<'_>) {
        if self.with_button {
            builder.create_button(0, 0, 64, 20, "Go").unwrap();
        }
    }
}

fn two_listeners() -> (Host, Calls) {
    let calls = Calls::default();
    let mut host = Host::default();
    let shared = Arc::clone(&calls);
    host.load_module(&module_fn("listeners", move |r| {
        r.add_tool(Box::new(Listener {
            name: "first.png",
            calls: Arc::clone(&shared),
            with_button: true,
        }))
        .unwrap();
        r.add_filter(Box::new(Listener {
            name: "second.png",
            calls: Arc::clone(&shared),
            with_button: false,
        }))
        .unwrap();
    }))
    .unwrap();
    (host, calls)
}

#[test]
fn test_button_click_reaches_every_tool_once() {
    let (mut host, calls) = two_listeners();
    let button = host.widgets().find_button("Go").unwrap().id;

    assert_eq!(host.click_button(button).unwrap(), 2);

    let calls = calls.lock();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "first.png");
    assert_eq!(calls[1].0, "second.png");
    for (_, event) in calls.iter() {
        assert_eq!(event.event_type(), EventType::ButtonClicked);
        assert_eq!(event.button_clicked(), Some(&ButtonClickedEventData { id: button }));
        assert_eq!(event.slider_moved(), None);
    }
}

#[test]
fn test_mouse_events_are_delivered_in_order() {
    let (mut host, calls) = two_listeners();
    let mut image = PixelBuffer::new(4, 4, Color::WHITE).unwrap();

    host.dispatch(Some(&mut image), &Event::mouse_pressed(1, 2, MouseButton::Left))
        .unwrap();
    host.dispatch(Some(&mut image), &Event::mouse_moved(2, 2, 1, 0)).unwrap();
    host.dispatch(Some(&mut image), &Event::mouse_released(2, 2, MouseButton::Left))
        .unwrap();

    let types: Vec<_> = calls
        .lock()
        .iter()
        .filter(|(name, _)| *name == "first.png")
        .map(|(_, event)| event.event_type())
        .collect();
    assert_eq!(
        types,
        vec![EventType::MousePressed, EventType::MouseMoved, EventType::MouseReleased]
    );
}

struct Exploder;

impl Tool for Exploder {
    fn apply(&mut self, _image: Option<&mut dyn Image>, event: &Event, _ctx: &mut ToolContext<'_>) {
        if matches!(event, Event::ButtonClicked(_)) {
            panic!("exploder hit");
        }
    }

    fn texture(&self) -> &str {
        "exploder.png"
    }

    fn build_setup_widget(&mut self, builder: &mut SetupBuilder<'_>) {
        builder.create_button(0, 0, 10, 10, "Boom").unwrap();
    }
}

#[test]
fn test_tool_panic_fails_the_session() {
    let mut host = Host::default();
    host.load_module(&module_fn("exploder", |r| {
        r.add_tool(Box::new(Exploder)).unwrap();
    }))
    .unwrap();
    let button = host.widgets().find_button("Boom").unwrap().id;
    let mut image = PixelBuffer::new(1, 1, Color::WHITE).unwrap();

    // Other events still go through.
    host.dispatch(Some(&mut image), &Event::mouse_moved(0, 0, 0, 0)).unwrap();

    match host.click_button(button) {
        Err(HostError::ToolPanicked { during, message, .. }) => {
            assert_eq!(during, "apply");
            assert!(message.contains("exploder hit"));
        }
        other => panic!("expected a tool panic, got {:?}", other),
    }
    assert_eq!(host.status(), SessionStatus::Failed);
    assert!(matches!(
        host.dispatch(Some(&mut image), &Event::mouse_moved(0, 0, 0, 0)),
        Err(HostError::SessionFailed)
    ));

    // Shutdown is still allowed and drops the tool.
    assert_eq!(host.shutdown(), 1);
}

#[test]
fn test_unknown_button_is_rejected() {
    let (mut host, calls) = two_listeners();
    let bogus = WidgetId::from_raw(999).unwrap();
    assert!(matches!(
        host.click_button(bogus),
        Err(HostError::UnknownWidget { kind: "button", .. })
    ));
    assert!(calls.lock().is_empty());
}
