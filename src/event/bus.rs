use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use log::{error, trace};

use super::Event;
use crate::assets::AssetLibrary;
use crate::context::SharedContext;
use crate::error::HostError;
use crate::image::Image;
use crate::tools::{RegisteredTool, ToolContext, ToolId, ToolState};
use crate::widget::CanvasStore;

/// Registered tools in registration order, and the fan-out of events to them.
#[derive(Debug)]
pub struct EventBus {
    tools: Vec<RegisteredTool>,
    next_id: u32,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            next_id: 1,
        }
    }

    pub(crate) fn next_tool_id(&mut self) -> ToolId {
        let id = ToolId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn subscribe(&mut self, tool: RegisteredTool) {
        self.tools.push(tool);
    }

    /// Number of registered tools, destroyed ones included.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Registered tools in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredTool> {
        self.tools.iter()
    }

    /// Looks up a registered tool by id.
    pub fn get(&self, id: ToolId) -> Option<&RegisteredTool> {
        self.tools.iter().find(|tool| tool.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: ToolId) -> Option<&mut RegisteredTool> {
        self.tools.iter_mut().find(|tool| tool.id() == id)
    }

    /// A live tool already using `texture`.
    pub fn find_by_texture(&self, texture: &str) -> Option<&RegisteredTool> {
        self.tools
            .iter()
            .find(|tool| tool.state() != ToolState::Destroyed && tool.texture() == texture)
    }

    /// Delivers `event` once to every tool that has finished setup, in
    /// registration order. Returns how many tools received it.
    pub fn emit(
        &mut self,
        mut image: Option<&mut dyn Image>,
        event: &Event,
        app: &SharedContext,
        canvases: &mut CanvasStore,
        assets: &mut AssetLibrary,
    ) -> Result<usize, HostError> {
        let mut delivered = 0;
        for slot in self.tools.iter_mut().filter(|slot| slot.state().accepts_events()) {
            slot.transition(ToolState::Dispatching)?;
            let id = slot.id();
            let Some(tool) = slot.tool_mut() else {
                continue;
            };
            let mut ctx = ToolContext::new(id, app, canvases, assets);
            let image = image.as_mut().map(|image| &mut **image as &mut dyn Image);
            trace!("Dispatching {:?} to tool {}", event.event_type(), id);
            call_guarded(id, "apply", || tool.apply(image, event, &mut ctx))?;
            delivered += 1;
        }
        Ok(delivered)
    }

    /// Drops every live tool exactly once. Returns how many were dropped.
    pub(crate) fn destroy_all(&mut self) -> usize {
        let mut destroyed = 0;
        for slot in &mut self.tools {
            if slot.destroy() {
                destroyed += 1;
            }
        }
        destroyed
    }
}

/// Runs a tool callback, converting a panic into [`HostError::ToolPanicked`].
pub(crate) fn call_guarded<R>(tool: ToolId, during: &'static str, f: impl FnOnce() -> R) -> Result<R, HostError> {
    catch_panic(f).map_err(|message| {
        error!("Tool {} panicked during {}: {}", tool, during, message);
        HostError::ToolPanicked {
            tool,
            during,
            message,
        }
    })
}

/// Runs `f`, returning the panic message if it unwinds.
pub(crate) fn catch_panic<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::MouseButton;
    use crate::image::PixelBuffer;
    use crate::tools::{Placement, Tool};
    use crate::widget::SetupBuilder;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        texture: String,
        calls: Arc<AtomicUsize>,
    }

    impl Tool for Counting {
        fn apply(&mut self, image: Option<&mut dyn Image>, _event: &Event, _ctx: &mut ToolContext<'_>) {
            assert!(image.is_some());
            self.calls.fetch_add(1, Ordering::SeqCst);
        }

        fn texture(&self) -> &str {
            &self.texture
        }

        fn build_setup_widget(&mut self, _builder: &mut SetupBuilder<'_>) {}
    }

    fn add(bus: &mut EventBus, texture: &str, calls: &Arc<AtomicUsize>, ready: bool) -> ToolId {
        let id = bus.next_tool_id();
        let tool = Counting {
            texture: texture.to_string(),
            calls: Arc::clone(calls),
        };
        let mut slot = RegisteredTool::new(id, Placement::Tool, Box::new(tool));
        if ready {
            slot.transition(ToolState::SetupBuilt).unwrap();
        }
        bus.subscribe(slot);
        id
    }

    #[test]
    fn test_emit_skips_tools_without_setup() {
        let mut bus = EventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let ready = add(&mut bus, "a.png", &calls, true);
        add(&mut bus, "b.png", &calls, false);

        let mut image = PixelBuffer::new(2, 2, crate::color::Color::WHITE).unwrap();
        let delivered = bus
            .emit(
                Some(&mut image),
                &Event::mouse_pressed(0, 0, MouseButton::Left),
                &SharedContext::default(),
                &mut CanvasStore::new(),
                &mut AssetLibrary::new("assets"),
            )
            .unwrap();

        assert_eq!(delivered, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(bus.get(ready).unwrap().state(), ToolState::Dispatching);
    }

    #[test]
    fn test_destroy_all_is_idempotent() {
        let mut bus = EventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));
        add(&mut bus, "a.png", &calls, true);
        add(&mut bus, "b.png", &calls, false);

        assert_eq!(bus.destroy_all(), 2);
        assert_eq!(bus.destroy_all(), 0);
        assert!(bus.iter().all(|tool| tool.state() == ToolState::Destroyed));
        assert!(bus.find_by_texture("a.png").is_none());
    }

    #[test]
    fn test_call_guarded_reports_panics() {
        let result = call_guarded(ToolId(4), "apply", || -> u8 { panic!("boom") });
        match result {
            Err(HostError::ToolPanicked { tool, during, message }) => {
                assert_eq!(tool, ToolId(4));
                assert_eq!(during, "apply");
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(call_guarded(ToolId(1), "texture", || 5).unwrap(), 5);
    }
}
