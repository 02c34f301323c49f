//! The headless host session.
//!
//! A [`Host`] owns everything that crosses the plugin boundary: registered
//! tools, widgets, canvases and the shared [`ApplicationContext`]. It drives
//! the whole lifecycle:
//!
//! ```text
//! Host::new ─► load_module (init_module, then setup of each new tool)
//!           ─► dispatch / click_button / move_slider / canvas_mouse ...
//!           ─► shutdown (every tool dropped exactly once)
//! ```
//!
//! Calls are synchronous and take `&mut self`, so a tool is never re-entered.
//! A panic inside any tool callback is fatal to the session.
//!
//! [`ApplicationContext`]: crate::context::ApplicationContext

use log::{debug, error, info, trace, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assets::AssetLibrary;
use crate::config::HostConfig;
use crate::context::SharedContext;
use crate::error::HostError;
use crate::event::{
    ButtonClickedEventData, CanvasAction, CanvasEventData, Event, EventBus, SliderMovedEventData, call_guarded,
    catch_panic,
};
use crate::image::Image;
use crate::toolbar::Toolbar;
use crate::tools::{PluginModule, Registrar, ToolId, ToolState};
use crate::widget::{CanvasStore, SetupBuilder, WidgetId, WidgetRegistry};

/// Identifies one host session in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    /// A tool panicked; only `shutdown` is still accepted.
    Failed,
    Closed,
}

/// A module loaded into the session and the tools it registered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedModule {
    pub name: String,
    pub tools: Vec<ToolId>,
}

pub struct Host {
    session: SessionId,
    config: HostConfig,
    context: SharedContext,
    bus: EventBus,
    widgets: WidgetRegistry,
    canvases: CanvasStore,
    assets: AssetLibrary,
    modules: Vec<LoadedModule>,
    status: SessionStatus,
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("session", &self.session)
            .field("status", &self.status)
            .field("modules", &self.modules)
            .field("tools", &self.bus.len())
            .field("widgets", &self.widgets.len())
            .finish_non_exhaustive()
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new(HostConfig::default())
    }
}

impl Host {
    /// Starts a session with `config`. No modules are loaded yet.
    pub fn new(config: HostConfig) -> Self {
        let session = SessionId::new();
        info!("Starting paint session {}", session);
        Self {
            session,
            context: SharedContext::new(config.initial_context()),
            bus: EventBus::new(),
            widgets: WidgetRegistry::new(config.max_widget_extent),
            canvases: CanvasStore::new(),
            assets: AssetLibrary::with_cache_size(&config.asset_root, config.sprite_cache_size),
            modules: Vec::new(),
            status: SessionStatus::Running,
            config,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// The published context handle. It stays the same for the whole session.
    pub fn context(&self) -> &SharedContext {
        &self.context
    }

    pub fn widgets(&self) -> &WidgetRegistry {
        &self.widgets
    }

    pub fn canvases(&self) -> &CanvasStore {
        &self.canvases
    }

    pub fn tools(&self) -> &EventBus {
        &self.bus
    }

    /// Modules loaded so far, in load order.
    pub fn modules(&self) -> &[LoadedModule] {
        &self.modules
    }

    pub fn module(&self, name: &str) -> Option<&LoadedModule> {
        self.modules.iter().find(|module| module.name == name)
    }

    /// Lifecycle state of a registered tool.
    pub fn tool_state(&self, id: ToolId) -> Option<ToolState> {
        self.bus.get(id).map(|tool| tool.state())
    }

    fn ensure_running(&self) -> Result<(), HostError> {
        match self.status {
            SessionStatus::Running => Ok(()),
            SessionStatus::Failed => Err(HostError::SessionFailed),
            SessionStatus::Closed => Err(HostError::SessionClosed),
        }
    }

    fn fail(&mut self, err: HostError) -> HostError {
        if matches!(err, HostError::ToolPanicked { .. } | HostError::ModulePanicked { .. }) {
            error!("Session {} failed: {}", self.session, err);
            self.status = SessionStatus::Failed;
        }
        err
    }

    /// Runs the module's `init_module`, then the setup phase of every tool it
    /// registered. Returns the new tools' ids in registration order.
    pub fn load_module(&mut self, module: &dyn PluginModule) -> Result<Vec<ToolId>, HostError> {
        self.ensure_running()?;
        let name = module.name().to_string();

        let mut registrar = Registrar::new(&name, &mut self.bus, self.config.reject_duplicate_textures);
        let init = catch_panic(|| module.init_module(&mut registrar));
        let registered = registrar.into_registered();
        if let Err(message) = init {
            return Err(self.fail(HostError::ModulePanicked { module: name, message }));
        }
        info!("Loaded module {} with {} tool(s)", name, registered.len());
        // Recorded before setup so the tools stay addressable if setup fails.
        self.modules.push(LoadedModule {
            name: name.clone(),
            tools: registered.clone(),
        });

        let mut first_error = None;
        for &id in &registered {
            match self.build_setup(id) {
                Ok(()) => {}
                Err(err @ HostError::ToolPanicked { .. }) => return Err(self.fail(err)),
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        match first_error {
            Some(err) => {
                let ready: Vec<ToolId> = registered
                    .iter()
                    .copied()
                    .filter(|&id| self.tool_state(id) == Some(ToolState::SetupBuilt))
                    .collect();
                warn!("Module {} partly loaded, ready tools {:?}: {}", name, ready, err);
                Err(err)
            }
            None => Ok(registered),
        }
    }

    /// Calls the tool's `build_setup_widget` inside an open setup phase.
    fn build_setup(&mut self, id: ToolId) -> Result<(), HostError> {
        let slot = self.bus.get_mut(id).ok_or(HostError::UnknownTool(id))?;
        let Some(tool) = slot.tool_mut() else {
            return Err(HostError::UnknownTool(id));
        };

        self.widgets.begin_setup(id);
        let mut builder = SetupBuilder::new(id, &mut self.widgets, &mut self.canvases, &mut self.assets);
        let result = call_guarded(id, "build_setup_widget", || tool.build_setup_widget(&mut builder));
        self.widgets.end_setup();
        result?;

        let created = self.widgets.count_owned_by(id);
        debug!("Tool {} built {} setup widget(s)", id, created);
        if created == 0 && self.config.require_setup_widgets {
            // Left in `Registered`: it never receives events.
            return Err(HostError::EmptySetup(id));
        }
        slot.transition(ToolState::SetupBuilt)
    }

    /// Delivers one event to every registered tool.
    ///
    /// Image-scoped events require an image; every other event is delivered
    /// with `None`. `NoEvent` is dropped. Returns how many tools received it.
    pub fn dispatch(&mut self, image: Option<&mut dyn Image>, event: &Event) -> Result<usize, HostError> {
        self.ensure_running()?;
        if matches!(event, Event::NoEvent) {
            trace!("Ignoring NoEvent");
            return Ok(0);
        }
        let image = if event.is_image_scoped() {
            Some(image.ok_or(HostError::MissingImage(event.event_type()))?)
        } else {
            None
        };

        self.bus
            .emit(image, event, &self.context, &mut self.canvases, &mut self.assets)
            .map_err(|err| self.fail(err))
    }

    /// Simulates activating a button.
    pub fn click_button(&mut self, id: WidgetId) -> Result<usize, HostError> {
        self.ensure_running()?;
        self.widgets.require(id, "button")?;
        self.dispatch(None, &Event::ButtonClicked(ButtonClickedEventData { id }))
    }

    /// Simulates dragging a slider to `value`, which becomes its current value.
    pub fn move_slider(&mut self, id: WidgetId, value: i64) -> Result<usize, HostError> {
        self.ensure_running()?;
        self.widgets.set_slider_value(id, value)?;
        self.dispatch(None, &Event::SliderMoved(SliderMovedEventData { id, value }))
    }

    /// Simulates mouse activity at canvas-local `(x, y)`.
    pub fn canvas_mouse(&mut self, id: WidgetId, action: CanvasAction, x: usize, y: usize) -> Result<usize, HostError> {
        self.ensure_running()?;
        let canvas = self
            .canvases
            .get(id)
            .ok_or(HostError::UnknownWidget { kind: "canvas", id })?;
        if !canvas.contains(x, y) {
            return Err(HostError::CanvasPositionOutOfBounds { id, x, y });
        }
        self.dispatch(None, &action.into_event(CanvasEventData { id, x, y }))
    }

    /// Snapshot of the toolbars of every live tool.
    pub fn toolbar(&self) -> Result<Toolbar, HostError> {
        self.ensure_running()?;
        Ok(Toolbar::build(&self.bus, &self.widgets))
    }

    /// Drops every registered tool and closes the session.
    ///
    /// Returns how many tools were destroyed; a second call destroys none.
    pub fn shutdown(&mut self) -> usize {
        if self.status == SessionStatus::Closed {
            return 0;
        }
        let destroyed = self.bus.destroy_all();
        self.status = SessionStatus::Closed;
        info!("Session {} shut down, destroyed {} tool(s)", self.session, destroyed);
        destroyed
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        self.shutdown();
    }
}
