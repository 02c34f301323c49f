use log::{info, warn};

use super::{Placement, RegisteredTool, Tool, ToolId};
use crate::error::RegistrationError;
use crate::event::EventBus;

/// A plugin module: the single entry point the host calls at load time.
///
/// `init_module` may only register tools and filters; the host builds their
/// setup widgets afterwards.
pub trait PluginModule {
    fn name(&self) -> &str;

    fn init_module(&self, registrar: &mut Registrar<'_>);
}

/// A module whose `init_module` is a closure
pub struct FnModule<F> {
    name: String,
    init: F,
}

/// Wraps a closure into a named [`PluginModule`].
pub fn module_fn<F>(name: impl Into<String>, init: F) -> FnModule<F>
where
    F: Fn(&mut Registrar<'_>),
{
    FnModule {
        name: name.into(),
        init,
    }
}

impl<F> PluginModule for FnModule<F>
where
    F: Fn(&mut Registrar<'_>),
{
    fn name(&self) -> &str {
        &self.name
    }

    fn init_module(&self, registrar: &mut Registrar<'_>) {
        (self.init)(registrar)
    }
}

/// Registration sink handed to [`PluginModule::init_module`].
///
/// Registering moves the tool into the host, which drops it at shutdown.
pub struct Registrar<'a> {
    module: &'a str,
    bus: &'a mut EventBus,
    reject_duplicate_textures: bool,
    registered: Vec<ToolId>,
}

impl<'a> Registrar<'a> {
    pub(crate) fn new(module: &'a str, bus: &'a mut EventBus, reject_duplicate_textures: bool) -> Self {
        Self {
            module,
            bus,
            reject_duplicate_textures,
            registered: Vec::new(),
        }
    }

    /// Registers a tool shown on the main toolbar.
    pub fn add_tool(&mut self, tool: Box<dyn Tool>) -> Result<ToolId, RegistrationError> {
        self.register(Placement::Tool, tool)
    }

    /// Registers a tool shown on the filters toolbar.
    pub fn add_filter(&mut self, tool: Box<dyn Tool>) -> Result<ToolId, RegistrationError> {
        self.register(Placement::Filter, tool)
    }

    /// Tools registered through this registrar so far.
    pub fn registered(&self) -> &[ToolId] {
        &self.registered
    }

    pub(crate) fn into_registered(self) -> Vec<ToolId> {
        self.registered
    }

    fn register(&mut self, placement: Placement, tool: Box<dyn Tool>) -> Result<ToolId, RegistrationError> {
        let texture = tool.texture();
        if texture.is_empty() {
            warn!("Module {} tried to register {:?} without a texture", self.module, tool.name());
            return Err(RegistrationError::EmptyTexture {
                name: tool.name().to_string(),
            });
        }
        if self.reject_duplicate_textures {
            if let Some(existing) = self.bus.find_by_texture(texture) {
                warn!("Module {} registered duplicate texture {:?}", self.module, texture);
                return Err(RegistrationError::DuplicateTexture {
                    texture: texture.to_string(),
                    existing: existing.id(),
                });
            }
        }

        let id = self.bus.next_tool_id();
        let registered = RegisteredTool::new(id, placement, tool);
        info!(
            "Module {} registered {:?} {} ({:?}) as {}",
            self.module,
            placement,
            registered.name(),
            registered.texture(),
            id
        );
        self.bus.subscribe(registered);
        self.registered.push(id);
        Ok(id)
    }
}
