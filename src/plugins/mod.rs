//! Built-in plugin module.
//!
//! [`BasicModule`] is what the `paint-session` binary loads. Its tools use
//! nothing but the public plugin contract, so they double as a reference for
//! third-party modules.

mod eyedropper;
mod invert;
mod pencil;

use log::warn;

pub use eyedropper::Eyedropper;
pub use invert::Invert;
pub use pencil::Pencil;

use crate::tools::{PluginModule, Registrar};

pub struct BasicModule;

impl PluginModule for BasicModule {
    fn name(&self) -> &str {
        "basic"
    }

    fn init_module(&self, registrar: &mut Registrar<'_>) {
        if let Err(err) = registrar.add_tool(Box::new(Pencil::new())) {
            warn!("Pencil not registered: {}", err);
        }
        if let Err(err) = registrar.add_tool(Box::new(Eyedropper::new())) {
            warn!("Eyedropper not registered: {}", err);
        }
        if let Err(err) = registrar.add_filter(Box::new(Invert::new())) {
            warn!("Invert not registered: {}", err);
        }
    }
}
