mod bus;
mod events;

pub use bus::EventBus;
pub(crate) use bus::{call_guarded, catch_panic};
pub use events::*;
