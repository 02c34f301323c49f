//! Lifecycle of a registered tool.
//!
//! ```text
//! Constructed ──register──► Registered ──setup──► SetupBuilt ──dispatch──► Dispatching
//!                                │                    │                        │ ▲
//!                                │                    │                        └─┘
//!                                └────────────────────┴───────shutdown─────────┴──► Destroyed
//! ```
//!
//! `Constructed` belongs to the module that built the tool; the host tracks
//! everything from `Registered` on. `Destroyed` is terminal.

use serde::{Deserialize, Serialize};

use super::{Placement, Tool, ToolId};
use crate::error::HostError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolState {
    Constructed,
    Registered,
    SetupBuilt,
    Dispatching,
    Destroyed,
}

impl ToolState {
    pub fn can_transition_to(self, next: ToolState) -> bool {
        use ToolState::*;
        matches!(
            (self, next),
            (Constructed, Registered)
                | (Registered, SetupBuilt)
                | (SetupBuilt, Dispatching)
                | (Dispatching, Dispatching)
                | (Registered | SetupBuilt | Dispatching, Destroyed)
        )
    }

    /// True once the tool may receive events.
    pub fn accepts_events(self) -> bool {
        matches!(self, Self::SetupBuilt | Self::Dispatching)
    }
}

/// A tool owned by the host, with its registration metadata.
///
/// The icon path and name are read once at registration, so the host never
/// needs to call into a tool outside of setup and dispatch.
pub struct RegisteredTool {
    id: ToolId,
    placement: Placement,
    name: String,
    texture: String,
    state: ToolState,
    tool: Option<Box<dyn Tool>>,
}

impl std::fmt::Debug for RegisteredTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredTool")
            .field("id", &self.id)
            .field("placement", &self.placement)
            .field("name", &self.name)
            .field("texture", &self.texture)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl RegisteredTool {
    pub(crate) fn new(id: ToolId, placement: Placement, tool: Box<dyn Tool>) -> Self {
        Self {
            id,
            placement,
            name: tool.name().to_string(),
            texture: tool.texture().to_string(),
            state: ToolState::Registered,
            tool: Some(tool),
        }
    }

    pub fn id(&self) -> ToolId {
        self.id
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn texture(&self) -> &str {
        &self.texture
    }

    pub fn state(&self) -> ToolState {
        self.state
    }

    pub(crate) fn transition(&mut self, next: ToolState) -> Result<(), HostError> {
        if !self.state.can_transition_to(next) {
            return Err(HostError::InvalidTransition {
                tool: self.id,
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    /// The live tool, unless it has been destroyed.
    pub(crate) fn tool_mut(&mut self) -> Option<&mut (dyn Tool + 'static)> {
        self.tool.as_deref_mut()
    }

    /// Drops the tool. Returns false if it was already gone.
    pub(crate) fn destroy(&mut self) -> bool {
        match self.tool.take() {
            Some(tool) => {
                drop(tool);
                self.state = ToolState::Destroyed;
                true
            }
            None => false,
        }
    }
}
