use serde::Serialize;

use crate::event::EventBus;
use crate::tools::{Placement, ToolId, ToolState};
use crate::widget::{WidgetInfo, WidgetRegistry};

/// One icon on the toolbar together with the widgets of its setup panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolbarEntry {
    pub id: ToolId,
    pub name: String,
    pub texture: String,
    pub state: ToolState,
    pub widgets: Vec<WidgetInfo>,
}

/// What a GUI host needs to lay out its toolbars, in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Toolbar {
    pub tools: Vec<ToolbarEntry>,
    pub filters: Vec<ToolbarEntry>,
}

impl Toolbar {
    pub(crate) fn build(bus: &EventBus, widgets: &WidgetRegistry) -> Self {
        let mut toolbar = Self::default();
        for tool in bus.iter().filter(|tool| tool.state() != ToolState::Destroyed) {
            let entry = ToolbarEntry {
                id: tool.id(),
                name: tool.name().to_string(),
                texture: tool.texture().to_string(),
                state: tool.state(),
                widgets: widgets.owned_by(tool.id()).cloned().collect(),
            };
            match tool.placement() {
                Placement::Tool => toolbar.tools.push(entry),
                Placement::Filter => toolbar.filters.push(entry),
            }
        }
        toolbar
    }

    pub fn entries(&self) -> impl Iterator<Item = &ToolbarEntry> {
        self.tools.iter().chain(self.filters.iter())
    }

    pub fn entry(&self, id: ToolId) -> Option<&ToolbarEntry> {
        self.entries().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.tools.len() + self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
