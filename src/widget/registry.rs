use std::collections::BTreeMap;

use log::{debug, warn};

use super::{WidgetId, WidgetInfo, WidgetKind, WidgetRect};
use crate::error::{HostError, WidgetError};
use crate::tools::ToolId;

/// All widgets created in a session, plus the setup-phase guard.
///
/// Ids come from one monotonic counter shared by every widget kind, so an id
/// is never reused within a session.
#[derive(Debug)]
pub struct WidgetRegistry {
    next_id: u64,
    widgets: BTreeMap<WidgetId, WidgetInfo>,
    setup_owner: Option<ToolId>,
    max_extent: usize,
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::new(usize::MAX)
    }
}

impl WidgetRegistry {
    pub fn new(max_extent: usize) -> Self {
        Self {
            next_id: 1,
            widgets: BTreeMap::new(),
            setup_owner: None,
            max_extent,
        }
    }

    /// Opens the setup phase for `owner`. Creation is refused outside it.
    pub fn begin_setup(&mut self, owner: ToolId) {
        self.setup_owner = Some(owner);
    }

    /// Closes the setup phase.
    pub fn end_setup(&mut self) {
        self.setup_owner = None;
    }

    /// The tool whose setup phase is currently open.
    pub fn setup_owner(&self) -> Option<ToolId> {
        self.setup_owner
    }

    /// Validates and records a new widget for the tool in its setup phase.
    pub fn create(&mut self, rect: WidgetRect, kind: WidgetKind) -> Result<WidgetId, WidgetError> {
        let owner = self.check(rect, &kind)?;

        let id = WidgetId::from_raw(self.next_id).ok_or(WidgetError::IdsExhausted)?;
        self.next_id = self.next_id.checked_add(1).ok_or(WidgetError::IdsExhausted)?;

        debug!("Tool {} created {} {} at {:?}", owner, kind.name(), id, rect);
        self.widgets.insert(id, WidgetInfo { id, owner, rect, kind });
        Ok(id)
    }

    /// Runs every check `create` would, without recording anything.
    ///
    /// Returns the tool whose setup phase is open.
    pub fn check(&self, rect: WidgetRect, kind: &WidgetKind) -> Result<ToolId, WidgetError> {
        let Some(owner) = self.setup_owner else {
            warn!("Rejected {} creation outside of a setup phase", kind.name());
            return Err(WidgetError::OutsideSetup);
        };
        self.validate(rect, kind)?;
        Ok(owner)
    }

    fn validate(&self, rect: WidgetRect, kind: &WidgetKind) -> Result<(), WidgetError> {
        if rect.w == 0 || rect.h == 0 {
            return Err(WidgetError::EmptyRect { w: rect.w, h: rect.h });
        }
        let extent = rect.w.max(rect.h);
        if extent > self.max_extent {
            return Err(WidgetError::TooLarge {
                extent,
                limit: self.max_extent,
            });
        }
        if let WidgetKind::Slider { min, max, value } = *kind {
            if min > max {
                return Err(WidgetError::EmptyRange { min, max });
            }
            if !(min..=max).contains(&value) {
                return Err(WidgetError::StartOutOfRange {
                    start: value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Looks up any widget by id.
    pub fn get(&self, id: WidgetId) -> Option<&WidgetInfo> {
        self.widgets.get(&id)
    }

    /// Widgets in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &WidgetInfo> {
        self.widgets.values()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Widgets created by `owner`, in creation order.
    pub fn owned_by(&self, owner: ToolId) -> impl Iterator<Item = &WidgetInfo> {
        self.iter().filter(move |info| info.owner == owner)
    }

    pub fn count_owned_by(&self, owner: ToolId) -> usize {
        self.owned_by(owner).count()
    }

    /// The `index`-th widget of the given kind name, in creation order.
    pub fn nth_of_kind(&self, kind: &str, index: usize) -> Option<&WidgetInfo> {
        self.iter().filter(|info| info.kind.name() == kind).nth(index)
    }

    /// The first button whose text equals `text`.
    pub fn find_button(&self, text: &str) -> Option<&WidgetInfo> {
        self.iter()
            .find(|info| matches!(&info.kind, WidgetKind::Button { text: t } if t == text))
    }

    /// Looks up a widget and checks it is of the given kind.
    pub fn require(&self, id: WidgetId, kind: &'static str) -> Result<&WidgetInfo, HostError> {
        self.get(id)
            .filter(|info| info.kind.name() == kind)
            .ok_or(HostError::UnknownWidget { kind, id })
    }

    /// Stores a new value for a slider after checking its range.
    pub fn set_slider_value(&mut self, id: WidgetId, new_value: i64) -> Result<(), HostError> {
        let info = self
            .widgets
            .get_mut(&id)
            .ok_or(HostError::UnknownWidget { kind: "slider", id })?;
        match &mut info.kind {
            WidgetKind::Slider { min, max, value } => {
                if !(*min..=*max).contains(&new_value) {
                    return Err(HostError::SliderOutOfRange {
                        id,
                        value: new_value,
                        min: *min,
                        max: *max,
                    });
                }
                *value = new_value;
                Ok(())
            }
            _ => Err(HostError::UnknownWidget { kind: "slider", id }),
        }
    }

    /// Current value of a slider, `None` for other widgets.
    pub fn slider_value(&self, id: WidgetId) -> Option<i64> {
        match self.get(id)?.kind {
            WidgetKind::Slider { value, .. } => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(text: &str) -> WidgetKind {
        WidgetKind::Button {
            text: text.to_string(),
        }
    }

    fn rect() -> WidgetRect {
        WidgetRect::new(0, 0, 10, 10)
    }

    #[test]
    fn test_no_id_outside_setup() {
        let mut registry = WidgetRegistry::default();
        assert_eq!(registry.create(rect(), button("a")), Err(WidgetError::OutsideSetup));

        registry.begin_setup(ToolId(1));
        assert!(registry.create(rect(), button("a")).is_ok());
        registry.end_setup();

        assert_eq!(registry.create(rect(), WidgetKind::Canvas), Err(WidgetError::OutsideSetup));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_ids_are_nonzero_and_unique() {
        let mut registry = WidgetRegistry::default();
        registry.begin_setup(ToolId(1));
        let mut ids = Vec::new();
        for i in 0..20 {
            let kind = match i % 3 {
                0 => button("b"),
                1 => WidgetKind::Label { text: "l".into() },
                _ => WidgetKind::Canvas,
            };
            ids.push(registry.create(rect(), kind).unwrap());
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
        assert!(ids.iter().all(|id| id.raw() != 0));
    }

    #[test]
    fn test_invalid_geometry_and_ranges() {
        let mut registry = WidgetRegistry::new(100);
        registry.begin_setup(ToolId(1));
        assert_eq!(
            registry.create(WidgetRect::new(0, 0, 0, 5), button("x")),
            Err(WidgetError::EmptyRect { w: 0, h: 5 })
        );
        assert_eq!(
            registry.create(WidgetRect::new(0, 0, 101, 5), WidgetKind::Canvas),
            Err(WidgetError::TooLarge {
                extent: 101,
                limit: 100
            })
        );
        assert_eq!(
            registry.create(rect(), WidgetKind::Slider { min: 5, max: 1, value: 3 }),
            Err(WidgetError::EmptyRange { min: 5, max: 1 })
        );
        assert_eq!(
            registry.create(rect(), WidgetKind::Slider { min: 0, max: 10, value: 11 }),
            Err(WidgetError::StartOutOfRange {
                start: 11,
                min: 0,
                max: 10
            })
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_slider_value_updates() {
        let mut registry = WidgetRegistry::default();
        registry.begin_setup(ToolId(2));
        let id = registry
            .create(rect(), WidgetKind::Slider { min: 0, max: 10, value: 5 })
            .unwrap();
        registry.end_setup();

        registry.set_slider_value(id, 8).unwrap();
        assert_eq!(registry.slider_value(id), Some(8));
        assert!(matches!(
            registry.set_slider_value(id, 11),
            Err(HostError::SliderOutOfRange { value: 11, .. })
        ));
        assert_eq!(registry.slider_value(id), Some(8));
    }

    #[test]
    fn test_lookup_helpers() {
        let mut registry = WidgetRegistry::default();
        registry.begin_setup(ToolId(1));
        registry.create(rect(), button("one")).unwrap();
        registry.begin_setup(ToolId(2));
        let two = registry.create(rect(), button("two")).unwrap();
        registry.create(rect(), WidgetKind::Canvas).unwrap();
        registry.end_setup();

        assert_eq!(registry.find_button("two").map(|info| info.id), Some(two));
        assert_eq!(registry.count_owned_by(ToolId(2)), 2);
        assert_eq!(registry.nth_of_kind("button", 1).map(|info| info.id), Some(two));
        assert!(registry.nth_of_kind("canvas", 1).is_none());
        assert!(registry.require(two, "canvas").is_err());
        assert!(registry.require(two, "button").is_ok());
    }
}
