//! Dock registrations and the float/dock protocol.
//!
//! A [`Dock`] is keyed by the name of a dock pane and outlives the division
//! tree: after every `div`/`modify` it is re-attached to whatever pane now
//! carries that name. Pane elements are made on demand by named factories.

use indexmap::IndexMap;
use tracing::debug;
use trellis_core::geometry::{Pos, Rect, Size};
use trellis_core::host::{ContainerId, ElementId, Host, HostError};

use crate::division::DivisionId;
use crate::tree::DivisionTree;

/// Notifications a floating or docked pane sends back to its layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockEvent {
    /// Detach the pane into a floating container.
    Float,
    /// Put a floating pane back into the layout.
    Dock,
    /// The floating container is being dragged; `pointer` is in client
    /// coordinates of the bound window.
    Move { pointer: Pos<i32> },
    /// The floating container drag ended.
    MoveStopped,
    /// The pane asks to be removed. Handled at the next collocate.
    RequestClose,
}

/// Manufactures one pane element inside the bound window.
pub type PaneFactory = Box<dyn FnMut(&mut dyn Host) -> Result<ElementId, HostError>>;

/// One named dock pane with its factories and live instances.
#[derive(Default)]
pub struct Dock {
    pane: Option<DivisionId>,
    factories: IndexMap<String, PaneFactory>,
    instances: Vec<ElementId>,
    container: Option<ContainerId>,
    indicator: bool,
    /// Where the pane sat before it was floated.
    home: Option<Rect<i32>>,
}

impl std::fmt::Debug for Dock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dock")
            .field("pane", &self.pane)
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .field("instances", &self.instances)
            .field("container", &self.container)
            .finish()
    }
}

impl Dock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pane(&self) -> Option<DivisionId> {
        self.pane
    }

    pub fn instances(&self) -> &[ElementId] {
        &self.instances
    }

    pub fn is_floating(&self) -> bool {
        self.container.is_some()
    }

    pub fn container(&self) -> Option<ContainerId> {
        self.container
    }

    pub fn has_factory(&self, factory_name: &str) -> bool {
        self.factories.contains_key(factory_name)
    }

    pub fn register(&mut self, factory_name: &str, factory: PaneFactory) {
        self.factories.insert(factory_name.to_string(), factory);
    }

    /// Bind to the pane named `name` in a freshly built tree. A pane that
    /// already has docked instances is displayed again.
    pub fn attach(&mut self, tree: &mut DivisionTree, name: &str) {
        self.pane = tree
            .find(name)
            .filter(|id| tree.get(*id).is_some_and(|d| d.kind.is_dock_pane()));
        let active = !self.instances.is_empty() && !self.is_floating();
        if let Some(division) = self.pane.and_then(|id| tree.get_mut(id)) {
            division.set_display(active);
        }
    }

    /// Run the factory `factory_name` and keep the element it returns.
    pub fn create(
        &mut self,
        factory_name: &str,
        host: &mut dyn Host,
    ) -> Option<Result<ElementId, HostError>> {
        let factory = self.factories.get_mut(factory_name)?;
        let result = factory(host);
        if let Ok(element) = result {
            self.instances.push(element);
        }
        Some(result)
    }

    /// Detach into a new floating container at the pane's old position.
    /// Returns false when already floating.
    pub fn float(
        &mut self,
        host: &mut dyn Host,
        home: Rect<i32>,
        size: Size<u32>,
    ) -> Result<bool, HostError> {
        if self.is_floating() {
            return Ok(false);
        }
        let area = Rect::new(home.x, home.y, size.width as i32, size.height as i32);
        let container = host.create_float_container(area)?;
        for element in &self.instances {
            host.reparent(*element, Some(container));
            host.move_element(*element, Rect::from_size(size));
            host.show_element(*element, true);
        }
        debug!(?container, ?home, "pane floated");
        self.container = Some(container);
        self.home = Some(home);
        Ok(true)
    }

    /// Re-attach a floating pane. Returns false when it was not floating.
    pub fn redock(&mut self, host: &mut dyn Host) -> bool {
        let Some(container) = self.container.take() else {
            return false;
        };
        for element in &self.instances {
            host.reparent(*element, None);
        }
        host.destroy_float_container(container);
        self.hide_indicator(host);
        self.home = None;
        debug!(?container, "pane docked");
        true
    }

    /// Show the docking indicator while `pointer` is over the pane's home.
    pub fn track(&mut self, host: &mut dyn Host, pointer: Pos<i32>) {
        let Some(home) = self.home.filter(|_| self.is_floating()) else {
            return;
        };
        let over = home.contains(pointer);
        if over != self.indicator {
            host.show_dock_indicator(over.then_some(home));
            self.indicator = over;
        }
    }

    /// Whether a drag that stops now should re-dock.
    pub fn indicator_shown(&self) -> bool {
        self.indicator
    }

    fn hide_indicator(&mut self, host: &mut dyn Host) {
        if self.indicator {
            host.show_dock_indicator(None);
            self.indicator = false;
        }
    }

    /// Destroy every instance and the floating container.
    pub fn close(&mut self, host: &mut dyn Host) {
        self.hide_indicator(host);
        for element in self.instances.drain(..) {
            host.destroy_element(element);
        }
        if let Some(container) = self.container.take() {
            host.destroy_float_container(container);
        }
        self.home = None;
    }

    /// Forget an element the host destroyed. Returns true if it was ours.
    pub fn remove_instance(&mut self, element: ElementId) -> bool {
        let before = self.instances.len();
        self.instances.retain(|e| *e != element);
        self.instances.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_test_utils::{HostCall, MockHost};

    fn factory_dock(host: &MockHost) -> Dock {
        let mut dock = Dock::new();
        let spawner = host.clone();
        dock.register("panel", Box::new(move |_: &mut dyn Host| Ok(spawner.spawn_child())));
        dock
    }

    #[test]
    fn test_create_keeps_instance() {
        let mut host = MockHost::new(Size::new(200, 100));
        let mut dock = factory_dock(&host);
        let element = dock.create("panel", &mut host).expect("factory").expect("element");
        assert_eq!(dock.instances(), &[element]);
        assert!(dock.create("missing", &mut host).is_none());
    }

    #[test]
    fn test_failing_factory_leaves_no_instance() {
        let mut host = MockHost::new(Size::new(200, 100));
        let mut dock = Dock::new();
        dock.register("broken", Box::new(|_: &mut dyn Host| Err(HostError::new("no pane"))));
        let result = dock.create("broken", &mut host).expect("factory");
        assert!(result.is_err());
        assert!(dock.instances().is_empty());
    }

    #[test]
    fn test_float_track_redock() {
        let mut host = MockHost::new(Size::new(200, 100));
        let mut dock = factory_dock(&host);
        let element = dock.create("panel", &mut host).expect("factory").expect("element");
        let home = Rect::new(0, 0, 50, 100);

        assert!(dock.float(&mut host, home, Size::new(320, 240)).expect("float"));
        assert!(!dock.float(&mut host, home, Size::new(320, 240)).expect("float"));
        let container = dock.container().expect("container");
        assert_eq!(host.parent_of(element), Some(container));

        dock.track(&mut host, Pos::new(10, 10));
        assert!(dock.indicator_shown());
        assert_eq!(host.indicator(), Some(home));
        dock.track(&mut host, Pos::new(150, 10));
        assert!(!dock.indicator_shown());
        assert_eq!(host.indicator(), None);

        dock.track(&mut host, Pos::new(10, 10));
        assert!(dock.redock(&mut host));
        assert_eq!(host.parent_of(element), None);
        assert!(host.containers().is_empty());
        assert_eq!(host.indicator(), None);
        assert!(!dock.redock(&mut host));
    }

    #[test]
    fn test_close_destroys_everything() {
        let mut host = MockHost::new(Size::new(200, 100));
        let mut dock = factory_dock(&host);
        let element = dock.create("panel", &mut host).expect("factory").expect("element");
        dock.float(&mut host, Rect::new(0, 0, 50, 100), Size::new(100, 100))
            .expect("float");
        host.clear_calls();

        dock.close(&mut host);
        assert!(dock.instances().is_empty());
        assert!(!dock.is_floating());
        assert!(host.was_destroyed(element));
        assert!(
            host.calls()
                .iter()
                .any(|c| matches!(c, HostCall::DestroyContainer(_)))
        );
    }
}
