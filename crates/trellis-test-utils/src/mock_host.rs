//! Mock implementation of [`Host`] for testing.
//!
//! Records every call the layout engine makes and keeps enough window state
//! (child set, element rectangles, visibility, floating containers) for tests
//! to assert on the outcome of a layout pass.

use std::sync::Arc;

use parking_lot::Mutex;
use trellis_core::alloc::{HashMap, HashSet};
use trellis_core::geometry::{Rect, Size};
use trellis_core::host::{ContainerId, ElementId, Host, HostError, MeasureRequest};

/// Records a host operation for verification in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Move {
        element: ElementId,
        area: Rect<i32>,
    },
    Show {
        element: ElementId,
        visible: bool,
    },
    CreateLabel {
        element: ElementId,
        text: String,
    },
    Destroy(ElementId),
    CapturePointer,
    ReleasePointer,
    CreateContainer {
        container: ContainerId,
        area: Rect<i32>,
    },
    DestroyContainer(ContainerId),
    Reparent {
        element: ElementId,
        container: Option<ContainerId>,
    },
    DockIndicator(Option<Rect<i32>>),
}

#[derive(Debug, Default)]
struct MockState {
    size: Size<u32>,
    next_id: u64,
    children: HashSet<ElementId>,
    areas: HashMap<ElementId, Rect<i32>>,
    visible: HashMap<ElementId, bool>,
    measurements: HashMap<ElementId, Size<u32>>,
    labels: HashMap<ElementId, String>,
    destroyed: HashSet<ElementId>,
    containers: HashMap<ContainerId, Rect<i32>>,
    parents: HashMap<ElementId, ContainerId>,
    indicator: Option<Rect<i32>>,
    captured: bool,
    destroying: bool,
    fail_labels: bool,
    fail_containers: bool,
    calls: Vec<HostCall>,
}

impl MockState {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Recording host window.
///
/// # Interior Mutability
///
/// Host methods that only read (`client_size`, `measure`) take `&self`, but the
/// test also needs to inspect the recording while the engine owns its own
/// boxed clone. All state lives in one `Arc<Mutex<_>>`; `parking_lot::Mutex`
/// keeps the lock cheap and never poisons a failing test.
#[derive(Debug, Clone, Default)]
pub struct MockHost {
    state: Arc<Mutex<MockState>>,
}

impl MockHost {
    /// Create a mock window with the given client size.
    pub fn new(size: Size<u32>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                size,
                ..MockState::default()
            })),
        }
    }

    /// Create a child element of the mock window.
    pub fn spawn_child(&self) -> ElementId {
        let mut state = self.state.lock();
        let element = ElementId(state.allocate());
        state.children.insert(element);
        element
    }

    /// Create an element that belongs to some other window.
    pub fn spawn_foreign(&self) -> ElementId {
        ElementId(self.state.lock().allocate())
    }

    /// Change the client size reported to the engine.
    pub fn set_client_size(&self, size: Size<u32>) {
        self.state.lock().size = size;
    }

    /// Give an element an intrinsic content size.
    pub fn set_measure(&self, element: ElementId, size: Size<u32>) {
        self.state.lock().measurements.insert(element, size);
    }

    /// Simulate window teardown.
    pub fn set_destroying(&self, destroying: bool) {
        self.state.lock().destroying = destroying;
    }

    /// Make every following `create_label` call fail.
    pub fn fail_labels(&self, fail: bool) {
        self.state.lock().fail_labels = fail;
    }

    /// Make every following `create_float_container` call fail.
    pub fn fail_containers(&self, fail: bool) {
        self.state.lock().fail_containers = fail;
    }

    /// Last rectangle an element was moved to.
    pub fn area_of(&self, element: ElementId) -> Option<Rect<i32>> {
        self.state.lock().areas.get(&element).copied()
    }

    /// Last visibility an element was given.
    pub fn is_visible(&self, element: ElementId) -> Option<bool> {
        self.state.lock().visible.get(&element).copied()
    }

    /// Text of a label the engine created.
    pub fn label_text(&self, element: ElementId) -> Option<String> {
        self.state.lock().labels.get(&element).cloned()
    }

    /// Whether the engine destroyed `element`.
    pub fn was_destroyed(&self, element: ElementId) -> bool {
        self.state.lock().destroyed.contains(&element)
    }

    /// Whether the pointer is currently captured.
    pub fn is_captured(&self) -> bool {
        self.state.lock().captured
    }

    /// Current docking indicator rectangle, if shown.
    pub fn indicator(&self) -> Option<Rect<i32>> {
        self.state.lock().indicator
    }

    /// Live floating containers.
    pub fn containers(&self) -> Vec<ContainerId> {
        let mut containers: Vec<_> = self.state.lock().containers.keys().copied().collect();
        containers.sort();
        containers
    }

    /// Floating container currently holding `element`.
    pub fn parent_of(&self, element: ElementId) -> Option<ContainerId> {
        self.state.lock().parents.get(&element).copied()
    }

    /// Every recorded call, oldest first.
    pub fn calls(&self) -> Vec<HostCall> {
        self.state.lock().calls.clone()
    }

    /// Number of `move_element` calls recorded.
    pub fn count_moves(&self) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| matches!(call, HostCall::Move { .. }))
            .count()
    }

    /// Forget recorded calls while keeping window state.
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }
}

impl Host for MockHost {
    fn client_size(&self) -> Size<u32> {
        self.state.lock().size
    }

    fn is_child(&self, element: ElementId) -> bool {
        self.state.lock().children.contains(&element)
    }

    fn move_element(&mut self, element: ElementId, area: Rect<i32>) {
        let mut state = self.state.lock();
        state.areas.insert(element, area);
        state.calls.push(HostCall::Move { element, area });
    }

    fn show_element(&mut self, element: ElementId, visible: bool) {
        let mut state = self.state.lock();
        state.visible.insert(element, visible);
        state.calls.push(HostCall::Show { element, visible });
    }

    fn measure(
        &self,
        element: ElementId,
        _limit: Option<u32>,
        _request: MeasureRequest,
    ) -> Option<Size<u32>> {
        self.state.lock().measurements.get(&element).copied()
    }

    fn create_label(&mut self, text: &str) -> Result<ElementId, HostError> {
        let mut state = self.state.lock();
        if state.fail_labels {
            return Err(HostError::new("label creation refused"));
        }
        let element = ElementId(state.allocate());
        state.children.insert(element);
        state.labels.insert(element, text.to_string());
        state.calls.push(HostCall::CreateLabel {
            element,
            text: text.to_string(),
        });
        Ok(element)
    }

    fn destroy_element(&mut self, element: ElementId) {
        let mut state = self.state.lock();
        state.children.remove(&element);
        state.destroyed.insert(element);
        state.calls.push(HostCall::Destroy(element));
    }

    fn capture_pointer(&mut self) {
        let mut state = self.state.lock();
        state.captured = true;
        state.calls.push(HostCall::CapturePointer);
    }

    fn release_pointer(&mut self) {
        let mut state = self.state.lock();
        state.captured = false;
        state.calls.push(HostCall::ReleasePointer);
    }

    fn is_destroying(&self) -> bool {
        self.state.lock().destroying
    }

    fn create_float_container(&mut self, area: Rect<i32>) -> Result<ContainerId, HostError> {
        let mut state = self.state.lock();
        if state.fail_containers {
            return Err(HostError::new("container creation refused"));
        }
        let container = ContainerId(state.allocate());
        state.containers.insert(container, area);
        state.calls.push(HostCall::CreateContainer { container, area });
        Ok(container)
    }

    fn destroy_float_container(&mut self, container: ContainerId) {
        let mut state = self.state.lock();
        state.containers.remove(&container);
        state.parents.retain(|_, parent| *parent != container);
        state.calls.push(HostCall::DestroyContainer(container));
    }

    fn reparent(&mut self, element: ElementId, container: Option<ContainerId>) {
        let mut state = self.state.lock();
        match container {
            Some(container) => {
                state.parents.insert(element, container);
            }
            None => {
                state.parents.remove(&element);
            }
        }
        state.calls.push(HostCall::Reparent { element, container });
    }

    fn show_dock_indicator(&mut self, area: Option<Rect<i32>>) {
        let mut state = self.state.lock();
        state.indicator = area;
        state.calls.push(HostCall::DockIndicator(area));
    }
}
