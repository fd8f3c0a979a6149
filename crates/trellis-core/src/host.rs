//! The host collaborator: the windowing layer that owns the pixel surface and
//! the elements a layout places.
//!
//! The engine never creates, paints or focuses elements on its own. Everything
//! it needs from the window system goes through [`Host`].

use std::fmt;

use crate::geometry::{Rect, Size};

/// Handle of a host-owned element (a child widget or window).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// Handle of a floating container the host created for an undocked pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContainerId(pub u64);

/// Which extent a content measurement should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasureRequest {
    /// Natural width and height, unconstrained.
    Both,
    /// Natural width; the limit (if any) bounds the height.
    Width,
    /// Natural height; the limit (if any) bounds the width.
    Height,
}

/// Failure reported by the host from a callback (label creation, pane
/// factories, container creation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError(pub String);

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "host error: {}", self.0)
    }
}

impl std::error::Error for HostError {}

/// Window-system operations consumed by the layout engine.
///
/// One host is bound to one engine instance. All calls happen on the thread
/// that owns the host window.
pub trait Host {
    /// Current client-area size of the bound window.
    fn client_size(&self) -> Size<u32>;

    /// Whether `element` is a child of the bound window.
    fn is_child(&self, element: ElementId) -> bool;

    /// Move and resize an element.
    fn move_element(&mut self, element: ElementId, area: Rect<i32>);

    /// Show or hide an element.
    fn show_element(&mut self, element: ElementId, visible: bool);

    /// Intrinsic content size of an element, if it has one.
    fn measure(
        &self,
        _element: ElementId,
        _limit: Option<u32>,
        _request: MeasureRequest,
    ) -> Option<Size<u32>> {
        None
    }

    /// Create a label-like child element displaying `text`.
    fn create_label(&mut self, text: &str) -> Result<ElementId, HostError>;

    /// Destroy an element the engine created or was asked to close.
    fn destroy_element(&mut self, element: ElementId);

    /// Route all pointer input to the bound window until released.
    fn capture_pointer(&mut self);

    /// Undo [`Host::capture_pointer`].
    fn release_pointer(&mut self);

    /// True while the bound window is being torn down.
    fn is_destroying(&self) -> bool {
        false
    }

    /// Create a floating container for an undocked pane.
    fn create_float_container(&mut self, area: Rect<i32>) -> Result<ContainerId, HostError>;

    /// Destroy a floating container created by [`Host::create_float_container`].
    fn destroy_float_container(&mut self, container: ContainerId);

    /// Move an element into a floating container, or back into the bound
    /// window when `container` is `None`.
    fn reparent(&mut self, element: ElementId, container: Option<ContainerId>);

    /// Show the docking indicator at `area`, or hide it with `None`.
    fn show_dock_indicator(&mut self, _area: Option<Rect<i32>>) {}
}
