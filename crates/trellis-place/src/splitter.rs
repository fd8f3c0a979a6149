//! Splitter drag state machine.
//!
//! A press on a splitter bar starts a pending drag; it becomes active once
//! the pointer has moved past the configured threshold along the bar's axis.
//! The sizes and bounds of the affected divisions are captured at press time
//! so every move resolves against the same starting point.

use trellis_core::geometry::{Axis, Pos, Rect};

use crate::division::{DivisionId, DockSide};
use crate::solver::SplitterTarget;

/// Interaction state of one splitter bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitterState {
    #[default]
    Idle,
    /// Pointer is down on the bar, threshold not yet exceeded.
    Pressed,
    Dragging,
}

/// What the splitter renderer receives for each visible bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitterVisual {
    pub area: Rect<i32>,
    pub axis: Axis,
    pub state: SplitterState,
    /// The bar resizes a dock pane rather than two siblings.
    pub dock: bool,
}

/// Size limits of one side of a drag, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for LeafBounds {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: f64::INFINITY,
        }
    }
}

impl LeafBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp a size to the bounds; the minimum wins when they cross.
    pub fn clamp(&self, size: f64) -> f64 {
        let mut result = size.min(self.max);
        result = result.max(self.min);
        result
    }
}

/// Sizes captured when the pointer went down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Capture {
    /// Two leaves on either side of a splitter division.
    Pair {
        left: DivisionId,
        right: DivisionId,
        left_size: f64,
        right_size: f64,
        left_bounds: LeafBounds,
        right_bounds: LeafBounds,
        /// Along-axis length of the owner's margin area; percents resolve
        /// against it.
        owner_length: i32,
    },
    /// A dock pane and its edge.
    Pane {
        pane: DivisionId,
        side: DockSide,
        extent: i32,
        bounds: LeafBounds,
    },
}

/// State of an ongoing splitter drag.
#[derive(Debug, Clone)]
pub struct DragState {
    pub target: SplitterTarget,
    pub axis: Axis,
    pub start_pos: Pos<i32>,
    pub current_pos: Pos<i32>,
    /// Bar rectangle at press time.
    pub origin: Rect<i32>,
    pub capture: Capture,
    /// Whether the drag threshold has been exceeded.
    pub is_active: bool,
}

impl DragState {
    pub fn new(
        target: SplitterTarget,
        axis: Axis,
        start_pos: Pos<i32>,
        origin: Rect<i32>,
        capture: Capture,
    ) -> Self {
        Self {
            target,
            axis,
            start_pos,
            current_pos: start_pos,
            origin,
            capture,
            is_active: false,
        }
    }

    /// Pointer travel along the bar's axis.
    pub fn delta(&self) -> i32 {
        match self.axis {
            Axis::Horizontal => self.current_pos.x - self.start_pos.x,
            Axis::Vertical => self.current_pos.y - self.start_pos.y,
        }
    }

    fn update(&mut self, pos: Pos<i32>, threshold: u32) {
        self.current_pos = pos;
        if !self.is_active && self.delta().unsigned_abs() >= threshold {
            self.is_active = true;
        }
    }

    pub fn state(&self) -> SplitterState {
        if self.is_active {
            SplitterState::Dragging
        } else {
            SplitterState::Pressed
        }
    }
}

/// Holds the single drag that may be in progress.
#[derive(Debug, Default)]
pub struct DragManager {
    drag_state: Option<DragState>,
    threshold: u32,
}

impl DragManager {
    pub fn new(threshold: u32) -> Self {
        Self {
            drag_state: None,
            threshold,
        }
    }

    pub fn start(&mut self, state: DragState) {
        self.drag_state = Some(state);
    }

    /// Record a pointer move. Returns true if a drag is in progress.
    pub fn update(&mut self, pos: Pos<i32>) -> bool {
        let threshold = self.threshold;
        if let Some(state) = self.drag_state.as_mut() {
            state.update(pos, threshold);
            true
        } else {
            false
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_state.as_ref().is_some_and(|s| s.is_active)
    }

    /// Pointer is down on a bar but has not moved far enough yet.
    pub fn has_pending_drag(&self) -> bool {
        self.drag_state.as_ref().is_some_and(|s| !s.is_active)
    }

    pub fn drag_state(&self) -> Option<&DragState> {
        self.drag_state.as_ref()
    }

    pub fn cancel_drag(&mut self) {
        self.drag_state = None;
    }

    pub fn end_drag(&mut self) -> Option<DragState> {
        self.drag_state.take()
    }

    /// Interaction state of the bar resizing `target`.
    pub fn state_of(&self, target: SplitterTarget) -> SplitterState {
        self.drag_state
            .as_ref()
            .filter(|s| s.target == target)
            .map(DragState::state)
            .unwrap_or_default()
    }
}

/// New sizes of a splitter's two leaves after moving the bar by `delta`.
///
/// The pair total is preserved. The left size is limited by both leaves'
/// bounds; minimums win over maximums.
pub fn split_sizes(
    left_size: f64,
    right_size: f64,
    left: LeafBounds,
    right: LeafBounds,
    delta: i32,
) -> (f64, f64) {
    let total = left_size + right_size;
    let low = left.min.max(total - right.max);
    let high = left.max.min(total - right.min);
    let mut size = (left_size + delta as f64).min(high).max(low);
    size = size.clamp(0.0, total.max(0.0));
    (size, total - size)
}

/// New extent of a dock pane after moving its bar by `delta`.
pub fn pane_extent(side: DockSide, extent: i32, bounds: LeafBounds, delta: i32) -> i32 {
    let moved = if side.is_before() {
        extent + delta
    } else {
        extent - delta
    };
    (bounds.clamp(moved as f64).round() as i32).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::alloc::IndexSlot;

    fn target() -> SplitterTarget {
        SplitterTarget::Splitter(IndexSlot::new(1, 0))
    }

    fn pressed(threshold: u32) -> DragManager {
        let mut manager = DragManager::new(threshold);
        let capture = Capture::Pane {
            pane: IndexSlot::new(1, 1),
            side: DockSide::Left,
            extent: 100,
            bounds: LeafBounds::default(),
        };
        manager.start(DragState::new(
            target(),
            Axis::Horizontal,
            Pos::new(100, 10),
            Rect::new(98, 0, 4, 50),
            capture,
        ));
        manager
    }

    #[test]
    fn test_threshold_activates_drag() {
        let mut manager = pressed(5);
        assert!(manager.has_pending_drag());
        assert_eq!(manager.state_of(target()), SplitterState::Pressed);

        manager.update(Pos::new(103, 40));
        assert!(!manager.is_dragging());

        manager.update(Pos::new(106, 10));
        assert!(manager.is_dragging());
        assert_eq!(manager.state_of(target()), SplitterState::Dragging);
        assert_eq!(manager.drag_state().map(DragState::delta), Some(6));

        let ended = manager.end_drag().expect("drag");
        assert!(ended.is_active);
        assert_eq!(manager.state_of(target()), SplitterState::Idle);
    }

    #[test]
    fn test_zero_threshold_is_immediate() {
        let mut manager = pressed(0);
        manager.update(Pos::new(100, 10));
        assert!(manager.is_dragging());
    }

    #[test]
    fn test_cancel_drag() {
        let mut manager = pressed(0);
        manager.cancel_drag();
        assert!(!manager.update(Pos::new(0, 0)));
        assert!(manager.drag_state().is_none());
    }

    #[test]
    fn test_split_sizes_respects_bounds() {
        let free = LeafBounds::default();
        assert_eq!(split_sizes(100.0, 100.0, free, free, 30), (130.0, 70.0));

        let left = LeafBounds::new(80.0, f64::INFINITY);
        assert_eq!(split_sizes(100.0, 100.0, left, free, -50), (80.0, 120.0));

        let right = LeafBounds::new(0.0, 150.0);
        assert_eq!(split_sizes(100.0, 100.0, free, right, -80), (50.0, 150.0));

        assert_eq!(split_sizes(100.0, 100.0, free, free, 500), (200.0, 0.0));
    }

    #[test]
    fn test_pane_extent_follows_side() {
        let bounds = LeafBounds::new(20.0, 200.0);
        assert_eq!(pane_extent(DockSide::Left, 100, bounds, 30), 130);
        assert_eq!(pane_extent(DockSide::Right, 100, bounds, 30), 70);
        assert_eq!(pane_extent(DockSide::Top, 100, bounds, -95), 20);
        assert_eq!(pane_extent(DockSide::Bottom, 100, bounds, -300), 200);
    }
}
