//! Division nodes: the regions a description is made of.

use bitflags::bitflags;
use trellis_core::alloc::IndexSlot;
use trellis_core::geometry::Axis;

use crate::number::{Margin, Number, RepeatedArray};

/// Generation-checked handle of a division in a [`crate::tree::DivisionTree`].
pub type DivisionId = IndexSlot;

bitflags! {
    /// Which extents a division takes from its content.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Fit: u8 {
        /// Width follows content (`hfit`).
        const HORIZONTAL = 1 << 0;
        /// Height follows content (`vfit`).
        const VERTICAL = 1 << 1;
        /// Both (`fit`).
        const BOTH = Self::HORIZONTAL.bits() | Self::VERTICAL.bits();
    }
}

impl Fit {
    /// Whether the extent along `axis` follows content.
    pub fn along(self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.contains(Fit::HORIZONTAL),
            Axis::Vertical => self.contains(Fit::VERTICAL),
        }
    }
}

/// Edge a dock pane attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DockSide {
    #[default]
    Left,
    Right,
    Top,
    Bottom,
}

impl DockSide {
    /// Axis along which the pane's extent is measured.
    pub fn axis(self) -> Axis {
        match self {
            DockSide::Left | DockSide::Right => Axis::Horizontal,
            DockSide::Top | DockSide::Bottom => Axis::Vertical,
        }
    }

    /// Whether the pane sits at the start of its axis.
    pub fn is_before(self) -> bool {
        matches!(self, DockSide::Left | DockSide::Top)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DockSide::Left => "left",
            DockSide::Right => "right",
            DockSide::Top => "top",
            DockSide::Bottom => "bottom",
        }
    }
}

/// A merged grid cell: `collapse(x,y,w,h)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Collapse {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Collapse {
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// What a division does with its area.
#[derive(Debug, Clone, PartialEq)]
pub enum DivisionKind {
    /// Children side by side along the axis.
    Arrange(Axis),
    /// Cells of a `columns × rows` table; `1 × 1` tiles automatically.
    Grid {
        columns: u32,
        rows: u32,
        collapses: Vec<Collapse>,
    },
    /// Draggable bar between two siblings.
    Splitter,
    /// Only the first displayed child is shown.
    Switchable,
    /// Children are edge-docked panes.
    Dock,
    /// A pane inside a dock, keeping the layout of its own children.
    DockPane(Box<DivisionKind>),
}

impl DivisionKind {
    pub fn is_splitter(&self) -> bool {
        matches!(self, DivisionKind::Splitter)
    }

    pub fn is_dock_pane(&self) -> bool {
        matches!(self, DivisionKind::DockPane(_))
    }

    /// How the children are laid out; a dock pane answers for its content.
    pub fn layout(&self) -> &DivisionKind {
        match self {
            DivisionKind::DockPane(inner) => inner.layout(),
            kind => kind,
        }
    }

    /// Primary axis for child and element placement.
    pub fn axis(&self) -> Axis {
        match self.layout() {
            DivisionKind::Arrange(axis) => *axis,
            _ => Axis::Horizontal,
        }
    }
}

/// One node of the layout tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Division {
    pub name: Option<String>,
    pub kind: DivisionKind,
    pub owner: Option<DivisionId>,
    pub children: Vec<DivisionId>,
    pub next_sibling: Option<DivisionId>,
    /// Extent along the owner's axis.
    pub weight: Number,
    /// Set when the weight was written as `width=` or `height=`.
    pub weight_axis: Option<Axis>,
    pub min_px: Number,
    pub max_px: Number,
    pub margin: Margin,
    pub gap: RepeatedArray,
    pub arrange: RepeatedArray,
    pub fit: Fit,
    /// Per-element measurement limits for `hfit`/`vfit`.
    pub fit_parameters: RepeatedArray,
    pub side: Option<DockSide>,
    pub display: bool,
    pub visible: bool,
}

impl Division {
    pub fn new(kind: DivisionKind) -> Self {
        Self {
            name: None,
            kind,
            owner: None,
            children: Vec::new(),
            next_sibling: None,
            weight: Number::None,
            weight_axis: None,
            min_px: Number::None,
            max_px: Number::None,
            margin: Margin::new(),
            gap: RepeatedArray::new(),
            arrange: RepeatedArray::new(),
            fit: Fit::empty(),
            fit_parameters: RepeatedArray::new(),
            side: None,
            display: true,
            visible: true,
        }
    }

    pub fn splitter() -> Self {
        Self::new(DivisionKind::Splitter)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_splitter(&self) -> bool {
        self.kind.is_splitter()
    }

    /// Hide and undisplay, or display and show.
    pub fn set_display(&mut self, display: bool) {
        self.display = display;
        self.visible = display;
    }

    /// `visible` implies `display`.
    pub fn set_visible(&mut self, visible: bool) {
        if visible {
            self.display = true;
        }
        self.visible = visible;
    }

    /// Turn into a dock pane, undisplayed until an instance docks.
    pub fn make_pane(&mut self) {
        if !self.kind.is_dock_pane() {
            let content = std::mem::replace(&mut self.kind, DivisionKind::Splitter);
            self.kind = DivisionKind::DockPane(Box::new(content));
        }
        self.set_display(false);
    }

    pub fn dock_side(&self) -> DockSide {
        self.side.unwrap_or_default()
    }

    /// Drop `min`/`max` values that cannot hold, then a pixel weight outside
    /// the remaining bounds.
    pub fn normalize_bounds(&mut self) {
        if self.min_px.is_negative() {
            self.min_px.clear();
        }
        if self.max_px.is_negative() {
            self.max_px.clear();
        }
        if !self.min_px.is_percent()
            && !self.max_px.is_percent()
            && !self.min_px.is_none()
            && !self.max_px.is_none()
            && self.min_px.real() > self.max_px.real()
        {
            self.min_px.clear();
            self.max_px.clear();
        }
        if self.weight.is_fixed() {
            let weight = self.weight.real();
            let below = self.min_px.is_fixed() && weight < self.min_px.real();
            let above = self.max_px.is_fixed() && weight > self.max_px.real();
            if below || above || weight < 0.0 {
                self.weight.clear();
                self.weight_axis = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_bounds_discarded() {
        let mut div = Division::new(DivisionKind::Arrange(Axis::Horizontal));
        div.min_px = Number::Integer(-5);
        div.max_px = Number::Integer(40);
        div.normalize_bounds();
        assert!(div.min_px.is_none());
        assert_eq!(div.max_px, Number::Integer(40));
    }

    #[test]
    fn test_inverted_bounds_discard_both() {
        let mut div = Division::new(DivisionKind::Arrange(Axis::Horizontal));
        div.min_px = Number::Integer(50);
        div.max_px = Number::Integer(40);
        div.normalize_bounds();
        assert!(div.min_px.is_none());
        assert!(div.max_px.is_none());
    }

    #[test]
    fn test_weight_outside_bounds_discarded() {
        let mut div = Division::new(DivisionKind::Arrange(Axis::Horizontal));
        div.weight = Number::Integer(10);
        div.min_px = Number::Integer(20);
        div.normalize_bounds();
        assert!(div.weight.is_none());

        div.weight = Number::percent(10.0);
        div.normalize_bounds();
        assert!(div.weight.is_percent());
    }

    #[test]
    fn test_visibility_implies_display() {
        let mut div = Division::new(DivisionKind::Switchable);
        div.set_display(false);
        assert!(!div.visible);
        div.set_visible(true);
        assert!(div.display);
    }

    #[test]
    fn test_pane_keeps_content_layout() {
        let mut div = Division::new(DivisionKind::Arrange(Axis::Vertical));
        div.make_pane();
        div.make_pane();
        assert_eq!(
            div.kind,
            DivisionKind::DockPane(Box::new(DivisionKind::Arrange(Axis::Vertical)))
        );
        assert_eq!(div.kind.axis(), Axis::Vertical);
        assert!(!div.display);
    }

    #[test]
    fn test_fit_along() {
        assert!(Fit::BOTH.along(Axis::Vertical));
        assert!(Fit::HORIZONTAL.along(Axis::Horizontal));
        assert!(!Fit::HORIZONTAL.along(Axis::Vertical));
    }
}
