//! Size resolution: the floor pass and the collocate pass.
//!
//! Both passes read the division tree and write side tables keyed by
//! [`DivisionId`]; neither mutates the divisions themselves.
//!
//! 1. [`calc_floors`] walks the tree bottom-up and records, for each
//!    division, the smallest extent its content needs (children floors,
//!    measured content for `fit`, margins).
//! 2. [`Collocator::run`] walks top-down, turns weights, percents and bounds
//!    into pixel rectangles and pushes them to the host elements.

mod collocate;
mod distribute;
mod dock;
mod floor;
mod grid;

pub use collocate::Collocator;
pub use distribute::{Bounds, assign_spans, distribute};
pub use floor::{FloorTable, calc_floors};
pub use grid::auto_tile;

use trellis_core::alloc::HashMap;
use trellis_core::geometry::{Axis, Rect};

use crate::division::DivisionId;
use crate::tree::DivisionTree;

/// What a splitter bar resizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitterTarget {
    /// A splitter division between two siblings.
    Splitter(DivisionId),
    /// The bar on the inner edge of a dock pane.
    DockPane(DivisionId),
}

/// A splitter bar as laid out by the last collocate pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitterArea {
    pub target: SplitterTarget,
    pub area: Rect<i32>,
    /// Axis the bar moves along.
    pub axis: Axis,
}

/// Output of a collocate pass.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    /// Full rectangle of every division, including margins.
    pub areas: HashMap<DivisionId, Rect<i32>>,
    /// Splitter bars that are shown, in layout order.
    pub splitters: Vec<SplitterArea>,
}

impl Layout {
    pub fn area(&self, id: DivisionId) -> Option<Rect<i32>> {
        self.areas.get(&id).copied()
    }

    /// Splitter bar under `point`, if any.
    pub fn splitter_at(&self, point: trellis_core::geometry::Pos<i32>) -> Option<SplitterArea> {
        self.splitters
            .iter()
            .rev()
            .find(|s| s.area.contains(point))
            .copied()
    }

    pub fn splitter(&self, target: SplitterTarget) -> Option<SplitterArea> {
        self.splitters.iter().find(|s| s.target == target).copied()
    }
}

/// One displayed slot in an arrange row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Entry {
    pub id: DivisionId,
    pub splitter: bool,
}

/// A splitter is shown only while the leaves on both sides are displayed.
pub(crate) fn splitter_effective(tree: &DivisionTree, id: DivisionId) -> bool {
    let displayed = |leaf: Option<DivisionId>| {
        leaf.and_then(|l| tree.get(l)).is_some_and(|d| d.display)
    };
    let (before, after) = tree.adjacent_leaves(id);
    tree.get(id).is_some_and(|d| d.display) && displayed(before) && displayed(after)
}

/// Displayed children of `owner` in order, with hidden splitters dropped.
pub(crate) fn entries(tree: &DivisionTree, owner: DivisionId) -> Vec<Entry> {
    tree.children(owner)
        .iter()
        .filter_map(|child| {
            let division = tree.get(*child)?;
            if !division.display {
                return None;
            }
            if division.is_splitter() {
                return splitter_effective(tree, *child).then_some(Entry {
                    id: *child,
                    splitter: true,
                });
            }
            Some(Entry {
                id: *child,
                splitter: false,
            })
        })
        .collect()
}
