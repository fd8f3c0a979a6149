use indexmap::IndexMap;
use tracing::trace;
use trellis_core::alloc::HashMap;
use trellis_core::geometry::{Axis, Size};
use trellis_core::host::{Host, MeasureRequest};
use trellis_core::profiling::profile_function;

use super::entries;
use crate::config::PlaceConfig;
use crate::division::{Division, DivisionId, DivisionKind, Fit};
use crate::field::Field;
use crate::tree::DivisionTree;

pub(crate) fn along(size: Size<f64>, axis: Axis) -> f64 {
    match axis {
        Axis::Horizontal => size.width,
        Axis::Vertical => size.height,
    }
}

pub(crate) fn from_axis(axis: Axis, along: f64, cross: f64) -> Size<f64> {
    match axis {
        Axis::Horizontal => Size::new(along, cross),
        Axis::Vertical => Size::new(cross, along),
    }
}

/// Minimum extents per division, plus the measured content sizes of fitted
/// fields.
#[derive(Debug, Clone, Default)]
pub struct FloorTable {
    floors: HashMap<DivisionId, Size<f64>>,
    fits: HashMap<DivisionId, Vec<Size<u32>>>,
}

impl FloorTable {
    pub fn floor(&self, id: DivisionId) -> Size<f64> {
        self.floors.get(&id).copied().unwrap_or_default()
    }

    pub fn along(&self, id: DivisionId, axis: Axis) -> f64 {
        along(self.floor(id), axis)
    }

    /// Measured sizes of the field elements of a fitted division.
    pub fn fit_extents(&self, id: DivisionId) -> Option<&[Size<u32>]> {
        self.fits.get(&id).map(Vec::as_slice)
    }
}

/// Compute floors for every division reachable from the root.
pub fn calc_floors(
    tree: &DivisionTree,
    fields: &IndexMap<String, Field>,
    host: &dyn Host,
    config: &PlaceConfig,
) -> FloorTable {
    profile_function!();
    let mut pass = FloorPass {
        tree,
        fields,
        host,
        config,
        table: FloorTable::default(),
    };
    if let Some(root) = tree.root() {
        pass.floor(root);
    }
    pass.table
}

struct FloorPass<'a> {
    tree: &'a DivisionTree,
    fields: &'a IndexMap<String, Field>,
    host: &'a dyn Host,
    config: &'a PlaceConfig,
    table: FloorTable,
}

impl FloorPass<'_> {
    fn floor(&mut self, id: DivisionId) -> Size<f64> {
        let tree = self.tree;
        let Some(division) = tree.get(id) else {
            return Size::default();
        };

        // Children first so every descendant has an entry.
        let children: Vec<Size<f64>> = tree
            .children(id)
            .iter()
            .map(|child| (*child, self.floor(*child)))
            .filter(|(child, _)| tree.get(*child).is_some_and(|d| d.display))
            .map(|(_, floor)| floor)
            .collect();

        if !division.display {
            self.table.floors.insert(id, Size::default());
            return Size::default();
        }

        // A dock pane's floor comes from its content layout.
        let mut content = match division.kind.layout() {
            DivisionKind::Arrange(axis) => self.arrange_floor(id, division, *axis),
            DivisionKind::Switchable | DivisionKind::Grid { .. } => {
                children.iter().fold(Size::<f64>::default(), |acc, f| {
                    Size::new(acc.width.max(f.width), acc.height.max(f.height))
                })
            }
            DivisionKind::Dock | DivisionKind::DockPane(_) | DivisionKind::Splitter => {
                Size::default()
            }
        };

        if let Some(fit) = self.fit_floor(id, division) {
            content = Size::new(content.width.max(fit.width), content.height.max(fit.height));
        }

        let (width, height) = division.margin.expand(content.width, content.height);
        let floor = Size::new(width, height);
        trace!(division = ?division.name(), width, height, "floor");
        self.table.floors.insert(id, floor);
        floor
    }

    /// Along: fixed and adjustable children add up, percent children
    /// contribute their largest floor scaled by the percent total. Cross: the
    /// largest child.
    fn arrange_floor(&self, id: DivisionId, division: &Division, axis: Axis) -> Size<f64> {
        let entries = entries(self.tree, id);
        let mut sum = 0.0;
        let mut cross: f64 = 0.0;
        let mut percent_floor: f64 = 0.0;
        let mut percent_total = 0.0;

        for entry in &entries {
            if entry.splitter {
                sum += self.config.splitter_thickness as f64;
                continue;
            }
            let Some(child) = self.tree.get(entry.id) else {
                continue;
            };
            let floor = self.table.floor(entry.id);
            let mut child_along = along(floor, axis);
            if child.min_px.is_fixed() {
                child_along = child_along.max(child.min_px.real());
            }
            cross = cross.max(along(floor, axis.cross()));

            match child.weight {
                w if w.is_percent() => {
                    percent_floor = percent_floor.max(child_along);
                    percent_total += w.real();
                }
                w if w.is_fixed() => sum += child_along.max(w.real()),
                _ => sum += child_along,
            }
        }

        for i in 0..entries.len().saturating_sub(1) {
            let gap = division.gap.at(i);
            if gap.is_fixed() {
                sum += gap.real();
            }
        }

        if percent_total > 0.0 {
            sum += percent_floor / percent_total;
        }

        from_axis(axis, sum, cross)
    }

    /// Measure the division's field elements when it asks for `fit`.
    fn fit_floor(&mut self, id: DivisionId, division: &Division) -> Option<Size<f64>> {
        if division.fit.is_empty() || matches!(division.kind.layout(), DivisionKind::Grid { .. }) {
            return None;
        }
        let fields = self.fields;
        let host = self.host;
        let field = fields.get(division.name()?)?;
        if field.elements().is_empty() {
            return None;
        }

        let request = if division.fit == Fit::BOTH {
            MeasureRequest::Both
        } else if division.fit.contains(Fit::HORIZONTAL) {
            MeasureRequest::Width
        } else {
            MeasureRequest::Height
        };

        let extents: Vec<Size<u32>> = field
            .elements()
            .iter()
            .enumerate()
            .map(|(i, element)| {
                let limit = division.fit_parameters.at(i);
                let limit = limit.is_fixed().then(|| limit.real().max(0.0) as u32);
                host.measure(*element, limit, request)
                    .unwrap_or_default()
            })
            .collect();

        let axis = division.kind.axis();
        let mut sum = 0.0;
        let mut cross: f64 = 0.0;
        for extent in &extents {
            let extent = extent.cast::<f64>();
            sum += along(extent, axis);
            cross = cross.max(along(extent, axis.cross()));
        }

        let mut percent_gaps = 0.0;
        for i in 0..extents.len().saturating_sub(1) {
            let gap = division.gap.at(i);
            if gap.is_percent() {
                percent_gaps += gap.real();
            } else {
                sum += gap.real().max(0.0);
            }
        }
        if percent_gaps > 0.0 && percent_gaps < 1.0 {
            sum /= 1.0 - percent_gaps;
        }

        self.table.fits.insert(id, extents);
        Some(from_axis(axis, sum, cross))
    }
}
