use trellis_core::geometry::{Axis, Rect};

use super::collocate::Collocator;
use super::{SplitterArea, SplitterTarget};
use crate::division::{Division, DivisionId, DockSide};

impl Collocator<'_> {
    /// Edge layout: left/right panes take columns, then top/bottom panes take
    /// rows of what is left. The dock's own field gets the remaining room.
    pub(super) fn dock(&mut self, id: DivisionId, division: &Division, inner: Rect<i32>, shown: bool) {
        let tree = self.tree;
        let mut room = inner;
        let thickness = self.config.dock_splitter_thickness as i32;

        let mut displayed = Vec::new();
        for pane in tree.children(id) {
            match tree.get(*pane) {
                Some(d) if d.display => displayed.push((*pane, d.dock_side())),
                _ => self.collapse(*pane),
            }
        }
        let horizontal = displayed.iter().filter(|(_, side)| side.axis() == Axis::Horizontal);
        let vertical = displayed.iter().filter(|(_, side)| side.axis() == Axis::Vertical);
        let ordered: Vec<(DivisionId, DockSide)> = horizontal.chain(vertical).copied().collect();

        for (pane, side) in ordered {
            let Some(pane_division) = tree.get(pane) else {
                continue;
            };
            let axis = side.axis();
            let length = inner.length(axis);
            let available = (room.length(axis) - thickness).max(0);
            let extent = self.pane_extent(pane, pane_division, axis, length, available);

            let start = room.start(axis);
            let end = start + room.length(axis);
            let (pane_start, bar_start, room_start) = if side.is_before() {
                (start, start + extent, start + extent + thickness)
            } else {
                (end - extent, end - extent - thickness, start)
            };
            let room_length = (room.length(axis) - extent - thickness).max(0);

            let pane_area = room.with_span(axis, pane_start, extent);
            let bar = room.with_span(axis, bar_start.max(start), thickness.min(room.length(axis)));
            room = room.with_span(axis, room_start.min(end), room_length);

            self.collocate(pane, pane_area, shown);
            if shown {
                self.layout.splitters.push(SplitterArea {
                    target: SplitterTarget::DockPane(pane),
                    area: bar,
                    axis,
                });
            }
        }

        self.place_field(id, division, room, shown);
    }

    /// Pane extent along its edge axis: its weight, or the configured fraction
    /// of the dock, kept within floor, bounds and the room left.
    fn pane_extent(
        &self,
        pane: DivisionId,
        division: &Division,
        axis: Axis,
        length: i32,
        available: i32,
    ) -> i32 {
        let mut extent = match division.weight {
            w if w.is_none() => length as f64 * self.config.default_pane_fraction,
            w => w.get_value(length),
        };
        if let Some(max) = division.max_px.resolve(length) {
            extent = extent.min(max);
        }
        if let Some(min) = division.min_px.resolve(length) {
            extent = extent.max(min);
        }
        extent = extent.max(self.floors.along(pane, axis));
        (extent.round() as i32).clamp(0, available)
    }
}
