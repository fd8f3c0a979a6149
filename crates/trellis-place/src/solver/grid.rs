use trellis_core::geometry::Rect;
use trellis_core::host::ElementId;

use super::collocate::Collocator;
use crate::division::{Collapse, Division, DivisionId};

/// Columns and rows for `count` items in an automatic grid.
///
/// The edge is the smallest square that holds them; rows then shrink to
/// what is actually used.
pub fn auto_tile(count: usize) -> (u32, u32) {
    let edge = match count {
        0 | 1 => 1,
        2..=4 => 2,
        n => (n as f64).sqrt().ceil() as usize,
    };
    let rows = count.div_ceil(edge).max(1);
    (edge as u32, rows as u32)
}

#[derive(Debug, Clone, Copy)]
enum Item {
    Division(DivisionId),
    Element(ElementId),
}

impl Collocator<'_> {
    pub(super) fn grid(
        &mut self,
        id: DivisionId,
        division: &Division,
        inner: Rect<i32>,
        dimension: (u32, u32),
        collapses: &[Collapse],
        shown: bool,
    ) {
        let tree = self.tree;
        let fields = self.fields;

        let mut items = Vec::new();
        for child in tree.children(id) {
            if tree.get(*child).is_some_and(|d| d.display) {
                items.push(Item::Division(*child));
            } else {
                self.collapse(*child);
            }
        }
        if let Some(field) = division.name().and_then(|name| fields.get(name)) {
            items.extend(field.elements().iter().copied().map(Item::Element));
            for element in field.fastened() {
                self.place(*element, inner, shown);
            }
        }

        let (columns, rows) = if dimension == (1, 1) {
            auto_tile(items.len())
        } else {
            dimension
        };

        // `gap=[columns,rows]`; a lone value spaces both.
        let row_gap = match division.gap.at(1) {
            n if n.is_none() => division.gap.at(0),
            n => n,
        };
        let gap_x = division.gap.at(0).get_value(inner.width).max(0.0);
        let gap_y = row_gap.get_value(inner.height).max(0.0);
        let cell_w = ((inner.width as f64 - gap_x * (columns as f64 - 1.0)) / columns as f64).max(0.0);
        let cell_h = ((inner.height as f64 - gap_y * (rows as f64 - 1.0)) / rows as f64).max(0.0);

        let cell = |column: u32, row: u32, span_x: u32, span_y: u32| {
            let x = inner.x as f64 + column as f64 * (cell_w + gap_x);
            let y = inner.y as f64 + row as f64 * (cell_h + gap_y);
            let w = span_x as f64 * cell_w + (span_x as f64 - 1.0) * gap_x;
            let h = span_y as f64 * cell_h + (span_y as f64 - 1.0) * gap_y;
            Rect::new(
                x.round() as i32,
                y.round() as i32,
                ((x + w).round() - x.round()) as i32,
                ((y + h).round() - y.round()) as i32,
            )
        };

        // Row-major walk; a collapse occupies its block from its origin.
        let mut slots = Vec::new();
        for row in 0..rows {
            for column in 0..columns {
                match collapses.iter().find(|c| c.contains(column, row)) {
                    Some(c) if c.x == column && c.y == row => {
                        slots.push(cell(column, row, c.width.max(1), c.height.max(1)));
                    }
                    Some(_) => {}
                    None => slots.push(cell(column, row, 1, 1)),
                }
            }
        }

        let mut slots = slots.into_iter();
        for item in items {
            let (area, visible) = match slots.next() {
                Some(area) => (area, shown),
                None => (Rect::ZERO, false),
            };
            match item {
                Item::Division(child) => self.collocate(child, area, visible),
                Item::Element(element) => self.place(element, area, visible),
            }
        }
    }
}
