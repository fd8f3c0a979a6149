use indexmap::IndexMap;
use tracing::trace;
use trellis_core::alloc::HashMap;
use trellis_core::geometry::{Axis, Rect};
use trellis_core::host::{ElementId, Host};
use trellis_core::profiling::{profile_function, profile_scope};

use super::distribute::{Bounds, assign_spans, distribute};
use super::floor::FloorTable;
use super::{Layout, SplitterArea, SplitterTarget, entries};
use crate::config::PlaceConfig;
use crate::division::{Division, DivisionId, DivisionKind};
use crate::field::Field;
use crate::number::Number;
use crate::tree::DivisionTree;

/// How one displayed slot of a row is sized.
#[derive(Debug, Clone, Copy)]
enum Sizing {
    Fixed(f64),
    Percent(f64),
    Adjustable(Bounds),
    Splitter(f64),
}

/// Top-down placement pass.
pub struct Collocator<'a> {
    pub tree: &'a DivisionTree,
    pub fields: &'a IndexMap<String, Field>,
    /// Docked pane instances keyed by their pane division.
    pub panes: &'a HashMap<DivisionId, Vec<ElementId>>,
    pub config: &'a PlaceConfig,
    pub floors: &'a FloorTable,
    pub host: &'a mut dyn Host,
    /// A splitter held at a pointer-driven rectangle while it is dragged.
    pub pinned: Option<(DivisionId, Rect<i32>)>,
    pub(super) layout: Layout,
}

impl<'a> Collocator<'a> {
    pub fn new(
        tree: &'a DivisionTree,
        fields: &'a IndexMap<String, Field>,
        panes: &'a HashMap<DivisionId, Vec<ElementId>>,
        config: &'a PlaceConfig,
        floors: &'a FloorTable,
        host: &'a mut dyn Host,
    ) -> Self {
        Self {
            tree,
            fields,
            panes,
            config,
            floors,
            host,
            pinned: None,
            layout: Layout::default(),
        }
    }

    pub fn with_pinned(mut self, pinned: Option<(DivisionId, Rect<i32>)>) -> Self {
        self.pinned = pinned;
        self
    }

    /// Lay out the whole tree inside `area`.
    pub fn run(mut self, area: Rect<i32>) -> Layout {
        profile_function!();
        if let Some(root) = self.tree.root() {
            self.collocate(root, area, true);
        }
        self.layout
    }

    pub(super) fn collocate(&mut self, id: DivisionId, area: Rect<i32>, visible: bool) {
        let tree = self.tree;
        let Some(division) = tree.get(id) else {
            return;
        };
        self.layout.areas.insert(id, area);
        let shown = visible && division.display && division.visible;
        let inner = division.margin.area(area);
        trace!(division = ?division.name(), ?area, shown, "collocate");

        self.lay_out(id, division, &division.kind, inner, shown);
    }

    fn lay_out(
        &mut self,
        id: DivisionId,
        division: &Division,
        kind: &DivisionKind,
        inner: Rect<i32>,
        shown: bool,
    ) {
        match kind {
            DivisionKind::Arrange(axis) => {
                self.arrange(id, division, inner, *axis, shown);
                self.place_field(id, division, inner, shown);
            }
            DivisionKind::Switchable => {
                self.switchable(id, inner, shown);
                self.place_field(id, division, inner, shown);
            }
            DivisionKind::Grid {
                columns,
                rows,
                collapses,
            } => self.grid(id, division, inner, (*columns, *rows), collapses, shown),
            DivisionKind::Dock => self.dock(id, division, inner, shown),
            DivisionKind::DockPane(content) => {
                let panes = self.panes;
                if let Some(instances) = panes.get(&id) {
                    for element in instances {
                        self.place(*element, inner, shown);
                    }
                }
                self.lay_out(id, division, content, inner, shown);
            }
            DivisionKind::Splitter => {}
        }
    }

    /// Collocate a division that takes no room: a zero rectangle, hidden.
    pub(super) fn collapse(&mut self, id: DivisionId) {
        self.collocate(id, Rect::ZERO, false);
    }

    pub(super) fn place(&mut self, element: ElementId, area: Rect<i32>, shown: bool) {
        self.host.move_element(element, area);
        self.host.show_element(element, shown);
    }

    fn sizing(&self, child: &Division, id: DivisionId, axis: Axis, length: i32) -> Sizing {
        let floor = self.floors.along(id, axis);
        match child.weight {
            Number::Percent(p) => Sizing::Percent((length as f64 * p).max(floor)),
            w if w.is_fixed() => Sizing::Fixed(w.real().max(floor)),
            _ if child.fit.along(axis) && self.floors.fit_extents(id).is_some() => {
                Sizing::Fixed(floor)
            }
            _ => {
                let min = child.min_px.resolve(length).unwrap_or(0.0).max(floor);
                let max = child.max_px.resolve(length).unwrap_or(f64::INFINITY);
                Sizing::Adjustable(Bounds::new(min, max))
            }
        }
    }

    fn arrange(
        &mut self,
        id: DivisionId,
        division: &Division,
        inner: Rect<i32>,
        axis: Axis,
        shown: bool,
    ) {
        profile_scope!("arrange");
        let tree = self.tree;
        let length = inner.length(axis);
        let entries = entries(tree, id);

        let sizing: Vec<Sizing> = entries
            .iter()
            .map(|entry| {
                if entry.splitter {
                    return Sizing::Splitter(self.config.splitter_thickness as f64);
                }
                match tree.get(entry.id) {
                    Some(child) => self.sizing(child, entry.id, axis, length),
                    None => Sizing::Fixed(0.0),
                }
            })
            .collect();

        let gaps: Vec<f64> = (0..entries.len().saturating_sub(1))
            .map(|i| division.gap.at(i).get_value(length).max(0.0))
            .collect();

        let fixed_total: f64 = sizing
            .iter()
            .map(|s| match *s {
                Sizing::Fixed(v) | Sizing::Percent(v) | Sizing::Splitter(v) => v,
                Sizing::Adjustable(_) => 0.0,
            })
            .sum::<f64>()
            + gaps.iter().sum::<f64>();

        let bounds: Vec<Bounds> = sizing
            .iter()
            .filter_map(|s| match s {
                Sizing::Adjustable(bounds) => Some(*bounds),
                _ => None,
            })
            .collect();
        let mut shares = distribute(length as f64 - fixed_total, &bounds).into_iter();

        let sizes: Vec<f64> = sizing
            .iter()
            .map(|s| match *s {
                Sizing::Fixed(v) | Sizing::Percent(v) | Sizing::Splitter(v) => v,
                Sizing::Adjustable(bounds) => bounds.clamp(shares.next().unwrap_or(0.0)),
            })
            .collect();

        let start = inner.start(axis);
        let mut spans = assign_spans(start, &sizes, &gaps);

        // When the row fills the container, the last non-fixed slot absorbs
        // any rounding residue so the row ends on the far edge.
        let total: f64 = sizes.iter().sum::<f64>() + gaps.iter().sum::<f64>();
        let flexible = sizing
            .iter()
            .rposition(|s| matches!(s, Sizing::Adjustable(_) | Sizing::Percent(_)));
        if let (Some(last), Some(&(begin, len))) = (flexible, spans.last())
            && (total - length as f64).abs() < 1.0
        {
            let residual = start + length - (begin + len);
            if residual != 0 {
                spans[last].1 = (spans[last].1 + residual).max(0);
                for span in spans.iter_mut().skip(last + 1) {
                    span.0 += residual;
                }
            }
        }

        let mut placed: HashMap<DivisionId, Rect<i32>> = HashMap::new();
        for (entry, (begin, len)) in entries.iter().zip(spans) {
            placed.insert(entry.id, inner.with_span(axis, begin, len));
        }

        // Leaves first, splitters after their neighbors have final areas.
        let children = tree.children(id);
        for child in children {
            let is_splitter = tree.get(*child).is_some_and(Division::is_splitter);
            if is_splitter {
                continue;
            }
            match placed.get(child) {
                Some(area) => self.collocate(*child, *area, shown),
                None => self.collapse(*child),
            }
        }
        for child in children {
            let is_splitter = tree.get(*child).is_some_and(Division::is_splitter);
            if !is_splitter {
                continue;
            }
            let area = match (self.pinned, placed.get(child)) {
                (Some((pinned, area)), Some(_)) if pinned == *child => area,
                (_, Some(area)) => *area,
                (_, None) => {
                    self.collapse(*child);
                    continue;
                }
            };
            self.layout.areas.insert(*child, area);
            if shown {
                self.layout.splitters.push(SplitterArea {
                    target: SplitterTarget::Splitter(*child),
                    area,
                    axis,
                });
            }
        }
    }

    /// The first displayed child gets the whole area; the rest collapse.
    fn switchable(&mut self, id: DivisionId, inner: Rect<i32>, shown: bool) {
        let tree = self.tree;
        let active = tree
            .children(id)
            .iter()
            .copied()
            .find(|c| tree.get(*c).is_some_and(|d| d.display));
        for child in tree.children(id) {
            if Some(*child) == active {
                self.collocate(*child, inner, shown);
            } else {
                self.collapse(*child);
            }
        }
    }

    /// Place the division's own field: elements along the axis, fastened
    /// elements over the whole area.
    pub(super) fn place_field(
        &mut self,
        id: DivisionId,
        division: &Division,
        inner: Rect<i32>,
        shown: bool,
    ) {
        let fields = self.fields;
        let Some(field) = division.name().and_then(|name| fields.get(name)) else {
            return;
        };
        let axis = division.kind.axis();
        let length = inner.length(axis);
        let elements = field.elements();

        let floors = self.floors;
        let fitted = floors
            .fit_extents(id)
            .filter(|extents| !division.fit.is_empty() && extents.len() == elements.len());

        let gaps: Vec<f64> = (0..elements.len().saturating_sub(1))
            .map(|i| division.gap.at(i).get_value(length).max(0.0))
            .collect();

        if let Some(extents) = fitted {
            let sizes: Vec<f64> = extents
                .iter()
                .map(|e| match axis {
                    Axis::Horizontal => e.width as f64,
                    Axis::Vertical => e.height as f64,
                })
                .collect();
            let spans = assign_spans(inner.start(axis), &sizes, &gaps);
            let cross_axis = axis.cross();
            let cross_length = inner.length(cross_axis);
            for ((element, extent), (begin, len)) in elements.iter().zip(extents).zip(spans) {
                let cross = match cross_axis {
                    Axis::Horizontal => extent.width as i32,
                    Axis::Vertical => extent.height as i32,
                }
                .min(cross_length);
                let cross_start = inner.start(cross_axis) + (cross_length - cross) / 2;
                let area = inner
                    .with_span(axis, begin, len)
                    .with_span(cross_axis, cross_start, cross);
                self.place(*element, area, shown);
            }
        } else {
            let requested: Vec<Number> = (0..elements.len())
                .map(|i| division.arrange.at(i))
                .collect();
            let fixed: f64 = requested
                .iter()
                .filter(|n| !n.is_none())
                .map(|n| n.get_value(length).max(0.0))
                .sum::<f64>()
                + gaps.iter().sum::<f64>();
            let adjustable = requested.iter().filter(|n| n.is_none()).count();
            let share = if adjustable > 0 {
                ((length as f64 - fixed) / adjustable as f64).max(0.0)
            } else {
                0.0
            };
            let sizes: Vec<f64> = requested
                .iter()
                .map(|n| match n {
                    Number::None => share,
                    n => n.get_value(length).max(0.0),
                })
                .collect();
            let spans = assign_spans(inner.start(axis), &sizes, &gaps);
            for (element, (begin, len)) in elements.iter().zip(spans) {
                self.place(*element, inner.with_span(axis, begin, len), shown);
            }
        }

        for element in field.fastened() {
            self.place(*element, inner, shown);
        }
    }
}
