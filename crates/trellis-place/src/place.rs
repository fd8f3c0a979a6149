//! The layout engine bound to one host window.

use indexmap::IndexMap;
use tracing::{debug, info, warn};
use trellis_core::alloc::HashMap;
use trellis_core::event::{HandleStatus, HostEvent, PointerEvent};
use trellis_core::geometry::{Axis, Pos, Rect};
use trellis_core::host::{ElementId, Host};
use trellis_core::profiling::profile_function;

use crate::config::PlaceConfig;
use crate::dock::{Dock, DockEvent, PaneFactory};
use crate::division::{Division, DivisionId, DivisionKind};
use crate::error::{ParseError, ParseErrorKind, PlaceError, PlaceResult};
use crate::field::Field;
use crate::number::Number;
use crate::parser::parse;
use crate::printer::print;
use crate::solver::{Collocator, FloorTable, Layout, SplitterArea, SplitterTarget, calc_floors};
use crate::splitter::{
    Capture, DragManager, DragState, LeafBounds, SplitterVisual, pane_extent, split_sizes,
};
use crate::tree::DivisionTree;

/// Callback drawing one splitter bar.
pub type SplitterRenderer = Box<dyn FnMut(&SplitterVisual)>;

/// A layout description applied to the elements of one host window.
///
/// # Example
///
/// ```
/// use trellis_place::Place;
///
/// let mut place = Place::new();
/// place.div("<nav weight=30%>|<main>").unwrap();
/// assert_eq!(place.description(), "<nav weight=30%>|<main>");
/// ```
pub struct Place {
    config: PlaceConfig,
    host: Option<Box<dyn Host>>,
    tree: DivisionTree,
    description: String,
    fields: IndexMap<String, Field>,
    docks: IndexMap<String, Dock>,
    /// Labels created through [`FieldHandle::text`]; destroyed with the place.
    labels: Vec<ElementId>,
    layout: Layout,
    floors: FloorTable,
    drag: DragManager,
    /// Docks that asked to close, handled at the next collocate.
    deferred: Vec<String>,
    splitter_renderer: Option<SplitterRenderer>,
}

impl Default for Place {
    fn default() -> Self {
        Self::new()
    }
}

impl Place {
    pub fn new() -> Self {
        Self::with_config(PlaceConfig::default())
    }

    pub fn with_config(config: PlaceConfig) -> Self {
        Self {
            drag: DragManager::new(config.drag_threshold),
            config,
            host: None,
            tree: DivisionTree::new(),
            description: String::new(),
            fields: IndexMap::new(),
            docks: IndexMap::new(),
            labels: Vec::new(),
            layout: Layout::default(),
            floors: FloorTable::default(),
            deferred: Vec::new(),
            splitter_renderer: None,
        }
    }

    pub fn config(&self) -> &PlaceConfig {
        &self.config
    }

    /// Attach the host window. A place binds exactly once.
    pub fn bind(&mut self, host: impl Host + 'static) -> PlaceResult<()> {
        if self.host.is_some() {
            return Err(PlaceError::AlreadyBound);
        }
        let size = host.client_size();
        self.host = Some(Box::new(host));
        info!(width = size.width, height = size.height, "place bound");
        Ok(())
    }

    pub fn is_bound(&self) -> bool {
        self.host.is_some()
    }

    /// Replace the whole layout with `text`.
    ///
    /// On error the previous layout is untouched.
    pub fn div(&mut self, text: &str) -> PlaceResult<()> {
        profile_function!();
        let tree = parse(text)?;
        self.abort_drag();
        self.tree = tree;
        self.commit()
    }

    /// Replace the division named `name` with the layout in `text`.
    ///
    /// The new sub-tree takes the old one's name and position. Names used
    /// inside it may repeat names from the replaced sub-tree but not from the
    /// rest of the tree. On error nothing changes.
    pub fn modify(&mut self, name: &str, text: &str) -> PlaceResult<()> {
        profile_function!();
        let target = self.tree.find(name).ok_or_else(|| {
            ParseError::new(ParseErrorKind::UnknownTarget, 0).with_field(Some(name))
        })?;
        let mut replacement = parse(text)?;
        let root = replacement
            .root()
            .ok_or_else(|| ParseError::new(ParseErrorKind::UnexpectedEnd, text.len()))?;

        if replacement.find(name).is_some_and(|id| id != root) {
            return Err(ParseError::new(ParseErrorKind::DuplicateName, 0)
                .with_field(Some(name))
                .into());
        }
        if let Some(division) = replacement.get_mut(root) {
            division.name = Some(name.to_string());
        }

        let inside = self.tree.names(target);
        let mut added: Vec<String> = replacement.names(root).into_iter().collect();
        added.sort();
        for added_name in added {
            if inside.contains(&added_name) || self.tree.find(&added_name).is_none() {
                continue;
            }
            let kind = if self.fields.contains_key(&added_name) {
                ParseErrorKind::RedefinedField
            } else {
                ParseErrorKind::DuplicateName
            };
            return Err(ParseError::new(kind, 0).with_field(Some(&added_name)).into());
        }

        let owner_kind = self
            .tree
            .owner(target)
            .and_then(|owner| self.tree.get(owner))
            .map(|owner| owner.kind.clone());
        if let Some(division) = replacement.get_mut(root) {
            let expected = match owner_kind.as_ref().map(DivisionKind::layout) {
                Some(DivisionKind::Arrange(axis)) => Some(*axis),
                Some(DivisionKind::Dock) => {
                    division.make_pane();
                    Some(division.dock_side().axis())
                }
                _ => None,
            };
            if let (Some(expected), Some(declared)) = (expected, division.weight_axis)
                && expected != declared
            {
                return Err(ParseError::new(ParseErrorKind::AxisContradiction, 0)
                    .with_field(Some(name))
                    .into());
            }
        }

        self.abort_drag();
        self.tree.graft(target, replacement);
        self.commit()
    }

    /// Current description, regenerated from the tree.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Re-attach docks, refresh the description and lay out if bound.
    fn commit(&mut self) -> PlaceResult<()> {
        for (name, dock) in self.docks.iter_mut() {
            dock.attach(&mut self.tree, name);
        }
        self.description = print(&self.tree);
        debug!(divisions = self.tree.len(), description = %self.description, "layout committed");
        if self.host.is_some() {
            self.collocate()?;
        }
        Ok(())
    }

    /// Add elements to the field `name`, creating it if needed.
    pub fn field(&mut self, name: &str) -> FieldHandle<'_> {
        self.fields.entry(name.to_string()).or_default();
        FieldHandle {
            place: self,
            name: name.to_string(),
        }
    }

    /// Elements of the field `name`.
    pub fn field_elements(&self, name: &str) -> &[ElementId] {
        self.fields.get(name).map(Field::elements).unwrap_or(&[])
    }

    /// Show or hide the division `name` while keeping its room.
    pub fn field_visible(&mut self, name: &str, visible: bool) -> PlaceResult<()> {
        let id = self.division_id(name)?;
        if let Some(division) = self.tree.get_mut(id) {
            division.set_visible(visible);
        }
        self.refresh()
    }

    /// Display or undisplay the division `name`. An undisplayed division
    /// takes no room. Displaying a child of a switchable division
    /// undisplays its siblings.
    pub fn field_display(&mut self, name: &str, display: bool) -> PlaceResult<()> {
        let id = self.division_id(name)?;
        if let Some(division) = self.tree.get_mut(id) {
            division.set_display(display);
        }
        let in_switchable = self
            .tree
            .owner(id)
            .and_then(|owner| self.tree.get(owner))
            .is_some_and(|owner| *owner.kind.layout() == DivisionKind::Switchable);
        if display && in_switchable {
            let siblings: Vec<DivisionId> = self
                .tree
                .owner(id)
                .map(|owner| self.tree.children(owner).to_vec())
                .unwrap_or_default();
            for sibling in siblings.into_iter().filter(|s| *s != id) {
                if let Some(division) = self.tree.get_mut(sibling) {
                    division.set_display(false);
                }
            }
        }
        self.refresh()
    }

    fn refresh(&mut self) -> PlaceResult<()> {
        self.description = print(&self.tree);
        if self.host.is_some() {
            self.collocate()?;
        }
        Ok(())
    }

    fn division_id(&self, name: &str) -> PlaceResult<DivisionId> {
        self.tree
            .find(name)
            .ok_or_else(|| PlaceError::UnknownDivision(name.to_string()))
    }

    /// Named division in the current tree.
    pub fn division(&self, name: &str) -> Option<&Division> {
        self.tree.find(name).and_then(|id| self.tree.get(id))
    }

    /// Register `factory` as `factory_name` for the dock pane `name`.
    ///
    /// With an empty `factory_name` the pane is created right away when the
    /// current layout has a pane called `name`.
    pub fn dock(&mut self, name: &str, factory_name: &str, factory: PaneFactory) -> PlaceResult<()> {
        let dock = self.docks.entry(name.to_string()).or_default();
        dock.register(factory_name, factory);
        dock.attach(&mut self.tree, name);
        if factory_name.is_empty() && dock.pane().is_some() && self.host.is_some() {
            self.dock_create_in(name, factory_name)?;
            return Ok(());
        }
        self.refresh()
    }

    /// Create a pane element from the factory `factory_name` and display its
    /// dock pane.
    pub fn dock_create(&mut self, factory_name: &str) -> PlaceResult<ElementId> {
        let name = self
            .docks
            .iter()
            .find(|(_, dock)| dock.has_factory(factory_name))
            .map(|(name, _)| name.clone())
            .ok_or_else(|| PlaceError::UnknownFactory(factory_name.to_string()))?;
        self.dock_create_in(&name, factory_name)
    }

    fn dock_create_in(&mut self, name: &str, factory_name: &str) -> PlaceResult<ElementId> {
        let host = self.host.as_deref_mut().ok_or(PlaceError::NotBound)?;
        let dock = self
            .docks
            .get_mut(name)
            .ok_or_else(|| PlaceError::UnknownDock(name.to_string()))?;
        let element = dock
            .create(factory_name, host)
            .ok_or_else(|| PlaceError::UnknownFactory(factory_name.to_string()))??;

        if !host.is_child(element) {
            warn!(%element, dock = name, "pane factory returned an element outside the bound window");
        }
        if let Some(container) = dock.container() {
            host.reparent(element, Some(container));
        } else if let Some(division) = dock.pane().and_then(|pane| self.tree.get_mut(pane)) {
            division.set_display(true);
        }
        debug!(%element, dock = name, factory = factory_name, "pane created");
        self.refresh()?;
        Ok(element)
    }

    /// Dock registration `name`.
    pub fn dock_state(&self, name: &str) -> Option<&Dock> {
        self.docks.get(name)
    }

    /// Deliver a float/dock notification from the pane `name`.
    pub fn dock_event(&mut self, name: &str, event: DockEvent) -> PlaceResult<()> {
        let host = self.host.as_deref_mut().ok_or(PlaceError::NotBound)?;
        let dock = self
            .docks
            .get_mut(name)
            .ok_or_else(|| PlaceError::UnknownDock(name.to_string()))?;

        let display = match event {
            DockEvent::Float => {
                let home = dock
                    .pane()
                    .and_then(|pane| self.layout.area(pane))
                    .filter(|area| !area.is_empty())
                    .or_else(|| {
                        dock.pane()
                            .and_then(|pane| self.tree.owner(pane))
                            .and_then(|owner| self.layout.area(owner))
                    })
                    .unwrap_or_default();
                dock.float(host, home, self.config.float_size)?
                    .then_some(false)
            }
            DockEvent::Dock => dock.redock(host).then_some(true),
            DockEvent::Move { pointer } => {
                dock.track(host, pointer);
                None
            }
            DockEvent::MoveStopped => {
                (dock.indicator_shown() && dock.redock(host)).then_some(true)
            }
            DockEvent::RequestClose => {
                if !self.deferred.iter().any(|n| n == name) {
                    self.deferred.push(name.to_string());
                }
                None
            }
        };

        if let Some(display) = display {
            if let Some(division) = dock.pane().and_then(|pane| self.tree.get_mut(pane)) {
                division.set_display(display);
            }
            self.collocate()?;
        }
        Ok(())
    }

    /// Close docks that asked to be removed, then lay out again.
    pub fn process_deferred(&mut self) -> PlaceResult<()> {
        self.collocate()
    }

    fn run_deferred(&mut self) {
        let names = std::mem::take(&mut self.deferred);
        let Some(host) = self.host.as_deref_mut() else {
            return;
        };
        for name in names {
            let Some(dock) = self.docks.get_mut(&name) else {
                continue;
            };
            dock.close(host);
            if let Some(division) = dock.pane().and_then(|pane| self.tree.get_mut(pane)) {
                division.set_display(false);
            }
            debug!(dock = %name, "pane closed");
        }
        self.description = print(&self.tree);
    }

    /// Draw splitter bars through `renderer` after every layout pass.
    pub fn splitter_renderer(&mut self, renderer: impl FnMut(&SplitterVisual) + 'static) {
        self.splitter_renderer = Some(Box::new(renderer));
        self.render_splitters();
    }

    fn render_splitters(&mut self) {
        let Some(renderer) = self.splitter_renderer.as_mut() else {
            return;
        };
        for bar in &self.layout.splitters {
            renderer(&SplitterVisual {
                area: bar.area,
                axis: bar.axis,
                state: self.drag.state_of(bar.target),
                dock: matches!(bar.target, SplitterTarget::DockPane(_)),
            });
        }
    }

    /// Lay out the tree in the host's client area.
    pub fn collocate(&mut self) -> PlaceResult<()> {
        if self.host.is_none() {
            return Err(PlaceError::NotBound);
        }
        if !self.deferred.is_empty() {
            self.run_deferred();
        }
        self.layout_pass(None);
        Ok(())
    }

    fn layout_pass(&mut self, pinned: Option<(DivisionId, Rect<i32>)>) {
        profile_function!();
        let Some(host) = self.host.as_deref_mut() else {
            return;
        };
        let area = Rect::from_size(host.client_size());

        let mut panes: HashMap<DivisionId, Vec<ElementId>> = HashMap::new();
        for dock in self.docks.values() {
            if let Some(pane) = dock.pane()
                && !dock.is_floating()
            {
                panes.insert(pane, dock.instances().to_vec());
            }
        }

        self.floors = calc_floors(&self.tree, &self.fields, &*host, &self.config);
        self.layout = Collocator::new(
            &self.tree,
            &self.fields,
            &panes,
            &self.config,
            &self.floors,
            host,
        )
        .with_pinned(pinned)
        .run(area);
        debug!(?area, splitters = self.layout.splitters.len(), "collocated");
        self.render_splitters();
    }

    /// Last laid-out rectangle of the division `name`.
    pub fn area(&self, name: &str) -> Option<Rect<i32>> {
        self.tree.find(name).and_then(|id| self.layout.area(id))
    }

    /// Output of the last layout pass.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The bound window changed size.
    pub fn window_resized(&mut self) -> PlaceResult<()> {
        self.collocate()
    }

    /// The host destroyed `element`; forget it everywhere.
    pub fn element_destroyed(&mut self, element: ElementId) -> PlaceResult<()> {
        for field in self.fields.values_mut() {
            field.remove(element);
        }
        self.labels.retain(|label| *label != element);
        for dock in self.docks.values_mut() {
            if dock.remove_instance(element)
                && dock.instances().is_empty()
                && let Some(division) = dock.pane().and_then(|pane| self.tree.get_mut(pane))
            {
                division.set_display(false);
            }
        }
        let destroying = self.host.as_deref().map(|host| host.is_destroying());
        match destroying {
            Some(false) => self.collocate(),
            _ => Ok(()),
        }
    }

    /// Route a host notification.
    pub fn handle_event(&mut self, event: HostEvent) -> PlaceResult<HandleStatus> {
        match event {
            HostEvent::Resized(_) => {
                self.window_resized()?;
                Ok(HandleStatus::handled())
            }
            HostEvent::Pointer(pointer) => Ok(self.handle_pointer(pointer)),
        }
    }

    /// Drive splitter drags from pointer input.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> HandleStatus {
        if self.host.is_none() {
            return HandleStatus::ignored();
        }
        match event {
            PointerEvent::Down(pos) => self.press(pos),
            PointerEvent::Moved(pos) => self.drag_to(pos),
            PointerEvent::Up(pos) => self.release(pos),
        }
    }

    fn press(&mut self, pos: Pos<i32>) -> HandleStatus {
        if self.drag.drag_state().is_some() {
            return HandleStatus::handled();
        }
        let Some(bar) = self.layout.splitter_at(pos) else {
            return HandleStatus::ignored();
        };
        let Some(capture) = self.capture(&bar) else {
            return HandleStatus::ignored();
        };
        self.drag
            .start(DragState::new(bar.target, bar.axis, pos, bar.area, capture));
        if let Some(host) = self.host.as_deref_mut() {
            host.capture_pointer();
        }
        debug!(target = ?bar.target, "splitter pressed");
        self.render_splitters();
        HandleStatus::consumed()
    }

    fn drag_to(&mut self, pos: Pos<i32>) -> HandleStatus {
        if !self.drag.update(pos) {
            return HandleStatus::ignored();
        }
        if self.host.as_deref().is_some_and(|host| host.is_destroying()) {
            self.abort_drag();
            return HandleStatus::handled();
        }
        if self.drag.is_dragging() {
            self.apply_drag();
        }
        HandleStatus::consumed()
    }

    fn release(&mut self, pos: Pos<i32>) -> HandleStatus {
        self.drag.update(pos);
        let Some(state) = self.drag.end_drag() else {
            return HandleStatus::ignored();
        };
        if let Some(host) = self.host.as_deref_mut() {
            host.release_pointer();
        }
        if state.is_active && !self.host.as_deref().is_some_and(|h| h.is_destroying()) {
            self.resize(&state);
            if self.config.persist_splitter {
                self.persist(&state);
            }
        }
        debug!(target = ?state.target, delta = state.delta(), "splitter released");
        self.layout_pass(None);
        HandleStatus::consumed()
    }

    /// Cancel a drag in progress and give the pointer back.
    fn abort_drag(&mut self) {
        if self.drag.end_drag().is_some()
            && let Some(host) = self.host.as_deref_mut()
        {
            host.release_pointer();
        }
    }

    fn leaf_bounds(&self, id: DivisionId, axis: Axis, reference: i32) -> LeafBounds {
        let Some(division) = self.tree.get(id) else {
            return LeafBounds::default();
        };
        let floor = self.floors.along(id, axis);
        let min = division.min_px.resolve(reference).unwrap_or(0.0).max(floor);
        let max = division
            .max_px
            .resolve(reference)
            .unwrap_or(f64::INFINITY);
        LeafBounds::new(min, max)
    }

    /// Sizes and bounds of what the bar under the pointer resizes.
    fn capture(&self, bar: &SplitterArea) -> Option<Capture> {
        let owner_length = |id: DivisionId, axis: Axis| -> Option<i32> {
            let owner = self.tree.owner(id)?;
            let area = self.layout.area(owner)?;
            Some(self.tree.get(owner)?.margin.area(area).length(axis))
        };
        match bar.target {
            SplitterTarget::Splitter(splitter) => {
                let (Some(left), Some(right)) = self.tree.adjacent_leaves(splitter) else {
                    return None;
                };
                let length = owner_length(splitter, bar.axis)?;
                Some(Capture::Pair {
                    left,
                    right,
                    left_size: self.layout.area(left)?.length(bar.axis) as f64,
                    right_size: self.layout.area(right)?.length(bar.axis) as f64,
                    left_bounds: self.leaf_bounds(left, bar.axis, length),
                    right_bounds: self.leaf_bounds(right, bar.axis, length),
                    owner_length: length,
                })
            }
            SplitterTarget::DockPane(pane) => {
                let length = owner_length(pane, bar.axis)?;
                Some(Capture::Pane {
                    pane,
                    side: self.tree.get(pane)?.dock_side(),
                    extent: self.layout.area(pane)?.length(bar.axis),
                    bounds: self.leaf_bounds(pane, bar.axis, length),
                })
            }
        }
    }

    /// Write the drag's sizes into the tree as weights.
    fn resize(&mut self, state: &DragState) -> Option<(DivisionId, Rect<i32>)> {
        let delta = state.delta();
        match state.capture {
            Capture::Pair {
                left,
                right,
                left_size,
                right_size,
                left_bounds,
                right_bounds,
                owner_length,
            } => {
                let (size, _) = split_sizes(left_size, right_size, left_bounds, right_bounds, delta);
                if owner_length > 0
                    && let Some(division) = self.tree.get_mut(left)
                {
                    division.weight = Number::Percent(size / owner_length as f64);
                }
                if let Some(division) = self.tree.get_mut(right) {
                    division.weight.clear();
                }
                let SplitterTarget::Splitter(splitter) = state.target else {
                    return None;
                };
                let moved = (size - left_size).round() as i32;
                let origin = state.origin;
                let pinned =
                    origin.with_span(state.axis, origin.start(state.axis) + moved, origin.length(state.axis));
                Some((splitter, pinned))
            }
            Capture::Pane {
                pane,
                side,
                extent,
                bounds,
            } => {
                if let Some(division) = self.tree.get_mut(pane) {
                    division.weight = Number::Integer(pane_extent(side, extent, bounds, delta));
                }
                None
            }
        }
    }

    fn apply_drag(&mut self) {
        let Some(state) = self.drag.drag_state().cloned() else {
            return;
        };
        let pinned = self.resize(&state);
        self.layout_pass(pinned);
    }

    /// Store the left leaf of a splitter as a percent of its owner and leave
    /// the right leaf weightless, then regenerate the description.
    fn persist(&mut self, state: &DragState) {
        if let Capture::Pair {
            left,
            right,
            left_size,
            right_size,
            left_bounds,
            right_bounds,
            owner_length,
        } = state.capture
            && owner_length > 0
        {
            let (size, _) = split_sizes(left_size, right_size, left_bounds, right_bounds, state.delta());
            if let Some(division) = self.tree.get_mut(left) {
                division.weight = Number::Percent(size / owner_length as f64);
            }
            if let Some(division) = self.tree.get_mut(right) {
                division.weight.clear();
            }
        }
        self.description = print(&self.tree);
        debug!(description = %self.description, "splitter persisted");
    }
}

impl Drop for Place {
    fn drop(&mut self) {
        let Some(host) = self.host.as_deref_mut() else {
            return;
        };
        if host.is_destroying() {
            return;
        }
        for label in self.labels.drain(..) {
            host.destroy_element(label);
        }
    }
}

/// Builder-style access to one field, returned by [`Place::field`].
pub struct FieldHandle<'a> {
    place: &'a mut Place,
    name: String,
}

impl FieldHandle<'_> {
    fn checked(&self, element: ElementId) -> PlaceResult<()> {
        let host = self.place.host.as_deref().ok_or(PlaceError::NotBound)?;
        if !host.is_child(element) {
            return Err(PlaceError::NotAChild(element));
        }
        Ok(())
    }

    fn entry(&mut self) -> &mut Field {
        self.place.fields.entry(self.name.clone()).or_default()
    }

    /// Append an element laid out with its siblings.
    pub fn add(mut self, element: ElementId) -> PlaceResult<Self> {
        self.checked(element)?;
        self.entry().push(element);
        Ok(self)
    }

    /// Append a label showing `text`, created by the host.
    pub fn text(mut self, text: &str) -> PlaceResult<Self> {
        let host = self.place.host.as_deref_mut().ok_or(PlaceError::NotBound)?;
        let label = host.create_label(text)?;
        self.place.labels.push(label);
        self.entry().push(label);
        Ok(self)
    }

    /// Add an element that always covers the whole division.
    pub fn fasten(mut self, element: ElementId) -> PlaceResult<Self> {
        self.checked(element)?;
        self.entry().fasten(element);
        Ok(self)
    }

    /// Elements added so far.
    pub fn elements(&self) -> &[ElementId] {
        self.place.field_elements(&self.name)
    }
}
