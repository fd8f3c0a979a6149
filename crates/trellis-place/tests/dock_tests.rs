//! Dock panes: creation, edge layout, dock-splitters and the float protocol.

use trellis_core::event::PointerEvent;
use trellis_core::geometry::{Pos, Rect, Size};
use trellis_core::host::{ElementId, Host, HostError};
use trellis_place::{DockEvent, PaneFactory, Place, PlaceError};
use trellis_test_utils::MockHost;

fn spawner(host: &MockHost) -> PaneFactory {
    let host = host.clone();
    Box::new(move |_: &mut dyn Host| Ok(host.spawn_child()))
}

fn docked(description: &str) -> (Place, MockHost, ElementId) {
    let host = MockHost::new(Size::new(300, 100));
    let mut place = Place::new();
    place.bind(host.clone()).expect("bind");
    place.div(description).expect("div");
    place.dock("p", "panel", spawner(&host)).expect("dock");
    let pane = place.dock_create("panel").expect("create");
    (place, host, pane)
}

#[test]
fn test_pane_starts_undisplayed() {
    let host = MockHost::new(Size::new(300, 100));
    let mut place = Place::new();
    place.bind(host.clone()).expect("bind");
    place.div("<d dock <p left width=60>>").expect("div");
    place.dock("p", "panel", spawner(&host)).expect("dock");

    assert_eq!(place.area("p"), Some(Rect::ZERO));
    assert!(place.layout().splitters.is_empty());
    assert!(place.dock_state("p").is_some_and(|d| d.instances().is_empty()));
}

#[test]
fn test_unnamed_factory_creates_immediately() {
    let host = MockHost::new(Size::new(300, 100));
    let mut place = Place::new();
    place.bind(host.clone()).expect("bind");
    place.div("<d dock <p left width=60>>").expect("div");
    place.dock("p", "", spawner(&host)).expect("dock");

    let instances = place.dock_state("p").map(|d| d.instances().to_vec());
    assert_eq!(instances.as_ref().map(Vec::len), Some(1));
    assert_eq!(place.area("p"), Some(Rect::new(0, 0, 60, 100)));
}

#[test]
fn test_edge_layout() {
    let (mut place, host, left) = docked("<d dock <p left width=60><q top height=20>>");
    place.dock("q", "header", spawner(&host)).expect("dock");
    let top = place.dock_create("header").expect("create");

    assert_eq!(host.area_of(left), Some(Rect::new(0, 0, 60, 100)));
    assert_eq!(host.area_of(top), Some(Rect::new(64, 0, 236, 20)));
    assert_eq!(place.layout().splitters.len(), 2);
    assert_eq!(place.layout().splitters[0].area, Rect::new(60, 0, 4, 100));
}

#[test]
fn test_default_pane_fraction() {
    let (place, host, pane) = docked("<d dock <p right>>");
    assert_eq!(host.area_of(pane), Some(Rect::new(225, 0, 75, 100)));
    assert_eq!(place.layout().splitters[0].area, Rect::new(221, 0, 4, 100));
}

#[test]
fn test_dock_field_gets_remaining_room() {
    let (mut place, host, _pane) = docked("<d dock <p left width=60>>");
    let content = host.spawn_child();
    place.field("d").add(content).expect("add");
    place.collocate().expect("collocate");
    assert_eq!(host.area_of(content), Some(Rect::new(64, 0, 236, 100)));
}

#[test]
fn test_dock_splitter_drag_sets_pixel_weight() {
    let (mut place, host, pane) = docked("<d dock <p left width=60>>");

    place.handle_pointer(PointerEvent::Down(Pos::new(61, 50)));
    place.handle_pointer(PointerEvent::Moved(Pos::new(81, 50)));
    assert_eq!(host.area_of(pane), Some(Rect::new(0, 0, 80, 100)));
    place.handle_pointer(PointerEvent::Up(Pos::new(81, 50)));

    assert_eq!(place.description(), "<d dock <p left width=80>>");
}

#[test]
fn test_float_and_redock() {
    let (mut place, host, pane) = docked("<d dock <p left width=60>>");

    place.dock_event("p", DockEvent::Float).expect("float");
    let container = host.containers()[0];
    assert_eq!(host.parent_of(pane), Some(container));
    assert_eq!(place.area("p"), Some(Rect::ZERO));
    assert!(place.dock_state("p").is_some_and(|d| d.is_floating()));

    place
        .dock_event("p", DockEvent::Move { pointer: Pos::new(10, 10) })
        .expect("move");
    assert_eq!(host.indicator(), Some(Rect::new(0, 0, 60, 100)));
    place
        .dock_event("p", DockEvent::Move { pointer: Pos::new(200, 10) })
        .expect("move");
    assert_eq!(host.indicator(), None);

    // Stopping away from home keeps the pane floating.
    place.dock_event("p", DockEvent::MoveStopped).expect("stop");
    assert!(place.dock_state("p").is_some_and(|d| d.is_floating()));

    place
        .dock_event("p", DockEvent::Move { pointer: Pos::new(10, 10) })
        .expect("move");
    place.dock_event("p", DockEvent::MoveStopped).expect("stop");
    assert_eq!(host.parent_of(pane), None);
    assert!(host.containers().is_empty());
    assert_eq!(host.area_of(pane), Some(Rect::new(0, 0, 60, 100)));
}

#[test]
fn test_explicit_dock_event() {
    let (mut place, host, pane) = docked("<d dock <p left width=60>>");
    place.dock_event("p", DockEvent::Float).expect("float");
    place.dock_event("p", DockEvent::Dock).expect("dock");
    assert_eq!(host.parent_of(pane), None);
    assert_eq!(place.area("p"), Some(Rect::new(0, 0, 60, 100)));
}

#[test]
fn test_close_is_deferred() {
    let (mut place, host, pane) = docked("<d dock <p left width=60>>");
    place.dock_event("p", DockEvent::RequestClose).expect("close");
    assert!(!host.was_destroyed(pane));

    place.process_deferred().expect("deferred");
    assert!(host.was_destroyed(pane));
    assert_eq!(place.area("p"), Some(Rect::ZERO));
}

#[test]
fn test_failing_factory_changes_nothing() {
    let host = MockHost::new(Size::new(300, 100));
    let mut place = Place::new();
    place.bind(host.clone()).expect("bind");
    place.div("<d dock <p left>>").expect("div");
    place
        .dock(
            "p",
            "broken",
            Box::new(|_: &mut dyn Host| Err(HostError::new("no pane"))),
        )
        .expect("dock");

    let result = place.dock_create("broken");
    assert!(matches!(result, Err(PlaceError::Host(_))));
    assert_eq!(place.area("p"), Some(Rect::ZERO));
    assert!(matches!(
        place.dock_create("missing"),
        Err(PlaceError::UnknownFactory(_))
    ));
}

#[test]
fn test_failing_container_keeps_pane_docked() {
    let (mut place, host, pane) = docked("<d dock <p left width=60>>");
    host.fail_containers(true);
    let result = place.dock_event("p", DockEvent::Float);
    assert!(matches!(result, Err(PlaceError::Host(_))));
    assert_eq!(host.parent_of(pane), None);
    assert_eq!(place.area("p"), Some(Rect::new(0, 0, 60, 100)));
}

#[test]
fn test_pane_survives_modify() {
    let (mut place, host, pane) = docked("<main><d dock <p left width=60>>");
    place.modify("main", "<x>").expect("modify");
    assert_eq!(place.area("p").map(|r| r.width), Some(60));
    assert!(!host.was_destroyed(pane));
}

#[test]
fn test_destroyed_pane_hides_it() {
    let (mut place, _host, pane) = docked("<d dock <p left width=60>>");
    place.element_destroyed(pane).expect("destroyed");
    assert_eq!(place.area("p"), Some(Rect::ZERO));
    assert!(place.layout().splitters.is_empty());
}

#[test]
fn test_unknown_dock_event() {
    let (mut place, _host, _pane) = docked("<d dock <p left width=60>>");
    assert_eq!(
        place.dock_event("nope", DockEvent::Float),
        Err(PlaceError::UnknownDock("nope".to_string()))
    );
}

#[test]
fn test_pane_lays_out_its_children() {
    let host = MockHost::new(Size::new(300, 100));
    let mut place = Place::new();
    place.bind(host.clone()).expect("bind");
    place.div("<d dock <p left width=100 vert <x><y>>>").expect("div");
    place.dock("p", "", spawner(&host)).expect("dock");
    let tool = host.spawn_child();
    place.field("x").add(tool).expect("add");
    place.collocate().expect("collocate");

    assert_eq!(place.area("p"), Some(Rect::new(0, 0, 100, 100)));
    assert_eq!(place.area("x"), Some(Rect::new(0, 0, 100, 50)));
    assert_eq!(place.area("y"), Some(Rect::new(0, 50, 100, 50)));
    assert_eq!(host.area_of(tool), Some(Rect::new(0, 0, 100, 50)));
}

#[test]
fn test_pane_content_floor_counts() {
    let host = MockHost::new(Size::new(300, 100));
    let mut place = Place::new();
    place.bind(host.clone()).expect("bind");
    place.div("<d dock <p left width=10 <x min=40><y min=30>>>").expect("div");
    place.dock("p", "", spawner(&host)).expect("dock");

    let x = place.area("x").expect("x");
    let y = place.area("y").expect("y");
    assert!(x.width >= 40);
    assert!(y.width >= 30);
    assert_eq!(y.x, x.x + x.width);
}
