//! Lays out a small editor window against the recording host, drags its
//! splitter and floats the side panel.
//!
//! Run with `RUST_LOG=trellis_place=debug` to see every layout pass.

use trellis_core::logging;
use trellis_core::profiling::{DEFAULT_PROFILER_ADDR, init_profiling, new_frame};
use trellis_place::{
    Axis, DockEvent, Host, Place, PlaceConfig, PlaceResult, PointerEvent, Pos, Size,
};
use trellis_test_utils::MockHost;

fn main() -> PlaceResult<()> {
    logging::init();
    init_profiling(DEFAULT_PROFILER_ADDR);

    let host = MockHost::new(Size::new(800, 600));
    let mut place = Place::with_config(PlaceConfig::default().drag_threshold(2));
    place.bind(host.clone())?;

    place.div("vert <toolbar height=32 hfit>|<work dock <tools left width=180>>|<status height=24>")?;
    for _ in 0..3 {
        place.field("toolbar").add(host.spawn_child())?;
    }
    place.field("status").text("ready")?;
    let editor = host.spawn_child();
    place.field("work").add(editor)?;

    let spawner = host.clone();
    place.dock(
        "tools",
        "",
        Box::new(move |_: &mut dyn Host| Ok(spawner.spawn_child())),
    )?;
    place.splitter_renderer(|bar| println!("bar {:?} {:?}", bar.area, bar.state));
    place.collocate()?;
    new_frame();

    println!("editor at {:?}", host.area_of(editor));

    // Drag the bar under the toolbar down by 40 pixels.
    let toolbar_bar = place
        .layout()
        .splitters
        .iter()
        .find(|s| s.axis == Axis::Vertical)
        .map(|s| s.area);
    if let Some(bar) = toolbar_bar {
        let start = Pos::new(bar.x + 1, bar.y + 1);
        place.handle_pointer(PointerEvent::Down(start));
        place.handle_pointer(PointerEvent::Moved(Pos::new(start.x, start.y + 40)));
        place.handle_pointer(PointerEvent::Up(Pos::new(start.x, start.y + 40)));
        new_frame();
    }
    println!("after drag: {}", place.description());

    place.dock_event("tools", DockEvent::Float)?;
    println!("floating tools, editor at {:?}", host.area_of(editor));
    place.dock_event("tools", DockEvent::Dock)?;
    println!("docked tools, editor at {:?}", host.area_of(editor));

    Ok(())
}
