//! Trellis Place - text-described window layouts
//!
//! A [`Place`] lays out the child elements of one host window from a short
//! description string:
//! - Rows and columns of divisions sized by weight, percent, min/max bounds
//!   and measured content
//! - Grids with automatic tiling and merged cells
//! - Draggable splitters that can write their result back into the text
//! - Dock panes that float into their own container and re-dock
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # use trellis_place::Place;
//! # use trellis_core::host::{ElementId, Host};
//! # fn run(host: impl Host + 'static, tree_view: ElementId, editor: ElementId) -> trellis_place::PlaceResult<()> {
//! let mut place = Place::new();
//! place.bind(host)?;
//! place.div("<tree weight=25% min=120>|<vert <editor><status height=24>>")?;
//! place.field("tree").add(tree_view)?;
//! place.field("editor").add(editor)?;
//! place.field("status").text("ready")?;
//! place.collocate()?;
//!
//! // On host notifications:
//! // place.window_resized()?;
//! // place.handle_pointer(event);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod division;
pub mod dock;
pub mod error;
pub mod field;
pub mod number;
pub mod parser;
pub mod place;
pub mod printer;
pub mod solver;
pub mod splitter;
pub mod tokenizer;
pub mod tree;

pub use config::PlaceConfig;
pub use division::{Collapse, Division, DivisionId, DivisionKind, DockSide, Fit};
pub use dock::{Dock, DockEvent, PaneFactory};
pub use error::{ParseError, ParseErrorKind, PlaceError, PlaceResult};
pub use field::Field;
pub use number::{Margin, Number, RepeatedArray};
pub use parser::parse;
pub use place::{FieldHandle, Place, SplitterRenderer};
pub use printer::print;
pub use solver::{Layout, SplitterArea, SplitterTarget};
pub use splitter::{SplitterState, SplitterVisual};
pub use tree::DivisionTree;

// Re-export what hosts need to drive a place
pub use trellis_core::event::{HandleStatus, HostEvent, PointerEvent};
pub use trellis_core::geometry::{Axis, Pos, Rect, Size};
pub use trellis_core::host::{ContainerId, ElementId, Host, HostError, MeasureRequest};
