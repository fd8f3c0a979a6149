//! Test utilities for the Trellis layout engine.
//!
//! The main component is `MockHost` (requires the `mock` feature), an
//! implementation of [`trellis_core::host::Host`] that records every call the
//! engine makes so tests can assert on element placement, visibility, pointer
//! capture and floating containers without a real window system.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use trellis_core::geometry::Size;
//! use trellis_core::host::Host;
//! use trellis_test_utils::MockHost;
//!
//! let mock = MockHost::new(Size::new(300, 100));
//! let element = mock.spawn_child();
//!
//! // The engine receives a boxed clone; the test keeps its own handle.
//! let mut host: Box<dyn Host> = Box::new(mock.clone());
//! assert!(host.is_child(element));
//! # }
//! ```
//!
//! # Interior Mutability
//!
//! `MockHost` is a cheap handle around `Arc<Mutex<_>>`. Clones share state, so
//! a test hands one clone to the engine and inspects the recording through
//! another.

#[cfg(feature = "mock")]
pub mod mock_host;

#[cfg(feature = "mock")]
pub use mock_host::*;
