//! Trellis Core
//!
//! Shared building blocks for the Trellis layout engine: collections and the
//! generational arena, integer geometry, the host collaborator interface,
//! pointer events, logging and profiling bootstrap.

pub mod alloc;
pub mod event;
pub mod geometry;
pub mod host;
pub mod logging;
pub mod profiling;
