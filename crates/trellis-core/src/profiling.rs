//! Profiling utilities based on the `puffin` crate.
//!
//! With the `profiling` feature disabled the scope macros compile to nothing,
//! so call sites never need their own `cfg`.

#[cfg(feature = "profiling")]
pub use puffin::{profile_function, profile_scope};

#[cfg(not(feature = "profiling"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __trellis_profile_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "profiling"))]
pub use crate::__trellis_profile_noop as profile_function;
#[cfg(not(feature = "profiling"))]
pub use crate::__trellis_profile_noop as profile_scope;

/// Default address of the puffin HTTP server.
pub const DEFAULT_PROFILER_ADDR: &str = "127.0.0.1:8585";

#[cfg(feature = "profiling")]
static PROFILING_SERVER: std::sync::OnceLock<puffin_http::Server> = std::sync::OnceLock::new();

/// Enable puffin scopes and start the HTTP server on `addr`.
///
/// Connect `puffin_viewer` to the address to inspect parse and collocate
/// passes frame by frame.
#[cfg(feature = "profiling")]
pub fn init_profiling(addr: &str) {
    puffin::set_scopes_on(true);
    match puffin_http::Server::new(addr) {
        Ok(server) => {
            tracing::info!("puffin profiler listening on {}", addr);
            if PROFILING_SERVER.set(server).is_err() {
                tracing::warn!("puffin profiler was already running");
            }
        }
        Err(e) => {
            tracing::error!("failed to start puffin server: {}", e);
        }
    }
}

/// Mark the end of a host frame (one resize or pointer-move round).
#[cfg(feature = "profiling")]
#[inline]
pub fn new_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profiling"))]
pub fn init_profiling(_addr: &str) {}

#[cfg(not(feature = "profiling"))]
#[inline]
pub fn new_frame() {}
