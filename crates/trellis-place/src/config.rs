//! Engine configuration.

use trellis_core::geometry::Size;

/// Tunables for a [`crate::Place`].
///
/// # Example
///
/// ```
/// use trellis_place::PlaceConfig;
///
/// let config = PlaceConfig::default()
///     .splitter_thickness(6)
///     .persist_splitter(false);
/// assert_eq!(config.splitter_thickness, 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceConfig {
    /// Thickness of a splitter bar in pixels.
    pub splitter_thickness: u32,
    /// Thickness of the bar on a dock pane's inner edge.
    pub dock_splitter_thickness: u32,
    /// Extent of a dock pane without a weight, as a fraction of the dock.
    pub default_pane_fraction: f64,
    /// Pointer travel before a pressed splitter starts dragging.
    pub drag_threshold: u32,
    /// Write splitter results back into the description on release.
    pub persist_splitter: bool,
    /// Size of a floating container created for an undocked pane.
    pub float_size: Size<u32>,
}

impl Default for PlaceConfig {
    fn default() -> Self {
        Self {
            splitter_thickness: 4,
            dock_splitter_thickness: 4,
            default_pane_fraction: 0.25,
            drag_threshold: 0,
            persist_splitter: true,
            float_size: Size::new(320, 240),
        }
    }
}

impl PlaceConfig {
    pub fn splitter_thickness(mut self, thickness: u32) -> Self {
        self.splitter_thickness = thickness;
        self
    }

    pub fn dock_splitter_thickness(mut self, thickness: u32) -> Self {
        self.dock_splitter_thickness = thickness;
        self
    }

    /// Clamped to `0.0..=1.0`.
    pub fn default_pane_fraction(mut self, fraction: f64) -> Self {
        self.default_pane_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    pub fn drag_threshold(mut self, threshold: u32) -> Self {
        self.drag_threshold = threshold;
        self
    }

    pub fn persist_splitter(mut self, persist: bool) -> Self {
        self.persist_splitter = persist;
        self
    }

    pub fn float_size(mut self, size: Size<u32>) -> Self {
        self.float_size = size;
        self
    }
}
