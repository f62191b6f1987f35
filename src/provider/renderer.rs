//! Boundary trait for the map renderer and its viewport callbacks.

use crate::core::geo::{CameraTarget, LatLng, Viewport};
use serde::{Deserialize, Serialize};

/// A viewport-change notification from the map renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportEvent {
    pub center: LatLng,
    pub zoom: Option<f64>,
    /// Renderer-supplied gesture flag; `None` when the renderer cannot tag
    /// gestures. An untagged event is never classified as a user gesture.
    pub is_user_interaction: Option<bool>,
    /// Delivery time in unix-epoch milliseconds, same clock domain as the
    /// programmatic window.
    pub timestamp_ms: i64,
}

impl ViewportEvent {
    /// Rejects non-finite or out-of-range payloads before classification
    pub fn is_well_formed(&self) -> bool {
        self.center.is_valid() && self.zoom.map(|z| z.is_finite()).unwrap_or(true)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.center, self.zoom)
    }
}

/// Imperative camera handle exposed by the map renderer.
///
/// `set_camera` only starts the move; the animation completes asynchronously
/// and the resulting viewport-change callbacks arrive later.
pub trait MapRenderer: Send + Sync {
    fn set_camera(&self, target: &CameraTarget);
}
