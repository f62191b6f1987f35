//! # geofollow
//!
//! Adaptive location acquisition and camera-follow control for interactive
//! maps.
//!
//! The crate reconciles three independent, asynchronously-arriving signals
//! (one-shot "best effort" position lookups, a continuous position-update
//! stream, and map-renderer viewport-change callbacks) into one coherent
//! camera behavior: center on the user without fighting their panning, tell
//! programmatic camera moves apart from gestures using timing heuristics,
//! and support an explicit "follow me" toggle.
//!
//! The map surface itself is owned by an external renderer; platform
//! location services sit behind the [`provider::location::LocationProvider`]
//! trait. Nothing here is persisted: all state lives for the map screen's
//! session and is released on teardown.

pub mod camera;
pub mod core;
pub mod data;
pub mod location;
pub mod prelude;
pub mod provider;
pub mod screen;

pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    clock::{system_clock, Clock, ManualClock, SharedClock, SystemClock},
    config::{
        AcquisitionBudget, AcquisitionProfile, FollowConfig, ScreenConfig, StreamConfig,
        TrackerConfig,
    },
    geo::{pick_better, CameraTarget, GeoFix, LatLng, Viewport},
};

pub use crate::camera::{
    follow::FollowModeController,
    gate::CameraGate,
    queue::ViewportEventQueue,
    stability::{ViewportClass, ViewportStabilityTracker},
    FollowState, FollowStateHandle,
};

pub use crate::location::{
    resolver::PositionResolver,
    stream::{PositionStream, StreamSubscription},
};

pub use crate::provider::{
    location::{
        AccuracyTier, FixCallback, LocationProvider, PermissionStatus, WatchHandle, WatchOptions,
    },
    renderer::{MapRenderer, ViewportEvent},
};

pub use crate::data::features::{parse_point_features, PointFeature};

pub use crate::screen::MapScreenController;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, FollowError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum FollowError {
    /// The user must be prompted; never silently retried.
    #[error("location permission denied")]
    PermissionDenied,

    /// Transient acquisition failure; callers fall back to the last cached
    /// coordinate when one exists.
    #[error("position unavailable: {0}")]
    Unavailable(String),

    /// The platform location subsystem is switched off.
    #[error("location services disabled")]
    ServicesDisabled,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("provider error: {0}")]
    Provider(String),
}

/// Error type alias for convenience
pub type Error = FollowError;
