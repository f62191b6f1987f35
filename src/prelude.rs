//! Prelude module for common geofollow types and traits
//!
//! Re-exports the most commonly used types for easy importing with
//! `use geofollow::prelude::*;`

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

pub use crate::{Error as FollowError, Result};

pub use std::{
    sync::Arc,
    time::{Duration, Instant},
};
