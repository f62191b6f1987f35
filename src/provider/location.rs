//! Boundary trait for the platform location subsystem.
//!
//! The crate never talks to GPS hardware or OS services directly; a platform
//! binding implements [`LocationProvider`] and all provider failures are
//! converted to the crate error taxonomy at this boundary.

use crate::core::geo::GeoFix;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Requested accuracy class for an acquisition or watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccuracyTier {
    Low,
    Balanced,
    High,
    Highest,
}

/// Outcome of a foreground permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Tuning for a continuous watch subscription.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchOptions {
    pub tier: AccuracyTier,
    /// Minimum time between delivered fixes, in ms.
    pub min_interval_ms: u64,
    /// Minimum movement between delivered fixes, in meters.
    pub min_distance_m: f64,
}

/// Callback receiving fixes from a continuous watch.
pub type FixCallback = Box<dyn Fn(GeoFix) + Send + Sync>;

/// Handle to an active continuous watch.
pub trait WatchHandle: Send + Sync {
    fn is_active(&self) -> bool;

    /// Stops delivery synchronously; no fix may arrive after this returns.
    fn stop(&self);
}

/// Platform location services consumed by the resolver and the stream.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn request_foreground_permission(&self) -> Result<PermissionStatus>;

    /// Best cached fix no older than `max_age_ms` and no looser than
    /// `required_accuracy_m`, if the platform has one. The constraints are
    /// advisory for the platform; callers re-check them.
    async fn last_known_fix(
        &self,
        max_age_ms: i64,
        required_accuracy_m: f64,
    ) -> Result<Option<GeoFix>>;

    /// One live acquisition at the given tier. May take arbitrarily long;
    /// callers bound it with their own timeout.
    async fn current_fix(&self, tier: AccuracyTier) -> Result<GeoFix>;

    /// Starts a continuous watch delivering fixes to `on_fix` in
    /// acquisition order.
    fn watch(&self, options: WatchOptions, on_fix: FixCallback) -> Result<Box<dyn WatchHandle>>;

    /// Best-effort attempt to switch the platform location services on.
    async fn enable_location_services(&self) -> Result<()>;
}
