//! Configuration for acquisition, streaming and camera-follow tuning.
//!
//! One-shot acquisition budgets come in two presets (the latency-sensitive
//! "quick center" tap and the patient silent startup resolution), kept
//! distinct on purpose; collapsing them is a product decision, not a code
//! cleanup.

use crate::core::constants;
use crate::core::geo::LatLng;
use crate::provider::location::AccuracyTier;
use std::time::Duration;

/// Preset one-shot acquisition budgets.
#[derive(Debug, Clone, PartialEq)]
pub enum AcquisitionProfile {
    /// User-visible "center on me" tap: short per-attempt timeouts.
    QuickCenter,
    /// Silent resolution while the screen loads: can afford to wait.
    Background,
    Custom(AcquisitionBudget),
}

impl AcquisitionProfile {
    pub fn resolve(&self) -> AcquisitionBudget {
        match self {
            Self::QuickCenter => AcquisitionBudget {
                cache_max_age_ms: constants::CACHE_MAX_AGE_MS,
                cache_accuracy_ceiling_m: constants::CACHE_ACCURACY_CEILING_M,
                target_accuracy_m: constants::TARGET_ACCURACY_M,
                live_attempts: constants::LIVE_ATTEMPTS,
                attempt_timeout: Duration::from_secs(4),
                tier: AccuracyTier::High,
            },
            Self::Background => AcquisitionBudget {
                cache_max_age_ms: constants::CACHE_MAX_AGE_MS * 3,
                cache_accuracy_ceiling_m: constants::CACHE_ACCURACY_CEILING_M,
                target_accuracy_m: constants::TARGET_ACCURACY_M,
                live_attempts: constants::LIVE_ATTEMPTS,
                attempt_timeout: Duration::from_secs(12),
                tier: AccuracyTier::Highest,
            },
            Self::Custom(budget) => budget.clone(),
        }
    }
}

impl Default for AcquisitionProfile {
    fn default() -> Self {
        Self::Background
    }
}

/// Accuracy/time budget for a one-shot position resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionBudget {
    /// Cached fixes older than this are treated as absent.
    pub cache_max_age_ms: i64,
    /// Accuracy a cached fix needs to satisfy the lookup without going live.
    pub cache_accuracy_ceiling_m: f64,
    /// Live acquisition stops early once a fix is at least this accurate.
    pub target_accuracy_m: f64,
    /// Live acquisition attempts before giving up.
    pub live_attempts: u32,
    /// Timeout applied to each live attempt individually.
    pub attempt_timeout: Duration,
    pub tier: AccuracyTier,
}

impl Default for AcquisitionBudget {
    fn default() -> Self {
        AcquisitionProfile::default().resolve()
    }
}

/// Continuous subscription tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamConfig {
    pub tier: AccuracyTier,
    /// Minimum time between updates, to bound frequency and battery cost.
    pub min_interval_ms: u64,
    /// Minimum movement between updates, in meters.
    pub min_distance_m: f64,
    /// Fixes looser than this are dropped from the tracking (follow-camera)
    /// stream; the raw stream forwards them regardless.
    pub tracking_accuracy_ceiling_m: f64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            tier: AccuracyTier::Balanced,
            min_interval_ms: constants::STREAM_MIN_INTERVAL_MS,
            min_distance_m: constants::STREAM_MIN_DISTANCE_M,
            tracking_accuracy_ceiling_m: constants::TRACKING_ACCURACY_CEILING_M,
        }
    }
}

/// Viewport-change classification tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Grace period after a tagged gesture during which untagged events are
    /// attributed to trailing momentum, in ms.
    pub user_grace_ms: i64,
    pub center_epsilon_deg: f64,
    pub zoom_epsilon: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            user_grace_ms: constants::USER_GRACE_MS,
            center_epsilon_deg: constants::CENTER_EPSILON_DEG,
            zoom_epsilon: constants::ZOOM_EPSILON,
        }
    }
}

/// Follow-mode camera tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowConfig {
    /// Zoom applied by the seed move that enters follow mode.
    pub seed_zoom: Option<f64>,
    /// Programmatic window for the seed move, in ms.
    pub seed_lock_ms: i64,
    /// Programmatic window per recentering move while following; must stay
    /// shorter than the stream's `min_interval_ms`.
    pub follow_lock_ms: i64,
    pub animation_ms: u64,
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self {
            seed_zoom: Some(constants::CENTER_ZOOM),
            seed_lock_ms: constants::CENTER_LOCK_MS,
            follow_lock_ms: constants::FOLLOW_LOCK_MS,
            animation_ms: constants::CENTER_ANIMATION_MS,
        }
    }
}

/// Top-level configuration for the map screen controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenConfig {
    /// Budget for the silent startup resolution.
    pub startup: AcquisitionProfile,
    /// Budget for the explicit "center on me" tap.
    pub quick: AcquisitionProfile,
    pub stream: StreamConfig,
    pub tracker: TrackerConfig,
    pub follow: FollowConfig,
    /// Zoom for explicit centering and feature-focus moves.
    pub center_zoom: f64,
    /// Zoom when the startup resolution seeds the camera.
    pub startup_zoom: f64,
    /// Camera fallback when no position is known at all.
    pub home_fallback: LatLng,
    pub home_fallback_zoom: f64,
    pub center_animation_ms: u64,
    /// Programmatic window for one-shot centering moves, in ms.
    pub center_lock_ms: i64,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        let (home_lat, home_lng) = constants::HOME_FALLBACK;
        Self {
            startup: AcquisitionProfile::Background,
            quick: AcquisitionProfile::QuickCenter,
            stream: StreamConfig::default(),
            tracker: TrackerConfig::default(),
            follow: FollowConfig::default(),
            center_zoom: constants::CENTER_ZOOM,
            startup_zoom: constants::STARTUP_ZOOM,
            home_fallback: LatLng::new(home_lat, home_lng),
            home_fallback_zoom: constants::HOME_FALLBACK_ZOOM,
            center_animation_ms: constants::CENTER_ANIMATION_MS,
            center_lock_ms: constants::CENTER_LOCK_MS,
        }
    }
}
