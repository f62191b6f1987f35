//! Timing and threshold defaults for the acquisition and camera-follow logic.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Programmatic window granted to an explicit one-shot centering move, in ms.
/// Long enough to cover the camera animation plus the renderer's trailing
/// viewport callbacks.
pub const CENTER_LOCK_MS: i64 = 1_500;

/// Programmatic window granted per follow-mode recentering move, in ms.
/// Must stay shorter than the stream's minimum fix interval so viewport
/// bookkeeping is never starved while following.
pub const FOLLOW_LOCK_MS: i64 = 700;

/// Grace period after a renderer-tagged user gesture during which untagged
/// viewport changes are attributed to trailing momentum, in ms.
pub const USER_GRACE_MS: i64 = 1_200;

/// Minimum center delta (degrees) for a viewport change to count as movement.
pub const CENTER_EPSILON_DEG: f64 = 1e-6;

/// Minimum zoom delta for a viewport change to count as movement.
pub const ZOOM_EPSILON: f64 = 1e-3;

/// Camera animation for explicit centering moves, in ms.
pub const CENTER_ANIMATION_MS: u64 = 600;

/// Zoom applied by the explicit "center on me" and feature-focus moves.
pub const CENTER_ZOOM: f64 = 16.0;

/// Zoom applied when the silent startup resolution seeds the camera.
pub const STARTUP_ZOOM: f64 = 14.0;

/// Zoom for the city-wide fallback view when no position is known at all.
pub const HOME_FALLBACK_ZOOM: f64 = 3.0;

/// Fallback camera center when no position is available: Plaza de Armas,
/// Santiago de Chile (lat, lng).
pub const HOME_FALLBACK: (f64, f64) = (-33.4372, -70.6506);

/// One-shot acquisitions stop early once a fix is at least this accurate.
pub const TARGET_ACCURACY_M: f64 = 30.0;

/// Cached fixes older than this are treated as absent.
pub const CACHE_MAX_AGE_MS: i64 = 20_000;

/// Cached fixes must be at least this accurate to satisfy a one-shot lookup
/// without a live acquisition.
pub const CACHE_ACCURACY_CEILING_M: f64 = 50.0;

/// Continuous fixes looser than this are skipped for follow-camera
/// recentering (looser than the one-shot target; noisy samples are
/// tolerable to drop when the next fix is seconds away).
pub const TRACKING_ACCURACY_CEILING_M: f64 = 100.0;

/// Minimum time between continuous position updates, in ms.
pub const STREAM_MIN_INTERVAL_MS: u64 = 2_000;

/// Minimum movement between continuous position updates, in meters.
pub const STREAM_MIN_DISTANCE_M: f64 = 5.0;

/// Live one-shot acquisition attempts before giving up.
pub const LIVE_ATTEMPTS: u32 = 2;
