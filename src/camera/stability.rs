//! Classifies viewport-change events and tracks the last stable viewport.
//!
//! Gesture-vs-code attribution from timing alone is inherently heuristic;
//! all of the heuristic constants (lock window, grace period, epsilons) are
//! confined to this module and [`crate::camera::gate`] so they stay tunable
//! and testable in isolation from the rest of the screen.

use crate::camera::gate::CameraGate;
use crate::camera::{FollowState, FollowStateHandle};
use crate::core::config::TrackerConfig;
use crate::core::geo::Viewport;
use crate::provider::renderer::ViewportEvent;
use std::sync::{Arc, Mutex};

/// Classification outcome for a single viewport-change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportClass {
    /// Renderer-tagged user gesture; follow mode is demoted.
    UserGesture,
    /// Artifact of a camera move inside the programmatic window.
    Programmatic,
    /// Trailing momentum within the grace period after a gesture.
    GestureMomentum,
    /// First trustworthy viewport observed.
    Bootstrap,
    /// Unexplained but real movement; tracked, never snapped back.
    Drift,
    /// Sub-epsilon jitter; discarded.
    Noise,
    /// Non-finite or out-of-range payload; discarded.
    Malformed,
}

#[derive(Debug, Default)]
struct TrackerState {
    last_user_gesture_ms: Option<i64>,
    stable: Option<Viewport>,
}

/// Consumes viewport-change events in renderer-delivery order and maintains
/// the last viewport considered trustworthy.
pub struct ViewportStabilityTracker {
    gate: Arc<CameraGate>,
    follow: FollowStateHandle,
    config: TrackerConfig,
    state: Mutex<TrackerState>,
}

impl ViewportStabilityTracker {
    pub fn new(gate: Arc<CameraGate>, follow: FollowStateHandle, config: TrackerConfig) -> Self {
        Self {
            gate,
            follow,
            config,
            state: Mutex::new(TrackerState::default()),
        }
    }

    /// The last viewport accepted as stable, if any.
    pub fn stable_viewport(&self) -> Option<Viewport> {
        self.state.lock().map(|state| state.stable).unwrap_or(None)
    }

    /// When the user last touched the map, if ever.
    pub fn last_user_gesture_ms(&self) -> Option<i64> {
        self.state
            .lock()
            .map(|state| state.last_user_gesture_ms)
            .unwrap_or(None)
    }

    /// Processes one viewport-change event. Events must arrive in delivery
    /// order; the grace-period and window rules are time-order-sensitive.
    ///
    /// The tracker is bookkeeping, not enforcement: unexplained drift is
    /// tracked rather than reverted, since snapping an already-moved camera
    /// back produces visible, confusing jumps.
    pub fn on_viewport_changed(&self, event: &ViewportEvent) -> ViewportClass {
        if !event.is_well_formed() {
            log::warn!("dropping malformed viewport event");
            return ViewportClass::Malformed;
        }

        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(_) => return ViewportClass::Malformed,
        };

        // Rule 1: a tagged gesture wins over everything, including an open
        // programmatic window, and demotes follow mode on the spot.
        if event.is_user_interaction == Some(true) {
            state.last_user_gesture_ms = Some(event.timestamp_ms);
            state.stable = Some(event.viewport());
            drop(state);
            if self.follow.is_following() {
                log::debug!("user gesture, leaving follow mode");
                self.follow.set(FollowState::FreeRoam);
            }
            return ViewportClass::UserGesture;
        }

        // Rule 2: inside the window this is an artifact of our own move
        if self.gate.in_programmatic_window(event.timestamp_ms) {
            state.stable = Some(event.viewport());
            return ViewportClass::Programmatic;
        }

        // Rule 3: trailing momentum shortly after a genuine gesture
        if let Some(mark) = state.last_user_gesture_ms {
            if event.timestamp_ms.saturating_sub(mark) <= self.config.user_grace_ms {
                state.stable = Some(event.viewport());
                return ViewportClass::GestureMomentum;
            }
        }

        // Rule 4: nothing to compare against yet
        let Some(stable) = state.stable else {
            state.stable = Some(event.viewport());
            return ViewportClass::Bootstrap;
        };

        // Rule 5: drift vs sub-epsilon jitter. Renderers fire callbacks with
        // sub-pixel deltas on every frame; those are noise, not movement.
        let moved_center = (event.center.lat - stable.center.lat).abs()
            > self.config.center_epsilon_deg
            || (event.center.lng - stable.center.lng).abs() > self.config.center_epsilon_deg;
        let moved_zoom = match (stable.zoom, event.zoom) {
            (Some(old), Some(new)) => (new - old).abs() > self.config.zoom_epsilon,
            _ => false,
        };

        if moved_center || moved_zoom {
            state.stable = Some(event.viewport());
            ViewportClass::Drift
        } else {
            ViewportClass::Noise
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::{ManualClock, SharedClock};
    use crate::core::geo::{CameraTarget, LatLng};
    use crate::provider::renderer::MapRenderer;

    struct NullRenderer;

    impl MapRenderer for NullRenderer {
        fn set_camera(&self, _target: &CameraTarget) {}
    }

    struct Fixture {
        clock: Arc<ManualClock>,
        follow: FollowStateHandle,
        gate: Arc<CameraGate>,
        tracker: ViewportStabilityTracker,
    }

    fn fixture(now_ms: i64) -> Fixture {
        let clock = Arc::new(ManualClock::new(now_ms));
        let follow = FollowStateHandle::new();
        let gate = Arc::new(CameraGate::new(
            Arc::new(NullRenderer),
            follow.clone(),
            clock.clone() as SharedClock,
        ));
        let tracker =
            ViewportStabilityTracker::new(gate.clone(), follow.clone(), TrackerConfig::default());
        Fixture {
            clock,
            follow,
            gate,
            tracker,
        }
    }

    fn event(lat: f64, lng: f64, user: Option<bool>, at_ms: i64) -> ViewportEvent {
        ViewportEvent {
            center: LatLng::new(lat, lng),
            zoom: Some(16.0),
            is_user_interaction: user,
            timestamp_ms: at_ms,
        }
    }

    #[test]
    fn test_user_gesture_demotes_follow_even_inside_window() {
        let f = fixture(1_000);
        f.follow.set(FollowState::Following);
        f.gate
            .request_move(CameraTarget::new(LatLng::new(-33.45, -70.65)), 2_000, true);

        let class = f
            .tracker
            .on_viewport_changed(&event(-33.451, -70.651, Some(true), 1_100));

        assert_eq!(class, ViewportClass::UserGesture);
        assert_eq!(f.follow.get(), FollowState::FreeRoam);
        assert_eq!(f.tracker.last_user_gesture_ms(), Some(1_100));
    }

    #[test]
    fn test_untagged_event_inside_window_is_programmatic() {
        let f = fixture(1_000);
        f.gate
            .request_move(CameraTarget::new(LatLng::new(-33.45, -70.65)), 700, true);

        let class = f
            .tracker
            .on_viewport_changed(&event(-33.45, -70.65, Some(false), 1_400));

        assert_eq!(class, ViewportClass::Programmatic);
        assert!(f.tracker.stable_viewport().is_some());
    }

    #[test]
    fn test_window_extension_covers_late_event() {
        // Two moves at T and T+300 with 700 ms locks: an event at T+900
        // still falls inside the extended window.
        let f = fixture(10_000);
        f.gate
            .request_move(CameraTarget::new(LatLng::new(-33.45, -70.65)), 700, true);
        f.clock.set(10_300);
        f.gate
            .request_move(CameraTarget::new(LatLng::new(-33.46, -70.66)), 700, true);

        let class = f
            .tracker
            .on_viewport_changed(&event(-33.46, -70.66, Some(false), 10_900));

        assert_eq!(class, ViewportClass::Programmatic);
    }

    #[test]
    fn test_grace_period_after_gesture() {
        let f = fixture(1_000);
        f.tracker
            .on_viewport_changed(&event(-33.45, -70.65, Some(true), 1_000));

        // Momentum inside the grace period
        let class = f
            .tracker
            .on_viewport_changed(&event(-33.455, -70.655, Some(false), 2_000));
        assert_eq!(class, ViewportClass::GestureMomentum);

        // Still only one recorded gesture
        assert_eq!(f.tracker.last_user_gesture_ms(), Some(1_000));
    }

    #[test]
    fn test_bootstrap_accepts_first_viewport() {
        let f = fixture(1_000);

        let class = f
            .tracker
            .on_viewport_changed(&event(-33.45, -70.65, None, 5_000));

        assert_eq!(class, ViewportClass::Bootstrap);
        assert_eq!(
            f.tracker.stable_viewport(),
            Some(Viewport::new(LatLng::new(-33.45, -70.65), Some(16.0)))
        );
    }

    #[test]
    fn test_drift_is_tracked_not_reverted() {
        let f = fixture(1_000);
        f.tracker
            .on_viewport_changed(&event(-33.45, -70.65, None, 5_000));

        let class = f
            .tracker
            .on_viewport_changed(&event(-33.48, -70.68, None, 6_000));

        assert_eq!(class, ViewportClass::Drift);
        let stable = f.tracker.stable_viewport().unwrap();
        assert_eq!(stable.center, LatLng::new(-33.48, -70.68));
    }

    #[test]
    fn test_duplicate_event_is_noise() {
        let f = fixture(1_000);
        f.tracker
            .on_viewport_changed(&event(-33.45, -70.65, None, 5_000));

        // Renderer-debounced duplicate: identical coordinates, later timestamp
        let class = f
            .tracker
            .on_viewport_changed(&event(-33.45, -70.65, None, 6_000));

        assert_eq!(class, ViewportClass::Noise);
    }

    #[test]
    fn test_sub_epsilon_jitter_is_noise() {
        let f = fixture(1_000);
        f.tracker
            .on_viewport_changed(&event(-33.45, -70.65, None, 5_000));

        let class = f
            .tracker
            .on_viewport_changed(&event(-33.4500000001, -70.6500000001, None, 6_000));

        assert_eq!(class, ViewportClass::Noise);
    }

    #[test]
    fn test_zoom_only_drift() {
        let f = fixture(1_000);
        f.tracker
            .on_viewport_changed(&event(-33.45, -70.65, None, 5_000));

        let mut shifted = event(-33.45, -70.65, None, 6_000);
        shifted.zoom = Some(12.0);

        assert_eq!(
            f.tracker.on_viewport_changed(&shifted),
            ViewportClass::Drift
        );
    }

    #[test]
    fn test_missing_zoom_never_counts_as_zoom_movement() {
        let f = fixture(1_000);
        f.tracker
            .on_viewport_changed(&event(-33.45, -70.65, None, 5_000));

        let mut no_zoom = event(-33.45, -70.65, None, 6_000);
        no_zoom.zoom = None;

        assert_eq!(
            f.tracker.on_viewport_changed(&no_zoom),
            ViewportClass::Noise
        );
    }

    #[test]
    fn test_malformed_event_dropped() {
        let f = fixture(1_000);

        let class = f
            .tracker
            .on_viewport_changed(&event(f64::NAN, -70.65, None, 5_000));

        assert_eq!(class, ViewportClass::Malformed);
        assert!(f.tracker.stable_viewport().is_none());
    }

    #[test]
    fn test_untagged_event_never_demotes_follow() {
        // A renderer without gesture tagging must not kick the user out of
        // follow mode on unexplained drift.
        let f = fixture(1_000);
        f.follow.set(FollowState::Following);
        f.tracker
            .on_viewport_changed(&event(-33.45, -70.65, None, 5_000));
        f.tracker
            .on_viewport_changed(&event(-33.50, -70.70, None, 6_000));

        assert_eq!(f.follow.get(), FollowState::Following);
    }
}
