//! Single authority for issuing programmatic camera moves.
//!
//! Every camera move in the crate goes through the gate; nothing else calls
//! `MapRenderer::set_camera`. The gate both decides whether a move is
//! permitted and records the time window during which the renderer's
//! resulting viewport callbacks are attributed to code rather than to the
//! user. A window (rather than an in-flight counter) tolerates renderers
//! that batch or debounce callbacks, where one logical move fires several.

use crate::camera::FollowStateHandle;
use crate::core::clock::SharedClock;
use crate::core::geo::CameraTarget;
use crate::provider::renderer::MapRenderer;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy)]
struct ProgrammaticWindow {
    valid_until_ms: i64,
}

impl Default for ProgrammaticWindow {
    fn default() -> Self {
        // Closed for every timestamp until the first move opens it
        Self {
            valid_until_ms: i64::MIN,
        }
    }
}

pub struct CameraGate {
    renderer: Arc<dyn MapRenderer>,
    follow: FollowStateHandle,
    clock: SharedClock,
    window: Mutex<ProgrammaticWindow>,
}

impl CameraGate {
    pub fn new(renderer: Arc<dyn MapRenderer>, follow: FollowStateHandle, clock: SharedClock) -> Self {
        Self {
            renderer,
            follow,
            clock,
            window: Mutex::new(ProgrammaticWindow::default()),
        }
    }

    /// Requests a programmatic camera move.
    ///
    /// Applied when `force` is set or follow mode is active; suppressed
    /// otherwise, so background logic (a late network response, a stale
    /// resolution) can never recenter a map the user is exploring. Returns
    /// whether the move reached the renderer. The camera animation itself
    /// completes asynchronously; callers must not assume the target
    /// viewport is reached when this returns.
    pub fn request_move(&self, target: CameraTarget, lock_ms: i64, force: bool) -> bool {
        if !force && !self.follow.is_following() {
            log::debug!(
                "suppressed unforced camera move to ({:.5}, {:.5})",
                target.center.lat,
                target.center.lng
            );
            return false;
        }

        // Extend before poking the renderer so a synchronously delivered
        // viewport callback already sees the window. A later move may only
        // extend, never shorten, what an earlier move granted.
        if let Ok(mut window) = self.window.lock() {
            let candidate = self.clock.now_ms().saturating_add(lock_ms.max(0));
            window.valid_until_ms = window.valid_until_ms.max(candidate);
        }

        self.renderer.set_camera(&target);
        true
    }

    /// Whether `at_ms` falls inside the current programmatic window.
    pub fn in_programmatic_window(&self, at_ms: i64) -> bool {
        self.window
            .lock()
            .map(|window| at_ms <= window.valid_until_ms)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::FollowState;
    use crate::core::clock::ManualClock;
    use crate::core::geo::LatLng;

    struct RecordingRenderer {
        moves: Mutex<Vec<CameraTarget>>,
    }

    impl RecordingRenderer {
        fn new() -> Self {
            Self {
                moves: Mutex::new(Vec::new()),
            }
        }

        fn move_count(&self) -> usize {
            self.moves.lock().unwrap().len()
        }
    }

    impl MapRenderer for RecordingRenderer {
        fn set_camera(&self, target: &CameraTarget) {
            self.moves.lock().unwrap().push(*target);
        }
    }

    fn gate_fixture(now_ms: i64) -> (Arc<RecordingRenderer>, FollowStateHandle, Arc<ManualClock>, CameraGate) {
        let renderer = Arc::new(RecordingRenderer::new());
        let follow = FollowStateHandle::new();
        let clock = Arc::new(ManualClock::new(now_ms));
        let gate = CameraGate::new(
            renderer.clone() as Arc<dyn MapRenderer>,
            follow.clone(),
            clock.clone() as SharedClock,
        );
        (renderer, follow, clock, gate)
    }

    fn target() -> CameraTarget {
        CameraTarget::new(LatLng::new(-33.45, -70.65)).with_zoom(16.0)
    }

    #[test]
    fn test_unforced_move_suppressed_in_free_roam() {
        let (renderer, _follow, _clock, gate) = gate_fixture(1_000);

        assert!(!gate.request_move(target(), 700, false));
        assert_eq!(renderer.move_count(), 0);
        assert!(!gate.in_programmatic_window(1_000));
    }

    #[test]
    fn test_forced_move_always_applies() {
        let (renderer, _follow, _clock, gate) = gate_fixture(1_000);

        assert!(gate.request_move(target(), 700, true));
        assert_eq!(renderer.move_count(), 1);
        assert!(gate.in_programmatic_window(1_700));
        assert!(!gate.in_programmatic_window(1_701));
    }

    #[test]
    fn test_unforced_move_applies_while_following() {
        let (renderer, follow, _clock, gate) = gate_fixture(1_000);
        follow.set(FollowState::Following);

        assert!(gate.request_move(target(), 700, false));
        assert_eq!(renderer.move_count(), 1);
    }

    #[test]
    fn test_consecutive_moves_extend_never_shorten() {
        let (_renderer, _follow, clock, gate) = gate_fixture(1_000);

        gate.request_move(target(), 700, true);
        clock.set(1_300);
        gate.request_move(target(), 700, true);

        // Extended to 1_300 + 700, not reset by any shorter grant
        assert!(gate.in_programmatic_window(1_900));
        assert!(gate.in_programmatic_window(2_000));
        assert!(!gate.in_programmatic_window(2_001));
    }

    #[test]
    fn test_shorter_second_lock_keeps_first_window() {
        let (_renderer, _follow, clock, gate) = gate_fixture(1_000);

        gate.request_move(target(), 2_000, true);
        clock.set(1_100);
        gate.request_move(target(), 100, true);

        assert!(gate.in_programmatic_window(3_000));
    }
}
