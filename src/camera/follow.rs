//! Explicit follow-user / free-roam state machine.

use crate::camera::gate::CameraGate;
use crate::camera::{FollowState, FollowStateHandle};
use crate::core::config::FollowConfig;
use crate::core::geo::{CameraTarget, GeoFix};
use std::sync::Arc;

/// Toggles between following the user's live position and free roam, and
/// wires tracking fixes into the camera gate only while following.
///
/// Demotion to free roam also happens automatically when the stability
/// tracker reports a user gesture; without that, a manual pan would be
/// overridden by the next incoming fix and the map would fight the user.
pub struct FollowModeController {
    gate: Arc<CameraGate>,
    state: FollowStateHandle,
    config: FollowConfig,
}

impl FollowModeController {
    pub fn new(gate: Arc<CameraGate>, state: FollowStateHandle, config: FollowConfig) -> Self {
        Self {
            gate,
            state,
            config,
        }
    }

    pub fn state(&self) -> FollowState {
        self.state.get()
    }

    /// Shared handle for components that read or demote the state.
    pub fn handle(&self) -> FollowStateHandle {
        self.state.clone()
    }

    /// Centers on `fix` with a forced move and enters follow mode.
    /// Returns whether the seed move reached the renderer.
    pub fn start_following(&self, fix: &GeoFix) -> bool {
        let mut target = CameraTarget::new(fix.coord).animated(self.config.animation_ms);
        if let Some(zoom) = self.config.seed_zoom {
            target = target.with_zoom(zoom);
        }
        let applied = self.gate.request_move(target, self.config.seed_lock_ms, true);
        self.state.set(FollowState::Following);
        log::debug!("follow mode engaged");
        applied
    }

    pub fn stop_following(&self) {
        if self.state.is_following() {
            log::debug!("follow mode released");
        }
        self.state.set(FollowState::FreeRoam);
    }

    /// Explicit toggle. Entering follow mode needs a seed position; with
    /// none available the state stays `FreeRoam` and the caller should
    /// resolve a position first.
    pub fn toggle(&self, latest_fix: Option<&GeoFix>) -> FollowState {
        match self.state.get() {
            FollowState::Following => {
                self.stop_following();
            }
            FollowState::FreeRoam => {
                if let Some(fix) = latest_fix {
                    self.start_following(fix);
                } else {
                    log::debug!("cannot follow without a known position");
                }
            }
        }
        self.state.get()
    }

    /// Recenters on a tracking-stream fix, but only while following.
    /// The per-fix lock window is short so viewport bookkeeping between
    /// fixes is never starved.
    pub fn on_tracking_fix(&self, fix: &GeoFix) -> bool {
        if !self.state.is_following() {
            return false;
        }
        let target = CameraTarget::new(fix.coord).animated(self.config.animation_ms);
        self.gate
            .request_move(target, self.config.follow_lock_ms, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::{ManualClock, SharedClock};
    use crate::core::geo::LatLng;
    use crate::provider::renderer::MapRenderer;
    use std::sync::Mutex;

    struct RecordingRenderer {
        moves: Mutex<Vec<CameraTarget>>,
    }

    impl RecordingRenderer {
        fn new() -> Self {
            Self {
                moves: Mutex::new(Vec::new()),
            }
        }
    }

    impl MapRenderer for RecordingRenderer {
        fn set_camera(&self, target: &CameraTarget) {
            self.moves.lock().unwrap().push(*target);
        }
    }

    fn controller() -> (Arc<RecordingRenderer>, FollowModeController) {
        let renderer = Arc::new(RecordingRenderer::new());
        let follow = FollowStateHandle::new();
        let gate = Arc::new(CameraGate::new(
            renderer.clone() as Arc<dyn MapRenderer>,
            follow.clone(),
            Arc::new(ManualClock::new(1_000)) as SharedClock,
        ));
        (
            renderer,
            FollowModeController::new(gate, follow, FollowConfig::default()),
        )
    }

    fn fix() -> GeoFix {
        GeoFix::new(-33.45, -70.65, Some(25.0), 1_000)
    }

    #[test]
    fn test_start_following_issues_one_seed_move() {
        let (renderer, controller) = controller();

        assert!(controller.start_following(&fix()));
        assert_eq!(controller.state(), FollowState::Following);

        let moves = renderer.moves.lock().unwrap();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].center, LatLng::new(-33.45, -70.65));
        assert_eq!(moves[0].zoom, FollowConfig::default().seed_zoom);
    }

    #[test]
    fn test_tracking_fix_moves_camera_only_while_following() {
        let (renderer, controller) = controller();

        assert!(!controller.on_tracking_fix(&fix()));
        assert!(renderer.moves.lock().unwrap().is_empty());

        controller.start_following(&fix());
        assert!(controller.on_tracking_fix(&fix()));
        assert_eq!(renderer.moves.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_tracking_moves_preserve_current_zoom() {
        let (renderer, controller) = controller();
        controller.start_following(&fix());
        controller.on_tracking_fix(&fix());

        let moves = renderer.moves.lock().unwrap();
        // Seed move sets zoom; recentering moves leave it alone
        assert!(moves[0].zoom.is_some());
        assert!(moves[1].zoom.is_none());
    }

    #[test]
    fn test_toggle_transitions() {
        let (_renderer, controller) = controller();

        // No seed position: stays in free roam
        assert_eq!(controller.toggle(None), FollowState::FreeRoam);

        let seed = fix();
        assert_eq!(controller.toggle(Some(&seed)), FollowState::Following);
        assert_eq!(controller.toggle(None), FollowState::FreeRoam);
    }

    #[test]
    fn test_stop_following_is_idempotent() {
        let (_renderer, controller) = controller();
        controller.stop_following();
        controller.stop_following();
        assert_eq!(controller.state(), FollowState::FreeRoam);
    }
}
