pub mod follow;
pub mod gate;
pub mod queue;
pub mod stability;

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Whether the camera continuously recenters on the user's live position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FollowState {
    #[default]
    FreeRoam,
    Following,
}

/// Shared view of the current follow state.
///
/// Written by [`follow::FollowModeController`] (explicit transitions) and by
/// [`stability::ViewportStabilityTracker`] (automatic demotion on a user
/// gesture); read by [`gate::CameraGate`] when deciding whether an unforced
/// move is permitted.
#[derive(Debug, Clone, Default)]
pub struct FollowStateHandle {
    inner: Arc<Mutex<FollowState>>,
}

impl FollowStateHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> FollowState {
        self.inner
            .lock()
            .map(|state| *state)
            .unwrap_or(FollowState::FreeRoam)
    }

    pub fn is_following(&self) -> bool {
        self.get() == FollowState::Following
    }

    pub(crate) fn set(&self, state: FollowState) {
        if let Ok(mut current) = self.inner.lock() {
            *current = state;
        }
    }
}
