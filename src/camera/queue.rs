//! Serializes renderer viewport callbacks into delivery order.
//!
//! The tracker's grace-period and window logic is time-order-sensitive, and
//! some platforms deliver renderer callbacks on arbitrary threads. Events
//! are pushed into a FIFO from wherever the renderer calls back and drained
//! into the tracker from the owning event loop, one at a time.

use crate::camera::stability::{ViewportClass, ViewportStabilityTracker};
use crate::provider::renderer::ViewportEvent;
use crossbeam_channel::{unbounded, Receiver, Sender};

pub struct ViewportEventQueue {
    tx: Sender<ViewportEvent>,
    rx: Receiver<ViewportEvent>,
}

impl ViewportEventQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Enqueues an event; callable from any thread, never blocks.
    pub fn push(&self, event: ViewportEvent) {
        // Send only fails when both ends are dropped, which cannot outlive self
        let _ = self.tx.send(event);
    }

    /// Drains queued events in FIFO order into `tracker`, returning the
    /// classification of each.
    pub fn drain_into(&self, tracker: &ViewportStabilityTracker) -> Vec<ViewportClass> {
        let mut classes = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            classes.push(tracker.on_viewport_changed(&event));
        }
        classes
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for ViewportEventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::gate::CameraGate;
    use crate::camera::FollowStateHandle;
    use crate::core::clock::{ManualClock, SharedClock};
    use crate::core::config::TrackerConfig;
    use crate::core::geo::{CameraTarget, LatLng};
    use crate::provider::renderer::MapRenderer;
    use std::sync::Arc;

    struct NullRenderer;

    impl MapRenderer for NullRenderer {
        fn set_camera(&self, _target: &CameraTarget) {}
    }

    fn tracker() -> ViewportStabilityTracker {
        let follow = FollowStateHandle::new();
        let gate = Arc::new(CameraGate::new(
            Arc::new(NullRenderer),
            follow.clone(),
            Arc::new(ManualClock::new(0)) as SharedClock,
        ));
        ViewportStabilityTracker::new(gate, follow, TrackerConfig::default())
    }

    fn event(lat: f64, at_ms: i64) -> ViewportEvent {
        ViewportEvent {
            center: LatLng::new(lat, -70.65),
            zoom: Some(16.0),
            is_user_interaction: None,
            timestamp_ms: at_ms,
        }
    }

    #[test]
    fn test_fifo_order_preserved() {
        let queue = ViewportEventQueue::new();
        let tracker = tracker();

        queue.push(event(-33.45, 1_000));
        queue.push(event(-33.46, 2_000));
        queue.push(event(-33.46, 3_000));
        assert_eq!(queue.len(), 3);

        let classes = queue.drain_into(&tracker);
        assert_eq!(
            classes,
            vec![
                ViewportClass::Bootstrap,
                ViewportClass::Drift,
                ViewportClass::Noise
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_drain_on_empty_queue() {
        let queue = ViewportEventQueue::new();
        let tracker = tracker();
        assert!(queue.drain_into(&tracker).is_empty());
    }
}
