//! Map-screen glue: wires acquisition, streaming, gating and follow logic
//! into the operations the UI layer calls.
//!
//! All state here is process-lifetime, scoped to the screen's active
//! session; nothing is persisted. `teardown` must run when the screen
//! loses focus or unmounts.

use crate::camera::follow::FollowModeController;
use crate::camera::gate::CameraGate;
use crate::camera::queue::ViewportEventQueue;
use crate::camera::stability::{ViewportClass, ViewportStabilityTracker};
use crate::camera::{FollowState, FollowStateHandle};
use crate::core::clock::{system_clock, SharedClock};
use crate::core::config::ScreenConfig;
use crate::core::geo::{CameraTarget, GeoFix, Viewport};
use crate::data::features::PointFeature;
use crate::location::resolver::PositionResolver;
use crate::location::stream::{PositionStream, StreamSubscription};
use crate::provider::location::{LocationProvider, PermissionStatus};
use crate::provider::renderer::{MapRenderer, ViewportEvent};
use crate::{FollowError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub struct MapScreenController {
    provider: Arc<dyn LocationProvider>,
    resolver: PositionResolver,
    stream: PositionStream,
    gate: Arc<CameraGate>,
    tracker: Arc<ViewportStabilityTracker>,
    follow: Arc<FollowModeController>,
    events: ViewportEventQueue,
    config: ScreenConfig,
    /// Cleared by `teardown`; async results landing afterwards are discarded.
    alive: Arc<AtomicBool>,
    /// Best-known coordinate for the "you are here" marker.
    marker: Arc<Mutex<Option<GeoFix>>>,
    subscription: Mutex<Option<StreamSubscription>>,
}

impl MapScreenController {
    pub fn new(
        provider: Arc<dyn LocationProvider>,
        renderer: Arc<dyn MapRenderer>,
        config: ScreenConfig,
    ) -> Self {
        Self::with_clock(provider, renderer, config, system_clock())
    }

    pub fn with_clock(
        provider: Arc<dyn LocationProvider>,
        renderer: Arc<dyn MapRenderer>,
        config: ScreenConfig,
        clock: SharedClock,
    ) -> Self {
        let follow_state = FollowStateHandle::new();
        let gate = Arc::new(CameraGate::new(renderer, follow_state.clone(), clock.clone()));
        let tracker = Arc::new(ViewportStabilityTracker::new(
            gate.clone(),
            follow_state.clone(),
            config.tracker.clone(),
        ));
        let follow = Arc::new(FollowModeController::new(
            gate.clone(),
            follow_state,
            config.follow.clone(),
        ));
        let resolver = PositionResolver::new(provider.clone(), clock);
        let stream = PositionStream::new(provider.clone(), config.stream.clone());

        Self {
            provider,
            resolver,
            stream,
            gate,
            tracker,
            follow,
            events: ViewportEventQueue::new(),
            config,
            alive: Arc::new(AtomicBool::new(true)),
            marker: Arc::new(Mutex::new(None)),
            subscription: Mutex::new(None),
        }
    }

    /// Silent startup: resolves a position in the background, seeds the
    /// marker and the initial camera center, then starts the continuous
    /// stream. Never prompts; with no permission or no position the camera
    /// seeds to the city-wide home fallback instead.
    pub async fn initialize(&self) -> Result<()> {
        let permission = self.provider.request_foreground_permission().await;
        if !self.alive() {
            return Ok(());
        }
        let granted = match permission {
            Ok(PermissionStatus::Granted) => true,
            Ok(PermissionStatus::Denied) => false,
            Err(err) => {
                log::info!("permission request failed: {err}");
                false
            }
        };
        if !granted {
            self.seed_home_fallback();
            return Ok(());
        }

        let resolved = self
            .resolver
            .resolve_best_position(&self.config.startup.resolve())
            .await;
        if !self.alive() {
            log::debug!("screen torn down during startup resolution, discarding result");
            return Ok(());
        }
        match resolved {
            Ok(fix) => {
                self.set_marker(fix);
                let target = CameraTarget::new(fix.coord).with_zoom(self.config.startup_zoom);
                self.gate.request_move(target, self.config.center_lock_ms, true);
            }
            Err(err) => {
                log::info!("startup resolution failed: {err}");
                if self.current_coordinate().is_none() {
                    self.seed_home_fallback();
                }
            }
        }

        self.start_stream()
    }

    /// Explicit "center on me" tap. One-shot; does not enable follow mode.
    ///
    /// `PermissionDenied` means the UI must prompt, without clearing any
    /// coordinate already on screen. Once any coordinate has been shown,
    /// acquisition failures degrade to recentering on it instead of
    /// surfacing an error.
    pub async fn center_on_user(&self) -> Result<()> {
        match self.provider.request_foreground_permission().await? {
            PermissionStatus::Granted => {}
            PermissionStatus::Denied => return Err(FollowError::PermissionDenied),
        }

        let resolved = self
            .resolver
            .resolve_best_position(&self.config.quick.resolve())
            .await;
        if !self.alive() {
            return Ok(());
        }
        let center = match resolved {
            Ok(fix) => {
                self.set_marker(fix);
                fix.coord
            }
            Err(FollowError::PermissionDenied) => return Err(FollowError::PermissionDenied),
            Err(err) => match self.current_coordinate() {
                Some(cached) => {
                    log::info!("quick centering degraded to last known fix: {err}");
                    cached.coord
                }
                None => return Err(err),
            },
        };

        let target = CameraTarget::new(center)
            .with_zoom(self.config.center_zoom)
            .animated(self.config.center_animation_ms);
        self.gate.request_move(target, self.config.center_lock_ms, true);
        Ok(())
    }

    /// "Center on me and follow": seeds follow mode with the freshest known
    /// coordinate, resolving one first when nothing is cached yet.
    pub async fn center_and_follow(&self) -> Result<()> {
        match self.provider.request_foreground_permission().await? {
            PermissionStatus::Granted => {}
            PermissionStatus::Denied => return Err(FollowError::PermissionDenied),
        }

        let fix = match self.current_coordinate() {
            Some(fix) => fix,
            None => {
                let resolved = self
                    .resolver
                    .resolve_best_position(&self.config.quick.resolve())
                    .await;
                if !self.alive() {
                    return Ok(());
                }
                let fix = resolved?;
                self.set_marker(fix);
                fix
            }
        };

        self.follow.start_following(&fix);
        Ok(())
    }

    /// Explicit follow toggle; returns the resulting state.
    pub fn toggle_follow(&self) -> FollowState {
        let latest = self.current_coordinate();
        self.follow.toggle(latest.as_ref())
    }

    pub fn follow_state(&self) -> FollowState {
        self.follow.state()
    }

    /// Best-known coordinate for marker rendering.
    pub fn current_coordinate(&self) -> Option<GeoFix> {
        self.marker.lock().map(|guard| *guard).unwrap_or(None)
    }

    /// Last viewport the stability tracker accepted, if any.
    pub fn stable_viewport(&self) -> Option<Viewport> {
        self.tracker.stable_viewport()
    }

    /// Centers the camera on a tapped marker feature.
    pub fn focus_feature(&self, feature: &PointFeature) -> bool {
        let target = CameraTarget::new(feature.center)
            .with_zoom(self.config.center_zoom)
            .animated(self.config.center_animation_ms);
        self.gate.request_move(target, self.config.center_lock_ms, true)
    }

    /// Enqueues a renderer viewport callback; callable from any thread.
    pub fn handle_viewport_event(&self, event: ViewportEvent) {
        self.events.push(event);
    }

    /// Drains enqueued viewport events into the tracker, in delivery order.
    /// Call from the UI event loop.
    pub fn pump_viewport_events(&self) -> Vec<ViewportClass> {
        self.events.drain_into(&self.tracker)
    }

    /// Releases the stream and marks the screen dead. In-flight one-shot
    /// resolutions are allowed to complete, but their results are discarded.
    /// The stream is unsubscribed before this returns.
    pub fn teardown(&self) {
        self.alive.store(false, Ordering::SeqCst);
        if let Ok(mut slot) = self.subscription.lock() {
            if let Some(subscription) = slot.take() {
                subscription.unsubscribe();
            }
        }
    }

    fn alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    fn set_marker(&self, fix: GeoFix) {
        if let Ok(mut marker) = self.marker.lock() {
            *marker = Some(fix);
        }
    }

    fn seed_home_fallback(&self) {
        let target = CameraTarget::new(self.config.home_fallback)
            .with_zoom(self.config.home_fallback_zoom);
        self.gate.request_move(target, self.config.center_lock_ms, true);
    }

    fn start_stream(&self) -> Result<()> {
        let marker = self.marker.clone();
        let alive_raw = self.alive.clone();
        let alive_tracking = self.alive.clone();
        let follow = self.follow.clone();

        let subscription = self.stream.subscribe(
            Box::new(move |fix| {
                if alive_raw.load(Ordering::SeqCst) {
                    if let Ok(mut current) = marker.lock() {
                        *current = Some(fix);
                    }
                }
            }),
            Box::new(move |fix| {
                if alive_tracking.load(Ordering::SeqCst) {
                    follow.on_tracking_fix(&fix);
                }
            }),
        )?;

        if let Ok(mut slot) = self.subscription.lock() {
            *slot = Some(subscription);
        }
        Ok(())
    }
}
