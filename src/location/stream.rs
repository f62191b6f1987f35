//! Continuous position subscription with accuracy-based admission filtering.

use crate::core::config::StreamConfig;
use crate::core::geo::GeoFix;
use crate::provider::location::{FixCallback, LocationProvider, WatchHandle, WatchOptions};
use crate::Result;
use std::sync::{Arc, Mutex};

/// Wraps the provider's continuous watch and fans each admitted fix out to
/// two callbacks: `raw` always fires (the "you are here" marker should show
/// the freshest fix), `tracking` fires only for fixes accurate enough to
/// steer the follow camera without jerking it on noisy samples.
pub struct PositionStream {
    provider: Arc<dyn LocationProvider>,
    config: StreamConfig,
}

impl PositionStream {
    pub fn new(provider: Arc<dyn LocationProvider>, config: StreamConfig) -> Self {
        Self { provider, config }
    }

    /// Starts the subscription. Delivery order matches acquisition order:
    /// a fix older than the newest one already delivered is dropped, and
    /// malformed fixes never reach either callback.
    pub fn subscribe(
        &self,
        on_raw: FixCallback,
        on_tracking: FixCallback,
    ) -> Result<StreamSubscription> {
        let ceiling = self.config.tracking_accuracy_ceiling_m;
        let newest_ms = Mutex::new(i64::MIN);

        let handle = self.provider.watch(
            WatchOptions {
                tier: self.config.tier,
                min_interval_ms: self.config.min_interval_ms,
                min_distance_m: self.config.min_distance_m,
            },
            Box::new(move |fix: GeoFix| {
                if !fix.is_valid() {
                    log::warn!("dropping malformed fix from watch");
                    return;
                }
                {
                    let mut newest = match newest_ms.lock() {
                        Ok(guard) => guard,
                        Err(_) => return,
                    };
                    if fix.timestamp_ms < *newest {
                        log::debug!(
                            "dropping out-of-order fix ({} < {})",
                            fix.timestamp_ms,
                            *newest
                        );
                        return;
                    }
                    *newest = fix.timestamp_ms;
                }
                on_raw(fix);
                if fix.meets_accuracy(ceiling) {
                    on_tracking(fix);
                }
            }),
        )?;

        Ok(StreamSubscription { handle })
    }
}

/// Active stream subscription tied to the owning screen's lifetime.
///
/// A stream that outlives its screen is a resource leak and a correctness
/// bug, so teardown is synchronous and also runs on drop.
pub struct StreamSubscription {
    handle: Box<dyn WatchHandle>,
}

impl StreamSubscription {
    pub fn is_active(&self) -> bool {
        self.handle.is_active()
    }

    /// Stops delivery before returning; no callback runs afterwards.
    pub fn unsubscribe(&self) {
        self.handle.stop();
    }
}

impl Drop for StreamSubscription {
    fn drop(&mut self) {
        self.handle.stop();
    }
}
