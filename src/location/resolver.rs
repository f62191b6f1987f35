//! One-shot acquisition of the best available position under a budget.

use crate::core::clock::SharedClock;
use crate::core::config::AcquisitionBudget;
use crate::core::geo::{pick_better, GeoFix};
use crate::provider::location::LocationProvider;
use crate::{FollowError, Result};
use std::sync::Arc;

/// Resolves a single best-effort position with tiered fallback: cached fix
/// first, then up to N live acquisitions, keeping the most accurate
/// candidate seen and stopping early once the target accuracy is met.
///
/// Pure with respect to shared state: returns a value for the caller to
/// apply, touching nothing but the location subsystem itself.
pub struct PositionResolver {
    provider: Arc<dyn LocationProvider>,
    clock: SharedClock,
}

impl PositionResolver {
    pub fn new(provider: Arc<dyn LocationProvider>, clock: SharedClock) -> Self {
        Self { provider, clock }
    }

    /// Acquires the best available position under `budget`.
    ///
    /// Fails with [`FollowError::PermissionDenied`] when the platform refuses
    /// access (the caller must prompt, never silently retry) and
    /// [`FollowError::Unavailable`] when every attempt times out or errors;
    /// the caller then falls back to whatever coordinate it last displayed.
    pub async fn resolve_best_position(&self, budget: &AcquisitionBudget) -> Result<GeoFix> {
        let mut best: Option<GeoFix> = None;

        let now_ms = self.clock.now_ms();
        match self
            .provider
            .last_known_fix(budget.cache_max_age_ms, budget.cache_accuracy_ceiling_m)
            .await
        {
            Ok(Some(cached)) if cached.is_valid() && cached.age_ms(now_ms) <= budget.cache_max_age_ms => {
                if cached.meets_accuracy(budget.cache_accuracy_ceiling_m) {
                    return Ok(cached);
                }
                // Too loose to satisfy the lookup on its own, but still the
                // floor: the result must never be less accurate than this.
                best = Some(cached);
            }
            Ok(Some(unusable)) => {
                log::debug!(
                    "cached fix unusable (age {}ms), treating as absent",
                    unusable.age_ms(now_ms)
                );
            }
            Ok(None) => {}
            Err(FollowError::PermissionDenied) => return Err(FollowError::PermissionDenied),
            Err(err) => log::debug!("last-known lookup failed: {err}"),
        }

        let mut services_nudged = false;
        let mut attempt = 0;
        while attempt < budget.live_attempts {
            attempt += 1;
            match tokio::time::timeout(budget.attempt_timeout, self.provider.current_fix(budget.tier))
                .await
            {
                Err(_) => log::debug!("live acquisition attempt {attempt} timed out"),
                Ok(Err(FollowError::PermissionDenied)) => {
                    return Err(FollowError::PermissionDenied)
                }
                Ok(Err(FollowError::ServicesDisabled)) if !services_nudged => {
                    services_nudged = true;
                    // The enable nudge does not consume an attempt
                    attempt -= 1;
                    if let Err(err) = self.provider.enable_location_services().await {
                        log::debug!("enable_location_services failed: {err}");
                    }
                }
                Ok(Err(err)) => log::debug!("live acquisition attempt {attempt} failed: {err}"),
                Ok(Ok(fix)) => {
                    if !fix.is_valid() {
                        log::warn!("provider returned malformed fix, ignoring");
                        continue;
                    }
                    best = Some(match best {
                        Some(current) => pick_better(current, fix),
                        None => fix,
                    });
                    if let Some(candidate) = &best {
                        if candidate.meets_accuracy(budget.target_accuracy_m) {
                            break;
                        }
                    }
                }
            }
        }

        best.ok_or_else(|| {
            FollowError::Unavailable("no position acquired within budget".to_string())
        })
    }
}
