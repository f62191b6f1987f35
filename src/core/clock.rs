//! Millisecond wall clock behind a trait so window and grace-period
//! arithmetic stays deterministic under test.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of unix-epoch millisecond timestamps.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Shared clock handle passed between components.
pub type SharedClock = Arc<dyn Clock>;

/// System clock backed by `SystemTime`.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
}

/// Convenience constructor for the production clock.
pub fn system_clock() -> SharedClock {
    Arc::new(SystemClock)
}

/// Hand-advanced clock for tests and deterministic replays.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}
