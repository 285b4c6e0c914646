use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Instant;

/// Abstraction over time sources.
/// Implementations: SystemClock (production), MockClock (testing).
pub trait Clock {
    /// Milliseconds from an arbitrary epoch. Never decreases.
    fn now_ms(&self) -> i64;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}

/// System clock using std::time::Instant.
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        self.start.elapsed().as_millis() as i64
    }
}

/// Manually driven clock for deterministic replay and tests.
/// Share it through an `Arc` to keep control after handing it to the controller.
#[derive(Debug, Default)]
pub struct MockClock {
    current_ms: AtomicI64,
}

impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_time(&self, ms: i64) {
        self.current_ms.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.current_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> i64 {
        self.current_ms.load(Ordering::SeqCst)
    }
}
