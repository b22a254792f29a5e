//! Monotonic time source injected into the simulation
//!
//! The loop never reads wall-clock time directly; callers hand it a `Clock`
//! so tests can step time deterministically.

use std::cell::Cell;

/// Milliseconds since an arbitrary, fixed origin
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Manually advanced clock for tests and headless runs
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(100.0);
        assert_eq!(clock.now_ms(), 100.0);
        clock.advance(16.0);
        assert_eq!(clock.now_ms(), 116.0);
        clock.set(5.0);
        assert_eq!((&clock).now_ms(), 5.0);
    }
}
