//! Wall-clock sources
//!
//! Only the goal cooldown reads wall-clock time. The match takes any `Clock`
//! so tests can drive elapsed time by hand instead of sleeping.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Seconds elapsed since some fixed origin
pub trait Clock {
    fn now_secs(&self) -> f64;
}

/// Real monotonic time, origin at construction
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_secs(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Hand-driven clock; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    micros: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.micros.fetch_add(by.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn set(&self, at: Duration) {
        self.micros.store(at.as_micros() as u64, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> f64 {
        self.micros.load(Ordering::Relaxed) as f64 / 1_000_000.0
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now_secs(&self) -> f64 {
        (**self).now_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        assert_eq!(clock.now_secs(), 0.0);

        handle.advance(Duration::from_millis(1500));
        assert!((clock.now_secs() - 1.5).abs() < 1e-9);

        handle.set(Duration::from_secs(10));
        assert!((clock.now_secs() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_monotonic_clock_starts_near_zero() {
        let clock = MonotonicClock::new();
        let t = clock.now_secs();
        assert!((0.0..1.0).contains(&t));
    }
}
