//! Time sources for the measurement bridge
//!
//! Provides a clock abstraction so the capture pipeline can be driven by:
//! - The system wall clock (measurement timestamps are ms since epoch)
//! - A monotonic clock (for hosts without reliable wall time)
//! - A fixed, manually-advanced clock (for deterministic tests)
//!
//! The capture worker reads the clock from a background thread while tests
//! and callers advance or inspect it from their own, so every clock here is
//! shareable behind `Arc<dyn TimeSource + Send + Sync>`.

use core::sync::atomic::{AtomicU64, Ordering};

/// Timestamp in milliseconds since epoch (or an arbitrary origin for
/// monotonic and test clocks)
pub type Timestamp = u64;

/// Source of time for the bridge
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Check if this source provides wall clock time (vs monotonic)
    fn is_wall_clock(&self) -> bool;
}

/// System wall clock (requires std)
///
/// This is the default clock for the bridge: emitted measurements carry
/// ms-since-epoch timestamps.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl TimeSource for SystemClock {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime, UNIX_EPOCH};

        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        true
    }
}

/// Monotonic clock anchored at construction time (requires std)
///
/// Never goes backwards, unlike the wall clock under NTP adjustment.
/// Useful on hosts where wall time is unreliable; timestamps are then
/// relative to bridge construction rather than the epoch.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for MonotonicClock {
    fn now(&self) -> Timestamp {
        self.origin.elapsed().as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }
}

/// Fixed time source for testing
///
/// Holds the value in an atomic so a single clock can be advanced by the
/// test thread while the capture worker reads it.
#[derive(Debug, Default)]
pub struct FixedClock {
    timestamp_ms: AtomicU64,
}

impl FixedClock {
    pub fn new(timestamp_ms: Timestamp) -> Self {
        Self {
            timestamp_ms: AtomicU64::new(timestamp_ms),
        }
    }

    /// Set the clock to an absolute timestamp
    pub fn set(&self, timestamp_ms: Timestamp) {
        self.timestamp_ms.store(timestamp_ms, Ordering::Release);
    }

    /// Advance the clock by `ms` milliseconds
    pub fn advance(&self, ms: u64) {
        self.timestamp_ms.fetch_add(ms, Ordering::AcqRel);
    }
}

impl TimeSource for FixedClock {
    fn now(&self) -> Timestamp {
        self.timestamp_ms.load(Ordering::Acquire)
    }

    fn is_wall_clock(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let clock = FixedClock::new(1000);
        assert_eq!(clock.now(), 1000);

        clock.advance(500);
        assert_eq!(clock.now(), 1500);

        clock.set(400);
        assert_eq!(clock.now(), 400);
    }

    #[cfg(feature = "std")]
    #[test]
    fn monotonic_clock_starts_near_zero() {
        let clock = MonotonicClock::new();
        assert!(!clock.is_wall_clock());
        // Freshly constructed, elapsed time is tiny
        assert!(clock.now() < 1000);
    }

    #[cfg(feature = "std")]
    #[test]
    fn system_clock_is_wall_clock() {
        let clock = SystemClock;
        assert!(clock.is_wall_clock());
        // Any plausible wall clock is past 2020-01-01
        assert!(clock.now() > 1_577_836_800_000);
    }
}
