//! Emission Throttling
//!
//! The acquisition side can produce samples far faster than consumers
//! want them (a camera pipeline delivers 30-60 frames per second; a
//! hardware sensor can report on every tick). The throttle gate enforces
//! the configured floor between emissions:
//!
//! - The first candidate after a fresh session start is always admitted —
//!   there is no warm-up delay.
//! - Afterwards a candidate is admitted iff at least the configured
//!   interval elapsed since the last admitted one.
//! - Candidates with timestamps at or before the last admitted one are
//!   rejected, so the emitted sequence is strictly increasing even if the
//!   clock misbehaves.
//!
//! The sentinel is cleared exactly once per fresh session start.
//! Configuration-only updates retune the interval in place, so shrinking
//! the interval mid-stream never forces an artificial wait.
//!
//! Single-writer: only the capture worker feeds candidates.

use crate::time::Timestamp;

/// Stateful minimum-interval gate over candidate timestamps
#[derive(Debug, Clone)]
pub struct ThrottleGate {
    /// Minimum gap between admitted candidates, in milliseconds
    interval_ms: u64,
    /// Timestamp of the last admitted candidate; `None` means nothing has
    /// been emitted since the last reset
    last_emitted: Option<Timestamp>,
}

impl ThrottleGate {
    /// Create a gate with the given interval, ready to admit the first
    /// candidate immediately
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_emitted: None,
        }
    }

    /// Decide whether a candidate timestamp may be emitted
    ///
    /// On admit, the candidate becomes the new reference point.
    pub fn admit(&mut self, candidate: Timestamp) -> bool {
        let admitted = match self.last_emitted {
            None => true,
            Some(last) => candidate.saturating_sub(last) >= self.interval_ms,
        };

        if admitted {
            self.last_emitted = Some(candidate);
        }
        admitted
    }

    /// Clear the sentinel so the next candidate is admitted immediately
    ///
    /// Called once per fresh session start, never on configuration-only
    /// updates.
    pub fn reset(&mut self) {
        self.last_emitted = None;
    }

    /// Retune the interval without touching the sentinel
    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }

    /// Current interval in milliseconds
    pub const fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}
