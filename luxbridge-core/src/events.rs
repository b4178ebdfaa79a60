//! Measurement Event Type
//!
//! The bridge emits exactly one event shape: an illuminance reading with
//! the timestamp at which it was admitted by the throttle gate. Events are
//! produced once per accepted sample and never mutated afterwards.

use crate::time::Timestamp;

/// A single admitted illuminance measurement
///
/// `lux` is finite and non-negative by construction: the estimator refuses
/// to produce anything else, and nothing downstream modifies the value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measurement {
    /// Illuminance in lux
    pub lux: f32,

    /// When the sample was admitted, in milliseconds
    pub timestamp: Timestamp,
}

impl Measurement {
    /// Create a new measurement
    pub const fn new(lux: f32, timestamp: Timestamp) -> Self {
        Self { lux, timestamp }
    }
}
