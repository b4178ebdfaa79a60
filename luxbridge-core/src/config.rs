//! Bridge Configuration
//!
//! ## Merge Semantics
//!
//! The bridge holds one effective [`BridgeConfig`] for its whole lifetime.
//! It is seeded from documented defaults exactly once (at construction)
//! and only ever changed by explicit [`ConfigPatch`]es passed to `start`:
//!
//! - A patch field that is `None` keeps the previous value.
//! - A patch field that is zero, negative, or non-finite is ignored and
//!   keeps the previous value (nonsensical throttle intervals or
//!   calibration constants must never take effect).
//! - Configuration is never implicitly reset to defaults — starting a new
//!   session after `stop` continues with the last effective values.
//!
//! Changes take effect for the next sample evaluated after the patch is
//! applied, not retroactively.

use crate::constants::{DEFAULT_CALIBRATION_CONSTANT, DEFAULT_UPDATE_INTERVAL_MS};

/// Effective bridge configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BridgeConfig {
    /// Minimum gap between two emitted measurements, in milliseconds.
    /// Always `> 0`.
    pub update_interval_ms: u64,

    /// Empirical scalar for the exposure-based lux formula.
    /// Always finite and `> 0`.
    pub calibration_constant: f32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
            calibration_constant: DEFAULT_CALIBRATION_CONSTANT,
        }
    }
}

impl BridgeConfig {
    /// Apply a partial override, ignoring unset or invalid fields
    pub fn apply(&mut self, patch: &ConfigPatch) {
        if let Some(interval) = patch.update_interval_ms {
            if interval > 0 {
                self.update_interval_ms = interval;
            }
        }

        if let Some(constant) = patch.calibration_constant {
            if constant.is_finite() && constant > 0.0 {
                self.calibration_constant = constant;
            }
        }
    }

    /// Return a copy with the patch applied
    pub fn merged(mut self, patch: &ConfigPatch) -> Self {
        self.apply(patch);
        self
    }
}

/// Partial configuration override supplied to `start`
///
/// Unset fields retain the previous effective value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfigPatch {
    /// New throttle interval in milliseconds, if any
    pub update_interval_ms: Option<u64>,

    /// New calibration constant, if any
    pub calibration_constant: Option<f32>,
}

impl ConfigPatch {
    /// Patch that changes nothing
    pub const fn empty() -> Self {
        Self {
            update_interval_ms: None,
            calibration_constant: None,
        }
    }

    /// Set the throttle interval
    pub fn update_interval_ms(mut self, ms: u64) -> Self {
        self.update_interval_ms = Some(ms);
        self
    }

    /// Set the calibration constant
    pub fn calibration_constant(mut self, constant: f32) -> Self {
        self.calibration_constant = Some(constant);
        self
    }
}
