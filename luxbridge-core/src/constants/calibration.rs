//! Calibration Constants for Exposure-Based Lux Estimation
//!
//! The camera fallback estimates illuminance from exposure parameters:
//! `lux = C * N^2 / (t * S)` with aperture f-number `N`, exposure time
//! `t` (seconds) and ISO sensitivity `S`. `C` is an empirical scalar
//! tuning the formula to a given camera module.

/// Default calibration constant for the exposure formula.
///
/// Matches typical smartphone camera modules under indoor lighting.
/// Deployments should override per device; see
/// [`CALIBRATION_CONSTANT_MAX`] for the plausible range.
pub const DEFAULT_CALIBRATION_CONSTANT: f32 = 50.0;

/// Lower end of the plausible calibration range.
///
/// Values below this produce lux estimates too dark to be useful on any
/// known camera module.
pub const CALIBRATION_CONSTANT_MIN: f32 = 50.0;

/// Upper end of the plausible calibration range.
///
/// Observed on wide-aperture modules with aggressive ISO ramping.
pub const CALIBRATION_CONSTANT_MAX: f32 = 1200.0;
