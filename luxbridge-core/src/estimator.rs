//! Lux Estimation
//!
//! ## Overview
//!
//! Normalizes heterogeneous raw inputs into a single lux value:
//!
//! - A hardware illuminance reading is already in lux and passes through
//!   unchanged.
//! - A camera exposure triple is converted photometrically:
//!
//! ```text
//! lux = C * N^2 / (t * S)
//!
//! C = calibration constant (per camera module, see constants::calibration)
//! N = aperture f-number
//! t = exposure time in seconds
//! S = ISO sensitivity
//! ```
//!
//! ## Failure Handling
//!
//! Estimation is per-sample and silent: a frame with missing, zero,
//! negative, or non-finite exposure parameters yields no estimate, and the
//! pipeline simply skips that frame. NaN or infinity must never escape —
//! brighter-than-sun readings from a degenerate `t * S` denominator are
//! rejected the same way.
//!
//! The estimator is pure and stateless; it is safe to call from the
//! capture worker or anywhere else.

use crate::source::RawSample;

/// Stateless lux estimator
///
/// Holds only the calibration constant for the exposure formula; hardware
/// readings bypass it entirely.
#[derive(Debug, Clone, Copy)]
pub struct LuxEstimator {
    calibration_constant: f32,
}

impl LuxEstimator {
    /// Create an estimator with the given calibration constant
    ///
    /// The constant must be finite and positive; configuration merging
    /// guarantees this for values coming from [`crate::config::BridgeConfig`].
    pub const fn new(calibration_constant: f32) -> Self {
        Self {
            calibration_constant,
        }
    }

    /// Current calibration constant
    pub const fn calibration_constant(&self) -> f32 {
        self.calibration_constant
    }

    /// Estimate illuminance for one raw sample
    ///
    /// Returns `None` when no estimate can be produced. Any `Some` value
    /// is finite and non-negative.
    pub fn estimate(&self, sample: &RawSample) -> Option<f32> {
        match *sample {
            RawSample::Illuminance { lux } => (lux.is_finite() && lux >= 0.0).then_some(lux),
            RawSample::Exposure(meta) => {
                let aperture = meta.aperture?;
                let exposure_s = meta.exposure_s?;
                let iso = meta.iso?;

                if !aperture.is_finite() || !exposure_s.is_finite() || !iso.is_finite() {
                    return None;
                }
                if aperture <= 0.0 || exposure_s <= 0.0 || iso <= 0.0 {
                    return None;
                }

                let lux = self.calibration_constant * aperture * aperture / (exposure_s * iso);
                lux.is_finite().then_some(lux)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ExposureMetadata;

    fn exposure(aperture: f32, exposure_s: f32, iso: f32) -> RawSample {
        RawSample::Exposure(ExposureMetadata::new(aperture, exposure_s, iso))
    }

    #[test]
    fn hardware_reading_passes_through() {
        let estimator = LuxEstimator::new(50.0);

        assert_eq!(
            estimator.estimate(&RawSample::Illuminance { lux: 320.5 }),
            Some(320.5)
        );
        assert_eq!(estimator.estimate(&RawSample::Illuminance { lux: 0.0 }), Some(0.0));
    }

    #[test]
    fn hardware_reading_rejects_nonsense() {
        let estimator = LuxEstimator::new(50.0);

        assert_eq!(estimator.estimate(&RawSample::Illuminance { lux: -1.0 }), None);
        assert_eq!(estimator.estimate(&RawSample::Illuminance { lux: f32::NAN }), None);
        assert_eq!(
            estimator.estimate(&RawSample::Illuminance { lux: f32::INFINITY }),
            None
        );
    }

    #[test]
    fn exposure_formula() {
        // C=50, N=2.0, t=0.01s, S=100 -> 50 * 4 / 1 = 200 lux
        let estimator = LuxEstimator::new(50.0);
        let lux = estimator.estimate(&exposure(2.0, 0.01, 100.0)).unwrap();
        assert!((lux - 200.0).abs() < 1e-3);
    }

    #[test]
    fn exposure_rejects_missing_fields() {
        let estimator = LuxEstimator::new(50.0);

        let missing_iso = RawSample::Exposure(ExposureMetadata {
            aperture: Some(2.0),
            exposure_s: Some(0.01),
            iso: None,
        });
        assert_eq!(estimator.estimate(&missing_iso), None);

        let empty = RawSample::Exposure(ExposureMetadata::default());
        assert_eq!(estimator.estimate(&empty), None);
    }

    #[test]
    fn exposure_rejects_nonphysical_inputs() {
        let estimator = LuxEstimator::new(50.0);

        assert_eq!(estimator.estimate(&exposure(0.0, 0.01, 100.0)), None);
        assert_eq!(estimator.estimate(&exposure(2.0, 0.0, 100.0)), None);
        assert_eq!(estimator.estimate(&exposure(2.0, 0.01, -100.0)), None);
        assert_eq!(estimator.estimate(&exposure(f32::NAN, 0.01, 100.0)), None);
    }

    #[test]
    fn degenerate_denominator_never_leaks_infinity() {
        let estimator = LuxEstimator::new(1200.0);
        // Tiny but positive denominator overflows f32 -> must be None,
        // never Some(inf)
        let result = estimator.estimate(&exposure(1.0e18, 1.0e-30, 1.0e-8));
        assert_eq!(result, None);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn formula_is_exact_for_valid_triples(
                aperture in 0.5f32..32.0,
                exposure_s in 1e-6f32..30.0,
                iso in 25.0f32..409_600.0,
                constant in 50.0f32..1200.0,
            ) {
                let estimator = LuxEstimator::new(constant);
                let lux = estimator
                    .estimate(&exposure(aperture, exposure_s, iso))
                    .expect("valid triple must estimate");

                let expected = constant * aperture * aperture / (exposure_s * iso);
                prop_assert!((lux - expected).abs() <= expected.abs() * 1e-6);
                prop_assert!(lux.is_finite());
                prop_assert!(lux >= 0.0);
            }

            #[test]
            fn never_nan_or_infinite(
                aperture in proptest::option::of(-1.0e30f32..1.0e30),
                exposure_s in proptest::option::of(-1.0e30f32..1.0e30),
                iso in proptest::option::of(-1.0e30f32..1.0e30),
            ) {
                let estimator = LuxEstimator::new(50.0);
                let sample = RawSample::Exposure(crate::source::ExposureMetadata {
                    aperture,
                    exposure_s,
                    iso,
                });

                if let Some(lux) = estimator.estimate(&sample) {
                    prop_assert!(lux.is_finite());
                    prop_assert!(lux >= 0.0);
                }
            }
        }
    }
}
