//! Light Level Helpers
//!
//! Passive helpers over the measurement stream: coarse banding of a lux
//! value and day/night discrimination with hysteresis. Neither touches
//! the capture pipeline; they are conveniences for consumers that react
//! to ambient light rather than display it.

use crate::constants::{BRIGHT_MAX_LUX, DARK_MAX_LUX, DIM_MAX_LUX, INDOOR_MAX_LUX};

/// Coarse illuminance band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LightLevel {
    /// Moonlight, unlit rooms (< 10 lux)
    Dark,
    /// Hallways, mood lighting (10-100 lux)
    Dim,
    /// Offices, living rooms (100-1000 lux)
    Indoor,
    /// Overcast daylight, studio light (1000-10000 lux)
    Bright,
    /// Direct daylight (> 10000 lux)
    Daylight,
}

impl LightLevel {
    /// Classify a lux value
    ///
    /// Non-finite or negative inputs clamp to `Dark`; the estimator never
    /// produces them, but raw caller-supplied values might.
    pub fn from_lux(lux: f32) -> Self {
        if !lux.is_finite() || lux < DARK_MAX_LUX {
            LightLevel::Dark
        } else if lux < DIM_MAX_LUX {
            LightLevel::Dim
        } else if lux < INDOOR_MAX_LUX {
            LightLevel::Indoor
        } else if lux < BRIGHT_MAX_LUX {
            LightLevel::Bright
        } else {
            LightLevel::Daylight
        }
    }

    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            LightLevel::Dark => "dark",
            LightLevel::Dim => "dim",
            LightLevel::Indoor => "indoor",
            LightLevel::Bright => "bright",
            LightLevel::Daylight => "daylight",
        }
    }
}

/// Day/night detector with hysteresis
///
/// Two thresholds prevent flapping around a single boundary: lux must
/// climb above the high threshold to flip to "day" and fall below the low
/// threshold to flip back. Initial values between the two read as night.
#[derive(Debug, Clone)]
pub struct DaylightDetector {
    /// Lux values above this flip the detector to day
    threshold_high: f32,
    /// Lux values below this flip the detector to night
    threshold_low: f32,
    /// Current state, carried across updates
    is_day: bool,
}

impl DaylightDetector {
    /// Create a detector with the given thresholds (`high > low`)
    pub fn new(threshold_high: f32, threshold_low: f32) -> Self {
        Self {
            threshold_high,
            threshold_low,
            is_day: false,
        }
    }

    /// Feed one lux reading and get the updated day/night state
    pub fn update(&mut self, lux: f32) -> bool {
        if !self.is_day && lux > self.threshold_high {
            self.is_day = true;
        } else if self.is_day && lux < self.threshold_low {
            self.is_day = false;
        }
        self.is_day
    }

    /// Current state without feeding a reading
    pub const fn is_day(&self) -> bool {
        self.is_day
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banding() {
        assert_eq!(LightLevel::from_lux(0.5), LightLevel::Dark);
        assert_eq!(LightLevel::from_lux(50.0), LightLevel::Dim);
        assert_eq!(LightLevel::from_lux(400.0), LightLevel::Indoor);
        assert_eq!(LightLevel::from_lux(5_000.0), LightLevel::Bright);
        assert_eq!(LightLevel::from_lux(50_000.0), LightLevel::Daylight);
    }

    #[test]
    fn band_edges() {
        assert_eq!(LightLevel::from_lux(10.0), LightLevel::Dim);
        assert_eq!(LightLevel::from_lux(100.0), LightLevel::Indoor);
        assert_eq!(LightLevel::from_lux(1_000.0), LightLevel::Bright);
        assert_eq!(LightLevel::from_lux(10_000.0), LightLevel::Daylight);
    }

    #[test]
    fn nonsense_reads_as_dark() {
        assert_eq!(LightLevel::from_lux(f32::NAN), LightLevel::Dark);
        assert_eq!(LightLevel::from_lux(-5.0), LightLevel::Dark);
    }

    #[test]
    fn hysteresis_initial_state_is_night() {
        let mut detector = DaylightDetector::new(200.0, 100.0);
        assert!(!detector.is_day());

        // Between thresholds: stays night
        assert!(!detector.update(150.0));
    }

    #[test]
    fn hysteresis_flips_only_past_thresholds() {
        let mut detector = DaylightDetector::new(200.0, 100.0);

        assert!(detector.update(250.0)); // above high -> day
        assert!(detector.update(150.0)); // between -> stays day
        assert!(!detector.update(50.0)); // below low -> night
        assert!(!detector.update(150.0)); // between -> stays night
    }
}
