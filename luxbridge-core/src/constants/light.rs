//! Illuminance Band Thresholds
//!
//! Boundaries for classifying a lux reading into a coarse light level.
//! Bands follow common photometric practice for consumer ambient-light
//! sensors.

/// Upper bound of the "dark" band (lux). Below this: moonlight, unlit rooms.
pub const DARK_MAX_LUX: f32 = 10.0;

/// Upper bound of the "dim" band (lux). Hallways, mood lighting.
pub const DIM_MAX_LUX: f32 = 100.0;

/// Upper bound of the "indoor" band (lux). Offices, living rooms.
pub const INDOOR_MAX_LUX: f32 = 1000.0;

/// Upper bound of the "bright" band (lux). Overcast daylight, studio light.
/// Above this: direct daylight.
pub const BRIGHT_MAX_LUX: f32 = 10_000.0;

/// Ceiling any real ambient sensor reports (direct sunlight).
pub const MAX_SENSOR_LUX: f32 = 120_000.0;
