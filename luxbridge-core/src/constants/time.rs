//! Time-Related Constants
//!
//! Intervals and conversion factors used by the throttle gate and the
//! capture worker.

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

// ===== EMISSION THROTTLING =====

/// Default minimum gap between two emitted measurements (milliseconds).
///
/// 2.5 Hz is fast enough for UI brightness adaptation while keeping
/// camera-pipeline hosts from burning battery on redundant frames.
pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 400;

// ===== CAPTURE WORKER =====

/// Sleep applied by the capture worker when the source reports no sample
/// ready (milliseconds).
///
/// Short enough not to add visible latency on top of the throttle
/// interval, long enough to keep an idle poll loop off the CPU.
pub const CAPTURE_IDLE_BACKOFF_MS: u64 = 2;
