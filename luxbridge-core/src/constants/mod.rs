//! Centralized Constants for the Measurement Bridge
//!
//! Every tunable number in the crate lives here with a documented
//! rationale, so deployments can audit what the defaults mean instead of
//! chasing magic numbers through the source.

pub mod calibration;
pub mod light;
pub mod time;

pub use calibration::*;
pub use light::*;
pub use time::*;
