//! Rate-limited ambient light measurement bridge
//!
//! Exposes lux measurements from a host acquisition capability (hardware
//! photodiode or camera exposure metadata) through a small, thread-safe
//! bridge:
//!
//! - a pure [`estimator`] normalizing heterogeneous raw samples to lux,
//! - a stateful [`throttle`] gate bounding the emission rate,
//! - a [`controller`] state machine owning the session lifecycle,
//! - a [`permission`] gateway folding platform authorization to a stable
//!   tri-state,
//! - a [`bridge`] facade publishing typed measurements to registered
//!   listeners.
//!
//! The estimation and throttling core is `no_std`-compatible; the
//! threaded session runtime sits behind the default `std` feature.
//!
//! ```no_run
//! use luxbridge_core::bridge::LuxBridge;
//! use luxbridge_core::config::ConfigPatch;
//! use luxbridge_core::permission::StaticGateway;
//! use luxbridge_core::source::mock::MockProvider;
//!
//! let bridge = LuxBridge::new(
//!     Box::new(MockProvider::ambient_only()),
//!     Box::new(StaticGateway::granted()),
//! );
//!
//! let _subscription = bridge.add_listener(|m| println!("{} lux", m.lux));
//! bridge.start(&ConfigPatch::empty())?;
//! # Ok::<(), luxbridge_core::errors::BridgeError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod constants;
pub mod errors;
pub mod estimator;
pub mod events;
pub mod light;
pub mod permission;
pub mod source;
pub mod throttle;
pub mod time;

#[cfg(feature = "std")]
pub mod bridge;
#[cfg(feature = "std")]
pub mod controller;
#[cfg(feature = "std")]
pub mod listeners;

// Public API
pub use config::{BridgeConfig, ConfigPatch};
pub use errors::{BridgeError, BridgeResult, SourceError};
pub use estimator::LuxEstimator;
pub use events::Measurement;
pub use light::{DaylightDetector, LightLevel};
pub use permission::{PermissionGateway, PermissionResponse, PermissionStatus};
pub use source::{AcquisitionSource, ExposureMetadata, RawSample, SourceKind, SourceProvider};
pub use throttle::ThrottleGate;
pub use time::{TimeSource, Timestamp};

#[cfg(feature = "std")]
pub use bridge::LuxBridge;
#[cfg(feature = "std")]
pub use controller::{SessionController, SessionState};
#[cfg(feature = "std")]
pub use listeners::{ListenerRegistry, Subscription};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
