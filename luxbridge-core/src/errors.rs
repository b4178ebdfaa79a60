//! Error Types for the Measurement Bridge
//!
//! ## Design Philosophy
//!
//! Errors here follow the same constraints as the rest of the crate:
//!
//! 1. **Small Size**: Every variant is a few bytes; errors cross the
//!    session lifecycle hot path and may be stored or copied freely.
//!
//! 2. **No Heap Allocation**: Only `&'static str` reasons, no `String`.
//!
//! 3. **Copy Semantics**: All error enums implement `Copy`.
//!
//! ## Error Categories
//!
//! - [`BridgeError`] — surfaced to callers of [`start`](crate::bridge::LuxBridge::start).
//!   Everything else on the public surface is infallible by contract
//!   (`stop` is best-effort, permission queries always produce a status).
//! - [`SourceError`] — acquisition-source failures. Open failures bubble
//!   up wrapped in `BridgeError::SessionUnavailable`; close failures and
//!   mid-stream disconnects are logged and absorbed by the controller.
//!
//! Per-sample estimation failures (missing or nonsensical exposure
//! metadata) are not errors at all: the sample is dropped and nothing is
//! emitted for that frame.

use crate::permission::PermissionStatus;
use thiserror_no_std::Error;

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors surfaced by the public bridge API
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeError {
    /// Start attempted without granted permission
    ///
    /// Recoverable: request permission and retry.
    #[error("permission not granted (status: {status:?})")]
    PermissionDenied {
        /// Status the gateway reported at the time of the call
        status: PermissionStatus,
    },

    /// No acquisition source could be opened
    ///
    /// Not retried automatically; requires external remediation
    /// (free the hardware, attach a sensor).
    #[error("no acquisition source available: {cause}")]
    SessionUnavailable {
        /// The failure reported by the last source attempted
        cause: SourceError,
    },
}

/// Acquisition-source failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceError {
    /// The requested source kind is not present on this host
    #[error("source not available on this host")]
    NotAvailable,

    /// The source exists but could not be opened
    #[error("source open failed: {reason}")]
    OpenFailed {
        /// Platform-level failure description
        reason: &'static str,
    },

    /// The source was lost mid-stream (hardware unplugged, pipeline torn
    /// down by the OS, permission revoked)
    #[error("source disconnected")]
    Disconnected,

    /// Releasing the source failed
    ///
    /// Logged by the controller, never surfaced: there is no meaningful
    /// recovery from a failed close.
    #[error("source close failed: {reason}")]
    CloseFailed {
        /// Platform-level failure description
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for BridgeError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::PermissionDenied { .. } => defmt::write!(fmt, "permission not granted"),
            Self::SessionUnavailable { .. } => defmt::write!(fmt, "no acquisition source"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SourceError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::NotAvailable => defmt::write!(fmt, "source not available"),
            Self::OpenFailed { reason } => defmt::write!(fmt, "open failed: {}", reason),
            Self::Disconnected => defmt::write!(fmt, "source disconnected"),
            Self::CloseFailed { reason } => defmt::write!(fmt, "close failed: {}", reason),
        }
    }
}
