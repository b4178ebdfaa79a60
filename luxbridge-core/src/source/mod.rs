//! Acquisition Sources
//!
//! ## Overview
//!
//! The bridge never talks to OS camera pipelines or sensor managers
//! directly — it consumes them through two narrow traits:
//!
//! - [`AcquisitionSource`]: one opened capture resource, polled for raw
//!   samples through `nb` (`WouldBlock` = nothing ready yet, `Other` =
//!   the source is gone).
//! - [`SourceProvider`]: the host capability that enumerates which source
//!   kinds exist and opens one.
//!
//! ## Source Selection
//!
//! Two kinds exist, in strict preference order:
//!
//! 1. [`SourceKind::AmbientSensor`] — a dedicated photodiode reporting
//!    lux directly. More accurate and far cheaper than running a camera
//!    pipeline, so it is always tried first.
//! 2. [`SourceKind::CameraExposure`] — a camera stream whose frames carry
//!    exposure metadata, used to *estimate* lux when no hardware sensor
//!    exists.
//!
//! The controller selects the first kind the provider reports available
//! and is otherwise source-agnostic.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

use crate::errors::SourceError;

#[cfg(feature = "std")]
pub mod mock;

/// Maximum number of source kinds a provider can report
///
/// Bounded so enumeration allocates nothing; two kinds exist today, the
/// headroom covers future variants without an API break.
pub const MAX_SOURCES: usize = 4;

/// Preference order for acquisition: hardware photodiode first, camera
/// exposure estimation strictly as a fallback
pub const PREFERRED_SOURCE_ORDER: [SourceKind; 2] =
    [SourceKind::AmbientSensor, SourceKind::CameraExposure];

/// The underlying hardware capability providing raw readings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SourceKind {
    /// Dedicated ambient light sensor (photodiode)
    AmbientSensor = 0,
    /// Camera pipeline providing per-frame exposure metadata
    CameraExposure = 1,
}

impl SourceKind {
    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            SourceKind::AmbientSensor => "ambient-sensor",
            SourceKind::CameraExposure => "camera-exposure",
        }
    }
}

/// Exposure parameters extracted from camera frame metadata
///
/// Any field the platform failed to report is `None`; the estimator
/// refuses incomplete triples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExposureMetadata {
    /// Aperture f-number
    pub aperture: Option<f32>,
    /// Exposure time in seconds
    pub exposure_s: Option<f32>,
    /// ISO sensitivity
    pub iso: Option<f32>,
}

impl ExposureMetadata {
    /// Fully populated triple
    pub const fn new(aperture: f32, exposure_s: f32, iso: f32) -> Self {
        Self {
            aperture: Some(aperture),
            exposure_s: Some(exposure_s),
            iso: Some(iso),
        }
    }
}

/// Raw input delivered by an acquisition source
///
/// Heterogeneous on purpose: hardware sensors report lux directly, camera
/// sources report exposure metadata that still needs estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawSample {
    /// Hardware-reported illuminance, already in lux
    Illuminance {
        /// Reported value in lux
        lux: f32,
    },
    /// Camera frame exposure parameters
    Exposure(ExposureMetadata),
}

/// One opened capture resource
///
/// Exclusively owned by the capture session controller; nothing else may
/// open or close it. Implementations bridge to the OS capture pipeline or
/// sensor manager.
pub trait AcquisitionSource {
    /// Which kind of source this is
    fn kind(&self) -> SourceKind;

    /// Poll for the next raw sample
    ///
    /// Returns `Err(nb::Error::WouldBlock)` when no sample is ready and
    /// `Err(nb::Error::Other(_))` when the source is unrecoverably gone
    /// (hardware disconnect, pipeline torn down, permission revoked).
    fn poll_sample(&mut self) -> nb::Result<RawSample, SourceError>;

    /// Release the underlying resource
    ///
    /// Best-effort: failures are logged by the caller, not surfaced.
    fn close(&mut self) -> Result<(), SourceError>;
}

/// Host capability that enumerates and opens acquisition sources
pub trait SourceProvider {
    /// Which source kinds exist on this host
    fn available(&self) -> heapless::Vec<SourceKind, MAX_SOURCES>;

    /// Open a source of the given kind
    fn open(&mut self, kind: SourceKind) -> Result<Box<dyn AcquisitionSource + Send>, SourceError>;
}
