//! Scriptable In-Memory Sources
//!
//! Test doubles for the host acquisition capability: a [`MockProvider`]
//! that opens queue-backed sources, and a [`SourceHandle`] the test holds
//! to feed samples, inject a disconnect, and observe open/close counts.
//!
//! The handle and the opened source share one queue, so samples pushed
//! from the test thread surface on the capture worker's next poll —
//! the same shape as an OS delegate callback handing frames to the
//! session.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::errors::SourceError;

use super::{
    AcquisitionSource, ExposureMetadata, RawSample, SourceKind, SourceProvider, MAX_SOURCES,
};

#[derive(Default)]
struct HubState {
    samples: Mutex<VecDeque<RawSample>>,
    disconnect: AtomicBool,
    opened: AtomicUsize,
    closed: AtomicUsize,
    opened_kinds: Mutex<Vec<SourceKind>>,
}

impl HubState {
    fn queue(&self) -> std::sync::MutexGuard<'_, VecDeque<RawSample>> {
        self.samples.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Test-side handle to a [`MockProvider`]'s sample queue
#[derive(Clone)]
pub struct SourceHandle {
    hub: Arc<HubState>,
}

impl SourceHandle {
    /// Queue a raw sample for the next poll
    pub fn push(&self, sample: RawSample) {
        self.hub.queue().push_back(sample);
    }

    /// Queue a hardware illuminance reading
    pub fn push_illuminance(&self, lux: f32) {
        self.push(RawSample::Illuminance { lux });
    }

    /// Queue a camera exposure triple
    pub fn push_exposure(&self, aperture: f32, exposure_s: f32, iso: f32) {
        self.push(RawSample::Exposure(ExposureMetadata::new(
            aperture, exposure_s, iso,
        )));
    }

    /// Make the next poll report an unrecoverable disconnect
    pub fn disconnect(&self) {
        self.hub.disconnect.store(true, Ordering::Release);
    }

    /// How many sources have been opened so far
    pub fn opened(&self) -> usize {
        self.hub.opened.load(Ordering::Acquire)
    }

    /// How many sources have been closed so far
    pub fn closed(&self) -> usize {
        self.hub.closed.load(Ordering::Acquire)
    }

    /// Samples queued but not yet polled
    pub fn pending(&self) -> usize {
        self.hub.queue().len()
    }

    /// Which kinds were opened, in order
    pub fn opened_kinds(&self) -> Vec<SourceKind> {
        self.hub
            .opened_kinds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Provider opening queue-backed sources of the configured kinds
pub struct MockProvider {
    kinds: heapless::Vec<SourceKind, MAX_SOURCES>,
    hub: Arc<HubState>,
    fail_open: bool,
}

impl MockProvider {
    /// Provider reporting the given kinds as available
    pub fn with_kinds(kinds: &[SourceKind]) -> Self {
        let mut available = heapless::Vec::new();
        for kind in kinds {
            // MAX_SOURCES bounds the list; extra kinds are ignored
            available.push(*kind).ok();
        }
        Self {
            kinds: available,
            hub: Arc::new(HubState::default()),
            fail_open: false,
        }
    }

    /// Provider with only the hardware ambient sensor
    pub fn ambient_only() -> Self {
        Self::with_kinds(&[SourceKind::AmbientSensor])
    }

    /// Provider with only the camera exposure fallback
    pub fn camera_only() -> Self {
        Self::with_kinds(&[SourceKind::CameraExposure])
    }

    /// Provider with no sources at all
    pub fn empty() -> Self {
        Self::with_kinds(&[])
    }

    /// Make every `open` fail even for available kinds
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Handle for feeding samples and observing lifecycle counters
    pub fn handle(&self) -> SourceHandle {
        SourceHandle {
            hub: Arc::clone(&self.hub),
        }
    }
}

impl SourceProvider for MockProvider {
    fn available(&self) -> heapless::Vec<SourceKind, MAX_SOURCES> {
        self.kinds.clone()
    }

    fn open(&mut self, kind: SourceKind) -> Result<Box<dyn AcquisitionSource + Send>, SourceError> {
        if !self.kinds.contains(&kind) {
            return Err(SourceError::NotAvailable);
        }
        if self.fail_open {
            return Err(SourceError::OpenFailed {
                reason: "injected open failure",
            });
        }

        self.hub.opened.fetch_add(1, Ordering::AcqRel);
        self.hub
            .opened_kinds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(kind);
        Ok(Box::new(MockSource {
            kind,
            hub: Arc::clone(&self.hub),
        }))
    }
}

struct MockSource {
    kind: SourceKind,
    hub: Arc<HubState>,
}

impl AcquisitionSource for MockSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn poll_sample(&mut self) -> nb::Result<RawSample, SourceError> {
        if self.hub.disconnect.swap(false, Ordering::AcqRel) {
            return Err(nb::Error::Other(SourceError::Disconnected));
        }

        match self.hub.queue().pop_front() {
            Some(sample) => Ok(sample),
            None => Err(nb::Error::WouldBlock),
        }
    }

    fn close(&mut self) -> Result<(), SourceError> {
        self.hub.closed.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}
