//! Capture Session Controller
//!
//! ## Overview
//!
//! Owns the lifecycle of the acquisition resource and the capture worker
//! thread that drives the estimate → gate → dispatch pipeline:
//!
//! ```text
//! Idle → Starting → Running → Stopping → Idle
//! ```
//!
//! ## Serialization
//!
//! All `start`/`stop` calls serialize on one lifecycle mutex — the
//! single-operation queue discipline. A caller arriving while a
//! transition is in flight blocks until it settles, then re-evaluates;
//! no caller ever observes a half-made transition, and `stop` issued
//! during a `start` simply runs after it, leaving a clean idle state.
//!
//! The observable state lives in an atomic, so `is_running` is wait-free
//! and callable from anywhere (including the capture worker itself, which
//! autonomously stores `Idle` when the source disappears mid-stream).
//!
//! ## Resource Ownership
//!
//! The opened [`AcquisitionSource`] is moved into the capture worker and
//! released by it on exit — whether the exit was requested (`stop`) or
//! unsolicited (source error). Nothing else ever touches the resource.
//! Release failures are logged, not surfaced: there is no meaningful
//! recovery from a failed close.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};

use crate::config::{BridgeConfig, ConfigPatch};
use crate::constants::CAPTURE_IDLE_BACKOFF_MS;
use crate::errors::{BridgeError, BridgeResult, SourceError};
use crate::estimator::LuxEstimator;
use crate::events::Measurement;
use crate::listeners::ListenerRegistry;
use crate::source::{AcquisitionSource, RawSample, SourceProvider, PREFERRED_SOURCE_ORDER};
use crate::throttle::ThrottleGate;
use crate::time::TimeSource;

/// Session lifecycle state
///
/// `repr(u8)` so the current value can live in an atomic observed from
/// any thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    /// No session; the acquisition resource is released
    Idle = 0,
    /// A `start` is acquiring the resource
    Starting = 1,
    /// The capture worker is delivering samples
    Running = 2,
    /// A `stop` is releasing the resource
    Stopping = 3,
}

impl SessionState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => SessionState::Starting,
            2 => SessionState::Running,
            3 => SessionState::Stopping,
            _ => SessionState::Idle,
        }
    }
}

/// State shared between the controller and the capture worker
struct SharedPipeline {
    config: Mutex<BridgeConfig>,
    gate: Mutex<ThrottleGate>,
}

struct WorkerHandle {
    handle: JoinHandle<()>,
    stop_flag: Arc<AtomicBool>,
}

/// Serialized lifecycle state: the provider and the live worker, if any
struct Lifecycle {
    provider: Box<dyn SourceProvider + Send>,
    worker: Option<WorkerHandle>,
}

/// State machine owning the acquisition session
pub struct SessionController {
    lifecycle: Mutex<Lifecycle>,
    state: Arc<AtomicU8>,
    shared: Arc<SharedPipeline>,
    registry: Arc<ListenerRegistry>,
    clock: Arc<dyn TimeSource + Send + Sync>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SessionController {
    /// Create an idle controller
    ///
    /// Configuration is seeded from defaults here, once; afterwards it
    /// only changes through explicit patches passed to [`start`](Self::start).
    pub fn new(
        provider: Box<dyn SourceProvider + Send>,
        registry: Arc<ListenerRegistry>,
        clock: Arc<dyn TimeSource + Send + Sync>,
    ) -> Self {
        let config = BridgeConfig::default();
        Self {
            lifecycle: Mutex::new(Lifecycle {
                provider,
                worker: None,
            }),
            state: Arc::new(AtomicU8::new(SessionState::Idle as u8)),
            shared: Arc::new(SharedPipeline {
                gate: Mutex::new(ThrottleGate::new(config.update_interval_ms)),
                config: Mutex::new(config),
            }),
            registry,
            clock,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// True iff a session is fully initialized and delivering
    ///
    /// `Starting` and `Stopping` report false: a session is only running
    /// once the resource is acquired and until release begins.
    pub fn is_running(&self) -> bool {
        self.state() == SessionState::Running
    }

    /// Snapshot of the effective configuration
    pub fn config(&self) -> BridgeConfig {
        *lock(&self.shared.config)
    }

    /// Start a session, or re-apply configuration to a running one
    ///
    /// From `Idle`: opens the preferred available source (hardware sensor
    /// first, camera fallback second), resets the throttle gate, spawns
    /// the capture worker, and moves to `Running`. Fails with
    /// [`BridgeError::SessionUnavailable`] when no source opens.
    ///
    /// From `Running`: merges the patch into the effective configuration
    /// in place — no resource reacquisition, no gate reset — and succeeds
    /// immediately.
    ///
    /// Permission is the caller's concern: the bridge checks the gateway
    /// before invoking this.
    pub fn start(&self, patch: &ConfigPatch) -> BridgeResult<()> {
        let mut lifecycle = lock(&self.lifecycle);
        Self::reap_finished_worker(&mut lifecycle);

        if self.state() == SessionState::Running {
            let interval = {
                let mut config = lock(&self.shared.config);
                config.apply(patch);
                config.update_interval_ms
            };
            // Retune only; the sentinel survives config-only updates
            lock(&self.shared.gate).set_interval(interval);
            return Ok(());
        }

        self.state
            .store(SessionState::Starting as u8, Ordering::Release);

        let source = match Self::open_preferred(lifecycle.provider.as_mut()) {
            Ok(source) => source,
            Err(cause) => {
                self.state.store(SessionState::Idle as u8, Ordering::Release);
                return Err(BridgeError::SessionUnavailable { cause });
            }
        };
        debug!("acquisition source opened: {}", source.kind().name());

        let interval = {
            let mut config = lock(&self.shared.config);
            config.apply(patch);
            config.update_interval_ms
        };
        {
            let mut gate = lock(&self.shared.gate);
            gate.set_interval(interval);
            // Fresh session: first valid sample is emitted immediately
            gate.reset();
        }

        let stop_flag = Arc::new(AtomicBool::new(false));
        let worker = CaptureWorker {
            source,
            shared: Arc::clone(&self.shared),
            registry: Arc::clone(&self.registry),
            clock: Arc::clone(&self.clock),
            stop_flag: Arc::clone(&stop_flag),
            state: Arc::clone(&self.state),
        };

        // Running is stored before the worker spawns so the first sample
        // passes the worker's emission gate
        self.state
            .store(SessionState::Running as u8, Ordering::Release);

        let spawned = thread::Builder::new()
            .name("luxbridge-capture".into())
            .spawn(move || worker.run());

        match spawned {
            Ok(handle) => {
                lifecycle.worker = Some(WorkerHandle { handle, stop_flag });
                Ok(())
            }
            Err(_) => {
                // The worker never ran; the source it owned is dropped here
                self.state.store(SessionState::Idle as u8, Ordering::Release);
                Err(BridgeError::SessionUnavailable {
                    cause: SourceError::OpenFailed {
                        reason: "capture worker spawn failed",
                    },
                })
            }
        }
    }

    /// Stop the session and release the acquisition resource
    ///
    /// Idempotent: stopping an idle controller is a no-op. Never fails —
    /// release errors are logged by the worker.
    pub fn stop(&self) {
        let mut lifecycle = lock(&self.lifecycle);
        Self::reap_finished_worker(&mut lifecycle);

        let Some(worker) = lifecycle.worker.take() else {
            self.state.store(SessionState::Idle as u8, Ordering::Release);
            return;
        };

        self.state
            .store(SessionState::Stopping as u8, Ordering::Release);
        worker.stop_flag.store(true, Ordering::Release);
        if worker.handle.join().is_err() {
            warn!("capture worker panicked during shutdown");
        }
        self.state.store(SessionState::Idle as u8, Ordering::Release);
    }

    /// Join a worker that exited on its own (unsolicited source loss)
    fn reap_finished_worker(lifecycle: &mut Lifecycle) {
        let finished = lifecycle
            .worker
            .as_ref()
            .is_some_and(|worker| worker.handle.is_finished());
        if finished {
            if let Some(worker) = lifecycle.worker.take() {
                if worker.handle.join().is_err() {
                    warn!("capture worker panicked before exit");
                }
            }
        }
    }

    /// Open the first available source in preference order
    fn open_preferred(
        provider: &mut (dyn SourceProvider + Send),
    ) -> Result<Box<dyn AcquisitionSource + Send>, SourceError> {
        let available = provider.available();
        let mut last_error = SourceError::NotAvailable;

        for kind in PREFERRED_SOURCE_ORDER {
            if !available.contains(&kind) {
                continue;
            }
            match provider.open(kind) {
                Ok(source) => return Ok(source),
                Err(error) => {
                    warn!("failed to open {}: {}", kind.name(), error);
                    last_error = error;
                }
            }
        }
        Err(last_error)
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The background capture loop
///
/// Exclusively owns the opened source for the lifetime of the session.
struct CaptureWorker {
    source: Box<dyn AcquisitionSource + Send>,
    shared: Arc<SharedPipeline>,
    registry: Arc<ListenerRegistry>,
    clock: Arc<dyn TimeSource + Send + Sync>,
    stop_flag: Arc<AtomicBool>,
    state: Arc<AtomicU8>,
}

impl CaptureWorker {
    fn run(mut self) {
        loop {
            if self.stop_flag.load(Ordering::Acquire) {
                break;
            }

            match self.source.poll_sample() {
                Ok(sample) => self.handle_sample(&sample),
                Err(nb::Error::WouldBlock) => {
                    thread::sleep(Duration::from_millis(CAPTURE_IDLE_BACKOFF_MS));
                }
                Err(nb::Error::Other(error)) => {
                    // Unsolicited loss: release and go idle; the caller
                    // observes this via is_running, never as a thrown
                    // error, and no restart is attempted
                    warn!("acquisition source lost: {}", error);
                    self.release_source();
                    self.state.store(SessionState::Idle as u8, Ordering::Release);
                    return;
                }
            }
        }

        self.release_source();
    }

    fn handle_sample(&mut self, sample: &RawSample) {
        // Emission gate: nothing is delivered while the session is not
        // observably running (and the throttle reference is not consumed)
        if self.state.load(Ordering::Acquire) != SessionState::Running as u8 {
            return;
        }

        let calibration = lock(&self.shared.config).calibration_constant;
        let Some(lux) = LuxEstimator::new(calibration).estimate(sample) else {
            // A single bad frame is not a failure condition
            debug!("sample dropped: no lux estimate");
            return;
        };

        let timestamp = self.clock.now();
        if lock(&self.shared.gate).admit(timestamp) {
            self.registry.dispatch(&Measurement::new(lux, timestamp));
        }
    }

    fn release_source(&mut self) {
        if let Err(error) = self.source.close() {
            warn!("source release failed: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::mock::MockProvider;
    use crate::time::FixedClock;

    fn controller(provider: MockProvider) -> (SessionController, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(1000));
        let registry = Arc::new(ListenerRegistry::new());
        let time: Arc<dyn TimeSource + Send + Sync> = clock.clone();
        let controller = SessionController::new(Box::new(provider), registry, time);
        (controller, clock)
    }

    #[test]
    fn starts_idle() {
        let (controller, _clock) = controller(MockProvider::ambient_only());
        assert_eq!(controller.state(), SessionState::Idle);
        assert!(!controller.is_running());
    }

    #[test]
    fn start_moves_to_running() {
        let (controller, _clock) = controller(MockProvider::ambient_only());

        controller.start(&ConfigPatch::empty()).unwrap();
        assert!(controller.is_running());

        controller.stop();
        assert_eq!(controller.state(), SessionState::Idle);
    }

    #[test]
    fn start_without_any_source_fails() {
        let (controller, _clock) = controller(MockProvider::empty());

        let error = controller.start(&ConfigPatch::empty()).unwrap_err();
        assert_eq!(
            error,
            BridgeError::SessionUnavailable {
                cause: SourceError::NotAvailable
            }
        );
        assert_eq!(controller.state(), SessionState::Idle);
    }

    #[test]
    fn open_failure_reports_cause() {
        let (controller, _clock) = controller(MockProvider::ambient_only().failing_open());

        let error = controller.start(&ConfigPatch::empty()).unwrap_err();
        assert!(matches!(
            error,
            BridgeError::SessionUnavailable {
                cause: SourceError::OpenFailed { .. }
            }
        ));
    }

    #[test]
    fn stop_is_idempotent() {
        let (controller, _clock) = controller(MockProvider::ambient_only());

        controller.stop();
        assert_eq!(controller.state(), SessionState::Idle);

        controller.start(&ConfigPatch::empty()).unwrap();
        controller.stop();
        controller.stop();
        assert_eq!(controller.state(), SessionState::Idle);
    }

    #[test]
    fn start_while_running_reconfigures_without_reopening() {
        let provider = MockProvider::ambient_only();
        let handle = provider.handle();
        let (controller, _clock) = controller(provider);

        controller
            .start(&ConfigPatch::empty().update_interval_ms(500))
            .unwrap();
        assert_eq!(handle.opened(), 1);

        controller
            .start(&ConfigPatch::empty().calibration_constant(1.0))
            .unwrap();
        assert!(controller.is_running());
        // Still the same source: no reacquisition happened
        assert_eq!(handle.opened(), 1);

        let config = controller.config();
        assert_eq!(config.update_interval_ms, 500);
        assert_eq!(config.calibration_constant, 1.0);
    }

    #[test]
    fn configuration_survives_stop() {
        let (controller, _clock) = controller(MockProvider::ambient_only());

        controller
            .start(&ConfigPatch::empty().update_interval_ms(250))
            .unwrap();
        controller.stop();

        // No implicit reset to defaults on the next session
        controller.start(&ConfigPatch::empty()).unwrap();
        assert_eq!(controller.config().update_interval_ms, 250);
        controller.stop();
    }

    #[test]
    fn stop_releases_the_source() {
        let provider = MockProvider::ambient_only();
        let handle = provider.handle();
        let (controller, _clock) = controller(provider);

        controller.start(&ConfigPatch::empty()).unwrap();
        controller.stop();
        assert_eq!(handle.closed(), 1);
    }

    #[test]
    fn camera_fallback_when_no_hardware_sensor() {
        let provider = MockProvider::camera_only();
        let handle = provider.handle();
        let (controller, _clock) = controller(provider);

        controller.start(&ConfigPatch::empty()).unwrap();
        assert!(controller.is_running());
        assert_eq!(handle.opened(), 1);
        controller.stop();
    }

    #[test]
    fn unsolicited_disconnect_goes_idle_without_restart() {
        let provider = MockProvider::ambient_only();
        let handle = provider.handle();
        let (controller, _clock) = controller(provider);

        controller.start(&ConfigPatch::empty()).unwrap();
        handle.disconnect();

        // The worker notices on its next poll and goes idle autonomously
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while controller.is_running() && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(controller.state(), SessionState::Idle);
        assert_eq!(handle.closed(), 1);
        assert_eq!(handle.opened(), 1); // no automatic reopen
    }

    #[test]
    fn restart_after_disconnect_opens_a_fresh_source() {
        let provider = MockProvider::ambient_only();
        let handle = provider.handle();
        let (controller, _clock) = controller(provider);

        controller.start(&ConfigPatch::empty()).unwrap();
        handle.disconnect();

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while controller.is_running() && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }

        controller.start(&ConfigPatch::empty()).unwrap();
        assert!(controller.is_running());
        assert_eq!(handle.opened(), 2);
        controller.stop();
    }
}
