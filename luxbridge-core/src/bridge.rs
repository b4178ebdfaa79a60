//! Event Bridge — the public API
//!
//! Composes the permission gateway, session controller, and listener
//! registry into the surface applications use:
//!
//! ```no_run
//! use luxbridge_core::bridge::LuxBridge;
//! use luxbridge_core::config::ConfigPatch;
//! use luxbridge_core::permission::StaticGateway;
//! use luxbridge_core::source::mock::MockProvider;
//!
//! let provider = MockProvider::ambient_only();
//! let bridge = LuxBridge::new(Box::new(provider), Box::new(StaticGateway::granted()));
//!
//! let subscription = bridge.add_listener(|measurement| {
//!     println!("{} lux at {}", measurement.lux, measurement.timestamp);
//! });
//!
//! bridge.start(&ConfigPatch::empty().update_interval_ms(500))?;
//! // ... samples flow to the listener, throttled to one per 500ms ...
//! bridge.stop();
//! subscription.remove();
//! # Ok::<(), luxbridge_core::errors::BridgeError>(())
//! ```
//!
//! The bridge is an explicitly owned component — construct one, hold it
//! for the app's lifetime, drop it to tear everything down. There is no
//! hidden process-wide singleton.
//!
//! Listener registration is independent of the session lifecycle:
//! subscriptions survive `stop`/`start` cycles until removed.

use std::sync::Arc;

use crate::config::{BridgeConfig, ConfigPatch};
use crate::controller::SessionController;
use crate::errors::{BridgeError, BridgeResult};
use crate::events::Measurement;
use crate::listeners::{ListenerRegistry, Subscription};
use crate::permission::{PermissionGateway, PermissionResponse};
use crate::source::SourceProvider;
use crate::time::{SystemClock, TimeSource};

/// Rate-limited ambient light measurement bridge
pub struct LuxBridge {
    controller: SessionController,
    gateway: Box<dyn PermissionGateway + Send + Sync>,
    registry: Arc<ListenerRegistry>,
}

impl LuxBridge {
    /// Create a bridge over the host's acquisition and permission
    /// capabilities, timestamping with the system wall clock
    pub fn new(
        provider: Box<dyn SourceProvider + Send>,
        gateway: Box<dyn PermissionGateway + Send + Sync>,
    ) -> Self {
        Self::with_clock(provider, gateway, Arc::new(SystemClock))
    }

    /// Create a bridge with an explicit time source
    ///
    /// Tests inject a [`crate::time::FixedClock`]; hosts without reliable
    /// wall time can use a [`crate::time::MonotonicClock`].
    pub fn with_clock(
        provider: Box<dyn SourceProvider + Send>,
        gateway: Box<dyn PermissionGateway + Send + Sync>,
        clock: Arc<dyn TimeSource + Send + Sync>,
    ) -> Self {
        let registry = Arc::new(ListenerRegistry::new());
        Self {
            controller: SessionController::new(provider, Arc::clone(&registry), clock),
            gateway,
            registry,
        }
    }

    /// Start measuring, or re-apply configuration to a running session
    ///
    /// The permission gateway is consulted first — a not-granted status
    /// fails with [`BridgeError::PermissionDenied`] before any session
    /// state changes. A granted start that cannot open any acquisition
    /// source fails with [`BridgeError::SessionUnavailable`].
    pub fn start(&self, patch: &ConfigPatch) -> BridgeResult<()> {
        let permission = self.gateway.status();
        if !permission.granted {
            return Err(BridgeError::PermissionDenied {
                status: permission.status,
            });
        }

        self.controller.start(patch)
    }

    /// Stop measuring and release the acquisition resource
    ///
    /// Never fails; stopping an idle bridge is a no-op.
    pub fn stop(&self) {
        self.controller.stop();
    }

    /// True iff a session is fully initialized and delivering
    pub fn is_running(&self) -> bool {
        self.controller.is_running()
    }

    /// Query authorization without prompting
    pub fn permissions(&self) -> PermissionResponse {
        self.gateway.status()
    }

    /// Request authorization, prompting the user if undetermined
    ///
    /// May block pending user interaction on a real platform gateway; no
    /// timeout is imposed here.
    pub fn request_permissions(&self) -> PermissionResponse {
        self.gateway.request()
    }

    /// Register a listener for admitted measurements
    ///
    /// Listeners are invoked in registration order, on the capture
    /// worker's context. The subscription outlives sessions; it is only
    /// ended by [`Subscription::remove`] or
    /// [`remove_all_listeners`](Self::remove_all_listeners).
    pub fn add_listener<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Measurement) + Send + Sync + 'static,
    {
        self.registry.add(callback)
    }

    /// Deregister every listener registered through this bridge
    pub fn remove_all_listeners(&self) {
        self.registry.remove_all();
    }

    /// Snapshot of the effective configuration
    pub fn config(&self) -> BridgeConfig {
        self.controller.config()
    }
}
