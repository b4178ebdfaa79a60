//! Listener Registry
//!
//! ## Delivery Contract
//!
//! Every admitted measurement is delivered to every registered listener,
//! in registration order, exactly once. Delivery happens on the capture
//! worker thread while registration happens on caller threads, so the
//! registry lives behind a mutex — but callbacks run on an `Arc` snapshot
//! taken under the lock, never while holding it. A listener may therefore
//! register or remove listeners from inside its own callback without
//! deadlocking (the change applies from the next dispatch).
//!
//! ## Isolation
//!
//! A panicking listener must not take down the capture worker or starve
//! later listeners. Each callback runs under `catch_unwind`; panics are
//! logged and swallowed.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use log::error;

use crate::events::Measurement;

type Callback = Box<dyn Fn(&Measurement) + Send + Sync>;

struct ListenerEntry {
    id: u64,
    callback: Callback,
}

/// Ordered registry of measurement listeners
pub struct ListenerRegistry {
    listeners: Mutex<Vec<Arc<ListenerEntry>>>,
    next_id: AtomicU64,
}

impl ListenerRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, Vec<Arc<ListenerEntry>>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a callback; the returned subscription removes exactly it
    pub fn add<F>(self: &Arc<Self>, callback: F) -> Subscription
    where
        F: Fn(&Measurement) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::AcqRel);
        self.entries().push(Arc::new(ListenerEntry {
            id,
            callback: Box::new(callback),
        }));

        Subscription {
            id,
            registry: Arc::downgrade(self),
        }
    }

    /// Deregister every callback
    pub fn remove_all(&self) {
        self.entries().clear();
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Deliver one measurement to all listeners in registration order
    pub fn dispatch(&self, measurement: &Measurement) {
        let snapshot: Vec<Arc<ListenerEntry>> = self.entries().clone();

        for entry in snapshot {
            let delivery = catch_unwind(AssertUnwindSafe(|| (entry.callback)(measurement)));
            if delivery.is_err() {
                error!("measurement listener panicked; continuing delivery");
            }
        }
    }

    fn remove(&self, id: u64) {
        self.entries().retain(|entry| entry.id != id);
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to one registered listener
///
/// `remove` deregisters exactly the callback this subscription was
/// returned for and is idempotent — removing twice, or after
/// `remove_all`, is harmless.
pub struct Subscription {
    id: u64,
    registry: Weak<ListenerRegistry>,
}

impl Subscription {
    /// Deregister the associated callback
    pub fn remove(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}
