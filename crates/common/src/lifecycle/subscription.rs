//! Disposable subscription handles.
//!
//! A [`Subscription`] owns the teardown for a listener registration (sensor
//! callbacks, change feeds). Teardown runs at most once: on the first
//! explicit [`Subscription::unsubscribe`] or when the handle is dropped,
//! whichever comes first. Holding the handle in a scope is enough to
//! guarantee the listener is removed on every exit path.

use std::fmt;

use parking_lot::Mutex;
use tracing::debug;

type Teardown = Box<dyn FnOnce() + Send>;

/// Handle to an active listener registration.
pub struct Subscription {
    label: &'static str,
    teardown: Mutex<Option<Teardown>>,
}

impl Subscription {
    /// Create a subscription that runs `teardown` when disposed.
    pub fn new<F>(label: &'static str, teardown: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self { label, teardown: Mutex::new(Some(Box::new(teardown))) }
    }

    /// A subscription with nothing to tear down.
    pub fn detached(label: &'static str) -> Self {
        Self { label, teardown: Mutex::new(None) }
    }

    /// Remove the listener.
    ///
    /// Idempotent. Returns `true` only for the call that actually ran the
    /// teardown. The teardown has completed by the time this returns.
    pub fn unsubscribe(&self) -> bool {
        let teardown = self.teardown.lock().take();
        match teardown {
            Some(teardown) => {
                teardown();
                debug!(subscription = self.label, "subscription disposed");
                true
            }
            None => false,
        }
    }

    /// Whether the teardown is still pending.
    pub fn is_active(&self) -> bool {
        self.teardown.lock().is_some()
    }

    /// Label given at construction, for logs.
    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("label", &self.label)
            .field("active", &self.is_active())
            .finish()
    }
}
