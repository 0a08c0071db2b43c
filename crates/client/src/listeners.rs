//! Publish/subscribe for store change notifications.
//!
//! The web ancestor of this client broadcast `authChange` and `cartUpdated`
//! DOM events. With no event loop to piggyback on, the stores expose an
//! explicit interface instead: [`Listeners::subscribe`] returns a
//! [`Subscription`] handle, and every mutating store call invokes the current
//! listeners synchronously before returning.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Registry<E> {
    entries: Vec<(u64, Callback<E>)>,
}

/// A set of change listeners for events of type `E`.
pub struct Listeners<E> {
    next_id: AtomicU64,
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            registry: Arc::new(Mutex::new(Registry {
                entries: Vec::new(),
            })),
        }
    }
}

impl<E> Listeners<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; the returned handle unsubscribes it.
    pub fn subscribe(&self, listener: impl Fn(&E) + Send + Sync + 'static) -> Subscription<E> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .push((id, Arc::new(listener)));
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Invoke every listener with `event`, synchronously, in subscription
    /// order.
    ///
    /// The registry lock is released before the callbacks run, so a listener
    /// may subscribe, unsubscribe, or trigger further store mutations.
    pub fn emit(&self, event: &E) {
        let callbacks: Vec<Callback<E>> = self
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();

        for callback in callbacks {
            callback(event);
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle returned by [`Listeners::subscribe`].
///
/// Dropping the handle keeps the listener alive (it belongs to the store);
/// call [`Subscription::unsubscribe`] to remove it.
pub struct Subscription<E> {
    id: u64,
    registry: Weak<Mutex<Registry<E>>>,
}

impl<E> Subscription<E> {
    /// Remove the listener this handle refers to.
    pub fn unsubscribe(self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }
}
