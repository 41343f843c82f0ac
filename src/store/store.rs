//! # Store: concurrency-safe value cell with subscriber notification.
//!
//! [`Store`] owns one value of type `T`. Writers go through [`Store::set`] or
//! [`Store::update`]; both mutate the value and snapshot the subscriber
//! registry while holding the store mutex, then fire every snapshotted
//! callback **after** releasing it.
//!
//! ## What it guarantees
//! - A new subscriber observes the current value exactly once, synchronously,
//!   before [`Store::subscribe`] returns.
//! - Per-store total order of mutations: the value passed to each
//!   notification batch is the one installed by the `set`/`update` that
//!   triggered it.
//! - Panics inside subscribers are caught and reported (isolation); the
//!   value and registry are already updated before any callback runs, so
//!   store state never corrupts.
//!
//! ## What it does **not** guarantee
//! - Notification order across subscribers within one batch (registry
//!   iteration order is unspecified).
//! - Delivery ordering between two `set` calls racing from different
//!   threads: callbacks fire outside the lock, so their batches may
//!   interleave.
//!
//! ## Example
//! ```rust
//! use lifecell::Store;
//!
//! let count = Store::new(0);
//! let sub = count.subscribe(|value| println!("count = {value}"));
//! count.update(|current| current + 1);
//! assert_eq!(count.get(), 1);
//! sub.unsubscribe();
//! ```

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;

use super::subscription::{SubscriberId, Subscription};

/// Shared subscriber callback. `Arc` so a registry snapshot is cheap.
type SubscriberFn<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Value plus subscriber registry, guarded by the store mutex.
pub(crate) struct Registry<T> {
    value: T,
    subscribers: HashMap<SubscriberId, SubscriberFn<T>>,
    next_id: u64,
}

impl<T> Registry<T> {
    /// Point-in-time copy of the subscriber set for a notification batch.
    fn snapshot(&self) -> Vec<(SubscriberId, SubscriberFn<T>)> {
        self.subscribers
            .iter()
            .map(|(id, callback)| (*id, Arc::clone(callback)))
            .collect()
    }

    /// Removing an id that is already gone is a no-op.
    pub(crate) fn remove(&mut self, id: SubscriberId) {
        self.subscribers.remove(&id);
    }
}

/// Concurrency-safe value cell with subscriber notification on change.
///
/// Cheap to clone; clones share the same value and registry (the handle holds
/// an `Arc` internally). Designed to be called concurrently from independent
/// writers and subscribers.
pub struct Store<T> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<T> Store<T> {
    /// Creates a store holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                value: initial,
                subscribers: HashMap::new(),
                next_id: 0,
            })),
        }
    }

    /// Number of currently registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().subscribers.len()
    }
}

impl<T: Clone> Store<T> {
    /// Registers `callback` and invokes it once with the current value.
    ///
    /// The registration itself happens under the store mutex; the initial
    /// invocation happens after the mutex is released (a callback that calls
    /// back into the store must not deadlock), but only once the id is
    /// durably registered, so a concurrent `set` at that instant delivers to
    /// the new subscriber too.
    ///
    /// Ids come from a monotonic 64-bit counter and are never reused, even
    /// after unsubscription.
    ///
    /// The returned [`Subscription`] does **not** unsubscribe on drop; call
    /// [`Subscription::unsubscribe`] explicitly.
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription<T> {
        let callback: SubscriberFn<T> = Arc::new(callback);
        let (id, current) = {
            let mut registry = self.registry.lock();
            let id = SubscriberId::new(registry.next_id);
            registry.next_id += 1;
            registry.subscribers.insert(id, Arc::clone(&callback));
            (id, registry.value.clone())
        };
        invoke_guarded(id, &callback, &current);
        Subscription::new(Arc::downgrade(&self.registry), id)
    }

    /// Replaces the held value and notifies all currently registered
    /// subscribers with the new value.
    ///
    /// The value swap and registry snapshot happen atomically under the
    /// store mutex; callbacks fire after it is released. Subscribers added
    /// or removed during the notification pass are not part of the snapshot.
    pub fn set(&self, value: T) {
        let (snapshot, value) = {
            let mut registry = self.registry.lock();
            registry.value = value;
            (registry.snapshot(), registry.value.clone())
        };
        for (id, callback) in &snapshot {
            invoke_guarded(*id, callback, &value);
        }
    }

    /// Transforms the held value with `updater` and notifies as [`Store::set`].
    ///
    /// `updater` receives the pre-update value and is the sole authority for
    /// the new one. It runs while the store mutex is held, so it must not
    /// call back into this store.
    pub fn update(&self, updater: impl FnOnce(&T) -> T) {
        let (snapshot, value) = {
            let mut registry = self.registry.lock();
            registry.value = updater(&registry.value);
            (registry.snapshot(), registry.value.clone())
        };
        for (id, callback) in &snapshot {
            invoke_guarded(*id, callback, &value);
        }
    }

    /// Snapshot of the current value.
    ///
    /// Taken under the store mutex, so reads are never torn with respect to
    /// a concurrent `set`/`update`.
    #[must_use]
    pub fn get(&self) -> T {
        self.registry.lock().value.clone()
    }
}

/// Fires one callback, containing any panic to this subscriber.
fn invoke_guarded<T>(id: SubscriberId, callback: &SubscriberFn<T>, value: &T) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(|| callback(value))) {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        log::error!("store subscriber {id} panicked: {reason}");
    }
}
