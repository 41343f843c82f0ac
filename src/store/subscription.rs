//! Subscriber identity and the unsubscribe handle.
//!
//! [`Subscription`] holds a weak reference to its store's registry: it never
//! keeps a dropped store alive, and unsubscribing after the store is gone is
//! a harmless no-op.

use std::sync::Weak;

use parking_lot::Mutex;

use super::store::Registry;

/// Unique identity of a registered subscriber.
///
/// Drawn from a per-store monotonic 64-bit counter; never reused, even after
/// unsubscription, so long-lived processes cannot confuse an old handle with
/// a newer registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle returned by [`Store::subscribe`](crate::Store::subscribe).
///
/// Dropping the handle does **not** unsubscribe; the registration stays live
/// until [`Subscription::unsubscribe`] is called or the store is dropped.
#[must_use = "dropping a Subscription keeps the subscriber registered; call unsubscribe() to remove it"]
pub struct Subscription<T> {
    registry: Weak<Mutex<Registry<T>>>,
    id: SubscriberId,
}

impl<T> Subscription<T> {
    pub(crate) fn new(registry: Weak<Mutex<Registry<T>>>, id: SubscriberId) -> Self {
        Self { registry, id }
    }

    /// The id this subscription was registered under.
    #[must_use]
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Removes the subscriber from the store.
    ///
    /// Idempotent: calling it twice, or after the store has been dropped,
    /// is a no-op. Once this returns, the callback will not be invoked by
    /// any subsequent `set`/`update`; a notification batch snapshotted
    /// before this call may still be in flight.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().remove(self.id);
        }
    }
}
