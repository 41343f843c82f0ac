//! # Reactive value stores.
//!
//! A [`Store`] holds a single value and pushes every change to its
//! subscribers. Registration returns a [`Subscription`] handle whose
//! [`unsubscribe`](Subscription::unsubscribe) is idempotent.
//!
//! ## Architecture
//! ```text
//! Writers (many):                       Subscribers (many):
//!   set(v) ─────┐
//!   update(f) ──┼──► value + registry ──► snapshot ──► cb(&v), cb(&v), ...
//!   set(v) ─────┘      (one mutex)      (fired outside the lock)
//! ```
//!
//! ## Rules
//! - A fresh subscriber is invoked once, synchronously, with the value
//!   current at registration time, before `subscribe` returns.
//! - `set`/`update` fire the subscribers captured in a point-in-time
//!   snapshot; callbacks registered or removed mid-batch may or may not
//!   see that change.
//! - Callbacks run outside the store lock: long-running or reentrant
//!   subscribers never block unrelated store operations.
//! - A panicking subscriber is isolated and reported; the rest of the
//!   batch still runs.

mod store;
mod subscription;

pub use store::Store;
pub use subscription::{SubscriberId, Subscription};
