//! # lifecell
//!
//! **lifecell** provides reactive value stores and component lifecycle
//! primitives for state-push systems (server-driven UIs, dashboards, agents
//! that render from shared state).
//!
//! Two independent, composable building blocks:
//!
//! - [`Store<T>`](Store) — a concurrency-safe value cell. Writers replace or
//!   transform the value; every registered subscriber is notified with each
//!   new value, and a fresh subscriber observes the current value immediately.
//! - [`Component`] — an explicit mount/update/unmount lifecycle with a
//!   bounded update queue drained by a single background worker, plus a
//!   drain-wait primitive ([`Component::tick`]).
//!
//! ## Architecture
//! ### Store
//! ```text
//!   set(v) / update(f)                       subscribe(cb)
//!        │                                        │
//!        ▼                                        ▼
//!   ┌───────────────────────────────────────────────────┐
//!   │ Store<T>:  value + subscriber registry  (mutex)   │
//!   └───────┬───────────────────────────────────────────┘
//!           │ mutate + snapshot registry, release lock
//!           ├──► cb #1(&value)
//!           ├──► cb #2(&value)     (outside the lock, panic-isolated)
//!           └──► cb #N(&value)
//! ```
//!
//! ### Component
//! ```text
//!   update().await ──┐
//!   update().await ──┼──► [bounded queue] ──► UpdateWorker (one per mounted lifetime)
//!   try_update()   ──┘    (backpressure)          │
//!                                                 ▼  per signal, strictly sequential:
//!                                          lock ─► before_update()
//!                                               ─► update_counter += 1
//!                                               ─► after_update()
//!                                        unlock ─► pending -= 1 ──► tick() wakes at 0
//! ```
//!
//! ## Features
//! | Area          | Description                                                 | Key types                                  |
//! |---------------|-------------------------------------------------------------|--------------------------------------------|
//! | **Stores**    | Subscribe to value changes; snapshot reads for rendering.   | [`Store`], [`Subscription`]                |
//! | **Lifecycle** | Idempotent mount/unmount with user-supplied hooks.          | [`Component`], [`ComponentBuilder`]        |
//! | **Updates**   | Serialized update cycles, backpressure, drain waiting.      | [`Component::update`], [`Component::tick`] |
//! | **Errors**    | Typed lifecycle errors with stable labels for logs/metrics. | [`LifecycleError`]                         |
//! | **Config**    | Update queue capacity tuning.                               | [`Config`]                                 |
//!
//! ## Example
//! ```rust
//! use lifecell::{Component, Store};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let count = Store::new(0i64);
//!     let printer = count.subscribe(|value| println!("count = {value}"));
//!
//!     let component = Component::builder("counter")
//!         .on_mount(|| {
//!             println!("mounted");
//!             Ok(None)
//!         })
//!         .after_update(|| println!("update cycle done"))
//!         .build();
//!
//!     component.mount()?;
//!     count.update(|current| current + 1);
//!     component.update().await?;
//!     component.tick().await;
//!
//!     assert_eq!(count.get(), 1);
//!     assert_eq!(component.update_count(), 1);
//!
//!     component.unmount();
//!     printer.unsubscribe();
//!     Ok(())
//! }
//! ```

mod component;
mod config;
mod error;
mod store;

// ---- Public re-exports ----

pub use component::{CleanupFn, Component, ComponentBuilder, HookError, MountHook, UpdateHook};
pub use config::Config;
pub use error::LifecycleError;
pub use store::{Store, SubscriberId, Subscription};
