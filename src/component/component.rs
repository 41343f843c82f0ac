//! # Component: mount/update/unmount lifecycle with a serialized update queue.
//!
//! A [`Component`] starts unmounted. [`Component::mount`] runs the mount
//! hook and starts exactly one background [`UpdateWorker`] bound to a fresh
//! bounded queue; [`Component::update`] enqueues one update cycle;
//! [`Component::tick`] waits until every enqueued cycle has been processed;
//! [`Component::unmount`] runs the cleanup and closes the queue.
//!
//! ## State machine
//! ```text
//!              mount() ok
//! Unmounted ──────────────► Mounted ──┐ mount() while mounted: no-op
//!     ▲  ▲                    │  ▲────┘
//!     │  └── mount() err ─────│  (stays unmounted, error surfaced)
//!     │                       │
//!     └────── unmount() ──────┘  unmount() while unmounted: no-op
//! ```
//!
//! ## Update flow
//! ```text
//! callers (any task/thread):            worker (exactly one per mount):
//!   update().await ──► pending += 1       recv signal
//!                      queue.send ──►     lock: before_update, counter += 1,
//!                      (blocks when             after_update
//!                       queue is full)    unlock, pending -= 1 ──► tick() wakes at 0
//! ```
//!
//! ## Rules
//! - `mount`/`unmount` are idempotent and mutually exclusive; the mount
//!   hook and cleanup run at most once per lifecycle.
//! - `update` after unmount fails with [`LifecycleError::NotMounted`]
//!   rather than silently dropping the request.
//! - Unmount closes the queue but **drains** it: signals accepted before
//!   the unmount are still processed by the departing worker.
//! - Hooks run while the component's internal lock is held; a hook that
//!   calls back into its own component will deadlock.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::LifecycleError;

use super::builder::ComponentBuilder;
use super::hooks::{run_cleanup, CleanupFn, Hooks};
use super::worker::{UpdateSignal, UpdateWorker};

/// Mutable lifecycle state, guarded by the component mutex.
pub(crate) struct LifecycleState {
    pub(crate) mounted: bool,
    pub(crate) cleanup: Option<CleanupFn>,
    pub(crate) update_counter: u64,
}

/// An entity with an explicit mount/update/unmount lifecycle and a
/// serialized background update queue.
///
/// All methods take `&self`; wrap the component in an `Arc` to share it
/// across tasks. The update counter is cumulative across remounts.
pub struct Component {
    name: Arc<str>,
    config: Config,
    hooks: Arc<Hooks>,
    state: Arc<Mutex<LifecycleState>>,
    /// Open side of the update queue. `None` while unmounted; dropping the
    /// sender closes the queue and lets the worker drain out. Kept outside
    /// the state mutex so enqueuing never contends with a running update
    /// cycle.
    queue: RwLock<Option<mpsc::Sender<UpdateSignal>>>,
    /// Count of enqueued-but-unprocessed updates. A watch channel so
    /// `tick` can await the transition to zero instead of polling.
    pending: watch::Sender<usize>,
}

impl Component {
    /// Creates an unmounted component with no hooks and default config.
    pub fn new(name: impl Into<String>) -> Self {
        ComponentBuilder::new(name).build()
    }

    /// Starts building a component with hooks and config.
    pub fn builder(name: impl Into<String>) -> ComponentBuilder {
        ComponentBuilder::new(name)
    }

    pub(crate) fn from_parts(name: String, config: Config, hooks: Hooks) -> Self {
        let (pending, _) = watch::channel(0);
        Self {
            name: name.into(),
            config,
            hooks: Arc::new(hooks),
            state: Arc::new(Mutex::new(LifecycleState {
                mounted: false,
                cleanup: None,
                update_counter: 0,
            })),
            queue: RwLock::new(None),
            pending,
        }
    }

    /// Mounts the component.
    ///
    /// If already mounted, returns `Ok` immediately without re-running the
    /// mount hook. Otherwise runs the hook (if any), stores its cleanup,
    /// opens a fresh bounded update queue, and spawns exactly one
    /// [`UpdateWorker`] for this mounted lifetime.
    ///
    /// On a hook error the component stays unmounted with no worker
    /// started; mounting may be retried.
    ///
    /// Must be called from within a Tokio runtime (the worker is spawned
    /// onto it).
    pub fn mount(&self) -> Result<(), LifecycleError> {
        let mut state = self.state.lock();
        if state.mounted {
            return Ok(());
        }

        if let Some(on_mount) = &self.hooks.on_mount {
            state.cleanup = on_mount().map_err(|source| LifecycleError::MountHook { source })?;
        }

        let (tx, rx) = mpsc::channel(self.config.queue_capacity_clamped());
        let worker = UpdateWorker {
            name: Arc::clone(&self.name),
            state: Arc::clone(&self.state),
            hooks: Arc::clone(&self.hooks),
            pending: self.pending.clone(),
        };
        tokio::spawn(worker.run(rx));

        *self.queue.write() = Some(tx);
        state.mounted = true;
        log::debug!("component '{}': mounted", self.name);
        Ok(())
    }

    /// Enqueues one update cycle.
    ///
    /// Blocks (asynchronously) while the queue is at capacity; that is
    /// backpressure, not an error. Fails with
    /// [`LifecycleError::NotMounted`] when no queue is open.
    pub async fn update(&self) -> Result<(), LifecycleError> {
        let queue = self.open_queue()?;
        self.pending.send_modify(|pending| *pending += 1);
        if queue.send(UpdateSignal).await.is_err() {
            self.pending
                .send_modify(|pending| *pending = pending.saturating_sub(1));
            return Err(LifecycleError::NotMounted);
        }
        Ok(())
    }

    /// Non-blocking variant of [`Component::update`].
    ///
    /// Fails with [`LifecycleError::QueueFull`] instead of waiting when the
    /// queue is at capacity.
    pub fn try_update(&self) -> Result<(), LifecycleError> {
        let queue = self.open_queue()?;
        self.pending.send_modify(|pending| *pending += 1);
        match queue.try_send(UpdateSignal) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.pending
                    .send_modify(|pending| *pending = pending.saturating_sub(1));
                Err(LifecycleError::QueueFull)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.pending
                    .send_modify(|pending| *pending = pending.saturating_sub(1));
                Err(LifecycleError::NotMounted)
            }
        }
    }

    /// Resolves once the pending-update count is next observed at zero.
    ///
    /// Resolves immediately if nothing is pending. Updates enqueued while
    /// waiting extend the wait; updates enqueued after resolution do not
    /// retroactively invalidate it.
    pub async fn tick(&self) {
        let mut pending = self.pending.subscribe();
        // The watch sender lives on `self`, so the wait cannot fail while
        // the component is borrowed.
        let _ = pending.wait_for(|pending| *pending == 0).await;
    }

    /// [`Component::tick`] with cooperative cancellation.
    ///
    /// Returns `true` once pending updates reach zero, `false` if `cancel`
    /// fires first.
    pub async fn tick_with_cancel(&self, cancel: &CancellationToken) -> bool {
        tokio::select! {
            _ = self.tick() => true,
            _ = cancel.cancelled() => false,
        }
    }

    /// Unmounts the component.
    ///
    /// No-op while unmounted. Otherwise runs the cleanup produced at mount
    /// (exactly once), closes the update queue, and flips the mounted flag.
    /// The departing worker drains signals that were already accepted; a
    /// subsequent [`Component::tick`] still resolves once they finish.
    pub fn unmount(&self) {
        let mut state = self.state.lock();
        if !state.mounted {
            return;
        }
        if let Some(cleanup) = state.cleanup.take() {
            run_cleanup(&self.name, cleanup);
        }
        *self.queue.write() = None;
        state.mounted = false;
        log::debug!("component '{}': unmounted", self.name);
    }

    /// Identity label, immutable after construction.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the component is currently mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.state.lock().mounted
    }

    /// Count of update cycles fully processed, cumulative across remounts.
    #[must_use]
    pub fn update_count(&self) -> u64 {
        self.state.lock().update_counter
    }

    /// Count of updates enqueued but not yet processed.
    #[must_use]
    pub fn pending_updates(&self) -> usize {
        *self.pending.borrow()
    }

    fn open_queue(&self) -> Result<mpsc::Sender<UpdateSignal>, LifecycleError> {
        self.queue.read().clone().ok_or(LifecycleError::NotMounted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::time::Duration;

    #[tokio::test]
    async fn test_mount_is_idempotent() {
        let mounts = Arc::new(AtomicUsize::new(0));
        let hook_mounts = Arc::clone(&mounts);
        let component = Component::builder("widget")
            .on_mount(move || {
                hook_mounts.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            })
            .build();

        component.mount().unwrap();
        component.mount().unwrap();

        assert!(component.is_mounted());
        assert_eq!(mounts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_mount_hook_error_leaves_component_unmounted() {
        let component = Component::builder("widget")
            .on_mount(|| Err("backing service unavailable".into()))
            .build();

        let err = component.mount().unwrap_err();
        assert_eq!(err.as_label(), "mount_hook_failed");
        assert!(!component.is_mounted());

        let err = component.update().await.unwrap_err();
        assert_eq!(err.as_label(), "not_mounted");
    }

    #[tokio::test]
    async fn test_unmount_runs_cleanup_exactly_once() {
        let cleanups = Arc::new(AtomicUsize::new(0));
        let hook_cleanups = Arc::clone(&cleanups);
        let component = Component::builder("widget")
            .on_mount(move || {
                let cleanups = Arc::clone(&hook_cleanups);
                Ok(Some(Box::new(move || {
                    cleanups.fetch_add(1, Ordering::SeqCst);
                }) as CleanupFn))
            })
            .build();

        component.mount().unwrap();
        component.unmount();
        component.unmount();

        assert!(!component.is_mounted());
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sequential_updates_counted_after_tick() {
        let component = Component::new("widget");
        component.mount().unwrap();

        for _ in 0..3 {
            component.update().await.unwrap();
        }
        component.tick().await;

        assert_eq!(component.update_count(), 3);
        assert_eq!(component.pending_updates(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_counted_after_tick() {
        let component = Arc::new(Component::new("widget"));
        component.mount().unwrap();

        let mut producers = Vec::new();
        for _ in 0..3 {
            let component = Arc::clone(&component);
            producers.push(tokio::spawn(async move {
                component.update().await.unwrap();
            }));
        }
        for producer in producers {
            producer.await.unwrap();
        }
        component.tick().await;

        assert_eq!(component.update_count(), 3);
        assert_eq!(component.pending_updates(), 0);
    }

    #[tokio::test]
    async fn test_update_hooks_run_in_pairs() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let before_trace = Arc::clone(&trace);
        let after_trace = Arc::clone(&trace);
        let component = Component::builder("widget")
            .before_update(move || before_trace.lock().push("before"))
            .after_update(move || after_trace.lock().push("after"))
            .build();

        component.mount().unwrap();
        component.update().await.unwrap();
        component.update().await.unwrap();
        component.tick().await;

        assert_eq!(*trace.lock(), vec!["before", "after", "before", "after"]);
    }

    #[tokio::test]
    async fn test_update_before_mount_is_rejected() {
        let component = Component::new("widget");
        let err = component.update().await.unwrap_err();
        assert_eq!(err.as_label(), "not_mounted");
        let err = component.try_update().unwrap_err();
        assert_eq!(err.as_label(), "not_mounted");
    }

    #[tokio::test]
    async fn test_update_after_unmount_is_rejected() {
        let component = Component::new("widget");
        component.mount().unwrap();
        component.unmount();

        let err = component.update().await.unwrap_err();
        assert_eq!(err.as_label(), "not_mounted");
    }

    #[tokio::test]
    async fn test_tick_resolves_immediately_when_idle() {
        let component = Component::new("widget");
        component.mount().unwrap();
        tokio::time::timeout(Duration::from_secs(1), component.tick())
            .await
            .expect("tick should resolve with no pending updates");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_try_update_reports_queue_full() {
        // Stall the worker inside before_update so the one-slot queue fills.
        let entry = Arc::new(Barrier::new(2));
        let gate = Arc::new(Barrier::new(2));
        let hook_entry = Arc::clone(&entry);
        let hook_gate = Arc::clone(&gate);
        let component = Component::builder("widget")
            .config(Config { queue_capacity: 1 })
            .before_update(move || {
                hook_entry.wait();
                hook_gate.wait();
            })
            .build();

        component.mount().unwrap();
        component.update().await.unwrap();
        entry.wait(); // worker is now stalled mid-cycle, queue empty
        component.update().await.unwrap(); // fills the single slot

        let err = component.try_update().unwrap_err();
        assert_eq!(err.as_label(), "queue_full");

        gate.wait(); // release the first cycle
        entry.wait();
        gate.wait(); // release the second cycle
        component.tick().await;

        assert_eq!(component.update_count(), 2);
        assert_eq!(component.pending_updates(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_unmount_drains_already_queued_updates() {
        let entry = Arc::new(Barrier::new(2));
        let gate = Arc::new(Barrier::new(2));
        let hook_entry = Arc::clone(&entry);
        let hook_gate = Arc::clone(&gate);
        let component = Arc::new(
            Component::builder("widget")
                .config(Config { queue_capacity: 4 })
                .before_update(move || {
                    hook_entry.wait();
                    hook_gate.wait();
                })
                .build(),
        );

        component.mount().unwrap();
        component.update().await.unwrap();
        entry.wait(); // worker stalled on the first cycle
        for _ in 0..3 {
            component.update().await.unwrap(); // three more signals queued
        }

        // Unmount blocks on the state lock until the worker finishes the
        // current cycle, so run it from another task.
        let unmounter = {
            let component = Arc::clone(&component);
            tokio::spawn(async move { component.unmount() })
        };

        gate.wait(); // first cycle completes
        for _ in 0..3 {
            entry.wait();
            gate.wait(); // queued cycles still processed after the close
        }
        unmounter.await.unwrap();
        component.tick().await;

        assert!(!component.is_mounted());
        assert_eq!(component.update_count(), 4);
        assert_eq!(component.pending_updates(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_tick_with_cancel() {
        let entry = Arc::new(Barrier::new(2));
        let gate = Arc::new(Barrier::new(2));
        let hook_entry = Arc::clone(&entry);
        let hook_gate = Arc::clone(&gate);
        let component = Component::builder("widget")
            .before_update(move || {
                hook_entry.wait();
                hook_gate.wait();
            })
            .build();

        component.mount().unwrap();
        component.update().await.unwrap();
        entry.wait(); // one update permanently pending until released

        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(!component.tick_with_cancel(&cancel).await);

        gate.wait();
        let unforced = CancellationToken::new();
        assert!(component.tick_with_cancel(&unforced).await);
        assert_eq!(component.update_count(), 1);
    }

    #[tokio::test]
    async fn test_remount_opens_a_fresh_queue() {
        let mounts = Arc::new(AtomicUsize::new(0));
        let cleanups = Arc::new(AtomicUsize::new(0));
        let hook_mounts = Arc::clone(&mounts);
        let hook_cleanups = Arc::clone(&cleanups);
        let component = Component::builder("widget")
            .on_mount(move || {
                hook_mounts.fetch_add(1, Ordering::SeqCst);
                let cleanups = Arc::clone(&hook_cleanups);
                Ok(Some(Box::new(move || {
                    cleanups.fetch_add(1, Ordering::SeqCst);
                }) as CleanupFn))
            })
            .build();

        component.mount().unwrap();
        component.update().await.unwrap();
        component.tick().await;
        component.unmount();

        component.mount().unwrap();
        component.update().await.unwrap();
        component.tick().await;

        assert!(component.is_mounted());
        assert_eq!(mounts.load(Ordering::SeqCst), 2);
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);
        // The cycle counter is cumulative across mounts.
        assert_eq!(component.update_count(), 2);

        component.unmount();
        assert_eq!(cleanups.load(Ordering::SeqCst), 2);
    }
}
