//! # UpdateWorker: serialized consumer of a component's update queue.
//!
//! Exactly one worker exists per mounted lifetime. It consumes signals one
//! at a time, so `before_update`/`after_update` pairs for different signals
//! never overlap.
//!
//! ## Rules
//! - Per signal: take the state lock, run `before_update`, increment the
//!   update counter, run `after_update`, release, then decrement the
//!   pending count (which wakes `tick` waiters at zero).
//! - Hook panics are caught and reported; the cycle still counts.
//! - The loop exits when the queue is closed **and drained**: signals
//!   already accepted before an unmount are always processed, never
//!   dropped.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};

use super::component::LifecycleState;
use super::hooks::{run_update_hook, Hooks};

/// Unit signal carried by the update queue.
pub(crate) struct UpdateSignal;

/// State shared between a component and its queue consumer.
pub(crate) struct UpdateWorker {
    pub(crate) name: Arc<str>,
    pub(crate) state: Arc<Mutex<LifecycleState>>,
    pub(crate) hooks: Arc<Hooks>,
    pub(crate) pending: watch::Sender<usize>,
}

impl UpdateWorker {
    /// Runs the drain loop until the queue is closed and empty.
    pub(crate) async fn run(self, mut queue: mpsc::Receiver<UpdateSignal>) {
        while let Some(UpdateSignal) = queue.recv().await {
            {
                let mut state = self.state.lock();
                if let Some(before) = &self.hooks.before_update {
                    run_update_hook(&self.name, "before_update", before);
                }
                state.update_counter += 1;
                if let Some(after) = &self.hooks.after_update {
                    run_update_hook(&self.name, "after_update", after);
                }
            }
            self.pending
                .send_modify(|pending| *pending = pending.saturating_sub(1));
        }
        log::debug!("component '{}': update worker stopped", self.name);
    }
}
