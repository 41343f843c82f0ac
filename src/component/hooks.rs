//! Lifecycle hook types and panic-guarded invocation.
//!
//! Hooks are plain synchronous closures fixed at build time via
//! [`ComponentBuilder`](crate::ComponentBuilder). They run while the
//! component's internal lock is held, so they must not call back into the
//! component that owns them.

use std::panic::{catch_unwind, AssertUnwindSafe};

/// Error type a mount hook may return.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Cleanup produced by a successful mount hook; invoked once on unmount.
pub type CleanupFn = Box<dyn FnOnce() + Send>;

/// Mount hook: runs once per successful mount, may hand back a cleanup.
pub type MountHook = Box<dyn Fn() -> Result<Option<CleanupFn>, HookError> + Send + Sync>;

/// Hook run by the update worker before/after each update cycle.
pub type UpdateHook = Box<dyn Fn() + Send + Sync>;

/// The hooks a component was built with. Immutable after build; shared with
/// the update worker.
#[derive(Default)]
pub(crate) struct Hooks {
    pub(crate) on_mount: Option<MountHook>,
    pub(crate) before_update: Option<UpdateHook>,
    pub(crate) after_update: Option<UpdateHook>,
}

/// Runs an update hook, containing any panic to this cycle.
pub(crate) fn run_update_hook(component: &str, stage: &str, hook: &UpdateHook) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(|| hook())) {
        log::error!("component '{component}': {stage} hook panicked: {payload:?}");
    }
}

/// Runs a cleanup, containing any panic so unmount always completes.
pub(crate) fn run_cleanup(component: &str, cleanup: CleanupFn) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(cleanup)) {
        log::error!("component '{component}': cleanup panicked: {payload:?}");
    }
}
