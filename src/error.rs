//! Error types used by the component lifecycle.
//!
//! This module defines [`LifecycleError`], raised by mount and update
//! operations. Store subscriber failures are not represented here: a
//! panicking subscriber is isolated per callback and reported through the
//! `log` facade instead of aborting the notification batch.
//!
//! The type provides helper methods (`as_label`, `as_message`) for
//! logging/metrics.

use thiserror::Error;

/// # Errors produced by component lifecycle operations.
///
/// Mount-hook failures are recoverable: the component stays unmounted and the
/// caller may retry [`Component::mount`](crate::Component::mount). Update
/// failures are explicit rather than silent no-ops, so callers can tell a
/// dropped update from an accepted one.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// The mount hook returned an error; the component remains unmounted.
    #[error("mount hook failed: {source}")]
    MountHook {
        /// The error returned by the hook.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An update was requested while no update queue is open (the component
    /// was never mounted, or has been unmounted).
    #[error("component is not mounted")]
    NotMounted,

    /// Non-blocking update was rejected because the queue is at capacity.
    #[error("update queue is full")]
    QueueFull,
}

impl LifecycleError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use lifecell::LifecycleError;
    ///
    /// assert_eq!(LifecycleError::NotMounted.as_label(), "not_mounted");
    /// assert_eq!(LifecycleError::QueueFull.as_label(), "queue_full");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            LifecycleError::MountHook { .. } => "mount_hook_failed",
            LifecycleError::NotMounted => "not_mounted",
            LifecycleError::QueueFull => "queue_full",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            LifecycleError::MountHook { source } => format!("mount hook failed: {source}"),
            LifecycleError::NotMounted => "component is not mounted".to_string(),
            LifecycleError::QueueFull => "update queue is full".to_string(),
        }
    }

    /// Indicates whether the operation is safe to retry as-is.
    ///
    /// Returns `true` for [`LifecycleError::MountHook`] (the hook may succeed
    /// on a later attempt) and [`LifecycleError::QueueFull`] (capacity frees
    /// up as the worker drains). [`LifecycleError::NotMounted`] requires a
    /// successful mount first.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LifecycleError::MountHook { .. } | LifecycleError::QueueFull
        )
    }
}
