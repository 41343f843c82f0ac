//! # Component runtime configuration.
//!
//! Provides [`Config`], the settings applied to a [`Component`](crate::Component)
//! at build time.
//!
//! Config is used in two ways:
//! 1. **Direct construction**: `Component::new(name)` uses `Config::default()`.
//! 2. **Builder override**: `Component::builder(name).config(cfg).build()`.
//!
//! ## Sentinel values
//! - `queue_capacity = 0` → clamped to 1 by [`Config::queue_capacity_clamped`]
//!   (a zero-capacity queue would reject every update).

/// Configuration for a component's update machinery.
///
/// ## Field semantics
/// - `queue_capacity`: bound of the update queue (min 1; clamped at mount)
///
/// ## Notes
/// Fields are public for flexibility. Prefer the clamped accessor when a
/// valid channel capacity is required.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Capacity of the bounded update queue.
    ///
    /// When this many updates are outstanding, [`Component::update`](crate::Component::update)
    /// blocks until the worker frees a slot (backpressure), and
    /// [`Component::try_update`](crate::Component::try_update) fails with
    /// [`LifecycleError::QueueFull`](crate::LifecycleError::QueueFull).
    pub queue_capacity: usize,
}

impl Config {
    /// Returns the queue capacity clamped to a minimum of 1.
    ///
    /// Mounting uses this value to avoid constructing an invalid channel.
    #[inline]
    pub fn queue_capacity_clamped(&self) -> usize {
        self.queue_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `queue_capacity = 100` (bounds memory while absorbing bursts)
    fn default() -> Self {
        Self { queue_capacity: 100 }
    }
}
