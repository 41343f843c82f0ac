//! Builder for constructing a [`Component`] with optional hooks.

use crate::config::Config;

use super::component::Component;
use super::hooks::{CleanupFn, HookError, Hooks};

/// Builder for a [`Component`].
///
/// Hooks are fixed at build time; they are shared with the background update
/// worker and cannot be swapped on a live component.
///
/// ## Example
/// ```rust
/// use lifecell::Component;
///
/// let component = Component::builder("sidebar")
///     .on_mount(|| Ok(None))
///     .before_update(|| println!("about to update"))
///     .build();
/// assert_eq!(component.name(), "sidebar");
/// ```
pub struct ComponentBuilder {
    name: String,
    config: Config,
    hooks: Hooks,
}

impl ComponentBuilder {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: Config::default(),
            hooks: Hooks::default(),
        }
    }

    /// Overrides the default [`Config`].
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets the mount hook.
    ///
    /// Runs once per successful [`Component::mount`]; a returned cleanup is
    /// invoked on unmount. Returning an error aborts the mount and leaves
    /// the component unmounted.
    pub fn on_mount<F>(mut self, hook: F) -> Self
    where
        F: Fn() -> Result<Option<CleanupFn>, HookError> + Send + Sync + 'static,
    {
        self.hooks.on_mount = Some(Box::new(hook));
        self
    }

    /// Sets the hook run at the start of every update cycle.
    pub fn before_update<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.hooks.before_update = Some(Box::new(hook));
        self
    }

    /// Sets the hook run at the end of every update cycle.
    pub fn after_update<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.hooks.after_update = Some(Box::new(hook));
        self
    }

    /// Builds the component in the unmounted state.
    #[must_use]
    pub fn build(self) -> Component {
        Component::from_parts(self.name, self.config, self.hooks)
    }
}
