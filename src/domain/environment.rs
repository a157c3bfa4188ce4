use async_trait::async_trait;
use std::fmt;

use crate::domain::error::DomainError;
use crate::domain::theme::ResolvedTheme;

/// Callback fired with the new "prefers dark" flag when the host flips its
/// color-scheme preference.
pub type PreferenceCallback = Box<dyn Fn(bool) + Send + Sync>;

/// Host capabilities the settings core depends on.
///
/// Implementations without a UI host report "no signal" (`None` / `false`)
/// instead of failing.
#[async_trait]
pub trait EnvironmentProvider: Send + Sync {
    /// Language tag reported by the host, e.g. `en-US` or `zh_CN`
    fn current_language_tag(&self) -> Option<String>;

    fn prefers_dark_mode(&self) -> bool;

    /// Register for preference-change notifications. Fires at most once per
    /// actual flip; dropping the handle stops delivery.
    fn on_preference_change(&self, callback: PreferenceCallback) -> Subscription;

    /// Mark the root UI element with the resolved theme. Must not block.
    fn apply_dom_theme(&self, theme: ResolvedTheme);

    /// Ask the native window to adopt `theme`, or to follow the window
    /// manager when `None`. Callers treat this as best-effort.
    async fn request_window_theme(&self, theme: Option<ResolvedTheme>) -> Result<(), DomainError>;
}

/// Handle returned by `subscribe`-style calls.
///
/// Dropping it (or calling [`Subscription::unsubscribe`]) stops delivery.
/// [`Subscription::detach`] keeps the registration alive for the rest of the
/// process.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle with nothing to cancel
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
