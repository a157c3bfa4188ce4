use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use super::{lock, PreferenceListeners};
use crate::domain::environment::{EnvironmentProvider, PreferenceCallback, Subscription};
use crate::domain::error::DomainError;
use crate::domain::theme::ResolvedTheme;

/// Environment whose signals are driven by hand.
///
/// Used for previews, embedding without a UI host, and tests. Every DOM
/// marker and window request is recorded for inspection.
pub struct ManualEnvironment {
    language_tag: RwLock<Option<String>>,
    listeners: Arc<PreferenceListeners>,
    dom_history: Mutex<Vec<ResolvedTheme>>,
    window_requests: Mutex<Vec<Option<ResolvedTheme>>>,
    fail_window_requests: AtomicBool,
}

impl ManualEnvironment {
    pub fn new() -> Self {
        Self {
            language_tag: RwLock::new(None),
            listeners: PreferenceListeners::new(Some(false)),
            dom_history: Mutex::new(Vec::new()),
            window_requests: Mutex::new(Vec::new()),
            fail_window_requests: AtomicBool::new(false),
        }
    }

    pub fn with_language_tag(self, tag: impl Into<String>) -> Self {
        self.set_language_tag(Some(tag.into()));
        self
    }

    pub fn with_dark_mode(self, prefers_dark: bool) -> Self {
        self.listeners.notify(prefers_dark);
        self
    }

    pub fn set_language_tag(&self, tag: Option<String>) {
        *self
            .language_tag
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = tag;
    }

    /// Flip the host preference, notifying listeners if it actually changed
    pub fn set_prefers_dark(&self, prefers_dark: bool) {
        self.listeners.notify(prefers_dark);
    }

    /// Make subsequent window requests fail, as with no native host attached
    pub fn fail_window_requests(&self, fail: bool) {
        self.fail_window_requests.store(fail, Ordering::SeqCst);
    }

    /// Theme currently marked on the document, if any was applied
    pub fn dom_theme(&self) -> Option<ResolvedTheme> {
        lock(&self.dom_history).last().copied()
    }

    pub fn dom_history(&self) -> Vec<ResolvedTheme> {
        lock(&self.dom_history).clone()
    }

    /// Every window request received, including failed ones
    pub fn window_requests(&self) -> Vec<Option<ResolvedTheme>> {
        lock(&self.window_requests).clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for ManualEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EnvironmentProvider for ManualEnvironment {
    fn current_language_tag(&self) -> Option<String> {
        self.language_tag
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn prefers_dark_mode(&self) -> bool {
        self.listeners.last().unwrap_or(false)
    }

    fn on_preference_change(&self, callback: PreferenceCallback) -> Subscription {
        self.listeners.register(callback)
    }

    fn apply_dom_theme(&self, theme: ResolvedTheme) {
        lock(&self.dom_history).push(theme);
    }

    async fn request_window_theme(&self, theme: Option<ResolvedTheme>) -> Result<(), DomainError> {
        lock(&self.window_requests).push(theme);
        if self.fail_window_requests.load(Ordering::SeqCst) {
            return Err(DomainError::WindowTheme("window theming unavailable".to_string()));
        }
        Ok(())
    }
}
