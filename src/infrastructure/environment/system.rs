use async_trait::async_trait;
use std::sync::{Arc, Mutex, RwLock, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::{lock, PreferenceListeners};
use crate::domain::environment::{EnvironmentProvider, PreferenceCallback, Subscription};
use crate::domain::error::DomainError;
use crate::domain::theme::ResolvedTheme;
use crate::infrastructure::config::EnvironmentConfig;

/// Environment backed by the operating system: language from `sys-locale`,
/// dark mode from `dark-light`.
///
/// There is no webview or native window here, so the document marker is only
/// remembered and window requests fail with `NoNativeHost`. Preference changes
/// are detected by polling on the tokio runtime once someone subscribes; the
/// runtime current at construction is used when subscribing from elsewhere.
pub struct SystemEnvironment {
    listeners: Arc<PreferenceListeners>,
    poll_interval: Duration,
    runtime: Option<Handle>,
    watcher: Arc<Mutex<WatcherSlot>>,
    document_theme: RwLock<Option<ResolvedTheme>>,
}

/// The watcher decides to stop under this lock, so a listener registered
/// before `ensure_watcher` is always seen by a running watcher.
#[derive(Default)]
struct WatcherSlot {
    running: bool,
    handle: Option<JoinHandle<()>>,
}

impl WatcherSlot {
    fn is_live(&self) -> bool {
        self.running && self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl SystemEnvironment {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            listeners: PreferenceListeners::new(None),
            poll_interval,
            runtime: Handle::try_current().ok(),
            watcher: Arc::new(Mutex::new(WatcherSlot::default())),
            document_theme: RwLock::new(None),
        }
    }

    pub fn from_config(config: &EnvironmentConfig) -> Self {
        Self::new(config.theme_poll_interval())
    }

    /// Last theme handed to `apply_dom_theme`
    pub fn document_theme(&self) -> Option<ResolvedTheme> {
        *self
            .document_theme
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn ensure_watcher(&self) {
        let mut slot = lock(&self.watcher);
        if slot.is_live() {
            return;
        }

        match Handle::try_current().ok().or_else(|| self.runtime.clone()) {
            Some(runtime) => {
                let listeners = Arc::downgrade(&self.listeners);
                let watcher = Arc::downgrade(&self.watcher);
                slot.running = true;
                slot.handle = Some(runtime.spawn(watch_dark_mode(
                    listeners,
                    watcher,
                    self.poll_interval,
                )));
                tracing::debug!("Started dark mode watcher ({:?} interval)", self.poll_interval);
            }
            None => {
                tracing::warn!("No async runtime available, live dark mode tracking disabled");
            }
        }
    }
}

impl Drop for SystemEnvironment {
    fn drop(&mut self) {
        let mut slot = lock(&self.watcher);
        slot.running = false;
        if let Some(handle) = slot.handle.take() {
            handle.abort();
        }
    }
}

#[async_trait]
impl EnvironmentProvider for SystemEnvironment {
    fn current_language_tag(&self) -> Option<String> {
        system_language_tag()
    }

    fn prefers_dark_mode(&self) -> bool {
        detect_dark_mode()
    }

    fn on_preference_change(&self, callback: PreferenceCallback) -> Subscription {
        // Seed the baseline so the first poll does not count as a flip
        if self.listeners.last().is_none() {
            self.listeners.notify(detect_dark_mode());
        }
        let subscription = self.listeners.register(callback);
        self.ensure_watcher();
        subscription
    }

    fn apply_dom_theme(&self, theme: ResolvedTheme) {
        *self
            .document_theme
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(theme);
        tracing::debug!("Document theme set to {}", theme);
    }

    async fn request_window_theme(&self, _theme: Option<ResolvedTheme>) -> Result<(), DomainError> {
        Err(DomainError::NoNativeHost)
    }
}

async fn watch_dark_mode(
    listeners: Weak<PreferenceListeners>,
    watcher: Weak<Mutex<WatcherSlot>>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        let (Some(listeners), Some(watcher)) = (listeners.upgrade(), watcher.upgrade()) else {
            break;
        };
        if release_if_idle(&watcher, &listeners) {
            tracing::debug!("No preference listeners left, stopping dark mode watcher");
            break;
        }

        // dark-light may block on D-Bus or the registry
        match tokio::task::spawn_blocking(detect_dark_mode).await {
            Ok(prefers_dark) => {
                listeners.notify(prefers_dark);
            }
            Err(e) => {
                tracing::warn!("Dark mode detection failed: {}", e);
            }
        }
    }
}

/// Give up the watcher slot when nobody listens. Returns whether the caller
/// should stop.
fn release_if_idle(watcher: &Mutex<WatcherSlot>, listeners: &PreferenceListeners) -> bool {
    let mut slot = lock(watcher);
    if !listeners.is_empty() {
        return false;
    }
    slot.running = false;
    true
}

/// Language tag reported by the OS, cleaned of POSIX decorations
pub(crate) fn system_language_tag() -> Option<String> {
    sys_locale::get_locale().and_then(|raw| normalize_posix_locale(&raw))
}

/// Unknown or failed detection counts as "no dark preference"
pub(crate) fn detect_dark_mode() -> bool {
    matches!(dark_light::detect(), Ok(dark_light::Mode::Dark))
}

/// Turn a POSIX locale string into a language tag.
///
/// Strips the codeset and modifier (`de_DE.UTF-8@euro` becomes `de_DE`) and
/// drops the `C`/`POSIX` pseudo-locales, which carry no language.
pub fn normalize_posix_locale(raw: &str) -> Option<String> {
    let tag = raw
        .split(|c: char| c == '.' || c == '@')
        .next()
        .unwrap_or_default()
        .trim();

    if tag.is_empty() || tag == "C" || tag == "POSIX" {
        return None;
    }
    Some(tag.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_posix_locale() {
        assert_eq!(normalize_posix_locale("de_DE.UTF-8"), Some("de_DE".to_string()));
        assert_eq!(normalize_posix_locale("sr_RS@latin"), Some("sr_RS".to_string()));
        assert_eq!(normalize_posix_locale("zh-CN"), Some("zh-CN".to_string()));
        assert_eq!(normalize_posix_locale("C.UTF-8"), None);
        assert_eq!(normalize_posix_locale("POSIX"), None);
        assert_eq!(normalize_posix_locale(""), None);
    }

    #[test]
    fn test_document_theme_is_remembered() {
        let env = SystemEnvironment::new(Duration::from_secs(1));
        assert_eq!(env.document_theme(), None);
        env.apply_dom_theme(ResolvedTheme::Dark);
        assert_eq!(env.document_theme(), Some(ResolvedTheme::Dark));
    }

    #[test]
    fn test_idle_release_respects_late_listener() {
        let env = SystemEnvironment::new(Duration::from_secs(1));
        lock(&env.watcher).running = true;

        // Registered after the watcher saw an empty registry but before it exits
        let _sub = env.listeners.register(Box::new(|_| {}));
        assert!(!release_if_idle(&env.watcher, &env.listeners));
        assert!(lock(&env.watcher).running);
    }

    #[test]
    fn test_idle_release_frees_slot() {
        let env = SystemEnvironment::new(Duration::from_secs(1));
        lock(&env.watcher).running = true;

        assert!(release_if_idle(&env.watcher, &env.listeners));
        assert!(!lock(&env.watcher).is_live());
    }

    #[tokio::test]
    async fn test_resubscribe_restarts_released_watcher() {
        let env = SystemEnvironment::new(Duration::from_secs(3600));
        let first = env.on_preference_change(Box::new(|_| {}));
        assert!(lock(&env.watcher).is_live());

        drop(first);
        assert!(release_if_idle(&env.watcher, &env.listeners));
        assert!(!lock(&env.watcher).is_live());

        let _second = env.on_preference_change(Box::new(|_| {}));
        assert!(lock(&env.watcher).is_live());
    }

    #[test]
    fn test_subscribe_without_runtime_does_not_panic() {
        let env = SystemEnvironment::new(Duration::from_secs(1));
        let sub = env.on_preference_change(Box::new(|_| {}));
        drop(sub);
    }
}
