use std::sync::Arc;
use tokio::runtime::Handle;

use crate::application::eventbus::SharedEventBus;
use crate::application::store::{ReadOnlyStore, Store, WriteQueue};
use crate::domain::environment::{EnvironmentProvider, Subscription};
use crate::domain::event::SettingsEvent;
use crate::domain::theme::{ResolvedTheme, Theme};

/// Theme setting plus the theme actually applied to the UI.
///
/// Every transition re-resolves and re-applies immediately. While the setting
/// is `System`, host preference flips are followed automatically; an explicit
/// `Light`/`Dark` ignores them. Subscribers may call [`ThemeStore::set`]; the
/// nested change is applied right after the one being delivered.
pub struct ThemeStore {
    inner: Arc<ThemeInner>,
    _preference_subscription: Subscription,
}

struct ThemeInner {
    setting: Store<Theme>,
    applied: Store<ResolvedTheme>,
    environment: Arc<dyn EnvironmentProvider>,
    event_bus: SharedEventBus,
    // Used when a transition happens outside any runtime context
    runtime: Option<Handle>,
    // Serializes user transitions against environment callbacks
    changes: WriteQueue<ThemeChange>,
}

enum ThemeChange {
    Set(Theme),
    Preference(bool),
}

impl ThemeStore {
    /// `runtime` runs window-theme requests issued from threads without a
    /// tokio context, e.g. the UI main thread.
    pub fn new(
        environment: Arc<dyn EnvironmentProvider>,
        event_bus: SharedEventBus,
        runtime: Option<Handle>,
    ) -> Self {
        let setting = Theme::default();
        let applied = setting.resolve(environment.prefers_dark_mode());

        let inner = Arc::new(ThemeInner {
            setting: Store::new(setting),
            applied: Store::new(applied),
            environment: environment.clone(),
            event_bus,
            runtime,
            changes: WriteQueue::new(),
        });

        let weak = Arc::downgrade(&inner);
        let subscription = environment.on_preference_change(Box::new(move |prefers_dark| {
            if let Some(inner) = weak.upgrade() {
                inner.on_preference_change(prefers_dark);
            }
        }));

        Self {
            inner,
            _preference_subscription: subscription,
        }
    }

    /// Apply the theme loaded from config at startup
    pub fn init(&self, theme: Theme) {
        tracing::debug!("Initializing theme from config: {:?}", theme);
        self.inner.transition(theme);
    }

    /// Apply a theme chosen by the user
    pub fn set(&self, theme: Theme) {
        tracing::debug!("Theme set to {:?}", theme);
        self.inner.transition(theme);
    }

    pub fn setting(&self) -> Theme {
        self.inner.setting.get()
    }

    pub fn applied(&self) -> ResolvedTheme {
        self.inner.applied.get()
    }

    /// Read-only reactive view of the applied theme
    pub fn applied_view(&self) -> ReadOnlyStore<ResolvedTheme> {
        self.inner.applied.read_only()
    }

    pub fn subscribe_setting(&self, callback: impl Fn(&Theme) + Send + Sync + 'static) -> Subscription {
        self.inner.setting.subscribe(callback)
    }
}

impl ThemeInner {
    fn transition(&self, theme: Theme) {
        self.changes
            .push(ThemeChange::Set(theme), |change| self.handle(change));
    }

    fn on_preference_change(&self, prefers_dark: bool) {
        self.changes
            .push(ThemeChange::Preference(prefers_dark), |change| self.handle(change));
    }

    fn handle(&self, change: ThemeChange) {
        match change {
            ThemeChange::Set(theme) => {
                self.setting.set(theme);
                let resolved = theme.resolve(self.environment.prefers_dark_mode());
                self.apply(theme, resolved);
            }
            ThemeChange::Preference(prefers_dark) => self.follow_preference(prefers_dark),
        }
    }

    fn follow_preference(&self, prefers_dark: bool) {
        let setting = self.setting.get();
        if !setting.is_system() {
            tracing::debug!(
                "Ignoring system preference change, theme pinned to {:?}",
                setting
            );
            return;
        }
        self.apply(setting, setting.resolve(prefers_dark));
    }

    fn apply(&self, setting: Theme, resolved: ResolvedTheme) {
        // Document first: it must not depend on the window request
        self.environment.apply_dom_theme(resolved);
        self.applied.set(resolved);
        self.event_bus
            .publish(SettingsEvent::ThemeApplied { setting, resolved });
        self.request_window_theme(setting.window_override());
    }

    /// Fire-and-forget; failures are logged and dropped
    fn request_window_theme(&self, theme: Option<ResolvedTheme>) {
        let Some(runtime) = Handle::try_current().ok().or_else(|| self.runtime.clone()) else {
            tracing::warn!("No async runtime available, skipping window theme request");
            return;
        };

        let environment = self.environment.clone();
        runtime.spawn(async move {
            if let Err(e) = environment.request_window_theme(theme).await {
                tracing::warn!("Failed to apply window theme: {}", e);
            }
        });
    }
}
