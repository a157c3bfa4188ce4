use std::sync::Arc;

use crate::application::eventbus::SharedEventBus;
use crate::application::store::{ReadOnlyStore, Store};
use crate::domain::environment::{EnvironmentProvider, Subscription};
use crate::domain::event::SettingsEvent;
use crate::domain::locale::{self, LanguagePreference, SupportedLocale};

/// Active UI locale, resolved against the host environment
pub struct LocaleStore {
    active: Store<SupportedLocale>,
    environment: Arc<dyn EnvironmentProvider>,
    event_bus: SharedEventBus,
}

impl LocaleStore {
    pub fn new(environment: Arc<dyn EnvironmentProvider>, event_bus: SharedEventBus) -> Self {
        Self {
            active: Store::new(SupportedLocale::FALLBACK),
            environment,
            event_bus,
        }
    }

    /// Resolve without publishing
    pub fn resolve(&self, preference: &LanguagePreference) -> SupportedLocale {
        let env_tag = self.environment.current_language_tag();
        locale::resolve(preference, env_tag.as_deref())
    }

    /// Resolve and publish as the active locale
    pub fn set_from_config(&self, preference: &LanguagePreference) -> SupportedLocale {
        let resolved = self.resolve(preference);
        self.active.set(resolved);
        tracing::info!("Active locale set to {}", resolved);
        self.event_bus
            .publish(SettingsEvent::LocaleChanged { locale: resolved });
        resolved
    }

    pub fn active(&self) -> SupportedLocale {
        self.active.get()
    }

    pub fn active_view(&self) -> ReadOnlyStore<SupportedLocale> {
        self.active.read_only()
    }

    pub fn subscribe(
        &self,
        callback: impl Fn(&SupportedLocale) + Send + Sync + 'static,
    ) -> Subscription {
        self.active.subscribe(callback)
    }
}
