//! Locale and theme settings layer for the desktop shell.
//!
//! [`SettingsCore`] owns the stores and wires them to an
//! [`EnvironmentProvider`]: the system one by default, or the Tauri window
//! when built with the `tauri` feature.

pub mod adapter;
pub mod application;
pub mod domain;
pub mod infrastructure;

use std::sync::Arc;
use tokio::runtime::Handle;

use application::eventbus::{create_event_bus, SharedEventBus};
use application::locale_store::LocaleStore;
use application::settings_store::{DefaultCliStatus, SettingsStore};
use application::store::ReadOnlyStore;
use application::theme_store::ThemeStore;
use domain::environment::EnvironmentProvider;
use domain::locale::{LanguagePreference, SupportedLocale};
use domain::model::{CliInfo, GlobalConfig};
use domain::theme::{ResolvedTheme, Theme};
use infrastructure::config::{self, RuntimeConfig};
use infrastructure::environment::SystemEnvironment;
use infrastructure::logging;

/// Composition root: one instance per UI process, shared by reference.
pub struct SettingsCore {
    settings: SettingsStore,
    locale: LocaleStore,
    theme: ThemeStore,
    event_bus: SharedEventBus,
}

impl SettingsCore {
    /// Background work goes to the tokio runtime current at construction, if any
    pub fn new(environment: Arc<dyn EnvironmentProvider>, runtime: &RuntimeConfig) -> Self {
        Self::with_async_runtime(environment, runtime, Handle::try_current().ok())
    }

    pub fn with_async_runtime(
        environment: Arc<dyn EnvironmentProvider>,
        runtime: &RuntimeConfig,
        async_runtime: Option<Handle>,
    ) -> Self {
        let event_bus = create_event_bus(runtime.event_bus.capacity);

        Self {
            settings: SettingsStore::new(event_bus.clone()),
            locale: LocaleStore::new(environment.clone(), event_bus.clone()),
            theme: ThemeStore::new(environment, event_bus.clone(), async_runtime),
            event_bus,
        }
    }

    /// Logging, runtime config and OS-backed environment in one go
    pub fn bootstrap() -> Self {
        let runtime = config::loader::load_runtime_config();
        logging::setup(&runtime.logging);

        let environment = Arc::new(SystemEnvironment::from_config(&runtime.environment));
        tracing::info!("Settings core initialized");
        Self::new(environment, &runtime)
    }

    /// Adopt the config delivered at startup: store it, publish its locale
    /// and initialize the theme from it.
    pub fn load_config(&self, config: GlobalConfig) {
        let language = config.language.clone();
        let theme = config.theme;
        self.settings.update(config);
        self.locale.set_from_config(&language);
        self.theme.init(theme);
    }

    /// Replace the config; the locale is re-resolved and the theme re-applied
    /// when its setting changed.
    pub fn update_config(&self, config: GlobalConfig) {
        let language = config.language.clone();
        let theme = config.theme;
        self.settings.update(config);
        self.locale.set_from_config(&language);
        if theme != self.theme.setting() {
            self.theme.set(theme);
        }
    }

    pub fn config(&self) -> Arc<GlobalConfig> {
        self.settings.config()
    }

    pub fn set_available_clis(&self, clis: Vec<CliInfo>) -> DefaultCliStatus {
        self.settings.set_available_clis(clis)
    }

    pub fn resolve_locale(&self, preference: &LanguagePreference) -> SupportedLocale {
        self.locale.resolve(preference)
    }

    pub fn set_locale_from_config(&self, preference: &LanguagePreference) -> SupportedLocale {
        self.locale.set_from_config(preference)
    }

    pub fn init_theme(&self, theme: Theme) {
        self.theme.init(theme);
    }

    pub fn set_theme(&self, theme: Theme) {
        self.theme.set(theme);
    }

    pub fn applied_theme(&self) -> ReadOnlyStore<ResolvedTheme> {
        self.theme.applied_view()
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn locale(&self) -> &LocaleStore {
        &self.locale
    }

    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    pub fn event_bus(&self) -> SharedEventBus {
        self.event_bus.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::SettingsEvent;
    use crate::infrastructure::environment::ManualEnvironment;

    fn core_with(env: &Arc<ManualEnvironment>) -> SettingsCore {
        SettingsCore::new(env.clone(), &RuntimeConfig::default())
    }

    #[test]
    fn test_load_config_resolves_locale_and_theme() {
        let env = Arc::new(ManualEnvironment::new().with_language_tag("es_MX").with_dark_mode(true));
        let core = core_with(&env);

        core.load_config(GlobalConfig::default());

        assert_eq!(core.locale().active(), SupportedLocale::Es);
        assert_eq!(core.applied_theme().get(), ResolvedTheme::Dark);
        assert_eq!(env.dom_theme(), Some(ResolvedTheme::Dark));
    }

    #[test]
    fn test_update_config_reapplies_changed_theme_only() {
        let env = Arc::new(ManualEnvironment::new());
        let core = core_with(&env);
        core.load_config(GlobalConfig::default());
        let applied_before = env.dom_history().len();

        let mut next = GlobalConfig::default();
        next.max_concurrent_projects = 8;
        core.update_config(next.clone());
        assert_eq!(env.dom_history().len(), applied_before);

        next.theme = Theme::Dark;
        next.language = LanguagePreference::from("de");
        core.update_config(next);

        assert_eq!(core.theme().setting(), Theme::Dark);
        assert_eq!(core.applied_theme().get(), ResolvedTheme::Dark);
        assert_eq!(core.locale().active(), SupportedLocale::De);
        assert_eq!(core.config().max_concurrent_projects, 8);
    }

    #[test]
    fn test_set_available_clis_keeps_config_identity() {
        let env = Arc::new(ManualEnvironment::new());
        let core = core_with(&env);
        let config = core.config();

        let status = core.set_available_clis(vec![CliInfo::new("claude")]);

        assert_eq!(status, DefaultCliStatus::Available);
        assert!(Arc::ptr_eq(&config, &core.config()));
    }

    #[test]
    fn test_resolve_locale_does_not_change_active() {
        let env = Arc::new(ManualEnvironment::new().with_language_tag("pt-BR"));
        let core = core_with(&env);

        assert_eq!(core.resolve_locale(&LanguagePreference::System), SupportedLocale::Pt);
        assert_eq!(core.resolve_locale(&LanguagePreference::from("xx")), SupportedLocale::En);
        assert_eq!(core.locale().active(), SupportedLocale::En);
    }

    #[test]
    fn test_environment_flip_reaches_applied_theme() {
        let env = Arc::new(ManualEnvironment::new());
        let core = core_with(&env);
        core.init_theme(Theme::System);
        assert_eq!(core.applied_theme().get(), ResolvedTheme::Light);

        env.set_prefers_dark(true);
        assert_eq!(core.applied_theme().get(), ResolvedTheme::Dark);

        core.set_theme(Theme::Light);
        env.set_prefers_dark(false);
        env.set_prefers_dark(true);
        assert_eq!(core.applied_theme().get(), ResolvedTheme::Light);
    }

    #[tokio::test]
    async fn test_load_config_publishes_events_in_order() {
        let env = Arc::new(ManualEnvironment::new());
        let core = core_with(&env);
        let mut rx = core.event_bus().subscribe();

        core.load_config(GlobalConfig::default());

        let names: Vec<&str> = (0..3)
            .map(|_| rx.try_recv().unwrap().event_name())
            .collect();
        assert_eq!(
            names,
            vec![
                "settings://config-updated",
                "settings://locale-changed",
                "settings://theme-applied"
            ]
        );
    }

    #[tokio::test]
    async fn test_theme_event_carries_setting_and_resolution() {
        let env = Arc::new(ManualEnvironment::new());
        let core = core_with(&env);
        let mut rx = core.event_bus().subscribe();

        core.set_theme(Theme::Dark);

        match rx.recv().await.unwrap() {
            SettingsEvent::ThemeApplied { setting, resolved } => {
                assert_eq!(setting, Theme::Dark);
                assert_eq!(resolved, ResolvedTheme::Dark);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
