use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tauri::{AppHandle, Emitter, Manager, Runtime, Window, WindowEvent};

use crate::domain::environment::{EnvironmentProvider, PreferenceCallback, Subscription};
use crate::domain::error::DomainError;
use crate::domain::theme::ResolvedTheme;
use crate::infrastructure::environment::{detect_dark_mode, system_language_tag, PreferenceListeners};

/// Event the webview listens to in order to mark `<html>`
pub const DOM_THEME_EVENT: &str = "settings://dom-theme";

/// Payload for [`DOM_THEME_EVENT`]: `data-theme` value and `dark` class toggle
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomThemePayload {
    pub theme: ResolvedTheme,
    pub dark_class: bool,
}

/// Environment backed by a running Tauri app.
///
/// Language and the OS dark-mode flag come from the system. A
/// `WindowEvent::ThemeChanged` from a watched window triggers a fresh OS
/// query; its payload is the window's own theme, which may be an override set
/// here, so it is never taken as the preference.
pub struct TauriEnvironment<R: Runtime> {
    app: AppHandle<R>,
    listeners: Arc<PreferenceListeners>,
}

impl<R: Runtime> TauriEnvironment<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self {
            app,
            listeners: PreferenceListeners::new(Some(detect_dark_mode())),
        }
    }

    /// Re-check the OS preference whenever the window's theme changes
    pub fn watch_window(&self, window: &Window<R>) {
        watch_window(&self.listeners, window);
    }

    pub(crate) fn listeners(&self) -> Arc<PreferenceListeners> {
        self.listeners.clone()
    }
}

pub(crate) fn watch_window<R: Runtime>(listeners: &Arc<PreferenceListeners>, window: &Window<R>) {
    let listeners = listeners.clone();
    window.on_window_event(move |event| {
        if is_theme_change(event) {
            let listeners = listeners.clone();
            // dark-light may block on D-Bus or the registry
            tauri::async_runtime::spawn_blocking(move || {
                refresh_preference(&listeners, detect_dark_mode);
            });
        }
    });
}

fn is_theme_change(event: &WindowEvent) -> bool {
    matches!(event, WindowEvent::ThemeChanged(_))
}

fn refresh_preference(listeners: &PreferenceListeners, detect: impl FnOnce() -> bool) -> bool {
    listeners.notify(detect())
}

fn native_theme(theme: Option<ResolvedTheme>) -> Option<tauri::Theme> {
    theme.map(|theme| match theme {
        ResolvedTheme::Light => tauri::Theme::Light,
        ResolvedTheme::Dark => tauri::Theme::Dark,
    })
}

#[async_trait]
impl<R: Runtime> EnvironmentProvider for TauriEnvironment<R> {
    fn current_language_tag(&self) -> Option<String> {
        system_language_tag()
    }

    fn prefers_dark_mode(&self) -> bool {
        detect_dark_mode()
    }

    fn on_preference_change(&self, callback: PreferenceCallback) -> Subscription {
        self.listeners.register(callback)
    }

    fn apply_dom_theme(&self, theme: ResolvedTheme) {
        let payload = DomThemePayload {
            theme,
            dark_class: theme.is_dark(),
        };
        if let Err(e) = self.app.emit(DOM_THEME_EVENT, payload) {
            tracing::warn!("Failed to emit {}: {}", DOM_THEME_EVENT, e);
        }
    }

    async fn request_window_theme(&self, theme: Option<ResolvedTheme>) -> Result<(), DomainError> {
        let windows = self.app.webview_windows();
        if windows.is_empty() {
            return Err(DomainError::NoNativeHost);
        }

        let native = native_theme(theme);

        for (label, window) in windows {
            window
                .set_theme(native)
                .map_err(|e| DomainError::WindowTheme(format!("{}: {}", label, e)))?;
        }
        Ok(())
    }
}
