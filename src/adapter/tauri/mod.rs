//! Tauri host integration: environment, commands and event forwarding.
//!
//! Register with `tauri::Builder::plugin(settings_core::adapter::tauri::init(runtime))`.
//! Commands are then invoked as `plugin:settings|<command>`.

pub mod commands;
pub mod environment;
pub mod events;
pub mod state;

use std::sync::Arc;
use tauri::plugin::{Builder, TauriPlugin};
use tauri::{AppHandle, Manager, Runtime};

use crate::infrastructure::config::RuntimeConfig;
use crate::infrastructure::environment::PreferenceListeners;
use crate::SettingsCore;
use environment::TauriEnvironment;
use state::AppState;

pub const PLUGIN_NAME: &str = "settings";

/// Preference listeners of the installed environment, for windows created later
struct WindowThemeWatch(Arc<PreferenceListeners>);

/// Plugin exposing the settings commands and installing the core at setup
pub fn init<R: Runtime>(runtime: RuntimeConfig) -> TauriPlugin<R> {
    Builder::new(PLUGIN_NAME)
        .invoke_handler(tauri::generate_handler![
            // Config commands
            commands::get_config,
            commands::update_config,
            commands::get_available_clis,
            commands::set_available_clis,
            // Locale commands
            commands::get_supported_locales,
            commands::resolve_locale,
            commands::set_locale_from_config,
            // Theme commands
            commands::init_theme,
            commands::set_theme,
            commands::get_applied_theme,
        ])
        .setup(move |app, _api| {
            install(app, &runtime);
            Ok(())
        })
        .on_window_ready(|window| {
            if let Some(watch) = window.try_state::<WindowThemeWatch>() {
                environment::watch_window(&watch.0, &window);
            }
        })
        .build()
}

/// Build the settings core for a running Tauri app.
///
/// Manages [`AppState`] for the commands, watches the windows that already
/// exist and starts forwarding bus events to the webview. [`init`] calls this
/// from the plugin setup.
pub fn install<R: Runtime>(app: &AppHandle<R>, runtime: &RuntimeConfig) -> Arc<SettingsCore> {
    let environment = TauriEnvironment::new(app.clone());
    for window in app.webview_windows().values() {
        environment.watch_window(&window.as_ref().window());
    }
    app.manage(WindowThemeWatch(environment.listeners()));

    let async_runtime = tauri::async_runtime::handle().inner().clone();
    let core = Arc::new(SettingsCore::with_async_runtime(
        Arc::new(environment),
        runtime,
        Some(async_runtime),
    ));
    events::start_event_forwarder(app.clone(), core.event_bus());
    app.manage(AppState::new(core.clone()));

    tracing::info!("Settings core attached to Tauri host");
    core
}
