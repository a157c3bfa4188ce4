use crate::adapter::tauri::state::AppState;
use crate::application::settings_store::DefaultCliStatus;
use crate::domain::locale::{LanguagePreference, SupportedLocale};
use crate::domain::model::{CliInfo, GlobalConfig};
use crate::domain::theme::{ResolvedTheme, Theme};
use serde::Serialize;
use tauri::State;

// ====== Config Commands ======

#[tauri::command]
pub fn get_config(state: State<'_, AppState>) -> GlobalConfig {
    (*state.core.config()).clone()
}

#[tauri::command]
pub fn update_config(state: State<'_, AppState>, config: GlobalConfig) {
    state.core.update_config(config);
}

#[tauri::command]
pub fn get_available_clis(state: State<'_, AppState>) -> Vec<CliInfo> {
    state.core.settings().available_clis().to_vec()
}

#[tauri::command]
pub fn set_available_clis(state: State<'_, AppState>, clis: Vec<CliInfo>) -> DefaultCliStatus {
    state.core.set_available_clis(clis)
}

// ====== Locale Commands ======

#[derive(Debug, Serialize)]
pub struct LocaleOption {
    pub id: SupportedLocale,
    pub name: &'static str,
}

#[tauri::command]
pub fn get_supported_locales() -> Vec<LocaleOption> {
    SupportedLocale::ALL
        .iter()
        .map(|&id| LocaleOption {
            id,
            name: id.native_name(),
        })
        .collect()
}

#[tauri::command]
pub fn resolve_locale(state: State<'_, AppState>, language: Option<String>) -> SupportedLocale {
    state.core.resolve_locale(&LanguagePreference::from(language))
}

#[tauri::command]
pub fn set_locale_from_config(
    state: State<'_, AppState>,
    language: Option<String>,
) -> SupportedLocale {
    state
        .core
        .set_locale_from_config(&LanguagePreference::from(language))
}

// ====== Theme Commands ======

#[tauri::command]
pub fn init_theme(state: State<'_, AppState>, theme: Theme) -> ResolvedTheme {
    state.core.init_theme(theme);
    state.core.applied_theme().get()
}

#[tauri::command]
pub fn set_theme(state: State<'_, AppState>, theme: Theme) -> ResolvedTheme {
    state.core.set_theme(theme);
    state.core.applied_theme().get()
}

#[tauri::command]
pub fn get_applied_theme(state: State<'_, AppState>) -> ResolvedTheme {
    state.core.applied_theme().get()
}
