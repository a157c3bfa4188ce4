use serde::{Deserialize, Serialize};

use super::locale::SupportedLocale;
use super::model::{CliInfo, GlobalConfig};
use super::theme::{ResolvedTheme, Theme};

/// Settings changes published on the event bus
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum SettingsEvent {
    /// The global config was replaced
    ConfigUpdated { config: GlobalConfig },

    /// The detected tool inventory was replaced
    ClisUpdated { clis: Vec<CliInfo> },

    /// A new active locale was published
    LocaleChanged { locale: SupportedLocale },

    /// A theme was applied to the document
    ThemeApplied {
        setting: Theme,
        resolved: ResolvedTheme,
    },
}

impl SettingsEvent {
    /// Get the event name for frontend routing
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::ConfigUpdated { .. } => "settings://config-updated",
            Self::ClisUpdated { .. } => "settings://clis-updated",
            Self::LocaleChanged { .. } => "settings://locale-changed",
            Self::ThemeApplied { .. } => "settings://theme-applied",
        }
    }
}
