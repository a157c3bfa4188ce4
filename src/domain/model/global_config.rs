use serde::{Deserialize, Serialize};

use crate::domain::locale::LanguagePreference;
use crate::domain::theme::Theme;

/// Global application configuration as delivered by the config loader.
/// Missing fields take the built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalConfig {
    pub version: String,
    /// Preferred tool integration, matched loosely against detected CLIs
    pub default_cli: String,
    pub default_max_iterations: u32,
    pub max_concurrent_projects: u32,
    /// 0 disables the timeout
    pub iteration_timeout_ms: u64,
    /// 0 disables the timeout
    pub idle_timeout_ms: u64,
    pub theme: Theme,
    pub language: LanguagePreference,
    pub log_retention_days: u32,
    pub permissions_confirmed: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            default_cli: "claude".to_string(),
            default_max_iterations: 50,
            max_concurrent_projects: 3,
            iteration_timeout_ms: 0,
            idle_timeout_ms: 0,
            theme: Theme::System,
            language: LanguagePreference::System,
            log_retention_days: 7,
            permissions_confirmed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case_with_defaults() {
        let config: GlobalConfig = serde_json::from_str(
            r#"{"defaultCli":"codex","theme":"dark","language":"zh-TW","maxConcurrentProjects":5}"#,
        )
        .unwrap();

        assert_eq!(config.default_cli, "codex");
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.language, LanguagePreference::Explicit("zh-TW".to_string()));
        assert_eq!(config.max_concurrent_projects, 5);
        assert_eq!(config.default_max_iterations, 50);
        assert_eq!(config.log_retention_days, 7);
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let value = serde_json::to_value(GlobalConfig::default()).unwrap();
        assert_eq!(value["language"], "system");
        assert_eq!(value["theme"], "system");
        assert_eq!(value["permissionsConfirmed"], false);
    }
}
