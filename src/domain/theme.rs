use serde::{Deserialize, Serialize};
use std::fmt;

/// Theme setting as chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// Concrete theme rendered by the UI; `System` never gets this far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedTheme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Project the setting onto a concrete theme using the host's dark-mode flag.
    pub fn resolve(self, system_prefers_dark: bool) -> ResolvedTheme {
        match self {
            Theme::Light => ResolvedTheme::Light,
            Theme::Dark => ResolvedTheme::Dark,
            Theme::System if system_prefers_dark => ResolvedTheme::Dark,
            Theme::System => ResolvedTheme::Light,
        }
    }

    /// Override to request from the native window.
    /// `None` clears any override so the window manager decides.
    pub fn window_override(self) -> Option<ResolvedTheme> {
        match self {
            Theme::Light => Some(ResolvedTheme::Light),
            Theme::Dark => Some(ResolvedTheme::Dark),
            Theme::System => None,
        }
    }

    pub fn is_system(self) -> bool {
        self == Theme::System
    }
}

impl ResolvedTheme {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolvedTheme::Light => "light",
            ResolvedTheme::Dark => "dark",
        }
    }

    pub fn is_dark(self) -> bool {
        self == ResolvedTheme::Dark
    }
}

impl fmt::Display for ResolvedTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_truth_table() {
        assert_eq!(Theme::Light.resolve(true), ResolvedTheme::Light);
        assert_eq!(Theme::Light.resolve(false), ResolvedTheme::Light);
        assert_eq!(Theme::Dark.resolve(true), ResolvedTheme::Dark);
        assert_eq!(Theme::Dark.resolve(false), ResolvedTheme::Dark);
        assert_eq!(Theme::System.resolve(true), ResolvedTheme::Dark);
        assert_eq!(Theme::System.resolve(false), ResolvedTheme::Light);
    }

    #[test]
    fn test_window_override() {
        assert_eq!(Theme::Light.window_override(), Some(ResolvedTheme::Light));
        assert_eq!(Theme::Dark.window_override(), Some(ResolvedTheme::Dark));
        assert_eq!(Theme::System.window_override(), None);
    }

    #[test]
    fn test_serde_lowercase() {
        let theme: Theme = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(theme, Theme::System);
        assert_eq!(serde_json::to_string(&ResolvedTheme::Dark).unwrap(), "\"dark\"");
        assert!(serde_json::from_str::<ResolvedTheme>("\"system\"").is_err());
    }
}
