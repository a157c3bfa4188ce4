use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel stored in the config when the UI should follow the host language
const SYSTEM_SENTINEL: &str = "system";

/// Locales with a bundled message catalog.
///
/// Declaration order matters: region-less environment matches pick the first
/// locale sharing the primary subtag, so `zh-CN` must stay ahead of `zh-TW`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SupportedLocale {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "zh-TW")]
    ZhTw,
    #[serde(rename = "es")]
    Es,
    #[serde(rename = "hi")]
    Hi,
    #[serde(rename = "ar")]
    Ar,
    #[serde(rename = "pt")]
    Pt,
    #[serde(rename = "ru")]
    Ru,
    #[serde(rename = "ja")]
    Ja,
    #[serde(rename = "de")]
    De,
    #[serde(rename = "fr")]
    Fr,
    #[serde(rename = "bn")]
    Bn,
}

impl SupportedLocale {
    pub const ALL: [SupportedLocale; 12] = [
        Self::En,
        Self::ZhCn,
        Self::ZhTw,
        Self::Es,
        Self::Hi,
        Self::Ar,
        Self::Pt,
        Self::Ru,
        Self::Ja,
        Self::De,
        Self::Fr,
        Self::Bn,
    ];

    /// Locale used whenever nothing better can be resolved
    pub const FALLBACK: SupportedLocale = Self::En;

    /// BCP 47 identifier, also the message catalog file stem
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::ZhCn => "zh-CN",
            Self::ZhTw => "zh-TW",
            Self::Es => "es",
            Self::Hi => "hi",
            Self::Ar => "ar",
            Self::Pt => "pt",
            Self::Ru => "ru",
            Self::Ja => "ja",
            Self::De => "de",
            Self::Fr => "fr",
            Self::Bn => "bn",
        }
    }

    /// Name of the language in the language itself, for the picker
    pub fn native_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::ZhCn => "简体中文",
            Self::ZhTw => "繁體中文",
            Self::Es => "Español",
            Self::Hi => "हिन्दी",
            Self::Ar => "العربية",
            Self::Pt => "Português",
            Self::Ru => "Русский",
            Self::Ja => "日本語",
            Self::De => "Deutsch",
            Self::Fr => "Français",
            Self::Bn => "বাংলা",
        }
    }

    /// Exact, case-sensitive lookup by identifier
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|locale| locale.as_str() == identifier)
    }
}

impl fmt::Display for SupportedLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language choice as stored in the global config.
///
/// Missing, empty and `"system"` values all mean "follow the environment".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum LanguagePreference {
    #[default]
    System,
    /// Raw value from the config; not validated
    Explicit(String),
}

impl LanguagePreference {
    pub fn is_system(&self) -> bool {
        matches!(self, Self::System)
    }
}

impl From<&str> for LanguagePreference {
    fn from(value: &str) -> Self {
        if value.is_empty() || value == SYSTEM_SENTINEL {
            Self::System
        } else {
            Self::Explicit(value.to_string())
        }
    }
}

impl From<Option<String>> for LanguagePreference {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(Self::from).unwrap_or_default()
    }
}

impl From<LanguagePreference> for String {
    fn from(value: LanguagePreference) -> Self {
        match value {
            LanguagePreference::System => SYSTEM_SENTINEL.to_string(),
            LanguagePreference::Explicit(raw) => raw,
        }
    }
}

/// Resolve the UI locale from the configured preference and the host's
/// language tag. Total: every input maps to a supported locale.
///
/// An explicit preference is only honoured on an exact match. The environment
/// tag is more forgiving: `en_US` is normalized to `en-US`, and a tag whose
/// region has no catalog (`zh-HK`) falls back to the first locale sharing its
/// primary subtag.
pub fn resolve(preference: &LanguagePreference, env_tag: Option<&str>) -> SupportedLocale {
    if let LanguagePreference::Explicit(raw) = preference {
        let resolved = SupportedLocale::from_identifier(raw).unwrap_or(SupportedLocale::FALLBACK);
        tracing::debug!("Explicit language {:?} resolved to {}", raw, resolved);
        return resolved;
    }

    if let Some(locale) = env_tag.and_then(match_environment_tag) {
        tracing::debug!("Environment language {:?} resolved to {}", env_tag, locale);
        return locale;
    }

    SupportedLocale::FALLBACK
}

fn match_environment_tag(tag: &str) -> Option<SupportedLocale> {
    if tag.is_empty() {
        return None;
    }

    let normalized = normalize_tag(tag);
    if let Some(locale) = SupportedLocale::from_identifier(&normalized) {
        return Some(locale);
    }

    let primary = normalized.split('-').next().unwrap_or_default();
    SupportedLocale::ALL
        .iter()
        .copied()
        .find(|locale| locale.as_str().starts_with(primary))
}

fn normalize_tag(tag: &str) -> String {
    tag.replace('_', "-")
}
