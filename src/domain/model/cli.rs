use serde::{Deserialize, Serialize};

/// An external tool integration detected on the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliInfo {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

impl CliInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            path: None,
        }
    }

    /// Case-insensitive substring match of `key` against the tool name
    pub fn matches(&self, key: &str) -> bool {
        self.name.to_lowercase().contains(&key.to_lowercase())
    }
}
