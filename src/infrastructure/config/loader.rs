use include_dir::{include_dir, Dir};
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use std::path::Path;

use super::paths;
use super::RuntimeConfig;

// Embed the entire configs directory at compile time
static CONFIGS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/resources/configs");

/// Read a YAML file from disk
pub fn load_yaml<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)?;
    parse_yaml(&content)
}

/// Parse YAML from string
pub fn parse_yaml<T: DeserializeOwned>(content: &str) -> anyhow::Result<T> {
    let config: T = serde_yaml::from_str(content)?;
    Ok(config)
}

/// Embedded YAML document by name, as an untyped tree
fn embedded_value(name: &str) -> Option<Value> {
    let file_name = format!("{}.yaml", name);
    let content = CONFIGS_DIR.get_file(&file_name)?.contents_utf8()?;

    match parse_yaml::<Value>(content) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!("Failed to parse embedded config {}: {}", name, e);
            None
        }
    }
}

/// Recursively overlay `overlay` onto `base`; mappings merge, everything else
/// replaces.
fn merge_yaml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_yaml(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Build the runtime config from the embedded defaults plus an optional
/// override file. An unreadable, unparsable or invalid override is ignored.
pub fn load_runtime_config_from(override_path: Option<&Path>) -> RuntimeConfig {
    let mut merged = embedded_value("runtime").unwrap_or(Value::Null);

    if let Some(path) = override_path.filter(|p| p.exists()) {
        match load_yaml::<Value>(path) {
            Ok(overlay) => {
                merge_yaml(&mut merged, overlay);
                tracing::info!("Applied runtime overrides from {:?}", path);
            }
            Err(e) => {
                tracing::warn!("Failed to read {:?}: {}, using defaults", path, e);
            }
        }
    }

    let config = match serde_yaml::from_value::<RuntimeConfig>(merged) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Invalid runtime config: {}, using defaults", e);
            return RuntimeConfig::default();
        }
    };

    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            tracing::warn!("{}, using defaults", e);
            RuntimeConfig::default()
        }
    }
}

/// Load runtime config, honouring `runtime.yaml` in the user config directory
pub fn load_runtime_config() -> RuntimeConfig {
    load_runtime_config_from(Some(&paths::runtime_config_path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_embedded_defaults_match_builtin() {
        assert_eq!(load_runtime_config_from(None), RuntimeConfig::default());
    }

    #[test]
    fn test_override_merges_single_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("runtime.yaml");
        std::fs::write(&path, "environment:\n  theme_poll_interval_ms: 500\n").unwrap();

        let config = load_runtime_config_from(Some(&path));
        assert_eq!(config.environment.theme_poll_interval_ms, 500);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.event_bus.capacity, 64);
    }

    #[test]
    fn test_missing_override_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = load_runtime_config_from(Some(&dir.path().join("absent.yaml")));
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn test_invalid_override_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("runtime.yaml");
        std::fs::write(&path, "event_bus:\n  capacity: 0\n").unwrap();
        assert_eq!(load_runtime_config_from(Some(&path)), RuntimeConfig::default());

        std::fs::write(&path, "logging: [unterminated").unwrap();
        assert_eq!(load_runtime_config_from(Some(&path)), RuntimeConfig::default());
    }

    #[test]
    fn test_merge_replaces_scalars_and_keeps_siblings() {
        let mut base: Value = parse_yaml("a: {x: 1, y: 2}\nb: 3").unwrap();
        let overlay: Value = parse_yaml("a: {y: 5}\nc: 4").unwrap();
        merge_yaml(&mut base, overlay);

        let expected: Value = parse_yaml("a: {x: 1, y: 5}\nb: 3\nc: 4").unwrap();
        assert_eq!(base, expected);
    }
}
