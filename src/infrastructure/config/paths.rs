use std::path::PathBuf;

const APP_DIR_NAME: &str = "settings-core";

/// Get platform-specific configuration directory
pub fn config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Library/Application Support")
            .join(APP_DIR_NAME)
    }

    #[cfg(not(target_os = "macos"))]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
    }
}

pub fn runtime_config_path() -> PathBuf {
    config_dir().join("runtime.yaml")
}

pub fn log_dir() -> PathBuf {
    config_dir().join("logs")
}
