use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Window theme request failed: {0}")]
    WindowTheme(String),

    #[error("No native window host attached")]
    NoNativeHost,

    #[error("Configuration error: {0}")]
    Config(String),
}
