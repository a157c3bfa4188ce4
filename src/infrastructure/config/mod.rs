pub mod loader;
pub mod paths;
mod runtime_config;

pub use runtime_config::*;
