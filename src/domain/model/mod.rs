mod cli;
mod global_config;

pub use cli::CliInfo;
pub use global_config::GlobalConfig;
