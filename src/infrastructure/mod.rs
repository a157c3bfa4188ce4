pub mod config;
pub mod environment;
pub mod logging;
