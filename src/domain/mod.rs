pub mod environment;
pub mod error;
pub mod event;
pub mod locale;
pub mod model;
pub mod theme;
