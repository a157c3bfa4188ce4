pub mod eventbus;
pub mod locale_store;
pub mod settings_store;
pub mod store;
pub mod theme_store;
