#[cfg(feature = "tauri")]
pub mod tauri;
