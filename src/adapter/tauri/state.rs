use crate::SettingsCore;
use std::sync::Arc;

pub struct AppState {
    pub core: Arc<SettingsCore>,
}

impl AppState {
    pub fn new(core: Arc<SettingsCore>) -> Self {
        Self { core }
    }
}
