use serde::Serialize;
use std::sync::Arc;

use crate::application::eventbus::SharedEventBus;
use crate::application::store::Store;
use crate::domain::environment::Subscription;
use crate::domain::event::SettingsEvent;
use crate::domain::model::{CliInfo, GlobalConfig};

/// Whether the configured default CLI is among the detected integrations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DefaultCliStatus {
    Available,
    /// Tools were detected but none matches `default_cli`
    Missing,
    /// Nothing detected yet, so no verdict
    Unknown,
}

/// Holds the global config and the detected CLI inventory.
///
/// Both values are replaced wholesale; nothing here mutates a config in place.
pub struct SettingsStore {
    config: Store<Arc<GlobalConfig>>,
    available_clis: Store<Arc<Vec<CliInfo>>>,
    event_bus: SharedEventBus,
}

impl SettingsStore {
    pub fn new(event_bus: SharedEventBus) -> Self {
        Self::with_config(GlobalConfig::default(), event_bus)
    }

    pub fn with_config(config: GlobalConfig, event_bus: SharedEventBus) -> Self {
        Self {
            config: Store::new(Arc::new(config)),
            available_clis: Store::new(Arc::new(Vec::new())),
            event_bus,
        }
    }

    pub fn config(&self) -> Arc<GlobalConfig> {
        self.config.get()
    }

    pub fn available_clis(&self) -> Arc<Vec<CliInfo>> {
        self.available_clis.get()
    }

    /// Replace the config and notify subscribers
    pub fn update(&self, new_config: GlobalConfig) {
        let event = SettingsEvent::ConfigUpdated {
            config: new_config.clone(),
        };
        self.config.set(Arc::new(new_config));
        tracing::info!("Global config replaced");
        self.event_bus.publish(event);
    }

    /// Replace the CLI inventory and notify subscribers.
    ///
    /// The configured default CLI is checked against the new inventory but
    /// never changed here. The verdict is returned so the UI can surface it.
    pub fn set_available_clis(&self, clis: Vec<CliInfo>) -> DefaultCliStatus {
        let event = SettingsEvent::ClisUpdated { clis: clis.clone() };
        self.available_clis.set(Arc::new(clis));
        self.event_bus.publish(event);

        let status = self.default_cli_status();
        if status == DefaultCliStatus::Missing {
            tracing::info!(
                "Default CLI {:?} not found among detected tools, keeping preference",
                self.config().default_cli
            );
        }
        status
    }

    pub fn default_cli_status(&self) -> DefaultCliStatus {
        let clis = self.available_clis();
        if clis.is_empty() {
            return DefaultCliStatus::Unknown;
        }

        let config = self.config();
        if clis.iter().any(|cli| cli.matches(&config.default_cli)) {
            DefaultCliStatus::Available
        } else {
            DefaultCliStatus::Missing
        }
    }

    pub fn subscribe_config(
        &self,
        callback: impl Fn(&Arc<GlobalConfig>) + Send + Sync + 'static,
    ) -> Subscription {
        self.config.subscribe(callback)
    }

    pub fn subscribe_clis(
        &self,
        callback: impl Fn(&Arc<Vec<CliInfo>>) + Send + Sync + 'static,
    ) -> Subscription {
        self.available_clis.subscribe(callback)
    }
}
