use crate::domain::event::SettingsEvent;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Event bus for publishing and subscribing to settings events
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SettingsEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: SettingsEvent) {
        if let Err(e) = self.sender.send(event) {
            tracing::trace!("No subscribers for event: {}", e.0.event_name());
        }
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<SettingsEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Shared event bus wrapped in Arc for thread-safe sharing
pub type SharedEventBus = Arc<EventBus>;

pub fn create_event_bus(capacity: usize) -> SharedEventBus {
    Arc::new(EventBus::new(capacity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::locale::SupportedLocale;

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let bus = EventBus::default();
        bus.publish(SettingsEvent::LocaleChanged {
            locale: SupportedLocale::Fr,
        });
    }

    #[tokio::test]
    async fn test_subscriber_receives_events() {
        let bus = create_event_bus(8);
        let mut rx = bus.subscribe();

        bus.publish(SettingsEvent::LocaleChanged {
            locale: SupportedLocale::Ja,
        });

        match rx.recv().await.unwrap() {
            SettingsEvent::LocaleChanged { locale } => assert_eq!(locale, SupportedLocale::Ja),
            other => panic!("unexpected event {:?}", other),
        }
    }
}
