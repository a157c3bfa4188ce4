//! `EnvironmentProvider` implementations for the different hosts.

mod headless;
mod manual;
mod system;

pub use headless::HeadlessEnvironment;
pub use manual::ManualEnvironment;
pub use system::{normalize_posix_locale, SystemEnvironment};
#[cfg(feature = "tauri")]
pub(crate) use system::{detect_dark_mode, system_language_tag};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::environment::{PreferenceCallback, Subscription};

/// Registry of preference-change callbacks shared by the providers.
///
/// Remembers the last reported flag and only notifies on an actual flip.
pub struct PreferenceListeners {
    callbacks: Mutex<Vec<(u64, Arc<PreferenceCallback>)>>,
    last: Mutex<Option<bool>>,
    next_id: AtomicU64,
}

impl PreferenceListeners {
    pub fn new(initial: Option<bool>) -> Arc<Self> {
        Arc::new(Self {
            callbacks: Mutex::new(Vec::new()),
            last: Mutex::new(initial),
            next_id: AtomicU64::new(0),
        })
    }

    pub fn register(self: &Arc<Self>, callback: PreferenceCallback) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.callbacks).push((id, Arc::new(callback)));

        let listeners = Arc::downgrade(self);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                lock(&listeners.callbacks).retain(|(cb_id, _)| *cb_id != id);
            }
        })
    }

    /// Record the latest flag; fan out only when it differs from the last one.
    /// Returns whether listeners were notified.
    pub fn notify(&self, prefers_dark: bool) -> bool {
        {
            let mut last = lock(&self.last);
            if *last == Some(prefers_dark) {
                return false;
            }
            *last = Some(prefers_dark);
        }

        let callbacks: Vec<Arc<PreferenceCallback>> = lock(&self.callbacks)
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();

        tracing::debug!(
            "Dark mode preference changed to {}, notifying {} listener(s)",
            prefers_dark,
            callbacks.len()
        );
        for callback in callbacks {
            callback(prefers_dark);
        }
        true
    }

    pub fn last(&self) -> Option<bool> {
        *lock(&self.last)
    }

    pub fn len(&self) -> usize {
        lock(&self.callbacks).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_notify_only_on_flip() {
        let listeners = PreferenceListeners::new(Some(false));
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let _sub = listeners.register(Box::new(move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        }));

        assert!(!listeners.notify(false));
        assert!(listeners.notify(true));
        assert!(!listeners.notify(true));
        assert!(listeners.notify(false));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_dropped_subscription_unregisters() {
        let listeners = PreferenceListeners::new(None);
        let sub = listeners.register(Box::new(|_| {}));
        assert_eq!(listeners.len(), 1);
        drop(sub);
        assert!(listeners.is_empty());
    }
}
