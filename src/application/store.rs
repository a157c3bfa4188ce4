use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread::{self, ThreadId};

use crate::domain::environment::Subscription;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Serializes writes across threads while letting a writer re-enter from the
/// callbacks it triggers.
///
/// A nested push from the draining thread only queues its item; the running
/// drain applies it once the current item is done. Pushes from other threads
/// wait for the drain and see every earlier item applied.
pub(crate) struct WriteQueue<W> {
    pending: Mutex<VecDeque<W>>,
    drainer: Mutex<Option<ThreadId>>,
    gate: Mutex<()>,
}

impl<W> WriteQueue<W> {
    pub(crate) fn new() -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
            drainer: Mutex::new(None),
            gate: Mutex::new(()),
        }
    }

    pub(crate) fn push(&self, write: W, mut apply: impl FnMut(W)) {
        let me = thread::current().id();
        lock(&self.pending).push_back(write);
        if *lock(&self.drainer) == Some(me) {
            return;
        }

        let _gate = lock(&self.gate);
        let _drainer = DrainerGuard::enter(&self.drainer, me);
        while let Some(write) = self.pop() {
            apply(write);
        }
    }

    fn pop(&self) -> Option<W> {
        lock(&self.pending).pop_front()
    }
}

struct DrainerGuard<'a> {
    slot: &'a Mutex<Option<ThreadId>>,
}

impl<'a> DrainerGuard<'a> {
    fn enter(slot: &'a Mutex<Option<ThreadId>>, id: ThreadId) -> Self {
        *lock(slot) = Some(id);
        Self { slot }
    }
}

impl Drop for DrainerGuard<'_> {
    fn drop(&mut self) {
        *lock(self.slot) = None;
    }
}

enum Write<T> {
    Set(T),
    Subscribe(u64, Callback<T>),
}

/// Observable value holder.
///
/// `subscribe` delivers the current value immediately, then every committed
/// value in commit order until the returned [`Subscription`] is dropped.
/// Writes are serialized, and subscribers are notified only after the new
/// value is visible through [`Store::get`]. A callback may write back to the
/// store notifying it; that write is committed as soon as the current
/// notification round finishes.
pub struct Store<T> {
    inner: Arc<StoreInner<T>>,
}

struct StoreInner<T> {
    value: RwLock<T>,
    subscribers: Mutex<Vec<(u64, Callback<T>)>>,
    next_id: AtomicU64,
    writes: WriteQueue<Write<T>>,
}

impl<T: Clone + Send + Sync + 'static> Store<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                value: RwLock::new(initial),
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
                writes: WriteQueue::new(),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.inner
            .value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Commit `value`, then notify every subscriber
    pub fn set(&self, value: T) {
        self.inner
            .writes
            .push(Write::Set(value), |write| self.inner.apply(write));
    }

    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.writes.push(Write::Subscribe(id, Arc::new(callback)), |write| {
            self.inner.apply(write)
        });

        let inner = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                lock(&inner.subscribers).retain(|(sub_id, _)| *sub_id != id);
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner.subscribers).len()
    }

    /// View that can observe but not write
    pub fn read_only(&self) -> ReadOnlyStore<T> {
        ReadOnlyStore {
            store: self.clone(),
        }
    }
}

impl<T: Clone> StoreInner<T> {
    fn apply(&self, write: Write<T>) {
        match write {
            Write::Set(value) => {
                *self.value.write().unwrap_or_else(PoisonError::into_inner) = value.clone();

                // Snapshot so callbacks may unsubscribe themselves
                let callbacks: Vec<Callback<T>> = lock(&self.subscribers)
                    .iter()
                    .map(|(_, callback)| callback.clone())
                    .collect();

                for callback in callbacks {
                    callback(&value);
                }
            }
            Write::Subscribe(id, callback) => {
                let current = self
                    .value
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone();
                callback(&current);
                lock(&self.subscribers).push((id, callback));
            }
        }
    }
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Default + Clone + Send + Sync + 'static> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Read-only handle onto a [`Store`]
pub struct ReadOnlyStore<T> {
    store: Store<T>,
}

impl<T: Clone + Send + Sync + 'static> ReadOnlyStore<T> {
    pub fn get(&self) -> T {
        self.store.get()
    }

    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        self.store.subscribe(callback)
    }
}

impl<T> Clone for ReadOnlyStore<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(&T) + Send + Sync) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |value: &T| sink.lock().unwrap().push(value.clone()))
    }

    #[test]
    fn test_subscribe_delivers_current_value_first() {
        let store = Store::new(1);
        let (seen, callback) = recorder();

        let _sub = store.subscribe(callback);
        store.set(2);
        store.set(3);

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_dropped_subscription_stops_delivery() {
        let store = Store::new("a".to_string());
        let (seen, callback) = recorder();

        let sub = store.subscribe(callback);
        store.set("b".to_string());
        drop(sub);
        store.set("c".to_string());

        assert_eq!(*seen.lock().unwrap(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_value_is_committed_before_notify() {
        let store = Store::new(0);
        let reader = store.clone();
        let (seen, callback) = recorder();

        let _sub = store.subscribe(move |_: &i32| callback(&reader.get()));
        store.set(7);

        assert_eq!(*seen.lock().unwrap(), vec![0, 7]);
    }

    #[test]
    fn test_read_only_view_observes_writes() {
        let store = Store::new(false);
        let view = store.read_only();
        let (seen, callback) = recorder();

        let _sub = view.subscribe(callback);
        store.set(true);

        assert!(view.get());
        assert_eq!(*seen.lock().unwrap(), vec![false, true]);
    }

    #[test]
    fn test_subscriber_may_write_back() {
        let store = Store::new(0);
        let writer = store.clone();
        let (seen, record) = recorder();

        let _sub = store.subscribe(move |value: &i32| {
            record(value);
            if *value > 0 && *value < 3 {
                writer.set(value + 1);
            }
        });
        store.set(1);

        assert_eq!(store.get(), 3);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_concurrent_writers_all_land() {
        let store = Store::new(0usize);
        let (seen, callback) = recorder();
        let _sub = store.subscribe(callback);

        let handles: Vec<_> = (1..=4)
            .map(|n| {
                let store = store.clone();
                std::thread::spawn(move || store.set(n))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut seen = seen.lock().unwrap().clone();
        assert_eq!(seen.remove(0), 0);
        assert_eq!(*seen.last().unwrap(), store.get());
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_subscription_outliving_store_is_harmless() {
        let store = Store::new(1u8);
        let sub = store.subscribe(|_| {});
        drop(store);
        drop(sub);
    }
}
