//! Observable value cell with callback subscriptions.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use tokio::sync::watch;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Shared<T> {
    sender: watch::Sender<T>,
    subscribers: RwLock<HashMap<u64, Callback<T>>>,
    next_id: AtomicU64,
}

/// A single value that notifies subscribers whenever it is set.
///
/// Subscribing replays the current value to the new callback right away.
/// Callbacks run on the thread that calls [`Observable::set`], outside of
/// any internal lock, so a callback may subscribe, unsubscribe or set again.
pub struct Observable<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Observable<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new cell holding `initial`.
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            shared: Arc::new(Shared {
                sender,
                subscribers: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.shared.sender.borrow().clone()
    }

    /// Replace the value and notify every current subscriber.
    pub fn set(&self, value: T) {
        let callbacks: Vec<Callback<T>> = {
            let subscribers = self
                .shared
                .subscribers
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            self.shared.sender.send_replace(value.clone());
            subscribers.values().cloned().collect()
        };

        for callback in callbacks {
            callback(&value);
        }
    }

    /// Register a callback and invoke it immediately with the current value.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let callback: Callback<T> = Arc::new(callback);
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);

        let current = {
            let mut subscribers = self
                .shared
                .subscribers
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            subscribers.insert(id, Arc::clone(&callback));
            self.get()
        };
        callback(&current);

        let shared: Weak<Shared<T>> = Arc::downgrade(&self.shared);
        Subscription {
            remove: Some(Box::new(move || {
                if let Some(shared) = shared.upgrade() {
                    shared
                        .subscribers
                        .write()
                        .unwrap_or_else(PoisonError::into_inner)
                        .remove(&id);
                }
            })),
        }
    }

    /// Get a watch receiver that always observes the latest value.
    pub fn watch(&self) -> watch::Receiver<T> {
        self.shared.sender.subscribe()
    }

    /// Get the number of registered callbacks.
    pub fn subscriber_count(&self) -> usize {
        self.shared
            .subscribers
            .read()
            .map(|s| s.len())
            .unwrap_or(0)
    }
}

impl<T> Default for Observable<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.shared.sender.borrow())
            .finish_non_exhaustive()
    }
}

/// Handle to a registered callback.
///
/// Dropping the handle unregisters the callback; call [`Subscription::detach`]
/// to keep it registered for the lifetime of the cell.
#[must_use = "dropping a Subscription unregisters its callback"]
pub struct Subscription {
    remove: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Unregister the callback.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Keep the callback registered without holding the handle.
    pub fn detach(mut self) {
        self.remove = None;
    }

    fn release(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.remove.is_some())
            .finish()
    }
}
