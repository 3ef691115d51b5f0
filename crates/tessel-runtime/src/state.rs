#![forbid(unsafe_code)]

//! Observable values and change notification.
//!
//! A [`ChangeNotifier`] holds one pending flag. The first write after the
//! flag was consumed sets it and runs every subscriber; further writes only
//! keep it set. The scheduler consumes the flag with
//! [`ChangeNotifier::take_pending`] before rebuilding, so a write during a
//! pass arms the flag again and guarantees another pass.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

type Subscriber = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct NotifierInner {
    pending: AtomicBool,
    subscribers: Mutex<Vec<Subscriber>>,
}

/// Coalescing change notifier shared by every observable in a program.
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    inner: Arc<NotifierInner>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `callback` whenever a new batch of changes starts.
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(callback));
    }

    /// Record a change.
    pub fn notify(&self) {
        if self.inner.pending.swap(true, Ordering::AcqRel) {
            return;
        }
        let subscribers = self
            .inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for subscriber in subscribers {
            subscriber();
        }
    }

    /// Consume the pending flag. Returns whether anything changed since the
    /// last call.
    pub fn take_pending(&self) -> bool {
        self.inner.pending.swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self) -> bool {
        self.inner.pending.load(Ordering::Acquire)
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("pending", &self.is_pending())
            .finish()
    }
}

/// Typed observable cell. Every write notifies.
///
/// Clones share the value.
pub struct State<T> {
    value: Arc<RwLock<T>>,
    notifier: ChangeNotifier,
}

impl<T> State<T> {
    pub fn new(value: T, notifier: &ChangeNotifier) -> Self {
        Self {
            value: Arc::new(RwLock::new(value)),
            notifier: notifier.clone(),
        }
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    /// Read the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace the value.
    pub fn set(&self, value: T) {
        self.update(|slot| *slot = value);
    }

    /// Modify the value in place.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = f(&mut self.value.write().unwrap_or_else(PoisonError::into_inner));
        self.notifier.notify();
        result
    }
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            notifier: self.notifier.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with(|value| f.debug_tuple("State").field(value).finish())
    }
}
