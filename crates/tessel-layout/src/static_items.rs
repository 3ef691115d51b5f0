#![forbid(unsafe_code)]

//! Append-only item log backing `Static` nodes.
//!
//! Items move through three states: pending (pushed, never emitted),
//! rendered (emitted by the last collection), and purged (dropped at the
//! start of the following collection). Each item is therefore emitted by
//! exactly one collection, in push order.
//!
//! Collection marks items under the lock and builds them after releasing
//! it, so a builder may push to or inspect the log it is rendering.
//!
//! The log outlives any single tree: trees are rebuilt every pass, while the
//! [`StaticItems`] handle is cloned into each rebuilt `Static` node.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::node::Node;

type Notify = Arc<dyn Fn() + Send + Sync>;

struct Item<T> {
    value: Arc<T>,
    rendered: bool,
}

struct Shared<T> {
    items: Mutex<Vec<Item<T>>>,
    notify: Option<Notify>,
}

/// Shared handle to an append-only item log.
///
/// Cloning is cheap and every clone sees the same items. Pushing is allowed
/// from any thread.
pub struct StaticItems<T> {
    shared: Arc<Shared<T>>,
}

impl<T> StaticItems<T> {
    /// An empty log that notifies nobody on push.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// An empty log that calls `notify` after every push.
    pub fn with_notify(notify: impl Fn() + Send + Sync + 'static) -> Self {
        Self::build(Some(Arc::new(notify)))
    }

    fn build(notify: Option<Notify>) -> Self {
        Self {
            shared: Arc::new(Shared {
                items: Mutex::new(Vec::new()),
                notify,
            }),
        }
    }

    /// Append `value`. It is emitted by the next collection.
    pub fn push(&self, value: T) {
        self.lock().push(Item {
            value: Arc::new(value),
            rendered: false,
        });
        if let Some(notify) = &self.shared.notify {
            notify();
        }
    }

    /// Items not yet purged, rendered or not.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Items never emitted.
    pub fn pending(&self) -> usize {
        self.lock().iter().filter(|item| !item.rendered).count()
    }

    /// Purge items emitted last time, then emit every remaining item through
    /// `build` and mark it rendered.
    pub(crate) fn collect<R>(&self, mut build: impl FnMut(&T) -> R) -> Vec<R> {
        let emitted: Vec<Arc<T>> = {
            let mut items = self.lock();
            items.retain(|item| !item.rendered);
            items
                .iter_mut()
                .map(|item| {
                    item.rendered = true;
                    Arc::clone(&item.value)
                })
                .collect()
        };
        emitted.iter().map(|value| build(value.as_ref())).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Item<T>>> {
        self.shared
            .items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Clone for StaticItems<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Default for StaticItems<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for StaticItems<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticItems")
            .field("len", &self.len())
            .field("pending", &self.pending())
            .finish()
    }
}

/// Type-erased view a `Static` node holds over its log.
pub(crate) trait StaticSource {
    /// Emit children for every item not yet emitted.
    fn collect_children(&self) -> Vec<Node>;
    /// Items never emitted.
    fn pending(&self) -> usize;
}

pub(crate) struct StaticBinding<T, F> {
    pub(crate) items: StaticItems<T>,
    pub(crate) build: F,
}

impl<T, F> StaticSource for StaticBinding<T, F>
where
    F: Fn(&T) -> Node,
{
    fn collect_children(&self) -> Vec<Node> {
        self.items.collect(&self.build)
    }

    fn pending(&self) -> usize {
        self.items.pending()
    }
}
