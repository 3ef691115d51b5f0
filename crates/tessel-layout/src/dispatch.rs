#![forbid(unsafe_code)]

//! Key dispatch over a rendered tree.
//!
//! Handlers are offered the event deepest-first: a node's children are
//! visited in reverse order before the node itself, so the last-painted
//! (topmost) subtree sees a key before its earlier siblings and ancestors.
//! The first handler returning `true` consumes the event and stops the walk.
//!
//! Children built by `Static` nodes are emitted to scrollback and never
//! receive keys.

use tessel_core::event::KeyEvent;

use crate::node::Node;

/// Offer `event` to every handler under `root`. Returns `true` if consumed.
pub fn dispatch_key(root: &Node, event: &KeyEvent) -> bool {
    let consumed = root
        .children()
        .iter()
        .rev()
        .any(|child| dispatch_key(child, event))
        || root.key_handler.as_ref().is_some_and(|handler| handler(event));

    #[cfg(feature = "tracing")]
    if consumed && root.key_handler.is_some() {
        tracing::trace!(key = %event, "key consumed");
    }

    consumed
}
