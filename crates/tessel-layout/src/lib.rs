#![forbid(unsafe_code)]

//! Node tree and flow layout.
//!
//! - [`Node`] - `Text` leaves, `Linear` row/column containers, and `Static`
//!   append-only content
//! - [`Node::measure`] / [`Node::place`] - pure measurement and absolute
//!   placement against [`Constraints`]
//! - [`render`] - lay out a tree and encode it into a [`Frame`]
//! - [`dispatch_key`] - offer a key event to the tree's handlers

pub mod dispatch;
mod layout;
pub mod node;
pub mod render;
pub mod static_items;

pub use dispatch::dispatch_key;
pub use node::{Axis, KeyHandler, Node, NodeKind, SizeRequest};
pub use render::render;
pub use static_items::StaticItems;
pub use tessel_core::geometry::{Constraints, Rect, Size};
pub use tessel_render::frame::Frame;
