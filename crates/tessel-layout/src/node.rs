#![forbid(unsafe_code)]

//! The node tree.
//!
//! Trees are rebuilt wholesale every pass and only read afterwards, apart
//! from [`Node::place`] recording each node's bounds. Container children keep
//! insertion order, which is also paint order.

use std::fmt;

use tessel_core::event::KeyEvent;
use tessel_core::geometry::Rect;
use tessel_style::Style;

use crate::static_items::{StaticBinding, StaticItems, StaticSource};

/// Key handler attached to a node. Returns `true` when it consumed the event.
pub type KeyHandler = Box<dyn Fn(&KeyEvent) -> bool>;

/// Flow direction of a linear container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Children left to right.
    Row,
    /// Children top to bottom.
    Column,
}

/// Explicit size overriding content size per dimension.
///
/// The requested value is still clamped to the incoming constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SizeRequest {
    pub width: Option<u16>,
    pub height: Option<u16>,
}

impl SizeRequest {
    /// No override in either dimension.
    pub const NONE: Self = Self {
        width: None,
        height: None,
    };

    /// Override both dimensions.
    pub const fn fixed(width: u16, height: u16) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }
}

/// Variant-specific node data.
pub enum NodeKind {
    /// A styled text leaf; `\n` separates lines.
    Text { content: String, style: Style },
    /// A row or column of children.
    Linear { axis: Axis, children: Vec<Node> },
    /// Append-only content promoted to scrollback.
    Static(StaticNode),
}

/// Handle from a `Static` node to its item log.
pub struct StaticNode {
    pub(crate) source: Box<dyn StaticSource>,
}

impl StaticNode {
    /// Items that the next collection will emit.
    pub fn pending(&self) -> usize {
        self.source.pending()
    }
}

/// A node in the UI tree.
pub struct Node {
    pub kind: NodeKind,
    pub size_request: SizeRequest,
    pub(crate) key_handler: Option<KeyHandler>,
    pub(crate) bounds: Rect,
}

impl Node {
    fn from_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            size_request: SizeRequest::NONE,
            key_handler: None,
            bounds: Rect::default(),
        }
    }

    /// An unstyled text leaf.
    pub fn text(content: impl Into<String>) -> Self {
        Self::styled_text(content, Style::NONE)
    }

    /// A styled text leaf.
    pub fn styled_text(content: impl Into<String>, style: Style) -> Self {
        Self::from_kind(NodeKind::Text {
            content: content.into(),
            style,
        })
    }

    /// A linear container along `axis`.
    pub fn linear(axis: Axis, children: Vec<Node>) -> Self {
        Self::from_kind(NodeKind::Linear { axis, children })
    }

    /// Children laid out left to right.
    pub fn row(children: Vec<Node>) -> Self {
        Self::linear(Axis::Row, children)
    }

    /// Children laid out top to bottom.
    pub fn column(children: Vec<Node>) -> Self {
        Self::linear(Axis::Column, children)
    }

    /// Empty space of a fixed size.
    pub fn spacer(width: u16, height: u16) -> Self {
        Self::row(Vec::new()).with_size(SizeRequest::fixed(width, height))
    }

    /// Append-only content: every item pushed to `items` is built with
    /// `build` and emitted above the dynamic output exactly once.
    pub fn static_items<T: 'static>(
        items: &StaticItems<T>,
        build: impl Fn(&T) -> Node + 'static,
    ) -> Self {
        let binding = StaticBinding {
            items: items.clone(),
            build,
        };
        Self::from_kind(NodeKind::Static(StaticNode {
            source: Box::new(binding),
        }))
    }

    /// Override the measured size.
    #[must_use]
    pub fn with_size(mut self, request: SizeRequest) -> Self {
        self.size_request = request;
        self
    }

    /// Override the measured width.
    #[must_use]
    pub fn width(mut self, width: u16) -> Self {
        self.size_request.width = Some(width);
        self
    }

    /// Override the measured height.
    #[must_use]
    pub fn height(mut self, height: u16) -> Self {
        self.size_request.height = Some(height);
        self
    }

    /// Attach a key handler.
    #[must_use]
    pub fn on_key(mut self, handler: impl Fn(&KeyEvent) -> bool + 'static) -> Self {
        self.key_handler = Some(Box::new(handler));
        self
    }

    /// Bounds assigned by the last [`Node::place`].
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Child nodes of a linear container; empty for leaves and statics.
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Linear { children, .. } => children,
            _ => &[],
        }
    }

    pub fn has_key_handler(&self) -> bool {
        self.key_handler.is_some()
    }

    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let Rect {
            x,
            y,
            width,
            height,
        } = self.bounds;
        write!(f, "{:indent$}", "", indent = depth * 2)?;
        match &self.kind {
            NodeKind::Text { content, .. } => write!(f, "Text({content:?})")?,
            NodeKind::Linear { axis, .. } => write!(f, "{axis:?}")?,
            NodeKind::Static(node) => write!(f, "Static(pending={})", node.pending())?,
        }
        writeln!(f, " x={x} y={y} w={width} h={height}")?;
        for child in self.children() {
            child.fmt_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl From<&str> for Node {
    fn from(content: &str) -> Self {
        Self::text(content)
    }
}

impl From<String> for Node {
    fn from(content: String) -> Self {
        Self::text(content)
    }
}

/// One line per node, indented by depth, with placed bounds:
///
/// ```text
/// Column x=0 y=0 w=5 h=2
///   Text("One") x=0 y=0 w=3 h=1
///   Text("Three") x=0 y=1 w=5 h=1
/// ```
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Node");
        match &self.kind {
            NodeKind::Text { content, style } => {
                s.field("text", content).field("style", style);
            }
            NodeKind::Linear { axis, children } => {
                s.field("axis", axis).field("children", children);
            }
            NodeKind::Static(node) => {
                s.field("static_pending", &node.pending());
            }
        }
        s.field("size_request", &self.size_request)
            .field("key_handler", &self.key_handler.is_some())
            .field("bounds", &self.bounds)
            .finish()
    }
}
