#![forbid(unsafe_code)]

//! Tree rendering: layout, paint, encode.
//!
//! One call produces one [`Frame`]. The dynamic part is the root painted into
//! a canvas of the root's size (at most the terminal size). The static part
//! is every `Static` node's newly emitted items, collected in tree pre-order,
//! each laid out as a column against the terminal width with unbounded
//! height.
//!
//! Collecting advances each static log: items emitted here are purged by the
//! next call. Rendering the same tree twice therefore emits static items only
//! the first time.

use tessel_core::geometry::{Constraints, Rect};
use tessel_core::terminal_info::TerminalInfo;
use tessel_render::canvas::{Canvas, CanvasRegion};
use tessel_render::frame::Frame;
use tessel_style::ColorProfile;

use crate::node::{Node, NodeKind};

/// Lay out `root` against `terminal`, paint it, and collect static content.
pub fn render(root: &mut Node, terminal: TerminalInfo, profile: ColorProfile) -> Frame {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!(
        "tessel.layout.render",
        width = terminal.width,
        height = terminal.height
    )
    .entered();

    let lines = paint_lines(
        root,
        Constraints::loose(terminal.width, terminal.height),
        profile,
    );

    let mut static_lines = Vec::new();
    collect_static(root, terminal.width, profile, &mut static_lines);

    #[cfg(feature = "tracing")]
    tracing::trace!(
        lines = lines.len(),
        static_lines = static_lines.len(),
        "frame rendered"
    );

    Frame {
        lines,
        static_lines,
    }
}

fn paint_lines(node: &mut Node, constraints: Constraints, profile: ColorProfile) -> Vec<String> {
    let size = node.place(0, 0, constraints);
    let mut canvas = Canvas::new(size.width, size.height);
    paint(node, &mut canvas.region(node.bounds()));
    canvas.encode_lines(profile)
}

// `region` covers exactly `node.bounds()`.
fn paint(node: &Node, region: &mut CanvasRegion<'_>) {
    match &node.kind {
        NodeKind::Text { content, style } => {
            for (row, line) in content.split('\n').enumerate() {
                let Ok(row) = u16::try_from(row) else {
                    break;
                };
                region.write(0, row, line, *style);
            }
        }
        NodeKind::Linear { children, .. } => {
            let origin = node.bounds();
            for child in children {
                let bounds = child.bounds();
                let local = Rect::new(
                    bounds.x.saturating_sub(origin.x),
                    bounds.y.saturating_sub(origin.y),
                    bounds.width,
                    bounds.height,
                );
                paint(child, &mut region.region(local));
            }
        }
        NodeKind::Static(_) => {}
    }
}

fn collect_static(node: &Node, width: u16, profile: ColorProfile, out: &mut Vec<String>) {
    match &node.kind {
        NodeKind::Static(source) => {
            let children = source.source.collect_children();
            if children.is_empty() {
                return;
            }
            let mut column = Node::column(children);
            out.extend(paint_lines(
                &mut column,
                Constraints::loose(width, u16::MAX),
                profile,
            ));
            collect_static(&column, width, profile, out);
        }
        NodeKind::Linear { children, .. } => {
            for child in children {
                collect_static(child, width, profile, out);
            }
        }
        NodeKind::Text { .. } => {}
    }
}
