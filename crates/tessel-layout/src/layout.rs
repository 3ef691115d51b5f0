#![forbid(unsafe_code)]

//! Flow layout: measurement and placement.
//!
//! # Rules
//!
//! - Text measures `(widest line, line count)`; empty text is one empty line.
//! - A linear container measures the sum of its children along its axis and
//!   the max across it. Each child is measured against the space left along
//!   the axis after its earlier siblings.
//! - Children are placed at the container origin plus the running extent of
//!   earlier siblings; the cross-axis offset is always 0.
//! - A `Static` node takes no space.
//! - A [`SizeRequest`](crate::SizeRequest) replaces content size in its
//!   dimension, and the result is clamped to the constraints.

use tessel_core::geometry::{Constraints, Rect, Size};
use tessel_render::display_width;

use crate::node::{Axis, Node, NodeKind};

impl Node {
    /// Measure this node against `constraints`. Pure and deterministic.
    pub fn measure(&self, constraints: Constraints) -> Size {
        let content = match &self.kind {
            NodeKind::Text { content, .. } => text_size(content),
            NodeKind::Linear { axis, children } => {
                let mut flow = Flow::new(*axis, constraints);
                for child in children {
                    let size = child.measure(flow.child_constraints());
                    flow.advance(size);
                }
                flow.size()
            }
            NodeKind::Static(_) => Size::ZERO,
        };
        self.resolve(content, constraints)
    }

    /// Place this node with its top-left corner at (`x`, `y`), recording the
    /// absolute bounds of it and every descendant.
    ///
    /// Returns the node's size, equal to [`Node::measure`] for the same
    /// constraints.
    pub fn place(&mut self, x: u16, y: u16, constraints: Constraints) -> Size {
        let content = match &mut self.kind {
            NodeKind::Text { content, .. } => text_size(content),
            NodeKind::Linear { axis, children } => {
                let mut flow = Flow::new(*axis, constraints);
                for child in children.iter_mut() {
                    let (dx, dy) = flow.offset();
                    let size = child.place(
                        x.saturating_add(dx),
                        y.saturating_add(dy),
                        flow.child_constraints(),
                    );
                    flow.advance(size);
                }
                flow.size()
            }
            NodeKind::Static(_) => Size::ZERO,
        };
        let size = self.resolve(content, constraints);
        self.bounds = Rect::new(x, y, size.width, size.height);
        size
    }

    fn resolve(&self, content: Size, constraints: Constraints) -> Size {
        let width = self
            .size_request
            .width
            .map_or(content.width, |w| w.min(constraints.max_width));
        let height = self
            .size_request
            .height
            .map_or(content.height, |h| h.min(constraints.max_height));
        constraints.constrain(Size::new(width, height))
    }
}

fn text_size(content: &str) -> Size {
    let mut width = 0usize;
    let mut lines = 0usize;
    for line in content.split('\n') {
        width = width.max(display_width(line));
        lines += 1;
    }
    Size::new(clamp_u16(width), clamp_u16(lines))
}

fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

// Running state of a linear container while its children are visited.
struct Flow {
    axis: Axis,
    constraints: Constraints,
    main: u16,
    cross: u16,
}

impl Flow {
    fn new(axis: Axis, constraints: Constraints) -> Self {
        Self {
            axis,
            constraints,
            main: 0,
            cross: 0,
        }
    }

    fn child_constraints(&self) -> Constraints {
        let c = self.constraints;
        match self.axis {
            Axis::Row => Constraints::loose(c.max_width.saturating_sub(self.main), c.max_height),
            Axis::Column => Constraints::loose(c.max_width, c.max_height.saturating_sub(self.main)),
        }
    }

    fn offset(&self) -> (u16, u16) {
        match self.axis {
            Axis::Row => (self.main, 0),
            Axis::Column => (0, self.main),
        }
    }

    fn advance(&mut self, size: Size) {
        let (main, cross) = match self.axis {
            Axis::Row => (size.width, size.height),
            Axis::Column => (size.height, size.width),
        };
        self.main = self.main.saturating_add(main);
        self.cross = self.cross.max(cross);
    }

    fn size(&self) -> Size {
        match self.axis {
            Axis::Row => Size::new(self.main, self.cross),
            Axis::Column => Size::new(self.cross, self.main),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::SizeRequest;

    const WIDE: Constraints = Constraints::loose(100, 100);

    #[test]
    fn text_measures_widest_line_and_line_count() {
        assert_eq!(Node::text("ab\nabcd\n").measure(WIDE), Size::new(4, 3));
    }

    #[test]
    fn empty_text_is_one_line() {
        assert_eq!(Node::text("").measure(WIDE), Size::new(0, 1));
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(Node::text("日本").measure(WIDE), Size::new(4, 1));
    }

    #[test]
    fn empty_container_is_zero() {
        assert_eq!(Node::row(vec![]).measure(WIDE), Size::ZERO);
        assert_eq!(Node::column(vec![]).measure(WIDE), Size::ZERO);
    }

    #[test]
    fn row_sums_widths_and_maxes_heights() {
        let row = Node::row(vec![Node::text("ab"), Node::text("c\nd\ne")]);
        assert_eq!(row.measure(WIDE), Size::new(3, 3));
    }

    #[test]
    fn column_sums_heights_and_maxes_widths() {
        let col = Node::column(vec![Node::text("abc"), Node::text("d\ne")]);
        assert_eq!(col.measure(WIDE), Size::new(3, 3));
    }

    #[test]
    fn size_request_overrides_content() {
        let node = Node::text("abcdef").with_size(SizeRequest::fixed(2, 4));
        assert_eq!(node.measure(WIDE), Size::new(2, 4));
        let only_height = Node::text("abc").height(5);
        assert_eq!(only_height.measure(WIDE), Size::new(3, 5));
    }

    #[test]
    fn size_request_is_clamped_to_max() {
        let spacer = Node::spacer(50, 50);
        assert_eq!(spacer.measure(Constraints::loose(10, 3)), Size::new(10, 3));
    }

    #[test]
    fn content_is_clamped_to_max() {
        let node = Node::text("abcdefgh");
        assert_eq!(node.measure(Constraints::loose(5, 5)), Size::new(5, 1));
    }

    #[test]
    fn later_children_get_remaining_space() {
        let row = Node::row(vec![Node::spacer(7, 1), Node::spacer(7, 1)]);
        assert_eq!(row.measure(Constraints::loose(10, 1)), Size::new(10, 1));
    }

    #[test]
    fn static_takes_no_space() {
        let items = crate::StaticItems::new();
        items.push(1);
        let col = Node::column(vec![
            Node::text("a"),
            Node::static_items(&items, |n: &i32| Node::text(n.to_string())),
        ]);
        assert_eq!(col.measure(WIDE), Size::new(1, 1));
    }

    #[test]
    fn place_offsets_along_axis_only() {
        let mut tree = Node::column(vec![
            Node::text("One"),
            Node::row(vec![Node::text("ab"), Node::text("cde\nf")]),
        ]);
        let size = tree.place(1, 2, WIDE);
        assert_eq!(size, Size::new(5, 3));
        assert_eq!(tree.bounds(), Rect::new(1, 2, 5, 3));
        let [one, row] = tree.children() else {
            panic!("two children");
        };
        assert_eq!(one.bounds(), Rect::new(1, 2, 3, 1));
        assert_eq!(row.bounds(), Rect::new(1, 3, 5, 2));
        assert_eq!(row.children()[0].bounds(), Rect::new(1, 3, 2, 1));
        assert_eq!(row.children()[1].bounds(), Rect::new(3, 3, 3, 2));
    }

    #[test]
    fn place_matches_measure() {
        let mut tree = Node::row(vec![
            Node::spacer(2, 1),
            Node::column(vec![Node::text("xy"), Node::text("z").width(4)]),
        ]);
        let measured = tree.measure(Constraints::loose(5, 9));
        assert_eq!(tree.place(0, 0, Constraints::loose(5, 9)), measured);
    }
}
