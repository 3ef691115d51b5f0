#![forbid(unsafe_code)]

//! Geometric primitives: sizes, rectangles, and layout constraints.
//!
//! All measurements are unsigned terminal cells, so a negative size cannot be
//! expressed. The remaining contract violation (a minimum bound above its
//! maximum) is rejected with a panic when the constraints are built.

/// A width/height pair in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    /// Width in columns.
    pub width: u16,
    /// Height in rows.
    pub height: u16,
}

impl Size {
    /// The empty size.
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a new size.
    #[inline]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Check if either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Area in cells.
    #[inline]
    pub const fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }
}

impl From<(u16, u16)> for Size {
    fn from((width, height): (u16, u16)) -> Self {
        Self::new(width, height)
    }
}

/// A rectangle for placement bounds and clipping.
///
/// Uses terminal coordinates (0-indexed, origin at top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u16,
    /// Top edge (inclusive).
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// The size of this rectangle.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns an empty rectangle if the rectangles don't overlap.
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Rect::new(x, y, right - x, bottom - y)
        } else {
            Rect::default()
        }
    }

    /// Translate by an offset, saturating at the coordinate limit.
    #[inline]
    pub const fn offset(&self, dx: u16, dy: u16) -> Rect {
        Rect::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }
}

/// Min/max bounds a node must respect when measuring itself.
///
/// # Invariants
///
/// `min_width <= max_width` and `min_height <= max_height`. Both are checked on
/// construction; violating them is a bug upstream of layout and panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Constraints {
    /// Minimum width in columns.
    pub min_width: u16,
    /// Maximum width in columns.
    pub max_width: u16,
    /// Minimum height in rows.
    pub min_height: u16,
    /// Maximum height in rows.
    pub max_height: u16,
}

impl Constraints {
    /// Create constraints from explicit bounds.
    ///
    /// # Panics
    ///
    /// Panics if a minimum exceeds its maximum.
    pub const fn new(min_width: u16, max_width: u16, min_height: u16, max_height: u16) -> Self {
        assert!(min_width <= max_width, "constraints: min_width > max_width");
        assert!(
            min_height <= max_height,
            "constraints: min_height > max_height"
        );
        Self {
            min_width,
            max_width,
            min_height,
            max_height,
        }
    }

    /// Constraints with zero minimums and the given maximums.
    #[inline]
    pub const fn loose(max_width: u16, max_height: u16) -> Self {
        Self::new(0, max_width, 0, max_height)
    }

    /// Constraints with no effective upper bound.
    #[inline]
    pub const fn unbounded() -> Self {
        Self::loose(u16::MAX, u16::MAX)
    }

    /// Clamp a size into these bounds.
    #[inline]
    pub fn constrain(&self, size: Size) -> Size {
        Size::new(
            size.width.clamp(self.min_width, self.max_width),
            size.height.clamp(self.min_height, self.max_height),
        )
    }

    /// Shrink the maximums by the given amounts, dropping minimums that no
    /// longer fit.
    pub fn shrink(&self, width: u16, height: u16) -> Self {
        let max_width = self.max_width.saturating_sub(width);
        let max_height = self.max_height.saturating_sub(height);
        Self::new(
            self.min_width.min(max_width),
            max_width,
            self.min_height.min(max_height),
            max_height,
        )
    }
}

impl Default for Constraints {
    fn default() -> Self {
        Self::unbounded()
    }
}
