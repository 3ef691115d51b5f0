#![forbid(unsafe_code)]

//! Canvas cells.
//!
//! A wide character occupies two adjacent cells: the head holds the
//! character, the tail is a [`CellContent::Continuation`] placeholder that is
//! skipped when the row is encoded.

use tessel_style::Style;

/// What a cell displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellContent {
    /// A character starting in this cell.
    Char(char),
    /// Second column of a wide character to the left.
    Continuation,
}

/// A single grid cell: content plus style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Displayed content.
    pub content: CellContent,
    /// Colors and attributes.
    pub style: Style,
}

impl Cell {
    /// An unstyled space.
    pub const BLANK: Self = Self::new(CellContent::Char(' '), Style::NONE);

    #[inline]
    pub const fn new(content: CellContent, style: Style) -> Self {
        Self { content, style }
    }

    /// A styled character cell.
    #[inline]
    pub const fn from_char(ch: char, style: Style) -> Self {
        Self::new(CellContent::Char(ch), style)
    }

    /// Check if this is an unstyled space.
    ///
    /// Trailing blank cells are trimmed when a row is encoded.
    #[inline]
    pub fn is_blank(&self) -> bool {
        matches!(self.content, CellContent::Char(' ')) && self.style.is_plain()
    }

    #[inline]
    pub const fn is_continuation(&self) -> bool {
        matches!(self.content, CellContent::Continuation)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}
