#![forbid(unsafe_code)]

//! Canvas grid storage.
//!
//! A [`Canvas`] is a 2D grid of [`Cell`]s sized once per render pass. Nodes
//! draw into it through a [`CanvasRegion`], a clipped view with its own local
//! origin, so a child can never paint outside the rectangle it was placed in.
//!
//! # Layout
//!
//! Cells are stored in row-major order: `index = y * width + x`.
//!
//! # Invariants
//!
//! 1. `cells.len() == width * height`
//! 2. Width and height never change after creation
//! 3. A region's clip is always inside its parent's clip
//! 4. A wide character is either fully present (head + continuation) or
//!    absent; overwriting half of one blanks the other half

use std::io::{self, Write};

use tessel_core::geometry::{Rect, Size};
use tessel_style::{ColorProfile, Style};
use unicode_width::UnicodeWidthChar;

use crate::ansi;
use crate::cell::{Cell, CellContent};

/// A 2D grid of styled cells.
///
/// # Example
///
/// ```
/// use tessel_render::canvas::Canvas;
/// use tessel_style::Style;
///
/// let mut canvas = Canvas::new(5, 1);
/// canvas.write(0, 0, "Hi", Style::NONE);
/// assert_eq!(canvas.row_text(0), "Hi");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    /// Create a blank canvas. Zero-sized canvases are allowed and hold no
    /// cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; width as usize * height as usize],
        }
    }

    /// Canvas width in cells.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Canvas height in cells.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The full canvas as a rectangle.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.size())
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    /// Get the cell at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Cells of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y` is out of bounds.
    pub fn row_cells(&self, y: u16) -> &[Cell] {
        assert!(y < self.height, "row {y} out of bounds");
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// A clipped view over `rect`, with `rect`'s top-left as local origin.
    pub fn region(&mut self, rect: Rect) -> CanvasRegion<'_> {
        let clip = self.bounds().intersection(&rect);
        CanvasRegion {
            canvas: self,
            area: rect,
            clip,
        }
    }

    /// Write a styled run at (x, y) in canvas coordinates.
    ///
    /// Returns the number of columns the run advanced.
    pub fn write(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        let bounds = self.bounds();
        self.region(bounds).write(x, y, text, style)
    }

    // Overwrite one cell, blanking the other half of any wide character it
    // splits.
    fn put(&mut self, x: u16, y: u16, cell: Cell) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        if self.cells[i].is_continuation() {
            if x > 0 {
                self.cells[i - 1] = Cell::BLANK;
            }
        } else if x + 1 < self.width && self.cells[i + 1].is_continuation() {
            self.cells[i + 1] = Cell::BLANK;
        }
        self.cells[i] = cell;
    }

    /// Encode row `y` as SGR-styled text, downgrading colors to `profile`.
    ///
    /// Trailing unstyled blanks are dropped; a line clear covers them.
    pub fn encode_row(&self, y: u16, profile: ColorProfile) -> String {
        let mut buf = Vec::with_capacity(self.width as usize);
        // Writes into a Vec cannot fail.
        let _ = self.write_row(y, profile, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Encode every row, top to bottom.
    pub fn encode_lines(&self, profile: ColorProfile) -> Vec<String> {
        (0..self.height)
            .map(|y| self.encode_row(y, profile))
            .collect()
    }

    /// Stream row `y` into `w`.
    pub fn write_row<W: Write>(&self, y: u16, profile: ColorProfile, w: &mut W) -> io::Result<()> {
        let row = self.row_cells(y);
        let end = row.iter().rposition(|c| !c.is_blank()).map_or(0, |i| i + 1);

        let mut current = Style::NONE;
        let mut utf8 = [0u8; 4];
        for cell in &row[..end] {
            let CellContent::Char(ch) = cell.content else {
                continue;
            };
            let style = cell.style.downgrade(profile);
            if style != current {
                if !current.is_plain() {
                    ansi::sgr_reset(w)?;
                }
                ansi::sgr_style(w, &style)?;
                current = style;
            }
            w.write_all(ch.encode_utf8(&mut utf8).as_bytes())?;
        }
        if !current.is_plain() {
            ansi::sgr_reset(w)?;
        }
        Ok(())
    }

    /// Row `y` as plain text without styling, trailing blanks trimmed.
    pub fn row_text(&self, y: u16) -> String {
        let text: String = self
            .row_cells(y)
            .iter()
            .filter_map(|c| match c.content {
                CellContent::Char(ch) => Some(ch),
                CellContent::Continuation => None,
            })
            .collect();
        text.trim_end_matches(' ').to_string()
    }
}

/// A clipped, locally addressed view into a [`Canvas`].
///
/// Coordinates passed to a region are relative to its area's top-left
/// corner. Anything falling outside the clip is silently dropped.
#[derive(Debug)]
pub struct CanvasRegion<'a> {
    canvas: &'a mut Canvas,
    area: Rect,
    clip: Rect,
}

impl CanvasRegion<'_> {
    /// The region's nominal size (before clipping).
    #[inline]
    pub const fn size(&self) -> Size {
        self.area.size()
    }

    /// The absolute rectangle actually writable.
    #[inline]
    pub const fn clip(&self) -> Rect {
        self.clip
    }

    /// Narrow to a sub-rectangle given in this region's local coordinates.
    pub fn region(&mut self, local: Rect) -> CanvasRegion<'_> {
        let area = local.offset(self.area.x, self.area.y);
        let clip = self.clip.intersection(&area);
        CanvasRegion {
            canvas: &mut *self.canvas,
            area,
            clip,
        }
    }

    /// Set one cell at local (x, y).
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let (ax, ay) = (self.area.x.saturating_add(x), self.area.y.saturating_add(y));
        if self.clip.contains(ax, ay) {
            self.canvas.put(ax, ay, cell);
        }
    }

    /// Write a styled run at local (x, y), left to right, without wrapping.
    ///
    /// Wide characters take two cells and are dropped whole if either cell is
    /// clipped; zero-width and control characters are skipped. Returns the
    /// number of columns the run advanced.
    pub fn write(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        let ay = self.area.y.saturating_add(y);
        let start = self.area.x as u32 + x as u32;
        let mut col = start;
        for ch in text.chars() {
            let width = match ch.width() {
                Some(w @ 1..=2) => w as u32,
                _ => continue,
            };
            if col + width > u16::MAX as u32 {
                break;
            }
            let cx = col as u16;
            if width == 1 {
                if self.clip.contains(cx, ay) {
                    self.canvas.put(cx, ay, Cell::from_char(ch, style));
                }
            } else if self.clip.contains(cx, ay) && self.clip.contains(cx + 1, ay) {
                self.canvas.put(cx, ay, Cell::from_char(ch, style));
                self.canvas
                    .put(cx + 1, ay, Cell::new(CellContent::Continuation, style));
            }
            col += width;
        }
        (col - start).min(u16::MAX as u32) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_style::Color;

    #[test]
    fn zero_sized_canvas_encodes_nothing() {
        let canvas = Canvas::new(0, 0);
        assert!(canvas.encode_lines(ColorProfile::TrueColor).is_empty());
    }

    #[test]
    fn write_clips_at_canvas_edge() {
        let mut canvas = Canvas::new(3, 1);
        assert_eq!(canvas.write(1, 0, "abcd", Style::NONE), 4);
        assert_eq!(canvas.row_text(0), " ab");
    }

    #[test]
    fn region_uses_local_coordinates_and_clips() {
        let mut canvas = Canvas::new(6, 2);
        {
            let mut region = canvas.region(Rect::new(2, 1, 3, 1));
            region.write(0, 0, "hello", Style::NONE);
            region.write(0, 1, "below", Style::NONE);
        }
        assert_eq!(canvas.row_text(0), "");
        assert_eq!(canvas.row_text(1), "  hel");
    }

    #[test]
    fn nested_region_never_escapes_parent() {
        let mut canvas = Canvas::new(10, 1);
        {
            let mut outer = canvas.region(Rect::new(2, 0, 3, 1));
            let mut inner = outer.region(Rect::new(1, 0, 8, 1));
            assert_eq!(inner.clip(), Rect::new(3, 0, 2, 1));
            inner.write(0, 0, "xxxxxxxx", Style::NONE);
        }
        assert_eq!(canvas.row_text(0), "   xx");
    }

    #[test]
    fn wide_char_takes_two_cells() {
        let mut canvas = Canvas::new(4, 1);
        assert_eq!(canvas.write(0, 0, "日a", Style::NONE), 3);
        assert!(canvas.get(1, 0).unwrap().is_continuation());
        assert_eq!(canvas.row_text(0), "日a");
    }

    #[test]
    fn wide_char_tail_carries_the_head_style() {
        let style = Style::new().fg(Color::RED).bold();
        let mut canvas = Canvas::new(2, 1);
        canvas.write(0, 0, "日", style);
        let tail = canvas.get(1, 0).unwrap();
        assert!(tail.is_continuation());
        assert_eq!(tail.style, style);
    }

    #[test]
    fn wide_char_straddling_clip_is_dropped() {
        let mut canvas = Canvas::new(3, 1);
        canvas.write(0, 0, "ab日", Style::NONE);
        assert_eq!(canvas.row_text(0), "ab");
    }

    #[test]
    fn overwriting_half_a_wide_char_blanks_the_other_half() {
        let mut canvas = Canvas::new(4, 1);
        canvas.write(0, 0, "日", Style::NONE);
        canvas.write(1, 0, "x", Style::NONE);
        assert_eq!(canvas.row_text(0), " x");
        canvas.write(2, 0, "日", Style::NONE);
        canvas.write(2, 0, "y", Style::NONE);
        assert_eq!(canvas.row_text(0), " xy");
    }

    #[test]
    fn zero_width_and_control_chars_are_dropped() {
        let mut canvas = Canvas::new(4, 1);
        assert_eq!(canvas.write(0, 0, "a\u{200b}\tb", Style::NONE), 2);
        assert_eq!(canvas.row_text(0), "ab");
    }

    #[test]
    fn encode_trims_trailing_unstyled_blanks() {
        let mut canvas = Canvas::new(8, 1);
        canvas.write(0, 0, "ab  ", Style::NONE);
        assert_eq!(canvas.encode_row(0, ColorProfile::TrueColor), "ab");
    }

    #[test]
    fn encode_keeps_styled_trailing_space() {
        let mut canvas = Canvas::new(4, 1);
        canvas.write(0, 0, "a ", Style::new().reverse());
        assert_eq!(
            canvas.encode_row(0, ColorProfile::TrueColor),
            "\x1b[7ma \x1b[0m"
        );
    }

    #[test]
    fn encode_switches_styles_with_reset() {
        let mut canvas = Canvas::new(4, 1);
        let red = Style::new().fg(Color::RED);
        canvas.write(0, 0, "a", red);
        canvas.write(1, 0, "b", red);
        canvas.write(2, 0, "c", Style::NONE);
        canvas.write(3, 0, "d", Style::new().bold());
        assert_eq!(
            canvas.encode_row(0, ColorProfile::TrueColor),
            "\x1b[31mab\x1b[0mc\x1b[1md\x1b[0m"
        );
    }

    #[test]
    fn mono_profile_drops_colors() {
        let mut canvas = Canvas::new(3, 1);
        canvas.write(0, 0, "abc", Style::new().fg(Color::rgb(9, 9, 9)));
        assert_eq!(canvas.encode_row(0, ColorProfile::Mono), "abc");
    }

    #[test]
    fn rgb_downgrades_to_palette() {
        let mut canvas = Canvas::new(1, 1);
        canvas.write(0, 0, "x", Style::new().fg(Color::rgb(255, 0, 0)));
        assert_eq!(
            canvas.encode_row(0, ColorProfile::Ansi256),
            "\x1b[38;5;196mx\x1b[0m"
        );
    }
}
