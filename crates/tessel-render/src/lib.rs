#![forbid(unsafe_code)]

//! Render kernel: cells, canvas, ANSI encoding, and frame output.

pub mod ansi;
pub mod canvas;
pub mod cell;
pub mod frame;
pub mod output;

use unicode_width::UnicodeWidthChar;

/// Columns `text` occupies when written to a canvas.
///
/// Matches [`canvas::CanvasRegion::write`]: zero-width and control characters
/// count as nothing, wide characters as two.
pub fn display_width(text: &str) -> usize {
    text.chars()
        .map(|ch| match ch.width() {
            Some(w @ 1..=2) => w,
            _ => 0,
        })
        .sum()
}
