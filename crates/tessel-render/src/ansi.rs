#![forbid(unsafe_code)]

//! ANSI escape sequence generation helpers.
//!
//! Pure byte-generation functions: no state tracking, callers decide when a
//! sequence is needed.
//!
//! # Sequence Reference
//!
//! | Category | Sequence | Description |
//! |----------|----------|-------------|
//! | CSI | `ESC [ n m` | SGR (Select Graphic Rendition) |
//! | CSI | `ESC [ n F` | CPL (Cursor Previous Line) |
//! | CSI | `ESC [ K` | EL (Erase to end of line) |

use std::io::{self, Write};

use tessel_style::{Color, Style, StyleFlags};

// =============================================================================
// SGR (Select Graphic Rendition)
// =============================================================================

/// SGR reset: `CSI 0 m`
pub const SGR_RESET: &[u8] = b"\x1b[0m";

/// Write SGR reset sequence.
#[inline]
pub fn sgr_reset<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(SGR_RESET)
}

/// Ordered table of (flag, SGR "on" code).
pub const FLAG_TABLE: [(StyleFlags, u8); 8] = [
    (StyleFlags::BOLD, 1),
    (StyleFlags::DIM, 2),
    (StyleFlags::ITALIC, 3),
    (StyleFlags::UNDERLINE, 4),
    (StyleFlags::BLINK, 5),
    (StyleFlags::REVERSE, 7),
    (StyleFlags::HIDDEN, 8),
    (StyleFlags::STRIKETHROUGH, 9),
];

/// Write SGR sequence for style flags (all set flags).
///
/// Emits `CSI n ; n ; ... m`. Does not emit a reset first.
pub fn sgr_flags<W: Write>(w: &mut W, flags: StyleFlags) -> io::Result<()> {
    if flags.is_empty() {
        return Ok(());
    }
    w.write_all(b"\x1b[")?;
    let mut first = true;
    for (flag, code) in FLAG_TABLE {
        if flags.contains(flag) {
            if !first {
                w.write_all(b";")?;
            }
            write!(w, "{code}")?;
            first = false;
        }
    }
    w.write_all(b"m")
}

/// Write SGR sequence for true color foreground: `CSI 38;2;r;g;b m`
pub fn sgr_fg_rgb<W: Write>(w: &mut W, r: u8, g: u8, b: u8) -> io::Result<()> {
    write!(w, "\x1b[38;2;{r};{g};{b}m")
}

/// Write SGR sequence for true color background: `CSI 48;2;r;g;b m`
pub fn sgr_bg_rgb<W: Write>(w: &mut W, r: u8, g: u8, b: u8) -> io::Result<()> {
    write!(w, "\x1b[48;2;{r};{g};{b}m")
}

/// Write SGR sequence for 256-color foreground: `CSI 38;5;n m`
pub fn sgr_fg_256<W: Write>(w: &mut W, index: u8) -> io::Result<()> {
    write!(w, "\x1b[38;5;{index}m")
}

/// Write SGR sequence for 256-color background: `CSI 48;5;n m`
pub fn sgr_bg_256<W: Write>(w: &mut W, index: u8) -> io::Result<()> {
    write!(w, "\x1b[48;5;{index}m")
}

/// Write SGR sequence for 16-color foreground.
///
/// Uses codes 30-37 for normal colors, 90-97 for bright colors.
pub fn sgr_fg_16<W: Write>(w: &mut W, index: u8) -> io::Result<()> {
    let code = if index < 8 { 30 + index } else { 90 + index - 8 };
    write!(w, "\x1b[{code}m")
}

/// Write SGR sequence for 16-color background.
///
/// Uses codes 40-47 for normal colors, 100-107 for bright colors.
pub fn sgr_bg_16<W: Write>(w: &mut W, index: u8) -> io::Result<()> {
    let code = if index < 8 { 40 + index } else { 100 + index - 8 };
    write!(w, "\x1b[{code}m")
}

/// Write the foreground sequence for `color` at its own fidelity.
pub fn sgr_fg<W: Write>(w: &mut W, color: Color) -> io::Result<()> {
    match color {
        Color::Ansi16(c) => sgr_fg_16(w, c.as_u8()),
        Color::Ansi256(index) => sgr_fg_256(w, index),
        Color::Rgb(rgb) => sgr_fg_rgb(w, rgb.r, rgb.g, rgb.b),
    }
}

/// Write the background sequence for `color` at its own fidelity.
pub fn sgr_bg<W: Write>(w: &mut W, color: Color) -> io::Result<()> {
    match color {
        Color::Ansi16(c) => sgr_bg_16(w, c.as_u8()),
        Color::Ansi256(index) => sgr_bg_256(w, index),
        Color::Rgb(rgb) => sgr_bg_rgb(w, rgb.r, rgb.g, rgb.b),
    }
}

/// Write every sequence needed to turn on `style`.
///
/// Colors are written as given; downgrade them first.
pub fn sgr_style<W: Write>(w: &mut W, style: &Style) -> io::Result<()> {
    if let Some(fg) = style.fg {
        sgr_fg(w, fg)?;
    }
    if let Some(bg) = style.bg {
        sgr_bg(w, bg)?;
    }
    sgr_flags(w, style.flags)
}

// =============================================================================
// Cursor and erase
// =============================================================================

/// Move to the start of the line `n` rows up: `CSI n F`
pub fn cpl<W: Write>(w: &mut W, n: usize) -> io::Result<()> {
    match n {
        0 => Ok(()),
        1 => w.write_all(b"\x1b[F"),
        _ => write!(w, "\x1b[{n}F"),
    }
}

/// EL (Erase Line) to end: `CSI K`
pub const ERASE_TO_END: &[u8] = b"\x1b[K";

/// Erase from the cursor to the end of the line.
#[inline]
pub fn erase_line<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(ERASE_TO_END)
}

/// Move cursor to start of line: `\r` (CR)
#[inline]
pub fn cr<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\r")
}

/// Move cursor down one line: `\n` (LF)
///
/// Note: In raw mode (OPOST disabled), this moves y+1 but preserves x.
#[inline]
pub fn lf<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\n")
}

/// Start of the next line regardless of output post-processing: `\r\n`
#[inline]
pub fn crlf<W: Write>(w: &mut W) -> io::Result<()> {
    cr(w)?;
    lf(w)
}
