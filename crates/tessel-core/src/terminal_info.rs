#![forbid(unsafe_code)]

//! Terminal dimensions and their single-writer publication cell.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::geometry::Size;

/// Size of the attached terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TerminalInfo {
    /// Width in columns.
    pub width: u16,
    /// Height in rows.
    pub height: u16,
}

impl TerminalInfo {
    /// Fallback used when the size cannot be queried.
    pub const FALLBACK: Self = Self::new(80, 24);

    /// Create terminal info from explicit dimensions.
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Query the current terminal size.
    ///
    /// Falls back to [`TerminalInfo::FALLBACK`] when no terminal is attached.
    #[must_use]
    pub fn detect() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        match crossterm::terminal::size() {
            Ok((width, height)) if width > 0 && height > 0 => return Self::new(width, height),
            Ok(_) => {}
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %_err, "terminal size unavailable, using fallback");
            }
        }
        Self::FALLBACK
    }

    /// The dimensions as a [`Size`].
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    const fn pack(self) -> u32 {
        ((self.width as u32) << 16) | self.height as u32
    }

    const fn unpack(bits: u32) -> Self {
        Self::new((bits >> 16) as u16, bits as u16)
    }
}

impl Default for TerminalInfo {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Atomically published [`TerminalInfo`].
///
/// Both dimensions live in one word, so a reader never sees the width of one
/// publication paired with the height of another.
#[derive(Debug)]
pub struct TerminalInfoCell {
    bits: AtomicU32,
}

impl TerminalInfoCell {
    /// Create a cell holding `info`.
    #[must_use]
    pub const fn new(info: TerminalInfo) -> Self {
        Self {
            bits: AtomicU32::new(info.pack()),
        }
    }

    /// Read the latest published value.
    #[must_use]
    pub fn load(&self) -> TerminalInfo {
        TerminalInfo::unpack(self.bits.load(Ordering::Acquire))
    }

    /// Publish `info` if it differs from the current value.
    ///
    /// Returns `true` when the stored value changed.
    pub fn publish(&self, info: TerminalInfo) -> bool {
        self.bits.swap(info.pack(), Ordering::AcqRel) != info.pack()
    }
}

impl Default for TerminalInfoCell {
    fn default() -> Self {
        Self::new(TerminalInfo::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_reports_change_only_on_difference() {
        let cell = TerminalInfoCell::new(TerminalInfo::new(80, 24));
        assert!(!cell.publish(TerminalInfo::new(80, 24)));
        assert!(cell.publish(TerminalInfo::new(100, 24)));
        assert!(cell.publish(TerminalInfo::new(100, 30)));
        assert_eq!(cell.load(), TerminalInfo::new(100, 30));
    }

    #[test]
    fn packing_preserves_extremes() {
        let cell = TerminalInfoCell::new(TerminalInfo::new(u16::MAX, 0));
        assert_eq!(cell.load(), TerminalInfo::new(u16::MAX, 0));
        cell.publish(TerminalInfo::new(0, u16::MAX));
        assert_eq!(cell.load(), TerminalInfo::new(0, u16::MAX));
    }

    #[test]
    fn detect_never_returns_zero_area() {
        assert!(!TerminalInfo::detect().size().is_empty());
    }
}
