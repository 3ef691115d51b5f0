#![forbid(unsafe_code)]

//! Text style: optional colors plus attribute flags.

use bitflags::bitflags;

use crate::color::{Color, ColorProfile};

bitflags! {
    /// 8-bit cell style flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        /// Bold / increased intensity.
        const BOLD          = 0b0000_0001;
        /// Dim / decreased intensity.
        const DIM           = 0b0000_0010;
        /// Italic text.
        const ITALIC        = 0b0000_0100;
        /// Underlined text.
        const UNDERLINE     = 0b0000_1000;
        /// Blinking text.
        const BLINK         = 0b0001_0000;
        /// Reverse video (swap fg/bg).
        const REVERSE       = 0b0010_0000;
        /// Strikethrough text.
        const STRIKETHROUGH = 0b0100_0000;
        /// Hidden / invisible text.
        const HIDDEN        = 0b1000_0000;
    }
}

/// Foreground, background, and attributes applied to a run of text.
///
/// `None` colors mean "terminal default".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    /// Foreground color.
    pub fg: Option<Color>,
    /// Background color.
    pub bg: Option<Color>,
    /// Attribute flags.
    pub flags: StyleFlags,
}

impl Style {
    /// The empty style.
    pub const NONE: Self = Self {
        fg: None,
        bg: None,
        flags: StyleFlags::empty(),
    };

    /// Create an empty style.
    #[must_use]
    pub const fn new() -> Self {
        Self::NONE
    }

    /// Set the foreground color.
    #[must_use]
    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background color.
    #[must_use]
    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    /// Add attribute flags.
    #[must_use]
    pub const fn flags(mut self, flags: StyleFlags) -> Self {
        self.flags = self.flags.union(flags);
        self
    }

    #[must_use]
    pub const fn bold(self) -> Self {
        self.flags(StyleFlags::BOLD)
    }

    #[must_use]
    pub const fn dim(self) -> Self {
        self.flags(StyleFlags::DIM)
    }

    #[must_use]
    pub const fn italic(self) -> Self {
        self.flags(StyleFlags::ITALIC)
    }

    #[must_use]
    pub const fn underline(self) -> Self {
        self.flags(StyleFlags::UNDERLINE)
    }

    #[must_use]
    pub const fn reverse(self) -> Self {
        self.flags(StyleFlags::REVERSE)
    }

    #[must_use]
    pub const fn strikethrough(self) -> Self {
        self.flags(StyleFlags::STRIKETHROUGH)
    }

    /// Downgrade both colors to `profile`; attributes are kept.
    #[must_use]
    pub fn downgrade(self, profile: ColorProfile) -> Self {
        Self {
            fg: self.fg.and_then(|c| c.downgrade(profile)),
            bg: self.bg.and_then(|c| c.downgrade(profile)),
            flags: self.flags,
        }
    }

    /// Check if no color or attribute is set.
    #[must_use]
    pub const fn is_plain(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.flags.is_empty()
    }
}
