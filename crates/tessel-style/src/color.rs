#![forbid(unsafe_code)]

//! Color types, profiles, and downgrade utilities.

use tessel_core::capabilities::TerminalCapabilities;

/// Terminal color profile used for downgrade decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorProfile {
    /// No color output.
    Mono,
    /// Standard 16 ANSI colors.
    Ansi16,
    /// Extended 256-color palette.
    Ansi256,
    /// Full 24-bit RGB color.
    TrueColor,
}

impl ColorProfile {
    /// Choose the best available profile from detection flags.
    ///
    /// `no_color` should reflect explicit user intent (e.g. NO_COLOR).
    #[must_use]
    pub const fn from_flags(true_color: bool, colors_256: bool, no_color: bool) -> Self {
        if no_color {
            Self::Mono
        } else if true_color {
            Self::TrueColor
        } else if colors_256 {
            Self::Ansi256
        } else {
            Self::Ansi16
        }
    }

    /// Choose the profile matching detected terminal capabilities.
    #[must_use]
    pub const fn from_capabilities(caps: &TerminalCapabilities) -> Self {
        Self::from_flags(caps.true_color, caps.colors_256, caps.no_color)
    }

    /// Detect the profile of the attached terminal.
    #[must_use]
    pub fn detect() -> Self {
        Self::from_capabilities(&TerminalCapabilities::detect())
    }
}

/// RGB color (opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel (0–255).
    pub r: u8,
    /// Green channel (0–255).
    pub g: u8,
    /// Blue channel (0–255).
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// ANSI 16-color indices (0-15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Ansi16 {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
    BrightBlack = 8,
    BrightRed = 9,
    BrightGreen = 10,
    BrightYellow = 11,
    BrightBlue = 12,
    BrightMagenta = 13,
    BrightCyan = 14,
    BrightWhite = 15,
}

impl Ansi16 {
    const ALL: [Self; 16] = [
        Self::Black,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
        Self::BrightBlack,
        Self::BrightRed,
        Self::BrightGreen,
        Self::BrightYellow,
        Self::BrightBlue,
        Self::BrightMagenta,
        Self::BrightCyan,
        Self::BrightWhite,
    ];

    /// Return the raw ANSI index (0–15).
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Convert a `u8` index, returning `None` if out of range.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        if value < 16 {
            Some(Self::ALL[value as usize])
        } else {
            None
        }
    }
}

/// A color value at varying fidelity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Standard 16-color ANSI value.
    Ansi16(Ansi16),
    /// 256-color palette index.
    Ansi256(u8),
    /// True-color RGB value.
    Rgb(Rgb),
}

impl Color {
    pub const BLACK: Self = Self::Ansi16(Ansi16::Black);
    pub const RED: Self = Self::Ansi16(Ansi16::Red);
    pub const GREEN: Self = Self::Ansi16(Ansi16::Green);
    pub const YELLOW: Self = Self::Ansi16(Ansi16::Yellow);
    pub const BLUE: Self = Self::Ansi16(Ansi16::Blue);
    pub const MAGENTA: Self = Self::Ansi16(Ansi16::Magenta);
    pub const CYAN: Self = Self::Ansi16(Ansi16::Cyan);
    pub const WHITE: Self = Self::Ansi16(Ansi16::White);

    /// Create a true-color RGB value.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgb(Rgb::new(r, g, b))
    }

    /// Convert this color to an RGB triplet regardless of its fidelity level.
    #[must_use]
    pub fn to_rgb(self) -> Rgb {
        match self {
            Self::Rgb(rgb) => rgb,
            Self::Ansi256(idx) => ansi256_to_rgb(idx),
            Self::Ansi16(color) => ansi16_to_rgb(color),
        }
    }

    /// Downgrade this color to fit the given color profile.
    ///
    /// Returns `None` under [`ColorProfile::Mono`]: no color is emitted.
    #[must_use]
    pub fn downgrade(self, profile: ColorProfile) -> Option<Self> {
        let color = match profile {
            ColorProfile::Mono => return None,
            ColorProfile::TrueColor => self,
            ColorProfile::Ansi256 => match self {
                Self::Rgb(rgb) => Self::Ansi256(rgb_to_256(rgb.r, rgb.g, rgb.b)),
                _ => self,
            },
            ColorProfile::Ansi16 => match self {
                Self::Rgb(rgb) => Self::Ansi16(rgb_to_ansi16(rgb.r, rgb.g, rgb.b)),
                Self::Ansi256(idx) => Self::Ansi16(rgb_to_ansi16_from_ansi256(idx)),
                Self::Ansi16(_) => self,
            },
        };
        Some(color)
    }
}

impl From<Ansi16> for Color {
    fn from(color: Ansi16) -> Self {
        Self::Ansi16(color)
    }
}

impl From<Rgb> for Color {
    fn from(color: Rgb) -> Self {
        Self::Rgb(color)
    }
}

const ANSI16_PALETTE: [Rgb; 16] = [
    Rgb::new(0, 0, 0),       // Black
    Rgb::new(205, 0, 0),     // Red
    Rgb::new(0, 205, 0),     // Green
    Rgb::new(205, 205, 0),   // Yellow
    Rgb::new(0, 0, 238),     // Blue
    Rgb::new(205, 0, 205),   // Magenta
    Rgb::new(0, 205, 205),   // Cyan
    Rgb::new(229, 229, 229), // White
    Rgb::new(127, 127, 127), // Bright Black
    Rgb::new(255, 0, 0),     // Bright Red
    Rgb::new(0, 255, 0),     // Bright Green
    Rgb::new(255, 255, 0),   // Bright Yellow
    Rgb::new(92, 92, 255),   // Bright Blue
    Rgb::new(255, 0, 255),   // Bright Magenta
    Rgb::new(0, 255, 255),   // Bright Cyan
    Rgb::new(255, 255, 255), // Bright White
];

/// Convert an ANSI 16-color value to its canonical RGB representation.
#[must_use]
pub fn ansi16_to_rgb(color: Ansi16) -> Rgb {
    ANSI16_PALETTE[color.as_u8() as usize]
}

/// Convert an RGB color to the nearest ANSI 256-color index.
///
/// Pure grays use the 24-step grayscale ramp; everything else the 6×6×6 cube.
#[must_use]
pub fn rgb_to_256(r: u8, g: u8, b: u8) -> u8 {
    if r == g && g == b {
        if r < 8 {
            return 16;
        }
        if r > 248 {
            return 231;
        }
        return 232 + ((r - 8) / 10).min(23);
    }

    16 + 36 * cube_index(r) + 6 * cube_index(g) + cube_index(b)
}

/// Nearest cube level for one channel. The levels `[0, 95, 135, 175, 215, 255]`
/// are not evenly spaced, so bins split at the midpoints between them.
fn cube_index(v: u8) -> u8 {
    if v < 48 {
        0
    } else if v < 115 {
        1
    } else {
        (v - 35) / 40
    }
}

/// Convert an ANSI 256-color index to its RGB representation.
#[must_use]
pub fn ansi256_to_rgb(index: u8) -> Rgb {
    const LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    if index < 16 {
        return ANSI16_PALETTE[index as usize];
    }
    if index >= 232 {
        let gray = 8 + 10 * (index - 232);
        return Rgb::new(gray, gray, gray);
    }
    let idx = index - 16;
    Rgb::new(
        LEVELS[(idx / 36) as usize],
        LEVELS[((idx / 6) % 6) as usize],
        LEVELS[(idx % 6) as usize],
    )
}

/// Convert an RGB color to the nearest ANSI 16-color value.
#[must_use]
pub fn rgb_to_ansi16(r: u8, g: u8, b: u8) -> Ansi16 {
    let target = Rgb::new(r, g, b);
    let mut best = Ansi16::Black;
    let mut best_dist = u64::MAX;

    for (candidate, rgb) in Ansi16::ALL.iter().zip(ANSI16_PALETTE.iter()) {
        let dist = weighted_distance(target, *rgb);
        if dist < best_dist {
            best = *candidate;
            best_dist = dist;
        }
    }

    best
}

/// Convert an ANSI 256-color index to the nearest ANSI 16-color value.
#[must_use]
pub fn rgb_to_ansi16_from_ansi256(index: u8) -> Ansi16 {
    if let Some(exact) = Ansi16::from_u8(index) {
        return exact;
    }
    let rgb = ansi256_to_rgb(index);
    rgb_to_ansi16(rgb.r, rgb.g, rgb.b)
}

// Luma-weighted squared distance (BT.709 coefficients scaled to integers).
fn weighted_distance(a: Rgb, b: Rgb) -> u64 {
    let dr = (a.r as i64 - b.r as i64).unsigned_abs();
    let dg = (a.g as i64 - b.g as i64).unsigned_abs();
    let db = (a.b as i64 - b.b as i64).unsigned_abs();
    2126 * dr * dr + 7152 * dg * dg + 722 * db * db
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_from_flags_prefers_no_color() {
        assert_eq!(ColorProfile::from_flags(true, true, true), ColorProfile::Mono);
        assert_eq!(
            ColorProfile::from_flags(true, true, false),
            ColorProfile::TrueColor
        );
        assert_eq!(
            ColorProfile::from_flags(false, true, false),
            ColorProfile::Ansi256
        );
        assert_eq!(
            ColorProfile::from_flags(false, false, false),
            ColorProfile::Ansi16
        );
    }

    #[test]
    fn rgb_to_256_grayscale_rules() {
        assert_eq!(rgb_to_256(0, 0, 0), 16);
        assert_eq!(rgb_to_256(8, 8, 8), 232);
        assert_eq!(rgb_to_256(18, 18, 18), 233);
        assert_eq!(rgb_to_256(255, 255, 255), 231);
    }

    #[test]
    fn rgb_to_256_cube_corners() {
        assert_eq!(rgb_to_256(255, 0, 0), 196);
        assert_eq!(rgb_to_256(0, 255, 0), 46);
        assert_eq!(rgb_to_256(0, 0, 255), 21);
    }

    #[test]
    fn ansi256_round_trips_through_cube() {
        for index in 16..=231u8 {
            let rgb = ansi256_to_rgb(index);
            if rgb.r == rgb.g && rgb.g == rgb.b {
                continue;
            }
            assert_eq!(rgb_to_256(rgb.r, rgb.g, rgb.b), index);
        }
    }

    #[test]
    fn rgb_to_ansi16_picks_primaries() {
        assert_eq!(rgb_to_ansi16(0, 0, 0), Ansi16::Black);
        assert_eq!(rgb_to_ansi16(250, 5, 5), Ansi16::BrightRed);
        assert_eq!(rgb_to_ansi16(200, 0, 0), Ansi16::Red);
        assert_eq!(rgb_to_ansi16(255, 255, 255), Ansi16::BrightWhite);
    }

    #[test]
    fn low_ansi256_indices_map_exactly() {
        assert_eq!(rgb_to_ansi16_from_ansi256(3), Ansi16::Yellow);
        assert_eq!(rgb_to_ansi16_from_ansi256(12), Ansi16::BrightBlue);
    }

    #[test]
    fn downgrade_follows_profile() {
        let orange = Color::rgb(255, 135, 0);
        assert_eq!(orange.downgrade(ColorProfile::TrueColor), Some(orange));
        assert_eq!(
            orange.downgrade(ColorProfile::Ansi256),
            Some(Color::Ansi256(208))
        );
        assert!(matches!(
            orange.downgrade(ColorProfile::Ansi16),
            Some(Color::Ansi16(_))
        ));
        assert_eq!(orange.downgrade(ColorProfile::Mono), None);
        assert_eq!(Color::RED.downgrade(ColorProfile::Mono), None);
    }

    #[test]
    fn ansi16_is_never_upgraded() {
        for profile in [
            ColorProfile::Ansi16,
            ColorProfile::Ansi256,
            ColorProfile::TrueColor,
        ] {
            assert_eq!(Color::BLUE.downgrade(profile), Some(Color::BLUE));
        }
    }
}
