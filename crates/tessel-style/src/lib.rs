#![forbid(unsafe_code)]

//! Style: colors, color profiles, and text attribute flags.

pub mod color;
pub mod style;

pub use color::{Ansi16, Color, ColorProfile, Rgb};
pub use style::{Style, StyleFlags};
