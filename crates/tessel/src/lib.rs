#![forbid(unsafe_code)]

//! Tessel public facade crate.
//!
//! Re-exports the types an application needs from the internal crates and
//! offers a prelude. With the default `runtime` feature, [`run`] drives a
//! [`Program`] to completion.

use std::io;

use thiserror::Error;

// --- Core re-exports -------------------------------------------------------

pub use tessel_core::capabilities::TerminalCapabilities;
pub use tessel_core::event::{Key, KeyEvent};
pub use tessel_core::geometry::{Constraints, Rect, Size};
pub use tessel_core::terminal_info::TerminalInfo;

// --- Style re-exports ------------------------------------------------------

pub use tessel_style::{Ansi16, Color, ColorProfile, Rgb, Style, StyleFlags};

// --- Render / layout re-exports -------------------------------------------

pub use tessel_layout::{Axis, Node, SizeRequest, StaticItems, dispatch_key};
pub use tessel_render::frame::Frame;
pub use tessel_render::output::{AnsiOutput, DebugOutput, Output};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use tessel_runtime::{
    CancelToken, ChangeNotifier, KeySender, OutputMode, Program, ProgramConfig, ProgramContext,
    RunSummary, State,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Tessel apps.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O failure during terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Effect threads panicked during the run.
    #[error("{count} effect(s) panicked")]
    Effect { count: usize },
}

/// Standard result type for Tessel APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Render `root` once and return the static lines followed by the dynamic
/// lines, newline-separated, with no cursor movement.
pub fn render_to_string(root: &mut Node, terminal: TerminalInfo, profile: ColorProfile) -> String {
    let frame = tessel_layout::render(root, terminal, profile);
    frame
        .static_lines
        .iter()
        .chain(&frame.lines)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Run a program on stdout.
///
/// `setup` receives the program context before the first pass, typically to
/// create state and launch effects, and returns the content callback.
///
/// # Errors
///
/// Returns [`Error::Io`] for setup or output failures and
/// [`Error::Effect`] if any effect panicked.
#[cfg(feature = "runtime")]
pub fn run<S, F>(config: ProgramConfig, setup: S) -> Result<RunSummary>
where
    S: FnOnce(&ProgramContext) -> io::Result<F>,
    F: FnMut(TerminalInfo) -> Node,
{
    run_program(Program::new(config), setup)
}

/// [`run`] on an existing program, e.g. one built with [`Program::headless`].
///
/// # Errors
///
/// Same as [`run`].
#[cfg(feature = "runtime")]
pub fn run_program<S, F>(program: Program, setup: S) -> Result<RunSummary>
where
    S: FnOnce(&ProgramContext) -> io::Result<F>,
    F: FnMut(TerminalInfo) -> Node,
{
    let content = setup(&program.context())?;
    let summary = program.run(content)?;
    match summary.effect_panics {
        0 => Ok(summary),
        count => Err(Error::Effect { count }),
    }
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Color, ColorProfile, Error, Frame, Key, KeyEvent, Node, Result, StaticItems, Style,
        TerminalInfo,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{CancelToken, Program, ProgramConfig, ProgramContext, State};

    pub use crate::{core, layout, render, style};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use tessel_core as core;
pub use tessel_layout as layout;
pub use tessel_render as render;
#[cfg(feature = "runtime")]
pub use tessel_runtime as runtime;
pub use tessel_style as style;
