#![forbid(unsafe_code)]

//! Runtime for Tessel programs.
//!
//! # Threads
//!
//! | Thread | Role |
//! |--------|------|
//! | caller | [`Program::run`]: waits, dispatches keys, renders, writes |
//! | `tessel-keys` | blocking key reads in raw mode ([`input`]) |
//! | `tessel-resize` | terminal size polling ([`resize`]) |
//! | `tessel-effect` | one per [`ProgramContext::launch`] |
//!
//! Work reaches the scheduler through [`ChangeNotifier`] (observable writes,
//! static pushes, resizes) and the key queue; both wake the same
//! [`FrameWaker`]. No thread blocks longer than its tick, read timeout, or
//! poll interval once cancelled.

pub mod cancel;
pub mod input;
#[cfg(feature = "subscriber")]
pub mod logging;
pub mod program;
pub mod resize;
pub mod state;
pub mod wake;

pub use cancel::CancelToken;
pub use input::{InputPipeline, KeySender};
pub use program::{OutputMode, Program, ProgramConfig, ProgramContext, RunSummary};
pub use resize::ResizePoller;
pub use state::{ChangeNotifier, State};
pub use wake::FrameWaker;
