#![forbid(unsafe_code)]

//! Core: geometry, key events, terminal info, and raw-mode lifecycle.

pub mod capabilities;
pub mod event;
pub mod geometry;
pub mod terminal_info;
#[cfg(not(target_arch = "wasm32"))]
pub mod terminal_session;
