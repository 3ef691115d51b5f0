#![forbid(unsafe_code)]

//! Terminal size polling.

use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tessel_core::terminal_info::{TerminalInfo, TerminalInfoCell};
use tracing::debug;

use crate::cancel::CancelToken;

/// Thread publishing the terminal size into a [`TerminalInfoCell`].
///
/// `on_change` runs only when width or height actually differ from the last
/// published value. Dropping the poller stops and joins the thread.
#[derive(Debug)]
pub struct ResizePoller {
    stop: CancelToken,
    thread: Option<thread::JoinHandle<()>>,
}

impl ResizePoller {
    /// Poll the real terminal every `interval`.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn start(
        cell: Arc<TerminalInfoCell>,
        interval: Duration,
        on_change: impl Fn() + Send + 'static,
    ) -> io::Result<Self> {
        Self::start_with(cell, interval, TerminalInfo::detect, on_change)
    }

    /// Poll `detect` every `interval`.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn start_with(
        cell: Arc<TerminalInfoCell>,
        interval: Duration,
        detect: impl Fn() -> TerminalInfo + Send + 'static,
        on_change: impl Fn() + Send + 'static,
    ) -> io::Result<Self> {
        let stop = CancelToken::new();
        let thread = thread::Builder::new().name("tessel-resize".into()).spawn({
            let stop = stop.clone();
            move || {
                while !stop.wait_timeout(interval) {
                    let info = detect();
                    if cell.publish(info) {
                        debug!(width = info.width, height = info.height, "terminal resized");
                        on_change();
                    }
                }
            }
        })?;
        Ok(Self {
            stop,
            thread: Some(thread),
        })
    }
}

impl Drop for ResizePoller {
    fn drop(&mut self) {
        self.stop.cancel();
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}
