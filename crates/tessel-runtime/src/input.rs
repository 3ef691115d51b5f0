#![forbid(unsafe_code)]

//! Key input: the reader thread and the channel feeding the scheduler.

use std::io;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tessel_core::event::KeyEvent;
use tessel_core::terminal_session::RawModeSession;
use tracing::{debug, warn};

use crate::cancel::CancelToken;
use crate::wake::FrameWaker;

/// Producer side of the key queue. Every accepted event wakes the scheduler.
#[derive(Debug, Clone)]
pub struct KeySender {
    tx: mpsc::Sender<KeyEvent>,
    waker: FrameWaker,
}

impl KeySender {
    pub(crate) fn new(tx: mpsc::Sender<KeyEvent>, waker: FrameWaker) -> Self {
        Self { tx, waker }
    }

    /// Queue `event`. Returns `false` once the program has stopped reading.
    pub fn send(&self, event: KeyEvent) -> bool {
        if self.tx.send(event).is_err() {
            return false;
        }
        self.waker.wake();
        true
    }
}

/// Raw mode plus a thread reading keys from it.
///
/// Dropping the pipeline stops the thread, waits for it, and then releases
/// raw mode.
#[derive(Debug)]
pub struct InputPipeline {
    stop: CancelToken,
    thread: Option<thread::JoinHandle<()>>,
    _session: Arc<RawModeSession>,
}

impl InputPipeline {
    /// Start reading keys from `session` into `sender`.
    ///
    /// Each read blocks for at most `read_timeout`, which bounds how long a
    /// stop request takes to be observed.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader thread cannot be spawned.
    pub fn start(
        session: RawModeSession,
        sender: KeySender,
        read_timeout: Duration,
    ) -> io::Result<Self> {
        let session = Arc::new(session);
        let stop = CancelToken::new();
        let thread = thread::Builder::new().name("tessel-keys".into()).spawn({
            let session = Arc::clone(&session);
            let stop = stop.clone();
            move || read_loop(|timeout| session.read_key(timeout), &sender, &stop, read_timeout)
        })?;
        debug!(?read_timeout, "key reader started");
        Ok(Self {
            stop,
            thread: Some(thread),
            _session: session,
        })
    }

    /// Whether the reader thread has exited (stopped or input ended).
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(thread::JoinHandle::is_finished)
    }
}

impl Drop for InputPipeline {
    fn drop(&mut self) {
        self.stop.cancel();
        if let Some(handle) = self.thread.take()
            && handle.join().is_err()
        {
            warn!("key reader thread panicked");
        }
        debug!("key reader stopped");
    }
}

/// Forward keys from `read` until `stop` is cancelled, the receiver is gone,
/// or a read fails.
fn read_loop(
    read: impl Fn(Duration) -> io::Result<Option<KeyEvent>>,
    sender: &KeySender,
    stop: &CancelToken,
    timeout: Duration,
) {
    while !stop.is_cancelled() {
        match read(timeout) {
            Ok(Some(event)) => {
                if !sender.send(event) {
                    break;
                }
            }
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "key read failed, no further input");
                break;
            }
        }
    }
}
