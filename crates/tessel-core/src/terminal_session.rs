#![forbid(unsafe_code)]

//! Raw-mode lifecycle guard.
//!
//! [`RawModeSession`] is a scoped acquisition of raw mode: holding one means
//! raw mode is active, dropping it releases raw mode. Release is guaranteed on
//! every exit path the process can observe:
//!
//! 1. **Return / `?`** - the guard's [`Drop`] runs.
//! 2. **Panic** - [`Drop`] runs during unwinding; a panic hook also releases
//!    raw mode before the panic message is printed so it stays readable.
//! 3. **Termination signal (Unix)** - a signal thread releases raw mode and
//!    exits with `128 + signal`.
//!
//! The cursor is hidden for the lifetime of the session and shown again on
//! each of those paths.
//!
//! While raw mode is held `ctrl+c` arrives as a key event rather than SIGINT,
//! which is what lets the runtime route it through key handlers first.
//!
//! # Usage
//!
//! ```no_run
//! use std::time::Duration;
//! use tessel_core::terminal_session::RawModeSession;
//!
//! if let Some(session) = RawModeSession::try_enter() {
//!     if let Some(key) = session.read_key(Duration::from_millis(10))? {
//!         println!("{key}");
//!     }
//! }
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, IsTerminal, Write};
use std::sync::OnceLock;
use std::time::Duration;

#[cfg(unix)]
use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::event::KeyEvent;

/// Holds raw mode for as long as it lives.
///
/// # Contract
///
/// - **Exclusive ownership**: only one session should exist at a time.
/// - **Cleanup guarantee**: dropping the session (normally or while
///   unwinding) disables raw mode and shows the cursor.
#[derive(Debug)]
pub struct RawModeSession {
    #[cfg(unix)]
    signal_guard: Option<SignalGuard>,
}

impl RawModeSession {
    /// Enter raw mode.
    ///
    /// Returns `None` when stdin is not a terminal or raw mode cannot be
    /// enabled. Neither case is fatal; the caller runs without key input.
    #[must_use]
    pub fn try_enter() -> Option<Self> {
        if !io::stdin().is_terminal() {
            #[cfg(feature = "tracing")]
            tracing::warn!("stdin is not a terminal, key input disabled");
            return None;
        }
        match Self::enter() {
            Ok(session) => Some(session),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_err, "raw mode unavailable, key input disabled");
                None
            }
        }
    }

    /// Enter raw mode, surfacing the failure.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be enabled or the signal thread
    /// cannot be installed.
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();

        crossterm::terminal::enable_raw_mode()?;
        if let Err(err) = write_enter(&mut io::stdout()) {
            best_effort_cleanup();
            return Err(err);
        }
        #[cfg(feature = "tracing")]
        tracing::info!("terminal raw mode enabled");

        #[cfg(unix)]
        let signal_guard = match SignalGuard::new() {
            Ok(guard) => Some(guard),
            Err(err) => {
                best_effort_cleanup();
                return Err(err);
            }
        };

        Ok(Self {
            #[cfg(unix)]
            signal_guard,
        })
    }

    /// Wait up to `timeout` for one key press.
    ///
    /// Returns `Ok(None)` on timeout, for non-key events, and for key
    /// releases.
    ///
    /// # Errors
    ///
    /// Returns the underlying read error; callers treat it as end of input.
    pub fn read_key(&self, timeout: Duration) -> io::Result<Option<KeyEvent>> {
        if !crossterm::event::poll(timeout)? {
            return Ok(None);
        }
        let event = crossterm::event::read()?;
        Ok(KeyEvent::from_crossterm(event))
    }

    fn cleanup(&mut self) {
        #[cfg(unix)]
        let _ = self.signal_guard.take();

        best_effort_cleanup();
        #[cfg(feature = "tracing")]
        tracing::info!("terminal raw mode disabled");
    }
}

impl Drop for RawModeSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

/// Sequences written once raw mode is on.
fn write_enter<W: Write>(w: &mut W) -> io::Result<()> {
    crossterm::execute!(w, crossterm::cursor::Hide)
}

/// Sequences undoing [`write_enter`].
fn write_leave<W: Write>(w: &mut W) -> io::Result<()> {
    crossterm::execute!(w, crossterm::cursor::Show)
}

fn best_effort_cleanup() {
    let _ = write_leave(&mut io::stdout());
    let _ = crossterm::terminal::disable_raw_mode();
}

#[cfg(unix)]
#[derive(Debug)]
struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    fn new() -> io::Result<Self> {
        let mut signals =
            Signals::new([SIGINT, SIGTERM, SIGHUP, SIGQUIT]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::Builder::new()
            .name("tessel-signals".into())
            .spawn(move || {
                for signal in signals.forever() {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(signal, "termination signal received, releasing raw mode");
                    best_effort_cleanup();
                    std::process::exit(128 + signal);
                }
            })?;
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
