#![forbid(unsafe_code)]

//! Frame scheduler.
//!
//! A [`Program`] owns the output writer, the key queue, and the shared
//! terminal size. [`Program::run`] repeats one pass until the run ends:
//!
//! 1. Wait for a wakeup (state change, key, resize, effect exit) or the tick
//!    interval, whichever comes first.
//! 2. Drain queued keys in arrival order and offer each to the tree from the
//!    previous pass. An unconsumed ctrl+c cancels the run. Keys queued before
//!    the first pass wait for the first tree.
//! 3. If the change flag was set (or this is the first pass), consume it,
//!    rebuild the tree through the content callback, render, and display.
//!
//! The run ends when it is cancelled or when every launched effect has
//! finished. Shutdown then cancels and joins the remaining effects, runs one
//! last pass if state changed, and stops the key reader (releasing raw mode)
//! and the resize poller.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use tessel_layout::Node;
//! use tessel_runtime::{Program, ProgramConfig};
//!
//! let program = Program::new(ProgramConfig::from_env());
//! let ctx = program.context();
//! let count = ctx.state(0u32);
//! ctx.launch({
//!     let count = count.clone();
//!     move |cancel| {
//!         while !cancel.wait_timeout(Duration::from_millis(250)) {
//!             count.update(|n| *n += 1);
//!         }
//!     }
//! })?;
//! program.run(move |_| Node::text(format!("count: {}", count.get())))?;
//! # Ok::<(), std::io::Error>(())
//! ```

use std::env;
use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use tessel_core::event::{Key, KeyEvent};
use tessel_core::terminal_info::{TerminalInfo, TerminalInfoCell};
use tessel_core::terminal_session::RawModeSession;
use tessel_layout::{Node, StaticItems, dispatch_key, render};
use tessel_render::output::{AnsiOutput, DebugOutput, Output};
use tessel_style::ColorProfile;
use tracing::{debug, debug_span, info, info_span, trace, warn};

use crate::cancel::CancelToken;
use crate::input::{InputPipeline, KeySender};
use crate::resize::ResizePoller;
use crate::state::{ChangeNotifier, State};
use crate::wake::FrameWaker;

/// Environment variable forcing the debug writer when set to `1` or `true`.
pub const ENV_DEBUG_OUTPUT: &str = "TESSEL_DEBUG_OUTPUT";
/// Environment variable overriding the tick interval, in milliseconds.
pub const ENV_TICK_MS: &str = "TESSEL_TICK_MS";

const CTRL_C: KeyEvent = KeyEvent::ctrl(Key::Char('c'));

/// Which writer displays frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// ANSI diffing on a terminal, the debug writer otherwise.
    #[default]
    Auto,
    /// Always redraw in place with ANSI sequences.
    Ansi,
    /// Always print whole frames separated by rules.
    Debug,
}

/// Program configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramConfig {
    /// Longest wait between passes when nothing wakes the scheduler.
    pub tick_interval: Duration,
    /// Interval between terminal size queries.
    pub resize_poll_interval: Duration,
    /// Upper bound for a single blocking key read.
    pub key_read_timeout: Duration,
    pub output_mode: OutputMode,
    /// Enter raw mode and read keys when stdin is a terminal.
    pub raw_input: bool,
    /// Forced color profile; `None` detects from the environment.
    pub color_profile: Option<ColorProfile>,
    pub resize_polling: bool,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(50),
            resize_poll_interval: Duration::from_millis(50),
            key_read_timeout: Duration::from_millis(10),
            output_mode: OutputMode::Auto,
            raw_input: true,
            color_profile: None,
            resize_polling: true,
        }
    }
}

impl ProgramConfig {
    /// Defaults overridden by `TESSEL_DEBUG_OUTPUT` and `TESSEL_TICK_MS`.
    pub fn from_env() -> Self {
        Self::default().apply_env(|key| env::var(key).ok())
    }

    fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if lookup(ENV_DEBUG_OUTPUT).is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true")) {
            self.output_mode = OutputMode::Debug;
        }
        if let Some(raw) = lookup(ENV_TICK_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => self.tick_interval = Duration::from_millis(ms),
                _ => warn!(value = %raw, "ignoring invalid TESSEL_TICK_MS"),
            }
        }
        self
    }

    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    #[must_use]
    pub fn with_resize_poll_interval(mut self, interval: Duration) -> Self {
        self.resize_poll_interval = interval;
        self
    }

    #[must_use]
    pub fn with_key_read_timeout(mut self, timeout: Duration) -> Self {
        self.key_read_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    #[must_use]
    pub fn with_raw_input(mut self, enabled: bool) -> Self {
        self.raw_input = enabled;
        self
    }

    #[must_use]
    pub fn with_color_profile(mut self, profile: ColorProfile) -> Self {
        self.color_profile = Some(profile);
        self
    }

    #[must_use]
    pub fn with_resize_polling(mut self, enabled: bool) -> Self {
        self.resize_polling = enabled;
        self
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Frames displayed, including the final pass.
    pub frames: u64,
    /// Effects whose thread panicked.
    pub effect_panics: usize,
    /// Whether the run ended through cancellation rather than effects
    /// finishing.
    pub cancelled: bool,
}

#[derive(Default)]
struct Effects {
    running: AtomicUsize,
    handles: Mutex<Vec<thread::JoinHandle<()>>>,
}

// Decrements the running count when an effect returns or unwinds.
struct EffectExit {
    effects: Arc<Effects>,
    waker: FrameWaker,
}

impl Drop for EffectExit {
    fn drop(&mut self) {
        self.effects.running.fetch_sub(1, Ordering::AcqRel);
        self.waker.wake();
    }
}

/// Handle for code running alongside a program: creates observables,
/// launches effects, and cancels the run. Cheap to clone.
#[derive(Clone)]
pub struct ProgramContext {
    notifier: ChangeNotifier,
    cancel: CancelToken,
    waker: FrameWaker,
    effects: Arc<Effects>,
}

impl ProgramContext {
    fn new(waker: FrameWaker) -> Self {
        let notifier = ChangeNotifier::new();
        notifier.subscribe({
            let waker = waker.clone();
            move || waker.wake()
        });
        Self {
            notifier,
            cancel: CancelToken::new(),
            waker,
            effects: Arc::default(),
        }
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// An observable whose writes schedule a pass.
    pub fn state<T>(&self, value: T) -> State<T> {
        State::new(value, &self.notifier)
    }

    /// A static log whose pushes schedule a pass.
    pub fn static_items<T>(&self) -> StaticItems<T> {
        let notifier = self.notifier.clone();
        StaticItems::with_notify(move || notifier.notify())
    }

    /// Run `effect` on its own thread. The program keeps running while any
    /// effect is alive; `effect` should return soon after its token is
    /// cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn launch(&self, effect: impl FnOnce(CancelToken) + Send + 'static) -> io::Result<()> {
        self.effects.running.fetch_add(1, Ordering::AcqRel);
        let exit = EffectExit {
            effects: Arc::clone(&self.effects),
            waker: self.waker.clone(),
        };
        let token = self.cancel.clone();
        let handle = thread::Builder::new()
            .name("tessel-effect".into())
            .spawn(move || {
                let _exit = exit;
                effect(token);
            })?;
        self.effects
            .handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handle);
        Ok(())
    }

    /// End the run after the current pass.
    pub fn cancel(&self) {
        self.cancel.cancel();
        self.waker.wake();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    fn running_effects(&self) -> usize {
        self.effects.running.load(Ordering::Acquire)
    }

    // Cancel, then join every effect. Returns how many panicked.
    fn shutdown_effects(&self) -> usize {
        self.cancel.cancel();
        let mut panics = 0;
        loop {
            let handles: Vec<_> = self
                .effects
                .handles
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .drain(..)
                .collect();
            if handles.is_empty() {
                return panics;
            }
            for handle in handles {
                if handle.join().is_err() {
                    warn!("effect panicked");
                    panics += 1;
                }
            }
        }
    }
}

impl std::fmt::Debug for ProgramContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgramContext")
            .field("cancelled", &self.is_cancelled())
            .field("running_effects", &self.running_effects())
            .finish()
    }
}

/// Drives passes from change notifications to the output writer.
pub struct Program {
    config: ProgramConfig,
    output: Box<dyn Output>,
    profile: ColorProfile,
    terminal: Arc<TerminalInfoCell>,
    context: ProgramContext,
    keys: mpsc::Receiver<KeyEvent>,
    key_sender: KeySender,
    headless: bool,
}

impl Program {
    /// A program writing to stdout.
    ///
    /// The writer follows `config.output_mode`; `Auto` picks ANSI diffing on
    /// a terminal and the debug writer otherwise.
    pub fn new(config: ProgramConfig) -> Self {
        let ansi = match config.output_mode {
            OutputMode::Ansi => true,
            OutputMode::Debug => false,
            OutputMode::Auto => io::stdout().is_terminal(),
        };
        let output: Box<dyn Output> = if ansi {
            Box::new(AnsiOutput::new(io::stdout()))
        } else {
            Box::new(DebugOutput::new(io::stdout()))
        };
        let profile = config.color_profile.unwrap_or_else(ColorProfile::detect);
        Self::build(config, output, profile, TerminalInfo::detect(), false)
    }

    /// A program writing ANSI frames to `writer` at a fixed terminal size,
    /// with no raw mode and no resize polling. Colors default to true color.
    ///
    /// Keys are injected through [`Program::key_sender`].
    pub fn headless<W: Write + 'static>(writer: W, size: TerminalInfo) -> Self {
        let config = ProgramConfig::default()
            .with_output_mode(OutputMode::Ansi)
            .with_raw_input(false)
            .with_resize_polling(false);
        Self::build(
            config,
            Box::new(AnsiOutput::new(writer)),
            ColorProfile::TrueColor,
            size,
            true,
        )
    }

    fn build(
        config: ProgramConfig,
        output: Box<dyn Output>,
        profile: ColorProfile,
        size: TerminalInfo,
        headless: bool,
    ) -> Self {
        let waker = FrameWaker::new();
        let (tx, keys) = mpsc::channel();
        Self {
            config,
            output,
            profile,
            terminal: Arc::new(TerminalInfoCell::new(size)),
            context: ProgramContext::new(waker.clone()),
            keys,
            key_sender: KeySender::new(tx, waker),
            headless,
        }
    }

    /// Replace timing settings. Headless programs keep raw input and resize
    /// polling off.
    #[must_use]
    pub fn with_config(mut self, config: ProgramConfig) -> Self {
        if let Some(profile) = config.color_profile {
            self.profile = profile;
        }
        self.config = if self.headless {
            config.with_raw_input(false).with_resize_polling(false)
        } else {
            config
        };
        self
    }

    pub fn context(&self) -> ProgramContext {
        self.context.clone()
    }

    pub fn key_sender(&self) -> KeySender {
        self.key_sender.clone()
    }

    pub fn config(&self) -> &ProgramConfig {
        &self.config
    }

    /// Shared terminal size read by every pass.
    pub fn terminal(&self) -> Arc<TerminalInfoCell> {
        Arc::clone(&self.terminal)
    }

    /// Run until cancelled or until every launched effect has finished.
    ///
    /// `content` builds the tree for each pass from the current terminal
    /// size.
    ///
    /// # Errors
    ///
    /// Returns the first output write error, after shutdown has completed.
    /// Failing to start the key reader or the resize poller is logged and
    /// the run continues without it.
    pub fn run<F>(mut self, mut content: F) -> io::Result<RunSummary>
    where
        F: FnMut(TerminalInfo) -> Node,
    {
        let _span = info_span!("tessel.program.run", headless = self.headless).entered();

        let input = self.start_input();
        let poller = self.start_poller();

        let mut summary = RunSummary::default();
        let result = self.event_loop(&mut content, &mut summary);

        summary.effect_panics = self.context.shutdown_effects();
        let result = result.and_then(|()| {
            if self.context.notifier.take_pending() {
                self.pass(&mut content)?;
                summary.frames += 1;
            }
            Ok(())
        });

        drop(input);
        drop(poller);
        info!(
            frames = summary.frames,
            cancelled = summary.cancelled,
            effect_panics = summary.effect_panics,
            "program finished"
        );
        result.map(|()| summary)
    }

    fn start_input(&self) -> Option<InputPipeline> {
        if !self.config.raw_input {
            return None;
        }
        let session = RawModeSession::try_enter()?;
        match InputPipeline::start(
            session,
            self.key_sender.clone(),
            self.config.key_read_timeout,
        ) {
            Ok(pipeline) => Some(pipeline),
            Err(err) => {
                warn!(error = %err, "key reader unavailable");
                None
            }
        }
    }

    fn start_poller(&self) -> Option<ResizePoller> {
        if !self.config.resize_polling {
            return None;
        }
        let notifier = self.context.notifier.clone();
        match ResizePoller::start(
            Arc::clone(&self.terminal),
            self.config.resize_poll_interval,
            move || notifier.notify(),
        ) {
            Ok(poller) => Some(poller),
            Err(err) => {
                warn!(error = %err, "resize polling unavailable");
                None
            }
        }
    }

    fn event_loop<F>(&mut self, content: &mut F, summary: &mut RunSummary) -> io::Result<()>
    where
        F: FnMut(TerminalInfo) -> Node,
    {
        let mut tree: Option<Node> = None;
        loop {
            if let Some(root) = &tree {
                self.context.waker.wait_timeout(self.config.tick_interval);
                self.dispatch_keys(root);
            }
            if self.context.is_cancelled() {
                summary.cancelled = true;
                return Ok(());
            }

            let changed = self.context.notifier.take_pending();
            if changed || tree.is_none() {
                tree = Some(self.pass(content)?);
                summary.frames += 1;
            }

            if self.context.running_effects() == 0 {
                debug!("all effects finished");
                return Ok(());
            }
        }
    }

    fn dispatch_keys(&self, root: &Node) {
        for event in self.keys.try_iter() {
            let consumed = dispatch_key(root, &event);
            trace!(key = %event, consumed, "key dispatched");
            if !consumed && event == CTRL_C {
                debug!("ctrl+c, cancelling");
                self.context.cancel();
            }
        }
    }

    fn pass<F>(&mut self, content: &mut F) -> io::Result<Node>
    where
        F: FnMut(TerminalInfo) -> Node,
    {
        let info = self.terminal.load();
        let _span = debug_span!("tessel.program.pass", width = info.width, height = info.height)
            .entered();
        let mut root = content(info);
        let frame = render(&mut root, info, self.profile);
        self.output.display(&frame)?;
        Ok(root)
    }
}

impl std::fmt::Debug for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Program")
            .field("config", &self.config)
            .field("profile", &self.profile)
            .field("terminal", &self.terminal.load())
            .field("headless", &self.headless)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn defaults() {
        let config = ProgramConfig::default();
        assert_eq!(config.tick_interval, Duration::from_millis(50));
        assert_eq!(config.resize_poll_interval, Duration::from_millis(50));
        assert_eq!(config.key_read_timeout, Duration::from_millis(10));
        assert_eq!(config.output_mode, OutputMode::Auto);
        assert!(config.raw_input);
        assert!(config.resize_polling);
        assert_eq!(config.color_profile, None);
    }

    #[test]
    fn env_overrides() {
        let config = ProgramConfig::default()
            .apply_env(lookup(&[(ENV_DEBUG_OUTPUT, "1"), (ENV_TICK_MS, " 20 ")]));
        assert_eq!(config.output_mode, OutputMode::Debug);
        assert_eq!(config.tick_interval, Duration::from_millis(20));
    }

    #[test]
    fn invalid_env_is_ignored() {
        let config = ProgramConfig::default()
            .apply_env(lookup(&[(ENV_DEBUG_OUTPUT, "no"), (ENV_TICK_MS, "0")]));
        assert_eq!(config, ProgramConfig::default());
        let config = ProgramConfig::default().apply_env(lookup(&[(ENV_TICK_MS, "fast")]));
        assert_eq!(config.tick_interval, Duration::from_millis(50));
    }

    #[test]
    fn headless_config_stays_headless() {
        let program = Program::headless(Vec::new(), TerminalInfo::new(10, 2))
            .with_config(ProgramConfig::default().with_tick_interval(Duration::from_millis(5)));
        assert!(!program.config().raw_input);
        assert!(!program.config().resize_polling);
        assert_eq!(program.config().tick_interval, Duration::from_millis(5));
    }

    #[test]
    fn effect_count_tracks_threads() {
        let program = Program::headless(Vec::new(), TerminalInfo::new(10, 2));
        let ctx = program.context();
        let (tx, rx) = mpsc::channel::<()>();
        ctx.launch(move |_| {
            let _ = rx.recv();
        })
        .unwrap();
        assert_eq!(ctx.running_effects(), 1);
        drop(tx);
        assert_eq!(ctx.shutdown_effects(), 0);
        assert_eq!(ctx.running_effects(), 0);
    }

    #[test]
    fn panicking_effect_is_counted() {
        let program = Program::headless(Vec::new(), TerminalInfo::new(10, 2));
        let ctx = program.context();
        ctx.launch(|_| panic!("boom")).unwrap();
        assert_eq!(ctx.shutdown_effects(), 1);
        assert_eq!(ctx.running_effects(), 0);
    }
}
