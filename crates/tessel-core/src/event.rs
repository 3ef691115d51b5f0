#![forbid(unsafe_code)]

//! Key event types.
//!
//! Events derive `Clone`, `PartialEq`, and `Eq`; equality is structural, which
//! is what the runtime relies on to recognise the `ctrl+c` cancel chord.
//!
//! # Design Notes
//!
//! - Only presses and repeats become [`KeyEvent`]s; releases are dropped
//!   during conversion.
//! - Super/Hyper/Meta modifiers are not tracked.

#[cfg(not(target_arch = "wasm32"))]
use crossterm::event as cte;

/// A key, either a printable character or a symbolic name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A regular character key.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Escape key.
    Escape,
    /// Backspace key.
    Backspace,
    /// Tab key.
    Tab,
    /// Shift+Tab (back-tab).
    BackTab,
    /// Delete key.
    Delete,
    /// Insert key.
    Insert,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up key.
    PageUp,
    /// Page Down key.
    PageDown,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Function key (F1-F24).
    F(u8),
}

impl Key {
    /// A stable, human-readable name for the key.
    ///
    /// Characters name themselves; symbolic keys use their spelled-out name
    /// (`"Enter"`, `"ArrowUp"`, `"F5"`).
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Char(c) => c.to_string(),
            Self::Enter => "Enter".into(),
            Self::Escape => "Escape".into(),
            Self::Backspace => "Backspace".into(),
            Self::Tab => "Tab".into(),
            Self::BackTab => "BackTab".into(),
            Self::Delete => "Delete".into(),
            Self::Insert => "Insert".into(),
            Self::Home => "Home".into(),
            Self::End => "End".into(),
            Self::PageUp => "PageUp".into(),
            Self::PageDown => "PageDown".into(),
            Self::Up => "ArrowUp".into(),
            Self::Down => "ArrowDown".into(),
            Self::Left => "ArrowLeft".into(),
            Self::Right => "ArrowRight".into(),
            Self::F(n) => format!("F{n}"),
        }
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub key: Key,
    /// Alt/Option held.
    pub alt: bool,
    /// Control held.
    pub ctrl: bool,
    /// Shift held.
    pub shift: bool,
}

impl KeyEvent {
    /// Create a key event with no modifiers.
    #[must_use]
    pub const fn new(key: Key) -> Self {
        Self {
            key,
            alt: false,
            ctrl: false,
            shift: false,
        }
    }

    /// Create a key event with only Control held.
    #[must_use]
    pub const fn ctrl(key: Key) -> Self {
        Self::new(key).with_ctrl(true)
    }

    /// Set the Alt modifier.
    #[must_use]
    pub const fn with_alt(mut self, alt: bool) -> Self {
        self.alt = alt;
        self
    }

    /// Set the Control modifier.
    #[must_use]
    pub const fn with_ctrl(mut self, ctrl: bool) -> Self {
        self.ctrl = ctrl;
        self
    }

    /// Set the Shift modifier.
    #[must_use]
    pub const fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    /// Convert a Crossterm event into a [`KeyEvent`].
    ///
    /// Returns `None` for non-key events, key releases, and keys with no
    /// canonical mapping (media keys, bare modifiers, …).
    #[must_use]
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_crossterm(event: cte::Event) -> Option<Self> {
        let cte::Event::Key(key) = event else {
            return None;
        };
        if key.kind == cte::KeyEventKind::Release {
            return None;
        }
        let mapped = map_key_code(key.code)?;
        Some(Self {
            key: mapped,
            alt: key.modifiers.contains(cte::KeyModifiers::ALT),
            ctrl: key.modifiers.contains(cte::KeyModifiers::CONTROL),
            shift: key.modifiers.contains(cte::KeyModifiers::SHIFT),
        })
    }
}

impl std::fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.ctrl {
            f.write_str("ctrl+")?;
        }
        if self.alt {
            f.write_str("alt+")?;
        }
        if self.shift {
            f.write_str("shift+")?;
        }
        f.write_str(&self.key.name())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn map_key_code(code: cte::KeyCode) -> Option<Key> {
    match code {
        cte::KeyCode::Backspace => Some(Key::Backspace),
        cte::KeyCode::Enter => Some(Key::Enter),
        cte::KeyCode::Left => Some(Key::Left),
        cte::KeyCode::Right => Some(Key::Right),
        cte::KeyCode::Up => Some(Key::Up),
        cte::KeyCode::Down => Some(Key::Down),
        cte::KeyCode::Home => Some(Key::Home),
        cte::KeyCode::End => Some(Key::End),
        cte::KeyCode::PageUp => Some(Key::PageUp),
        cte::KeyCode::PageDown => Some(Key::PageDown),
        cte::KeyCode::Tab => Some(Key::Tab),
        cte::KeyCode::BackTab => Some(Key::BackTab),
        cte::KeyCode::Delete => Some(Key::Delete),
        cte::KeyCode::Insert => Some(Key::Insert),
        cte::KeyCode::F(n) => Some(Key::F(n)),
        cte::KeyCode::Char(c) => Some(Key::Char(c)),
        cte::KeyCode::Esc => Some(Key::Escape),
        _ => None,
    }
}
