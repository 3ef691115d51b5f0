#![forbid(unsafe_code)]

//! Terminal capability detection.
//!
//! Detection is environment-driven and conservative: when in doubt a feature
//! is reported as unsupported. A missing TTY on stdin disables raw input; a
//! missing TTY on stdout means cursor addressing cannot be relied on, so the
//! runtime falls back to the append-only debug writer.
//!
//! # Environment Variables
//!
//! - `NO_COLOR`: de-facto standard for disabling color
//! - `COLORTERM`: `truecolor`/`24bit` enables 24-bit color
//! - `TERM`: `dumb` or empty disables color; `*256color*` enables the palette

use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Default)]
struct DetectInputs {
    no_color: bool,
    term: String,
    colorterm: String,
    stdin_tty: bool,
    stdout_tty: bool,
}

impl DetectInputs {
    fn from_env() -> Self {
        Self {
            no_color: env::var("NO_COLOR").is_ok(),
            term: env::var("TERM").unwrap_or_default(),
            colorterm: env::var("COLORTERM").unwrap_or_default(),
            stdin_tty: std::io::stdin().is_terminal(),
            stdout_tty: std::io::stdout().is_terminal(),
        }
    }
}

/// What the attached terminal can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalCapabilities {
    /// True color (24-bit RGB) support.
    pub true_color: bool,
    /// 256-color palette support.
    pub colors_256: bool,
    /// Color is disabled outright (`NO_COLOR` or a dumb terminal).
    pub no_color: bool,
    /// Stdin is attached to a terminal, so raw mode can be attempted.
    pub stdin_tty: bool,
    /// Stdout is attached to a terminal, so cursor movement is meaningful.
    pub stdout_tty: bool,
}

impl TerminalCapabilities {
    /// Detect capabilities from the environment and the standard streams.
    #[must_use]
    pub fn detect() -> Self {
        let caps = Self::detect_from_inputs(&DetectInputs::from_env());
        #[cfg(feature = "tracing")]
        tracing::debug!(
            true_color = caps.true_color,
            colors_256 = caps.colors_256,
            no_color = caps.no_color,
            stdin_tty = caps.stdin_tty,
            stdout_tty = caps.stdout_tty,
            "terminal capabilities detected"
        );
        caps
    }

    fn detect_from_inputs(env: &DetectInputs) -> Self {
        let term = env.term.as_str();
        let colorterm = env.colorterm.as_str();
        let is_dumb = term == "dumb" || term.is_empty();
        let no_color = env.no_color || is_dumb;

        let true_color =
            !no_color && (colorterm.contains("truecolor") || colorterm.contains("24bit"));
        let colors_256 = !no_color && (true_color || term.contains("256"));

        Self {
            true_color,
            colors_256,
            no_color,
            stdin_tty: env.stdin_tty,
            stdout_tty: env.stdout_tty,
        }
    }

    /// A fallback with every feature disabled.
    #[must_use]
    pub const fn basic() -> Self {
        Self {
            true_color: false,
            colors_256: false,
            no_color: true,
            stdin_tty: false,
            stdout_tty: false,
        }
    }

    /// Whether any color output is allowed.
    #[must_use]
    #[inline]
    pub const fn has_color(&self) -> bool {
        !self.no_color
    }

    /// Whether both ends are attached to a terminal.
    #[must_use]
    #[inline]
    pub const fn is_interactive(&self) -> bool {
        self.stdin_tty && self.stdout_tty
    }
}

impl Default for TerminalCapabilities {
    fn default() -> Self {
        Self::basic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_env(term: &str, colorterm: &str) -> DetectInputs {
        DetectInputs {
            term: term.to_string(),
            colorterm: colorterm.to_string(),
            ..DetectInputs::default()
        }
    }

    #[test]
    fn detect_does_not_panic() {
        let _caps = TerminalCapabilities::detect();
    }

    #[test]
    fn dumb_terminal_has_no_color() {
        let caps = TerminalCapabilities::detect_from_inputs(&make_env("dumb", "truecolor"));
        assert!(caps.no_color);
        assert!(!caps.true_color);
        assert!(!caps.colors_256);
    }

    #[test]
    fn empty_term_is_dumb() {
        let caps = TerminalCapabilities::detect_from_inputs(&make_env("", ""));
        assert!(!caps.has_color());
    }

    #[test]
    fn xterm_256color() {
        let caps = TerminalCapabilities::detect_from_inputs(&make_env("xterm-256color", ""));
        assert!(caps.colors_256);
        assert!(!caps.true_color);
        assert!(caps.has_color());
    }

    #[test]
    fn colorterm_enables_truecolor() {
        for value in ["truecolor", "24bit"] {
            let caps = TerminalCapabilities::detect_from_inputs(&make_env("xterm", value));
            assert!(caps.true_color, "COLORTERM={value} enables truecolor");
            assert!(caps.colors_256, "truecolor implies 256-color");
        }
    }

    #[test]
    fn plain_xterm_is_sixteen_colors() {
        let caps = TerminalCapabilities::detect_from_inputs(&make_env("xterm", ""));
        assert!(caps.has_color());
        assert!(!caps.colors_256);
    }

    #[test]
    fn no_color_wins_over_everything() {
        let mut env = make_env("xterm-256color", "truecolor");
        env.no_color = true;
        let caps = TerminalCapabilities::detect_from_inputs(&env);
        assert!(!caps.has_color());
        assert!(!caps.true_color, "NO_COLOR must disable true color");
        assert!(!caps.colors_256, "NO_COLOR must disable 256-color");
    }

    #[test]
    fn interactive_requires_both_streams() {
        let mut env = make_env("xterm", "");
        env.stdin_tty = true;
        assert!(!TerminalCapabilities::detect_from_inputs(&env).is_interactive());
        env.stdout_tty = true;
        assert!(TerminalCapabilities::detect_from_inputs(&env).is_interactive());
    }
}
