#![forbid(unsafe_code)]

//! Frame output writers.
//!
//! [`AnsiOutput`] overwrites the previous frame in place. It diffs by line
//! count only: every call repaints all dynamic lines, and the previous height
//! decides how far to move up first and how many stale rows to clear after.
//!
//! [`DebugOutput`] never moves the cursor. Each frame is appended as its own
//! block, separated from the previous one by a rule and the elapsed time, for
//! environments without cursor addressing.
//!
//! Both writers end lines with `\r\n` since raw mode leaves a bare `\n` in
//! the current column. Each frame is emitted with a single `write_all`
//! followed by a flush.

use std::io::{self, Write};
use std::time::Instant;

use crate::ansi;
use crate::frame::Frame;

/// Something a frame can be displayed on.
pub trait Output {
    /// Display `frame`, replacing the previous one where supported.
    fn display(&mut self, frame: &Frame) -> io::Result<()>;
}

impl<O: Output + ?Sized> Output for Box<O> {
    fn display(&mut self, frame: &Frame) -> io::Result<()> {
        (**self).display(frame)
    }
}

/// In-place writer driven by cursor movement and line clears.
///
/// # Byte layout of one call
///
/// 1. `CSI n F` to the first row of the previous frame (`n = last_height`)
/// 2. every static line, then every dynamic line, each followed by `CSI K`
///    and `\r\n`
/// 3. if fewer rows were written than `last_height`: `CSI K` on each stale
///    row, joined by `\r\n`, then `CSI n F` back up to just below the content
/// 4. `last_height = lines.len()`; static rows are never revisited
#[derive(Debug)]
pub struct AnsiOutput<W: Write> {
    writer: W,
    buf: Vec<u8>,
    last_height: usize,
}

impl<W: Write> AnsiOutput<W> {
    /// Wrap `writer`; nothing has been drawn yet.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buf: Vec::with_capacity(256),
            last_height: 0,
        }
    }

    /// Number of dynamic rows the next call will move up over.
    #[inline]
    pub const fn last_height(&self) -> usize {
        self.last_height
    }

    /// Get a reference to the inner writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Get a mutable reference to the inner writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Consume the output, returning the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn encode(&mut self, frame: &Frame) -> io::Result<()> {
        let buf = &mut self.buf;
        buf.clear();

        ansi::cpl(buf, self.last_height)?;

        for line in frame.static_lines.iter().chain(&frame.lines) {
            buf.extend_from_slice(line.as_bytes());
            ansi::erase_line(buf)?;
            ansi::crlf(buf)?;
        }

        let written = frame.total_rows();
        if written < self.last_height {
            let stale = self.last_height - written;
            for i in 0..stale {
                if i > 0 {
                    ansi::crlf(buf)?;
                }
                ansi::erase_line(buf)?;
            }
            ansi::cpl(buf, stale - 1)?;
        }
        Ok(())
    }
}

impl<W: Write> Output for AnsiOutput<W> {
    fn display(&mut self, frame: &Frame) -> io::Result<()> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "tessel.render.emit",
            lines = frame.lines.len(),
            static_lines = frame.static_lines.len(),
            last_height = self.last_height
        )
        .entered();

        self.encode(frame)?;
        self.writer.write_all(&self.buf)?;
        self.writer.flush()?;
        self.last_height = frame.lines.len();
        Ok(())
    }
}

/// Number of `~` in the rule between debug blocks.
pub const DEBUG_RULE_WIDTH: usize = 50;

/// Append-only writer: one block per frame, no cursor movement.
#[derive(Debug)]
pub struct DebugOutput<W: Write> {
    writer: W,
    last_render: Option<Instant>,
}

impl<W: Write> DebugOutput<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            last_render: None,
        }
    }

    /// Get a reference to the inner writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Consume the output, returning the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Output for DebugOutput<W> {
    fn display(&mut self, frame: &Frame) -> io::Result<()> {
        let mut block = String::new();
        let now = Instant::now();
        if let Some(last) = self.last_render {
            block.push_str("\r\n");
            block.extend(std::iter::repeat_n('~', DEBUG_RULE_WIDTH));
            block.push_str(&format!(" +{:?}\r\n", now.duration_since(last)));
        }
        self.last_render = Some(now);

        for line in frame.static_lines.iter().chain(&frame.lines) {
            block.push_str(line);
            block.push_str("\r\n");
        }
        block.push_str("\r\n");

        self.writer.write_all(block.as_bytes())?;
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> Frame {
        (0..n).map(|i| format!("line{i}")).collect()
    }

    fn bytes_of(output: &AnsiOutput<Vec<u8>>) -> String {
        String::from_utf8(output.get_ref().clone()).unwrap()
    }

    #[test]
    fn first_frame_has_no_cursor_movement() {
        let mut out = AnsiOutput::new(Vec::new());
        out.display(&lines(2)).unwrap();
        assert_eq!(bytes_of(&out), "line0\x1b[K\r\nline1\x1b[K\r\n");
        assert_eq!(out.last_height(), 2);
    }

    #[test]
    fn same_height_repaints_without_clearing() {
        let mut out = AnsiOutput::new(Vec::new());
        out.display(&lines(2)).unwrap();
        out.get_mut().clear();
        out.display(&lines(2)).unwrap();
        assert_eq!(bytes_of(&out), "\x1b[2Fline0\x1b[K\r\nline1\x1b[K\r\n");
    }

    #[test]
    fn single_line_uses_bare_cpl() {
        let mut out = AnsiOutput::new(Vec::new());
        out.display(&lines(1)).unwrap();
        out.get_mut().clear();
        out.display(&lines(1)).unwrap();
        assert_eq!(bytes_of(&out), "\x1b[Fline0\x1b[K\r\n");
    }

    #[test]
    fn shrinking_by_one_clears_without_moving_back() {
        let mut out = AnsiOutput::new(Vec::new());
        out.display(&lines(2)).unwrap();
        out.get_mut().clear();
        out.display(&lines(1)).unwrap();
        assert_eq!(bytes_of(&out), "\x1b[2Fline0\x1b[K\r\n\x1b[K");
        assert_eq!(out.last_height(), 1);
    }

    #[test]
    fn empty_frame_clears_everything() {
        let mut out = AnsiOutput::new(Vec::new());
        out.display(&lines(3)).unwrap();
        out.get_mut().clear();
        out.display(&Frame::default()).unwrap();
        assert_eq!(bytes_of(&out), "\x1b[3F\x1b[K\r\n\x1b[K\r\n\x1b[K\x1b[2F");
        assert_eq!(out.last_height(), 0);
    }

    #[test]
    fn static_lines_precede_and_are_not_counted() {
        let mut out = AnsiOutput::new(Vec::new());
        let frame = lines(1).with_static(vec!["log".into()]);
        out.display(&frame).unwrap();
        assert_eq!(bytes_of(&out), "log\x1b[K\r\nline0\x1b[K\r\n");
        assert_eq!(out.last_height(), 1);
    }

    #[test]
    fn static_rows_count_towards_covering_stale_rows() {
        let mut out = AnsiOutput::new(Vec::new());
        out.display(&lines(2)).unwrap();
        out.get_mut().clear();
        let frame = lines(1).with_static(vec!["log".into()]);
        out.display(&frame).unwrap();
        assert_eq!(bytes_of(&out), "\x1b[2Flog\x1b[K\r\nline0\x1b[K\r\n");
        assert_eq!(out.last_height(), 1);
    }

    #[test]
    fn failed_write_keeps_previous_height() {
        struct Failing;
        impl Write for Failing {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let mut out = AnsiOutput::new(Failing);
        assert!(out.display(&lines(2)).is_err());
        assert_eq!(out.last_height(), 0);
    }

    #[test]
    fn debug_blocks_are_separated_by_rule() {
        let mut out = DebugOutput::new(Vec::new());
        out.display(&lines(1)).unwrap();
        out.display(&lines(1).with_static(vec!["log".into()]))
            .unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();
        let (first, rest) = text.split_once("\r\n\r\n").unwrap();
        assert_eq!(first, "line0");
        let rule = format!("\r\n{} +", "~".repeat(DEBUG_RULE_WIDTH));
        assert!(rest.starts_with(&rule), "{rest:?}");
        assert!(rest.ends_with("\r\nlog\r\nline0\r\n\r\n"), "{rest:?}");
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn every_line_feed_follows_a_carriage_return() {
        let mut out = AnsiOutput::new(Vec::new());
        out.display(&lines(4).with_static(vec!["log".into()])).unwrap();
        out.display(&lines(1)).unwrap();
        out.display(&Frame::default()).unwrap();
        let bytes = out.into_inner();
        for (i, _) in bytes.iter().enumerate().filter(|(_, b)| **b == b'\n') {
            assert!(i > 0 && bytes[i - 1] == b'\r', "bare LF at {i}: {bytes:?}");
        }

        let mut debug = DebugOutput::new(Vec::new());
        debug.display(&lines(2)).unwrap();
        debug.display(&lines(1)).unwrap();
        let text = debug.into_inner();
        for (i, _) in text.iter().enumerate().filter(|(_, b)| **b == b'\n') {
            assert_eq!(text[i - 1], b'\r', "bare LF at {i}");
        }
    }
}
