#![forbid(unsafe_code)]

//! Frame: the encoded result of one render pass.

/// One rendered snapshot.
///
/// `static_lines` are printed above `lines` once and become scrollback; only
/// `lines` are overwritten by the next frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Dynamic lines, repainted every pass.
    pub lines: Vec<String>,
    /// Lines promoted to scrollback by this pass.
    pub static_lines: Vec<String>,
}

impl Frame {
    /// A frame with only dynamic lines.
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            static_lines: Vec::new(),
        }
    }

    /// Attach static lines.
    #[must_use]
    pub fn with_static(mut self, static_lines: Vec<String>) -> Self {
        self.static_lines = static_lines;
        self
    }

    /// Number of terminal rows this frame writes.
    #[inline]
    pub fn total_rows(&self) -> usize {
        self.static_lines.len() + self.lines.len()
    }
}

impl<S: Into<String>> FromIterator<S> for Frame {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}
