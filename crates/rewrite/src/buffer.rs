use crate::error::{Result, RewriteError};
use serde::{Deserialize, Serialize};

/// A (line, byte column) coordinate into a [`Buffer`].
///
/// Only meaningful against the buffer state it was computed from: any edit at
/// or before it invalidates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    /// Line index (0-based)
    pub line: usize,

    /// Byte offset within the line
    pub col: usize,
}

impl Pos {
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// The lines of one file, each keeping its own terminator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    lines: Vec<String>,
}

impl Buffer {
    #[must_use]
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Split text into lines, keeping `\n` (and any `\r` before it) on each line
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split_inclusive('\n').map(str::to_owned).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        self.lines.concat()
    }

    /// Text of line `index`; empty for indices past the end
    #[must_use]
    pub fn line(&self, index: usize) -> &str {
        self.lines.get(index).map_or("", String::as_str)
    }

    #[must_use]
    pub fn bytes(&self, index: usize) -> &[u8] {
        self.line(index).as_bytes()
    }

    /// Byte at `(line, col)`, or 0 outside the buffer
    #[must_use]
    pub fn byte(&self, line: usize, col: usize) -> u8 {
        self.bytes(line).get(col).copied().unwrap_or(0)
    }

    /// Byte immediately before `(line, col)` on the same line, or 0 at column 0
    #[must_use]
    pub fn byte_before(&self, line: usize, col: usize) -> u8 {
        col.checked_sub(1).map_or(0, |prev| self.byte(line, prev))
    }

    pub fn set_line(&mut self, index: usize, text: String) {
        self.lines[index] = text;
    }

    pub fn insert_line(&mut self, index: usize, text: String) {
        self.lines.insert(index, text);
    }

    pub fn remove_line(&mut self, index: usize) -> String {
        self.lines.remove(index)
    }

    /// Replace `line[start..end]` with `text`
    pub fn replace_slice(&mut self, line: usize, start: usize, end: usize, text: &str) -> Result<()> {
        let current = self.line(line);
        if line >= self.lines.len() || current.get(start..end).is_none() {
            return Err(RewriteError::stale(
                Pos::new(line, start),
                text,
                current.get(start..).unwrap_or(""),
            ));
        }
        self.lines[line].replace_range(start..end, text);
        Ok(())
    }

    pub fn insert(&mut self, line: usize, col: usize, text: &str) -> Result<()> {
        self.replace_slice(line, col, col, text)
    }

    /// Replace `old` at `(line, col)` with `new`; fails if `old` is not there
    pub fn replace(&mut self, line: usize, col: usize, old: &str, new: &str) -> Result<()> {
        let end = col + old.len();
        let found = self.line(line).get(col..end);
        if found != Some(old) {
            let found = found.map_or_else(
                || self.line(line).get(col..).unwrap_or("").to_string(),
                str::to_string,
            );
            return Err(RewriteError::stale(Pos::new(line, col), old, &found));
        }
        self.replace_slice(line, col, end, new)
    }

    /// Delete `old` at `(line, col)`; fails if `old` is not there
    pub fn delete(&mut self, line: usize, col: usize, old: &str) -> Result<()> {
        self.replace(line, col, old, "")
    }
}

impl From<Vec<String>> for Buffer {
    fn from(lines: Vec<String>) -> Self {
        Self::new(lines)
    }
}

pub(crate) fn is_ident(b: u8) -> bool {
    // Non-ASCII bytes count as identifier bytes so scans never stop inside a UTF-8 sequence.
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

pub(crate) fn is_space(b: u8) -> bool {
    b.is_ascii_whitespace()
}

/// Byte at a possibly negative or out-of-range index, or 0
pub(crate) fn byte_at(s: &[u8], i: isize) -> u8 {
    usize::try_from(i)
        .ok()
        .and_then(|i| s.get(i))
        .copied()
        .unwrap_or(0)
}

/// Non-empty and nothing but whitespace
pub(crate) fn is_blank(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_space)
}

/// The terminator a line ends with (`"\r\n"`, `"\n"` or `""`)
pub(crate) fn line_ending(s: &str) -> &'static str {
    if s.ends_with("\r\n") {
        "\r\n"
    } else if s.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}
