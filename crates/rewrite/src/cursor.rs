//! Line iteration that tolerates the visitor editing the buffer.
//!
//! While line `i` is being visited the visitor may edit, insert or delete any
//! of `lines[0..=i]` (and edit later lines in place). When the cursor advances
//! it compares the buffer against what it saw before the visit and moves to
//! the first line that has not been processed yet:
//!
//! ```text
//! length changed by d   ->  next = i + d + 1, buffer marked dirty
//! line i changed        ->  marked dirty; removed if it became blank
//! otherwise             ->  next = i + 1
//! ```

use crate::buffer::{is_blank, Buffer};
use crate::error::Result;

/// Explicit cursor over the lines of a [`Buffer`]
#[derive(Debug, Default)]
pub struct LineCursor {
    next: usize,
    visit: Option<Visit>,
    dirty: bool,
}

#[derive(Debug)]
struct Visit {
    index: usize,
    len: usize,
    line: String,
}

impl LineCursor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Settle the previous visit against the buffer and return the next line to visit
    pub fn advance(&mut self, buffer: &mut Buffer) -> Option<usize> {
        if let Some(visit) = self.visit.take() {
            self.next = self.settle(buffer, visit);
        }
        if self.next >= buffer.len() {
            return None;
        }
        self.visit = Some(Visit {
            index: self.next,
            len: buffer.len(),
            line: buffer.line(self.next).to_string(),
        });
        Some(self.next)
    }

    /// Line currently being visited
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.visit.as_ref().map(|visit| visit.index)
    }

    /// Whether any settled visit changed the buffer
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn settle(&mut self, buffer: &mut Buffer, visit: Visit) -> usize {
        let len = buffer.len();
        if len != visit.len {
            self.dirty = true;
            let next = visit.index as isize + len as isize - visit.len as isize + 1;
            return usize::try_from(next).unwrap_or(0);
        }

        let current = buffer.line(visit.index);
        if current != visit.line {
            self.dirty = true;
            if !is_blank(&visit.line) && is_blank(current) {
                buffer.remove_line(visit.index);
                return visit.index;
            }
        }
        visit.index + 1
    }
}

impl Buffer {
    /// Run `visit` once per logical line, returning whether anything changed.
    pub fn for_each_line<F>(&mut self, mut visit: F) -> Result<bool>
    where
        F: FnMut(&mut Buffer, usize) -> Result<()>,
    {
        let mut cursor = LineCursor::new();
        while let Some(index) = cursor.advance(self) {
            visit(self, index)?;
        }
        Ok(cursor.is_dirty())
    }
}
