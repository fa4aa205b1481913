use crate::comparer::{CharComparer, equivalent};
use crate::cursor::{CharCursor, Cursor, empty_pattern};
use crate::error::{CursorError, CursorResult};
use std::sync::Arc;

/// Eager cursor over a fully materialized buffer.
///
/// All cursors derived from one root share the same buffer; advancing only
/// bumps the index.
#[derive(Clone, Debug)]
pub struct ArrayCursor {
    buf: Arc<[char]>,
    index: usize,
}

impl ArrayCursor {
    /// Fails with `OutOfRange` unless `index < buf.len()`.
    pub fn new(buf: Arc<[char]>, index: usize) -> CursorResult<Self> {
        if index >= buf.len() {
            return Err(CursorError::OutOfRange {
                index,
                len: buf.len(),
            });
        }
        Ok(Self { buf, index })
    }

    pub fn position(&self) -> usize {
        self.index
    }

    /// Characters from this position to the end, including the current one.
    pub fn remaining(&self) -> &[char] {
        &self.buf[self.index..]
    }

    pub fn buffer(&self) -> &Arc<[char]> {
        &self.buf
    }
}

impl CharCursor for ArrayCursor {
    #[inline]
    fn current_char(&self) -> Option<char> {
        Some(self.buf[self.index])
    }

    fn next(&self) -> Cursor {
        let index = self.index + 1;
        if index == self.buf.len() {
            return Cursor::End;
        }
        Cursor::Array(Self {
            buf: Arc::clone(&self.buf),
            index,
        })
    }

    // compares against the buffer directly instead of walking cursors
    fn matches(&self, pattern: &str, comparer: Option<&dyn CharComparer>) -> CursorResult<bool> {
        if pattern.is_empty() {
            return Err(empty_pattern());
        }
        let mut content = self.remaining().iter();
        for want in pattern.chars() {
            match content.next() {
                Some(&actual) if equivalent(comparer, want, actual) => {}
                _ => return Ok(false),
            }
        }
        Ok(true)
    }
}
