use crate::array::ArrayCursor;
use crate::comparer::{CharComparer, equivalent};
use crate::error::{CursorError, CursorResult};
use crate::options::CursorOptions;
use crate::reader::SharedReader;
use crate::source::{CharSource, Utf8Source};
use crate::stream::StreamCursor;
use std::io::Read;
use std::sync::Arc;

/// Capabilities shared by every cursor variant.
///
/// A cursor is an immutable position. `next` never changes `self`; it returns
/// a new cursor one character further on.
pub trait CharCursor {
    /// Character at this position, or `None` past the end of content.
    fn current_char(&self) -> Option<char>;

    /// Cursor for the following position. Past the end this is [`Cursor::End`].
    fn next(&self) -> Cursor;

    /// True if the upcoming content holds at least `pattern.chars().count()`
    /// characters and each one is equivalent to the pattern character at the
    /// same offset (exact equality when `comparer` is `None`).
    ///
    /// Running out of content yields `Ok(false)`. An empty pattern is an
    /// `InvalidArgument` error.
    fn matches(&self, pattern: &str, comparer: Option<&dyn CharComparer>) -> CursorResult<bool> {
        let mut expected = pattern.chars();
        let Some(first) = expected.next() else {
            return Err(empty_pattern());
        };
        match self.current_char() {
            Some(actual) if equivalent(comparer, first, actual) => {}
            _ => return Ok(false),
        }
        let mut cursor = self.next();
        for want in expected {
            match cursor.current_char() {
                Some(actual) if equivalent(comparer, want, actual) => {}
                _ => return Ok(false),
            }
            cursor = cursor.next();
        }
        Ok(true)
    }
}

pub(crate) fn empty_pattern() -> CursorError {
    CursorError::InvalidArgument("match pattern must not be empty")
}

/// A position in a character sequence, backed by memory or by a shared stream.
#[derive(Clone, Debug, Default)]
pub enum Cursor {
    /// Past the end of content. Its successor is itself.
    #[default]
    End,
    Array(ArrayCursor),
    Stream(StreamCursor),
}

impl Cursor {
    /// Eager cursor over `text`; `Cursor::End` when `text` is empty.
    pub fn from_text(text: &str) -> Cursor {
        Cursor::from_chars(text.chars().collect())
    }

    pub fn from_chars(chars: Vec<char>) -> Cursor {
        Cursor::from_buffer(chars.into())
    }

    /// Eager cursor at index 0 of a shared buffer; `Cursor::End` when it is empty.
    pub fn from_buffer(buf: Arc<[char]>) -> Cursor {
        match ArrayCursor::new(buf, 0) {
            Ok(cursor) => Cursor::Array(cursor),
            Err(_) => Cursor::End,
        }
    }

    /// Lazy cursor at position 0 of a forward-only source.
    pub fn from_source<S>(source: S) -> Cursor
    where
        S: CharSource + 'static,
    {
        Cursor::from_source_with_options(source, &CursorOptions::default())
    }

    pub fn from_source_with_options<S>(source: S, opts: &CursorOptions) -> Cursor
    where
        S: CharSource + 'static,
    {
        SharedReader::new(source, opts).root()
    }

    /// Lazy cursor over UTF-8 bytes from `reader`, decoded on demand.
    pub fn from_reader<R>(reader: R, opts: &CursorOptions) -> CursorResult<Cursor>
    where
        R: Read + Send + 'static,
    {
        let source = Utf8Source::new(reader, opts.read_buffer_size, opts.lossy_utf8)?;
        Ok(Cursor::from_source_with_options(source, opts))
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Cursor::End)
    }

    /// Logical position, or `None` for the terminal cursor.
    pub fn position(&self) -> Option<usize> {
        match self {
            Cursor::End => None,
            Cursor::Array(a) => Some(a.position()),
            Cursor::Stream(s) => Some(s.position()),
        }
    }

    /// The shared reader behind a stream cursor.
    pub fn reader(&self) -> Option<&SharedReader> {
        match self {
            Cursor::Stream(s) => Some(s.reader()),
            _ => None,
        }
    }

    /// Cursor `n` positions further on.
    pub fn skip(&self, n: usize) -> Cursor {
        let mut cursor = self.clone();
        for _ in 0..n {
            if cursor.is_end() {
                break;
            }
            cursor = cursor.next();
        }
        cursor
    }

    /// Up to `n` upcoming characters, starting with the current one.
    pub fn peek(&self, n: usize) -> String {
        self.chars().take(n).collect()
    }

    /// Iterates the remaining characters without moving this cursor.
    pub fn chars(&self) -> CursorChars {
        CursorChars {
            cursor: self.clone(),
        }
    }
}

impl CharCursor for Cursor {
    fn current_char(&self) -> Option<char> {
        match self {
            Cursor::End => None,
            Cursor::Array(a) => a.current_char(),
            Cursor::Stream(s) => s.current_char(),
        }
    }

    fn next(&self) -> Cursor {
        match self {
            Cursor::End => Cursor::End,
            Cursor::Array(a) => a.next(),
            Cursor::Stream(s) => s.next(),
        }
    }

    fn matches(&self, pattern: &str, comparer: Option<&dyn CharComparer>) -> CursorResult<bool> {
        match self {
            Cursor::End => {
                if pattern.is_empty() {
                    Err(empty_pattern())
                } else {
                    Ok(false)
                }
            }
            Cursor::Array(a) => a.matches(pattern, comparer),
            Cursor::Stream(s) => s.matches(pattern, comparer),
        }
    }
}

impl From<&str> for Cursor {
    fn from(text: &str) -> Self {
        Cursor::from_text(text)
    }
}

impl From<String> for Cursor {
    fn from(text: String) -> Self {
        Cursor::from_text(&text)
    }
}

impl From<Vec<char>> for Cursor {
    fn from(chars: Vec<char>) -> Self {
        Cursor::from_chars(chars)
    }
}

/// Iterator over the characters from a cursor onward.
pub struct CursorChars {
    cursor: Cursor,
}

impl Iterator for CursorChars {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let ch = self.cursor.current_char()?;
        self.cursor = self.cursor.next();
        Some(ch)
    }
}
