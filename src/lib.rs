//! Branchable, forward-only character cursors for tokenizers.
//!
//! A [`Cursor`] is an immutable position in a character sequence. Calling
//! [`CharCursor::next`] yields a new cursor and leaves the old one usable, so a
//! parser can keep several positions alive and advance each independently.
//!
//! Content already in memory is served by an [`ArrayCursor`]. A forward-only
//! source (an iterator of `char`, or a byte reader decoded as UTF-8) is served
//! by [`StreamCursor`]s that share one [`SharedReader`]: whichever cursor asks
//! first pulls the character, and cursors behind the read point are answered
//! from characters already pulled.
//!
//! ```
//! use lazycursor::{CharCursor, Cursor};
//!
//! let root = Cursor::from_source("ab".chars());
//! let second = root.next();
//! assert_eq!(second.current_char(), Some('b'));
//! assert_eq!(root.current_char(), Some('a'));
//! assert!(root.matches("ab", None).unwrap());
//! assert_eq!(second.next().current_char(), None);
//! ```

mod array;
pub mod cli;
mod comparer;
mod cursor;
pub mod error;
pub mod options;
mod reader;
mod registry;
mod source;
mod stream;

pub use array::ArrayCursor;
pub use comparer::{AsciiCaseInsensitive, CaseInsensitive, CharComparer, Exact};
pub use cursor::{CharCursor, Cursor, CursorChars};
pub use error::{CursorError, CursorResult};
pub use options::CursorOptions;
pub use reader::{ReadLogEntry, SharedReader};
pub use registry::WeakRegistry;
pub use source::{CharSource, Utf8Source};
pub use stream::StreamCursor;

use std::io::Read;

/// Eager cursor over `text`.
pub fn cursor_from_str(text: &str) -> Cursor {
    Cursor::from_text(text)
}

/// Lazy cursor over a byte reader, decoded as UTF-8 with default options.
pub fn cursor_from_reader<R>(reader: R) -> CursorResult<Cursor>
where
    R: Read + Send + 'static,
{
    Cursor::from_reader(reader, &CursorOptions::default())
}

#[cfg(test)]
mod tests;
