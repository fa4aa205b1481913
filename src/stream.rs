use crate::cursor::{CharCursor, Cursor};
use crate::error::CursorError;
use crate::reader::{Pulled, SharedReader};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Catch-up state of one stream cursor; this is what the reader's registry
/// holds weakly.
///
/// `head` is the pulled node for `position`. Once set, the characters after it
/// are reached through the node chain, so the buffer always covers
/// `position..read_position` without further notifications.
pub(crate) struct CatchUp {
    position: usize,
    head: OnceLock<Arc<Pulled>>,
}

impl CatchUp {
    pub(crate) fn new(position: usize, head: Option<Arc<Pulled>>) -> Self {
        let cell = OnceLock::new();
        if let Some(node) = head {
            let _ = cell.set(node);
        }
        Self {
            position,
            head: cell,
        }
    }

    pub(crate) fn has_head(&self) -> bool {
        self.head.get().is_some()
    }

    /// Read-ahead notification. Returns whether this cursor still waits for
    /// its own position to be pulled.
    pub(crate) fn notify(&self, node: &Arc<Pulled>) -> bool {
        if node.offset == self.position {
            let _ = self.head.set(Arc::clone(node));
        }
        self.head.get().is_none() && node.offset < self.position
    }
}

/// Lazy cursor over a [`SharedReader`].
///
/// Reading the current character pulls from the source only when no cursor
/// has pulled this position yet; otherwise the character comes from the
/// catch-up chain.
#[derive(Clone)]
pub struct StreamCursor {
    reader: SharedReader,
    catch_up: Arc<CatchUp>,
}

impl StreamCursor {
    pub(crate) fn from_parts(reader: SharedReader, catch_up: Arc<CatchUp>) -> Self {
        Self { reader, catch_up }
    }

    /// Logical position of this cursor.
    pub fn position(&self) -> usize {
        self.catch_up.position
    }

    pub fn reader(&self) -> &SharedReader {
        &self.reader
    }

    /// Characters this cursor can serve without pulling, i.e. `read_position - position`.
    pub fn buffered(&self) -> usize {
        self.reader
            .read_position()
            .saturating_sub(self.catch_up.position)
    }
}

impl CharCursor for StreamCursor {
    fn current_char(&self) -> Option<char> {
        if let Some(node) = self.catch_up.head.get() {
            return Some(node.ch);
        }
        let mut state = self.reader.lock();
        while state.read_position() <= self.catch_up.position {
            if state.pull().is_none() {
                break;
            }
        }
        self.catch_up.head.get().map(|node| node.ch)
    }

    /// # Panics
    ///
    /// Panics if the reader has already passed the next position without
    /// retaining it for this cursor, which cursors derived through `next`
    /// never allow.
    fn next(&self) -> Cursor {
        let position = self.catch_up.position + 1;
        let mut state = self.reader.lock();
        let head = self
            .catch_up
            .head
            .get()
            .and_then(|node| node.next.get().cloned());
        if head.is_none() {
            if state.read_position() > position {
                panic!(
                    "{}",
                    CursorError::PositionPassed {
                        position,
                        read_position: state.read_position(),
                    }
                );
            }
            if state.is_exhausted() {
                return Cursor::End;
            }
        }
        Cursor::Stream(state.attach(&self.reader, position, head))
    }
}

impl fmt::Debug for StreamCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamCursor")
            .field("position", &self.catch_up.position)
            .field("head", &self.catch_up.head.get().map(|node| node.ch))
            .finish()
    }
}
