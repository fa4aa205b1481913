//! Shared state behind every stream cursor derived from one source.
//!
//! One mutex guards the source, the pull counter, the subscriber registry and
//! the delivery of read-ahead notifications. Stream cursors are created and
//! subscribed under the same lock, so a pull is observed by a new cursor
//! either completely or not at all.

use crate::cursor::Cursor;
use crate::error::{CursorError, CursorResult};
use crate::options::CursorOptions;
use crate::registry::WeakRegistry;
use crate::source::CharSource;
use crate::stream::{CatchUp, StreamCursor};
use parking_lot::{Mutex, MutexGuard};
use std::sync::{Arc, OnceLock};

#[cfg(feature = "serde")]
use serde::Serialize;

/// One character pulled from the source, linked to the next one once it is pulled.
///
/// Cursors lagging behind the reader hold the node for their own position and
/// walk forward through `next`; nothing links backwards, so nodes no cursor
/// can reach are freed.
pub(crate) struct Pulled {
    pub(crate) ch: char,
    pub(crate) offset: usize,
    pub(crate) next: OnceLock<Arc<Pulled>>,
}

impl Pulled {
    fn new(ch: char, offset: usize) -> Self {
        Self {
            ch,
            offset,
            next: OnceLock::new(),
        }
    }
}

impl Drop for Pulled {
    // unlink iteratively; recursive drops of a long chain would blow the stack
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut owned) => next = owned.next.take(),
                Err(_) => break,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ReadLogEntry {
    pub offset: usize,
    pub character: Option<char>,
    pub message: &'static str,
    /// Registry entries left after the event.
    pub subscribers: usize,
}

pub(crate) struct ReaderState {
    source: Box<dyn CharSource>,
    read_position: usize,
    tail: Option<Arc<Pulled>>,
    subscribers: WeakRegistry<CatchUp>,
    exhausted: bool,
    fault: Option<CursorError>,
    #[cfg_attr(not(feature = "logging"), allow(dead_code))]
    logging: bool,
    log: Vec<ReadLogEntry>,
}

impl ReaderState {
    pub(crate) fn read_position(&self) -> usize {
        self.read_position
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Reads one character, hands it to every waiting subscriber, then bumps
    /// the read position. Returns `None` once the source is exhausted or failed.
    pub(crate) fn pull(&mut self) -> Option<char> {
        if self.exhausted {
            return None;
        }
        match self.source.next_char() {
            Ok(Some(ch)) => {
                let origin = self.read_position;
                let node = Arc::new(Pulled::new(ch, origin));
                if let Some(prev) = self.tail.replace(Arc::clone(&node)) {
                    let _ = prev.next.set(Arc::clone(&node));
                }
                self.subscribers.broadcast(|sub| sub.notify(&node));
                self.read_position += 1;
                self.record(origin, Some(ch), "pulled character");
                Some(ch)
            }
            Ok(None) => {
                self.finish();
                self.record(self.read_position, None, "source exhausted");
                None
            }
            Err(err) => {
                self.finish();
                self.fault = Some(err);
                self.record(self.read_position, None, "source fault");
                None
            }
        }
    }

    fn finish(&mut self) {
        self.exhausted = true;
        // nothing will be linked after the last node
        self.tail = None;
    }

    /// Creates a stream cursor at `position`. Without a `head`, the cursor is
    /// subscribed so the pull of `position` reaches it.
    pub(crate) fn attach(
        &mut self,
        reader: &SharedReader,
        position: usize,
        head: Option<Arc<Pulled>>,
    ) -> StreamCursor {
        let catch_up = Arc::new(CatchUp::new(position, head));
        if !catch_up.has_head() {
            let pruned = self.subscribers.subscribe(&catch_up);
            if pruned > 0 {
                self.record(position, None, "pruned subscribers");
            }
        }
        StreamCursor::from_parts(reader.clone(), catch_up)
    }

    #[cfg(feature = "logging")]
    fn record(&mut self, offset: usize, character: Option<char>, message: &'static str) {
        if self.logging {
            let subscribers = self.subscribers.len();
            self.log.push(ReadLogEntry {
                offset,
                character,
                message,
                subscribers,
            });
        }
    }

    #[cfg(not(feature = "logging"))]
    #[inline]
    fn record(&mut self, _offset: usize, _character: Option<char>, _message: &'static str) {}
}

/// Handle to the single forward-only source shared by a family of stream cursors.
#[derive(Clone)]
pub struct SharedReader {
    state: Arc<Mutex<ReaderState>>,
}

impl SharedReader {
    pub fn new<S>(source: S, opts: &CursorOptions) -> Self
    where
        S: CharSource + 'static,
    {
        let state = ReaderState {
            source: Box::new(source),
            read_position: 0,
            tail: None,
            subscribers: WeakRegistry::new(opts.prune_threshold),
            exhausted: false,
            fault: None,
            logging: opts.logging,
            log: Vec::new(),
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, ReaderState> {
        self.state.lock()
    }

    /// Cursor at logical position 0 of a reader that has not pulled anything yet.
    pub(crate) fn root(&self) -> Cursor {
        let mut state = self.lock();
        debug_assert_eq!(state.read_position, 0);
        Cursor::Stream(state.attach(self, 0, None))
    }

    /// A new cursor at `position`, which must not be behind the read position:
    /// characters already pulled are only retained for cursors that existed
    /// when they were pulled.
    pub fn cursor_at(&self, position: usize) -> CursorResult<Cursor> {
        let mut state = self.lock();
        if position < state.read_position {
            return Err(CursorError::PositionPassed {
                position,
                read_position: state.read_position,
            });
        }
        if state.exhausted {
            return Ok(Cursor::End);
        }
        Ok(Cursor::Stream(state.attach(self, position, None)))
    }

    /// Number of characters pulled from the source so far.
    pub fn read_position(&self) -> usize {
        self.lock().read_position
    }

    pub fn is_exhausted(&self) -> bool {
        self.lock().exhausted
    }

    /// Registry entries, including dead cursors not swept yet.
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    /// Registry entries whose cursor is still alive.
    pub fn live_subscriber_count(&self) -> usize {
        self.lock().subscribers.live_count()
    }

    /// Takes the error that ended the stream, if the source failed.
    pub fn take_fault(&self) -> Option<CursorError> {
        self.lock().fault.take()
    }

    pub fn has_fault(&self) -> bool {
        self.lock().fault.is_some()
    }

    /// Drains the read log collected so far.
    pub fn take_log(&self) -> Vec<ReadLogEntry> {
        std::mem::take(&mut self.lock().log)
    }
}

impl std::fmt::Debug for SharedReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("SharedReader")
            .field("read_position", &state.read_position)
            .field("exhausted", &state.exhausted)
            .field("subscribers", &state.subscribers.len())
            .finish()
    }
}
