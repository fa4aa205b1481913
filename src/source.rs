use crate::error::{CursorError, CursorResult};
use std::io::{self, Read};

/// A forward-only, single-pass supply of characters.
///
/// `Ok(None)` means the source is exhausted. The shared reader never polls a
/// source again after it reported exhaustion or an error.
pub trait CharSource: Send {
    fn next_char(&mut self) -> CursorResult<Option<char>>;
}

impl<I> CharSource for I
where
    I: Iterator<Item = char> + Send,
{
    #[inline]
    fn next_char(&mut self) -> CursorResult<Option<char>> {
        Ok(self.next())
    }
}

const REPLACEMENT: char = '\u{FFFD}';

/// Incremental UTF-8 decoder over a byte reader.
///
/// Multi-byte sequences split across reads are reassembled. Invalid input is
/// either replaced with U+FFFD (lossy) or reported as `InvalidUtf8`.
pub struct Utf8Source<R> {
    reader: R,
    buf: Vec<u8>,
    start: usize,
    end: usize,
    // bytes consumed before buf[start]
    offset: usize,
    eof: bool,
    lossy: bool,
}

impl<R: Read + Send> Utf8Source<R> {
    pub fn new(reader: R, buffer_size: usize, lossy: bool) -> CursorResult<Self> {
        // a full 4-byte sequence must fit
        if buffer_size < 4 {
            return Err(CursorError::InvalidArgument("read buffer must hold at least 4 bytes"));
        }
        Ok(Self {
            reader,
            buf: vec![0u8; buffer_size],
            start: 0,
            end: 0,
            offset: 0,
            eof: false,
            lossy,
        })
    }

    /// Byte offset of the next undecoded byte.
    pub fn byte_offset(&self) -> usize {
        self.offset
    }

    fn fill(&mut self) -> io::Result<()> {
        if self.start > 0 {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }
        loop {
            match self.reader.read(&mut self.buf[self.end..]) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.end += n;
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn consume(&mut self, n: usize) {
        self.start += n;
        self.offset += n;
    }

    fn invalid(&mut self, len: usize) -> CursorResult<Option<char>> {
        let at = self.offset;
        self.consume(len);
        if self.lossy {
            Ok(Some(REPLACEMENT))
        } else {
            Err(CursorError::InvalidUtf8 { offset: at })
        }
    }
}

impl<R: Read + Send> CharSource for Utf8Source<R> {
    fn next_char(&mut self) -> CursorResult<Option<char>> {
        loop {
            let avail = self.end - self.start;
            if avail == 0 {
                if self.eof {
                    return Ok(None);
                }
                self.fill()?;
                continue;
            }
            let (decoded, size) = bstr::decode_utf8(&self.buf[self.start..self.end]);
            match decoded {
                Some(ch) => {
                    self.consume(size);
                    return Ok(Some(ch));
                }
                // an incomplete sequence may still be completed by the next read
                None if size == avail && !self.eof => {
                    self.fill()?;
                    continue;
                }
                None => return self.invalid(size),
            }
        }
    }
}

