use super::*;
use std::io::{self, Cursor as IoCursor, Read};

/// Hands out at most `step` bytes per read, optionally failing once with `Interrupted`.
struct Trickle {
    data: Vec<u8>,
    pos: usize,
    step: usize,
    interrupt: bool,
}

impl Trickle {
    fn new(data: &[u8], step: usize) -> Self {
        Self {
            data: data.to_vec(),
            pos: 0,
            step,
            interrupt: false,
        }
    }
}

impl Read for Trickle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.interrupt {
            self.interrupt = false;
            return Err(io::Error::from(io::ErrorKind::Interrupted));
        }
        let n = self.step.min(buf.len()).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

struct Broken;

impl Read for Broken {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("unplugged"))
    }
}

fn decode_all<R: Read + Send>(source: &mut Utf8Source<R>) -> CursorResult<String> {
    let mut out = String::new();
    while let Some(c) = source.next_char()? {
        out.push(c);
    }
    Ok(out)
}

const MIXED: &str = "héllo wörld ✓ 𝄞 {a:b}";

#[test]
fn decodes_sequences_split_across_reads() {
    for step in [1, 2, 3, 5, 64] {
        for buffer in [4, 5, 7, 8192] {
            let mut source = Utf8Source::new(Trickle::new(MIXED.as_bytes(), step), buffer, false).unwrap();
            assert_eq!(decode_all(&mut source).unwrap(), MIXED, "step {} buffer {}", step, buffer);
            assert_eq!(source.byte_offset(), MIXED.len());
        }
    }
}

#[test]
fn retries_interrupted_reads() {
    let mut reader = Trickle::new(b"ok", 1);
    reader.interrupt = true;
    let mut source = Utf8Source::new(reader, 16, true).unwrap();
    assert_eq!(decode_all(&mut source).unwrap(), "ok");
}

#[test]
fn lossy_replaces_invalid_bytes() {
    let mut source = Utf8Source::new(IoCursor::new(b"a\xffb".to_vec()), 16, true).unwrap();
    assert_eq!(decode_all(&mut source).unwrap(), "a\u{FFFD}b");

    // truncated sequence at end of input
    let mut source = Utf8Source::new(IoCursor::new(b"a\xe2\x82".to_vec()), 16, true).unwrap();
    assert_eq!(decode_all(&mut source).unwrap(), "a\u{FFFD}");

    // bad continuation byte: only the broken prefix is replaced
    let mut source = Utf8Source::new(IoCursor::new(b"\xe2(x".to_vec()), 16, true).unwrap();
    assert_eq!(decode_all(&mut source).unwrap(), "\u{FFFD}(x");
}

#[test]
fn invalid_lead_keeps_following_characters() {
    for input in [&b"\xe2A"[..], b"a\xf0\x9fZ", b"\xf0\x9f\x98", b"x\xc3", b"\xed\xa0\x80!"] {
        let expected = String::from_utf8_lossy(input).into_owned();
        for step in [1, 2, 64] {
            let mut source = Utf8Source::new(Trickle::new(input, step), 4, true).unwrap();
            assert_eq!(decode_all(&mut source).unwrap(), expected, "{:?} step {}", input, step);
            assert_eq!(source.byte_offset(), input.len());
        }
    }
}

#[test]
fn strict_offset_stops_at_broken_prefix() {
    let mut source = Utf8Source::new(IoCursor::new(b"\xe2A".to_vec()), 16, false).unwrap();
    let err = source.next_char().unwrap_err();
    assert!(matches!(err, CursorError::InvalidUtf8 { offset: 0 }));
    assert_eq!(source.byte_offset(), 1);

    let mut source = Utf8Source::new(IoCursor::new(b"a\xf0\x9fZ".to_vec()), 16, false).unwrap();
    assert_eq!(source.next_char().unwrap(), Some('a'));
    let err = source.next_char().unwrap_err();
    assert!(matches!(err, CursorError::InvalidUtf8 { offset: 1 }));
    assert_eq!(source.byte_offset(), 3);
}

#[test]
fn strict_reports_offset() {
    let mut source = Utf8Source::new(IoCursor::new(b"ab\xc0z".to_vec()), 16, false).unwrap();
    assert_eq!(source.next_char().unwrap(), Some('a'));
    assert_eq!(source.next_char().unwrap(), Some('b'));
    let err = source.next_char().unwrap_err();
    assert!(matches!(err, CursorError::InvalidUtf8 { offset: 2 }));
}

#[test]
fn rejects_tiny_buffers() {
    let err = Utf8Source::new(IoCursor::new(Vec::new()), 3, true).err().unwrap();
    assert!(matches!(err, CursorError::InvalidArgument(_)));
    let opts = CursorOptions {
        read_buffer_size: 0,
        ..Default::default()
    };
    assert!(Cursor::from_reader(IoCursor::new(Vec::new()), &opts).is_err());
}

#[test]
fn reader_cursor_walks_like_text_cursor() {
    let root = cursor_from_reader(Trickle::new(MIXED.as_bytes(), 3)).unwrap();
    assert_eq!(collect(&root), MIXED);
    assert!(root.matches("héllo", None).unwrap());
    assert_eq!(root.skip(13).peek(3), " 𝄞 ");
    assert_eq!(collect(&cursor_from_str(MIXED)), MIXED);
}

#[test]
fn strict_reader_cursor_records_fault() {
    let opts = CursorOptions {
        lossy_utf8: false,
        ..Default::default()
    };
    let root = Cursor::from_reader(IoCursor::new(b"ok\xff!".to_vec()), &opts).unwrap();
    assert_eq!(collect(&root), "ok");
    let fault = root.reader().unwrap().take_fault().unwrap();
    assert!(matches!(fault, CursorError::InvalidUtf8 { offset: 2 }));
}

#[test]
fn io_errors_become_faults() {
    let root = Cursor::from_reader(Broken, &CursorOptions::default()).unwrap();
    assert_eq!(root.current_char(), None);
    let fault = root.reader().unwrap().take_fault().unwrap();
    assert!(matches!(fault, CursorError::Io(_)));
}

#[test]
fn iterators_are_sources() {
    let mut chars = "xy".chars();
    assert_eq!(CharSource::next_char(&mut chars).unwrap(), Some('x'));
    assert_eq!(CharSource::next_char(&mut chars).unwrap(), Some('y'));
    assert_eq!(CharSource::next_char(&mut chars).unwrap(), None);
}
