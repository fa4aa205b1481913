use super::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

// Shared test helpers
fn lcg(seed: u64) -> impl FnMut(usize) -> usize {
    let mut x = seed;
    move |bound: usize| {
        // LCG: constants from Numerical Recipes
        x = x.wrapping_mul(1664525).wrapping_add(1013904223);
        ((x >> 24) as usize) % bound.max(1)
    }
}

fn sample_text(seed: u64, len: usize) -> String {
    const ALPHABET: &[char] = &['a', 'b', 'c', 'A', 'B', ' ', '{', '}', ';', 'é', 'ß', '✓'];
    let mut next = lcg(seed);
    (0..len).map(|_| ALPHABET[next(ALPHABET.len())]).collect()
}

fn stream_of(text: &str) -> Cursor {
    Cursor::from_source(text.chars().collect::<Vec<_>>().into_iter())
}

fn stream_with(text: &str, opts: &CursorOptions) -> Cursor {
    Cursor::from_source_with_options(text.chars().collect::<Vec<_>>().into_iter(), opts)
}

/// Char source that counts how often it is polled.
struct Counting {
    chars: std::vec::IntoIter<char>,
    polls: Arc<AtomicUsize>,
}

impl CharSource for Counting {
    fn next_char(&mut self) -> CursorResult<Option<char>> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        Ok(self.chars.next())
    }
}

fn counting_stream(text: &str) -> (Cursor, Arc<AtomicUsize>) {
    let polls = Arc::new(AtomicUsize::new(0));
    let source = Counting {
        chars: text.chars().collect::<Vec<_>>().into_iter(),
        polls: Arc::clone(&polls),
    };
    (Cursor::from_source(source), polls)
}

fn collect(cursor: &Cursor) -> String {
    cursor.chars().collect()
}

mod source;
