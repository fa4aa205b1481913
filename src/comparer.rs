/// Equivalence policy used by `matches`.
///
/// `expected` is the pattern character, `actual` the character found in the content.
pub trait CharComparer: Sync {
    fn equivalent(&self, expected: char, actual: char) -> bool;
}

/// Plain `==`. This is what `matches(pattern, None)` uses.
#[derive(Clone, Copy, Debug, Default)]
pub struct Exact;

impl CharComparer for Exact {
    #[inline]
    fn equivalent(&self, expected: char, actual: char) -> bool {
        expected == actual
    }
}

/// Folds `A-Z` onto `a-z`; everything else compares exactly.
#[derive(Clone, Copy, Debug, Default)]
pub struct AsciiCaseInsensitive;

impl CharComparer for AsciiCaseInsensitive {
    #[inline]
    fn equivalent(&self, expected: char, actual: char) -> bool {
        expected.eq_ignore_ascii_case(&actual)
    }
}

/// Unicode lowercase folding. Characters whose lowercase form expands to
/// several characters (e.g. `İ`) only match a character with the same expansion.
#[derive(Clone, Copy, Debug, Default)]
pub struct CaseInsensitive;

impl CharComparer for CaseInsensitive {
    fn equivalent(&self, expected: char, actual: char) -> bool {
        if expected == actual {
            return true;
        }
        if expected.is_ascii() && actual.is_ascii() {
            return expected.eq_ignore_ascii_case(&actual);
        }
        expected.to_lowercase().eq(actual.to_lowercase())
    }
}

impl<F> CharComparer for F
where
    F: Fn(char, char) -> bool + Sync,
{
    #[inline]
    fn equivalent(&self, expected: char, actual: char) -> bool {
        self(expected, actual)
    }
}

#[inline]
pub(crate) fn equivalent(comparer: Option<&dyn CharComparer>, expected: char, actual: char) -> bool {
    match comparer {
        Some(c) => c.equivalent(expected, actual),
        None => expected == actual,
    }
}
