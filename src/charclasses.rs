//! ASCII character class tables: Perl classes like \d and POSIX classes
//! like [[:alpha:]].

/// An inclusive range of code points.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Interval {
    pub(crate) first: u32,
    pub(crate) last: u32,
}

impl Interval {
    pub(crate) fn contains(self, cp: u32) -> bool {
        self.first <= cp && cp <= self.last
    }
}

/// Construct an interval from an inclusive range of char.
const fn r(first: char, last: char) -> Interval {
    Interval {
        first: first as u32,
        last: last as u32,
    }
}

/// Construct an interval from a single char.
const fn r1(c: char) -> Interval {
    Interval {
        first: c as u32,
        last: c as u32,
    }
}

// Note all of these are sorted.

/// \d
pub(crate) const DIGITS: &[Interval] = &[r('0', '9')];

/// \s matches the same set as the conventional golang engine: [\t\n\f\r ].
pub(crate) const WHITESPACE: &[Interval] = &[r('\t', '\n'), r('\x0C', '\r'), r1(' ')];

/// \w
pub(crate) const WORD_CHARS: &[Interval] = &[r('0', '9'), r('A', 'Z'), r1('_'), r('a', 'z')];

const ALNUM: &[Interval] = &[r('0', '9'), r('A', 'Z'), r('a', 'z')];
const ALPHA: &[Interval] = &[r('A', 'Z'), r('a', 'z')];
const ASCII: &[Interval] = &[r('\0', '\x7F')];
const BLANK: &[Interval] = &[r1('\t'), r1(' ')];
const CNTRL: &[Interval] = &[r('\0', '\x1F'), r1('\x7F')];
const GRAPH: &[Interval] = &[r('!', '~')];
const LOWER: &[Interval] = &[r('a', 'z')];
const PRINT: &[Interval] = &[r(' ', '~')];
const PUNCT: &[Interval] = &[r('!', '/'), r(':', '@'), r('[', '`'), r('{', '~')];
const SPACE: &[Interval] = &[r('\t', '\r'), r1(' ')];
const UPPER: &[Interval] = &[r('A', 'Z')];
const XDIGIT: &[Interval] = &[r('0', '9'), r('A', 'F'), r('a', 'f')];

/// Look up a POSIX class body, e.g. "alpha" from [[:alpha:]].
pub(crate) fn posix_class(name: &str) -> Option<&'static [Interval]> {
    Some(match name {
        "alnum" => ALNUM,
        "alpha" => ALPHA,
        "ascii" => ASCII,
        "blank" => BLANK,
        "cntrl" => CNTRL,
        "digit" => DIGITS,
        "graph" => GRAPH,
        "lower" => LOWER,
        "print" => PRINT,
        "punct" => PUNCT,
        "space" => SPACE,
        "upper" => UPPER,
        "word" => WORD_CHARS,
        "xdigit" => XDIGIT,
        _ => return None,
    })
}

/// \return whether any interval of a table contains \p cp.
pub(crate) fn class_contains(ivs: &[Interval], cp: u32) -> bool {
    ivs.iter().any(|iv| iv.contains(cp))
}
