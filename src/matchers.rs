//! Single-character predicates for Char nodes, plus case folding helpers.

use crate::api::Flags;
use crate::charclasses::{class_contains, Interval};
use crate::cursor::decode_char;
use crate::unicode::PropertyClass;

/// One predicate of a Char node. A node holds a union of these; the node's
/// `reversed` flag inverts the union as a whole.
#[derive(Debug, Clone)]
pub(crate) enum CharMatcher {
    /// A literal code point.
    Lit(char),
    /// An inclusive range from a bracket expression.
    Range(char, char),
    /// Any character; line terminators only under the 's' flag.
    Any,
    /// An ASCII class table (Perl or POSIX).
    Class(&'static [Interval]),
    /// A Unicode property class.
    Property(PropertyClass),
    /// Matches when the inner matcher does not.
    Negated(Box<CharMatcher>),
}

impl CharMatcher {
    pub(crate) fn matches(&self, c: char, flags: Flags) -> bool {
        match self {
            &CharMatcher::Lit(lit) => c == lit || (flags.icase && fold_eq(c, lit)),
            &CharMatcher::Range(lo, hi) => {
                in_range(lo, hi, c) || (flags.icase && case_variants(c, |v| in_range(lo, hi, v)))
            }
            CharMatcher::Any => flags.dot_all || c != '\n',
            CharMatcher::Class(ivs) => {
                class_contains(ivs, c as u32)
                    || (flags.icase && case_variants(c, |v| class_contains(ivs, v as u32)))
            }
            CharMatcher::Property(prop) => {
                prop.contains(c) || (flags.icase && case_variants(c, |v| prop.contains(v)))
            }
            CharMatcher::Negated(inner) => !inner.matches(c, flags),
        }
    }
}

fn in_range(lo: char, hi: char, c: char) -> bool {
    lo <= c && c <= hi
}

/// Apply `f` to the simple case variants of `c`, skipping multi-char
/// mappings.
fn case_variants(c: char, mut f: impl FnMut(char) -> bool) -> bool {
    let mut lower = c.to_lowercase();
    if let Some(l) = lower.next() {
        if lower.next().is_none() && l != c && f(l) {
            return true;
        }
    }
    let mut upper = c.to_uppercase();
    if let Some(u) = upper.next() {
        if upper.next().is_none() && u != c && f(u) {
            return true;
        }
    }
    false
}

/// \return whether two runes compare equal under simple case folding.
pub(crate) fn fold_eq(a: char, b: char) -> bool {
    if a == b {
        return true;
    }
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(&b);
    }
    a.to_lowercase().eq(b.to_lowercase())
}

/// \return whether this is an ASCII word character, the class used by \b.
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Compare `needle` rune-wise against the front of `haystack` under case
/// folding. \return the number of haystack bytes consumed on success.
pub(crate) fn fold_prefix(needle: &[u8], haystack: &[u8]) -> Option<usize> {
    let mut ni = 0;
    let mut hi = 0;
    while ni < needle.len() {
        let (nc, nw) = decode_char(&needle[ni..])?;
        let (hc, hw) = decode_char(&haystack[hi..])?;
        if !fold_eq(nc, hc) {
            return None;
        }
        ni += nw;
        hi += hw;
    }
    Some(hi)
}
