//! Input cursor and submatch snapshots for the yielder engine.

use std::collections::HashMap;
use std::ops::Range;

/// A span of the haystack captured by a group, as absolute byte offsets.
pub(crate) type Span = Range<usize>;

/// The capture table carried through a match attempt.
///
/// Snapshots are logically immutable: merging produces a fresh table with
/// right-hand entries layered over left-hand ones, and older snapshots
/// stay valid for siblings that backtrack.
#[derive(Debug, Clone, Default)]
pub(crate) struct SubMatch {
    by_index: HashMap<u32, Span>,
    by_name: HashMap<Box<str>, Span>,
}

impl SubMatch {
    pub(crate) fn get_index(&self, index: u32) -> Option<&Span> {
        self.by_index.get(&index)
    }

    pub(crate) fn get_name(&self, name: &str) -> Option<&Span> {
        self.by_name.get(name)
    }

    pub(crate) fn set_index(&mut self, index: u32, span: Span) {
        self.by_index.insert(index, span);
    }

    pub(crate) fn set_name(&mut self, name: &str, span: Span) {
        self.by_name.insert(name.into(), span);
    }

    /// Layer `other` over `self` in place.
    pub(crate) fn merge_from(&mut self, other: &SubMatch) {
        if other.by_index.is_empty() && other.by_name.is_empty() {
            return;
        }
        for (k, v) in &other.by_index {
            self.by_index.insert(*k, v.clone());
        }
        for (k, v) in &other.by_name {
            self.by_name.insert(k.clone(), v.clone());
        }
    }

    /// \return a fresh snapshot with `other` layered over `self`.
    pub(crate) fn merged(&self, other: &SubMatch) -> SubMatch {
        let mut merged = self.clone();
        merged.merge_from(other);
        merged
    }
}

/// An immutable view of the haystack at a match position.
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'t> {
    pub(crate) whole: &'t [u8],
    pub(crate) begin: usize,
    pub(crate) sub: SubMatch,
}

impl<'t> Cursor<'t> {
    pub(crate) fn new(whole: &'t [u8], begin: usize, sub: SubMatch) -> Cursor<'t> {
        Cursor { whole, begin, sub }
    }

    /// The bytes from the cursor to the end of the haystack.
    pub(crate) fn rest(&self) -> &'t [u8] {
        &self.whole[self.begin..]
    }

    /// Advance by `k` bytes, carrying a new submatch snapshot.
    pub(crate) fn substr(&self, k: usize, sub: SubMatch) -> Cursor<'t> {
        Cursor {
            whole: self.whole,
            begin: (self.begin + k).min(self.whole.len()),
            sub,
        }
    }

    /// Decode the rune immediately before the cursor.
    pub(crate) fn prev_char(&self) -> Option<char> {
        decode_char_before(self.whole, self.begin).map(|(c, _)| c)
    }

    /// Decode the rune at the cursor.
    pub(crate) fn next_char(&self) -> Option<(char, usize)> {
        decode_char(self.rest())
    }
}

/// What a yielder hands back for one candidate: the number of input bytes
/// consumed and the submatch snapshot produced along the way.
#[derive(Debug, Clone)]
pub(crate) struct Output {
    pub(crate) len: usize,
    pub(crate) sub: SubMatch,
}

/// Decode one rune from the front of `b`. Invalid UTF-8 decodes as U+FFFD
/// of width one so that byte-wise garbage still advances.
pub(crate) fn decode_char(b: &[u8]) -> Option<(char, usize)> {
    let &b0 = b.first()?;
    if b0 < 0x80 {
        return Some((b0 as char, 1));
    }
    let width = match b0 {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return Some((char::REPLACEMENT_CHARACTER, 1)),
    };
    if b.len() >= width {
        if let Ok(s) = std::str::from_utf8(&b[..width]) {
            if let Some(c) = s.chars().next() {
                return Some((c, width));
            }
        }
    }
    Some((char::REPLACEMENT_CHARACTER, 1))
}

/// Decode the rune that ends at byte offset `end` of `b`.
pub(crate) fn decode_char_before(b: &[u8], end: usize) -> Option<(char, usize)> {
    if end == 0 {
        return None;
    }
    let floor = end.saturating_sub(4);
    for start in (floor..end).rev() {
        if let Ok(s) = std::str::from_utf8(&b[start..end]) {
            let mut chars = s.chars();
            if let Some(c) = chars.next() {
                if chars.next().is_none() {
                    return Some((c, end - start));
                }
            }
        }
    }
    Some((char::REPLACEMENT_CHARACTER, 1))
}

/// The width of the rune at `pos`, for stepping a scan forward. Positions
/// at or past the end report width one.
pub(crate) fn rune_width_at(b: &[u8], pos: usize) -> usize {
    if pos >= b.len() {
        return 1;
    }
    decode_char(&b[pos..]).map_or(1, |(_, width)| width)
}
