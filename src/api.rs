//! Public API: compilation entry points and the match-time surface.

use crate::delegate;
use crate::exec;
use crate::node::{Node, TreeDump};
use crate::parse;
use crate::startpredicate::{self, StartPredicate};
use crate::template;

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::Arc;

pub use crate::error::Error;

/// Flags used to control parsing. The default flags are case-sensitive,
/// not-multiline, dot-excludes-newline, greedy.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    /// If set, make the pattern case-insensitive. The 'i' flag letter.
    pub icase: bool,

    /// If set, `.` also matches a line terminator. The 's' flag letter.
    pub dot_all: bool,

    /// If set, `^` and `$` match at line separators, not just the input
    /// boundaries. The 'm' flag letter.
    pub multiline: bool,

    /// If set, quantifiers are reluctant by default and `?` makes them
    /// greedy. The 'U' flag letter.
    pub ungreedy: bool,
}

impl Flags {
    /// Construct a Flags from an iterator of flag letters. Unknown
    /// letters are silently skipped.
    pub fn new<T: Iterator<Item = char>>(chars: T) -> Self {
        let mut result = Self::default();
        for c in chars {
            match c {
                'i' => result.icase = true,
                's' => result.dot_all = true,
                'm' => result.multiline = true,
                'U' => result.ungreedy = true,
                _ => {}
            }
        }
        result
    }
}

impl From<&str> for Flags {
    fn from(s: &str) -> Self {
        Self::new(s.chars())
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.icase {
            f.write_str("i")?;
        }
        if self.dot_all {
            f.write_str("s")?;
        }
        if self.multiline {
            f.write_str("m")?;
        }
        if self.ungreedy {
            f.write_str("U")?;
        }
        Ok(())
    }
}

/// What a callout sees when it fires: the whole haystack, the byte offset
/// the match has reached, and the capture spans recorded so far. Index 0
/// is reserved for the whole match and is not populated mid-attempt.
#[derive(Debug, Clone)]
pub struct Context<'t> {
    pub data: &'t [u8],
    pub cursor: usize,
    pub matches: Vec<Option<Range<usize>>>,
}

/// A registered callout. It returns the number of bytes consumed at the
/// cursor, or a negative value for no match.
pub type CalloutFn = Arc<dyn Fn(&Context) -> isize + Send + Sync>;

/// Callouts keyed by the name written in `(?{name})`.
pub type FuncMap = HashMap<String, CalloutFn>;

/// A compiled pattern.
///
/// Compilation is comparatively expensive; prefer to cache a Pattern that
/// is used more than once. A compiled Pattern is immutable during
/// matching, cheap to clone, and safe to share across threads: each match
/// attempt allocates its own transient state.
#[derive(Clone)]
pub struct Pattern {
    pub(crate) root: Node,
    pub(crate) group_count: u32,
    /// Capture names by index; index 0 is the whole match and is empty.
    pub(crate) group_names: Vec<Box<str>>,
    pub(crate) is_extended: bool,
    pub(crate) source: Box<str>,
    pub(crate) start: StartPredicate,
    pub(crate) anchored: bool,
    pub(crate) longest: bool,
    pub(crate) step_limit: Option<u64>,
    pub(crate) funcs: FuncMap,
    pub(crate) delegate: Option<regex::bytes::Regex>,
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", TreeDump(&self.root))
    }
}

/// Compile a pattern with default flags.
pub fn compile(pattern: &str) -> Result<Pattern, Error> {
    compile_with(pattern, Flags::default())
}

/// Compile a pattern with a starting flag set.
pub fn compile_with(pattern: &str, flags: Flags) -> Result<Pattern, Error> {
    Pattern::build(pattern, flags)
}

/// Compile in free-spacing mode: unescaped whitespace is dropped and `#`
/// starts an end-of-line comment except inside a character class.
pub fn compile_free_spacing(pattern: &str) -> Result<Pattern, Error> {
    Pattern::build(&parse::strip_free_spacing(pattern), Flags::default())
}

/// Compile a pattern, panicking on error. For patterns known valid at
/// build time.
pub fn must_compile(pattern: &str) -> Pattern {
    match compile(pattern) {
        Ok(pattern) => pattern,
        Err(err) => panic!("compile({:?}): {}", pattern, err),
    }
}

/// Compile in free-spacing mode, panicking on error.
pub fn must_compile_free_spacing(pattern: &str) -> Pattern {
    match compile_free_spacing(pattern) {
        Ok(pattern) => pattern,
        Err(err) => panic!("compile_free_spacing({:?}): {}", pattern, err),
    }
}

impl Pattern {
    /// Equivalent to [`compile`].
    pub fn new(pattern: &str) -> Result<Pattern, Error> {
        compile(pattern)
    }

    fn build(pattern: &str, flags: Flags) -> Result<Pattern, Error> {
        let parsed = parse::try_parse(pattern, flags)?;
        let is_extended = parsed.root.is_extended();
        let delegate = if is_extended {
            None
        } else {
            // Re-spell the tree in conventional syntax and hand matching
            // to the standard engine when it can express the pattern.
            delegate::delegate_pattern(&parsed.root)
                .and_then(|p| regex::bytes::Regex::new(&p).ok())
                .filter(|d| d.captures_len() == parsed.group_count as usize + 1)
        };
        let start = startpredicate::start_predicate(&parsed.root);
        let anchored = startpredicate::start_anchored(&parsed.root);
        let mut group_names = Vec::with_capacity(parsed.group_names.len() + 1);
        group_names.push(Box::<str>::from(""));
        group_names.extend(parsed.group_names);
        Ok(Pattern {
            root: parsed.root,
            group_count: parsed.group_count,
            group_names,
            is_extended,
            source: pattern.into(),
            start,
            anchored,
            longest: false,
            step_limit: None,
            funcs: FuncMap::new(),
            delegate,
        })
    }

    /// The pattern source this Pattern was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// \return the number of capture groups.
    pub fn num_subexp(&self) -> usize {
        self.group_count as usize
    }

    /// \return the capture group names in index order. Index 0
    /// corresponds to the whole match; unnamed groups yield the empty
    /// string.
    pub fn subexp_names(&self) -> Vec<&str> {
        self.group_names.iter().map(|name| name.as_ref()).collect()
    }

    /// \return whether the pattern uses any construct beyond the
    /// conventional grammar: backreferences, lookaround, callouts, or
    /// atomic/possessive constructs.
    pub fn is_extended(&self) -> bool {
        self.is_extended
    }

    /// Switch match semantics to leftmost-longest.
    pub fn longest(&mut self) {
        self.longest = true;
    }

    /// Attach a step budget. A match attempt that dispatches more steps
    /// aborts with [`Error::ResourceExhausted`], surfaced by the `try_`
    /// entry points and mapped to no-match by the plain ones.
    pub fn step_limit(&mut self, limit: u64) {
        self.step_limit = Some(limit);
    }

    /// Register callout functions for `(?{name})` groups, replacing any
    /// previous registration.
    pub fn funcs(&mut self, funcs: FuncMap) {
        self.funcs = funcs;
    }

    /// Force the native engine even for non-extended patterns. Mostly
    /// useful for cross-checking the two execution paths.
    pub fn no_delegate(&mut self) {
        self.delegate = None;
    }

    /// \return whether the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &[u8]) -> bool {
        self.find_submatch_index(text, 0).is_some()
    }

    /// Find the leftmost match at or after byte offset `start`. Note that
    /// matching considers the surrounding context: a lookbehind may
    /// examine text before `start`.
    ///
    /// \return flat pairs of byte offsets `[b0, e0, b1, e1, ..]`, one
    /// pair per group with pair 0 the whole match, and `-1` pairs for
    /// groups that did not participate.
    pub fn find_submatch_index(&self, text: &[u8], start: usize) -> Option<Vec<isize>> {
        self.try_find_submatch_index(text, start).ok().flatten()
    }

    /// Like [`Pattern::find_submatch_index`], but surfaces runtime errors
    /// (an exhausted step budget, callout failures) instead of mapping
    /// them to no-match.
    pub fn try_find_submatch_index(
        &self,
        text: &[u8],
        start: usize,
    ) -> Result<Option<Vec<isize>>, Error> {
        if !self.longest {
            if let Some(delegate) = &self.delegate {
                return Ok(self.delegate_find(delegate, text, start));
            }
        }
        exec::find_at(self, text, start)
    }

    fn delegate_find(
        &self,
        delegate: &regex::bytes::Regex,
        text: &[u8],
        start: usize,
    ) -> Option<Vec<isize>> {
        if start > text.len() {
            return None;
        }
        let caps = delegate.captures_at(text, start)?;
        let mut m = Vec::with_capacity((self.group_count as usize + 1) * 2);
        for i in 0..=self.group_count as usize {
            match caps.get(i) {
                Some(group) => {
                    m.push(group.start() as isize);
                    m.push(group.end() as isize);
                }
                None => {
                    m.push(-1);
                    m.push(-1);
                }
            }
        }
        Some(m)
    }

    /// Successive non-overlapping matches, at most `limit` when `limit`
    /// is non-negative. An empty match at the end of the previous match
    /// is discarded, and empty matches advance the scan by one rune.
    pub fn find_all_submatch_index(&self, text: &[u8], limit: isize) -> Vec<Vec<isize>> {
        let mut out = Vec::new();
        let mut pos = 0usize;
        let mut prev_end: isize = -1;
        while (limit < 0 || (out.len() as isize) < limit) && pos <= text.len() {
            let Some(m) = self.find_submatch_index(text, pos) else {
                break;
            };
            let (start, end) = (m[0] as usize, m[1] as usize);
            let mut accept = true;
            if start == end {
                if start as isize == prev_end {
                    accept = false;
                }
                pos = start + crate::cursor::rune_width_at(text, start);
            } else {
                pos = end;
            }
            prev_end = end as isize;
            if accept {
                out.push(m);
            }
        }
        out
    }

    /// Split `text` around matches of the pattern. A non-negative `n`
    /// caps the number of pieces.
    pub fn split<'t>(&self, text: &'t [u8], n: isize) -> Vec<&'t [u8]> {
        if n == 0 {
            return Vec::new();
        }
        if !self.source.is_empty() && text.is_empty() {
            return vec![&text[..0]];
        }
        let matches = self.find_all_submatch_index(text, n);
        let mut out = Vec::with_capacity(matches.len());
        let mut beg = 0usize;
        let mut end = 0usize;
        for m in &matches {
            if n > 0 && out.len() as isize >= n - 1 {
                break;
            }
            end = m[0] as usize;
            if m[1] != 0 {
                out.push(&text[beg..end]);
                beg = m[1] as usize;
            }
        }
        if end != text.len() {
            out.push(&text[beg..]);
        }
        out
    }

    /// Replace every match with the expansion of `template`.
    pub fn replace_all(&self, text: &[u8], template: &[u8]) -> Vec<u8> {
        self.replace(text, |dst, m| {
            template::expand(dst, template, text, m, &self.group_names)
        })
    }

    /// Replace every match with `replacement` as-is, without template
    /// expansion.
    pub fn replace_all_literal(&self, text: &[u8], replacement: &[u8]) -> Vec<u8> {
        self.replace(text, |dst, _| dst.extend_from_slice(replacement))
    }

    fn replace(&self, text: &[u8], mut rep: impl FnMut(&mut Vec<u8>, &[isize])) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len());
        let mut last = 0usize;
        for m in self.find_all_submatch_index(text, -1) {
            out.extend_from_slice(&text[last..m[0] as usize]);
            rep(&mut out, &m);
            last = m[1] as usize;
        }
        out.extend_from_slice(&text[last..]);
        out
    }

    /// Append the expansion of `template` to `dst` and return it, using
    /// the submatch indices `m` of a match against `src`.
    pub fn expand(&self, mut dst: Vec<u8>, template: &[u8], src: &[u8], m: &[isize]) -> Vec<u8> {
        template::expand(&mut dst, template, src, m, &self.group_names);
        dst
    }
}

impl FromStr for Pattern {
    type Err = Error;

    /// Attempts to parse a string into a compiled pattern.
    fn from_str(s: &str) -> Result<Self, Error> {
        compile(s)
    }
}
