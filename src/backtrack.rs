//! The yielder engine: lazy enumeration of candidate consumed-spans with
//! classical backtracking.
//!
//! Every node can build a yielder over a cursor. A yielder enumerates all
//! distinct consumed lengths its node admits at that position, one per
//! resume, in the engine's preferred order: longest first, except that
//! reluctant repetition goes shortest first and alternation follows source
//! order. Exhaustion is terminal: once a yielder reports it, it keeps
//! reporting it.

use crate::api::{Context, Flags, FuncMap};
use crate::cursor::{decode_char_before, Cursor, Output, Span, SubMatch};
use crate::error::Error;
use crate::matchers::{self, CharMatcher};
use crate::node::Node;

/// Per-attempt shared state: the callout registry and the optional step
/// budget. One step is charged per resume dispatch.
pub(crate) struct Cx<'c> {
    pub(crate) funcs: &'c FuncMap,
    pub(crate) group_count: u32,
    pub(crate) steps: Option<u64>,
}

impl Cx<'_> {
    fn tick(&mut self) -> Result<(), Error> {
        if let Some(steps) = &mut self.steps {
            if *steps == 0 {
                return Err(Error::ResourceExhausted);
            }
            *steps -= 1;
        }
        Ok(())
    }
}

/// `Ok(Some(..))` is one candidate; `Ok(None)` is exhaustion.
pub(crate) type Resumed = Result<Option<Output>, Error>;

pub(crate) trait Yielder<'c> {
    fn resume(&mut self, cx: &mut Cx<'c>) -> Resumed;
}

/// Build the yielder for \p node over \p input.
pub(crate) fn yielder_for<'c>(node: &'c Node, input: Cursor<'c>) -> Box<dyn Yielder<'c> + 'c> {
    match node {
        Node::Group {
            children,
            atomic,
            index,
            name,
        } => Box::new(GroupYielder::new(
            input,
            children.iter().collect(),
            *atomic,
            *index,
            name.as_deref(),
        )),
        Node::Repeat {
            child,
            min,
            max,
            reluctant,
            atomic,
        } => Box::new(RepeatYielder::new(
            input, child, *min, *max, *reluctant, *atomic,
        )),
        Node::Alter { children } => Box::new(AlterYielder::new(input, children)),
        Node::Char {
            flags,
            matchers,
            reversed,
        } => Box::new(CharYielder {
            input,
            flags: *flags,
            matchers: matchers.as_slice(),
            reversed: *reversed,
            done: false,
        }),
        Node::Literal { flags, bytes } => Box::new(LiteralYielder {
            input,
            flags: *flags,
            bytes,
            done: false,
        }),
        Node::Begin { flags, line } => Box::new(BeginYielder {
            input,
            flags: *flags,
            line: *line,
            done: false,
        }),
        Node::End { flags, line } => Box::new(EndYielder {
            input,
            flags: *flags,
            line: *line,
            done: false,
        }),
        Node::WordBoundary { reversed } => Box::new(WordBoundaryYielder {
            input,
            reversed: *reversed,
            done: false,
        }),
        Node::BackRef { flags, index, name } => Box::new(BackRefYielder {
            input,
            flags: *flags,
            index: *index,
            name: name.as_deref(),
            done: false,
        }),
        Node::Lookaround {
            child,
            negative,
            behind,
        } => Box::new(LookaroundYielder {
            input,
            child,
            negative: *negative,
            behind: *behind,
            done: false,
        }),
        Node::Func { name } => Box::new(FuncYielder {
            input,
            name,
            done: false,
        }),
    }
}

/// Sequencing and capture. Owns one yielder and one cached output per
/// child and runs the forward-advance / backward-backtrack loop.
struct GroupYielder<'c> {
    input: Cursor<'c>,
    children: Vec<&'c Node>,
    atomic: bool,
    index: u32,
    name: Option<&'c str>,
    yielders: Vec<Option<Box<dyn Yielder<'c> + 'c>>>,
    outputs: Vec<Option<Output>>,
    fixed: bool,
}

impl<'c> GroupYielder<'c> {
    fn new(
        input: Cursor<'c>,
        children: Vec<&'c Node>,
        atomic: bool,
        index: u32,
        name: Option<&'c str>,
    ) -> GroupYielder<'c> {
        let n = children.len();
        GroupYielder {
            input,
            children,
            atomic,
            index,
            name,
            yielders: (0..n).map(|_| None).collect(),
            outputs: vec![None; n],
            fixed: false,
        }
    }
}

impl<'c> Yielder<'c> for GroupYielder<'c> {
    fn resume(&mut self, cx: &mut Cx<'c>) -> Resumed {
        cx.tick()?;
        if self.fixed {
            return Ok(None);
        }
        if self.children.is_empty() {
            self.fixed = true;
            return Ok(Some(Output {
                len: 0,
                sub: SubMatch::default(),
            }));
        }
        let last = self.children.len() - 1;
        'attempt: loop {
            let mut offset = 0usize;
            let mut sub = self.input.sub.clone();
            for i in 0..self.children.len() {
                if self.yielders[i].is_none() {
                    self.yielders[i] =
                        Some(yielder_for(self.children[i], self.input.substr(offset, sub.clone())));
                }
                if self.outputs[i].is_none() {
                    let resumed = match &mut self.yielders[i] {
                        Some(yielder) => yielder.resume(cx)?,
                        None => None,
                    };
                    match resumed {
                        None => {
                            if i == 0 {
                                // No first-child candidate left: the whole
                                // group is exhausted.
                                self.fixed = true;
                                return Ok(None);
                            }
                            // Backtrack: rebuild this child and ask the
                            // previous one for its next candidate.
                            self.yielders[i] = None;
                            self.outputs[i - 1] = None;
                            continue 'attempt;
                        }
                        Some(output) => {
                            if i == last {
                                let len = offset + output.len;
                                let mut out = sub.merged(&output.sub);
                                let span: Span =
                                    self.input.begin..self.input.begin + len;
                                if self.index > 0 {
                                    out.set_index(self.index, span.clone());
                                }
                                if let Some(name) = self.name {
                                    out.set_name(name, span);
                                }
                                if self.atomic {
                                    self.fixed = true;
                                }
                                return Ok(Some(Output { len, sub: out }));
                            }
                            self.outputs[i] = Some(output);
                        }
                    }
                }
                if let Some(output) = &self.outputs[i] {
                    offset += output.len;
                    sub.merge_from(&output.sub);
                }
            }
        }
    }
}

/// Repetition, expanded lazily into a group of k body copies with k
/// enumerated greedily (max down to min), reluctantly (min up to max), or
/// pinned to the first success when possessive.
struct RepeatYielder<'c> {
    input: Cursor<'c>,
    body: &'c Node,
    cnt: isize,
    end: isize,
    step: isize,
    atomic: bool,
    group: Option<GroupYielder<'c>>,
    fixed: bool,
}

impl<'c> RepeatYielder<'c> {
    fn new(
        input: Cursor<'c>,
        body: &'c Node,
        min: usize,
        max: Option<usize>,
        reluctant: bool,
        atomic: bool,
    ) -> RepeatYielder<'c> {
        // An unbounded max is clamped to the remaining input length.
        let max = max.unwrap_or_else(|| input.rest().len());
        let (cnt, end, step) = if max < min {
            (0, 0, 0)
        } else if reluctant {
            (min as isize, max as isize + 1, 1)
        } else {
            (max as isize, min as isize - 1, -1)
        };
        RepeatYielder {
            input,
            body,
            cnt,
            end,
            step,
            atomic,
            group: None,
            fixed: false,
        }
    }
}

impl<'c> Yielder<'c> for RepeatYielder<'c> {
    fn resume(&mut self, cx: &mut Cx<'c>) -> Resumed {
        cx.tick()?;
        if self.fixed {
            return Ok(None);
        }
        while self.cnt != self.end {
            if self.cnt == 0 {
                self.group = None;
                self.cnt += self.step;
                if self.atomic {
                    self.fixed = true;
                }
                return Ok(Some(Output {
                    len: 0,
                    sub: self.input.sub.clone(),
                }));
            }
            if self.group.is_none() {
                let children = vec![self.body; self.cnt as usize];
                self.group = Some(GroupYielder::new(
                    self.input.substr(0, self.input.sub.clone()),
                    children,
                    false,
                    0,
                    None,
                ));
            }
            let resumed = match &mut self.group {
                Some(group) => group.resume(cx)?,
                None => None,
            };
            match resumed {
                None => {
                    self.group = None;
                    self.cnt += self.step;
                }
                Some(output) => {
                    if self.atomic {
                        self.fixed = true;
                    }
                    return Ok(Some(output));
                }
            }
        }
        Ok(None)
    }
}

/// Alternation: branches are drained completely in source order. A null
/// branch is a single zero-width success.
struct AlterYielder<'c> {
    branches: Vec<Option<Box<dyn Yielder<'c> + 'c>>>,
    cnt: usize,
}

impl<'c> AlterYielder<'c> {
    fn new(input: Cursor<'c>, children: &'c [Option<Node>]) -> AlterYielder<'c> {
        let branches = children
            .iter()
            .map(|child| child.as_ref().map(|node| yielder_for(node, input.clone())))
            .collect();
        AlterYielder { branches, cnt: 0 }
    }
}

impl<'c> Yielder<'c> for AlterYielder<'c> {
    fn resume(&mut self, cx: &mut Cx<'c>) -> Resumed {
        cx.tick()?;
        while self.cnt < self.branches.len() {
            match &mut self.branches[self.cnt] {
                None => {
                    self.cnt += 1;
                    return Ok(Some(Output {
                        len: 0,
                        sub: SubMatch::default(),
                    }));
                }
                Some(branch) => match branch.resume(cx)? {
                    Some(output) => return Ok(Some(output)),
                    None => self.cnt += 1,
                },
            }
        }
        Ok(None)
    }
}

struct CharYielder<'c> {
    input: Cursor<'c>,
    flags: Flags,
    matchers: &'c [CharMatcher],
    reversed: bool,
    done: bool,
}

impl<'c> Yielder<'c> for CharYielder<'c> {
    fn resume(&mut self, cx: &mut Cx<'c>) -> Resumed {
        cx.tick()?;
        if self.done {
            return Ok(None);
        }
        self.done = true;
        if let Some((c, width)) = self.input.next_char() {
            let mut matched = self.matchers.iter().any(|m| m.matches(c, self.flags));
            if self.reversed {
                matched = !matched;
            }
            if matched {
                return Ok(Some(Output {
                    len: width,
                    sub: SubMatch::default(),
                }));
            }
        }
        Ok(None)
    }
}

struct LiteralYielder<'c> {
    input: Cursor<'c>,
    flags: Flags,
    bytes: &'c [u8],
    done: bool,
}

impl<'c> Yielder<'c> for LiteralYielder<'c> {
    fn resume(&mut self, cx: &mut Cx<'c>) -> Resumed {
        cx.tick()?;
        if self.done {
            return Ok(None);
        }
        self.done = true;
        match prefix_len(self.bytes, self.input.rest(), self.flags) {
            Some(len) => Ok(Some(Output {
                len,
                sub: SubMatch::default(),
            })),
            None => Ok(None),
        }
    }
}

/// \return the number of haystack bytes a needle prefix-match consumes,
/// honouring case folding.
fn prefix_len(needle: &[u8], haystack: &[u8], flags: Flags) -> Option<usize> {
    if flags.icase {
        matchers::fold_prefix(needle, haystack)
    } else if haystack.starts_with(needle) {
        Some(needle.len())
    } else {
        None
    }
}

struct BeginYielder<'c> {
    input: Cursor<'c>,
    flags: Flags,
    line: bool,
    done: bool,
}

impl<'c> Yielder<'c> for BeginYielder<'c> {
    fn resume(&mut self, cx: &mut Cx<'c>) -> Resumed {
        cx.tick()?;
        if self.done {
            return Ok(None);
        }
        self.done = true;
        let matched = self.input.begin == 0
            || (self.line
                && self.flags.multiline
                && self.input.whole[self.input.begin - 1] == b'\n');
        if matched {
            return Ok(Some(empty_output()));
        }
        Ok(None)
    }
}

struct EndYielder<'c> {
    input: Cursor<'c>,
    flags: Flags,
    line: bool,
    done: bool,
}

impl<'c> Yielder<'c> for EndYielder<'c> {
    fn resume(&mut self, cx: &mut Cx<'c>) -> Resumed {
        cx.tick()?;
        if self.done {
            return Ok(None);
        }
        self.done = true;
        let rest = self.input.rest();
        let matched =
            rest.is_empty() || (self.line && self.flags.multiline && rest[0] == b'\n');
        if matched {
            return Ok(Some(empty_output()));
        }
        Ok(None)
    }
}

struct WordBoundaryYielder<'c> {
    input: Cursor<'c>,
    reversed: bool,
    done: bool,
}

impl<'c> Yielder<'c> for WordBoundaryYielder<'c> {
    fn resume(&mut self, cx: &mut Cx<'c>) -> Resumed {
        cx.tick()?;
        if self.done {
            return Ok(None);
        }
        self.done = true;
        let prev = self.input.prev_char().is_some_and(matchers::is_word_char);
        let next = self
            .input
            .next_char()
            .is_some_and(|(c, _)| matchers::is_word_char(c));
        let mut matched = prev != next;
        if self.reversed {
            matched = !matched;
        }
        if matched {
            return Ok(Some(empty_output()));
        }
        Ok(None)
    }
}

/// A back reference reads the span recorded for its group. A group that
/// has not captured yet matches the empty string.
struct BackRefYielder<'c> {
    input: Cursor<'c>,
    flags: Flags,
    index: u32,
    name: Option<&'c str>,
    done: bool,
}

impl<'c> Yielder<'c> for BackRefYielder<'c> {
    fn resume(&mut self, cx: &mut Cx<'c>) -> Resumed {
        cx.tick()?;
        if self.done {
            return Ok(None);
        }
        self.done = true;
        let span = if self.index > 0 {
            self.input.sub.get_index(self.index)
        } else {
            self.name.and_then(|name| self.input.sub.get_name(name))
        };
        let needle: &[u8] = match span {
            Some(span) => &self.input.whole[span.clone()],
            None => &[],
        };
        match prefix_len(needle, self.input.rest(), self.flags) {
            Some(len) => Ok(Some(Output {
                len,
                sub: SubMatch::default(),
            })),
            None => Ok(None),
        }
    }
}

/// Zero-width lookaround. The inner yielder's captures are discarded.
///
/// A lookbehind is checked by forward-matching the inner node at every
/// candidate anchor within the inner node's maximum-width window and
/// accepting a candidate that consumes exactly up to the cursor.
struct LookaroundYielder<'c> {
    input: Cursor<'c>,
    child: &'c Node,
    negative: bool,
    behind: bool,
    done: bool,
}

impl<'c> LookaroundYielder<'c> {
    fn matches_behind(&self, cx: &mut Cx<'c>) -> Result<bool, Error> {
        let begin = self.input.begin;
        let floor = match self.child.max_width() {
            Some(width) => begin.saturating_sub(width),
            None => 0,
        };
        let mut anchor = begin;
        loop {
            let want = begin - anchor;
            let cursor = Cursor::new(self.input.whole, anchor, self.input.sub.clone());
            let mut yielder = yielder_for(self.child, cursor);
            while let Some(output) = yielder.resume(cx)? {
                if output.len == want {
                    return Ok(true);
                }
            }
            if anchor == 0 || anchor <= floor {
                break;
            }
            match decode_char_before(self.input.whole, anchor) {
                Some((_, width)) => anchor -= width.max(1),
                None => break,
            }
        }
        Ok(false)
    }
}

impl<'c> Yielder<'c> for LookaroundYielder<'c> {
    fn resume(&mut self, cx: &mut Cx<'c>) -> Resumed {
        cx.tick()?;
        if self.done {
            return Ok(None);
        }
        self.done = true;
        let matched = if self.behind {
            self.matches_behind(cx)?
        } else {
            yielder_for(self.child, self.input.clone())
                .resume(cx)?
                .is_some()
        };
        if matched != self.negative {
            return Ok(Some(empty_output()));
        }
        Ok(None)
    }
}

/// A callout consults a registered host function for how many bytes to
/// consume at the cursor.
struct FuncYielder<'c> {
    input: Cursor<'c>,
    name: &'c str,
    done: bool,
}

impl<'c> Yielder<'c> for FuncYielder<'c> {
    fn resume(&mut self, cx: &mut Cx<'c>) -> Resumed {
        cx.tick()?;
        if self.done {
            return Ok(None);
        }
        self.done = true;
        let Some(func) = cx.funcs.get(self.name) else {
            return Err(Error::Callout(format!(
                "no callout registered for {:?}",
                self.name
            )));
        };
        let mut matches: Vec<Option<Span>> = vec![None; cx.group_count as usize + 1];
        for i in 1..=cx.group_count {
            if let Some(span) = self.input.sub.get_index(i) {
                matches[i as usize] = Some(span.clone());
            }
        }
        let ctx = Context {
            data: self.input.whole,
            cursor: self.input.begin,
            matches,
        };
        let ret = func(&ctx);
        if ret < 0 {
            return Ok(None);
        }
        let len = ret as usize;
        if len > self.input.rest().len() {
            return Err(Error::Callout(format!(
                "callout {:?} consumed past the end of input",
                self.name
            )));
        }
        Ok(Some(Output {
            len,
            sub: SubMatch::default(),
        }))
    }
}

fn empty_output() -> Output {
    Output {
        len: 0,
        sub: SubMatch::default(),
    }
}
