//! The compiled node tree.

use crate::api::Flags;
use crate::matchers::CharMatcher;
use smallvec::SmallVec;
use std::fmt;

/// A parsed pattern element. Nodes are created by the parser and immutable
/// afterwards, so a compiled tree may be shared freely between match
/// attempts.
#[derive(Debug, Clone)]
pub(crate) enum Node {
    /// A sequence of children, optionally capturing (positive `index`, or a
    /// name) and optionally atomic: once an atomic group has yielded a
    /// match it refuses to yield another.
    Group {
        children: Vec<Node>,
        atomic: bool,
        index: u32,
        name: Option<Box<str>>,
    },
    /// A repetition of a single body. `max == None` means unbounded.
    Repeat {
        child: Box<Node>,
        min: usize,
        max: Option<usize>,
        reluctant: bool,
        atomic: bool,
    },
    /// An alternation. A `None` slot is an empty branch matching the empty
    /// string.
    Alter { children: Vec<Option<Node>> },
    /// One rune matched against a union of predicates.
    Char {
        flags: Flags,
        matchers: SmallVec<[CharMatcher; 2]>,
        reversed: bool,
    },
    /// A literal byte sequence, case-folded under the 'i' flag.
    Literal { flags: Flags, bytes: Vec<u8> },
    /// Zero-width start assertion: `^` when `line`, else `\A`.
    Begin { flags: Flags, line: bool },
    /// Zero-width end assertion: `$` when `line`, else `\z`.
    End { flags: Flags, line: bool },
    /// Zero-width \b, or \B when reversed.
    WordBoundary { reversed: bool },
    /// A back reference by index or name.
    BackRef {
        flags: Flags,
        index: u32,
        name: Option<Box<str>>,
    },
    /// A zero-width lookahead or lookbehind assertion.
    Lookaround {
        child: Box<Node>,
        negative: bool,
        behind: bool,
    },
    /// A named callout dispatching to a registered host function.
    Func { name: Box<str> },
}

impl Node {
    /// \return whether this subtree uses a construct beyond the
    /// conventional engine's grammar.
    pub(crate) fn is_extended(&self) -> bool {
        match self {
            Node::Group {
                children, atomic, ..
            } => *atomic || children.iter().any(Node::is_extended),
            Node::Repeat { child, atomic, .. } => *atomic || child.is_extended(),
            Node::Alter { children } => children.iter().flatten().any(Node::is_extended),
            Node::BackRef { .. } | Node::Lookaround { .. } | Node::Func { .. } => true,
            _ => false,
        }
    }

    /// A static upper bound, in bytes, on what this subtree can consume.
    /// None means the width cannot be bounded. Used to limit the anchor
    /// window of lookbehind assertions.
    pub(crate) fn max_width(&self) -> Option<usize> {
        match self {
            Node::Group { children, .. } => children
                .iter()
                .try_fold(0usize, |acc, c| Some(acc.saturating_add(c.max_width()?))),
            Node::Repeat { child, max, .. } => {
                let width = child.max_width()?;
                match max {
                    Some(max) => Some(width.saturating_mul(*max)),
                    None if width == 0 => Some(0),
                    None => None,
                }
            }
            Node::Alter { children } => children.iter().try_fold(0usize, |acc, c| {
                let width = c.as_ref().map_or(Some(0), Node::max_width)?;
                Some(acc.max(width))
            }),
            Node::Char { .. } => Some(4),
            Node::Literal { flags, bytes } => {
                if flags.icase {
                    // Folding may widen each rune to at most four bytes.
                    Some(bytes.len().saturating_mul(4))
                } else {
                    Some(bytes.len())
                }
            }
            Node::Begin { .. }
            | Node::End { .. }
            | Node::WordBoundary { .. }
            | Node::Lookaround { .. } => Some(0),
            Node::BackRef { .. } | Node::Func { .. } => None,
        }
    }
}

/// The total number of body copies bounded repetition can expand to.
/// Unbounded repetition is clamped to the input length at match time and
/// counts its body once.
pub(crate) fn expansion_weight(node: &Node) -> u64 {
    match node {
        Node::Group { children, .. } => children
            .iter()
            .fold(1u64, |acc, c| acc.saturating_add(expansion_weight(c))),
        Node::Repeat { child, max, .. } => {
            let weight = expansion_weight(child);
            match max {
                Some(max) => weight.saturating_mul((*max).max(1) as u64),
                None => weight,
            }
        }
        Node::Alter { children } => children
            .iter()
            .flatten()
            .fold(1u64, |acc, c| acc.saturating_add(expansion_weight(c))),
        Node::Lookaround { child, .. } => expansion_weight(child).saturating_add(1),
        _ => 1,
    }
}

/// Renders a node tree one line per node, children indented.
pub(crate) struct TreeDump<'a>(pub(crate) &'a Node);

impl fmt::Display for TreeDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        display_node(self.0, 0, f)
    }
}

fn display_node(node: &Node, depth: usize, f: &mut fmt::Formatter) -> fmt::Result {
    for _ in 0..depth {
        write!(f, "..")?;
    }
    match node {
        Node::Group {
            children,
            atomic,
            index,
            name,
        } => {
            writeln!(f, "Group index={} atomic={} name={:?}", index, atomic, name)?;
            for child in children {
                display_node(child, depth + 1, f)?;
            }
        }
        Node::Repeat {
            child,
            min,
            max,
            reluctant,
            atomic,
        } => {
            writeln!(
                f,
                "Repeat min={} max={:?} reluctant={} atomic={}",
                min, max, reluctant, atomic
            )?;
            display_node(child, depth + 1, f)?;
        }
        Node::Alter { children } => {
            writeln!(f, "Alter")?;
            for child in children {
                match child {
                    Some(child) => display_node(child, depth + 1, f)?,
                    None => {
                        for _ in 0..depth + 1 {
                            write!(f, "..")?;
                        }
                        writeln!(f, "EmptyBranch")?;
                    }
                }
            }
        }
        Node::Char {
            flags,
            matchers,
            reversed,
        } => {
            writeln!(
                f,
                "Char reversed={} flags={} {:?}",
                reversed, flags, matchers
            )?;
        }
        Node::Literal { flags, bytes } => {
            writeln!(f, "Literal flags={} {:?}", flags, bytes)?;
        }
        &Node::Begin { flags, line } => {
            writeln!(f, "Begin line={} flags={}", line, flags)?;
        }
        &Node::End { flags, line } => {
            writeln!(f, "End line={} flags={}", line, flags)?;
        }
        &Node::WordBoundary { reversed } => {
            writeln!(f, "WordBoundary reversed={}", reversed)?;
        }
        Node::BackRef { index, name, .. } => {
            writeln!(f, "BackRef index={} name={:?}", index, name)?;
        }
        Node::Lookaround {
            child,
            negative,
            behind,
        } => {
            writeln!(f, "Lookaround negative={} behind={}", negative, behind)?;
            display_node(child, depth + 1, f)?;
        }
        Node::Func { name } => {
            writeln!(f, "Func {:?}", name)?;
        }
    }
    Ok(())
}
