//! First-byte predicates used to skip the scan loop ahead to plausible
//! match starts.

use crate::matchers::CharMatcher;
use crate::node::Node;
use memchr::{memchr, memchr2, memchr3};

/// A conservative requirement on the first byte of any match.
#[derive(Debug, Clone)]
pub(crate) enum StartPredicate {
    /// No useful predicate; every position must be tried.
    Arbitrary,
    Byte(u8),
    ByteSet2([u8; 2]),
    ByteSet3([u8; 3]),
}

impl StartPredicate {
    /// \return the next offset at or after `pos` worth attempting, or None
    /// when the rest of the input cannot contain a match start.
    pub(crate) fn find(&self, text: &[u8], pos: usize) -> Option<usize> {
        if pos > text.len() {
            return None;
        }
        let rest = &text[pos..];
        match self {
            StartPredicate::Arbitrary => Some(pos),
            StartPredicate::Byte(b) => memchr(*b, rest).map(|i| pos + i),
            StartPredicate::ByteSet2([a, b]) => memchr2(*a, *b, rest).map(|i| pos + i),
            StartPredicate::ByteSet3([a, b, c]) => memchr3(*a, *b, *c, rest).map(|i| pos + i),
        }
    }
}

/// Compute the start predicate for a compiled tree.
pub(crate) fn start_predicate(root: &Node) -> StartPredicate {
    let Some(mut bytes) = first_bytes(root) else {
        return StartPredicate::Arbitrary;
    };
    bytes.sort_unstable();
    bytes.dedup();
    match bytes.as_slice() {
        &[a] => StartPredicate::Byte(a),
        &[a, b] => StartPredicate::ByteSet2([a, b]),
        &[a, b, c] => StartPredicate::ByteSet3([a, b, c]),
        _ => StartPredicate::Arbitrary,
    }
}

/// \return whether every match of the tree must begin at offset zero.
pub(crate) fn start_anchored(node: &Node) -> bool {
    match node {
        Node::Begin { flags, line } => !(*line && flags.multiline),
        Node::Group { children, .. } => children.first().is_some_and(start_anchored),
        Node::Repeat { child, min, .. } => *min >= 1 && start_anchored(child),
        Node::Alter { children } => children
            .iter()
            .all(|child| child.as_ref().is_some_and(start_anchored)),
        _ => false,
    }
}

/// The set of bytes a match of this node can start with, or None when the
/// set cannot be usefully bounded. Only nodes that cannot match the empty
/// string produce a bound, so a sequence may consult its first consuming
/// child after skipping pure assertions.
fn first_bytes(node: &Node) -> Option<Vec<u8>> {
    match node {
        Node::Literal { flags, bytes } => first_bytes_of_literal(flags.icase, bytes),
        Node::Char {
            flags,
            matchers,
            reversed,
        } if !reversed => {
            let mut out = Vec::new();
            for matcher in matchers.iter() {
                let &CharMatcher::Lit(c) = matcher else {
                    return None;
                };
                let mut buf = [0u8; 4];
                let encoded = c.encode_utf8(&mut buf).as_bytes();
                if flags.icase {
                    if c.is_ascii_alphabetic() {
                        out.push(c.to_ascii_lowercase() as u8);
                        out.push(c.to_ascii_uppercase() as u8);
                        continue;
                    }
                    if !c.is_ascii() {
                        // Folding may change the leading byte.
                        return None;
                    }
                }
                out.push(encoded[0]);
            }
            Some(out)
        }
        Node::Group { children, .. } => first_bytes_of_seq(children),
        Node::Repeat { child, min, .. } if *min >= 1 => first_bytes(child),
        Node::Alter { children } => {
            let mut out = Vec::new();
            for child in children {
                out.extend(first_bytes(child.as_ref()?)?);
            }
            Some(out)
        }
        _ => None,
    }
}

fn first_bytes_of_literal(icase: bool, bytes: &[u8]) -> Option<Vec<u8>> {
    let &b = bytes.first()?;
    if icase {
        if b.is_ascii_alphabetic() {
            return Some(vec![b.to_ascii_lowercase(), b.to_ascii_uppercase()]);
        }
        if !b.is_ascii() {
            return None;
        }
    }
    Some(vec![b])
}

fn first_bytes_of_seq(children: &[Node]) -> Option<Vec<u8>> {
    for child in children {
        match child {
            Node::Begin { .. }
            | Node::End { .. }
            | Node::WordBoundary { .. }
            | Node::Lookaround { .. } => continue,
            other => return first_bytes(other),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{start_anchored, start_predicate, StartPredicate};
    use crate::api::Flags;
    use crate::parse;

    fn predicate(pattern: &str) -> StartPredicate {
        let parsed = parse::try_parse(pattern, Flags::default()).expect("should parse");
        start_predicate(&parsed.root)
    }

    fn anchored(pattern: &str) -> bool {
        let parsed = parse::try_parse(pattern, Flags::default()).expect("should parse");
        start_anchored(&parsed.root)
    }

    #[test]
    fn predicates() {
        assert!(matches!(predicate("abc"), StartPredicate::Byte(b'a')));
        assert!(matches!(predicate("^abc"), StartPredicate::Byte(b'a')));
        assert!(matches!(predicate("a+b"), StartPredicate::Byte(b'a')));
        assert!(matches!(predicate("cat|dog"), StartPredicate::ByteSet2(_)));
        assert!(matches!(predicate("(?i)x"), StartPredicate::ByteSet2(_)));
        assert!(matches!(predicate("a*b"), StartPredicate::Arbitrary));
        assert!(matches!(predicate("[ab]x"), StartPredicate::ByteSet2(_)));
        assert!(matches!(predicate(".x"), StartPredicate::Arbitrary));
    }

    #[test]
    fn anchors() {
        assert!(anchored("^abc"));
        assert!(anchored(r"\Aabc"));
        assert!(anchored("^a|^b"));
        assert!(!anchored("abc"));
        assert!(!anchored("(?m)^abc"));
        assert!(!anchored("a|^b"));
    }
}
