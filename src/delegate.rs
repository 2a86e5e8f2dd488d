//! Emission of a non-extended node tree back to conventional syntax so
//! the regex crate can execute it.
//!
//! Every atom carries its own inline flag group, so the emitted pattern
//! needs no outer flags. Perl classes and word boundaries are spelled in
//! their ASCII form to keep the delegate's semantics aligned with the
//! native engine. Returns None for trees with no conventional spelling;
//! the caller then keeps the native engine.

use crate::api::Flags;
use crate::charclasses::Interval;
use crate::matchers::CharMatcher;
use crate::node::Node;
use std::fmt::Write;

/// Render the tree as a pattern for the regex crate.
pub(crate) fn delegate_pattern(root: &Node) -> Option<String> {
    let mut out = String::new();
    emit(root, &mut out)?;
    Some(out)
}

fn emit(node: &Node, out: &mut String) -> Option<()> {
    match node {
        Node::Group {
            children,
            atomic,
            index,
            name,
        } => {
            if *atomic {
                return None;
            }
            match (index, name) {
                (0, _) => out.push_str("(?:"),
                (_, Some(name)) => {
                    let _ = write!(out, "(?P<{}>", name);
                }
                (_, None) => out.push('('),
            }
            for child in children {
                emit(child, out)?;
            }
            out.push(')');
        }
        Node::Repeat {
            child,
            min,
            max,
            reluctant,
            atomic,
        } => {
            if *atomic {
                return None;
            }
            out.push_str("(?:");
            emit(child, out)?;
            out.push(')');
            match (*min, *max) {
                (0, None) => out.push('*'),
                (1, None) => out.push('+'),
                (0, Some(1)) => out.push('?'),
                (min, None) => {
                    let _ = write!(out, "{{{},}}", min);
                }
                (min, Some(max)) if min == max => {
                    let _ = write!(out, "{{{}}}", min);
                }
                (min, Some(max)) => {
                    let _ = write!(out, "{{{},{}}}", min, max);
                }
            }
            if *reluctant {
                out.push('?');
            }
        }
        Node::Alter { children } => {
            out.push_str("(?:");
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    out.push('|');
                }
                if let Some(child) = child {
                    emit(child, out)?;
                }
            }
            out.push(')');
        }
        Node::Char {
            flags,
            matchers,
            reversed,
        } => emit_char(*flags, matchers, *reversed, out)?,
        Node::Literal { flags, bytes } => {
            let text = std::str::from_utf8(bytes).ok()?;
            out.push_str(if flags.icase { "(?i:" } else { "(?-i:" });
            for c in text.chars() {
                push_escaped(c, out);
            }
            out.push(')');
        }
        &Node::Begin { flags, line } => {
            if line {
                out.push_str(if flags.multiline { "(?m:^)" } else { "(?-m:^)" });
            } else {
                out.push_str(r"\A");
            }
        }
        &Node::End { flags, line } => {
            if line {
                out.push_str(if flags.multiline { "(?m:$)" } else { "(?-m:$)" });
            } else {
                out.push_str(r"\z");
            }
        }
        &Node::WordBoundary { reversed } => {
            out.push_str(if reversed { r"(?-u:\B)" } else { r"(?-u:\b)" });
        }
        Node::BackRef { .. } | Node::Lookaround { .. } | Node::Func { .. } => return None,
    }
    Some(())
}

fn emit_char(flags: Flags, matchers: &[CharMatcher], reversed: bool, out: &mut String) -> Option<()> {
    // `.` is the one spelling that isn't a bracket expression.
    if let [CharMatcher::Any] = matchers {
        if reversed {
            return None;
        }
        out.push_str(if flags.dot_all { "(?s:.)" } else { "(?-s:.)" });
        return Some(());
    }
    // A class whose single member is negated flips the bracket instead.
    if let [CharMatcher::Negated(inner)] = matchers {
        out.push_str(if flags.icase { "(?i:[" } else { "(?-i:[" });
        if !reversed {
            out.push('^');
        }
        emit_matcher(inner, out)?;
        out.push_str("])");
        return Some(());
    }
    out.push_str(if flags.icase { "(?i:[" } else { "(?-i:[" });
    if reversed {
        out.push('^');
    }
    for matcher in matchers {
        emit_matcher(matcher, out)?;
    }
    out.push_str("])");
    Some(())
}

fn emit_matcher(matcher: &CharMatcher, out: &mut String) -> Option<()> {
    match matcher {
        CharMatcher::Lit(c) => push_class_escaped(*c, out),
        CharMatcher::Range(lo, hi) => {
            push_class_escaped(*lo, out);
            out.push('-');
            push_class_escaped(*hi, out);
        }
        CharMatcher::Class(ivs) => {
            for iv in ivs.iter() {
                push_interval(*iv, out);
            }
        }
        CharMatcher::Property(prop) => {
            let _ = write!(out, r"\p{{{}}}", prop.name());
        }
        // A negated member mixed into a larger union has no conventional
        // spelling.
        CharMatcher::Negated(_) | CharMatcher::Any => return None,
    }
    Some(())
}

fn push_interval(iv: Interval, out: &mut String) {
    if iv.first == iv.last {
        let _ = write!(out, r"\x{{{:x}}}", iv.first);
    } else {
        let _ = write!(out, r"\x{{{:x}}}-\x{{{:x}}}", iv.first, iv.last);
    }
}

fn push_escaped(c: char, out: &mut String) {
    if matches!(
        c,
        '\\' | '^' | '$' | '.' | '|' | '?' | '*' | '+' | '(' | ')' | '[' | ']' | '{' | '}'
    ) {
        out.push('\\');
        out.push(c);
    } else if c.is_control() {
        let _ = write!(out, r"\x{{{:x}}}", c as u32);
    } else {
        out.push(c);
    }
}

fn push_class_escaped(c: char, out: &mut String) {
    if matches!(c, '\\' | '^' | ']' | '-' | '[' | '&' | '~') {
        out.push('\\');
        out.push(c);
    } else if c.is_control() {
        let _ = write!(out, r"\x{{{:x}}}", c as u32);
    } else {
        out.push(c);
    }
}
