//! Parser from pattern source to the node tree.

use crate::api::Flags;
use crate::charclasses;
use crate::error::{syntax, Error};
use crate::matchers::CharMatcher;
use crate::node::{expansion_weight, Node};
use crate::unicode::PropertyClass;
use smallvec::{smallvec, SmallVec};
use std::iter::Peekable;
use std::str::Chars;

/// The maximum number of capture groups supported.
pub(crate) const MAX_CAPTURE_GROUPS: usize = 65_535;

/// The maximum number of body copies bounded repetition may expand to.
pub(crate) const MAX_REPEAT_EXPANSION: u64 = 1000;

/// Everything the compiler learns about a pattern.
#[derive(Debug)]
pub(crate) struct Parsed {
    pub(crate) root: Node,
    pub(crate) group_count: u32,
    /// One entry per capture group, empty when the group is unnamed.
    pub(crate) group_names: Vec<Box<str>>,
}

/// Parse a pattern with the given starting flags.
pub(crate) fn try_parse(pattern: &str, flags: Flags) -> Result<Parsed, Error> {
    let mut parser = Parser {
        input: pattern.chars().peekable(),
        flags,
        group_count: 0,
        group_names: Vec::new(),
        max_backref: 0,
        named_backrefs: Vec::new(),
    };
    parser.try_parse()
}

/// Strip free-spacing whitespace and #-comments. Escapes and character
/// classes are left intact; the result parses with the default entry
/// point.
pub(crate) fn strip_free_spacing(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    let mut in_class = false;
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push('\\');
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '[' if !in_class => {
                in_class = true;
                out.push(c);
            }
            ']' if in_class => {
                in_class = false;
                out.push(c);
            }
            '#' if !in_class => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        break;
                    }
                }
            }
            c if !in_class && c.is_whitespace() => {}
            c => out.push(c),
        }
    }
    out
}

#[derive(Debug, Copy, Clone)]
struct Quantifier {
    min: usize,
    max: Option<usize>,
    reluctant: bool,
    atomic: bool,
}

fn is_empty_group(node: &Node) -> bool {
    matches!(
        node,
        Node::Group {
            children,
            atomic: false,
            index: 0,
            name: None,
        } if children.is_empty()
    )
}

/// Merge adjacent literals so runs of plain characters become one node.
fn coalesce_literals(nodes: Vec<Node>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if let Node::Literal { flags, bytes } = &node {
            if let Some(Node::Literal {
                flags: prev_flags,
                bytes: prev_bytes,
            }) = out.last_mut()
            {
                if prev_flags == flags {
                    prev_bytes.extend_from_slice(bytes);
                    continue;
                }
            }
        }
        out.push(node);
    }
    out
}

fn make_cat(nodes: Vec<Node>) -> Node {
    let mut nodes = coalesce_literals(nodes);
    if nodes.len() == 1 {
        if let Some(node) = nodes.pop() {
            return node;
        }
    }
    Node::Group {
        children: nodes,
        atomic: false,
        index: 0,
        name: None,
    }
}

fn literal(flags: Flags, c: char) -> Node {
    let mut buf = [0u8; 4];
    Node::Literal {
        flags,
        bytes: c.encode_utf8(&mut buf).as_bytes().to_vec(),
    }
}

fn class_node(flags: Flags, matcher: CharMatcher) -> Node {
    Node::Char {
        flags,
        matchers: smallvec![matcher],
        reversed: false,
    }
}

/// Build the matcher for a Perl class escape letter (\d \D \s \S \w \W).
fn perl_class(letter: char) -> CharMatcher {
    let table = match letter.to_ascii_lowercase() {
        'd' => charclasses::DIGITS,
        's' => charclasses::WHITESPACE,
        _ => charclasses::WORD_CHARS,
    };
    let matcher = CharMatcher::Class(table);
    if letter.is_ascii_uppercase() {
        CharMatcher::Negated(Box::new(matcher))
    } else {
        matcher
    }
}

/// Represents the state used to parse a pattern.
struct Parser<'a> {
    /// The remaining input.
    input: Peekable<Chars<'a>>,

    /// The flags currently in effect; scoped groups save and restore.
    flags: Flags,

    /// Number of capturing groups seen so far.
    group_count: u32,

    /// Names of capture groups, empty for unnamed ones.
    group_names: Vec<Box<str>>,

    /// Maximum numbered backreference encountered.
    max_backref: u32,

    /// Named backreferences encountered, validated at the end.
    named_backrefs: Vec<Box<str>>,
}

impl<'a> Parser<'a> {
    /// Consume a character, returning it.
    fn consume(&mut self, c: char) -> char {
        let next = self.input.next();
        debug_assert!(next == Some(c), "char was not next");
        c
    }

    /// If our contents begin with the char \p c, consume it and return
    /// true. Otherwise return false.
    fn try_consume(&mut self, c: char) -> bool {
        let mut cursor = self.input.clone();
        if cursor.next() == Some(c) {
            self.input = cursor;
            true
        } else {
            false
        }
    }

    /// If our contents begin with the string \p s, consume it and return
    /// true. Otherwise return false.
    fn try_consume_str(&mut self, s: &str) -> bool {
        let mut cursor = self.input.clone();
        for c in s.chars() {
            if cursor.next() != Some(c) {
                return false;
            }
        }
        self.input = cursor;
        true
    }

    fn peek(&mut self) -> Option<char> {
        self.input.peek().copied()
    }

    fn next(&mut self) -> Option<char> {
        self.input.next()
    }

    fn try_parse(&mut self) -> Result<Parsed, Error> {
        // Parse a disjunction. If we consume everything, it's a success; if
        // something is left it's an error, for example an excess closing
        // paren.
        let body = self.consume_disjunction()?;
        match self.peek() {
            Some(')') => syntax("Unbalanced parenthesis"),
            Some(c) => syntax(format!("Unexpected char: {}", c)),
            None => self.finalize(body),
        }
    }

    fn finalize(&self, body: Node) -> Result<Parsed, Error> {
        if self.max_backref > self.group_count {
            return syntax(format!(
                "Backreference \\{} exceeds number of capture groups",
                self.max_backref
            ));
        }
        for name in &self.named_backrefs {
            if !self.group_names.contains(name) {
                return syntax(format!("Backreference to unknown group name: {}", name));
            }
        }
        let weight = expansion_weight(&body);
        if weight > MAX_REPEAT_EXPANSION {
            return Err(Error::BudgetExceeded(format!(
                "pattern expands to {} repetition body copies (limit {})",
                weight, MAX_REPEAT_EXPANSION
            )));
        }
        Ok(Parsed {
            root: body,
            group_count: self.group_count,
            group_names: self.group_names.clone(),
        })
    }

    fn consume_disjunction(&mut self) -> Result<Node, Error> {
        let mut terms = vec![self.consume_term()?];
        while self.try_consume('|') {
            terms.push(self.consume_term()?);
        }
        if terms.len() == 1 {
            if let Some(term) = terms.pop() {
                return Ok(term);
            }
        }
        Ok(Node::Alter {
            children: terms
                .into_iter()
                .map(|t| if is_empty_group(&t) { None } else { Some(t) })
                .collect(),
        })
    }

    fn consume_term(&mut self) -> Result<Node, Error> {
        let mut result: Vec<Node> = Vec::new();
        loop {
            let start_offset = result.len();
            let c = match self.peek() {
                None => return Ok(make_cat(result)),
                Some(c) => c,
            };
            match c {
                // A concatenation is terminated by a closing paren or a
                // vertical bar.
                ')' | '|' => break,
                '^' => {
                    self.consume('^');
                    result.push(Node::Begin {
                        flags: self.flags,
                        line: true,
                    });
                }
                '$' => {
                    self.consume('$');
                    result.push(Node::End {
                        flags: self.flags,
                        line: true,
                    });
                }
                '\\' => {
                    self.consume('\\');
                    result.push(self.consume_atom_escape()?);
                }
                '.' => {
                    self.consume('.');
                    result.push(class_node(self.flags, CharMatcher::Any));
                }
                '(' => match self.consume_group()? {
                    Some(node) => result.push(node),
                    // Comments and inline flag settings produce no node.
                    None => continue,
                },
                '[' => {
                    result.push(self.consume_bracket()?);
                }
                ']' => {
                    return syntax("Unbalanced bracket");
                }
                c => {
                    // It's an error if this parses successfully as a
                    // quantifier; note this covers *, + and ? as well.
                    let saved = self.input.clone();
                    if let Ok(Some(_)) = self.try_consume_quantifier() {
                        return syntax("Missing argument to repetition operator");
                    }
                    self.input = saved;
                    self.consume(c);
                    result.push(literal(self.flags, c));
                }
            }

            // We just parsed a term; a quantifier may follow. A malformed
            // brace construct like `a{x` is not a quantifier and stays
            // literal.
            let saved = self.input.clone();
            match self.try_consume_quantifier() {
                Err(_) => self.input = saved,
                Ok(None) => {}
                Ok(Some(quant)) => {
                    if result.len() == start_offset {
                        return syntax("Missing argument to repetition operator");
                    }
                    if let Some(max) = quant.max {
                        if quant.min > max {
                            return syntax("Invalid repetition bounds");
                        }
                    }
                    let quantifee = result.split_off(start_offset);
                    result.push(Node::Repeat {
                        child: Box::new(make_cat(quantifee)),
                        min: quant.min,
                        max: quant.max,
                        reluctant: quant.reluctant,
                        atomic: quant.atomic,
                    });
                    if matches!(self.peek(), Some('*' | '+' | '?')) {
                        return syntax("Invalid nested repetition operator");
                    }
                }
            }
        }
        Ok(make_cat(result))
    }

    /// Parse everything starting with '('. Comments and inline flag
    /// settings contribute no node and return None.
    fn consume_group(&mut self) -> Result<Option<Node>, Error> {
        if self.try_consume_str("(?=") {
            return self.consume_lookaround(false, false).map(Some);
        }
        if self.try_consume_str("(?!") {
            return self.consume_lookaround(true, false).map(Some);
        }
        if self.try_consume_str("(?<=") {
            return self.consume_lookaround(false, true).map(Some);
        }
        if self.try_consume_str("(?<!") {
            return self.consume_lookaround(true, true).map(Some);
        }
        if self.try_consume_str("(?>") {
            return self.consume_group_body(true).map(Some);
        }
        if self.try_consume_str("(?#") {
            self.consume_comment()?;
            return Ok(None);
        }
        if self.try_consume_str("(?{") {
            return self.consume_callout().map(Some);
        }
        if self.try_consume_str("(?:") {
            return self.consume_group_body(false).map(Some);
        }
        if self.try_consume_str("(?P<") {
            return self.consume_named_group('>').map(Some);
        }
        if self.try_consume_str("(?'") {
            return self.consume_named_group('\'').map(Some);
        }
        if self.try_consume_str("(?(") {
            return Err(Error::FeatureUnsupported(
                "conditional groups are not supported".to_string(),
            ));
        }
        if self.try_consume_str("(?R") {
            return Err(Error::FeatureUnsupported(
                "recursive patterns are not supported".to_string(),
            ));
        }
        if self.try_consume_str("(?<") {
            return self.consume_named_group('>').map(Some);
        }
        if self.try_consume_str("(?") {
            return self.consume_flag_group();
        }
        self.consume('(');
        self.consume_capture_group(None).map(Some)
    }

    /// Parse `(?flags)` or `(?flags:...)` after the leading `(?`.
    fn consume_flag_group(&mut self) -> Result<Option<Node>, Error> {
        let mut flags = self.flags;
        let mut negate = false;
        loop {
            let set = !negate;
            match self.peek() {
                Some('i') => {
                    self.consume('i');
                    flags.icase = set;
                }
                Some('s') => {
                    self.consume('s');
                    flags.dot_all = set;
                }
                Some('m') => {
                    self.consume('m');
                    flags.multiline = set;
                }
                Some('U') => {
                    self.consume('U');
                    flags.ungreedy = set;
                }
                Some('-') if !negate => {
                    self.consume('-');
                    negate = true;
                }
                Some(')') => {
                    // Inline form: the new flags apply to the end of the
                    // enclosing group.
                    self.consume(')');
                    self.flags = flags;
                    return Ok(None);
                }
                Some(':') => {
                    self.consume(':');
                    let saved = self.flags;
                    self.flags = flags;
                    let body = self.consume_disjunction()?;
                    if !self.try_consume(')') {
                        return syntax("Unbalanced parenthesis");
                    }
                    self.flags = saved;
                    return Ok(Some(body));
                }
                _ => return syntax("Invalid group syntax"),
            }
        }
    }

    fn consume_group_body(&mut self, atomic: bool) -> Result<Node, Error> {
        let saved = self.flags;
        let body = self.consume_disjunction()?;
        if !self.try_consume(')') {
            return syntax("Unbalanced parenthesis");
        }
        self.flags = saved;
        Ok(if atomic {
            Node::Group {
                children: vec![body],
                atomic: true,
                index: 0,
                name: None,
            }
        } else {
            body
        })
    }

    fn consume_capture_group(&mut self, name: Option<Box<str>>) -> Result<Node, Error> {
        if self.group_count as usize >= MAX_CAPTURE_GROUPS {
            return syntax("Capture group count limit exceeded");
        }
        self.group_count += 1;
        let index = self.group_count;
        self.group_names.push(name.clone().unwrap_or_default());
        let saved = self.flags;
        let body = self.consume_disjunction()?;
        if !self.try_consume(')') {
            return syntax("Unbalanced parenthesis");
        }
        self.flags = saved;
        Ok(Node::Group {
            children: vec![body],
            atomic: false,
            index,
            name,
        })
    }

    fn consume_named_group(&mut self, terminator: char) -> Result<Node, Error> {
        let name = self.consume_group_name(terminator)?;
        if self.group_names.contains(&name) {
            return syntax(format!("Duplicate capture group name: {}", name));
        }
        self.consume_capture_group(Some(name))
    }

    fn consume_group_name(&mut self, terminator: char) -> Result<Box<str>, Error> {
        let mut name = String::new();
        loop {
            match self.next() {
                None => return syntax("Unterminated capture group name"),
                Some(c) if c == terminator => break,
                Some(c) if c.is_ascii_alphanumeric() || c == '_' => name.push(c),
                Some(c) => {
                    return syntax(format!("Invalid character in capture group name: {}", c))
                }
            }
        }
        if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
            return syntax("Invalid capture group name");
        }
        Ok(name.into())
    }

    /// Skip a `(?#...)` comment; the body has no nesting.
    fn consume_comment(&mut self) -> Result<(), Error> {
        loop {
            match self.next() {
                Some(')') => return Ok(()),
                Some(_) => {}
                None => return syntax("Unterminated comment group"),
            }
        }
    }

    /// Parse `(?{name})` after the leading `(?{`.
    fn consume_callout(&mut self) -> Result<Node, Error> {
        let name = self.consume_group_name('}')?;
        if !self.try_consume(')') {
            return syntax("Unbalanced parenthesis");
        }
        Ok(Node::Func { name })
    }

    fn consume_lookaround(&mut self, negative: bool, behind: bool) -> Result<Node, Error> {
        let saved = self.flags;
        let body = self.consume_disjunction()?;
        if !self.try_consume(')') {
            return syntax("Unbalanced parenthesis");
        }
        self.flags = saved;
        Ok(Node::Lookaround {
            child: Box::new(body),
            negative,
            behind,
        })
    }

    fn consume_bracket(&mut self) -> Result<Node, Error> {
        self.consume('[');
        let reversed = self.try_consume('^');
        let mut matchers: SmallVec<[CharMatcher; 2]> = SmallVec::new();
        loop {
            match self.peek() {
                None => return syntax("Unbalanced bracket"),
                Some(']') => {
                    self.consume(']');
                    return Ok(Node::Char {
                        flags: self.flags,
                        matchers,
                        reversed,
                    });
                }
                _ => {}
            }

            // POSIX classes like [[:alpha:]] and [[:^alpha:]].
            if self.try_consume_str("[:") {
                let negated = self.try_consume('^');
                let mut name = String::new();
                while let Some(c) = self.peek() {
                    if c.is_ascii_lowercase() {
                        self.consume(c);
                        name.push(c);
                    } else {
                        break;
                    }
                }
                if !self.try_consume_str(":]") {
                    return syntax("Invalid POSIX character class");
                }
                let Some(table) = charclasses::posix_class(&name) else {
                    return syntax(format!("Unknown POSIX character class: {}", name));
                };
                let matcher = CharMatcher::Class(table);
                matchers.push(if negated {
                    CharMatcher::Negated(Box::new(matcher))
                } else {
                    matcher
                });
                continue;
            }

            let Some(first) = self.try_consume_class_atom()? else {
                continue;
            };

            // Check for a dash; we may have a range.
            if !self.try_consume('-') {
                matchers.push(first);
                continue;
            }
            let Some(second) = self.try_consume_class_atom()? else {
                // No second atom, as in [a-].
                matchers.push(first);
                matchers.push(CharMatcher::Lit('-'));
                continue;
            };

            // Ranges can't contain character classes: [\d-z] is invalid.
            // Ranges must also be in order: [z-a] is invalid.
            match (first, second) {
                (CharMatcher::Lit(lo), CharMatcher::Lit(hi)) if lo <= hi => {
                    matchers.push(CharMatcher::Range(lo, hi));
                }
                _ => return syntax("Invalid character range"),
            }
        }
    }

    fn try_consume_class_atom(&mut self) -> Result<Option<CharMatcher>, Error> {
        let Some(c) = self.peek() else {
            return Ok(None);
        };
        match c {
            ']' => Ok(None),
            '\\' => {
                self.consume('\\');
                let Some(ec) = self.peek() else {
                    return syntax("Unterminated escape");
                };
                match ec {
                    'd' | 'D' | 's' | 'S' | 'w' | 'W' => {
                        self.consume(ec);
                        Ok(Some(perl_class(ec)))
                    }
                    'p' | 'P' => {
                        self.consume(ec);
                        self.consume_property(ec == 'P').map(Some)
                    }
                    'b' => {
                        // Inside a class, \b is the backspace character.
                        self.consume('b');
                        Ok(Some(CharMatcher::Lit('\x08')))
                    }
                    '-' => {
                        self.consume('-');
                        Ok(Some(CharMatcher::Lit('-')))
                    }
                    _ => Ok(Some(CharMatcher::Lit(self.consume_character_escape()?))),
                }
            }
            c => {
                self.consume(c);
                Ok(Some(CharMatcher::Lit(c)))
            }
        }
    }

    /// Parse a \p or \P property body: a single letter or {Name}.
    fn consume_property(&mut self, negated: bool) -> Result<CharMatcher, Error> {
        let mut name = String::new();
        if self.try_consume('{') {
            loop {
                match self.next() {
                    Some('}') => break,
                    Some(c) if c.is_ascii_alphanumeric() || c == '_' => name.push(c),
                    _ => return syntax("Invalid Unicode property name"),
                }
            }
        } else {
            match self.next() {
                Some(c) if c.is_ascii_alphabetic() => name.push(c),
                _ => return syntax("Invalid Unicode property name"),
            }
        }
        let Some(prop) = PropertyClass::from_name(&name) else {
            return syntax(format!("Unknown Unicode property: {}", name));
        };
        let matcher = CharMatcher::Property(prop);
        Ok(if negated {
            CharMatcher::Negated(Box::new(matcher))
        } else {
            matcher
        })
    }

    fn try_consume_quantifier(&mut self) -> Result<Option<Quantifier>, Error> {
        let Some(mut quant) = self.try_consume_quantifier_prefix()? else {
            return Ok(None);
        };
        if self.try_consume('+') {
            // Possessive: commits to the first count that matches.
            quant.atomic = true;
        } else {
            let question = self.try_consume('?');
            quant.reluctant = question != self.flags.ungreedy;
        }
        Ok(Some(quant))
    }

    fn try_consume_quantifier_prefix(&mut self) -> Result<Option<Quantifier>, Error> {
        let quant = |min, max| Quantifier {
            min,
            max,
            reluctant: false,
            atomic: false,
        };
        match self.peek() {
            Some('*') => {
                self.consume('*');
                Ok(Some(quant(0, None)))
            }
            Some('+') => {
                self.consume('+');
                Ok(Some(quant(1, None)))
            }
            Some('?') => {
                self.consume('?');
                Ok(Some(quant(0, Some(1))))
            }
            Some('{') => {
                self.consume('{');
                let Some(min) = self.try_consume_decimal_integer_literal() else {
                    return syntax("Invalid quantifier");
                };
                let max = if self.try_consume(',') {
                    // {n,m} or {n,}.
                    self.try_consume_decimal_integer_literal()
                } else {
                    // {n}.
                    Some(min)
                };
                if !self.try_consume('}') {
                    return syntax("Invalid quantifier");
                }
                Ok(Some(quant(min, max)))
            }
            _ => Ok(None),
        }
    }

    /// Parse a run of decimal digits, saturating on overflow. All digits
    /// are consumed regardless.
    fn try_consume_decimal_integer_literal(&mut self) -> Option<usize> {
        let mut result: usize = 0;
        let mut digits = 0;
        while let Some(c) = self.peek() {
            let Some(digit) = c.to_digit(10) else { break };
            self.consume(c);
            digits += 1;
            result = result.saturating_mul(10).saturating_add(digit as usize);
        }
        if digits > 0 {
            Some(result)
        } else {
            None
        }
    }

    fn consume_atom_escape(&mut self) -> Result<Node, Error> {
        let Some(c) = self.peek() else {
            return syntax("Incomplete escape");
        };
        match c {
            'b' | 'B' => {
                self.consume(c);
                Ok(Node::WordBoundary { reversed: c == 'B' })
            }
            'A' => {
                self.consume('A');
                Ok(Node::Begin {
                    flags: self.flags,
                    line: false,
                })
            }
            'z' => {
                self.consume('z');
                Ok(Node::End {
                    flags: self.flags,
                    line: false,
                })
            }
            'd' | 'D' | 's' | 'S' | 'w' | 'W' => {
                self.consume(c);
                Ok(class_node(self.flags, perl_class(c)))
            }
            'p' | 'P' => {
                self.consume(c);
                let matcher = self.consume_property(c == 'P')?;
                Ok(class_node(self.flags, matcher))
            }
            'k' => {
                self.consume('k');
                self.consume_backref()
            }
            '1'..='9' => {
                // A numbered backreference; \0 stays an octal escape.
                let Some(value) = self.try_consume_decimal_integer_literal() else {
                    return syntax("Invalid backreference");
                };
                self.make_numbered_backref(value)
            }
            'Q' => {
                self.consume('Q');
                self.consume_quoted_literal()
            }
            'G' => Err(Error::FeatureUnsupported(
                "the \\G anchor is not supported".to_string(),
            )),
            _ => Ok(literal(self.flags, self.consume_character_escape()?)),
        }
    }

    fn make_numbered_backref(&mut self, value: usize) -> Result<Node, Error> {
        if value == 0 || value > MAX_CAPTURE_GROUPS {
            return syntax(format!("Invalid backreference \\{}", value));
        }
        self.max_backref = self.max_backref.max(value as u32);
        Ok(Node::BackRef {
            flags: self.flags,
            index: value as u32,
            name: None,
        })
    }

    /// Parse the \k backreference forms: \kN, \k{N}, \kName, \k{Name}.
    fn consume_backref(&mut self) -> Result<Node, Error> {
        let braced = self.try_consume('{');
        let mut name = String::new();
        if braced {
            loop {
                match self.next() {
                    Some('}') => break,
                    Some(c) if c.is_ascii_alphanumeric() || c == '_' => name.push(c),
                    _ => return syntax("Invalid backreference name"),
                }
            }
        } else {
            while let Some(c) = self.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    self.consume(c);
                    name.push(c);
                } else {
                    break;
                }
            }
        }
        if name.is_empty() {
            return syntax("Invalid backreference name");
        }
        if name.bytes().all(|b| b.is_ascii_digit()) {
            let Ok(value) = name.parse::<usize>() else {
                return syntax(format!("Invalid backreference \\k{{{}}}", name));
            };
            return self.make_numbered_backref(value);
        }
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            return syntax("Invalid backreference name");
        }
        self.named_backrefs.push(name.as_str().into());
        Ok(Node::BackRef {
            flags: self.flags,
            index: 0,
            name: Some(name.into()),
        })
    }

    /// Lower a \Q...\E region to a single literal. A missing \E runs to
    /// the end of the pattern.
    fn consume_quoted_literal(&mut self) -> Result<Node, Error> {
        let mut bytes = Vec::new();
        loop {
            match self.next() {
                None => break,
                Some('\\') => {
                    if self.try_consume('E') {
                        break;
                    }
                    bytes.push(b'\\');
                }
                Some(c) => {
                    let mut buf = [0u8; 4];
                    bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
            }
        }
        Ok(Node::Literal {
            flags: self.flags,
            bytes,
        })
    }

    fn consume_character_escape(&mut self) -> Result<char, Error> {
        let Some(c) = self.peek() else {
            return syntax("Incomplete escape");
        };
        match c {
            'a' => {
                self.consume('a');
                Ok('\x07')
            }
            'f' => {
                self.consume('f');
                Ok('\x0C')
            }
            'n' => {
                self.consume('n');
                Ok('\n')
            }
            'r' => {
                self.consume('r');
                Ok('\r')
            }
            't' => {
                self.consume('t');
                Ok('\t')
            }
            'v' => {
                self.consume('v');
                Ok('\x0B')
            }
            '0' => {
                // \0 plus up to two octal digits.
                self.consume('0');
                let mut value: u32 = 0;
                for _ in 0..2 {
                    match self.peek() {
                        Some(d @ '0'..='7') => {
                            self.consume(d);
                            value = value * 8 + (d as u32 - '0' as u32);
                        }
                        _ => break,
                    }
                }
                Ok(char::from_u32(value).unwrap_or('\0'))
            }
            'x' => {
                self.consume('x');
                if self.try_consume('{') {
                    // Braced form \x{10FFFF}.
                    let mut value: u32 = 0;
                    let mut digits = 0;
                    loop {
                        match self.next() {
                            Some('}') => break,
                            Some(d) => match d.to_digit(16) {
                                Some(x) => {
                                    digits += 1;
                                    value = value.saturating_mul(16).saturating_add(x);
                                }
                                None => return syntax("Invalid hex escape"),
                            },
                            None => return syntax("Invalid hex escape"),
                        }
                    }
                    if digits == 0 {
                        return syntax("Invalid hex escape");
                    }
                    match char::from_u32(value) {
                        Some(c) => Ok(c),
                        None => syntax("Invalid hex escape"),
                    }
                } else {
                    let x1 = self.next().and_then(|c| c.to_digit(16));
                    let x2 = self.next().and_then(|c| c.to_digit(16));
                    match (x1, x2) {
                        (Some(hi), Some(lo)) => match char::from_u32(hi * 16 + lo) {
                            Some(c) => Ok(c),
                            None => syntax("Invalid hex escape"),
                        },
                        _ => syntax("Invalid hex escape"),
                    }
                }
            }
            c if c.is_ascii_punctuation() => Ok(self.consume(c)),
            _ => syntax(format!("Invalid escape: \\{}", c)),
        }
    }
}
