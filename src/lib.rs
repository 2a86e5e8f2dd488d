/*!

# retrack - backtracking regular expressions with extensions

This crate provides a regular expression engine built on classical
backtracking. It accepts the conventional golang-style syntax and extends
it with constructs a finite-automaton engine cannot express:

| Extension | Syntax |
|---|---|
| Atomic group (non-capturing, no backtrack into) | `(?>re)` |
| Positive / negative lookahead | `(?=re)` / `(?!re)` |
| Positive / negative lookbehind | `(?<=re)` / `(?<!re)` |
| Possessive repetition | `x*+`, `x++`, `x?+`, `x{n,m}+` |
| Back references (numbered, named) | `\N`, `\kN`, `\k{N}`, `\k{Name}` |
| Embedded comment | `(?#...)` |
| Embedded callout | `(?{name})` |

Patterns that use none of the extensions are handed to the standard
[regex] engine, so conventional patterns keep its performance; extended
patterns run on the native backtracking engine.

# Example: test whether bytes contain a match

```rust
let re = retrack::must_compile(r"\d{4}");
assert!(re.is_match(b"year 2020"));
```

# Example: backreferences

Here a backreference finds a doubled word:

```rust
let re = retrack::must_compile(r"(\w+) \k{1}");
let text = b"it is is doubled";
let m = re.find_submatch_index(text, 0).unwrap();
assert_eq!(&text[m[0] as usize..m[1] as usize], b"is is");
```

# Example: possessive repetition and atomic groups

A possessive quantifier refuses to give back what it consumed:

```rust
let re = retrack::must_compile(r"^[0-9]++[0-9a]");
assert!(re.is_match(b"1234a"));
assert!(!re.is_match(b"1234"));
```

# Example: lookbehind

Lookbehind assertions may have variable width:

```rust
let re = retrack::must_compile(r"(?<=a[0-9]{3,5})a");
let m = re.find_submatch_index(b"a12345a", 0).unwrap();
assert_eq!(m[0], 6);
```

# Example: callouts

A `(?{name})` group dispatches to a registered function which decides how
many bytes to consume:

```rust
use retrack::{must_compile, CalloutFn, Context, FuncMap};
use std::sync::Arc;

let mut re = must_compile(r"ab(?{rest})");
let mut funcs = FuncMap::new();
let accept_rest: CalloutFn = Arc::new(|ctx: &Context| {
    (ctx.data.len() - ctx.cursor) as isize
});
funcs.insert("rest".to_string(), accept_rest);
re.funcs(funcs);
let m = re.find_submatch_index(b"abcdef", 0).unwrap();
assert_eq!((m[0], m[1]), (0, 6));
```

# Matching model

A compiled pattern is a tree of nodes. Each node lazily enumerates the
candidate spans it can consume at a position; sequencing drives its
children left to right and backtracks by asking an earlier child for its
next candidate. Enumeration order is greedy (longest first) by default,
shortest first for reluctant quantifiers, and source order for
alternation, so the first overall candidate is the conventional
leftmost-first match. [`Pattern::longest`] switches the driver to
leftmost-longest instead.

Case-insensitive matching uses Unicode simple folding; `\d`, `\s`, `\w`
and `\b` are ASCII, as in the conventional engine. Haystacks are byte
slices: invalid UTF-8 decodes as U+FFFD one byte at a time, so binary
data is safe to scan.

Compiled patterns are immutable and safe to share between threads. Every
match attempt allocates its own state, and an optional
[`Pattern::step_limit`] bounds how much work a pathological pattern may
do before the attempt reports [`Error::ResourceExhausted`].

*/

#![warn(clippy::all)]
#![allow(clippy::manual_range_contains)]

pub use crate::api::*;

mod api;
mod backtrack;
mod charclasses;
mod cursor;
mod delegate;
mod error;
mod exec;
mod matchers;
mod node;
mod parse;
mod startpredicate;
mod template;
mod unicode;
