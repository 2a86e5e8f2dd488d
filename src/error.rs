//! Error types for compilation and matching.

use std::error;
use std::fmt;

/// An error produced while compiling or executing a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The pattern is syntactically invalid.
    Syntax(String),
    /// A bounded repetition would expand past the static budget.
    BudgetExceeded(String),
    /// The pattern uses a recognized construct this engine does not
    /// implement, such as conditional groups.
    FeatureUnsupported(String),
    /// A match attempt ran past its configured step budget.
    ResourceExhausted,
    /// A callout was missing or returned an illegal value.
    Callout(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Syntax(text) => write!(f, "syntax error: {}", text),
            Error::BudgetExceeded(text) => write!(f, "repetition budget exceeded: {}", text),
            Error::FeatureUnsupported(text) => write!(f, "unsupported feature: {}", text),
            Error::ResourceExhausted => f.write_str("step budget exhausted"),
            Error::Callout(text) => write!(f, "callout error: {}", text),
        }
    }
}

impl error::Error for Error {}

/// Shorthand for a syntax error result.
pub(crate) fn syntax<S, T>(text: S) -> Result<T, Error>
where
    S: ToString,
{
    Err(Error::Syntax(text.to_string()))
}
