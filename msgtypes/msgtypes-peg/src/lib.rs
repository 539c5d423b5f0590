//! A minimal PEG (parsing expression grammar) evaluator.
//!
//! A [`Grammar`] is a name → [`Rule`] map plus a single whitespace/comment
//! skipper regex. [`Grammar::parse`] walks a named start rule over an input
//! string and returns an untyped [`Tree`] (or a [`PegError`] naming the
//! offending slice). The tree shape is purely structural — literal text,
//! regex text, ordered children, repeated children, optional child — the
//! engine has no notion of what a caller's grammar "means". Callers lower
//! the tree into their own typed IR by pattern-matching over it; see
//! `msgtypes-msg` for an example.

mod grammar;
mod tree;

pub use grammar::{Grammar, Rule};
pub use tree::Tree;

use thiserror::Error;

/// Error produced when a [`Grammar`] fails to consume its input.
#[derive(Debug, Clone, Error)]
#[error("could not parse: {snippet:?}")]
pub struct PegError {
    /// The offending slice of input, truncated to a bounded length.
    pub snippet: String,
}

impl PegError {
    pub(crate) fn at(text: &str, pos: usize) -> Self {
        const MAX: usize = 80;
        let rest = &text[pos.min(text.len())..];
        let snippet = if rest.len() > MAX {
            let mut end = MAX;
            while !rest.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}…", &rest[..end])
        } else {
            rest.to_string()
        };
        Self { snippet }
    }
}
