use std::cell::Cell;
use std::collections::HashMap;

use regex::Regex;

use crate::{PegError, Tree};

/// A single PEG production.
///
/// [`Rule::Ref`] is the only variant that is resolved lazily, by name,
/// against the owning [`Grammar`] — this is what lets two rules refer to
/// each other (including recursively) without Rust-level cycles in the
/// value itself.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Matches an exact literal string.
    Literal(&'static str),
    /// Matches a regular expression, anchored at the current position.
    Regex(Regex),
    /// Matches all children in order; fails if any child fails.
    Seq(Vec<Rule>),
    /// Matches the first alternative that succeeds, left to right.
    Choice(Vec<Rule>),
    /// Matches zero or one occurrence of the inner rule; never fails.
    Opt(Box<Rule>),
    /// Matches zero or more occurrences of the inner rule; never fails.
    Repeat(Box<Rule>),
    /// Matches whatever the named rule matches.
    Ref(&'static str),
}

/// A compiled grammar: a rule-name → [`Rule`] map plus a whitespace/comment
/// skipper applied between tokens.
pub struct Grammar {
    rules: HashMap<&'static str, Rule>,
    skip: Regex,
}

impl Grammar {
    /// Build a grammar from its named productions and a skipper regex.
    ///
    /// The skipper is applied before every literal/regex terminal match, so
    /// it plays the role of "whitespace and comments between tokens" for
    /// every rule built from this grammar, without each production having
    /// to mention it.
    pub fn new(rules: impl IntoIterator<Item = (&'static str, Rule)>, skip: Regex) -> Self {
        Self {
            rules: rules.into_iter().collect(),
            skip,
        }
    }

    /// Parse `text` starting from the named rule; the whole input must be
    /// consumed (modulo trailing whitespace/comments) for this to succeed.
    pub fn parse(&self, start_rule: &str, text: &str) -> Result<Tree, PegError> {
        let furthest = Cell::new(0usize);
        let rule = self
            .rules
            .get(start_rule)
            .unwrap_or_else(|| panic!("no such rule: {start_rule}"));
        let pos = self.skip_ws(text, 0);
        match self.parse_rule(rule, text, pos, &furthest) {
            Some((end, tree)) => {
                let end = self.skip_ws(text, end);
                if end == text.len() {
                    Ok(tree)
                } else {
                    Err(PegError::at(text, end.max(furthest.get())))
                }
            }
            None => Err(PegError::at(text, furthest.get())),
        }
    }

    fn skip_ws(&self, text: &str, pos: usize) -> usize {
        match self.skip.find_at(text, pos) {
            Some(m) if m.start() == pos => m.end(),
            _ => pos,
        }
    }

    fn parse_rule(
        &self,
        rule: &Rule,
        text: &str,
        pos: usize,
        furthest: &Cell<usize>,
    ) -> Option<(usize, Tree)> {
        match rule {
            Rule::Literal(lit) => {
                let pos = self.skip_ws(text, pos);
                if text[pos..].starts_with(lit) {
                    Some((pos + lit.len(), Tree::Lit((*lit).to_string())))
                } else {
                    furthest.set(furthest.get().max(pos));
                    None
                }
            }
            Rule::Regex(re) => {
                let pos = self.skip_ws(text, pos);
                match re.find_at(text, pos) {
                    Some(m) if m.start() == pos => {
                        Some((m.end(), Tree::Text(m.as_str().to_string())))
                    }
                    _ => {
                        furthest.set(furthest.get().max(pos));
                        None
                    }
                }
            }
            Rule::Seq(parts) => {
                let mut cur = pos;
                let mut children = Vec::with_capacity(parts.len());
                for part in parts {
                    let (next, tree) = self.parse_rule(part, text, cur, furthest)?;
                    cur = next;
                    children.push(tree);
                }
                Some((cur, Tree::Seq(children)))
            }
            Rule::Choice(alts) => {
                for alt in alts {
                    if let Some(result) = self.parse_rule(alt, text, pos, furthest) {
                        return Some(result);
                    }
                }
                None
            }
            Rule::Opt(inner) => match self.parse_rule(inner, text, pos, furthest) {
                Some((next, tree)) => Some((next, Tree::Opt(Some(Box::new(tree))))),
                None => Some((pos, Tree::Opt(None))),
            },
            Rule::Repeat(inner) => {
                let mut cur = pos;
                let mut children = Vec::new();
                while let Some((next, tree)) = self.parse_rule(inner, text, cur, furthest) {
                    if next == cur {
                        // Inner rule matched the empty string; stop to avoid looping forever.
                        break;
                    }
                    cur = next;
                    children.push(tree);
                }
                Some((cur, Tree::Rep(children)))
            }
            Rule::Ref(name) => {
                let target = self
                    .rules
                    .get(name)
                    .unwrap_or_else(|| panic!("no such rule: {name}"));
                self.parse_rule(target, text, pos, furthest)
            }
        }
    }
}
