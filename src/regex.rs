//! Compiled patterns and the matching entry points.

use indexmap::IndexMap;
use log::debug;

use crate::ast::{AnchorKind, Ast, Node, SeqId};
use crate::error::{Construct, Error, Result};
use crate::flags::Flags;
use crate::matcher::Matcher;
use crate::matches::Match;
use crate::parser::Parser;
use crate::symbolic::{Oracle, SymbolicStr};

/// A parsed pattern, ready to be matched against any number of strings.
///
/// Matching never modifies the regex: each attempt works on its own copy of the arena.
#[derive(Debug, Clone)]
pub struct Regex {
    pattern: String,
    flags: Flags,
    ast: Ast,
    root: SeqId,
    group_count: usize,
    names: IndexMap<String, usize>,
    group_names: Vec<Option<String>>,
}

/// Result of a match attempt that may fall back to concrete matching.
#[derive(Debug, Clone)]
pub enum Outcome<'r, S> {
    /// The attempt was decided on this branch.
    Decided(Option<Match<'r, S>>),
    /// The pattern uses something the symbolic matcher cannot express; the caller should
    /// realize the string and match it natively.
    Unsupported(Construct),
}

impl<'r, S> Outcome<'r, S> {
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Outcome::Unsupported(_))
    }
}

impl Regex {
    /// Parse `pattern` under `flags`. Inline global flags are folded into [`Regex::flags`].
    pub fn new(pattern: &str, flags: Flags) -> Result<Regex> {
        let parsed = Parser::new(pattern, flags).parse()?;
        let mut group_names = vec![None; parsed.group_count + 1];
        for (name, &index) in &parsed.names {
            group_names[index] = Some(name.clone());
        }
        Ok(Regex {
            pattern: pattern.to_string(),
            flags: parsed.flags,
            ast: parsed.ast,
            root: parsed.root,
            group_count: parsed.group_count,
            names: parsed.names,
            group_names,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Number of capturing groups.
    pub fn groups(&self) -> usize {
        self.group_count
    }

    pub fn group_name(&self, index: usize) -> Option<&str> {
        self.group_names.get(index)?.as_deref()
    }

    pub fn group_index(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    /// Group names mapped to their indices, in definition order.
    pub fn names(&self) -> &IndexMap<String, usize> {
        &self.names
    }

    /// Match at `pos`, looking no further than `endpos`.
    pub fn match_at<S, O>(
        &self,
        string: &S,
        oracle: &mut O,
        pos: usize,
        endpos: Option<usize>,
    ) -> Result<Option<Match<'_, S>>>
    where
        S: SymbolicStr,
        O: Oracle<S::Condition>,
    {
        self.run(string, oracle, pos, endpos, false)
    }

    /// Like [`Regex::match_at`], but the match must reach `endpos`.
    pub fn fullmatch_at<S, O>(
        &self,
        string: &S,
        oracle: &mut O,
        pos: usize,
        endpos: Option<usize>,
    ) -> Result<Option<Match<'_, S>>>
    where
        S: SymbolicStr,
        O: Oracle<S::Condition>,
    {
        self.run(string, oracle, pos, endpos, true)
    }

    /// [`Regex::match_at`], reporting unsupported constructs as an [`Outcome`] instead of
    /// an error. An oracle abort still propagates.
    pub fn symbolic_match<S, O>(
        &self,
        string: &S,
        oracle: &mut O,
        pos: usize,
        endpos: Option<usize>,
    ) -> Result<Outcome<'_, S>>
    where
        S: SymbolicStr,
        O: Oracle<S::Condition>,
    {
        self.decide(self.match_at(string, oracle, pos, endpos))
    }

    pub fn symbolic_fullmatch<S, O>(
        &self,
        string: &S,
        oracle: &mut O,
        pos: usize,
        endpos: Option<usize>,
    ) -> Result<Outcome<'_, S>>
    where
        S: SymbolicStr,
        O: Oracle<S::Condition>,
    {
        self.decide(self.fullmatch_at(string, oracle, pos, endpos))
    }

    fn decide<'r, S>(&self, result: Result<Option<Match<'r, S>>>) -> Result<Outcome<'r, S>> {
        match result {
            Ok(found) => Ok(Outcome::Decided(found)),
            Err(Error::Unsupported(construct)) => {
                debug!(
                    "Unable to symbolically analyze regular expression {:?} with flags {:?}: {}",
                    self.pattern, self.flags, construct
                );
                Ok(Outcome::Unsupported(construct))
            }
            Err(err) => Err(err),
        }
    }

    fn run<S, O>(
        &self,
        string: &S,
        oracle: &mut O,
        pos: usize,
        endpos: Option<usize>,
        full: bool,
    ) -> Result<Option<Match<'_, S>>>
    where
        S: SymbolicStr,
        O: Oracle<S::Condition>,
    {
        let Some((pos, endpos)) = window(string, pos, endpos) else {
            return Ok(None);
        };
        let searched = match endpos {
            Some(endpos) => string.truncate(endpos),
            None => string.clone(),
        };

        let mut ast = self.ast.clone();
        let root = if full {
            // anchor the whole pattern, so `a|b` becomes `(?:a|b)\Z` rather than `a|b\Z`
            let body = ast.push(Node::Group {
                index: None,
                body: self.root,
            });
            let anchor = ast.push(Node::Anchor(AnchorKind::EndOfString));
            ast.push_seq(vec![body, anchor])
        } else {
            self.root
        };

        let mut matcher = Matcher::new(ast, &searched, oracle);
        let found = matcher.match_seq(root, self.flags, pos)?;
        Ok(found.map(|found| Match::new(self, string.clone(), pos, endpos, found)))
    }
}

/// Resolves the searched window. `None` when it is empty by construction.
fn window<S: SymbolicStr>(string: &S, pos: usize, endpos: Option<usize>) -> Option<(usize, Option<usize>)> {
    let (pos, endpos) = match string.known_len() {
        Some(len) => (pos.min(len), endpos.map(|endpos| endpos.min(len))),
        None => (pos, endpos),
    };
    match endpos {
        Some(endpos) if endpos < pos => None,
        _ => Some((pos, endpos)),
    }
}

/// Match `regex` against `string` starting at `pos`.
pub fn match_pattern<'r, S, O>(
    regex: &'r Regex,
    string: &S,
    oracle: &mut O,
    pos: usize,
    endpos: Option<usize>,
) -> Result<Option<Match<'r, S>>>
where
    S: SymbolicStr,
    O: Oracle<S::Condition>,
{
    regex.match_at(string, oracle, pos, endpos)
}
