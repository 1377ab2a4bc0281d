//! Match results.

use std::fmt;
use std::ops::Index;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::matcher::Submatch;
use crate::regex::Regex;
use crate::symbolic::SymbolicStr;

/// Names a group either by number or by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRef<'a> {
    Index(usize),
    Name(&'a str),
}

impl From<usize> for GroupRef<'_> {
    fn from(index: usize) -> Self {
        GroupRef::Index(index)
    }
}

impl<'a> From<&'a str> for GroupRef<'a> {
    fn from(name: &'a str) -> Self {
        GroupRef::Name(name)
    }
}

impl fmt::Display for GroupRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupRef::Index(index) => write!(f, "{}", index),
            GroupRef::Name(name) => write!(f, "{:?}", name),
        }
    }
}

/// One entry of a match: group 0 is the whole match.
///
/// `span` is `None` when the group did not take part in the match, which is different from
/// matching the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<S> {
    pub name: Option<String>,
    pub span: Option<(usize, usize)>,
    pub text: Option<S>,
}

/// A successful match. Immutable once built.
#[derive(Debug, Clone)]
pub struct Match<'r, S> {
    regex: &'r Regex,
    string: S,
    pos: usize,
    endpos: Option<usize>,
    groups: Vec<Group<S>>,
    lastindex: Option<usize>,
}

impl<'r, S: SymbolicStr> Match<'r, S> {
    pub(crate) fn new(
        regex: &'r Regex,
        string: S,
        pos: usize,
        endpos: Option<usize>,
        found: Submatch,
    ) -> Self {
        let mut spans = vec![None; regex.groups() + 1];
        spans[0] = Some((found.start, found.end));
        for capture in &found.captures {
            // a later capture of the same group wins, as with repeated groups
            if let Some(slot) = spans.get_mut(capture.index) {
                *slot = Some((capture.start, capture.end));
            }
        }
        let groups = spans
            .into_iter()
            .enumerate()
            .map(|(index, span)| Group {
                name: regex.group_name(index).map(str::to_owned),
                text: span.map(|(start, end)| string.substring(start, end)),
                span,
            })
            .collect();
        Match {
            regex,
            string,
            pos,
            endpos,
            groups,
            lastindex: found.captures.last().map(|capture| capture.index),
        }
    }
}

impl<'r, S> Match<'r, S> {
    fn resolve(&self, group: GroupRef<'_>) -> Result<usize> {
        let index = match group {
            GroupRef::Index(index) => Some(index),
            GroupRef::Name(name) => self.regex.group_index(name),
        };
        index
            .filter(|&index| index < self.groups.len())
            .ok_or_else(|| Error::NoSuchGroup(group.to_string()))
    }

    /// The text of group `index`, or `None` if it did not participate.
    pub fn group(&self, index: usize) -> Result<Option<&S>> {
        self.get(GroupRef::Index(index))
    }

    /// The text of the group called `name`, or `None` if it did not participate.
    pub fn named(&self, name: &str) -> Result<Option<&S>> {
        self.get(GroupRef::Name(name))
    }

    pub fn get(&self, group: GroupRef<'_>) -> Result<Option<&S>> {
        let index = self.resolve(group)?;
        Ok(self.groups[index].text.as_ref())
    }

    /// The text of `group`, or `default` if it did not participate.
    pub fn group_or<'a>(&'a self, group: GroupRef<'_>, default: &'a S) -> Result<&'a S> {
        Ok(self.get(group)?.unwrap_or(default))
    }

    /// Texts of groups 1 and up, in index order.
    pub fn groups(&self) -> Vec<Option<&S>> {
        self.groups[1..].iter().map(|g| g.text.as_ref()).collect()
    }

    pub fn groups_or<'a>(&'a self, default: &'a S) -> Vec<&'a S> {
        self.groups().into_iter().map(|g| g.unwrap_or(default)).collect()
    }

    /// Named groups, in index order.
    pub fn groupdict(&self) -> IndexMap<&str, Option<&S>> {
        self.groups
            .iter()
            .filter_map(|g| g.name.as_deref().map(|name| (name, g.text.as_ref())))
            .collect()
    }

    pub fn groupdict_or<'a>(&'a self, default: &'a S) -> IndexMap<&'a str, &'a S> {
        self.groupdict()
            .into_iter()
            .map(|(name, text)| (name, text.unwrap_or(default)))
            .collect()
    }

    pub fn span(&self, index: usize) -> Result<Option<(usize, usize)>> {
        self.span_of(GroupRef::Index(index))
    }

    pub fn span_of(&self, group: GroupRef<'_>) -> Result<Option<(usize, usize)>> {
        let index = self.resolve(group)?;
        Ok(self.groups[index].span)
    }

    pub fn start(&self, index: usize) -> Result<Option<usize>> {
        Ok(self.span(index)?.map(|(start, _)| start))
    }

    pub fn end(&self, index: usize) -> Result<Option<usize>> {
        Ok(self.span(index)?.map(|(_, end)| end))
    }

    /// Span of the whole match.
    pub fn full_span(&self) -> (usize, usize) {
        self.groups[0].span.unwrap_or((self.pos, self.pos))
    }

    /// Every entry, group 0 first.
    pub fn entries(&self) -> &[Group<S>] {
        &self.groups
    }

    /// Index of the capturing group that closed last.
    pub fn lastindex(&self) -> Option<usize> {
        self.lastindex
    }

    /// Name of the capturing group that closed last, if it has one.
    pub fn lastgroup(&self) -> Option<&str> {
        self.lastindex
            .and_then(|index| self.groups[index].name.as_deref())
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn regex(&self) -> &'r Regex {
        self.regex
    }

    pub fn string(&self) -> &S {
        &self.string
    }
}

impl<S: SymbolicStr> Match<'_, S> {
    /// End of the searched window: the caller's `endpos`, or the string's length.
    pub fn endpos(&self) -> S::Length {
        match self.endpos {
            Some(endpos) => S::Length::from(endpos),
            None => self.string.len(),
        }
    }
}

impl<S> Index<usize> for Match<'_, S> {
    type Output = Option<S>;

    fn index(&self, index: usize) -> &Option<S> {
        match self.groups.get(index) {
            Some(group) => &group.text,
            None => panic!("no such group: {}", index),
        }
    }
}

impl<S> Index<&str> for Match<'_, S> {
    type Output = Option<S>;

    fn index(&self, name: &str) -> &Option<S> {
        match self.resolve(GroupRef::Name(name)) {
            Ok(index) => &self.groups[index].text,
            Err(err) => panic!("{}", err),
        }
    }
}

impl<S: fmt::Debug> fmt::Display for Match<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (start, end) = self.full_span();
        match &self.groups[0].text {
            Some(text) => write!(f, "<Match span=({}, {}), match={:?}>", start, end, text),
            None => write!(f, "<Match span=({}, {})>", start, end),
        }
    }
}
