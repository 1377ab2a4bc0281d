//! Fully-known strings and an oracle that simply evaluates conditions.
//!
//! Matching a [`ConcreteStr`] with [`Evaluate`] behaves like an ordinary backtracking
//! matcher. The command-line front end and the tests use it.

use std::fmt;
use std::rc::Rc;

use crate::error::Abort;
use crate::symbolic::{Oracle, Predicate, SymbolicStr};

/// A string with known characters. Cheap to clone and slice.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ConcreteStr {
    chars: Rc<[char]>,
    start: usize,
    end: usize,
}

impl ConcreteStr {
    pub fn new(text: &str) -> Self {
        let chars: Rc<[char]> = text.chars().collect();
        let end = chars.len();
        ConcreteStr {
            chars,
            start: 0,
            end,
        }
    }

    pub fn chars(&self) -> &[char] {
        &self.chars[self.start..self.end]
    }

    pub fn as_string(&self) -> String {
        self.chars().iter().collect()
    }
}

impl From<&str> for ConcreteStr {
    fn from(text: &str) -> Self {
        ConcreteStr::new(text)
    }
}

impl PartialEq<&str> for ConcreteStr {
    fn eq(&self, other: &&str) -> bool {
        self.chars().iter().copied().eq(other.chars())
    }
}

impl fmt::Debug for ConcreteStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_string())
    }
}

impl fmt::Display for ConcreteStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.chars() {
            write!(f, "{}", ch)?;
        }
        Ok(())
    }
}

impl SymbolicStr for ConcreteStr {
    type Condition = bool;
    type Length = usize;

    fn len(&self) -> usize {
        self.end - self.start
    }

    fn known_len(&self) -> Option<usize> {
        Some(self.len())
    }

    fn truncate(&self, end: usize) -> Self {
        self.substring(0, end)
    }

    fn substring(&self, start: usize, end: usize) -> Self {
        let len = self.len();
        let end = end.min(len);
        let start = start.min(end);
        ConcreteStr {
            chars: Rc::clone(&self.chars),
            start: self.start + start,
            end: self.start + end,
        }
    }

    fn condition(&self, predicate: Predicate<'_>) -> bool {
        let chars = self.chars();
        match predicate {
            Predicate::CharIn { offset, class } => {
                chars.get(offset).is_some_and(|&ch| class.contains(ch))
            }
            Predicate::AtEnd { offset } => offset >= chars.len(),
            Predicate::AtEndOrFinalNewline { offset } => {
                offset >= chars.len() || (offset + 1 == chars.len() && chars[offset] == '\n')
            }
        }
    }
}

/// Oracle for already-decided conditions: returns the condition itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluate {
    forks: usize,
}

impl Evaluate {
    pub fn new() -> Self {
        Evaluate::default()
    }

    /// How many decisions have been requested so far.
    pub fn forks(&self) -> usize {
        self.forks
    }
}

impl Oracle<bool> for Evaluate {
    fn fork(&mut self, condition: bool) -> Result<bool, Abort> {
        self.forks += 1;
        Ok(condition)
    }
}
