//! A small path explorer for unknown strings of a fixed length.
//!
//! Characters range over `\0..=\xff`. Each run replays a prefix of earlier decisions, takes
//! the `true` side of every new feasible condition, and records which choices can still be
//! flipped. Runs continue depth-first until every feasible path has been visited.

#![allow(dead_code)]

use std::collections::BTreeMap;

use symbolic_regex::{Abort, CharClass, Oracle, Predicate, SymbolicStr};

/// An unknown string of `len` characters, viewed from `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymChars {
    start: usize,
    len: usize,
}

impl SymChars {
    pub fn new(len: usize) -> Self {
        SymChars { start: 0, len }
    }
}

#[derive(Debug, Clone)]
pub enum Cond {
    Const(bool),
    In { pos: usize, class: CharClass },
}

impl SymbolicStr for SymChars {
    type Condition = Cond;
    type Length = usize;

    fn len(&self) -> usize {
        self.len
    }

    fn truncate(&self, end: usize) -> Self {
        self.substring(0, end)
    }

    fn substring(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.len);
        let start = start.min(end);
        SymChars {
            start: self.start + start,
            len: end - start,
        }
    }

    fn condition(&self, predicate: Predicate<'_>) -> Cond {
        match predicate {
            Predicate::CharIn { offset, class } if offset < self.len => Cond::In {
                pos: self.start + offset,
                class: class.clone(),
            },
            Predicate::CharIn { .. } => Cond::Const(false),
            Predicate::AtEnd { offset } => Cond::Const(offset >= self.len),
            Predicate::AtEndOrFinalNewline { offset } => match self.len.saturating_sub(offset) {
                0 => Cond::Const(true),
                1 => Cond::In {
                    pos: self.start + offset,
                    class: CharClass::single('\n'),
                },
                _ => Cond::Const(false),
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Decision {
    taken: bool,
    flippable: bool,
}

/// Oracle for one run of the search.
#[derive(Debug, Default)]
pub struct Explorer {
    forced: Vec<bool>,
    trail: Vec<Decision>,
    constraints: BTreeMap<usize, Vec<(CharClass, bool)>>,
}

impl Explorer {
    fn replaying(forced: Vec<bool>) -> Self {
        Explorer {
            forced,
            ..Explorer::default()
        }
    }

    fn satisfiable(facts: &[(CharClass, bool)]) -> bool {
        (0u8..=255)
            .map(char::from)
            .any(|ch| facts.iter().all(|(class, holds)| class.contains(ch) == *holds))
    }

    fn feasible(&self, pos: usize, class: &CharClass, holds: bool) -> bool {
        let mut facts = self.constraints.get(&pos).cloned().unwrap_or_default();
        facts.push((class.clone(), holds));
        Self::satisfiable(&facts)
    }

    /// Whether this path allows `ch` at `pos`.
    pub fn admits(&self, pos: usize, ch: char) -> bool {
        self.constraints
            .get(&pos)
            .is_none_or(|facts| facts.iter().all(|(class, holds)| class.contains(ch) == *holds))
    }

    /// Every character this path allows at `pos`.
    pub fn admitted(&self, pos: usize) -> Vec<char> {
        (0u8..=255).map(char::from).filter(|&ch| self.admits(pos, ch)).collect()
    }

    fn next_prefix(&self) -> Option<Vec<bool>> {
        let flip = self.trail.iter().rposition(|d| d.taken && d.flippable)?;
        let mut prefix: Vec<bool> = self.trail[..flip].iter().map(|d| d.taken).collect();
        prefix.push(false);
        Some(prefix)
    }
}

impl Oracle<Cond> for Explorer {
    fn fork(&mut self, condition: Cond) -> Result<bool, Abort> {
        let (pos, class) = match condition {
            Cond::Const(value) => return Ok(value),
            Cond::In { pos, class } => (pos, class),
        };
        let can_hold = self.feasible(pos, &class, true);
        let can_fail = self.feasible(pos, &class, false);
        let taken = match self.forced.get(self.trail.len()) {
            Some(&forced) => forced,
            None => can_hold,
        };
        if (taken && !can_hold) || (!taken && !can_fail) {
            return Err(Abort::new("replayed an infeasible decision"));
        }
        self.trail.push(Decision {
            taken,
            flippable: taken && can_fail,
        });
        self.constraints.entry(pos).or_default().push((class, taken));
        Ok(taken)
    }
}

/// Runs `body` once per feasible path. Returns the number of paths.
pub fn for_each_path(mut body: impl FnMut(&mut Explorer)) -> usize {
    let mut forced = Vec::new();
    let mut paths = 0;
    loop {
        let mut explorer = Explorer::replaying(forced);
        body(&mut explorer);
        paths += 1;
        match explorer.next_prefix() {
            Some(prefix) => forced = prefix,
            None => return paths,
        }
    }
}

/// Whether `body` returns `true` on some feasible path.
pub fn any_path(mut body: impl FnMut(&mut Explorer) -> bool) -> bool {
    let mut forced = Vec::new();
    loop {
        let mut explorer = Explorer::replaying(forced);
        if body(&mut explorer) {
            return true;
        }
        match explorer.next_prefix() {
            Some(prefix) => forced = prefix,
            None => return false,
        }
    }
}
