//! Interfaces to the symbolic value layer and the path-exploration oracle.
//!
//! The matcher never inspects characters itself. It describes what it wants to know as a
//! [`Predicate`], the string turns that into a solver condition, and the oracle decides
//! the condition for the current branch.

use std::fmt;

use crate::class::CharClass;
use crate::error::Abort;

/// A question the matcher asks about the string at a concrete offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate<'a> {
    /// There is a character at `offset` and it lies in `class`.
    CharIn { offset: usize, class: &'a CharClass },
    /// Nothing remains at or after `offset`.
    AtEnd { offset: usize },
    /// What remains at `offset` is empty or a single `'\n'`.
    AtEndOrFinalNewline { offset: usize },
}

/// A string whose characters may be unknown.
///
/// Offsets are concrete; only the characters and the length may be symbolic.
pub trait SymbolicStr: Clone {
    /// Solver-level boolean produced from a [`Predicate`].
    type Condition;
    /// Length of the string, concrete or symbolic.
    type Length: From<usize> + Clone + fmt::Debug;

    fn len(&self) -> Self::Length;

    /// The concrete length, when it is known without asking the solver.
    fn known_len(&self) -> Option<usize> {
        None
    }

    /// The prefix ending at `end`, clamped to the string.
    fn truncate(&self, end: usize) -> Self;

    /// The characters in `start..end`, clamped to the string.
    fn substring(&self, start: usize, end: usize) -> Self;

    /// Builds the solver condition for `predicate`.
    fn condition(&self, predicate: Predicate<'_>) -> Self::Condition;
}

/// Resolves a condition for the current execution branch.
///
/// The surrounding search explores the opposite outcome separately; an oracle answers the
/// same way when asked the same question twice on one branch.
pub trait Oracle<C> {
    fn fork(&mut self, condition: C) -> Result<bool, Abort>;
}

impl<C, O: Oracle<C> + ?Sized> Oracle<C> for &mut O {
    fn fork(&mut self, condition: C) -> Result<bool, Abort> {
        (**self).fork(condition)
    }
}
