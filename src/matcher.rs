//! Recursive matcher: walks a node sequence against a symbolic string.
//!
//! Every node is matched by handing the rest of the sequence to a recursive call as its
//! continuation, so backtracking happens through ordinary returns instead of an explicit
//! stack. Each decision about the string's characters is a [`Predicate`] resolved by the
//! oracle for the current branch.

use log::trace;

use crate::ast::{AnchorKind, Ast, Node, NodeId, RepeatKind, SeqId};
use crate::class::CharClass;
use crate::compiler::{single_char, SingleChar};
use crate::error::{Construct, Error, Result};
use crate::flags::Flags;
use crate::surgery::Edit;
use crate::symbolic::{Oracle, Predicate, SymbolicStr};

/// A capturing group's span, recorded when the group closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture {
    pub index: usize,
    pub start: usize,
    pub end: usize,
}

/// Result of matching a node sequence: the overall span and the captures closed along the
/// way, in the order they closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submatch {
    pub start: usize,
    pub end: usize,
    pub captures: Vec<Capture>,
}

impl Submatch {
    fn span(start: usize, end: usize) -> Self {
        Submatch {
            start,
            end,
            captures: Vec::new(),
        }
    }

    /// Extends `self` over `tail`, which must start where `self` ends.
    fn then(mut self, tail: Submatch) -> Self {
        self.end = tail.end;
        self.captures.extend(tail.captures);
        self
    }
}

/// Matcher state for one match attempt.
///
/// Owns a private copy of the pattern arena: continuations are built by rewriting into it,
/// which only ever appends.
pub struct Matcher<'a, S, O> {
    ast: Ast,
    string: &'a S,
    oracle: &'a mut O,
}

impl<'a, S, O> Matcher<'a, S, O>
where
    S: SymbolicStr,
    O: Oracle<S::Condition>,
{
    pub fn new(ast: Ast, string: &'a S, oracle: &'a mut O) -> Self {
        Matcher {
            ast,
            string,
            oracle,
        }
    }

    /// Mutable access to the arena, for callers that need to wrap the root sequence.
    pub fn ast_mut(&mut self) -> &mut Ast {
        &mut self.ast
    }

    /// Match `seq` starting at `offset`.
    ///
    /// `Ok(None)` means no match on this branch; `Err` means the attempt cannot be decided
    /// symbolically or the oracle aborted.
    pub fn match_seq(&mut self, seq: SeqId, flags: Flags, offset: usize) -> Result<Option<Submatch>> {
        let Some(&head) = self.ast[seq].first() else {
            return Ok(Some(Submatch::span(offset, offset)));
        };

        match single_char(&self.ast, head, flags) {
            SingleChar::Expr(class) => return self.match_char(seq, head, &class, flags, offset),
            SingleChar::Unsupported(construct) => return Err(self.unsupported(construct)),
            SingleChar::NotApplicable => {}
        }

        match self.ast[head].clone() {
            Node::Repeat {
                min,
                max,
                kind: RepeatKind::Greedy,
                body,
            } => self.match_repeat(seq, head, min, max, body, flags, offset),
            Node::Repeat { kind, .. } => Err(self.unsupported(Construct::Repeat(kind))),
            Node::Alternation(branches) => {
                for branch in branches {
                    let path = self.ast.rewrite(seq, head, Edit::Splice(branch));
                    if let Some(found) = self.match_seq(path, flags, offset)? {
                        return Ok(Some(found));
                    }
                }
                Ok(None)
            }
            Node::Group { index, body } => {
                let inner = match index {
                    Some(index) => {
                        let close = self.ast.push(Node::CloseGroup {
                            index,
                            start: offset,
                        });
                        let mut items = self.ast[body].to_vec();
                        items.push(close);
                        self.ast.push_seq(items)
                    }
                    None => body,
                };
                let path = self.ast.rewrite(seq, head, Edit::Splice(inner));
                self.match_seq(path, flags, offset)
            }
            Node::CloseGroup { index, start } => {
                let closed = Submatch {
                    start: offset,
                    end: offset,
                    captures: vec![Capture {
                        index,
                        start,
                        end: offset,
                    }],
                };
                self.continue_after(seq, head, closed, flags)
            }
            Node::RepeatStep {
                min,
                max,
                body,
                start,
            } => self.match_step(seq, head, min, max, body, start, flags, offset),
            Node::Anchor(kind) => self.match_anchor(seq, head, kind, flags, offset),
            Node::Backreference(group) => Err(self.unsupported(Construct::Backreference(group))),
            Node::Lookaround { .. } => Err(self.unsupported(Construct::Lookaround)),
            Node::Atomic(_) => Err(self.unsupported(Construct::Atomic)),
            Node::ScopedFlags { .. } => Err(self.unsupported(Construct::ScopedFlags)),
            Node::Conditional { .. } => Err(self.unsupported(Construct::Conditional)),
            Node::Literal(_) | Node::Range(..) | Node::Set { .. } | Node::Category(_) | Node::Any => {
                unreachable!("single-character nodes always compile")
            }
        }
    }

    /// Matches the rest of `seq` after `head`, which produced `matched`.
    fn continue_after(
        &mut self,
        seq: SeqId,
        head: NodeId,
        matched: Submatch,
        flags: Flags,
    ) -> Result<Option<Submatch>> {
        let rest = self.ast.rewrite(seq, head, Edit::Delete);
        let tail = self.match_seq(rest, flags, matched.end)?;
        Ok(tail.map(|tail| matched.then(tail)))
    }

    fn match_char(
        &mut self,
        seq: SeqId,
        head: NodeId,
        class: &CharClass,
        flags: Flags,
        offset: usize,
    ) -> Result<Option<Submatch>> {
        if self.fork(Predicate::CharIn { offset, class })? {
            self.continue_after(seq, head, Submatch::span(offset, offset + 1), flags)
        } else {
            Ok(None)
        }
    }

    /// Greedy repeat: splice one repetition of `body`, followed by a [`Node::RepeatStep`],
    /// in front of the continuation. Backtracking into the body therefore also revisits
    /// shorter repetitions. Only when no further repetition leads to a match, and `min`
    /// allows it, is the repeat skipped.
    #[allow(clippy::too_many_arguments)]
    fn match_repeat(
        &mut self,
        seq: SeqId,
        head: NodeId,
        min: usize,
        max: Option<usize>,
        body: SeqId,
        flags: Flags,
        offset: usize,
    ) -> Result<Option<Submatch>> {
        if max.is_some_and(|max| max < min) {
            return Ok(None);
        }
        if max == Some(0) {
            return self.continue_after(seq, head, Submatch::span(offset, offset), flags);
        }

        let step = self.ast.push(Node::RepeatStep {
            min: min.saturating_sub(1),
            max: max.map(|max| max - 1),
            body,
            start: offset,
        });
        let mut items = self.ast[body].to_vec();
        items.push(step);
        let iteration = self.ast.push_seq(items);
        let path = self.ast.rewrite(seq, head, Edit::Splice(iteration));
        if let Some(found) = self.match_seq(path, flags, offset)? {
            return Ok(Some(found));
        }
        if min > 0 {
            return Ok(None);
        }
        self.continue_after(seq, head, Submatch::span(offset, offset), flags)
    }

    /// After one repetition: go round again with the remaining counts.
    #[allow(clippy::too_many_arguments)]
    fn match_step(
        &mut self,
        seq: SeqId,
        head: NodeId,
        min: usize,
        max: Option<usize>,
        body: SeqId,
        start: usize,
        flags: Flags,
        offset: usize,
    ) -> Result<Option<Submatch>> {
        if min == 0 && offset == start {
            // an empty repetition would repeat forever; stop here
            return self.continue_after(seq, head, Submatch::span(offset, offset), flags);
        }
        let again = self.ast.push(Node::Repeat {
            min,
            max,
            kind: RepeatKind::Greedy,
            body,
        });
        let path = self.ast.rewrite(seq, head, Edit::Replace(again));
        self.match_seq(path, flags, offset)
    }

    fn match_anchor(
        &mut self,
        seq: SeqId,
        head: NodeId,
        kind: AnchorKind,
        flags: Flags,
        offset: usize,
    ) -> Result<Option<Submatch>> {
        let holds = match kind {
            AnchorKind::EndOfString => self.fork(Predicate::AtEnd { offset })?,
            AnchorKind::End if !flags.contains(Flags::MULTILINE) => {
                self.fork(Predicate::AtEndOrFinalNewline { offset })?
            }
            AnchorKind::Start | AnchorKind::StartOfString if offset == 0 => true,
            AnchorKind::Start | AnchorKind::StartOfString => {
                return Err(self.unsupported(Construct::StartAnchorAfterStart(offset)));
            }
            _ => return Err(self.unsupported(Construct::Anchor(kind))),
        };
        if holds {
            self.continue_after(seq, head, Submatch::span(offset, offset), flags)
        } else {
            Ok(None)
        }
    }

    fn fork(&mut self, predicate: Predicate<'_>) -> Result<bool> {
        let condition = self.string.condition(predicate);
        let outcome = self.oracle.fork(condition)?;
        trace!("fork on {:?}: {}", predicate, outcome);
        Ok(outcome)
    }

    fn unsupported(&self, construct: Construct) -> Error {
        trace!("cannot match symbolically: {}", construct);
        Error::Unsupported(construct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concrete::{ConcreteStr, Evaluate};
    use crate::parser::Parser;

    fn run(pattern: &str, flags: Flags, text: &str, offset: usize) -> Result<Option<Submatch>> {
        let parsed = Parser::new(pattern, flags).parse()?;
        let string = ConcreteStr::new(text);
        let mut oracle = Evaluate::new();
        let mut matcher = Matcher::new(parsed.ast, &string, &mut oracle);
        matcher.match_seq(parsed.root, parsed.flags, offset)
    }

    fn span(pattern: &str, text: &str, offset: usize) -> Option<(usize, usize)> {
        run(pattern, Flags::empty(), text, offset)
            .expect("pattern is supported")
            .map(|m| (m.start, m.end))
    }

    #[test]
    fn empty_sequence_matches_empty_span() {
        assert_eq!(span("", "abc", 2), Some((2, 2)));
    }

    #[test]
    fn literals_in_sequence() {
        assert_eq!(span("ab", "aabb", 1), Some((1, 3)));
        assert_eq!(span("ab", "aabb", 0), None);
    }

    #[test]
    fn greedy_backoff() {
        assert_eq!(span("a+a", "aa", 0), Some((0, 2)));
        assert_eq!(span("a+", "aabb", 0), Some((0, 2)));
        assert_eq!(span("a*ab", "aaab", 0), Some((0, 4)));
    }

    #[test]
    fn bounded_repeats() {
        assert_eq!(span("s{1,2}x", "sssx", 0), None);
        assert_eq!(span("s{1,2}x", "ssx", 0), Some((0, 3)));
        assert_eq!(span("s{2,3}", "ssss", 0), Some((0, 3)));
    }

    #[test]
    fn inverted_repeat_never_matches() {
        let mut ast = Ast::new();
        let a = ast.push(Node::Literal('a'));
        let body = ast.push_seq(vec![a]);
        let repeat = ast.push(Node::Repeat {
            min: 2,
            max: Some(1),
            kind: RepeatKind::Greedy,
            body,
        });
        let root = ast.push_seq(vec![repeat]);
        let string = ConcreteStr::new("aaa");
        let mut oracle = Evaluate::new();
        let mut matcher = Matcher::new(ast, &string, &mut oracle);
        assert_eq!(matcher.match_seq(root, Flags::empty(), 0), Ok(None));
        assert_eq!(oracle.forks(), 0);
    }

    #[test]
    fn empty_body_repeat_terminates() {
        assert_eq!(span("(?:)*a", "a", 0), Some((0, 1)));
        assert_eq!(span("(a*)*b", "aab", 0), Some((0, 3)));
        assert_eq!(span("(b|)*a", "bba", 0), Some((0, 3)));
        assert_eq!(span("(?:a|)+", "aa", 0), Some((0, 2)));
    }

    #[test]
    fn repeat_bodies_backtrack_into_the_continuation() {
        assert_eq!(span("(?:a+)?a", "aa", 0), Some((0, 2)));
        assert_eq!(span("(?:a*){1,2}[ab]", "aa", 0), Some((0, 2)));
        assert_eq!(span("(b|){1,2}(a|b)", "b", 0), Some((0, 1)));
        assert_eq!(span("(a|b)*(a|ab)?(a|ab){2}", "aba", 0), Some((0, 3)));
        assert_eq!(span("(a|ab)+c", "abc", 0), Some((0, 3)));
    }

    #[test]
    fn alternation_prefers_earlier_branch() {
        assert_eq!(span("a|bc", "ab", 0), Some((0, 1)));
        assert_eq!(span("a|bc", "bc", 0), Some((0, 2)));
        assert_eq!(span("(?:ab|a)c", "ac", 0), Some((0, 2)));
    }

    #[test]
    fn captures_close_inner_first() {
        let found = run("(a(b))", Flags::empty(), "ab", 0).unwrap().unwrap();
        assert_eq!(
            found.captures,
            vec![
                Capture { index: 2, start: 1, end: 2 },
                Capture { index: 1, start: 0, end: 2 },
            ]
        );
    }

    #[test]
    fn unsupported_is_not_no_match() {
        assert_eq!(
            run(r"(a)\1", Flags::empty(), "aa", 0),
            Err(Error::Unsupported(Construct::Backreference(1)))
        );
        assert_eq!(
            run("[^a]", Flags::empty(), "b", 0),
            Err(Error::Unsupported(Construct::NegatedSet))
        );
        assert_eq!(
            run("a*?", Flags::empty(), "a", 0),
            Err(Error::Unsupported(Construct::Repeat(RepeatKind::Lazy)))
        );
    }

    #[test]
    fn unsupported_after_a_failed_prefix_is_never_reached() {
        // the oracle refuses `x` before the backreference is looked at
        assert_eq!(run(r"x(a)\1", Flags::empty(), "aa", 0), Ok(None));
    }

    #[test]
    fn anchors() {
        assert_eq!(span(r"abc\Z", "abc", 0), Some((0, 3)));
        assert_eq!(span(r"ab\Z", "abc", 0), None);
        assert_eq!(span("abc$", "abc\n", 0), Some((0, 3)));
        assert_eq!(span("^ab", "abc", 0), Some((0, 2)));
        assert_eq!(
            run("^bc", Flags::empty(), "abc", 1),
            Err(Error::Unsupported(Construct::StartAnchorAfterStart(1)))
        );
        assert_eq!(
            run("abc$", Flags::MULTILINE, "abc", 0),
            Err(Error::Unsupported(Construct::Anchor(AnchorKind::End)))
        );
    }

    #[test]
    fn abort_propagates() {
        struct GiveUp;
        impl Oracle<bool> for GiveUp {
            fn fork(&mut self, _condition: bool) -> std::result::Result<bool, crate::error::Abort> {
                Err(crate::error::Abort::new("budget"))
            }
        }
        let parsed = Parser::new("a", Flags::empty()).parse().unwrap();
        let string = ConcreteStr::new("a");
        let mut oracle = GiveUp;
        let mut matcher = Matcher::new(parsed.ast, &string, &mut oracle);
        assert_eq!(
            matcher.match_seq(parsed.root, parsed.flags, 0),
            Err(Error::Aborted(crate::error::Abort::new("budget")))
        );
    }
}
