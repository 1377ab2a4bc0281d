//! Arena-allocated AST for parsed patterns.
//!
//! Nodes and node sequences live in an [`Ast`] arena and refer to each other through
//! [`NodeId`] and [`SeqId`] handles. The arena is append-only: rewriting a sequence
//! allocates new sequences next to the old ones, so every handle stays valid and untouched
//! substructure is shared.

use std::ops::Index;

use crate::flags::Flags;

/// Handle to a node in an [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

/// Handle to a node sequence in an [`Ast`]. Sequence order is match order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeqId(u32);

/// A single node in the pattern AST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Matches a single literal character.
    Literal(char),
    /// Matches one character in `lo..=hi`. Only appears inside a [`Node::Set`].
    Range(char, char),
    /// Character set like `[abc]`, `[a-z\d]` or `[^abc]`. Members are unioned.
    Set { negated: bool, items: Vec<NodeId> },
    /// Shorthand class: `\d`, `\s`, `\w` and their negations.
    Category(Category),
    /// `.`
    Any,
    /// Repetition of `body` between `min` and `max` times; `max == None` is unbounded.
    Repeat {
        min: usize,
        max: Option<usize>,
        kind: RepeatKind,
        body: SeqId,
    },
    /// `a|b|c`; branches are tried in order.
    Alternation(Vec<SeqId>),
    /// Zero-width position assertion.
    Anchor(AnchorKind),
    /// `(...)` when `index` is set, `(?:...)` otherwise.
    Group { index: Option<usize>, body: SeqId },
    /// `\1` or `(?P=name)`.
    Backreference(usize),
    /// `(?=...)`, `(?!...)`, `(?<=...)`, `(?<!...)`.
    Lookaround {
        behind: bool,
        negated: bool,
        body: SeqId,
    },
    /// `(?>...)`
    Atomic(SeqId),
    /// `(?i-s:...)`: `body` matches with `add` set and `remove` cleared.
    ScopedFlags {
        add: Flags,
        remove: Flags,
        body: SeqId,
    },
    /// `(?(1)yes|no)`
    Conditional {
        group: usize,
        yes: SeqId,
        no: Option<SeqId>,
    },
    /// End of capturing group `index` that opened at `start`. Built by the matcher while
    /// splicing a group body into its continuation; never produced by the parser.
    CloseGroup { index: usize, start: usize },
    /// End of one greedy repetition of `body` that began at `start`. `min` and `max` count
    /// the repetitions still owed and allowed. Built by the matcher, like [`Node::CloseGroup`].
    RepeatStep {
        min: usize,
        max: Option<usize>,
        body: SeqId,
        start: usize,
    },
}

/// Shorthand character class kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// `\d`
    Digit,
    /// `\D`
    NotDigit,
    /// `\s`
    Space,
    /// `\S`
    NotSpace,
    /// `\w`
    Word,
    /// `\W`
    NotWord,
}

/// Anchor kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    /// `^`
    Start,
    /// `\A`
    StartOfString,
    /// `$`
    End,
    /// `\Z`
    EndOfString,
    /// `\b`
    WordBoundary,
    /// `\B`
    NonWordBoundary,
}

/// How a repeat trades off against its continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatKind {
    /// `*`, `+`, `?`, `{m,n}`
    Greedy,
    /// `*?`, `+?`, `??`, `{m,n}?`
    Lazy,
    /// `*+`, `++`, `?+`, `{m,n}+`
    Possessive,
}

/// Arena holding every node and sequence of a pattern.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<Node>,
    seqs: Vec<Vec<NodeId>>,
}

impl Ast {
    pub fn new() -> Self {
        Ast::default()
    }

    /// Allocates a node and returns its handle.
    pub fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Allocates a sequence and returns its handle.
    pub fn push_seq(&mut self, items: Vec<NodeId>) -> SeqId {
        let id = SeqId(self.seqs.len() as u32);
        self.seqs.push(items);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn seq(&self, id: SeqId) -> &[NodeId] {
        &self.seqs[id.0 as usize]
    }

    /// Number of nodes allocated so far.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of sequences allocated so far.
    pub fn seq_count(&self) -> usize {
        self.seqs.len()
    }
}

impl Index<NodeId> for Ast {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        self.node(id)
    }
}

impl Index<SeqId> for Ast {
    type Output = [NodeId];

    fn index(&self, id: SeqId) -> &[NodeId] {
        self.seq(id)
    }
}
