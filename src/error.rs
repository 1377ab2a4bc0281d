//! Error types.

use thiserror::Error;

use crate::ast::{AnchorKind, Category, RepeatKind};

/// The crate-wide error type.
///
/// "No match" is never an error: matching functions return `Ok(None)` for it. The
/// variants here are the two ways a symbolic attempt can stop early, plus parse and
/// accessor errors:
///
/// - [`Error::Unsupported`] - the pattern uses a construct the symbolic matcher does not
///   model. The caller should fall back to concrete matching.
/// - [`Error::Aborted`] - the oracle gave up on the current path. Nothing here can recover
///   from that; it is passed through untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The pattern text is not a valid regular expression.
    #[error("{message} at position {position}")]
    Parse { message: String, position: usize },

    /// A recognized construct the symbolic matcher cannot handle.
    #[error("unsupported construct: {0}")]
    Unsupported(Construct),

    /// The oracle abandoned the current path.
    #[error(transparent)]
    Aborted(#[from] Abort),

    /// A match accessor was given a group index or name that does not exist.
    #[error("no such group: {0}")]
    NoSuchGroup(String),
}

/// Signal raised by an oracle when it stops exploring, e.g. because the solver ran out of
/// budget.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("path exploration aborted: {reason}")]
pub struct Abort {
    pub reason: String,
}

impl Abort {
    pub fn new(reason: impl Into<String>) -> Self {
        Abort {
            reason: reason.into(),
        }
    }
}

/// A construct the symbolic matcher recognizes but does not model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Construct {
    #[error("case-insensitive matching without the ASCII flag")]
    UnicodeIgnoreCase,
    #[error("wildcard without the ASCII flag")]
    UnicodeWildcard,
    #[error("category {0:?}")]
    Category(Category),
    #[error("negated character set")]
    NegatedSet,
    #[error("{0:?} repeat")]
    Repeat(RepeatKind),
    #[error("anchor {0:?}")]
    Anchor(AnchorKind),
    #[error("start anchor at offset {0}")]
    StartAnchorAfterStart(usize),
    #[error("backreference to group {0}")]
    Backreference(usize),
    #[error("lookaround assertion")]
    Lookaround,
    #[error("atomic group")]
    Atomic,
    #[error("scoped inline flags")]
    ScopedFlags,
    #[error("conditional group")]
    Conditional,
}

pub type Result<T> = std::result::Result<T, Error>;
