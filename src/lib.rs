//! Symbolic regular-expression matching.
//!
//! A [`Regex`] is matched against a [`SymbolicStr`], a string whose characters need not be
//! known. Every question about the characters is answered by an [`Oracle`], which lets a
//! path-exploring caller follow each outcome on its own branch. Patterns the matcher cannot
//! express come back as [`Outcome::Unsupported`] so the caller can fall back to matching a
//! concrete string natively.
//!
//! [`ConcreteStr`] and [`Evaluate`] make the same engine usable as an ordinary matcher.

pub mod ast;
pub mod class;
pub mod compiler;
pub mod concrete;
pub mod error;
pub mod flags;
pub mod matcher;
pub mod matches;
pub mod parser;
pub mod regex;
pub mod surgery;
pub mod symbolic;

pub use crate::class::CharClass;
pub use crate::concrete::{ConcreteStr, Evaluate};
pub use crate::error::{Abort, Construct, Error, Result};
pub use crate::flags::Flags;
pub use crate::matches::{Group, GroupRef, Match};
pub use crate::regex::{match_pattern, Outcome, Regex};
pub use crate::symbolic::{Oracle, Predicate, SymbolicStr};
