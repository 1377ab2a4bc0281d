//! Compiler: turns single-character AST nodes into [`CharClass`] expressions.

use crate::ast::{Ast, Category, Node, NodeId};
use crate::class::CharClass;
use crate::error::Construct;
use crate::flags::Flags;

/// Outcome of compiling one node as a single-character expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SingleChar {
    /// The node consumes exactly one character from this class.
    Expr(CharClass),
    /// The node is not a single-character construct; the matcher handles it otherwise.
    NotApplicable,
    /// The node is single-character, but cannot be expressed under these flags.
    Unsupported(Construct),
}

/// Compile `node` into a one-character expression, if it is one.
pub fn single_char(ast: &Ast, node: NodeId, flags: Flags) -> SingleChar {
    match compile(ast, node, flags) {
        Ok(Some(class)) => SingleChar::Expr(class),
        Ok(None) => SingleChar::NotApplicable,
        Err(construct) => SingleChar::Unsupported(construct),
    }
}

fn compile(ast: &Ast, node: NodeId, flags: Flags) -> Result<Option<CharClass>, Construct> {
    let class = match ast[node] {
        Node::Literal(ch) => fold_case(ch, ch, flags)?,
        Node::Range(lo, hi) => fold_case(lo, hi, flags)?,
        Node::Set { negated: true, .. } => return Err(Construct::NegatedSet),
        Node::Set {
            negated: false,
            ref items,
        } => {
            let mut members = Vec::with_capacity(items.len());
            for &item in items {
                // set members are always single-character
                members.push(compile(ast, item, flags)?.unwrap_or_default());
            }
            CharClass::union_all(members)
        }
        Node::Category(category) => category_class(category, flags)?,
        Node::Any => {
            if !flags.contains(Flags::ASCII) {
                return Err(Construct::UnicodeWildcard);
            }
            let all = CharClass::range('\0', '\u{ff}');
            if flags.contains(Flags::DOTALL) {
                all
            } else {
                all.without('\n')
            }
        }
        _ => return Ok(None),
    };
    Ok(Some(class))
}

/// `lo..=hi`, plus the other case of every ASCII letter inside it.
fn fold_case(lo: char, hi: char, flags: Flags) -> Result<CharClass, Construct> {
    let range = CharClass::range(lo, hi);
    if !flags.contains(Flags::IGNORECASE) {
        return Ok(range);
    }
    if !flags.ascii_ignorecase() {
        return Err(Construct::UnicodeIgnoreCase);
    }
    let mut folded = vec![range];
    for (first, last) in [('a', 'z'), ('A', 'Z')] {
        let (from, to) = (lo.max(first), hi.min(last));
        if from <= to {
            folded.push(CharClass::range(swap_case(from), swap_case(to)));
        }
    }
    Ok(CharClass::union_all(folded))
}

fn swap_case(ch: char) -> char {
    if ch.is_ascii_lowercase() {
        ch.to_ascii_uppercase()
    } else {
        ch.to_ascii_lowercase()
    }
}

fn category_class(category: Category, flags: Flags) -> Result<CharClass, Construct> {
    if !flags.contains(Flags::ASCII) {
        return Err(Construct::Category(category));
    }
    match category {
        Category::Digit => Ok(CharClass::range('0', '9')),
        // \t \n \v \f \r and space
        Category::Space => Ok(CharClass::union(
            &CharClass::range('\t', '\r'),
            &CharClass::single(' '),
        )),
        _ => Err(Construct::Category(category)),
    }
}
