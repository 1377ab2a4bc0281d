//! Copy-on-write rewriting of node sequences.
//!
//! The matcher builds continuations ("the rest of the pattern, with this repeat shortened"
//! or "with this alternation replaced by one branch") without touching the pattern it is
//! walking. A rewrite copies only the sequences on the path down to the edited node; every
//! other sequence and node handle is reused as is.

use crate::ast::{Ast, Node, NodeId, SeqId};

/// What to do with the target node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// Put another node in its place.
    Replace(NodeId),
    /// Put the contents of a sequence in its place.
    Splice(SeqId),
    /// Remove it.
    Delete,
}

impl Ast {
    /// Returns `seq` with the first occurrence of `target` edited.
    ///
    /// The search is depth-first in sequence order, descending into repeat bodies, group
    /// bodies and alternation branches. When `target` does not occur, `seq` itself is
    /// returned.
    pub fn rewrite(&mut self, seq: SeqId, target: NodeId, edit: Edit) -> SeqId {
        self.rewrite_seq(seq, target, edit).unwrap_or(seq)
    }

    fn rewrite_seq(&mut self, seq: SeqId, target: NodeId, edit: Edit) -> Option<SeqId> {
        let items = self.seq(seq).to_vec();
        for (idx, &item) in items.iter().enumerate() {
            if item == target {
                let mut edited = Vec::with_capacity(items.len());
                edited.extend_from_slice(&items[..idx]);
                match edit {
                    Edit::Replace(node) => edited.push(node),
                    Edit::Splice(with) => edited.extend_from_slice(self.seq(with)),
                    Edit::Delete => {}
                }
                edited.extend_from_slice(&items[idx + 1..]);
                return Some(self.push_seq(edited));
            }
            if let Some(node) = self.rewrite_node(item, target, edit) {
                let mut edited = items.clone();
                edited[idx] = node;
                return Some(self.push_seq(edited));
            }
        }
        None
    }

    /// Rewrites inside the child sequences of `id`, returning a fresh copy of the node.
    fn rewrite_node(&mut self, id: NodeId, target: NodeId, edit: Edit) -> Option<NodeId> {
        let node = match self.node(id).clone() {
            Node::Repeat {
                min,
                max,
                kind,
                body,
            } => {
                let body = self.rewrite_seq(body, target, edit)?;
                Node::Repeat {
                    min,
                    max,
                    kind,
                    body,
                }
            }
            Node::Group { index, body } => {
                let body = self.rewrite_seq(body, target, edit)?;
                Node::Group { index, body }
            }
            Node::Alternation(mut branches) => {
                let (idx, branch) = branches
                    .iter()
                    .enumerate()
                    .find_map(|(idx, &branch)| {
                        self.rewrite_seq(branch, target, edit)
                            .map(|branch| (idx, branch))
                    })?;
                branches[idx] = branch;
                Node::Alternation(branches)
            }
            _ => return None,
        };
        Some(self.push(node))
    }
}
