//! Same-key sibling groups.
//!
//! A node's children are stored as an insertion-ordered map from key to
//! [`Group`]. Each group lists, in insertion order, the handles of the child
//! nodes recorded under that key. Groups are created lazily by the first
//! insertion under a key and are dropped from their owner the moment they
//! become empty, so a group observed through the public API is never empty.
//!
//! ## Why IndexMap?
//!
//! Serialization walks groups in the order their keys were first inserted.
//! `IndexMap` keeps that order, and `shift_remove` keeps it when a group is
//! pruned.
//!
//! ## Examples
//!
//! ```rust
//! use tabtree::Document;
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! let a = doc.create_node();
//! let b = doc.create_node();
//! doc.add(root, "item", a).unwrap();
//! doc.add(root, "item", b).unwrap();
//!
//! let group = doc.group(root, "item").unwrap();
//! assert_eq!(group.key(), "item");
//! assert_eq!(group.len(), 2);
//! assert_eq!(group.get(1), Some(b));
//! ```

use crate::NodeId;
use indexmap::IndexMap;

/// Child groups of a node, keyed by group key, in first-insertion order.
pub(crate) type Groups = IndexMap<String, Group>;

/// An ordered list of sibling nodes sharing one key under one parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    key: String,
    parent: NodeId,
    members: Vec<NodeId>,
}

impl Group {
    pub(crate) fn new(key: String, parent: NodeId) -> Self {
        Group {
            key,
            parent,
            members: Vec::new(),
        }
    }

    /// The key shared by every member.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The node owning this group.
    #[must_use]
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the group has no members.
    ///
    /// Only transiently true inside the tree's own bookkeeping.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the member at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.members.get(index).copied()
    }

    /// Returns `true` if `node` is a member.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.members.contains(&node)
    }

    /// Returns the position of `node` in this group.
    #[must_use]
    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.members.iter().position(|&m| m == node)
    }

    /// Returns the members in order.
    #[must_use]
    pub fn as_slice(&self) -> &[NodeId] {
        &self.members
    }

    /// Returns an iterator over the members, in order.
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, NodeId>> {
        self.members.iter().copied()
    }

    pub(crate) fn push(&mut self, node: NodeId) {
        self.members.push(node);
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> NodeId {
        self.members.remove(index)
    }

    pub(crate) fn replace(&mut self, index: usize, node: NodeId) -> NodeId {
        std::mem::replace(&mut self.members[index], node)
    }

    pub(crate) fn take_members(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.members)
    }
}

impl<'a> IntoIterator for &'a Group {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
