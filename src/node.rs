//! The arena-backed tree.
//!
//! A [`Document`] owns every node created through it. Nodes are addressed by
//! copyable [`NodeId`] handles; a node records its key and parent as plain data
//! and its children as [`Group`]s of handles, so the back-reference from child
//! to parent never forms an ownership cycle.
//!
//! ## Invariants
//!
//! - a node has a key exactly when it has a parent
//! - a node belongs to at most one group at a time
//! - no node is its own ancestor
//! - a group is removed from its owner as soon as it becomes empty
//! - every member of a group carries that group's key
//!
//! Nodes are never freed. Removing a node from its parent detaches it; the
//! handle stays valid and the node keeps its values and children.
//!
//! ## Examples
//!
//! ```rust
//! use tabtree::{Document, Value};
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! let server = doc.create_node_with_values(vec![Value::from("primary")]);
//! doc.add(root, "server", server).unwrap();
//!
//! assert_eq!(doc.key(server), Some("server"));
//! assert_eq!(doc.parent(server), Some(root));
//! assert_eq!(doc.count(root), 1);
//!
//! // A node may never be inserted below itself.
//! assert!(doc.add(server, "loop", root).is_err());
//! ```

use crate::group::{Group, Groups};
use crate::{Error, NodeRef, Result, Value};

/// A handle to a node inside a [`Document`].
///
/// Handles are only meaningful for the document that created them; using a
/// handle with another document panics or names an unrelated node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The arena slot of this node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
struct NodeData {
    key: Option<String>,
    parent: Option<NodeId>,
    values: Vec<Value>,
    children: Groups,
}

/// Returns `true` if `ch` may appear in a key.
#[inline]
pub(crate) fn is_key_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '.'
}

/// Returns `true` if `key` is a well-formed key: one or more letters, digits,
/// `_` or `.`, where `.` is neither first nor last.
///
/// # Examples
///
/// ```rust
/// use tabtree::is_valid_key;
///
/// assert!(is_valid_key("net.http_port"));
/// assert!(!is_valid_key(".hidden"));
/// assert!(!is_valid_key("with space"));
/// assert!(!is_valid_key(""));
/// ```
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(is_key_char) && !key.starts_with('.') && !key.ends_with('.')
}

pub(crate) fn validate_key(key: &str) -> Result<()> {
    if is_valid_key(key) {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!("invalid key '{}'", key)))
    }
}

/// An arena of tree nodes with a designated root.
///
/// All operations take the handle of the node they act on as their first
/// argument. Mutations take `&mut self`, so a document has a single writer
/// at a time.
///
/// # Panics
///
/// Every method taking a [`NodeId`] panics if the handle was not created by
/// this document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document holding only an empty root node.
    #[must_use]
    pub fn new() -> Self {
        Document {
            nodes: vec![NodeData::default()],
            root: NodeId(0),
        }
    }

    /// The root node created along with this document.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes ever allocated in this document, attached or not.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Allocates a new detached node with no values and no children.
    pub fn create_node(&mut self) -> NodeId {
        self.nodes.push(NodeData::default());
        NodeId(self.nodes.len() - 1)
    }

    /// Allocates a new detached node holding `values`.
    pub fn create_node_with_values<I>(&mut self, values: I) -> NodeId
    where
        I: IntoIterator<Item = Value>,
    {
        let id = self.create_node();
        self.nodes[id.0].values.extend(values);
        id
    }

    /// Returns a read-only view of `id`.
    #[must_use]
    pub fn view(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef::new(self, id)
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    /// The key under which `id` is stored in its parent, if attached.
    #[must_use]
    pub fn key(&self, id: NodeId) -> Option<&str> {
        self.data(id).key.as_deref()
    }

    /// The node containing `id`, if attached.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    /// Returns `true` if `id` is not linked under another node.
    #[must_use]
    pub fn is_root(&self, id: NodeId) -> bool {
        self.data(id).parent.is_none()
    }

    /// Returns `true` if `ancestor` is `node` or lies on `node`'s parent chain.
    #[must_use]
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.data(id).parent;
        }
        false
    }

    /// The values of `id`, in order.
    #[must_use]
    pub fn values(&self, id: NodeId) -> &[Value] {
        &self.data(id).values
    }

    /// Number of values held by `id`.
    #[must_use]
    pub fn value_count(&self, id: NodeId) -> usize {
        self.data(id).values.len()
    }

    /// Returns the value at `index`.
    ///
    /// # Errors
    ///
    /// Fails with an out of range error unless `index < value_count(id)`.
    pub fn value(&self, id: NodeId, index: usize) -> Result<&Value> {
        let values = &self.data(id).values;
        values
            .get(index)
            .ok_or_else(|| Error::out_of_range("value index", index, values.len()))
    }

    /// Replaces the value at `index`.
    ///
    /// # Errors
    ///
    /// Fails with an out of range error unless `index < value_count(id)`.
    pub fn set_value(&mut self, id: NodeId, index: usize, value: impl Into<Value>) -> Result<()> {
        let values = &mut self.data_mut(id).values;
        let len = values.len();
        let slot = values
            .get_mut(index)
            .ok_or_else(|| Error::out_of_range("value index", index, len))?;
        *slot = value.into();
        Ok(())
    }

    /// Appends a value.
    pub fn add_value(&mut self, id: NodeId, value: impl Into<Value>) {
        self.data_mut(id).values.push(value.into());
    }

    /// Appends every value of `values`, in order.
    pub fn add_value_range<I>(&mut self, id: NodeId, values: I)
    where
        I: IntoIterator<Item = Value>,
    {
        self.data_mut(id).values.extend(values);
    }

    /// Inserts a value before position `index`; `index == value_count(id)`
    /// appends.
    ///
    /// # Errors
    ///
    /// Fails with an out of range error if `index > value_count(id)`.
    pub fn insert_value(
        &mut self,
        id: NodeId,
        index: usize,
        value: impl Into<Value>,
    ) -> Result<()> {
        let values = &mut self.data_mut(id).values;
        if index > values.len() {
            return Err(Error::out_of_range("value index", index, values.len() + 1));
        }
        values.insert(index, value.into());
        Ok(())
    }

    /// Inserts every value of `values` before position `index`, keeping their
    /// order.
    ///
    /// # Errors
    ///
    /// Fails with an out of range error if `index > value_count(id)`.
    pub fn insert_value_range<I>(&mut self, id: NodeId, index: usize, values: I) -> Result<()>
    where
        I: IntoIterator<Item = Value>,
    {
        let current = &mut self.data_mut(id).values;
        if index > current.len() {
            return Err(Error::out_of_range("value index", index, current.len() + 1));
        }
        let _ = current.splice(index..index, values);
        Ok(())
    }

    /// Removes the first value equal to `value`. Returns whether one was found.
    pub fn remove_value(&mut self, id: NodeId, value: &Value) -> bool {
        let values = &mut self.data_mut(id).values;
        match values.iter().position(|v| v == value) {
            Some(index) => {
                values.remove(index);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the value at `index`.
    ///
    /// # Errors
    ///
    /// Fails with an out of range error unless `index < value_count(id)`.
    pub fn remove_value_at(&mut self, id: NodeId, index: usize) -> Result<Value> {
        let values = &mut self.data_mut(id).values;
        if index >= values.len() {
            return Err(Error::out_of_range("value index", index, values.len()));
        }
        Ok(values.remove(index))
    }

    /// Removes `count` values starting at `index`.
    ///
    /// # Errors
    ///
    /// Fails with an out of range error if either `index` or `index + count`
    /// exceeds `value_count(id)`.
    pub fn remove_value_range(&mut self, id: NodeId, index: usize, count: usize) -> Result<()> {
        let values = &mut self.data_mut(id).values;
        let len = values.len();
        if index > len {
            return Err(Error::out_of_range("value index", index, len + 1));
        }
        let end = index.checked_add(count).filter(|&end| end <= len).ok_or_else(|| {
            Error::out_of_range("value range end", index.saturating_add(count), len + 1)
        })?;
        values.drain(index..end);
        Ok(())
    }

    /// Number of direct children of `id`, summed over all groups.
    #[must_use]
    pub fn count(&self, id: NodeId) -> usize {
        self.data(id).children.values().map(Group::len).sum()
    }

    /// The child groups of `id`, in first-insertion order.
    pub fn groups(&self, id: NodeId) -> indexmap::map::Values<'_, String, Group> {
        self.data(id).children.values()
    }

    /// The direct children of `id`, group by group.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.groups(id).flat_map(Group::iter)
    }

    /// Returns the group of children stored under `key`.
    ///
    /// # Errors
    ///
    /// Fails with an invalid argument error for a malformed key and with a
    /// lookup error if no child carries `key`.
    pub fn group(&self, id: NodeId, key: &str) -> Result<&Group> {
        validate_key(key)?;
        self.data(id)
            .children
            .get(key)
            .ok_or_else(|| Error::lookup(key))
    }

    /// Returns the `index`-th child stored under `key`.
    ///
    /// # Errors
    ///
    /// As [`Document::group`], plus an out of range error if the group has
    /// no member at `index`.
    pub fn node(&self, id: NodeId, key: &str, index: usize) -> Result<NodeId> {
        let group = self.group(id, key)?;
        group
            .get(index)
            .ok_or_else(|| Error::out_of_range("group index", index, group.len()))
    }

    /// Returns the `index`-th child stored under `key`, or `None` if there is
    /// no such child.
    ///
    /// # Errors
    ///
    /// Fails only for a malformed key.
    pub fn try_get_node(&self, id: NodeId, key: &str, index: usize) -> Result<Option<NodeId>> {
        validate_key(key)?;
        Ok(self
            .data(id)
            .children
            .get(key)
            .and_then(|group| group.get(index)))
    }

    /// Returns `true` if `id` has at least one child under `key`.
    ///
    /// # Errors
    ///
    /// Fails only for a malformed key.
    pub fn contains_key(&self, id: NodeId, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.data(id).children.contains_key(key))
    }

    /// Returns `true` if `node` is a direct child of `id`.
    #[must_use]
    pub fn contains_node(&self, id: NodeId, node: NodeId) -> bool {
        self.data(node)
            .key
            .as_deref()
            .and_then(|key| self.data(id).children.get(key))
            .map_or(false, |group| group.contains(node))
    }

    fn check_cycle(&self, target: NodeId, node: NodeId) -> Result<()> {
        if self.is_ancestor_or_self(node, target) {
            return Err(Error::cycle(format!(
                "node {} is node {} or one of its ancestors",
                node.0, target.0
            )));
        }
        Ok(())
    }

    /// Unlinks `node` from its parent, pruning the group if it empties.
    fn detach(&mut self, node: NodeId) {
        let data = self.data_mut(node);
        let key = data.key.take();
        let Some(parent) = data.parent.take() else {
            return;
        };
        let Some(key) = key else {
            return;
        };
        let children = &mut self.data_mut(parent).children;
        if let Some(group) = children.get_mut(&key) {
            if let Some(index) = group.position(node) {
                group.remove_at(index);
            }
            if group.is_empty() {
                children.shift_remove(&key);
            }
        }
    }

    fn link(&mut self, parent: NodeId, key: &str, node: NodeId) {
        let data = self.data_mut(node);
        data.key = Some(key.to_string());
        data.parent = Some(parent);
    }

    fn unlink(&mut self, node: NodeId) {
        let data = self.data_mut(node);
        data.key = None;
        data.parent = None;
    }

    /// Appends `node` to the group `key` of `id`, first detaching it from any
    /// previous parent.
    ///
    /// Re-adding a node under the key it already has in `id` moves it to the
    /// end of its group; the group keeps its place among its siblings.
    ///
    /// # Errors
    ///
    /// Fails with an invalid argument error for a malformed key and with a
    /// cycle error if `node` is `id` or one of its ancestors. The tree is left
    /// unchanged on error.
    pub fn add(&mut self, id: NodeId, key: &str, node: NodeId) -> Result<()> {
        validate_key(key)?;
        self.check_cycle(id, node)?;
        if self.data(node).parent == Some(id) && self.data(node).key.as_deref() == Some(key) {
            if let Some(group) = self.data_mut(id).children.get_mut(key) {
                if let Some(index) = group.position(node) {
                    group.remove_at(index);
                    group.push(node);
                }
            }
            return Ok(());
        }
        self.detach(node);
        self.data_mut(id)
            .children
            .entry(key.to_string())
            .or_insert_with(|| Group::new(key.to_string(), id))
            .push(node);
        self.link(id, key, node);
        Ok(())
    }

    /// Creates a node holding `values` and appends it under `key`.
    ///
    /// # Errors
    ///
    /// Fails with an invalid argument error for a malformed key.
    pub fn add_new<I>(&mut self, id: NodeId, key: &str, values: I) -> Result<NodeId>
    where
        I: IntoIterator<Item = Value>,
    {
        validate_key(key)?;
        let node = self.create_node_with_values(values);
        self.add(id, key, node)?;
        Ok(node)
    }

    /// Puts `other` at position `index` of the group `key`, detaching the
    /// node previously there.
    ///
    /// # Errors
    ///
    /// As [`Document::node`], plus a cycle error if `other` is `id` or one of
    /// its ancestors. The tree is left unchanged on error.
    pub fn set_node(&mut self, id: NodeId, key: &str, index: usize, other: NodeId) -> Result<()> {
        let old = self.node(id, key, index)?;
        self.check_cycle(id, other)?;
        if old == other {
            return Ok(());
        }
        self.detach(other);
        let group = self
            .data_mut(id)
            .children
            .get_mut(key)
            .ok_or_else(|| Error::lookup(key))?;
        let position = group.position(old).ok_or_else(|| Error::lookup(key))?;
        group.replace(position, other);
        self.unlink(old);
        self.link(id, key, other);
        Ok(())
    }

    /// Removes `node` from the children of `id`. Returns whether it was a
    /// child.
    pub fn remove(&mut self, id: NodeId, node: NodeId) -> bool {
        if !self.contains_node(id, node) {
            return false;
        }
        self.detach(node);
        true
    }

    /// Removes every child stored under `key`. Returns whether the key was
    /// present.
    ///
    /// # Errors
    ///
    /// Fails only for a malformed key.
    pub fn remove_key(&mut self, id: NodeId, key: &str) -> Result<bool> {
        validate_key(key)?;
        let Some(mut group) = self.data_mut(id).children.shift_remove(key) else {
            return Ok(false);
        };
        for member in group.take_members() {
            self.unlink(member);
        }
        Ok(true)
    }

    /// Removes and returns the `index`-th child stored under `key`.
    ///
    /// # Errors
    ///
    /// As [`Document::node`].
    pub fn remove_at(&mut self, id: NodeId, key: &str, index: usize) -> Result<NodeId> {
        let node = self.node(id, key, index)?;
        self.detach(node);
        Ok(node)
    }

    /// Detaches every direct child of `id`. Grandchildren stay attached to
    /// their own parents.
    pub fn clear(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.data_mut(id).children);
        for group in children.values() {
            for member in group {
                self.unlink(member);
            }
        }
    }

    /// Compares the subtree at `id` with the subtree at `other_id` in `other`.
    ///
    /// Values and child groups are compared recursively, in order; the keys of
    /// `id` and `other_id` themselves are not compared.
    #[must_use]
    pub fn deep_eq(&self, id: NodeId, other: &Document, other_id: NodeId) -> bool {
        let (a, b) = (self.data(id), other.data(other_id));
        a.values == b.values
            && a.children.len() == b.children.len()
            && a.children.iter().zip(b.children.iter()).all(|((ka, ga), (kb, gb))| {
                ka == kb
                    && ga.len() == gb.len()
                    && ga
                        .iter()
                        .zip(gb.iter())
                        .all(|(x, y)| self.deep_eq(x, other, y))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn assert_key_parent_invariant(doc: &Document) {
        for index in 0..doc.node_count() {
            let id = NodeId(index);
            assert_eq!(
                doc.key(id).is_none(),
                doc.parent(id).is_none(),
                "node {}",
                index
            );
        }
    }

    #[test]
    fn test_add_links_and_groups() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_node();
        let b = doc.create_node();
        let c = doc.create_node();
        doc.add(root, "item", a).unwrap();
        doc.add(root, "other", c).unwrap();
        doc.add(root, "item", b).unwrap();

        assert_eq!(doc.count(root), 3);
        assert_eq!(doc.node(root, "item", 1).unwrap(), b);
        let keys: Vec<_> = doc.groups(root).map(Group::key).collect();
        assert_eq!(keys, vec!["item", "other"]);
        assert_eq!(doc.children(root).collect::<Vec<_>>(), vec![a, b, c]);
        assert_key_parent_invariant(&doc);
    }

    #[test]
    fn test_add_rejects_bad_keys() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_node();
        for key in ["", ".a", "a.", "a b", "a:b", "a#1"] {
            let err = doc.add(root, key, a).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "key {:?}", key);
        }
        assert!(doc.add(root, "a.b_9", a).is_ok());
    }

    #[test]
    fn test_add_moves_between_parents() {
        let mut doc = Document::new();
        let root = doc.root();
        let first = doc.add_new(root, "first", vec![]).unwrap();
        let second = doc.add_new(root, "second", vec![]).unwrap();
        let child = doc.add_new(first, "child", vec![Value::Int(1)]).unwrap();

        doc.add(second, "moved", child).unwrap();
        assert!(!doc.contains_key(first, "child").unwrap());
        assert_eq!(doc.parent(child), Some(second));
        assert_eq!(doc.key(child), Some("moved"));
        assert_eq!(doc.count(first), 0);
        assert_key_parent_invariant(&doc);
    }

    #[test]
    fn test_re_adding_under_same_parent_moves_to_end() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.add_new(root, "k", vec![]).unwrap();
        let b = doc.add_new(root, "k", vec![]).unwrap();
        doc.add(root, "k", a).unwrap();
        assert_eq!(doc.group(root, "k").unwrap().as_slice(), &[b, a]);
    }

    #[test]
    fn test_re_adding_sole_member_keeps_group_position() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.add_new(root, "a", vec![Value::Int(1)]).unwrap();
        doc.add_new(root, "b", vec![Value::Int(2)]).unwrap();

        doc.add(root, "a", a).unwrap();

        let keys: Vec<_> = doc.groups(root).map(Group::key).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(doc.parent(a), Some(root));
        assert_eq!(doc.key(a), Some("a"));
        assert_eq!(crate::to_string(&doc).unwrap(), "a: 1\nb: 2");
        assert_key_parent_invariant(&doc);
    }

    #[test]
    fn test_cycle_guard_self_and_ancestors() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.add_new(root, "a", vec![]).unwrap();
        let b = doc.add_new(a, "b", vec![]).unwrap();
        let c = doc.add_new(b, "c", vec![]).unwrap();

        for (target, node) in [(a, a), (c, a), (c, b), (b, root), (c, root)] {
            let err = doc.add(target, "x", node).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Cycle);
        }
        // unchanged
        assert_eq!(doc.parent(a), Some(root));
        assert_eq!(doc.parent(b), Some(a));
        assert_eq!(doc.count(c), 0);
        assert!(!doc.contains_key(c, "x").unwrap());

        // moving a descendant upward is fine
        doc.add(root, "c", c).unwrap();
        assert_eq!(doc.parent(c), Some(root));
        assert_eq!(doc.count(b), 0);
    }

    #[test]
    fn test_set_node_replaces_and_guards() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.add_new(root, "k", vec![]).unwrap();
        let b = doc.add_new(root, "k", vec![]).unwrap();
        let loose = doc.create_node();

        doc.set_node(root, "k", 0, loose).unwrap();
        assert_eq!(doc.group(root, "k").unwrap().as_slice(), &[loose, b]);
        assert!(doc.is_root(a));
        assert_eq!(doc.key(a), None);
        assert_eq!(doc.key(loose), Some("k"));

        // reassigning a sibling from the same group
        doc.set_node(root, "k", 1, loose).unwrap();
        assert_eq!(doc.group(root, "k").unwrap().as_slice(), &[loose]);
        assert!(doc.is_root(b));

        let err = doc.set_node(loose, "k", 0, root).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
        let inner = doc.add_new(loose, "k", vec![]).unwrap();
        let err = doc.set_node(loose, "k", 0, root).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cycle);
        assert_eq!(doc.parent(inner), Some(loose));

        let err = doc.set_node(root, "k", 5, a).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert_key_parent_invariant(&doc);
    }

    #[test]
    fn test_removal_detaches_and_prunes() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.add_new(root, "k", vec![]).unwrap();
        let b = doc.add_new(root, "k", vec![]).unwrap();
        let c = doc.add_new(root, "solo", vec![]).unwrap();

        assert!(doc.remove(root, a));
        assert!(!doc.remove(root, a));
        assert!(doc.is_root(a) && doc.key(a).is_none());
        assert!(doc.contains_key(root, "k").unwrap());

        assert_eq!(doc.remove_at(root, "k", 0).unwrap(), b);
        assert!(!doc.contains_key(root, "k").unwrap());
        assert_eq!(doc.group(root, "k").unwrap_err().kind(), ErrorKind::Lookup);

        assert!(doc.remove_key(root, "solo").unwrap());
        assert!(!doc.remove_key(root, "solo").unwrap());
        assert!(doc.is_root(c));
        assert_eq!(doc.count(root), 0);
        assert_key_parent_invariant(&doc);
    }

    #[test]
    fn test_remove_ignores_foreign_nodes() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.add_new(root, "k", vec![]).unwrap();
        let other = doc.add_new(root, "other", vec![]).unwrap();
        let nested = doc.add_new(other, "k", vec![]).unwrap();

        assert!(!doc.contains_node(root, nested));
        assert!(!doc.remove(root, nested));
        assert_eq!(doc.parent(nested), Some(other));
        assert!(doc.contains_node(root, a));
    }

    #[test]
    fn test_clear_is_one_level_deep() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.add_new(root, "a", vec![]).unwrap();
        let b = doc.add_new(root, "b", vec![]).unwrap();
        let grandchild = doc.add_new(a, "g", vec![]).unwrap();

        doc.clear(root);
        assert_eq!(doc.count(root), 0);
        assert!(doc.is_root(a) && doc.is_root(b));
        assert_eq!(doc.parent(grandchild), Some(a));
        assert_key_parent_invariant(&doc);
    }

    #[test]
    fn test_lookups_never_fail_for_absence() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.add_new(root, "k", vec![]).unwrap();

        assert_eq!(doc.try_get_node(root, "k", 1).unwrap(), None);
        assert_eq!(doc.try_get_node(root, "missing", 0).unwrap(), None);
        assert!(doc.try_get_node(root, "k", 0).unwrap().is_some());
        assert!(!doc.contains_key(root, "missing").unwrap());
        assert!(doc.contains_key(root, "bad key").is_err());
        assert!(doc.try_get_node(root, ".k", 0).is_err());
    }

    #[test]
    fn test_value_list_operations() {
        let mut doc = Document::new();
        let n = doc.create_node();
        doc.add_value(n, 1);
        doc.add_value_range(n, vec![Value::Int(2), Value::Int(3)]);
        doc.insert_value(n, 0, "first").unwrap();
        doc.insert_value(n, 4, true).unwrap();
        doc.insert_value_range(n, 1, vec![Value::Float(0.5), Value::Float(1.5)]).unwrap();
        assert_eq!(
            doc.values(n),
            &[
                Value::from("first"),
                Value::Float(0.5),
                Value::Float(1.5),
                Value::Int(1),
                Value::Int(2),
                Value::Int(3),
                Value::Bool(true),
            ]
        );

        assert!(doc.remove_value(n, &Value::Int(2)));
        assert!(!doc.remove_value(n, &Value::Int(42)));
        assert_eq!(doc.remove_value_at(n, 0).unwrap(), Value::from("first"));
        doc.remove_value_range(n, 1, 2).unwrap();
        assert_eq!(
            doc.values(n),
            &[Value::Float(0.5), Value::Int(3), Value::Bool(true)]
        );

        doc.set_value(n, 2, false).unwrap();
        assert_eq!(doc.value(n, 2).unwrap(), &Value::Bool(false));
        assert_eq!(doc.value_count(n), 3);
    }

    #[test]
    fn test_value_bounds() {
        let mut doc = Document::new();
        let n = doc.create_node_with_values(vec![Value::Int(1), Value::Int(2)]);

        let out_of_range = |r: Result<()>| r.unwrap_err().kind() == ErrorKind::OutOfRange;
        assert!(doc.value(n, 2).is_err());
        assert!(out_of_range(doc.set_value(n, 2, 0)));
        assert!(out_of_range(doc.insert_value(n, 3, 0)));
        assert!(out_of_range(doc.insert_value_range(n, 3, vec![])));
        assert!(doc.remove_value_at(n, 2).is_err());
        assert!(out_of_range(doc.remove_value_range(n, 3, 0)));
        assert!(out_of_range(doc.remove_value_range(n, 1, 2)));
        assert!(out_of_range(doc.remove_value_range(n, 1, usize::MAX)));

        doc.remove_value_range(n, 2, 0).unwrap();
        doc.remove_value_range(n, 0, 2).unwrap();
        assert_eq!(doc.value_count(n), 0);
    }

    #[test]
    fn test_deep_eq() {
        let mut left = Document::new();
        let mut right = Document::new();
        for doc in [&mut left, &mut right] {
            let root = doc.root();
            let a = doc.add_new(root, "a", vec![Value::Int(1)]).unwrap();
            doc.add_new(a, "b", vec![Value::from("x")]).unwrap();
        }
        assert!(left.deep_eq(left.root(), &right, right.root()));

        let root = right.root();
        right.add_new(root, "a", vec![]).unwrap();
        assert!(!left.deep_eq(left.root(), &right, right.root()));
    }
}
