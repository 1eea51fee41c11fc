//! Read-only views of tree nodes.
//!
//! [`NodeRef`] pairs a shared borrow of a [`Document`] with a [`NodeId`] and
//! exposes only the non-mutating operations. Two views are equal when they
//! name the same node of the same document, and a view compares equal to the
//! bare handle it wraps.
//!
//! ```rust
//! use tabtree::from_str;
//!
//! let doc = from_str("server: \"a\"\n\tport: 8080").unwrap();
//! let server = doc.view(doc.root()).node("server", 0).unwrap();
//! let port = server.node("port", 0).unwrap();
//!
//! assert_eq!(port.value(0).unwrap().as_int().unwrap(), 8080);
//! assert_eq!(port.parent(), Some(server));
//! assert_eq!(server, server.id());
//! ```

use crate::group::Group;
use crate::{path, Document, NodeId, Result, Value};
use serde::ser::{SerializeMap, SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A read-only view of one node.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(doc: &'a Document, id: NodeId) -> Self {
        NodeRef { doc, id }
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    #[must_use]
    pub fn key(&self) -> Option<&'a str> {
        self.doc.key(self.id)
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.doc.parent(self.id).map(|id| NodeRef::new(self.doc, id))
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.doc.is_root(self.id)
    }

    #[must_use]
    pub fn values(&self) -> &'a [Value] {
        self.doc.values(self.id)
    }

    #[must_use]
    pub fn value_count(&self) -> usize {
        self.doc.value_count(self.id)
    }

    /// See [`Document::value`].
    pub fn value(&self, index: usize) -> Result<&'a Value> {
        self.doc.value(self.id, index)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.doc.count(self.id)
    }

    pub fn groups(&self) -> indexmap::map::Values<'a, String, Group> {
        self.doc.groups(self.id)
    }

    /// See [`Document::group`].
    pub fn group(&self, key: &str) -> Result<&'a Group> {
        self.doc.group(self.id, key)
    }

    /// See [`Document::node`].
    pub fn node(&self, key: &str, index: usize) -> Result<NodeRef<'a>> {
        let id = self.doc.node(self.id, key, index)?;
        Ok(NodeRef::new(self.doc, id))
    }

    /// See [`Document::try_get_node`].
    pub fn try_get_node(&self, key: &str, index: usize) -> Result<Option<NodeRef<'a>>> {
        let found = self.doc.try_get_node(self.id, key, index)?;
        Ok(found.map(|id| NodeRef::new(self.doc, id)))
    }

    /// See [`Document::contains_key`].
    pub fn contains_key(&self, key: &str) -> Result<bool> {
        self.doc.contains_key(self.id, key)
    }

    #[must_use]
    pub fn contains_node(&self, node: impl Into<NodeId>) -> bool {
        self.doc.contains_node(self.id, node.into())
    }

    /// The direct children, group by group.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let doc = self.doc;
        doc.children(self.id).map(move |id| NodeRef::new(doc, id))
    }

    /// See [`path::has_path`].
    pub fn has_path<P: AsRef<str>>(&self, path: &[P]) -> Result<bool> {
        path::has_path(self.doc, self.id, path)
    }

    /// See [`path::path_through`].
    pub fn path_through<P: AsRef<str>>(&self, path: &[P]) -> Result<NodeRef<'a>> {
        let id = path::path_through(self.doc, self.id, path)?;
        Ok(NodeRef::new(self.doc, id))
    }

    /// Renders this node's subtree, see [`crate::node_to_string`].
    pub fn to_text(&self) -> Result<String> {
        crate::node_to_string(self.doc, self.id)
    }

    fn doc_addr(&self) -> usize {
        self.doc as *const Document as usize
    }
}

impl From<NodeRef<'_>> for NodeId {
    fn from(node: NodeRef<'_>) -> Self {
        node.id
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.doc, other.doc)
    }
}

impl Eq for NodeRef<'_> {}

impl PartialEq<NodeId> for NodeRef<'_> {
    fn eq(&self, other: &NodeId) -> bool {
        self.id == *other
    }
}

impl PartialEq<NodeRef<'_>> for NodeId {
    fn eq(&self, other: &NodeRef<'_>) -> bool {
        *self == other.id
    }
}

impl PartialOrd for NodeRef<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeRef<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id
            .cmp(&other.id)
            .then_with(|| self.doc_addr().cmp(&other.doc_addr()))
    }
}

impl PartialOrd<NodeId> for NodeRef<'_> {
    fn partial_cmp(&self, other: &NodeId) -> Option<Ordering> {
        Some(self.id.cmp(other))
    }
}

impl Hash for NodeRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("key", &self.key())
            .finish()
    }
}

/// Serializes the node's children as a map from group key to the list of
/// members, each member as `{ "values": [...], "children": {...} }`.
impl Serialize for NodeRef<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.groups().len()))?;
        for group in self.groups() {
            map.serialize_entry(group.key(), &GroupEntries { doc: self.doc, group })?;
        }
        map.end()
    }
}

struct GroupEntries<'a> {
    doc: &'a Document,
    group: &'a Group,
}

impl Serialize for GroupEntries<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.group.len()))?;
        for member in self.group {
            seq.serialize_element(&Entry(NodeRef::new(self.doc, member)))?;
        }
        seq.end()
    }
}

struct Entry<'a>(NodeRef<'a>);

impl Serialize for Entry<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut entry = serializer.serialize_struct("Entry", 2)?;
        entry.serialize_field("values", self.0.values())?;
        entry.serialize_field("children", &self.0)?;
        entry.end()
    }
}
