//! # tabtree
//!
//! A tab-indented tree format and an in-memory document model for it.
//!
//! ## What is it?
//!
//! Each line of a document holds `key: value, value, ...` entries; leading tabs
//! nest entries under the entry of the line above. Values are strings, booleans,
//! 32-bit integers (decimal, hex or binary) and 32-bit floats. See
//! [`format`] for the full grammar.
//!
//! ## Key Features
//!
//! - **Arena-backed tree**: nodes live in a [`Document`] and are addressed by
//!   [`NodeId`] handles, so parent back-references never form ownership cycles
//! - **Structural invariants**: key/parent consistency, empty-group pruning and
//!   a cycle guard on every insertion
//! - **Path expressions**: `a:b#1:c` style lookups with [`has_path`] and
//!   [`path_through`]
//! - **Canonical output**: parse and write round-trip any tree built through
//!   the API
//! - **Typed errors**: every failure is one of a closed set of [`ErrorKind`]s
//!
//! ## Quick Start
//!
//! ```rust
//! use tabtree::{from_str, to_string, Value};
//!
//! let text = "server: \"primary\", 8080\n\ttls: true";
//! let doc = from_str(text).unwrap();
//!
//! let server = doc.view(doc.root()).node("server", 0).unwrap();
//! assert_eq!(server.value(1).unwrap(), &Value::Int(8080));
//! assert!(server.node("tls", 0).unwrap().value(0).unwrap().as_bool().unwrap());
//!
//! assert_eq!(to_string(&doc).unwrap(), text);
//! ```
//!
//! ### Building Trees
//!
//! ```rust
//! use tabtree::{values, Document, to_string};
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! let user = doc.add_new(root, "user", values!["alice"]).unwrap();
//! doc.add_new(user, "role", values!["admin", "dev"]).unwrap();
//!
//! assert_eq!(to_string(&doc).unwrap(), "user: \"alice\"\n\trole: \"admin\", \"dev\"");
//! ```
//!
//! ## Concurrency
//!
//! Everything is synchronous. Mutation requires `&mut Document`; wrap a
//! document in a lock to share it between writers.

pub mod de;
pub mod error;
pub mod format;
pub mod group;
pub mod macros;
pub mod node;
pub mod options;
pub mod path;
pub mod ser;
pub mod value;
pub mod view;

pub use de::Parser;
pub use error::{Error, ErrorKind, Result};
pub use group::Group;
pub use node::{is_valid_key, Document, NodeId};
pub use options::Options;
pub use path::{has_path, path_through};
pub use ser::Serializer;
pub use value::Value;
pub use view::NodeRef;

use std::io;

/// Parses a document from a string.
///
/// # Examples
///
/// ```rust
/// use tabtree::from_str;
///
/// let doc = from_str("a: 1\nb: 2").unwrap();
/// assert_eq!(doc.count(doc.root()), 2);
/// ```
///
/// # Errors
///
/// Returns a parse error, with line and column, if the input is not valid.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(s: &str) -> Result<Document> {
    Parser::from_str(s).parse()
}

/// Parses a document from a string with custom options.
///
/// # Errors
///
/// Returns a parse error if the input is not valid or nests deeper than
/// `options.max_depth`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options(s: &str, options: Options) -> Result<Document> {
    Parser::with_options(s, &options).parse()
}

/// Parses a document from UTF-8 bytes.
///
/// # Errors
///
/// Returns an invalid argument error if the bytes are not UTF-8, or a parse
/// error if the text is not valid.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(v: &[u8]) -> Result<Document> {
    let s = std::str::from_utf8(v).map_err(Error::invalid_argument)?;
    from_str(s)
}

/// Reads the whole of `reader` and parses it.
///
/// # Examples
///
/// ```rust
/// use tabtree::from_reader;
/// use std::io::Cursor;
///
/// let doc = from_reader(Cursor::new(b"a: 1\n")).unwrap();
/// assert!(doc.contains_key(doc.root(), "a").unwrap());
/// ```
///
/// # Errors
///
/// Returns an I/O error if reading fails, or a parse error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(mut reader: R) -> Result<Document>
where
    R: io::Read,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Renders the document's root.
///
/// # Errors
///
/// Returns an invalid argument error if the tree holds a non-finite float.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(doc: &Document) -> Result<String> {
    node_to_string(doc, doc.root())
}

/// Renders the subtree below `id`, treating `id` as a root: its own key and
/// values are not written.
///
/// # Errors
///
/// Returns an invalid argument error if the subtree holds a non-finite float.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn node_to_string(doc: &Document, id: NodeId) -> Result<String> {
    let mut serializer = Serializer::new();
    serializer.serialize_node(doc, id)?;
    Ok(serializer.into_inner())
}

/// Writes the rendered document followed by `\n`.
///
/// # Examples
///
/// ```rust
/// use tabtree::{from_str, to_writer};
///
/// let doc = from_str("a: 1").unwrap();
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &doc).unwrap();
/// assert_eq!(buffer, b"a: 1\n");
/// ```
///
/// # Errors
///
/// Returns an error if rendering or writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(writer: W, doc: &Document) -> Result<()>
where
    W: io::Write,
{
    to_writer_with_options(writer, doc, &Options::default())
}

/// Writes the rendered document, with the terminator controlled by
/// `options.trailing_newline`.
///
/// # Errors
///
/// Returns an error if rendering or writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W>(mut writer: W, doc: &Document, options: &Options) -> Result<()>
where
    W: io::Write,
{
    let mut text = to_string(doc)?;
    if options.trailing_newline {
        text.push('\n');
    }
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}
