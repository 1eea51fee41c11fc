//! Path expressions.
//!
//! A path is a list of elements. Each element is a colon-separated chain of
//! segments, and each segment is a key optionally followed by `#<N>` to pick
//! the `N`-th sibling under that key (default `0`). The elements are walked in
//! order, so `["a:b", "c#2"]` and `["a", "b", "c#2"]` name the same node.
//!
//! ```rust
//! use tabtree::{from_str, has_path, path_through};
//!
//! let doc = from_str("node1:\n\tempty_node:\n\tempty_node:").unwrap();
//! let root = doc.root();
//!
//! assert!(has_path(&doc, root, &["node1:empty_node#1"]).unwrap());
//! assert!(!has_path(&doc, root, &["node1:empty_node#2"]).unwrap());
//! assert!(path_through(&doc, root, &["node1:empty_node#2"]).is_err());
//! ```

use crate::node::validate_key;
use crate::{Document, Error, ErrorKind, NodeId, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment<'p> {
    key: &'p str,
    index: usize,
}

fn parse_segment(text: &str) -> Result<Segment<'_>> {
    let (key, index) = match text.split_once('#') {
        Some((key, digits)) => {
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::invalid_argument(format!(
                    "invalid sibling index in path segment '{}'",
                    text
                )));
            }
            // too large to exist, so it reads as past the end of any group
            let index = digits.parse::<usize>().unwrap_or(usize::MAX);
            (key, index)
        }
        None => (text, 0),
    };
    validate_key(key)?;
    Ok(Segment { key, index })
}

fn parse_path<P: AsRef<str>>(path: &[P]) -> Result<Vec<Segment<'_>>> {
    let mut segments = Vec::new();
    for element in path {
        for text in element.as_ref().split(':') {
            segments.push(parse_segment(text)?);
        }
    }
    Ok(segments)
}

fn walk(doc: &Document, root: NodeId, segments: &[Segment<'_>]) -> Result<NodeId> {
    let mut current = root;
    for segment in segments {
        current = doc.node(current, segment.key, segment.index)?;
        log::trace!(
            "path step {}#{} -> node {}",
            segment.key,
            segment.index,
            current.index()
        );
    }
    Ok(current)
}

/// Returns whether `path` leads from `root` to an existing node.
///
/// # Errors
///
/// Fails with an invalid argument error if any segment is malformed, even
/// one after a missing key. Absence is reported as `Ok(false)`.
pub fn has_path<P: AsRef<str>>(doc: &Document, root: NodeId, path: &[P]) -> Result<bool> {
    let segments = parse_path(path)?;
    match walk(doc, root, &segments) {
        Ok(_) => Ok(true),
        Err(e) if matches!(e.kind(), ErrorKind::Lookup | ErrorKind::OutOfRange) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Follows `path` from `root` and returns the node it names.
///
/// # Errors
///
/// Fails with an invalid argument error for malformed syntax, a lookup error
/// for a missing key and an out of range error for a missing sibling index.
pub fn path_through<P: AsRef<str>>(doc: &Document, root: NodeId, path: &[P]) -> Result<NodeId> {
    let segments = parse_path(path)?;
    walk(doc, root, &segments)
}
