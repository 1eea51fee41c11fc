//! Rendering trees to text.
//!
//! The [`Serializer`] walks a node's children in pre-order. Every child
//! becomes one line: its depth in tabs, its key and a colon, then its values
//! separated by `", "`. The node the walk starts from contributes no line of
//! its own, so a root's values are never written.
//!
//! Output is canonical: comments, blank lines and the original spelling of
//! literals are not preserved, and the final line carries no terminator.
//!
//! ```rust
//! use tabtree::{Document, Value, to_string};
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! let list = doc.add_new(root, "list", vec![Value::from("a"), Value::Int(2)]).unwrap();
//! doc.add_new(list, "flag", vec![Value::Bool(true)]).unwrap();
//!
//! assert_eq!(to_string(&doc).unwrap(), "list: \"a\", 2\n\tflag: true");
//! ```

use crate::{Document, Error, NodeId, Result, Value};

/// Renders node trees into a string buffer.
pub struct Serializer {
    output: String,
    lines: usize,
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Serializer {
    #[must_use]
    pub fn new() -> Self {
        Serializer {
            output: String::with_capacity(256),
            lines: 0,
        }
    }

    /// Returns the rendered text without its final newline.
    #[must_use]
    pub fn into_inner(mut self) -> String {
        if self.output.ends_with('\n') {
            self.output.pop();
        }
        self.output
    }

    /// Appends the subtree below `id` to the output.
    ///
    /// # Errors
    ///
    /// Fails with an invalid argument error if the subtree holds a non-finite
    /// float, which has no literal.
    pub fn serialize_node(&mut self, doc: &Document, id: NodeId) -> Result<()> {
        self.write_children(doc, id, 0)?;
        log::debug!(
            "serialized {} line(s) below node {}",
            self.lines,
            id.index()
        );
        Ok(())
    }

    fn write_children(&mut self, doc: &Document, id: NodeId, depth: usize) -> Result<()> {
        for group in doc.groups(id) {
            for member in group {
                for _ in 0..depth {
                    self.output.push('\t');
                }
                self.output.push_str(group.key());
                self.output.push(':');
                for (i, value) in doc.values(member).iter().enumerate() {
                    if let Value::Float(f) = value {
                        if !f.is_finite() {
                            return Err(Error::invalid_argument(format!(
                                "cannot write non-finite float {} under key '{}'",
                                f,
                                group.key()
                            )));
                        }
                    }
                    self.output.push_str(if i == 0 { " " } else { ", " });
                    write_literal(&mut self.output, value);
                }
                self.output.push('\n');
                self.lines += 1;
                self.write_children(doc, member, depth + 1)?;
            }
        }
        Ok(())
    }
}

/// Appends the literal form of `value`. Non-finite floats come out as `inf`
/// or `NaN`, which the parser rejects.
pub(crate) fn write_literal(out: &mut String, value: &Value) {
    match value {
        Value::String(s) => write_string(out, s),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::Float(f) => write_float(out, *f),
    }
}

fn write_float(out: &mut String, f: f32) {
    let magnitude = f.abs();
    if magnitude != 0.0 && (magnitude >= 1e16 || magnitude < 1e-5) {
        out.push_str(&format!("{:e}", f));
        return;
    }
    let text = f.to_string();
    out.push_str(&text);
    // keep it a float on the way back in
    if f.is_finite() && !text.contains('.') {
        out.push_str(".0");
    }
}

#[inline]
fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\0"),
            '\u{0007}' => out.push_str("\\a"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{000B}' => out.push_str("\\v"),
            ' '..='~' => out.push(ch),
            _ => {
                // above U+FFFF this writes a surrogate pair
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units).iter() {
                    out.push_str(&format!("\\u{:04X}", unit));
                }
            }
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn literal(value: Value) -> String {
        let mut out = String::new();
        write_literal(&mut out, &value);
        out
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(literal(Value::from("plain text")), "\"plain text\"");
        assert_eq!(literal(Value::from("q\"b\\")), r#""q\"b\\""#);
        assert_eq!(
            literal(Value::from("\0\u{7}\u{8}\u{c}\n\r\t\u{b}")),
            r#""\0\a\b\f\n\r\t\v""#
        );
        assert_eq!(literal(Value::from("é")), r#""\u00E9""#);
        assert_eq!(literal(Value::from("\u{1b}")), r#""\u001B""#);
        assert_eq!(literal(Value::from("\u{7f}")), r#""\u007F""#);
        assert_eq!(literal(Value::from("🦀")), r#""\uD83E\uDD80""#);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(literal(Value::Int(-213768)), "-213768");
        assert_eq!(literal(Value::Float(3.0)), "3.0");
        assert_eq!(literal(Value::Float(-0.25)), "-0.25");
        assert_eq!(literal(Value::Float(2e-6)), "2e-6");
        assert_eq!(literal(Value::Float(1e20)), "1e20");
        assert_eq!(literal(Value::Float(0.0)), "0.0");
        assert_eq!(literal(Value::Bool(true)), "true");
    }

    #[test]
    fn test_root_values_are_not_written() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.add_value(root, "ignored");
        doc.add_new(root, "a", vec![]).unwrap();

        let mut serializer = Serializer::new();
        serializer.serialize_node(&doc, root).unwrap();
        assert_eq!(serializer.into_inner(), "a:");
    }

    #[test]
    fn test_groups_in_insertion_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let first = doc.add_new(root, "b", vec![Value::Int(1)]).unwrap();
        doc.add_new(root, "a", vec![Value::Int(2)]).unwrap();
        doc.add_new(root, "b", vec![Value::Int(3)]).unwrap();
        doc.add_new(first, "c", vec![]).unwrap();

        let mut serializer = Serializer::new();
        serializer.serialize_node(&doc, root).unwrap();
        assert_eq!(serializer.into_inner(), "b: 1\n\tc:\nb: 3\na: 2");
    }

    #[test]
    fn test_non_finite_floats_are_rejected() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.add_new(root, "x", vec![Value::Float(f32::NAN)]).unwrap();

        let err = Serializer::new().serialize_node(&doc, root).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_empty_tree() {
        let doc = Document::new();
        let mut serializer = Serializer::new();
        serializer.serialize_node(&doc, doc.root()).unwrap();
        assert_eq!(serializer.into_inner(), "");
    }
}
