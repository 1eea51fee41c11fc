//! Parsing text into trees.
//!
//! The [`Parser`] reads the input line by line. Each non-blank, non-comment
//! line starts with a run of tabs giving its depth, followed by one or more
//! `key: value, value, ...` entries.
//!
//! ## Overview
//!
//! - **Indentation**: a line at depth `d` nests under the first entry of the
//!   closest preceding line at depth `d - 1`; a line may be at most one level
//!   deeper than the line before it
//! - **Shorthand continuation**: further entries on the same line become
//!   siblings of the first one, not its children
//! - **Repeats**: entries repeating a key accumulate, in order, in that key's
//!   group
//! - **Errors**: every grammar violation is reported with its 1-based line and
//!   column
//!
//! ## Usage
//!
//! ```rust
//! use tabtree::{from_str, Value};
//!
//! let doc = from_str("index_name: \"a\", \"b\"\n\tsecond: \"v\"").unwrap();
//! let root = doc.view(doc.root());
//! let entry = root.node("index_name", 0).unwrap();
//!
//! assert_eq!(entry.values(), &[Value::from("a"), Value::from("b")]);
//! assert_eq!(entry.node("second", 0).unwrap().values(), &[Value::from("v")]);
//! ```
//!
//! ## Literals
//!
//! ```rust
//! use tabtree::{from_str, Value};
//!
//! let doc = from_str("n: 0x2222, 0b100100, -213768, 0.002e-3, true").unwrap();
//! let n = doc.view(doc.root()).node("n", 0).unwrap();
//! assert_eq!(n.value(0).unwrap(), &Value::Int(0x2222));
//! assert_eq!(n.value(1).unwrap(), &Value::Int(36));
//! assert_eq!(n.value(2).unwrap(), &Value::Int(-213768));
//! assert!((n.value(3).unwrap().as_float().unwrap() - 2e-6).abs() < 1e-12);
//! assert_eq!(n.value(4).unwrap(), &Value::Bool(true));
//! ```

use crate::node::is_key_char;
use crate::{Document, Error, NodeId, Options, Result, Value};

/// Builds a [`Document`] from text.
///
/// Created via [`Parser::from_str`] or [`Parser::with_options`] and consumed
/// by [`Parser::parse`].
pub struct Parser<'de> {
    input: &'de str,
    max_depth: Option<usize>,
    document: Document,
    stack: Vec<NodeId>, // entry opened by the last line at each depth
    entries: usize,
}

impl<'de> Parser<'de> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'de str) -> Self {
        Self::with_options(input, &Options::default())
    }

    pub fn with_options(input: &'de str, options: &Options) -> Self {
        Parser {
            input,
            max_depth: options.max_depth,
            document: Document::new(),
            stack: Vec::new(),
            entries: 0,
        }
    }

    /// Parses the whole input.
    ///
    /// # Errors
    ///
    /// Returns a parse error at the first grammar violation.
    pub fn parse(mut self) -> Result<Document> {
        let mut lines = 0;
        for (index, raw) in self.input.split('\n').enumerate() {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            self.parse_line(line, index + 1)?;
            lines = index + 1;
        }
        log::debug!("parsed {} entries from {} line(s)", self.entries, lines);
        Ok(self.document)
    }

    fn parse_line(&mut self, line: &str, line_no: usize) -> Result<()> {
        let content = line.trim_start();
        if content.is_empty() || content.starts_with('#') {
            return Ok(());
        }

        let mut cursor = Cursor::new(line, line_no);
        let depth = cursor.eat_tabs();
        if cursor.peek().map_or(false, char::is_whitespace) {
            return Err(cursor.error("only tabs may be used for indentation"));
        }
        if depth > self.stack.len() {
            return Err(cursor.error("too much indentation"));
        }
        if let Some(max) = self.max_depth {
            if depth >= max {
                return Err(cursor.error(&format!("nesting deeper than {} level(s)", max)));
            }
        }
        self.stack.truncate(depth);

        let container = match depth {
            0 => self.document.root(),
            _ => self.stack[depth - 1],
        };
        let first = self.parse_entry(&mut cursor, container)?;
        self.stack.push(first);

        loop {
            cursor.skip_whitespace();
            if cursor.at_list_end() {
                return Ok(());
            }
            self.parse_entry(&mut cursor, container)?;
        }
    }

    fn parse_entry(&mut self, cursor: &mut Cursor, container: NodeId) -> Result<NodeId> {
        let key = cursor.parse_key()?;
        let values = cursor.parse_values()?;
        log::trace!(
            "line {}: '{}' with {} value(s)",
            cursor.line,
            key,
            values.len()
        );
        let node = self.document.add_new(container, &key, values)?;
        self.entries += 1;
        Ok(node)
    }
}

/// Character cursor over a single line.
struct Cursor {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Cursor {
    fn new(line: &str, line_no: usize) -> Self {
        Cursor {
            chars: line.chars().collect(),
            pos: 0,
            line: line_no,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn column(&self) -> usize {
        self.pos + 1
    }

    fn error(&self, msg: &str) -> Error {
        Error::parse(self.line, self.column(), msg)
    }

    fn error_at(&self, col: usize, msg: &str) -> Error {
        Error::parse(self.line, col, msg)
    }

    fn text(&self, start: usize) -> String {
        self.chars[start..self.pos].iter().collect()
    }

    fn eat_tabs(&mut self) -> usize {
        let start = self.pos;
        while self.peek() == Some('\t') {
            self.pos += 1;
        }
        self.pos - start
    }

    fn skip_whitespace(&mut self) {
        while self.peek().map_or(false, char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn rest_starts_with(&self, word: &str) -> bool {
        let mut i = self.pos;
        for expected in word.chars() {
            if self.chars.get(i) != Some(&expected) {
                return false;
            }
            i += 1;
        }
        true
    }

    /// End of line or start of a trailing comment.
    fn at_list_end(&self) -> bool {
        matches!(self.peek(), None | Some('#'))
    }

    /// Whether a (possibly empty) run of key characters followed by `:`
    /// starts here.
    fn at_key(&self) -> bool {
        let mut i = self.pos;
        while self.chars.get(i).map_or(false, |&c| is_key_char(c)) {
            i += 1;
        }
        self.chars.get(i) == Some(&':')
    }

    fn parse_key(&mut self) -> Result<String> {
        let start = self.pos;
        while self.peek().map_or(false, is_key_char) {
            self.pos += 1;
        }
        let key = self.text(start);
        if key.is_empty() {
            return Err(match self.peek() {
                Some(':') => self.error("empty key"),
                Some(ch) => self.error(&format!("expected a key, found '{}'", ch)),
                None => self.error("expected a key"),
            });
        }
        if key.starts_with('.') || key.ends_with('.') {
            return Err(self.error_at(start + 1, "a key may not begin or end with '.'"));
        }
        if self.peek() != Some(':') {
            return Err(self.error("expected ':' after key"));
        }
        self.pos += 1;
        Ok(key)
    }

    fn parse_values(&mut self) -> Result<Vec<Value>> {
        let mut values = Vec::new();
        self.skip_whitespace();
        if self.at_list_end() || self.at_key() {
            return Ok(values);
        }
        loop {
            values.push(self.parse_value()?);
            self.skip_whitespace();
            match self.peek() {
                None | Some('#') => return Ok(values),
                Some(',') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    if self.at_list_end() {
                        return Err(self.error("expected a value after ','"));
                    }
                }
                Some(_) if self.at_key() => return Ok(values),
                Some(ch) => {
                    return Err(self.error(&format!("expected ',' between values, found '{}'", ch)))
                }
            }
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        let value = match self.peek() {
            Some('"') => Value::String(self.parse_string()?),
            Some('t') | Some('f') => Value::Bool(self.parse_bool()?),
            Some(ch) if ch == '+' || ch == '-' || ch == '.' || ch.is_ascii_digit() => {
                self.parse_number()?
            }
            Some(ch) => return Err(self.error(&format!("expected a value, found '{}'", ch))),
            None => return Err(self.error("expected a value")),
        };
        match self.peek() {
            None | Some(',') | Some('#') => Ok(value),
            Some(ch) if ch.is_whitespace() => Ok(value),
            Some(ch) => Err(self.error(&format!("unexpected '{}' after value", ch))),
        }
    }

    fn parse_bool(&mut self) -> Result<bool> {
        if self.rest_starts_with("true") {
            self.pos += 4;
            Ok(true)
        } else if self.rest_starts_with("false") {
            self.pos += 5;
            Ok(false)
        } else {
            Err(self.error("expected 'true' or 'false'"))
        }
    }

    fn parse_string(&mut self) -> Result<String> {
        let open = self.column();
        self.pos += 1; // opening quote
        let mut result = String::new();
        loop {
            match self.next_char() {
                None => return Err(self.error_at(open, "unterminated string")),
                Some('"') => return Ok(result),
                Some('\\') => {
                    let escape = self.column() - 1;
                    let ch = match self.next_char() {
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some('0') => '\0',
                        Some('a') => '\u{0007}',
                        Some('b') => '\u{0008}',
                        Some('f') => '\u{000C}',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('v') => '\u{000B}',
                        Some('x') => self.parse_hex_escape(escape, 1, 4)?,
                        Some('u') => self.parse_unicode_escape(escape)?,
                        Some('U') => self.parse_hex_escape(escape, 8, 8)?,
                        Some(other) => {
                            return Err(self.error_at(
                                escape,
                                &format!("unknown escape sequence '\\{}'", other),
                            ))
                        }
                        None => return Err(self.error_at(open, "unterminated string")),
                    };
                    result.push(ch);
                }
                Some(other) => result.push(other),
            }
        }
    }

    /// Reads between `min` and `max` hex digits and decodes the code point.
    fn parse_hex_escape(&mut self, escape: usize, min: usize, max: usize) -> Result<char> {
        let code = self.parse_hex_digits(escape, min, max)?;
        self.code_point(escape, code)
    }

    /// Decodes `\uHHHH`, joining a high surrogate with the `\uHHHH` low
    /// surrogate that must follow it.
    fn parse_unicode_escape(&mut self, escape: usize) -> Result<char> {
        let unit = self.parse_hex_digits(escape, 4, 4)?;
        match unit {
            0xD800..=0xDBFF => {
                if !self.rest_starts_with("\\u") {
                    return Err(self.error_at(
                        escape,
                        &format!(
                            "high surrogate U+{:X} is not followed by a low surrogate",
                            unit
                        ),
                    ));
                }
                let low_escape = self.column();
                self.pos += 2;
                let low = self.parse_hex_digits(low_escape, 4, 4)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(self.error_at(
                        low_escape,
                        &format!("expected a low surrogate, found U+{:X}", low),
                    ));
                }
                self.code_point(escape, 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00))
            }
            0xDC00..=0xDFFF => Err(self.error_at(
                escape,
                &format!("low surrogate U+{:X} without a high surrogate", unit),
            )),
            _ => self.code_point(escape, unit),
        }
    }

    fn code_point(&self, escape: usize, code: u32) -> Result<char> {
        char::from_u32(code)
            .ok_or_else(|| self.error_at(escape, &format!("invalid code point U+{:X}", code)))
    }

    fn parse_hex_digits(&mut self, escape: usize, min: usize, max: usize) -> Result<u32> {
        let start = self.pos;
        while self.pos - start < max && self.peek().map_or(false, |c| c.is_ascii_hexdigit()) {
            self.pos += 1;
        }
        let digits = self.text(start);
        if digits.len() < min {
            let msg = if min == max {
                format!("escape sequence needs exactly {} hex digits", min)
            } else {
                format!("escape sequence needs at least {} hex digit", min)
            };
            return Err(self.error_at(escape, &msg));
        }
        u32::from_str_radix(&digits, 16)
            .map_err(|_| self.error_at(escape, "invalid hex digits in escape sequence"))
    }

    fn parse_number(&mut self) -> Result<Value> {
        let start = self.pos;
        let col = self.column();
        let signed = matches!(self.peek(), Some('+') | Some('-'));
        if signed {
            self.pos += 1;
        }

        if self.peek() == Some('0') {
            let radix = match self.peek_at(1) {
                Some('x') | Some('X') => Some((16, 8, "hexadecimal")),
                Some('b') | Some('B') => Some((2, 32, "binary")),
                _ => None,
            };
            if let Some((radix, max_digits, name)) = radix {
                if signed {
                    return Err(self.error_at(
                        col,
                        &format!("a sign is not allowed on a {} literal", name),
                    ));
                }
                return self.parse_radix(col, radix, max_digits, name);
            }
        }

        let mut seen_dot = false;
        let mut seen_exp = false;
        let mut mantissa_digits = 0;
        let mut exp_digits = 0;
        loop {
            match self.peek() {
                Some(ch) if ch.is_ascii_digit() => {
                    if seen_exp {
                        exp_digits += 1;
                    } else {
                        mantissa_digits += 1;
                    }
                    self.pos += 1;
                }
                Some('.') => {
                    if seen_dot || seen_exp {
                        return Err(self.error("unexpected '.' in number"));
                    }
                    seen_dot = true;
                    self.pos += 1;
                }
                Some('e') | Some('E') => {
                    if seen_exp {
                        return Err(self.error("a number may have only one exponent"));
                    }
                    if mantissa_digits == 0 {
                        return Err(self.error("expected digits before exponent"));
                    }
                    seen_exp = true;
                    self.pos += 1;
                    if matches!(self.peek(), Some('+') | Some('-')) {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
        if mantissa_digits == 0 {
            return Err(self.error_at(col, "expected digits in number"));
        }
        if seen_exp && exp_digits == 0 {
            return Err(self.error("expected digits in exponent"));
        }

        let text = self.text(start);
        if seen_dot || seen_exp {
            let value: f32 = text
                .parse()
                .map_err(|_| self.error_at(col, &format!("invalid float literal '{}'", text)))?;
            if !value.is_finite() {
                return Err(self.error_at(col, "float literal out of range"));
            }
            Ok(Value::Float(value))
        } else {
            text.parse::<i32>()
                .map(Value::Int)
                .map_err(|_| self.error_at(col, "integer literal out of 32-bit range"))
        }
    }

    fn parse_radix(
        &mut self,
        col: usize,
        radix: u32,
        max_digits: usize,
        name: &str,
    ) -> Result<Value> {
        self.pos += 2; // 0x / 0b
        let start = self.pos;
        while self.peek().map_or(false, |c| c.is_digit(radix)) {
            self.pos += 1;
        }
        let digits = self.text(start);
        if digits.is_empty() {
            return Err(self.error(&format!("expected {} digits", name)));
        }
        if digits.len() > max_digits {
            return Err(self.error_at(
                col,
                &format!("{} literal exceeds {} digits", name, max_digits),
            ));
        }
        let bits = u32::from_str_radix(&digits, radix)
            .map_err(|_| self.error_at(col, &format!("invalid {} literal", name)))?;
        Ok(Value::Int(bits as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn parse(input: &str) -> Result<Document> {
        Parser::from_str(input).parse()
    }

    fn values_of(input: &str) -> Vec<Value> {
        let doc = parse(input).unwrap();
        let node = doc.node(doc.root(), "v", 0).unwrap();
        doc.values(node).to_vec()
    }

    fn parse_error(input: &str) -> (usize, usize) {
        match parse(input).unwrap_err() {
            Error::Parse { line, col, .. } => (line, col),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_end_to_end_nesting() {
        let doc = parse("index_name: \"a\", \"b\"\n\tsecond: \"v\"").unwrap();
        let root = doc.root();
        assert_eq!(doc.count(root), 1);
        let entry = doc.node(root, "index_name", 0).unwrap();
        assert_eq!(doc.values(entry), &[Value::from("a"), Value::from("b")]);
        assert_eq!(doc.count(entry), 1);
        let second = doc.node(entry, "second", 0).unwrap();
        assert_eq!(doc.values(second), &[Value::from("v")]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(values_of("v: 0x2222"), vec![Value::Int(0x2222)]);
        assert_eq!(values_of("v: 0b100100"), vec![Value::Int(36)]);
        assert_eq!(values_of("v: -213768"), vec![Value::Int(-213768)]);
        assert_eq!(values_of("v: +7"), vec![Value::Int(7)]);
        assert_eq!(values_of("v: 0xFFFFFFFF"), vec![Value::Int(-1)]);
        assert_eq!(values_of("v: 2147483647"), vec![Value::Int(i32::MAX)]);
        assert_eq!(values_of("v: -2147483648"), vec![Value::Int(i32::MIN)]);
        assert_eq!(
            values_of("v: 1.5, -.5, 3e2"),
            vec![Value::Float(1.5), Value::Float(-0.5), Value::Float(300.0)]
        );
        let small = values_of("v: 0.002e-3")[0].as_float().unwrap();
        assert!((small - 2e-6).abs() < 1e-12);
    }

    #[test]
    fn test_bad_numbers() {
        for input in [
            "v: -0x10",
            "v: +0b1",
            "v: 0x123456789",
            "v: 0b111111111111111111111111111111111",
            "v: 0x",
            "v: 2147483648",
            "v: 1.2.3",
            "v: 1e5e3",
            "v: 1e",
            "v: 1.5e3.2",
            "v: -",
            "v: 12abc",
            "v: 1e99",
        ] {
            assert_eq!(
                parse(input).unwrap_err().kind(),
                ErrorKind::Parse,
                "{}",
                input
            );
        }
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(values_of(r#"v: "\u0065""#), vec![Value::from("e")]);
        assert_eq!(values_of(r#"v: "\n\t\f""#), vec![Value::from("\n\t\u{c}")]);
        assert_eq!(
            values_of(r#"v: "\\\"\0\a\b\r\v""#),
            vec![Value::from("\\\"\0\u{7}\u{8}\r\u{b}")]
        );
        assert_eq!(
            values_of(r#"v: "\x41\x263A!""#),
            vec![Value::from("A\u{263a}!")]
        );
        assert_eq!(values_of(r#"v: "\U0001F980""#), vec![Value::from("🦀")]);
        assert_eq!(values_of(r#"v: "\uD83E\uDD80!""#), vec![Value::from("🦀!")]);
        assert_eq!(
            values_of(r#"v: "a # not a comment, really""#),
            vec![Value::from("a # not a comment, really")]
        );
    }

    #[test]
    fn test_bad_strings() {
        for input in [
            r#"v: "open"#,
            r#"v: "\q""#,
            r#"v: "\u12""#,
            r#"v: "\x""#,
            r#"v: "\U00110000""#,
            r#"v: "\uD800""#,
            r#"v: "\uD83E\u0041""#,
            r#"v: "\uDD80""#,
            r#"v: "ab"c"#,
        ] {
            assert_eq!(
                parse(input).unwrap_err().kind(),
                ErrorKind::Parse,
                "{}",
                input
            );
        }
        assert_eq!(parse_error(r#"v: "open"#), (1, 4));
        assert_eq!(parse_error(r#"v: "\uD83E\u0041""#), (1, 11));
    }

    #[test]
    fn test_booleans() {
        assert_eq!(
            values_of("v: true, false"),
            vec![Value::Bool(true), Value::Bool(false)]
        );
        for input in ["v: True", "v: truex", "v: fals", "v: t"] {
            assert!(parse(input).is_err(), "{}", input);
        }
    }

    #[test]
    fn test_shorthand_continuation_makes_siblings() {
        let doc = parse("a: 1 b: 2 c:\n\tchild: 3").unwrap();
        let root = doc.root();
        assert_eq!(doc.count(root), 3);
        let a = doc.node(root, "a", 0).unwrap();
        assert_eq!(doc.values(a), &[Value::Int(1)]);
        assert!(doc.contains_key(root, "b").unwrap());
        assert_eq!(doc.value_count(doc.node(root, "c", 0).unwrap()), 0);
        // the indented line nests under the first entry of the line above
        assert!(doc.contains_key(a, "child").unwrap());
    }

    #[test]
    fn test_key_named_like_literal() {
        let doc = parse("a: true: 1").unwrap();
        let root = doc.root();
        assert_eq!(doc.value_count(doc.node(root, "a", 0).unwrap()), 0);
        assert_eq!(
            doc.values(doc.node(root, "true", 0).unwrap()),
            &[Value::Int(1)]
        );
    }

    #[test]
    fn test_repeated_keys_accumulate() {
        let doc = parse("item: 1\nitem: 2\nother:\nitem: 3").unwrap();
        let group = doc.group(doc.root(), "item").unwrap();
        let values: Vec<_> = group.iter().map(|n| doc.values(n)[0].clone()).collect();
        assert_eq!(values, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn test_dedent_pops_the_stack() {
        let doc = parse("a:\n\tb:\n\t\tc:\n\td:\ne:").unwrap();
        let root = doc.root();
        let a = doc.node(root, "a", 0).unwrap();
        let b = doc.node(a, "b", 0).unwrap();
        assert!(doc.contains_key(b, "c").unwrap());
        assert!(doc.contains_key(a, "d").unwrap());
        assert!(doc.contains_key(root, "e").unwrap());
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let input = [
            "# header",
            "",
            "a: 1 # trailing",
            "   # indented comment",
            "\t",
            "\tb: \"x\",\"y\"#c\r",
            "",
        ]
        .join("\n");
        let doc = parse(&input).unwrap();
        let a = doc.node(doc.root(), "a", 0).unwrap();
        assert_eq!(doc.values(a), &[Value::Int(1)]);
        let b = doc.node(a, "b", 0).unwrap();
        assert_eq!(doc.values(b), &[Value::from("x"), Value::from("y")]);
    }

    #[test]
    fn test_indentation_errors() {
        assert_eq!(parse_error("\ta: 1"), (1, 2));
        assert_eq!(parse_error("a:\n\t\tb:"), (2, 3));
        assert_eq!(parse_error("a:\n  b:"), (2, 1));
        assert_eq!(parse_error("a:\n\t b:"), (2, 2));
    }

    #[test]
    fn test_list_errors() {
        assert_eq!(parse_error("a: 1,"), (1, 6));
        assert_eq!(parse_error("a: 1, # c"), (1, 7));
        assert_eq!(parse_error("a: 1 2"), (1, 6));
        assert_eq!(parse_error("a: \"x\"b: 1"), (1, 7));
        assert_eq!(parse_error("a: 1, b: 2"), (1, 7));
        assert_eq!(parse_error(": 1"), (1, 1));
        assert_eq!(parse_error("a: 1 : 2"), (1, 6));
        assert_eq!(parse_error("a 1"), (1, 2));
        assert_eq!(parse_error(".a: 1"), (1, 1));
        assert_eq!(parse_error("a.: 1"), (1, 1));
        assert_eq!(parse_error("a: @"), (1, 4));
    }

    #[test]
    fn test_max_depth() {
        let options = Options::new().with_max_depth(2);
        let ok = Parser::with_options("a:\n\tb:", &options).parse();
        assert!(ok.is_ok());
        let err = Parser::with_options("a:\n\tb:\n\t\tc:", &options)
            .parse()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_empty_input() {
        let doc = parse("").unwrap();
        assert_eq!(doc.count(doc.root()), 0);
        let doc = parse("\n\n# only comments\n").unwrap();
        assert_eq!(doc.count(doc.root()), 0);
    }
}
