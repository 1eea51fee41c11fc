//! The tab tree text format.
//!
//! This module documents the format read by [`crate::from_str`] and written
//! by [`crate::to_string`].
//!
//! # Overview
//!
//! A document is a tree of keyed entries. Each entry carries an ordered list
//! of scalar values and any number of child entries. Nesting is expressed with
//! leading tabs, one per level.
//!
//! ```text
//! # connection settings
//! server: "primary", 8080
//!     timeout: 2.5
//!     tls: true
//! server: "backup", 8081
//! limits: rate: 100 burst: 20
//! ```
//!
//! (Indentation above is shown as spaces for readability; real documents
//! indent with tab characters only.)
//!
//! # Lines
//!
//! - Blank lines and lines whose first non-whitespace character is `#` are
//!   ignored.
//! - A line starts with zero or more tabs. Any other whitespace before the
//!   first key is an error.
//! - A line may be at most one level deeper than the entry it nests under.
//!   A shallower line closes every deeper level.
//! - A line holds one or more entries separated by whitespace. The first entry
//!   is the one later, deeper lines nest under; the others are its siblings.
//!   In the example above `rate` and `burst` are children of the root, next to
//!   `limits`.
//! - A `#` outside a string starts a comment running to the end of the line.
//!
//! # Keys
//!
//! A key is one or more letters, digits, `_` or `.`, and is followed directly
//! by `:`. A `.` may not be the first or last character. Entries repeating a
//! key under the same parent form an ordered group.
//!
//! # Values
//!
//! Values follow the colon and are separated by commas.
//!
//! | Type | Syntax | Examples |
//! |------|--------|----------|
//! | String | double-quoted, with escapes | `"text"`, `"tab\there"` |
//! | Bool | `true` or `false` | `true` |
//! | Int | decimal, `0x` hex (1-8 digits), `0b` binary (1-32 digits) | `-12`, `0x1F`, `0b101` |
//! | Float | decimal with `.` and/or exponent | `2.5`, `.5`, `1e-3`, `6.02E23` |
//!
//! Integers are 32-bit signed. Decimal integers outside that range are
//! rejected; hex and binary literals are read as 32-bit two's complement, so
//! `0xFFFFFFFF` is `-1`. Only decimal literals may carry a `+` or `-` sign.
//! Floats are 32-bit.
//!
//! ## Escape sequences
//!
//! ```text
//! \\  backslash          \a  bell
//! \"  quote              \b  backspace
//! \0  null               \f  form feed
//! \n  newline            \v  vertical tab
//! \r  carriage return    \t  tab
//! \xH..HHHH      1 to 4 hex digits
//! \uHHHH         exactly 4 hex digits; a high surrogate must be followed
//!                by a \uHHHH low surrogate, the pair naming one character
//! \UHHHHHHHH     exactly 8 hex digits, at most 10FFFF
//! ```
//!
//! # Canonical output
//!
//! Writing a tree produces one line per entry, children after their parent,
//! groups in the order their keys were first inserted. Values are separated by
//! `", "`. Strings are always quoted; any character outside printable ASCII
//! without a named escape is written as `\uXXXX`, and characters above
//! U+FFFF as a `\uXXXX\uXXXX` surrogate pair. `\U` is read but never
//! written. Floats always carry a `.` or an exponent. The root's own values
//! are not written, and the output has no final newline; writers append one.
