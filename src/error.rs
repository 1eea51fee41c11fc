//! Error types for parsing, navigating and rendering tab trees.
//!
//! Every failure in this crate is one of a small, closed set of kinds so that
//! callers can branch on [`Error::kind`] rather than on message text.
//!
//! ## Error Categories
//!
//! - **Invalid argument**: malformed key or path syntax, mismatched scalar access,
//!   values the text format cannot represent
//! - **Out of range**: an index or count outside the valid bounds
//! - **Cycle**: an insertion that would make a node its own ancestor
//! - **Lookup**: a required key is absent
//! - **Parse**: a grammar violation, with line and column information
//! - **I/O**: reading or writing at the `std::io` boundary failed
//!
//! ## Examples
//!
//! ```rust
//! use tabtree::{from_str, ErrorKind};
//!
//! let err = from_str("key: 0x").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Parse);
//! assert!(err.to_string().contains("line 1"));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors produced by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// An argument was malformed: bad key or path syntax, a scalar accessed
    /// as the wrong type, or a value the format cannot represent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An index or count fell outside its valid bounds.
    #[error("Index out of range: {what} {index} is not within 0..{bound}")]
    OutOfRange {
        what: &'static str,
        index: usize,
        bound: usize,
    },

    /// The insertion would make a node its own ancestor.
    #[error("Cycle detected: {0}")]
    Cycle(String),

    /// A required key was not present.
    #[error("Key not found: {0}")]
    Lookup(String),

    /// The input text violates the grammar.
    #[error("Parse error at line {line}, column {col}: {msg}")]
    Parse { line: usize, col: usize, msg: String },

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),
}

/// The kind of an [`Error`], without its payload.
///
/// # Examples
///
/// ```rust
/// use tabtree::{Error, ErrorKind};
///
/// let err = Error::lookup("missing");
/// assert_eq!(err.kind(), ErrorKind::Lookup);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    OutOfRange,
    Cycle,
    Lookup,
    Parse,
    Io,
}

impl Error {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::OutOfRange { .. } => ErrorKind::OutOfRange,
            Error::Cycle(_) => ErrorKind::Cycle,
            Error::Lookup(_) => ErrorKind::Lookup,
            Error::Parse { .. } => ErrorKind::Parse,
            Error::Io(_) => ErrorKind::Io,
        }
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidArgument(msg.to_string())
    }

    /// Creates a type mismatch error for scalar access with the wrong accessor.
    ///
    /// Type mismatches are reported as [`ErrorKind::InvalidArgument`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tabtree::{Error, ErrorKind};
    ///
    /// let err = Error::type_mismatch("bool", "string");
    /// assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    /// assert!(err.to_string().contains("expected bool"));
    /// ```
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::InvalidArgument(format!("type mismatch: expected {}, found {}", expected, found))
    }

    /// Creates an out of range error. `bound` is the exclusive upper bound.
    pub fn out_of_range(what: &'static str, index: usize, bound: usize) -> Self {
        Error::OutOfRange { what, index, bound }
    }

    /// Creates a cycle error.
    pub fn cycle<T: fmt::Display>(msg: T) -> Self {
        Error::Cycle(msg.to_string())
    }

    /// Creates a lookup error for a missing key.
    pub fn lookup<T: fmt::Display>(key: T) -> Self {
        Error::Lookup(key.to_string())
    }

    /// Creates a parse error with line and column information (both 1-based).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tabtree::Error;
    ///
    /// let err = Error::parse(10, 5, "unexpected token");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn parse(line: usize, col: usize, msg: &str) -> Self {
        Error::Parse {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
