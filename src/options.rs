//! Configuration options for parsing and writing.
//!
//! ## Examples
//!
//! ```rust
//! use tabtree::{from_str_with_options, Options};
//!
//! let options = Options::new().with_max_depth(2);
//! assert!(from_str_with_options("a:\n\tb:", options.clone()).is_ok());
//! assert!(from_str_with_options("a:\n\tb:\n\t\tc:", options).is_err());
//! ```

/// Configuration for [`crate::from_str_with_options`] and
/// [`crate::to_writer_with_options`].
///
/// # Examples
///
/// ```rust
/// use tabtree::Options;
///
/// let options = Options::new();
/// assert_eq!(options.max_depth, None);
/// assert!(options.trailing_newline);
///
/// let options = Options::new()
///     .with_max_depth(16)
///     .with_trailing_newline(false);
/// assert_eq!(options.max_depth, Some(16));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Maximum number of nesting levels accepted by the parser; a line at
    /// depth `max_depth` or deeper is an error. `None` means unbounded.
    pub max_depth: Option<usize>,
    /// Whether writers terminate the rendered text with `\n`.
    pub trailing_newline: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_depth: None,
            trailing_newline: true,
        }
    }
}

impl Options {
    /// Creates default options: unbounded depth, trailing newline on write.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits how deeply the parser lets lines nest.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Sets whether writers append the `\n` terminator.
    #[must_use]
    pub fn with_trailing_newline(mut self, trailing_newline: bool) -> Self {
        self.trailing_newline = trailing_newline;
        self
    }
}
