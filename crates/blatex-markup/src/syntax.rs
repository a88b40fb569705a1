//! Directive syntax configuration.
//!
//! Holds the reserved prefix, the assignment token and the ordered list of
//! delimiter pairs consulted while scanning a directive value.

use crate::locator::scan_delimited;

/// Default reserved prefix that starts every directive.
pub const DEFAULT_PREFIX: &str = "blatex:";

/// Default token separating a directive key from its value.
pub const DEFAULT_ASSIGNMENT: &str = "=";

/// An opening/closing token pair bounding a directive value.
///
/// Tokens are arbitrary fixed strings: they may be longer than one
/// character (`@(`) and the two sides may be identical (`'`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterPair {
    /// Token that opens a nested scope.
    pub open: String,
    /// Token that closes the scope opened by [`open`](Self::open).
    pub close: String,
}

impl DelimiterPair {
    /// Create a delimiter pair.
    #[must_use]
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// The built-in pairs in priority order.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("\"", "\""),
            Self::new("(", ")"),
            Self::new("{", "}"),
            Self::new("'", "'"),
            Self::new("@(", ")"),
        ]
    }

    fn is_usable(&self) -> bool {
        !self.open.is_empty() && !self.close.is_empty()
    }
}

/// Lexical configuration shared by the locator and the substituter.
///
/// # Example
///
/// ```
/// use blatex_markup::{DelimiterPair, DirectiveSyntax};
///
/// let syntax = DirectiveSyntax::default()
///     .with_prefix("tex:")
///     .with_delimiters(vec![DelimiterPair::new("[", "]")]);
///
/// assert_eq!(syntax.prefix(), "tex:");
/// assert_eq!(syntax.delimiters().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveSyntax {
    prefix: String,
    assignment: String,
    delimiters: Vec<DelimiterPair>,
    case_insensitive_prefix: bool,
}

impl Default for DirectiveSyntax {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_owned(),
            assignment: DEFAULT_ASSIGNMENT.to_owned(),
            delimiters: DelimiterPair::defaults(),
            case_insensitive_prefix: false,
        }
    }
}

impl DirectiveSyntax {
    /// Set the reserved prefix.
    ///
    /// An empty prefix never matches, so nothing is located.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the token separating key and value.
    #[must_use]
    pub fn with_assignment(mut self, assignment: impl Into<String>) -> Self {
        self.assignment = assignment.into();
        self
    }

    /// Replace the delimiter list. Order is priority order.
    ///
    /// Pairs with an empty token are dropped.
    #[must_use]
    pub fn with_delimiters(mut self, delimiters: Vec<DelimiterPair>) -> Self {
        self.delimiters = delimiters
            .into_iter()
            .filter(DelimiterPair::is_usable)
            .collect();
        self
    }

    /// Match the prefix ignoring ASCII case.
    #[must_use]
    pub fn with_case_insensitive_prefix(mut self, enabled: bool) -> Self {
        self.case_insensitive_prefix = enabled;
        self
    }

    /// The reserved prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The assignment token.
    pub fn assignment(&self) -> &str {
        &self.assignment
    }

    /// Delimiter pairs in priority order.
    pub fn delimiters(&self) -> &[DelimiterPair] {
        &self.delimiters
    }

    /// Whether the prefix is matched ignoring ASCII case.
    pub fn case_insensitive_prefix(&self) -> bool {
        self.case_insensitive_prefix
    }

    /// Find the next prefix occurrence at or after byte offset `from`.
    pub(crate) fn find_prefix(&self, markup: &str, from: usize) -> Option<usize> {
        if self.prefix.is_empty() {
            return None;
        }
        let haystack = markup.get(from..)?;

        if !self.case_insensitive_prefix {
            return haystack.find(&self.prefix).map(|i| from + i);
        }

        haystack
            .char_indices()
            .map(|(i, _)| from + i)
            .find(|&i| self.prefix_matches(markup, i))
    }

    fn prefix_matches(&self, markup: &str, at: usize) -> bool {
        markup
            .get(at..at + self.prefix.len())
            .is_some_and(|s| self.prefix_eq(s))
    }

    fn prefix_eq(&self, candidate: &str) -> bool {
        if self.case_insensitive_prefix {
            candidate.eq_ignore_ascii_case(&self.prefix)
        } else {
            candidate == self.prefix
        }
    }

    /// Remove the prefix from `text`, honoring case sensitivity.
    ///
    /// Returns `None` if `text` does not start with the prefix.
    pub fn strip_prefix<'a>(&self, text: &'a str) -> Option<&'a str> {
        let head = text.get(..self.prefix.len())?;
        if self.prefix.is_empty() || !self.prefix_eq(head) {
            return None;
        }
        text.get(self.prefix.len()..)
    }

    /// First delimiter pair (by priority) whose opening token starts `rest`.
    pub(crate) fn opening_at(&self, rest: &str) -> Option<&DelimiterPair> {
        self.delimiters.iter().find(|p| rest.starts_with(&p.open))
    }

    /// First closing token (by priority) that starts `rest`.
    pub(crate) fn closing_at(&self, rest: &str) -> Option<&str> {
        self.delimiters
            .iter()
            .map(|p| p.close.as_str())
            .find(|close| rest.starts_with(close))
    }

    /// Strip one enclosing delimiter pair from a directive value.
    ///
    /// The value is unwrapped only when the scope opened by its first token
    /// closes exactly at the end of the value, so `(a)(b)` is returned as is.
    ///
    /// ```
    /// use blatex_markup::DirectiveSyntax;
    ///
    /// let syntax = DirectiveSyntax::default();
    /// assert_eq!(syntax.strip_delimiters("@(x + 1)"), "x + 1");
    /// assert_eq!(syntax.strip_delimiters("(a)(b)"), "(a)(b)");
    /// assert_eq!(syntax.strip_delimiters("plain"), "plain");
    /// ```
    pub fn strip_delimiters<'a>(&self, value: &'a str) -> &'a str {
        let Some(pair) = self.opening_at(value) else {
            return value;
        };
        match scan_delimited(self, value, 0) {
            Ok(end) if end == value.len() => &value[pair.open.len()..end - pair.close.len()],
            _ => value,
        }
    }
}

/// Characters allowed in bare keys and bare values.
pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}
