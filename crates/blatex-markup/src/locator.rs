//! Directive locator.
//!
//! Scans markup for the reserved prefix and determines the full extent of
//! each directive: `prefix key`, optionally followed by `= value` where the
//! value is either a bare identifier or a delimited, possibly nested, span.
//!
//! ```text
//! <div blatex:frac=@(a + (b)) class="x"/>
//!      ^---------------------^
//!      prefix key = value
//! ```
//!
//! Scanning is a single left-to-right pass driven by the consumer: each call
//! to [`Iterator::next`] on [`Locate`] scans exactly one directive.

use std::iter::FusedIterator;
use std::ops::Range;

use crate::error::SyntaxError;
use crate::syntax::{DirectiveSyntax, is_identifier_char};

/// Half-open byte range `[start, end)` of one directive in the markup.
///
/// The range covers the prefix, the key and the optional value. Trailing
/// whitespace is never included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DirectiveSpan {
    /// Offset of the first prefix byte.
    pub start: usize,
    /// Offset one past the last directive byte.
    pub end: usize,
}

impl DirectiveSpan {
    /// The span as a standard range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span is empty. Located spans always cover the prefix.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Directive text within the markup the span was located in.
    ///
    /// Returns an empty string if the span does not belong to `markup`.
    pub fn text<'a>(&self, markup: &'a str) -> &'a str {
        markup.get(self.range()).unwrap_or_default()
    }
}

impl From<DirectiveSpan> for Range<usize> {
    fn from(span: DirectiveSpan) -> Self {
        span.range()
    }
}

/// Locates directives in markup.
///
/// # Example
///
/// ```
/// use blatex_markup::{DirectiveLocator, DirectiveSpan};
///
/// let locator = DirectiveLocator::default();
/// let spans: Vec<DirectiveSpan> = locator
///     .locate("<div blatex:a=@(b)/>")
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(spans, vec![DirectiveSpan { start: 5, end: 18 }]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DirectiveLocator {
    syntax: DirectiveSyntax,
}

impl DirectiveLocator {
    /// Create a locator for the given syntax.
    #[must_use]
    pub fn new(syntax: DirectiveSyntax) -> Self {
        Self { syntax }
    }

    /// The syntax this locator scans for.
    pub fn syntax(&self) -> &DirectiveSyntax {
        &self.syntax
    }

    /// Lazily locate all directives in `markup`, in source order.
    ///
    /// Spans never overlap: a prefix occurring inside an already located
    /// directive value does not start a new directive. The iterator yields a
    /// [`SyntaxError`] for the first malformed directive and then ends.
    pub fn locate<'a>(&'a self, markup: &'a str) -> Locate<'a> {
        Locate {
            syntax: &self.syntax,
            markup,
            cursor: 0,
            done: false,
        }
    }
}

/// Iterator over the directive spans of one markup string.
///
/// Created by [`DirectiveLocator::locate`].
#[derive(Debug, Clone)]
pub struct Locate<'a> {
    syntax: &'a DirectiveSyntax,
    markup: &'a str,
    /// Prefix search resumes here: the end of the previous span.
    cursor: usize,
    done: bool,
}

impl Iterator for Locate<'_> {
    type Item = Result<DirectiveSpan, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let Some(start) = self.syntax.find_prefix(self.markup, self.cursor) else {
            self.done = true;
            return None;
        };

        match scan_directive(self.syntax, self.markup, start) {
            Ok(end) => {
                self.cursor = end;
                tracing::trace!(start, end, "Located directive");
                Some(Ok(DirectiveSpan { start, end }))
            }
            Err(e) => {
                self.done = true;
                tracing::debug!(error = %e, start, "Malformed directive");
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for Locate<'_> {}

/// Scan one directive whose prefix starts at `start`. Returns its end offset.
fn scan_directive(
    syntax: &DirectiveSyntax,
    markup: &str,
    start: usize,
) -> Result<usize, SyntaxError> {
    let key_end = skip_identifier(markup, start + syntax.prefix().len());
    let after_key = skip_whitespace(markup, key_end);

    let assignment = syntax.assignment();
    if assignment.is_empty() || !markup[after_key..].starts_with(assignment) {
        return Ok(key_end);
    }

    let value_start = skip_whitespace(markup, after_key + assignment.len());
    let rest = &markup[value_start..];

    if syntax.opening_at(rest).is_some() {
        return scan_delimited(syntax, markup, value_start);
    }
    if let Some(token) = syntax.closing_at(rest) {
        return Err(SyntaxError::UnexpectedClosing {
            position: value_start,
            token: token.to_owned(),
        });
    }

    // Bare value. When empty, the span ends at the assignment token.
    let value_end = skip_identifier(markup, value_start);
    if value_end == value_start {
        return Ok(after_key + assignment.len());
    }
    Ok(value_end)
}

/// Scan a delimited value starting with an opening token at `start`.
///
/// Returns the offset just past the token that closes the outermost scope.
/// Within a scope the expected closing token is tested before any opening
/// token, so symmetric pairs such as `'...'` close instead of nesting.
pub(crate) fn scan_delimited(
    syntax: &DirectiveSyntax,
    text: &str,
    start: usize,
) -> Result<usize, SyntaxError> {
    let mut stack: Vec<&str> = Vec::new();
    let mut pos = start;

    loop {
        let rest = &text[pos..];
        if rest.is_empty() {
            return Err(SyntaxError::OutOfRange {
                position: pos,
                expected: stack.last().copied().unwrap_or_default().to_owned(),
            });
        }

        if let Some(close) = stack.last().copied()
            && rest.starts_with(close)
        {
            stack.pop();
            pos += close.len();
        } else if let Some(pair) = syntax.opening_at(rest) {
            stack.push(pair.close.as_str());
            pos += pair.open.len();
        } else if let Some(token) = syntax.closing_at(rest) {
            return Err(SyntaxError::UnexpectedClosing {
                position: pos,
                token: token.to_owned(),
            });
        } else {
            pos += rest.chars().next().map_or(1, char::len_utf8);
        }

        if stack.is_empty() {
            return Ok(pos);
        }
    }
}

fn skip_identifier(text: &str, from: usize) -> usize {
    skip_while(text, from, is_identifier_char)
}

fn skip_whitespace(text: &str, from: usize) -> usize {
    skip_while(text, from, char::is_whitespace)
}

fn skip_while(text: &str, from: usize, pred: impl Fn(char) -> bool) -> usize {
    text[from..]
        .char_indices()
        .find(|&(_, c)| !pred(c))
        .map_or(text.len(), |(i, _)| from + i)
}
