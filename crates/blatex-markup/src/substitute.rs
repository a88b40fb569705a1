//! Directive substituter.
//!
//! Splits located directive text into key and value and resolves the key
//! against a [`FragmentRegistry`].

use crate::error::UnhandledDirectiveError;
use crate::registry::FragmentRegistry;
use crate::syntax::DirectiveSyntax;

/// Key and value of one directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectiveParts<'a> {
    /// Directive key, trimmed.
    pub key: &'a str,
    /// Value after the assignment token, trimmed. Empty if absent.
    pub value: &'a str,
}

/// Split directive text into key and value.
///
/// The prefix is removed when present. Everything up to the first
/// assignment token is the key; the rest is the value. Delimiters around the
/// value are kept as written.
///
/// ```
/// use blatex_markup::{DirectiveParts, DirectiveSyntax, split_directive};
///
/// let syntax = DirectiveSyntax::default();
/// assert_eq!(
///     split_directive(&syntax, "blatex:frac = (a)"),
///     DirectiveParts { key: "frac", value: "(a)" },
/// );
/// ```
pub fn split_directive<'a>(syntax: &DirectiveSyntax, text: &'a str) -> DirectiveParts<'a> {
    let body = syntax.strip_prefix(text).unwrap_or(text);
    let assignment = syntax.assignment();

    let split = if assignment.is_empty() {
        None
    } else {
        body.split_once(assignment)
    };

    match split {
        Some((key, value)) => DirectiveParts {
            key: key.trim(),
            value: value.trim(),
        },
        None => DirectiveParts {
            key: body.trim(),
            value: "",
        },
    }
}

/// Maps located directive text to rendered fragments.
///
/// # Example
///
/// ```
/// use blatex_markup::{DirectiveSubstituter, DirectiveSyntax, FragmentFactory, FragmentRegistry};
///
/// let registry = FragmentRegistry::new()
///     .with("b", FragmentFactory::with_arg(|v| format!("<b>{v}</b>")));
/// let substituter = DirectiveSubstituter::new(DirectiveSyntax::default(), registry);
///
/// assert_eq!(substituter.substitute("blatex:b=x").unwrap(), "<b>x</b>");
/// assert!(substituter.substitute("blatex:i=x").is_err());
/// ```
#[derive(Debug)]
pub struct DirectiveSubstituter<F> {
    syntax: DirectiveSyntax,
    registry: FragmentRegistry<F>,
}

impl<F> DirectiveSubstituter<F> {
    /// Create a substituter resolving keys against `registry`.
    #[must_use]
    pub fn new(syntax: DirectiveSyntax, registry: FragmentRegistry<F>) -> Self {
        Self { syntax, registry }
    }

    /// The registry consulted by [`substitute`](Self::substitute).
    pub fn registry(&self) -> &FragmentRegistry<F> {
        &self.registry
    }

    /// The syntax used to split directive text.
    pub fn syntax(&self) -> &DirectiveSyntax {
        &self.syntax
    }

    /// Produce the fragment for one located directive.
    ///
    /// # Errors
    ///
    /// Returns [`UnhandledDirectiveError`] if no factory is registered for
    /// the directive key.
    pub fn substitute(&self, directive: &str) -> Result<F, UnhandledDirectiveError> {
        let DirectiveParts { key, value } = split_directive(&self.syntax, directive);

        let factory = self.registry.get(key).ok_or_else(|| UnhandledDirectiveError {
            key: key.to_owned(),
        })?;

        tracing::trace!(key, value, "Substituting directive");
        Ok(factory.invoke(value))
    }
}
