//! Markup service combining the locator and the substituter.
//!
//! Walks a markup string and yields literal text and substituted fragments in
//! source order, for an output sink to assemble.

use std::fmt;
use std::iter::FusedIterator;

use crate::error::MarkupError;
use crate::locator::{DirectiveLocator, DirectiveSpan, Locate};
use crate::registry::FragmentRegistry;
use crate::substitute::DirectiveSubstituter;
use crate::syntax::DirectiveSyntax;

/// One piece of rendered markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a, F> {
    /// Markup between directives, passed through unchanged.
    Literal(&'a str),
    /// Fragment substituted for the directive at `span`.
    Fragment {
        /// Location of the directive in the source markup.
        span: DirectiveSpan,
        /// Fragment produced by the registered factory.
        fragment: F,
    },
}

/// Consumer of rendered segments.
pub trait RenderSink<F> {
    /// Append literal markup.
    fn literal(&mut self, text: &str);

    /// Append a substituted fragment.
    fn fragment(&mut self, fragment: F);
}

impl<F: fmt::Display> RenderSink<F> for String {
    fn literal(&mut self, text: &str) {
        self.push_str(text);
    }

    fn fragment(&mut self, fragment: F) {
        use fmt::Write;
        let _ = write!(self, "{fragment}");
    }
}

/// Locates directives in markup and substitutes them with fragments.
///
/// # Example
///
/// ```
/// use blatex_markup::{DirectiveSyntax, FragmentFactory, FragmentRegistry, MarkupService};
///
/// let registry = FragmentRegistry::new()
///     .with("kbd", FragmentFactory::with_arg(|v| format!("<kbd>{v}</kbd>")));
/// let service = MarkupService::new(DirectiveSyntax::default(), registry);
///
/// let html = service.render_to_string("Press blatex:kbd=C to copy").unwrap();
/// assert_eq!(html, "Press <kbd>C</kbd> to copy");
/// ```
#[derive(Debug)]
pub struct MarkupService<F> {
    locator: DirectiveLocator,
    substituter: DirectiveSubstituter<F>,
}

impl<F> MarkupService<F> {
    /// Create a service for `syntax`, resolving keys against `registry`.
    #[must_use]
    pub fn new(syntax: DirectiveSyntax, registry: FragmentRegistry<F>) -> Self {
        Self {
            locator: DirectiveLocator::new(syntax.clone()),
            substituter: DirectiveSubstituter::new(syntax, registry),
        }
    }

    /// The directive locator.
    pub fn locator(&self) -> &DirectiveLocator {
        &self.locator
    }

    /// The directive substituter.
    pub fn substituter(&self) -> &DirectiveSubstituter<F> {
        &self.substituter
    }

    /// Lazily split `markup` into literal and substituted segments.
    ///
    /// Empty literals are skipped. The iterator ends after the first error.
    pub fn segments<'a>(&'a self, markup: &'a str) -> Segments<'a, F> {
        Segments {
            markup,
            spans: self.locator.locate(markup),
            substituter: &self.substituter,
            cursor: 0,
            pending: None,
            done: false,
        }
    }

    /// Feed all segments of `markup` into `sink`.
    ///
    /// Returns the number of substituted directives. On error the sink keeps
    /// the segments rendered so far.
    pub fn render<S: RenderSink<F>>(
        &self,
        markup: &str,
        sink: &mut S,
    ) -> Result<usize, MarkupError> {
        let mut substituted = 0;

        for segment in self.segments(markup) {
            match segment? {
                Segment::Literal(text) => sink.literal(text),
                Segment::Fragment { fragment, .. } => {
                    sink.fragment(fragment);
                    substituted += 1;
                }
            }
        }

        tracing::debug!(directives = substituted, "Rendered markup");
        Ok(substituted)
    }

    /// Render `markup` to a string, formatting each fragment with `Display`.
    pub fn render_to_string(&self, markup: &str) -> Result<String, MarkupError>
    where
        F: fmt::Display,
    {
        let mut output = String::with_capacity(markup.len());
        self.render(markup, &mut output)?;
        Ok(output)
    }
}

/// Iterator over the segments of one markup string.
///
/// Created by [`MarkupService::segments`].
pub struct Segments<'a, F> {
    markup: &'a str,
    spans: Locate<'a>,
    substituter: &'a DirectiveSubstituter<F>,
    /// End of the last consumed directive.
    cursor: usize,
    /// Fragment held back while the literal before it is yielded.
    pending: Option<Segment<'a, F>>,
    done: bool,
}

impl<'a, F> Iterator for Segments<'a, F> {
    type Item = Result<Segment<'a, F>, MarkupError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(segment) = self.pending.take() {
            return Some(Ok(segment));
        }
        if self.done {
            return None;
        }

        match self.spans.next() {
            Some(Ok(span)) => {
                let literal = &self.markup[self.cursor..span.start];
                self.cursor = span.end;

                let fragment = match self.substituter.substitute(span.text(self.markup)) {
                    Ok(fragment) => fragment,
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e.into()));
                    }
                };

                let segment = Segment::Fragment { span, fragment };
                if literal.is_empty() {
                    Some(Ok(segment))
                } else {
                    self.pending = Some(segment);
                    Some(Ok(Segment::Literal(literal)))
                }
            }
            Some(Err(e)) => {
                self.done = true;
                Some(Err(e.into()))
            }
            None => {
                self.done = true;
                let tail = &self.markup[self.cursor..];
                (!tail.is_empty()).then_some(Ok(Segment::Literal(tail)))
            }
        }
    }
}

impl<F> FusedIterator for Segments<'_, F> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SyntaxError, UnhandledDirectiveError};
    use crate::registry::FragmentFactory;
    use pretty_assertions::assert_eq;

    fn service() -> MarkupService<String> {
        let registry = FragmentRegistry::new()
            .with("a", FragmentFactory::with_arg(|v| format!("<A {v}>")))
            .with("br", FragmentFactory::no_arg(|| "<br/>".to_owned()));
        MarkupService::new(DirectiveSyntax::default(), registry)
    }

    #[test]
    fn test_segments_interleave_in_source_order() {
        let service = service();
        let markup = "x blatex:a=(1) y blatex:br";
        let segments: Vec<_> = service
            .segments(markup)
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(
            segments,
            vec![
                Segment::Literal("x "),
                Segment::Fragment {
                    span: DirectiveSpan { start: 2, end: 14 },
                    fragment: "<A (1)>".to_owned(),
                },
                Segment::Literal(" y "),
                Segment::Fragment {
                    span: DirectiveSpan { start: 17, end: 26 },
                    fragment: "<br/>".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_segments_skip_empty_literals() {
        let service = service();
        let segments: Vec<_> = service
            .segments("blatex:br/blatex:br")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(segments.len(), 3);
    }

    #[test]
    fn test_segments_without_directives() {
        let service = service();
        let segments: Vec<_> = service
            .segments("<p>plain</p>")
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(segments, vec![Segment::Literal("<p>plain</p>")]);

        assert_eq!(service.segments("").count(), 0);
    }

    #[test]
    fn test_render_to_string() {
        let html = service()
            .render_to_string("<p blatex:br/>t blatex:a='q'</p>")
            .unwrap();
        assert_eq!(html, "<p <br/>/>t <A 'q'></p>");
    }

    #[test]
    fn test_render_empty_value_keeps_whitespace() {
        let html = service().render_to_string("<p blatex:br= />").unwrap();
        assert_eq!(html, "<p <br/> />");
    }

    #[test]
    fn test_render_counts_substitutions() {
        let mut out = String::new();
        let count = service()
            .render("blatex:br and blatex:br", &mut out)
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(out, "<br/> and <br/>");
    }

    #[test]
    fn test_render_unhandled_directive() {
        let err = service().render_to_string("ok blatex:nope").unwrap_err();
        assert_eq!(
            err,
            MarkupError::Unhandled(UnhandledDirectiveError {
                key: "nope".to_owned()
            })
        );
    }

    #[test]
    fn test_render_syntax_error_keeps_partial_output() {
        let mut out = String::new();
        let err = service()
            .render("blatex:br then blatex:a=(", &mut out)
            .unwrap_err();
        assert!(matches!(
            err,
            MarkupError::Syntax(SyntaxError::OutOfRange { .. })
        ));
        assert_eq!(out, "<br/>");
    }

    struct Collect(Vec<String>);

    impl RenderSink<String> for Collect {
        fn literal(&mut self, text: &str) {
            self.0.push(format!("L:{text}"));
        }

        fn fragment(&mut self, fragment: String) {
            self.0.push(format!("F:{fragment}"));
        }
    }

    #[test]
    fn test_custom_sink() {
        let mut sink = Collect(Vec::new());
        service().render("a blatex:br b", &mut sink).unwrap();
        assert_eq!(sink.0, vec!["L:a ", "F:<br/>", "L: b"]);
    }
}
