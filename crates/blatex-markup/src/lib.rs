//! Directive scanning and substitution for blatex markup.
//!
//! Markup strings may embed directives led by a reserved prefix:
//!
//! ```text
//! <p>Euler: blatex:math=@(e^{i\pi} + 1 = 0)</p>
//! <hr blatex:rule/>
//! ```
//!
//! A directive is the prefix, a key made of identifier characters and an
//! optional `= value`. The value is a bare identifier or a span bounded by
//! one of the configured [`DelimiterPair`]s, which may nest.
//!
//! # Architecture
//!
//! - [`DirectiveLocator`]: lazily yields the [`DirectiveSpan`] of every
//!   directive in a markup string, or a [`SyntaxError`] for malformed values.
//! - [`DirectiveSubstituter`]: splits a located directive into key and value
//!   and invokes the [`FragmentFactory`] registered for the key in a
//!   [`FragmentRegistry`].
//! - [`MarkupService`]: combines both and yields literal text and fragments
//!   in source order to a [`RenderSink`].
//!
//! All lexical settings live in one [`DirectiveSyntax`] value shared by the
//! locator and the substituter.
//!
//! # Example
//!
//! ```
//! use blatex_markup::{DirectiveSyntax, FragmentFactory, FragmentRegistry, MarkupService};
//!
//! let registry = FragmentRegistry::new()
//!     .with("math", FragmentFactory::with_arg(|v| format!("<m>{v}</m>")))
//!     .with("rule", FragmentFactory::no_arg(|| "<hr/>".to_owned()));
//! let service = MarkupService::new(DirectiveSyntax::default(), registry);
//!
//! let html = service
//!     .render_to_string("<p>blatex:math=(x^2)</p>blatex:rule")
//!     .unwrap();
//! assert_eq!(html, "<p><m>(x^2)</m></p><hr/>");
//! ```

mod error;
mod locator;
mod registry;
mod service;
mod substitute;
mod syntax;
mod util;

pub use error::{MarkupError, SyntaxError, UnhandledDirectiveError};
pub use locator::{DirectiveLocator, DirectiveSpan, Locate};
pub use registry::{FragmentFactory, FragmentRegistry, NoArgFn, WithArgFn};
pub use service::{MarkupService, RenderSink, Segment, Segments};
pub use substitute::{DirectiveParts, DirectiveSubstituter, split_directive};
pub use syntax::{DEFAULT_ASSIGNMENT, DEFAULT_PREFIX, DelimiterPair, DirectiveSyntax};
pub use util::{escape_html, line_col};
