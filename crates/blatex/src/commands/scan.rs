//! `blatex scan` command implementation.

use blatex_markup::{
    DirectiveLocator, DirectiveSpan, DirectiveSyntax, SyntaxError, line_col, split_directive,
};
use clap::{Args, ValueEnum};
use console::Term;
use serde::Serialize;

use super::InputArgs;
use crate::error::CliError;
use crate::output::Output;

/// Output format for located directives.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub(crate) enum Format {
    /// One `line:col  start..end  text` row per directive.
    #[default]
    Text,
    /// JSON array of directive entries.
    Json,
}

/// Arguments for the scan command.
#[derive(Args)]
pub(crate) struct ScanArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format.
    #[arg(long, value_enum, default_value_t)]
    format: Format,
}

/// One located directive.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub(crate) struct ScanEntry<'a> {
    #[serde(flatten)]
    span: DirectiveSpan,
    line: usize,
    column: usize,
    text: &'a str,
    key: &'a str,
    value: &'a str,
}

/// Locate all directives in `markup`.
pub(crate) fn scan_entries<'a>(
    syntax: &DirectiveSyntax,
    markup: &'a str,
) -> Result<Vec<ScanEntry<'a>>, SyntaxError> {
    let locator = DirectiveLocator::new(syntax.clone());

    locator
        .locate(markup)
        .map(|span| {
            let span = span?;
            let text = span.text(markup);
            let parts = split_directive(syntax, text);
            let (line, column) = line_col(markup, span.start);
            Ok(ScanEntry {
                span,
                line,
                column,
                text,
                key: parts.key,
                value: parts.value,
            })
        })
        .collect()
}

impl ScanArgs {
    /// Execute the scan command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the file cannot be read, or
    /// a directive is malformed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let (config, markup) = self.input.load(&output)?;

        let entries = scan_entries(&config.syntax(), &markup)
            .map_err(|e| CliError::syntax(&self.input.file, &markup, e))?;

        let term = Term::stdout();
        match self.format {
            Format::Text => {
                for entry in &entries {
                    term.write_line(&format!(
                        "{}:{}\t{}..{}\t{}",
                        entry.line, entry.column, entry.span.start, entry.span.end, entry.text
                    ))?;
                }
            }
            Format::Json => term.write_line(&serde_json::to_string_pretty(&entries)?)?,
        }

        output.success(&format!("{} directive(s) found", entries.len()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scan_entries() {
        let markup = "<p>\n  <i blatex:math='x'/>\n</p>";
        let entries = scan_entries(&DirectiveSyntax::default(), markup).unwrap();

        assert_eq!(
            entries,
            vec![ScanEntry {
                span: DirectiveSpan { start: 9, end: 24 },
                line: 2,
                column: 6,
                text: "blatex:math='x'",
                key: "math",
                value: "'x'",
            }]
        );
    }

    #[test]
    fn test_scan_entries_error() {
        let err = scan_entries(&DirectiveSyntax::default(), "blatex:a=(").unwrap_err();
        assert!(matches!(err, SyntaxError::OutOfRange { .. }));
    }

    #[test]
    fn test_scan_entry_json() {
        let markup = "blatex:a=b";
        let entries = scan_entries(&DirectiveSyntax::default(), markup).unwrap();
        let json = serde_json::to_value(&entries).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "start": 0,
                "end": 10,
                "line": 1,
                "column": 1,
                "text": "blatex:a=b",
                "key": "a",
                "value": "b",
            }])
        );
    }
}
