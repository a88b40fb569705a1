//! CLI error types.

use std::path::{Path, PathBuf};

use blatex_config::ConfigError;
use blatex_markup::{MarkupError, SyntaxError, UnhandledDirectiveError, line_col};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{}:{line}:{column}: {source}", .path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        column: usize,
        source: SyntaxError,
    },

    #[error("{}: {source}", .path.display())]
    Unhandled {
        path: PathBuf,
        source: UnhandledDirectiveError,
    },
}

impl CliError {
    /// Attach the file location to a syntax error.
    pub(crate) fn syntax(path: &Path, markup: &str, source: SyntaxError) -> Self {
        let (line, column) = line_col(markup, source.position());
        Self::Syntax {
            path: path.to_path_buf(),
            line,
            column,
            source,
        }
    }

    /// Attach the file location to a rendering error.
    pub(crate) fn markup(path: &Path, markup: &str, source: MarkupError) -> Self {
        match source {
            MarkupError::Syntax(e) => Self::syntax(path, markup, e),
            MarkupError::Unhandled(e) => Self::Unhandled {
                path: path.to_path_buf(),
                source: e,
            },
        }
    }
}
