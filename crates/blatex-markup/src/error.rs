//! Error types for directive scanning and substitution.

/// Malformed directive value found while scanning markup.
///
/// Offsets are byte offsets into the scanned markup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SyntaxError {
    /// End of string reached while a delimiter scope was still open.
    #[error("end of string encountered at offset {position}, expected {expected:?}")]
    OutOfRange {
        /// Offset of the end of the scanned text.
        position: usize,
        /// Closing token of the innermost open scope.
        expected: String,
    },

    /// A closing token with no matching open scope.
    #[error("unexpected closing delimiter {token:?} at offset {position}")]
    UnexpectedClosing {
        /// Offset of the closing token.
        position: usize,
        /// The closing token found.
        token: String,
    },
}

impl SyntaxError {
    /// Offset in the markup where the error was detected.
    pub fn position(&self) -> usize {
        match self {
            Self::OutOfRange { position, .. } | Self::UnexpectedClosing { position, .. } => {
                *position
            }
        }
    }
}

/// No fragment factory is registered for a directive key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unhandled directive {key:?}")]
pub struct UnhandledDirectiveError {
    /// The unrecognized key as written in the markup.
    pub key: String,
}

/// Error from rendering markup through the directive pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    /// Directive syntax error.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Directive key without a registered fragment factory.
    #[error(transparent)]
    Unhandled(#[from] UnhandledDirectiveError),
}
