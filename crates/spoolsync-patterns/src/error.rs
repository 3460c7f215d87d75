//! Error types for pattern compilation

use thiserror::Error;

/// Errors raised while compiling entity patterns
///
/// Matching itself never fails; only building a matcher can, and only when a
/// fragment table or printer prefix produces an invalid expression.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("failed to compile {concept} pattern: {source}")]
    Compile {
        concept: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("printer prefix must not be empty")]
    EmptyPrefix,
}

/// Result type for pattern construction
pub type PatternResult<T> = Result<T, PatternError>;
