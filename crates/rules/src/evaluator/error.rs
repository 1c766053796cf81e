//! Condition compile errors.

/// A condition that could not be turned into a predicate.
///
/// Reported and skipped; the surrounding group keeps its other predicates.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("condition must have exactly 3 parts (column, pattern, mode), found {found}")]
    Arity { found: usize },

    #[error("condition part {index} is not a scalar value")]
    NonScalar { index: usize },

    #[error("unsupported mode '{0}'")]
    UnknownMode(String),

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("condition column must not be empty")]
    EmptyColumn,
}
