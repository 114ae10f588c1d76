//! Error types for ranking configuration.
//!
//! Only configuration problems are errors. Malformed catalog rows degrade to
//! sentinel values and insufficient candidates are reported through metadata
//! flags, so neither shows up here.

use thiserror::Error;

/// Errors that stop a ranking request before any scoring happens.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RankError {
    #[error("unknown lexicon profile '{name}'; available profiles: {}", .available.join(", "))]
    UnknownProfile { name: String, available: Vec<String> },

    #[error("unknown field '{field}'; fields in catalog: {}", .known.join(", "))]
    UnknownField { field: String, known: Vec<String> },

    #[error("invalid rating '{token}'; expected one of: {}", .valid.join(", "))]
    InvalidRating { token: String, valid: Vec<String> },

    #[error("invalid mode '{token}'; expected one of: easy, medium, hard (aliases: fit, value)")]
    InvalidMode { token: String },

    #[error("invalid lexicon: {0}")]
    InvalidLexicon(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// Result type for ranking operations.
pub type Result<T> = std::result::Result<T, RankError>;
