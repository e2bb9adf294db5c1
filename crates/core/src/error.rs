//! Error types for collation

use thiserror::Error;

use crate::algorithm::Delta;
use crate::range::Range;
use crate::text::TextId;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, CollateError>;

/// Failures surfaced by a collation call.
///
/// Collaborator failures abort the call in progress. Nothing is retried.
#[derive(Debug, Error)]
pub enum CollateError {
    /// Underlying I/O failure from a collaborator
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// The token source could not tokenize a text
    #[error("tokenizing text {text} failed: {message}")]
    TokenSource { text: TextId, message: String },

    /// The difference store rejected a write or flush
    #[error("difference store failure: {0}")]
    Store(String),

    /// The transposition source could not produce candidates
    #[error("transposition lookup failed: {0}")]
    Transpositions(String),

    /// A range does not fit inside its text or splits a character
    #[error("range {range} is not valid for text {text} of length {len}")]
    InvalidRange { text: TextId, range: Range, len: usize },

    /// A diff primitive produced a delta that does not fit the token lists
    #[error(
        "delta {delta:?} is out of order or exceeds token lists \
         ({base_len} base, {witness_len} witness)"
    )]
    MalformedDelta {
        delta: Delta,
        base_len: usize,
        witness_len: usize,
    },
}
