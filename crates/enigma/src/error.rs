//! Error taxonomy shared by the cipher engine, the scorers and the search.
//!
//! Construction-time violations are always surfaced to the caller. Two variants
//! are not failures in the usual sense: `EmptyCiphertext` is a reportable
//! no-op and `Cancelled` marks a cooperative early exit (see [`EnigmaError::is_fatal`]).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnigmaError {
    #[error("invalid permutation: {0}")]
    InvalidPermutation(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid character {found:?} at offset {offset} (expected A-Z)")]
    InvalidCharacter { offset: usize, found: char },

    #[error("ciphertext is empty")]
    EmptyCiphertext,

    #[error("no rotors available in the search catalog")]
    NoRotorsAvailable,

    #[error("invalid keyspace bounds: {0}")]
    InvalidKeyspaceBounds(String),

    #[error("search cancelled")]
    Cancelled,
}

impl EnigmaError {
    pub(crate) fn permutation(reason: impl Into<String>) -> Self {
        Self::InvalidPermutation(reason.into())
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }

    pub(crate) fn bounds(reason: impl Into<String>) -> Self {
        Self::InvalidKeyspaceBounds(reason.into())
    }

    /// False for outcomes a caller should report and move on from.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::EmptyCiphertext | Self::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, EnigmaError>;
