//! Identifier parsing errors.

use thiserror::Error;

/// Failure to turn text or bytes into one of the typed ids.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The text is not a hyphenated or simple UUID.
    #[error("{0:?} is not a UUID")]
    InvalidUuid(String),

    /// A stored key segment does not hold exactly one UUID.
    #[error("id bytes have length {got}, expected {expected}")]
    InvalidLength {
        /// Required byte count.
        expected: usize,
        /// Byte count actually supplied.
        got: usize,
    },
}
