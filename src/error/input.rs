//! This module contains errors that occur while reading contracts from their
//! textual representations.

use thiserror::Error;

/// Errors that occur when turning user input into a
/// [`crate::contract::Contract`].
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("The provided hexadecimal input had an odd length")]
    InvalidHexLength,

    #[error("Encountered invalid hex char {_0:?} at index {_1:?}")]
    InvalidHexCharacter(char, usize),

    #[error("The contract address {_0:?} is not a hexadecimal number")]
    InvalidAddress(String),

    #[error("The jump site {_0:?} is not a decimal program counter")]
    InvalidJumpSite(String),

    #[error("Could not parse the contract description: {_0}")]
    Json(String),

    #[error("Could not read {path:?}: {message}")]
    Io { path: String, message: String },
}

/// The result type for functions that read contract input.
pub type Result<T> = std::result::Result<T, Error>;

impl From<hex::FromHexError> for Error {
    fn from(value: hex::FromHexError) -> Self {
        match value {
            hex::FromHexError::InvalidHexCharacter { c, index } => {
                Self::InvalidHexCharacter(c, index)
            }
            _ => Self::InvalidHexLength,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value.to_string())
    }
}
