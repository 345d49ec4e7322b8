use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("A secret must be split into at least 2 shares, got {0}")]
    InvalidShareCount(usize),

    #[error("Byte length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("Shapes of the quantities do not match")]
    ShapeMismatch,

    #[error("Not all shares are present")]
    IncompleteShares,

    #[error("Invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

pub type Result<T> = std::result::Result<T, Error>;
