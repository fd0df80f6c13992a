// File: hashlog-hash/src/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unsupported hash type: {0}")]
    UnsupportedHashType(String),

    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// Text record with characters the configured encoding cannot represent
    #[error("Text cannot be encoded as {encoding}: {reason}")]
    Unencodable { encoding: String, reason: String },

    /// Byte record rejected because raw bytes are disabled and it does not decode
    #[error("Record does not decode under {encoding}")]
    UndecodableRecord { encoding: String },

    #[error("Invalid hex digest: {0}")]
    InvalidHex(String),
}

impl From<hex::FromHexError> for Error {
    fn from(e: hex::FromHexError) -> Self { Error::InvalidHex(e.to_string()) }
}

pub type Result<T> = std::result::Result<T, Error>;
