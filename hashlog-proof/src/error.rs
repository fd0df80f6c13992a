// File: hashlog-proof/src/error.rs
use thiserror::Error;

/// Failures reconstructing a proof from its serialized form
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed proof: {0}")]
    MalformedSerialization(String),

    #[error("Malformed proof JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed proof encoding: {0}")]
    Bincode(#[from] bincode::Error),

    #[error(transparent)]
    Hash(#[from] hashlog_hash::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
