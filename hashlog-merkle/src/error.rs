// File: hashlog-merkle/src/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Root requested from a tree without leaves
    #[error("Empty tree has no root")]
    EmptyTree,

    #[error("Index {index} out of range for tree of size {size}")]
    IndexOutOfRange { index: u64, size: u64 },

    #[error(transparent)]
    Hash(#[from] hashlog_hash::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
