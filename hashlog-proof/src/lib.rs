// File: hashlog-proof/src/lib.rs
//! Self-contained Merkle proofs: header and body, JSON and bincode codecs,
//! human-readable rendering and validation against a trusted root.

pub mod context;
pub mod error;
pub mod proof;
pub mod validator;

pub use context::{creation_moment, FixedContext, ProofContext, SystemContext};
pub use error::{Error, Result};
pub use proof::{
    stringify_path, BodyDocument, Direction, HeaderDocument, PathEntry, Proof, ProofBody, ProofDocument, ProofHeader,
    ProofParams, Status, FAILED_INDEX,
};
pub use validator::{fold_path, fold_prior, validate_proof, ValidationReceipt, Validator};
