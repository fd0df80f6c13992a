// File: hashlog-merkle/src/lib.rs
//! Append-only Merkle tree over a forest of perfect subtrees, with audit and
//! consistency proof generation against current or historical states.

pub mod error;
pub mod node;
pub mod prover;
pub mod shared;
pub mod tree;

pub use error::{Error, Result};
pub use node::Node;
pub use shared::SharedTree;
pub use tree::{MerkleTree, TreeState};

#[cfg(test)]
mod tests_proptest;
