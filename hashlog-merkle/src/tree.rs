// File: hashlog-merkle/src/tree.rs
use hashlog_arith::{locate, subtree_offsets};
use hashlog_hash::{Digest, HashConfig, Hasher, Record};
use hashlog_proof::{ProofContext, SystemContext};
use rayon::prelude::*;
use std::fmt;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::node::Node;

/// Size and root of the tree at some point in its history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeState {
    pub size: u64,
    pub root: Digest,
}

/// Append-only Merkle tree kept as a forest of perfect subtrees, largest
/// first. The forest's sizes always spell out the binary expansion of the
/// leaf count; the root folds the forest from right to left, which gives the
/// same shape as an RFC 6962 tree.
pub struct MerkleTree {
    pub(crate) hasher: Hasher,
    pub(crate) ctx: Box<dyn ProofContext>,
    pub(crate) forest: Vec<Node>,
    size: u64,
}

impl MerkleTree {
    pub fn new(config: HashConfig) -> Self { Self::with_context(config, SystemContext::new()) }

    /// Tree whose proofs are stamped by `ctx`.
    pub fn with_context(config: HashConfig, ctx: impl ProofContext + 'static) -> Self {
        Self { hasher: Hasher::new(config), ctx: Box::new(ctx), forest: Vec::new(), size: 0 }
    }

    pub fn config(&self) -> &HashConfig { self.hasher.config() }

    pub fn hasher(&self) -> &Hasher { &self.hasher }

    pub fn provider(&self) -> &str { self.ctx.provider() }

    pub fn size(&self) -> u64 { self.size }

    pub fn is_empty(&self) -> bool { self.size == 0 }

    /// Height of the whole tree, counting the forest fold.
    pub fn height(&self) -> u32 {
        if self.size <= 1 { 0 } else { u64::BITS - (self.size - 1).leading_zeros() }
    }

    pub fn forest_sizes(&self) -> Vec<u64> { self.forest.iter().map(Node::size).collect() }

    /// Append one record; returns the new size.
    pub fn append(&mut self, record: impl Into<Record>) -> Result<u64> {
        let data = self.hasher.encode(&record.into())?;
        let hash = self.hasher.hash_leaf(&data);
        self.push(Node::leaf(data, hash));
        trace!(size = self.size, "leaf appended");
        Ok(self.size)
    }

    /// Append many records, hashing them in parallel. Nothing is appended if
    /// any record fails to encode.
    pub fn extend<I, R>(&mut self, records: I) -> Result<u64>
    where
        I: IntoIterator<Item = R>,
        R: Into<Record>,
    {
        let records: Vec<Record> = records.into_iter().map(Into::into).collect();
        let hasher = self.hasher;
        let leaves = records
            .par_iter()
            .map(|r| -> Result<Node> {
                let data = hasher.encode(r)?;
                let hash = hasher.hash_leaf(&data);
                Ok(Node::leaf(data, hash))
            })
            .collect::<Result<Vec<Node>>>()?;
        let added = leaves.len();
        for leaf in leaves {
            self.push(leaf);
        }
        debug!(added, size = self.size, "leaves appended");
        Ok(self.size)
    }

    // Binary counter carry: merge while the last subtree matches the incoming height.
    fn push(&mut self, leaf: Node) {
        let mut carry = leaf;
        loop {
            match self.forest.pop() {
                Some(last) if last.height() == carry.height() => carry = Node::join(&self.hasher, last, carry),
                Some(last) => {
                    self.forest.push(last);
                    break;
                }
                None => break,
            }
        }
        self.forest.push(carry);
        self.size += 1;
    }

    pub fn root_hash(&self) -> Result<Digest> {
        self.fold(self.forest.iter().map(Node::hash).collect()).ok_or(Error::EmptyTree)
    }

    /// Root the tree had when it held `size` leaves.
    pub fn root_hash_at(&self, size: u64) -> Result<Digest> {
        if size == 0 {
            return Err(Error::EmptyTree);
        }
        let roots = self.subroots(size)?;
        self.fold(roots).ok_or(Error::EmptyTree)
    }

    pub fn snapshot(&self) -> Option<TreeState> {
        self.root_hash().ok().map(|root| TreeState { size: self.size, root })
    }

    pub fn leaf_hash(&self, index: u64) -> Result<Digest> {
        Ok(self.node_at(index, 0)?.hash().clone())
    }

    /// Encoded bytes stored at leaf `index`.
    pub fn leaf_data(&self, index: u64) -> Result<&[u8]> {
        match self.node_at(index, 0)? {
            Node::Leaf { data, .. } => Ok(data),
            Node::Interior { .. } => Err(Error::IndexOutOfRange { index, size: self.size }),
        }
    }

    /// Index of the first leaf holding `record`.
    pub fn find_leaf(&self, record: impl Into<Record>) -> Result<Option<u64>> {
        let target = self.hasher.hash_record(&record.into())?;
        let mut offset = 0u64;
        for root in &self.forest {
            if let Some(i) = root.position_of(&target) {
                return Ok(Some(offset + i));
            }
            offset += root.size();
        }
        Ok(None)
    }

    /// Node of `height` whose leftmost leaf is `offset`.
    pub(crate) fn node_at(&self, offset: u64, height: u32) -> Result<&Node> {
        let out_of_range = Error::IndexOutOfRange { index: offset, size: self.size };
        let (pos, start, h) = locate(self.size, offset).ok_or_else(|| out_of_range.clone())?;
        if height > h || offset % (1u64 << height) != 0 {
            return Err(out_of_range);
        }
        let mut scratch = Vec::new();
        Ok(self.forest[pos].descend(offset - start, height, &mut scratch))
    }

    /// Hashes of the perfect subtrees making up the state with `size` leaves.
    pub(crate) fn subroots(&self, size: u64) -> Result<Vec<&Digest>> {
        if size > self.size {
            return Err(Error::IndexOutOfRange { index: size, size: self.size });
        }
        let mut roots = Vec::new();
        for (offset, height) in subtree_offsets(size) {
            roots.push(self.node_at(offset, height)?.hash());
        }
        Ok(roots)
    }

    /// Right-to-left fold of subtree roots.
    pub(crate) fn fold(&self, roots: Vec<&Digest>) -> Option<Digest> {
        let mut it = roots.into_iter().rev();
        let last = it.next()?.clone();
        Some(it.fold(last, |acc, r| self.hasher.hash_pair(r.as_bytes(), acc.as_bytes())))
    }
}

impl fmt::Debug for MerkleTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerkleTree")
            .field("config", self.config())
            .field("provider", &self.provider())
            .field("size", &self.size)
            .field("forest", &self.forest_sizes())
            .finish()
    }
}
