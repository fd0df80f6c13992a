// File: hashlog-merkle/src/shared.rs
use hashlog_hash::{Digest, Record};
use hashlog_proof::Proof;
use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;

use crate::error::Result;
use crate::tree::{MerkleTree, TreeState};

/// A tree shared between one appending writer and any number of provers.
/// Appends take the write lock; roots and proofs take read locks. A proof
/// pinned to a snapshot size stays valid however far the tree grows.
#[derive(Clone, Debug)]
pub struct SharedTree {
    inner: Arc<RwLock<MerkleTree>>,
}

impl SharedTree {
    pub fn new(tree: MerkleTree) -> Self { Self { inner: Arc::new(RwLock::new(tree)) } }

    pub fn append(&self, record: impl Into<Record>) -> Result<u64> { self.inner.write().append(record) }

    pub fn extend<I, R>(&self, records: I) -> Result<u64>
    where
        I: IntoIterator<Item = R>,
        R: Into<Record>,
    {
        self.inner.write().extend(records)
    }

    pub fn size(&self) -> u64 { self.inner.read().size() }

    pub fn root_hash(&self) -> Result<Digest> { self.inner.read().root_hash() }

    pub fn snapshot(&self) -> Option<TreeState> { self.inner.read().snapshot() }

    pub fn prove_inclusion(&self, index: i64) -> Proof { self.inner.read().prove_inclusion(index) }

    pub fn prove_inclusion_at(&self, index: i64, size: u64) -> Proof { self.inner.read().prove_inclusion_at(index, size) }

    pub fn prove_consistency(&self, old_size: i64) -> Proof { self.inner.read().prove_consistency(old_size) }

    pub fn prove_consistency_between(&self, old_size: i64, size: u64) -> Proof {
        self.inner.read().prove_consistency_between(old_size, size)
    }

    /// Hold the read lock for several queries against one state.
    pub fn read(&self) -> RwLockReadGuard<'_, MerkleTree> { self.inner.read() }
}

impl From<MerkleTree> for SharedTree {
    fn from(tree: MerkleTree) -> Self { Self::new(tree) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashlog_hash::HashConfig;
    use std::thread;

    #[test]
    fn snapshot_proofs_survive_concurrent_appends() {
        let shared = SharedTree::new(MerkleTree::new(HashConfig::default()));
        shared.extend((0..16u32).map(|i| i.to_be_bytes().to_vec())).unwrap();
        let pinned = shared.snapshot().unwrap();

        let writer = {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 16..200u32 {
                    shared.append(i.to_be_bytes().to_vec()).unwrap();
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                let pinned = pinned.clone();
                thread::spawn(move || {
                    for index in 0..16 {
                        let mut p = shared.prove_inclusion_at(index, pinned.size);
                        assert!(p.validate(&pinned.root));
                    }
                })
            })
            .collect();
        writer.join().unwrap();
        for r in readers {
            r.join().unwrap();
        }

        assert_eq!(shared.size(), 200);
        let mut p = shared.prove_consistency(pinned.size as i64);
        assert!(p.validate_consistency(&pinned.root, &shared.root_hash().unwrap()));
    }

    #[test]
    fn read_guard_sees_one_state() {
        let shared: SharedTree = MerkleTree::new(HashConfig::default()).into();
        shared.extend(["a", "b", "c"]).unwrap();
        let guard = shared.read();
        let root = guard.root_hash().unwrap();
        let mut p = guard.prove_inclusion(2);
        assert!(p.validate(&root));
    }
}
