// File: hashlog-merkle/src/prover.rs
use hashlog_arith::{subtree_offsets, trailing_height};
use hashlog_hash::Record;
use hashlog_proof::{Direction, PathEntry, Proof, ProofParams};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::tree::MerkleTree;

impl MerkleTree {
    /// Audit proof for leaf `index` against the current root.
    pub fn prove_inclusion(&self, index: i64) -> Proof { self.prove_inclusion_at(index, self.size()) }

    /// Audit proof for leaf `index` against the root the tree had at `size`.
    pub fn prove_inclusion_at(&self, index: i64, size: u64) -> Proof {
        let walked = match u64::try_from(index) {
            Ok(i) if i < size => self.walk(i, 0, size),
            _ => Err(Error::IndexOutOfRange { index: index.max(0) as u64, size }),
        };
        match walked {
            Ok(path) => {
                debug!(index, size, siblings = path.len() - 1, "audit proof generated");
                self.issue(index, path)
            }
            Err(e) => {
                warn!(index, size, error = %e, "audit proof not generated");
                self.fail()
            }
        }
    }

    /// Audit proof for the first leaf holding `record`. Fails generation if
    /// no leaf holds it.
    pub fn prove_inclusion_of(&self, record: impl Into<Record>) -> Result<Proof> {
        match self.find_leaf(record)? {
            Some(index) => Ok(self.prove_inclusion(index as i64)),
            None => {
                warn!(size = self.size(), "audit proof requested for absent record");
                Ok(self.fail())
            }
        }
    }

    /// Consistency proof showing the state with `old_size` leaves is a
    /// prefix of the current state.
    pub fn prove_consistency(&self, old_size: i64) -> Proof { self.prove_consistency_between(old_size, self.size()) }

    /// Consistency proof between two historical states, `old_size <= size`.
    pub fn prove_consistency_between(&self, old_size: i64, size: u64) -> Proof {
        let walked = match u64::try_from(old_size) {
            Ok(old) if old > 0 && old <= size => match trailing_height(old) {
                Some(height) => self.walk(old - 1, height, size),
                None => Err(Error::EmptyTree),
            },
            _ => Err(Error::IndexOutOfRange { index: old_size.max(0) as u64, size }),
        };
        match walked {
            Ok(path) => {
                debug!(old_size, size, siblings = path.len() - 1, "consistency proof generated");
                self.issue(old_size - 1, path)
            }
            Err(e) => {
                warn!(old_size, size, error = %e, "consistency proof not generated");
                self.fail()
            }
        }
    }

    /// Path from the node of `height` above leaf `index` up to the root of
    /// the state with `size` leaves. The node itself is the seed.
    fn walk(&self, index: u64, height: u32, size: u64) -> Result<Vec<PathEntry>> {
        if size > self.size() {
            return Err(Error::IndexOutOfRange { index: size, size: self.size() });
        }
        let subtrees = subtree_offsets(size);
        let pos = subtrees
            .iter()
            .position(|&(offset, h)| index >= offset && index < offset + (1u64 << h))
            .ok_or(Error::IndexOutOfRange { index, size })?;
        let (start, h) = subtrees[pos];

        let mut siblings = Vec::new();
        let seed = self.node_at(start, h)?.descend(index - start, height, &mut siblings).hash().clone();
        siblings.reverse();

        let roots = self.subroots(size)?;
        if let Some(right) = self.fold(roots[pos + 1..].to_vec()) {
            siblings.push(PathEntry::new(Direction::Right, right));
        }
        for root in roots[..pos].iter().rev() {
            siblings.push(PathEntry::new(Direction::Left, (*root).clone()));
        }

        // seed sits opposite its first sibling
        let side = match siblings.first() {
            Some(e) if e.direction == Direction::Left => Direction::Right,
            _ => Direction::Left,
        };
        let mut path = Vec::with_capacity(siblings.len() + 1);
        path.push(PathEntry::new(side, seed));
        path.extend(siblings);
        Ok(path)
    }

    fn issue(&self, index: i64, path: Vec<PathEntry>) -> Proof {
        Proof::new(&*self.ctx, ProofParams::from(self.config()), index, path)
    }

    fn fail(&self) -> Proof { Proof::failed(&*self.ctx, ProofParams::from(self.config())) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashlog_hash::HashConfig;
    use hashlog_proof::{FixedContext, Status, FAILED_INDEX};

    fn filled(n: u64) -> MerkleTree {
        let mut t = MerkleTree::with_context(HashConfig::default(), FixedContext::new("prover", 1_561_470_298));
        for i in 0..n {
            t.append(format!("{i}-th record")).unwrap();
        }
        t
    }

    #[test]
    fn seed_is_leaf_hash() {
        let t = filled(11);
        let p = t.prove_inclusion(5);
        assert_eq!(p.proof_index(), 5);
        assert_eq!(p.seed(), Some(&t.leaf_hash(5).unwrap()));
        // 5 is a right child: seed +1, first sibling -1
        assert_eq!(p.path()[0].direction, Direction::Right);
        assert_eq!(p.path()[1].direction, Direction::Left);
    }

    #[test]
    fn path_length_follows_shape() {
        // 11 = 8 + 2 + 1: leaf 5 climbs 3 levels, then one right fold
        let t = filled(11);
        assert_eq!(t.prove_inclusion(5).path().len(), 1 + 3 + 1);
        // leaf 10 is the last subtree: two larger roots on its left
        let p = t.prove_inclusion(10);
        assert_eq!(p.path().len(), 1 + 2);
        assert!(p.path()[1..].iter().all(|e| e.direction == Direction::Left));
    }

    #[test]
    fn out_of_range_fails_generation() {
        let t = filled(11);
        for index in [-1, -7, 11, 99] {
            let p = t.prove_inclusion(index);
            assert_eq!(p.proof_index(), FAILED_INDEX);
            assert!(p.path().is_empty());
            assert!(!p.generation());
            assert_eq!(p.status(), Status::Unvalidated);
        }
    }

    #[test]
    fn empty_tree_fails_generation() {
        let t = filled(0);
        assert!(!t.prove_inclusion(0).generation());
        assert!(!t.prove_consistency(0).generation());
        assert!(!t.prove_consistency(1).generation());
    }

    #[test]
    fn consistency_seed_is_smallest_prior_subtree() {
        let t = filled(13);
        let old = filled(6);
        let p = t.prove_consistency(6);
        assert_eq!(p.proof_index(), 5);
        // 6 = 4 + 2: seed covers leaves 4 and 5
        let h = t.hasher();
        let expected = h.hash_pair(t.leaf_hash(4).unwrap().as_bytes(), t.leaf_hash(5).unwrap().as_bytes());
        assert_eq!(p.seed(), Some(&expected));
        assert_eq!(p.prior_root(h), Some(old.root_hash().unwrap()));
        assert_eq!(p.recompute_root(h), Some(t.root_hash().unwrap()));
    }

    #[test]
    fn consistency_bounds() {
        let t = filled(8);
        assert!(!t.prove_consistency(-3).generation());
        assert!(!t.prove_consistency(9).generation());
        let whole = t.prove_consistency(8);
        assert_eq!(whole.path().len(), 1);
        assert!(!t.prove_consistency_between(5, 4).generation());
        assert!(!t.prove_consistency_between(2, 9).generation());
    }

    #[test]
    fn proof_for_record() {
        let t = filled(9);
        let p = t.prove_inclusion_of("7-th record").unwrap();
        assert_eq!(p.proof_index(), 7);
        assert!(!t.prove_inclusion_of("nowhere").unwrap().generation());
    }

    #[test]
    fn headers_follow_tree() {
        let t = filled(3);
        let ok = t.prove_inclusion(1);
        let bad = t.prove_inclusion(5);
        for p in [&ok, &bad] {
            assert_eq!(p.header().provider, "prover");
            assert_eq!(p.header().hash_type, "sha_256");
            assert_eq!(p.header().encoding, "utf_8");
            assert!(p.header().raw_bytes);
            assert!(p.header().security);
            assert_eq!(p.header().timestamp, 1_561_470_298);
        }
        assert_ne!(ok.uuid(), bad.uuid());
    }
}
