// File: hashlog-proof/src/validator.rs
use hashlog_hash::{Digest, Hasher};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::context::{creation_moment, ProofContext};
use crate::error::Result;
use crate::proof::{Direction, PathEntry, Proof, Status};

/// Replay a path from its seed, applying every sibling on its recorded side.
pub fn fold_path(hasher: &Hasher, path: &[PathEntry]) -> Option<Digest> {
    let (seed, rest) = path.split_first()?;
    Some(rest.iter().fold(seed.digest.clone(), |acc, e| apply(hasher, acc, e)))
}

/// Replay only the left siblings. For a consistency path this rebuilds the
/// prior root: its left siblings are exactly the prior state's larger subtrees.
pub fn fold_prior(hasher: &Hasher, path: &[PathEntry]) -> Option<Digest> {
    let (seed, rest) = path.split_first()?;
    Some(
        rest.iter()
            .filter(|e| e.direction == Direction::Left)
            .fold(seed.digest.clone(), |acc, e| apply(hasher, acc, e)),
    )
}

#[inline]
fn apply(hasher: &Hasher, acc: Digest, e: &PathEntry) -> Digest {
    match e.direction {
        Direction::Left => hasher.hash_pair(e.digest.as_bytes(), acc.as_bytes()),
        Direction::Right => hasher.hash_pair(acc.as_bytes(), e.digest.as_bytes()),
    }
}

impl Proof {
    /// Candidate root implied by the path, or `None` for an empty path.
    pub fn recompute_root(&self, hasher: &Hasher) -> Option<Digest> { fold_path(hasher, self.path()) }

    /// Prior root implied by a consistency path.
    pub fn prior_root(&self, hasher: &Hasher) -> Option<Digest> { fold_prior(hasher, self.path()) }

    /// Validate against `target` with the hashing rules named in the header.
    /// Unknown hash or encoding names make the proof invalid.
    pub fn validate(&mut self, target: &Digest) -> bool {
        match self.hash_config() {
            Ok(cfg) => self.validate_with(target, &Hasher::new(cfg)),
            Err(e) => {
                warn!(proof = %self.uuid(), error = %e, "proof names unsupported hashing");
                self.conclude(false)
            }
        }
    }

    /// Validate against `target` with an explicit hasher, which must agree
    /// with the header on hash type and security mode.
    pub fn validate_with(&mut self, target: &Digest, hasher: &Hasher) -> bool {
        let ok = self.replayable(hasher) && self.recompute_root(hasher).as_ref() == Some(target);
        self.conclude(ok)
    }

    /// Validate a consistency proof against both the trusted prior root and
    /// the trusted current root.
    pub fn validate_consistency(&mut self, prior_root: &Digest, current_root: &Digest) -> bool {
        let hasher = match self.hash_config() {
            Ok(cfg) => Hasher::new(cfg),
            Err(_) => return self.conclude(false),
        };
        let ok = self.replayable(&hasher)
            && self.prior_root(&hasher).as_ref() == Some(prior_root)
            && self.recompute_root(&hasher).as_ref() == Some(current_root);
        self.conclude(ok)
    }

    fn replayable(&self, hasher: &Hasher) -> bool {
        if !self.generation() || self.path().is_empty() {
            return false;
        }
        let cfg = hasher.config();
        if cfg.hash_type.name() != self.header().hash_type || cfg.security != self.header().security {
            return false;
        }
        self.path().iter().all(|e| e.digest.len() == hasher.digest_len())
    }

    fn conclude(&mut self, ok: bool) -> bool {
        self.set_status(if ok { Status::Valid } else { Status::Invalid });
        debug!(proof = %self.uuid(), index = self.proof_index(), valid = ok, "proof validated");
        ok
    }
}

/// Validate `proof` against a trusted root using only what the proof carries.
pub fn validate_proof(target: &Digest, proof: &mut Proof) -> bool { proof.validate(target) }

/// Record of one validation, stamped by the validating party.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReceipt {
    pub uuid: String,
    pub timestamp: i64,
    pub validation_moment: String,
    pub proof_uuid: String,
    pub proof_provider: String,
    pub target: Digest,
    pub result: bool,
}

impl ValidationReceipt {
    pub fn to_json(&self) -> Result<String> { Ok(serde_json::to_string_pretty(self)?) }

    pub fn from_json(text: &str) -> Result<Self> { Ok(serde_json::from_str(text)?) }
}

/// Validates proofs on behalf of a verifier and issues receipts.
pub struct Validator {
    ctx: Box<dyn ProofContext>,
}

impl Validator {
    pub fn new(ctx: impl ProofContext + 'static) -> Self { Self { ctx: Box::new(ctx) } }

    pub fn validate(&self, target: &Digest, proof: &mut Proof) -> ValidationReceipt {
        let result = proof.validate(target);
        self.receipt(target, proof, result)
    }

    pub fn validate_consistency(&self, prior_root: &Digest, current_root: &Digest, proof: &mut Proof) -> ValidationReceipt {
        let result = proof.validate_consistency(prior_root, current_root);
        self.receipt(current_root, proof, result)
    }

    fn receipt(&self, target: &Digest, proof: &Proof, result: bool) -> ValidationReceipt {
        let timestamp = self.ctx.timestamp();
        ValidationReceipt {
            uuid: self.ctx.new_uuid(),
            timestamp,
            validation_moment: creation_moment(timestamp),
            proof_uuid: proof.uuid().to_string(),
            proof_provider: proof.header().provider.clone(),
            target: target.clone(),
            result,
        }
    }
}
