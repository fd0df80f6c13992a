//! Property-based and exhaustive tests for tree, prover and validation

#[cfg(test)]
mod proptest_tests {
    use crate::{MerkleTree, SharedTree};
    use hashlog_arith::decompose;
    use hashlog_hash::{Digest, HashConfig, HashType, HASH_TYPES};
    use hashlog_proof::{FixedContext, Proof, Status, Validator, FAILED_INDEX};
    use proptest::prelude::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn tree(config: HashConfig) -> MerkleTree {
        MerkleTree::with_context(config, FixedContext::new("1a0894bc-9755-11e9-a651-70c94e89b637", 1_561_470_298))
    }

    fn flip(d: &Digest, byte: usize) -> Digest {
        let mut bytes = d.as_bytes().to_vec();
        bytes[byte] ^= 0x01;
        Digest::from_bytes(bytes)
    }

    #[test]
    fn audit_proofs_validate_for_every_index() {
        init_tracing();
        let mut t = tree(HashConfig::default());
        for n in 1..=500u64 {
            t.append(format!("{n}-th record")).unwrap();
            let root = t.root_hash().unwrap();
            for index in 0..n {
                let mut p = t.prove_inclusion(index as i64);
                assert!(p.validate(&root), "size {n} index {index}");

                let entry = index as usize % p.path().len();
                let byte = n as usize % root.len();
                let flipped = flip(&p.path()[entry].digest, byte);
                p.path_mut()[entry].digest = flipped;
                assert!(!p.validate(&root), "perturbed size {n} index {index}");
            }
        }
    }

    #[test]
    fn perturbed_audit_proofs_fail() {
        let mut t = tree(HashConfig::default());
        for n in 1..=40u64 {
            t.append(n.to_le_bytes().to_vec()).unwrap();
            let root = t.root_hash().unwrap();
            for index in 0..n {
                let proof = t.prove_inclusion(index as i64);
                for (i, entry) in proof.path().iter().enumerate() {
                    for byte in [0, entry.digest.len() / 2, entry.digest.len() - 1] {
                        let mut p = proof.clone();
                        p.path_mut()[i].digest = flip(&entry.digest, byte);
                        assert!(!p.validate(&root), "size {n} index {index} entry {i}");
                    }
                }
                assert!(!proof.clone().validate(&flip(&root, 0)));
            }
        }
    }

    #[test]
    fn consistency_proofs_reach_both_roots() {
        let mut t = tree(HashConfig::default());
        let mut history = Vec::new();
        for n in 1..=130u64 {
            t.append(format!("entry {n}")).unwrap();
            history.push(t.root_hash().unwrap());
        }
        let current = t.root_hash().unwrap();
        for (i, prior) in history.iter().enumerate() {
            let old = i as i64 + 1;
            let mut p = t.prove_consistency(old);
            assert_eq!(p.proof_index(), old - 1);
            assert!(p.validate_consistency(prior, &current), "old size {old}");
            assert!(!p.validate_consistency(&current, prior) || prior == &current);
        }
    }

    #[test]
    fn historical_consistency_between_any_two_states() {
        let mut t = tree(HashConfig::default());
        t.extend((0..64u32).map(|i| i.to_be_bytes().to_vec())).unwrap();
        for size in 1..=64u64 {
            let current = t.root_hash_at(size).unwrap();
            for old in 1..=size {
                let prior = t.root_hash_at(old).unwrap();
                let mut p = t.prove_consistency_between(old as i64, size);
                assert!(p.validate_consistency(&prior, &current), "{old} -> {size}");
            }
        }
    }

    #[test]
    fn eleven_leaf_scenario() {
        init_tracing();
        let config = HashConfig::from_names("sha_256", "utf_8", true, true).unwrap();
        let mut t = tree(config);
        for i in 0..11 {
            t.append(format!("{i}-th record")).unwrap();
        }
        let root = t.root_hash().unwrap();

        let mut p = t.prove_inclusion(5);
        assert_eq!(p.proof_index(), 5);
        assert_eq!(p.seed(), Some(&t.leaf_hash(5).unwrap()));
        assert_eq!(p.recompute_root(t.hasher()), Some(root.clone()));
        assert!(p.validate(&root));
        assert_eq!(p.status(), Status::Valid);

        let mut missing = t.prove_inclusion(99);
        assert_eq!(missing.proof_index(), FAILED_INDEX);
        assert!(missing.path().is_empty());
        assert!(!missing.generation());
        assert!(!missing.validate(&root));
        assert_eq!(missing.status(), Status::Invalid);

        let text = p.to_string();
        assert!(text.contains("SHA-256"));
        assert!(text.contains("UTF-8"));
        assert!(text.contains("SUCCESS"));
    }

    #[test]
    fn empty_tree_scenario() {
        let t = tree(HashConfig::default());
        assert!(t.root_hash().is_err());
        let p = t.prove_inclusion(0);
        assert_eq!(p.proof_index(), FAILED_INDEX);
        assert!(p.path().is_empty());
    }

    #[test]
    fn generated_proof_survives_transport() {
        let mut t = tree(HashConfig { hash_type: HashType::Sha3_512, ..HashConfig::default() });
        t.extend((0..23).map(|i| format!("record {i}"))).unwrap();
        let root = t.root_hash().unwrap();
        let original = t.prove_inclusion(17);

        let mut from_json = Proof::from_json(&original.to_json().unwrap()).unwrap();
        let mut from_bincode = Proof::from_bincode(&original.to_bincode().unwrap()).unwrap();
        assert_eq!(from_json, original);
        assert_eq!(from_bincode, original);

        let validator = Validator::new(FixedContext::new("auditor", 1_561_470_300));
        assert!(validator.validate(&root, &mut from_json).result);
        assert!(from_bincode.validate(&root));
    }

    #[test]
    fn random_configurations_validate() {
        let mut rng = StdRng::seed_from_u64(0x6d65726b);
        for hash_type in HASH_TYPES {
            for security in [true, false] {
                let mut t = tree(HashConfig { hash_type, security, ..HashConfig::default() });
                let n = rng.gen_range(1..80u64);
                for _ in 0..n {
                    let len = rng.gen_range(0..48usize);
                    t.append((0..len).map(|_| rng.gen::<u8>()).collect::<Vec<u8>>()).unwrap();
                }
                let root = t.root_hash().unwrap();
                let index = rng.gen_range(0..n) as i64;
                let mut p = t.prove_inclusion(index);
                assert_eq!(p.seed().map(Digest::len), Some(hash_type.digest_len()));
                assert!(p.validate(&root), "{hash_type:?} security={security}");
            }
        }
    }

    proptest! {
        #[test]
        fn forest_matches_decomposition(n in 0u64..2000) {
            let mut t = tree(HashConfig::default());
            t.extend((0..n).map(|i| i.to_le_bytes().to_vec())).unwrap();
            let expected: Vec<u64> = decompose(n as i64).into_iter().map(|e| 1u64 << e).collect();
            prop_assert_eq!(t.forest_sizes(), expected);
            prop_assert_eq!(t.size(), n);
        }

        #[test]
        fn proofs_pinned_to_snapshots_stay_valid(
            records in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..16), 1..60),
            extra in 0usize..60,
        ) {
            let shared = SharedTree::new(tree(HashConfig::default()));
            shared.extend(records.clone()).unwrap();
            let state = shared.snapshot().unwrap();
            shared.extend((0..extra).map(|i| format!("later {i}"))).unwrap();

            for index in 0..records.len() {
                let mut p = shared.prove_inclusion_at(index as i64, state.size);
                prop_assert!(p.validate(&state.root));
            }
            let mut c = shared.prove_consistency(state.size as i64);
            prop_assert!(c.validate_consistency(&state.root, &shared.root_hash().unwrap()));
        }

        #[test]
        fn text_and_bytes_agree_under_utf8(text in "[a-zA-Z0-9 ]{0,32}") {
            let mut a = tree(HashConfig::default());
            let mut b = tree(HashConfig::default());
            a.append(text.as_str()).unwrap();
            b.append(text.as_bytes().to_vec()).unwrap();
            prop_assert_eq!(a.root_hash().unwrap(), b.root_hash().unwrap());
        }
    }
}
