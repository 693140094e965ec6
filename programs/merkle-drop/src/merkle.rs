//! Merkle commitment over an allocation list.
//!
//! Leaf: `keccak(index_le || recipient || amount_le)`, 48 fixed bytes.
//! Node: `keccak(min(a, b) || max(a, b))`, so proofs carry no left/right flags.
//! An odd node at the end of a level is paired with itself. A single entry
//! yields `root == leaf` and an empty proof.

use std::collections::BTreeMap;

use anchor_lang::prelude::*;
use anchor_lang::solana_program::keccak::hashv;

use crate::MerkleDropError;

pub type Hash = [u8; 32];

/// Identifies the leaf encoding and pairing rule in published artifacts.
pub const ENCODING_SCHEME: &str = "keccak256:u64le-index|pubkey|u64le-amount:sorted-pair";

/// One committed allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Entry {
    pub recipient: Pubkey,
    pub index: u64,
    pub amount: u64,
}

impl Entry {
    pub fn new(recipient: Pubkey, index: u64, amount: u64) -> Self {
        Self {
            recipient,
            index,
            amount,
        }
    }

    pub fn leaf(&self) -> Hash {
        leaf_hash(&self.recipient, self.index, self.amount)
    }
}

/// Hash of the canonical encoding of `(recipient, index, amount)`.
///
/// This must stay byte-for-byte identical to what the `claim` instruction
/// recomputes, otherwise no proof built off-chain will ever verify.
pub fn leaf_hash(recipient: &Pubkey, index: u64, amount: u64) -> Hash {
    hashv(&[
        &index.to_le_bytes(),
        recipient.as_ref(),
        &amount.to_le_bytes(),
    ])
    .0
}

/// Parent of two nodes. Order of the arguments does not matter.
pub fn hash_pair(a: &Hash, b: &Hash) -> Hash {
    // Nodes are arranged so the smaller one is on the left.
    if a <= b {
        hashv(&[a, b]).0
    } else {
        hashv(&[b, a]).0
    }
}

/// Folds `proof` into `leaf` and returns the resulting root candidate.
pub fn compute_root(leaf: Hash, proof: &[Hash]) -> Hash {
    proof.iter().fold(leaf, |current, node| hash_pair(&current, node))
}

pub fn verify_proof(proof: &[Hash], root: &Hash, leaf: &Hash) -> bool {
    compute_root(*leaf, proof) == *root
}

/// A fully built tree, kept level by level so proofs can be replayed.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    entries: Vec<Entry>,
    /// `layers[0]` holds the leaves in entry order, the last layer the root.
    layers: Vec<Vec<Hash>>,
    positions: BTreeMap<u64, usize>,
}

impl MerkleTree {
    /// Builds the tree over `entries` in the given order.
    ///
    /// Fails with `EmptyAllocationSet` for an empty list and `DuplicateIndex`
    /// if two entries share an index. The same ordered input always yields
    /// the same root and proofs.
    pub fn build(entries: &[Entry]) -> Result<Self> {
        require!(!entries.is_empty(), MerkleDropError::EmptyAllocationSet);

        let mut positions = BTreeMap::new();
        for (position, entry) in entries.iter().enumerate() {
            if positions.insert(entry.index, position).is_some() {
                msg!("Duplicate index {}", entry.index);
                return err!(MerkleDropError::DuplicateIndex);
            }
        }

        let mut layers = vec![entries.iter().map(Entry::leaf).collect::<Vec<_>>()];
        loop {
            let level = &layers[layers.len() - 1];
            if level.len() == 1 {
                break;
            }
            let next: Vec<Hash> = level
                .chunks(2)
                .map(|pair| hash_pair(&pair[0], pair.get(1).unwrap_or(&pair[0])))
                .collect();
            layers.push(next);
        }

        Ok(Self {
            entries: entries.to_vec(),
            layers,
            positions,
        })
    }

    pub fn root(&self) -> Hash {
        self.layers[self.layers.len() - 1][0]
    }

    pub fn root_hex(&self) -> String {
        format!("0x{}", hex::encode(self.root()))
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry(&self, index: u64) -> Option<&Entry> {
        self.positions.get(&index).map(|&position| &self.entries[position])
    }

    /// Number of levels above the leaves, i.e. the length of every proof.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Sibling hashes from the leaf of allocation `index` up to the root.
    pub fn proof(&self, index: u64) -> Option<Vec<Hash>> {
        let mut position = *self.positions.get(&index)?;
        let mut proof = Vec::with_capacity(self.depth());

        for level in &self.layers[..self.depth()] {
            let sibling = position ^ 1;
            // Unmatched last node was paired with itself.
            proof.push(*level.get(sibling).unwrap_or(&level[position]));
            position /= 2;
        }

        Some(proof)
    }

    /// Every entry alongside its proof, in entry order.
    pub fn proofs(&self) -> Vec<(Entry, Vec<Hash>)> {
        self.entries
            .iter()
            .filter_map(|entry| self.proof(entry.index).map(|proof| (*entry, proof)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> Pubkey {
        Pubkey::new_from_array([byte; 32])
    }

    fn sample() -> Vec<Entry> {
        vec![
            Entry::new(key(0xA), 0, 10),
            Entry::new(key(0xB), 1, 20),
            Entry::new(key(0xC), 2, 30),
        ]
    }

    #[test]
    fn test_empty_allocation_rejected() {
        let err = MerkleTree::build(&[]).unwrap_err();
        assert_eq!(err, MerkleDropError::EmptyAllocationSet.into());
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let entries = vec![Entry::new(key(1), 0, 5), Entry::new(key(2), 0, 7)];
        let err = MerkleTree::build(&entries).unwrap_err();
        assert_eq!(err, MerkleDropError::DuplicateIndex.into());
    }

    #[test]
    fn test_single_leaf() {
        let entry = Entry::new(key(1), 0, 100);
        let tree = MerkleTree::build(&[entry]).unwrap();

        assert_eq!(tree.root(), entry.leaf());
        assert_eq!(tree.depth(), 0);
        assert!(tree.proof(0).unwrap().is_empty());
    }

    #[test]
    fn test_odd_level_pairs_with_itself() {
        let entries = sample();
        let tree = MerkleTree::build(&entries).unwrap();

        let l0 = entries[0].leaf();
        let l1 = entries[1].leaf();
        let l2 = entries[2].leaf();
        let expected = hash_pair(&hash_pair(&l0, &l1), &hash_pair(&l2, &l2));
        assert_eq!(tree.root(), expected);

        let proof = tree.proof(2).unwrap();
        assert_eq!(proof, vec![l2, hash_pair(&l0, &l1)]);
    }

    #[test]
    fn test_hash_pair_is_order_independent() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        assert_eq!(hash_pair(&a, &b), hash_pair(&b, &a));
        assert_eq!(hash_pair(&a, &b), hashv(&[&a, &b]).0);
    }

    #[test]
    fn test_positional_hashing_does_not_match() {
        // Leaf order where the larger hash comes first exposes any
        // verifier that concatenates by position instead of by value.
        let entries = sample();
        let (l0, l1) = (entries[0].leaf(), entries[1].leaf());
        let (high, low) = if l0 > l1 { (l0, l1) } else { (l1, l0) };
        let tree_input = if l0 > l1 {
            vec![entries[0], entries[1]]
        } else {
            vec![entries[1], entries[0]]
        };
        let tree = MerkleTree::build(&tree_input).unwrap();

        assert_eq!(tree.root(), hashv(&[&low, &high]).0);
        assert_ne!(tree.root(), hashv(&[&high, &low]).0);
    }

    #[test]
    fn test_deterministic_build() {
        let first = MerkleTree::build(&sample()).unwrap();
        let second = MerkleTree::build(&sample()).unwrap();

        assert_eq!(first.root(), second.root());
        assert_eq!(first.proofs(), second.proofs());
    }

    #[test]
    fn test_every_proof_verifies() {
        let entries: Vec<Entry> = (0..11u8)
            .map(|i| Entry::new(key(i + 1), i as u64, 1_000 * (i as u64 + 1)))
            .collect();
        let tree = MerkleTree::build(&entries).unwrap();

        for (entry, proof) in tree.proofs() {
            assert_eq!(proof.len(), tree.depth());
            assert!(verify_proof(&proof, &tree.root(), &entry.leaf()));
        }
    }

    #[test]
    fn test_foreign_entries_do_not_verify() {
        let entries = sample();
        let tree = MerkleTree::build(&entries).unwrap();
        let root = tree.root();

        let forged = [
            Entry::new(key(0xD), 0, 10),
            Entry::new(key(0xA), 3, 10),
            Entry::new(key(0xA), 0, 11),
        ];
        for candidate in forged {
            for (_, proof) in tree.proofs() {
                assert!(!verify_proof(&proof, &root, &candidate.leaf()));
            }
        }
    }

    #[test]
    fn test_bit_flip_breaks_proof() {
        let tree = MerkleTree::build(&sample()).unwrap();
        let entry = sample()[1];
        let proof = tree.proof(1).unwrap();

        for node in 0..proof.len() {
            for bit in 0..256 {
                let mut tampered = proof.clone();
                tampered[node][bit / 8] ^= 1 << (bit % 8);
                assert!(!verify_proof(&tampered, &tree.root(), &entry.leaf()));
            }
        }
    }

    #[test]
    fn test_leaf_encoding_is_fixed_width() {
        let leaf = leaf_hash(&key(7), 1, 2);
        let mut preimage = Vec::new();
        preimage.extend_from_slice(&1u64.to_le_bytes());
        preimage.extend_from_slice(&[7u8; 32]);
        preimage.extend_from_slice(&2u64.to_le_bytes());

        assert_eq!(preimage.len(), 48);
        assert_eq!(leaf, hashv(&[&preimage]).0);
        assert_ne!(leaf_hash(&key(7), 1, 2), leaf_hash(&key(7), 2, 1));
    }

    #[test]
    fn test_unknown_index_has_no_proof() {
        let tree = MerkleTree::build(&sample()).unwrap();
        assert!(tree.proof(9).is_none());
        assert!(tree.entry(9).is_none());
        assert_eq!(tree.entry(1), Some(&sample()[1]));
    }
}
