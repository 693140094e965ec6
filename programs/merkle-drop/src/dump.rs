//! Publishable form of a built tree.
//!
//! The dump carries everything a claimant needs to regenerate their proof
//! offline: the encoding scheme, the full entry list and the root.

use std::str::FromStr;

use anchor_lang::prelude::Pubkey;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::merkle::{Entry, Hash, MerkleTree, ENCODING_SCHEME};

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("unsupported encoding scheme {0:?}")]
    UnknownFormat(String),
    #[error("invalid recipient {0:?}")]
    InvalidRecipient(String),
    #[error("invalid hash {0:?}")]
    InvalidHash(String),
    #[error("entries do not form a tree: {0}")]
    Tree(String),
    #[error("root mismatch: dump has {stored}, entries give {computed}")]
    RootMismatch { stored: String, computed: String },
    #[error("stored proof for index {0} does not match the rebuilt tree")]
    ProofMismatch(u64),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DumpEntry {
    /// Base58 public key.
    pub recipient: String,
    pub index: u64,
    pub amount: u64,
    /// 0x-prefixed sibling hashes, leaf to root.
    pub proof: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AllocationDump {
    pub format: String,
    pub root: String,
    pub entries: Vec<DumpEntry>,
}

pub fn encode_hash(hash: &Hash) -> String {
    format!("0x{}", hex::encode(hash))
}

pub fn decode_hash(value: &str) -> Result<Hash, DumpError> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let mut hash = [0u8; 32];
    hex::decode_to_slice(digits, &mut hash).map_err(|_| DumpError::InvalidHash(value.to_string()))?;
    Ok(hash)
}

impl DumpEntry {
    pub fn entry(&self) -> Result<Entry, DumpError> {
        let recipient = Pubkey::from_str(&self.recipient)
            .map_err(|_| DumpError::InvalidRecipient(self.recipient.clone()))?;
        Ok(Entry::new(recipient, self.index, self.amount))
    }

    pub fn proof(&self) -> Result<Vec<Hash>, DumpError> {
        self.proof.iter().map(|node| decode_hash(node)).collect()
    }
}

impl AllocationDump {
    pub fn from_tree(tree: &MerkleTree) -> Self {
        let entries = tree
            .proofs()
            .into_iter()
            .map(|(entry, proof)| DumpEntry {
                recipient: entry.recipient.to_string(),
                index: entry.index,
                amount: entry.amount,
                proof: proof.iter().map(encode_hash).collect(),
            })
            .collect();

        Self {
            format: ENCODING_SCHEME.to_string(),
            root: tree.root_hex(),
            entries,
        }
    }

    pub fn to_json(&self) -> Result<String, DumpError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, DumpError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn root(&self) -> Result<Hash, DumpError> {
        decode_hash(&self.root)
    }

    pub fn find(&self, index: u64) -> Option<&DumpEntry> {
        self.entries.iter().find(|entry| entry.index == index)
    }

    /// Replays the builder over the dumped entries and checks the stored
    /// root and every stored proof against the result.
    pub fn rebuild(&self) -> Result<MerkleTree, DumpError> {
        if self.format != ENCODING_SCHEME {
            return Err(DumpError::UnknownFormat(self.format.clone()));
        }

        let entries = self
            .entries
            .iter()
            .map(DumpEntry::entry)
            .collect::<Result<Vec<_>, _>>()?;
        let tree = MerkleTree::build(&entries).map_err(|e| DumpError::Tree(e.to_string()))?;

        if tree.root() != self.root()? {
            return Err(DumpError::RootMismatch {
                stored: self.root.clone(),
                computed: tree.root_hex(),
            });
        }

        for dumped in &self.entries {
            if tree.proof(dumped.index) != Some(dumped.proof()?) {
                return Err(DumpError::ProofMismatch(dumped.index));
            }
        }
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merkle::verify_proof;

    fn tree() -> MerkleTree {
        let entries = vec![
            Entry::new(Pubkey::new_from_array([0xA; 32]), 0, 10),
            Entry::new(Pubkey::new_from_array([0xB; 32]), 1, 20),
            Entry::new(Pubkey::new_from_array([0xC; 32]), 2, 30),
        ];
        MerkleTree::build(&entries).unwrap()
    }

    #[test]
    fn test_dump_reloads_to_same_root() {
        let tree = tree();
        let json = AllocationDump::from_tree(&tree).to_json().unwrap();
        let dump = AllocationDump::from_json(&json).unwrap();

        assert_eq!(dump.format, ENCODING_SCHEME);
        assert_eq!(dump.root, tree.root_hex());
        assert_eq!(dump.rebuild().unwrap().root(), tree.root());
    }

    #[test]
    fn test_dumped_proofs_verify() {
        let tree = tree();
        let dump = AllocationDump::from_tree(&tree);
        let root = dump.root().unwrap();

        for dumped in &dump.entries {
            let entry = dumped.entry().unwrap();
            assert!(verify_proof(&dumped.proof().unwrap(), &root, &entry.leaf()));
        }
    }

    #[test]
    fn test_tampered_amount_is_detected() {
        let mut dump = AllocationDump::from_tree(&tree());
        dump.entries[1].amount = 2_000;

        assert!(matches!(dump.rebuild(), Err(DumpError::RootMismatch { .. })));
    }

    #[test]
    fn test_tampered_proof_is_detected() {
        let mut dump = AllocationDump::from_tree(&tree());
        dump.entries[0].proof[0] = encode_hash(&[0u8; 32]);

        assert!(matches!(dump.rebuild(), Err(DumpError::ProofMismatch(0))));
    }

    #[test]
    fn test_truncated_proof_is_detected() {
        let mut dump = AllocationDump::from_tree(&tree());
        dump.entries[2].proof.pop();

        assert!(matches!(dump.rebuild(), Err(DumpError::ProofMismatch(2))));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let mut dump = AllocationDump::from_tree(&tree());
        dump.format = "sha256:positional".to_string();

        assert!(matches!(dump.rebuild(), Err(DumpError::UnknownFormat(_))));
    }

    #[test]
    fn test_decode_hash() {
        let hash = [0x5a; 32];
        assert_eq!(decode_hash(&encode_hash(&hash)).unwrap(), hash);
        assert_eq!(decode_hash(&hex::encode(hash)).unwrap(), hash);
        assert!(matches!(decode_hash("0x1234"), Err(DumpError::InvalidHash(_))));
    }

    #[test]
    fn test_bad_recipient_rejected() {
        let mut dump = AllocationDump::from_tree(&tree());
        dump.entries[0].recipient = "not-a-key".to_string();

        assert!(matches!(dump.rebuild(), Err(DumpError::InvalidRecipient(_))));
    }
}
