use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::transaction::{compact_size_len, Transaction};

/// Serialized header length in bytes
pub const BLOCK_HEADER_SIZE: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    version: u32,
    #[serde(with = "hex::serde")]
    prev_block_hash: [u8; 32],
    #[serde(with = "hex::serde")]
    merkle_root: [u8; 32],
    timestamp: u32,
    bits: u32,
    nonce: u32,
}

/// Block as seen by the fork rules: header plus ordered transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    header: BlockHeader,
    transactions: Vec<Transaction>,
}

impl BlockHeader {
    pub fn new(
        version: u32,
        prev_block_hash: [u8; 32],
        merkle_root: [u8; 32],
        timestamp: u32,
        bits: u32,
        nonce: u32,
    ) -> Self {
        Self {
            version,
            prev_block_hash,
            merkle_root,
            timestamp,
            bits,
            nonce,
        }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&self.prev_block_hash);
        out.extend_from_slice(&self.merkle_root);
        out.extend_from_slice(&self.timestamp.to_le_bytes());
        out.extend_from_slice(&self.bits.to_le_bytes());
        out.extend_from_slice(&self.nonce.to_le_bytes());
    }

    /// Double SHA-256 of the 80-byte header
    pub fn hash(&self) -> [u8; 32] {
        let mut buf = Vec::with_capacity(BLOCK_HEADER_SIZE);
        self.encode(&mut buf);
        double_sha256(&buf)
    }
}

impl Block {
    /// Build a block, committing to `transactions` in the header's merkle root
    pub fn new(
        version: u32,
        prev_block_hash: [u8; 32],
        transactions: Vec<Transaction>,
        timestamp: u32,
        bits: u32,
    ) -> Self {
        let merkle_root = Self::calculate_merkle_root(&transactions);

        Self {
            header: BlockHeader::new(version, prev_block_hash, merkle_root, timestamp, bits, 0),
            transactions,
        }
    }

    pub fn hash(&self) -> [u8; 32] {
        self.header.hash()
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash())
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Serialized size in bytes: header, transaction count, transactions
    pub fn size(&self) -> usize {
        BLOCK_HEADER_SIZE
            + compact_size_len(self.transactions.len())
            + self
                .transactions
                .iter()
                .map(Transaction::serialized_size)
                .sum::<usize>()
    }

    /// Full consensus serialization
    #[cfg(test)]
    fn encode(&self, out: &mut Vec<u8>) {
        self.header.encode(out);
        crate::types::transaction::write_compact_size(out, self.transactions.len());
        for tx in &self.transactions {
            tx.encode(out);
        }
    }

    /// Bitcoin-style merkle root over txids (last node duplicated on odd levels)
    pub fn calculate_merkle_root(transactions: &[Transaction]) -> [u8; 32] {
        let mut level: Vec<[u8; 32]> = transactions.iter().map(Transaction::txid).collect();
        if level.is_empty() {
            return [0u8; 32];
        }

        while level.len() > 1 {
            level = level
                .chunks(2)
                .map(|pair| {
                    let left = &pair[0];
                    let right = pair.get(1).unwrap_or(left);
                    let mut buf = [0u8; 64];
                    buf[..32].copy_from_slice(left);
                    buf[32..].copy_from_slice(right);
                    double_sha256(&buf)
                })
                .collect();
        }
        level[0]
    }
}

fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&second);
    hash
}
