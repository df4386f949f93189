//! Common test utilities for the fork-core crate
//! Builders for transactions and blocks used across unit tests

#![cfg(test)]

pub use crate::consensus::poison::PoisonPattern;
pub use crate::types::block::Block;
pub use crate::types::script::Script;
pub use crate::types::transaction::{OutPoint, Transaction, TransactionInput, TransactionOutput};

pub mod prelude {
    pub use super::*;

    use crate::script::script_builder::ScriptBuilder;

    /// Create a test coinbase transaction
    pub fn create_coinbase(height: u64) -> Transaction {
        create_coinbase_with_outputs(height, vec![Script::p2pkh(&[0xcb; 20])])
    }

    /// Coinbase paying to the given scripts
    pub fn create_coinbase_with_outputs(height: u64, scripts: Vec<Script>) -> Transaction {
        Transaction::new(
            1,
            vec![TransactionInput::new_coinbase(height.to_le_bytes().to_vec())],
            scripts
                .into_iter()
                .map(|script| TransactionOutput::new(50_000_000, script))
                .collect(),
            0,
        )
    }

    /// Ordinary P2PKH spend, distinct per `tag`
    pub fn ordinary_tx(tag: u8) -> Transaction {
        Transaction::new(
            1,
            vec![TransactionInput::new(
                OutPoint::new([tag; 32], 0),
                Script::from_bytes(vec![tag; 107]),
                u32::MAX,
            )],
            vec![TransactionOutput::new(10_000, Script::p2pkh(&[tag; 20]))],
            0,
        )
    }

    /// Spend with a change output plus the replay-protection output
    pub fn poisoned_tx(pattern: &PoisonPattern) -> Transaction {
        Transaction::new(
            1,
            vec![TransactionInput::new(
                OutPoint::new([0xee; 32], 1),
                Script::from_bytes(vec![0xee; 107]),
                u32::MAX,
            )],
            vec![
                TransactionOutput::new(10_000, Script::p2pkh(&[0xee; 20])),
                TransactionOutput::new(0, ScriptBuilder::replay_protection(pattern)),
            ],
            0,
        )
    }

    /// Transaction whose serialized size is at least `min_size` bytes
    pub fn padding_tx(min_size: usize) -> Transaction {
        Transaction::new(
            1,
            vec![TransactionInput::new(
                OutPoint::new([0xaa; 32], 0),
                Script::from_bytes(vec![0u8; min_size]),
                u32::MAX,
            )],
            vec![TransactionOutput::new(1, Script::p2pkh(&[0xaa; 20]))],
            0,
        )
    }

    /// Block of exactly these transactions
    pub fn create_block_from_transactions(transactions: Vec<Transaction>) -> Block {
        Block::new(1, [0u8; 32], transactions, 1_501_590_600, 0x207fffff)
    }

    /// Coinbase followed by `transactions`
    pub fn create_test_block(transactions: Vec<Transaction>) -> Block {
        let mut all = vec![create_coinbase(1)];
        all.extend(transactions);
        create_block_from_transactions(all)
    }
}
