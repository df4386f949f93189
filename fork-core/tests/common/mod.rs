//! Builders shared by the fork-core integration tests

#![allow(dead_code)]

use fork_core::consensus::PoisonPattern;
use fork_core::script::ScriptBuilder;
use fork_core::types::{Block, OutPoint, Script, Transaction, TransactionInput, TransactionOutput};

/// Single-input transaction paying to `scripts`, distinct per `tag`
pub fn tx_with_outputs(tag: u8, scripts: Vec<Script>) -> Transaction {
    Transaction::new(
        1,
        vec![TransactionInput::new(
            OutPoint::new([tag; 32], 0),
            Script::from_bytes(vec![tag; 72]),
            u32::MAX,
        )],
        scripts
            .into_iter()
            .map(|script| TransactionOutput::new(0, script))
            .collect(),
        0,
    )
}

/// Ordinary P2PKH payment
pub fn ordinary_tx(tag: u8) -> Transaction {
    tx_with_outputs(tag, vec![Script::p2pkh(&[tag; 20])])
}

/// One output, value 0, `OP_RETURN <marker>`
pub fn poisoned_tx(tag: u8, pattern: &PoisonPattern) -> Transaction {
    tx_with_outputs(tag, vec![ScriptBuilder::replay_protection(pattern)])
}

pub fn coinbase(height: u32) -> Transaction {
    Transaction::new(
        1,
        vec![TransactionInput::new_coinbase(height.to_le_bytes().to_vec())],
        vec![TransactionOutput::new(1_250_000_000, Script::p2pkh(&[0xcb; 20]))],
        0,
    )
}

pub fn block_of(transactions: Vec<Transaction>) -> Block {
    Block::new(0x2000_0000, [0x11; 32], transactions, 1_501_590_600, 0x1800_0000)
}
