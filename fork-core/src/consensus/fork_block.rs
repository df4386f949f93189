//! Block rules for the fork chain
//!
//! A block is valid on the fork only if none of its transactions carries the
//! replay-protection marker. The minimum size of the activation block is
//! deliberately not checked here: this validator has no height or time
//! context, so the caller applies
//! [`check_fork_block_size`](crate::consensus::activation::check_fork_block_size)
//! once it knows whether the block activates the fork.

use tracing::{debug, error, warn};

use crate::consensus::fork_tx::ForkTxValidator;
use crate::consensus::poison::PoisonPattern;
use crate::error::ForkRuleError;
use crate::types::block::Block;
use crate::validation::state::ValidationSink;

/// Stateless block validator; every call is independent
#[derive(Debug, Clone, Copy)]
pub struct ForkBlockValidator<'p> {
    tx_validator: ForkTxValidator<'p>,
}

impl Default for ForkBlockValidator<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl ForkBlockValidator<'static> {
    /// Validator using the process-wide marker
    pub fn new() -> Self {
        Self {
            tx_validator: ForkTxValidator::new(),
        }
    }
}

impl<'p> ForkBlockValidator<'p> {
    /// Validator bound to an explicit marker
    pub fn with_pattern(pattern: &'p PoisonPattern) -> Self {
        Self {
            tx_validator: ForkTxValidator::with_pattern(pattern),
        }
    }

    /// Apply the fork's block rules
    ///
    /// Returns false and records exactly one rejection on `sink` when the
    /// block fails; leaves `sink` untouched when it passes. Scanning stops at
    /// the first failing transaction.
    pub fn validate_block(&self, block: &Block, sink: &mut dyn ValidationSink) -> bool {
        let transactions = block.transactions();

        // Every block carries at least a coinbase; an empty list is a broken caller contract
        if transactions.is_empty() {
            let err = ForkRuleError::InternalContractViolation(format!(
                "block {} has no transactions",
                block.hash_hex()
            ));
            error!(block = %block.hash_hex(), "{}", err);
            sink.record(&err, err.to_string());
            return false;
        }

        for (index, tx) in transactions.iter().enumerate() {
            if let Err(err) = self.tx_validator.validate_tx(tx) {
                let debug_message = format!(
                    "transaction {} ({}) is invalid on the fork chain: {}",
                    index,
                    tx.txid_hex(),
                    err
                );
                warn!(
                    block = %block.hash_hex(),
                    tx_index = index,
                    coinbase = tx.is_coinbase(),
                    reason = err.reject_reason(),
                    "Rejecting block: {}",
                    debug_message
                );
                sink.record(&err, debug_message);
                return false;
            }
        }

        debug!(
            block = %block.hash_hex(),
            txs = transactions.len(),
            "Block passes fork transaction rules"
        );
        true
    }
}

/// Fork block rules using the process-wide marker
pub fn validate_block(block: &Block, sink: &mut dyn ValidationSink) -> bool {
    ForkBlockValidator::new().validate_block(block, sink)
}
