//! Transaction rules for the fork chain
//!
//! A transaction is invalid on the fork if any output script starts with
//! `OP_RETURN` followed immediately by a single push of exactly the
//! replay-protection marker. Wallets add such an output to keep a payment on
//! the legacy chain only.

use tracing::debug;

use crate::consensus::poison::{poison_pattern, PoisonPattern};
use crate::error::{ForkRuleError, ForkRuleResult};
use crate::script::instruction::Instruction;
use crate::types::script::Script;
use crate::types::transaction::Transaction;

/// Checks single transactions against the fork rules
///
/// Holds only a borrowed marker, so it is cheap to copy and safe to share
/// between threads.
#[derive(Debug, Clone, Copy)]
pub struct ForkTxValidator<'p> {
    pattern: &'p PoisonPattern,
}

impl Default for ForkTxValidator<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl ForkTxValidator<'static> {
    /// Validator using the process-wide marker
    pub fn new() -> Self {
        Self {
            pattern: poison_pattern(),
        }
    }
}

impl<'p> ForkTxValidator<'p> {
    /// Validator bound to an explicit marker
    pub fn with_pattern(pattern: &'p PoisonPattern) -> Self {
        Self { pattern }
    }

    /// Whether a single output script is `OP_RETURN <marker> ...`
    pub fn is_script_poisoned(&self, script: &Script) -> bool {
        if !script.is_op_return() {
            return false;
        }

        // Skip the OP_RETURN itself
        let mut instructions = script.instructions().skip(1);

        // Anything after the marker push is not inspected
        matches!(
            instructions.next(),
            Some(Ok(Instruction::Push(data))) if self.pattern.matches(data)
        )
    }

    /// Index of the first output carrying the marker
    pub fn poisoned_output_index(&self, tx: &Transaction) -> Option<usize> {
        tx.outputs()
            .iter()
            .position(|output| self.is_script_poisoned(output.script_pubkey()))
    }

    /// True iff at least one output carries the marker
    pub fn is_tx_output_poisoned(&self, tx: &Transaction) -> bool {
        self.poisoned_output_index(tx).is_some()
    }

    /// Fork transaction acceptance rule, layered over ordinary checks done elsewhere
    ///
    /// # Errors
    /// Returns `ForkRuleError::PoisonedOutput` naming the first marked output
    pub fn validate_tx(&self, tx: &Transaction) -> ForkRuleResult<()> {
        match self.poisoned_output_index(tx) {
            Some(output_index) => {
                debug!(
                    txid = %tx.txid_hex(),
                    output_index,
                    "Transaction carries replay-protection marker"
                );
                Err(ForkRuleError::PoisonedOutput { output_index })
            }
            None => Ok(()),
        }
    }
}

/// True iff `tx` has an output tagged with the process-wide marker
pub fn is_tx_output_poisoned(tx: &Transaction) -> bool {
    ForkTxValidator::new().is_tx_output_poisoned(tx)
}

/// Fork acceptance rule for a single transaction (mempool admission, block checks)
pub fn validate_tx(tx: &Transaction) -> ForkRuleResult<()> {
    ForkTxValidator::new().validate_tx(tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::script_builder::ScriptBuilder;
    use crate::types::script::OpCode;
    use crate::types::transaction::{OutPoint, TransactionInput, TransactionOutput};

    fn tx_with_scripts(scripts: Vec<Script>) -> Transaction {
        Transaction::new(
            1,
            vec![TransactionInput::new(
                OutPoint::new([7u8; 32], 0),
                Script::from_bytes(vec![0u8; 72]),
                u32::MAX,
            )],
            scripts
                .into_iter()
                .map(|script| TransactionOutput::new(0, script))
                .collect(),
            0,
        )
    }

    fn marker() -> PoisonPattern {
        PoisonPattern::default_marker()
    }

    #[test]
    fn test_op_return_marker_is_poisoned() {
        let pattern = marker();
        let validator = ForkTxValidator::with_pattern(&pattern);
        let tx = tx_with_scripts(vec![ScriptBuilder::replay_protection(&pattern)]);

        assert!(validator.is_tx_output_poisoned(&tx));
        assert_eq!(
            validator.validate_tx(&tx),
            Err(ForkRuleError::PoisonedOutput { output_index: 0 })
        );
    }

    #[test]
    fn test_p2pkh_is_not_poisoned() {
        let pattern = marker();
        let validator = ForkTxValidator::with_pattern(&pattern);
        let tx = tx_with_scripts(vec![Script::p2pkh(&[0x11; 20])]);

        assert!(!validator.is_tx_output_poisoned(&tx));
        assert_eq!(validator.validate_tx(&tx), Ok(()));
    }

    #[test]
    fn test_other_op_return_payload_is_not_poisoned() {
        let pattern = marker();
        let validator = ForkTxValidator::with_pattern(&pattern);
        let payload = hex::decode("010203040506070809").unwrap();
        let tx = tx_with_scripts(vec![ScriptBuilder::op_return(&payload)]);

        assert!(!validator.is_tx_output_poisoned(&tx));
    }

    #[test]
    fn test_zero_outputs_never_poisoned() {
        let pattern = marker();
        let validator = ForkTxValidator::with_pattern(&pattern);
        assert!(!validator.is_tx_output_poisoned(&tx_with_scripts(vec![])));
    }

    #[test]
    fn test_bare_op_return_and_short_scripts() {
        let pattern = marker();
        let validator = ForkTxValidator::with_pattern(&pattern);

        for bytes in [vec![], vec![0x6a], vec![0x6a, 0x00], vec![0x6a, 0x6a]] {
            assert!(
                !validator.is_script_poisoned(&Script::from_bytes(bytes.clone())),
                "script {} must not match",
                hex::encode(&bytes)
            );
        }
    }

    #[test]
    fn test_prefix_and_extension_do_not_match() {
        let pattern = marker();
        let validator = ForkTxValidator::with_pattern(&pattern);
        let bytes = pattern.as_bytes();

        let prefix = ScriptBuilder::op_return(&bytes[..bytes.len() - 1]);
        let mut longer = bytes.to_vec();
        longer.push(0x00);
        let extension = ScriptBuilder::op_return(&longer);
        let mut flipped = bytes.to_vec();
        flipped[0] ^= 0x01;
        let different = ScriptBuilder::op_return(&flipped);

        assert!(!validator.is_script_poisoned(&prefix));
        assert!(!validator.is_script_poisoned(&extension));
        assert!(!validator.is_script_poisoned(&different));
    }

    #[test]
    fn test_marker_must_follow_op_return_directly() {
        let pattern = marker();
        let validator = ForkTxValidator::with_pattern(&pattern);

        let not_first = ScriptBuilder::new()
            .push_opcode(OpCode::OpNop)
            .push_opcode(OpCode::OpReturn)
            .push_data(pattern.as_bytes())
            .build();
        let op_in_between = ScriptBuilder::new()
            .push_opcode(OpCode::OpReturn)
            .push_opcode(OpCode::OpNop)
            .push_data(pattern.as_bytes())
            .build();
        let no_op_return = ScriptBuilder::new().push_data(pattern.as_bytes()).build();

        assert!(!validator.is_script_poisoned(&not_first));
        assert!(!validator.is_script_poisoned(&op_in_between));
        assert!(!validator.is_script_poisoned(&no_op_return));
    }

    #[test]
    fn test_pushdata1_encoding_and_trailing_ops_match() {
        let pattern = marker();
        let validator = ForkTxValidator::with_pattern(&pattern);

        let pushdata1 = ScriptBuilder::new()
            .push_opcode(OpCode::OpReturn)
            .push_data_pushdata1(pattern.as_bytes())
            .unwrap()
            .build();
        let trailing = ScriptBuilder::new()
            .push_opcode(OpCode::OpReturn)
            .push_data(pattern.as_bytes())
            .push_data(&[0xaa])
            .build();

        assert!(validator.is_script_poisoned(&pushdata1));
        assert!(validator.is_script_poisoned(&trailing));
    }

    #[test]
    fn test_truncated_marker_push_is_not_poisoned() {
        let pattern = marker();
        let validator = ForkTxValidator::with_pattern(&pattern);

        let full = ScriptBuilder::replay_protection(&pattern);
        let truncated = Script::from_bytes(full.as_bytes()[..full.len() - 1].to_vec());
        assert!(!validator.is_script_poisoned(&truncated));
    }

    #[test]
    fn test_first_poisoned_output_is_reported() {
        let pattern = marker();
        let validator = ForkTxValidator::with_pattern(&pattern);
        let tx = tx_with_scripts(vec![
            Script::p2pkh(&[1u8; 20]),
            ScriptBuilder::op_return(b"hello"),
            ScriptBuilder::replay_protection(&pattern),
            ScriptBuilder::replay_protection(&pattern),
        ]);

        assert_eq!(validator.poisoned_output_index(&tx), Some(2));
    }

    #[test]
    fn test_custom_marker() {
        let pattern = PoisonPattern::new(vec![0xfe, 0xed]).unwrap();
        let validator = ForkTxValidator::with_pattern(&pattern);

        let tagged = tx_with_scripts(vec![ScriptBuilder::op_return(&[0xfe, 0xed])]);
        let default_tagged = tx_with_scripts(vec![ScriptBuilder::replay_protection(&marker())]);

        assert!(validator.is_tx_output_poisoned(&tagged));
        assert!(!validator.is_tx_output_poisoned(&default_tagged));
    }

    #[test]
    fn test_free_functions_use_registry() {
        let tx = tx_with_scripts(vec![ScriptBuilder::replay_protection(poison_pattern())]);
        assert!(is_tx_output_poisoned(&tx));
        assert!(validate_tx(&tx).is_err());

        let clean = tx_with_scripts(vec![Script::p2pkh(&[3u8; 20])]);
        assert!(!is_tx_output_poisoned(&clean));
        assert!(validate_tx(&clean).is_ok());
    }
}
