use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

use super::{format_output, print_error, print_success, OutputFormat};
use fork_core::consensus::{
    check_excessive_block_size, check_fork_block_size, validate_block, validate_tx, ForkParams,
};
use fork_core::types::{Block, Transaction};
use fork_core::util::ForkEventLogger;
use fork_core::validation::{ValidationSink, ValidationState};

/// Activation facts the operator supplies for a block
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockContext {
    pub activation_block: bool,
    pub fork_active: bool,
}

impl BlockContext {
    /// The activation block is itself the first fork block
    pub fn fork_rules_active(&self) -> bool {
        self.fork_active || self.activation_block
    }
}

#[derive(Serialize)]
struct CheckReport<'a> {
    kind: &'static str,
    id: String,
    size: usize,
    accepted: bool,
    state: &'a ValidationState,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_report(summary: &CheckReport<'_>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => format_output(summary, format, None),
        OutputFormat::Text if summary.accepted => {
            print_success(&format!("{} {} passes the fork rules", summary.kind, summary.id));
            Ok(())
        }
        OutputFormat::Text => {
            print_error(&format!("{} {} rejected: {}", summary.kind, summary.id, summary.state));
            Ok(())
        }
    }
}

/// Run the transaction rule; returns whether the transaction is accepted
pub fn check_tx(path: &Path, format: OutputFormat) -> Result<bool> {
    let tx: Transaction = read_json(path)?;
    let mut state = ValidationState::new();

    if let Err(err) = validate_tx(&tx) {
        state.record(&err, format!("transaction {}: {}", tx.txid_hex(), err));
    }
    ForkEventLogger::tx_checked(&tx.txid_hex(), tx.outputs().len(), &state);

    let accepted = state.is_valid();
    print_report(
        &CheckReport {
            kind: "transaction",
            id: tx.txid_hex(),
            size: tx.serialized_size(),
            accepted,
            state: &state,
        },
        format,
    )?;
    Ok(accepted)
}

/// Run the size rules for `context` and then the block rule
///
/// Every check runs; the state keeps the first rejection.
pub fn check_block(
    path: &Path,
    context: BlockContext,
    params: &ForkParams,
    format: OutputFormat,
) -> Result<bool> {
    let block: Block = read_json(path)?;
    let mut state = ValidationState::new();

    let size_ok = check_fork_block_size(&block, context.activation_block, params, &mut state);
    let limit_ok = check_excessive_block_size(&block, context.fork_rules_active(), params, &mut state);
    let txs_ok = validate_block(&block, &mut state);
    ForkEventLogger::block_checked(&block.hash_hex(), block.transactions().len(), block.size(), &state);

    let accepted = size_ok && limit_ok && txs_ok;
    print_report(
        &CheckReport {
            kind: "block",
            id: block.hash_hex(),
            size: block.size(),
            accepted,
            state: &state,
        },
        format,
    )?;
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fork_core::consensus::poison_pattern;
    use fork_core::script::ScriptBuilder;
    use fork_core::types::{OutPoint, Script, TransactionInput, TransactionOutput};
    use tempfile::TempDir;

    fn tx_paying(scripts: Vec<Script>) -> Transaction {
        Transaction::new(
            1,
            vec![TransactionInput::new(
                OutPoint::new([7; 32], 0),
                Script::from_bytes(vec![7; 72]),
                u32::MAX,
            )],
            scripts.into_iter().map(|s| TransactionOutput::new(0, s)).collect(),
            0,
        )
    }

    fn write_json<T: Serialize>(dir: &TempDir, name: &str, value: &T) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_check_tx_from_file() {
        let dir = TempDir::new().unwrap();
        let clean = write_json(&dir, "clean.json", &tx_paying(vec![Script::p2pkh(&[1; 20])]));
        let tagged = write_json(
            &dir,
            "tagged.json",
            &tx_paying(vec![ScriptBuilder::replay_protection(poison_pattern())]),
        );

        assert!(check_tx(&clean, OutputFormat::Json).unwrap());
        assert!(!check_tx(&tagged, OutputFormat::Json).unwrap());
    }

    #[test]
    fn test_check_block_from_file() {
        let dir = TempDir::new().unwrap();
        let params = ForkParams::default();
        let block = Block::new(
            1,
            [0; 32],
            vec![tx_paying(vec![Script::p2pkh(&[2; 20])])],
            1_501_590_600,
            0x207fffff,
        );
        let path = write_json(&dir, "block.json", &block);

        assert!(check_block(&path, BlockContext::default(), &params, OutputFormat::Text).unwrap());

        // too small to open the fork chain
        let activation = BlockContext {
            activation_block: true,
            fork_active: true,
        };
        assert!(!check_block(&path, activation, &params, OutputFormat::Text).unwrap());
    }

    #[test]
    fn test_activation_block_uses_fork_size_limit() {
        let dir = TempDir::new().unwrap();
        let params = ForkParams::default();
        let large = Transaction::new(
            1,
            vec![TransactionInput::new(
                OutPoint::new([3; 32], 0),
                Script::from_bytes(vec![0; 1_500_000]),
                u32::MAX,
            )],
            vec![TransactionOutput::new(1, Script::p2pkh(&[3; 20]))],
            0,
        );
        let block = Block::new(1, [0; 32], vec![large], 1_501_590_600, 0x207fffff);
        assert!(block.size() > params.legacy_max_block_size);
        let path = write_json(&dir, "large.json", &block);

        let activation_only = BlockContext {
            activation_block: true,
            fork_active: false,
        };
        assert!(activation_only.fork_rules_active());
        assert!(check_block(&path, activation_only, &params, OutputFormat::Json).unwrap());

        // without activation context the legacy limit applies
        assert!(!check_block(&path, BlockContext::default(), &params, OutputFormat::Json).unwrap());
    }

    #[test]
    fn test_unreadable_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.json");
        assert!(check_tx(&path, OutputFormat::Json).is_err());

        fs::write(&path, "{ not json").unwrap();
        assert!(check_block(&path, BlockContext::default(), &ForkParams::default(), OutputFormat::Json).is_err());
    }
}
