//! Logging setup and structured events for fork validation

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::validation::state::ValidationState;

/// Initialize the global subscriber
///
/// `RUST_LOG` takes precedence over `level`, which is either a bare level
/// (`debug`) or a full filter directive. With `log_file` set, output is
/// appended to that file without ANSI colours.
pub fn init_logging(level: &str, log_file: Option<&Path>) -> Result<(), String> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(level)?,
    };

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| format!("Failed to open log file: {}", e))?;

            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .finish();

            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| format!("Failed to set global default subscriber: {}", e))?;

            info!("Logging initialized with output to {}", path.display());
        }
        None => {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .finish();

            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| format!("Failed to set global default subscriber: {}", e))?;
        }
    }
    Ok(())
}

/// Expand a bare level to per-crate directives; pass anything else through
fn build_filter(level: &str) -> Result<EnvFilter, String> {
    let level = level.trim();
    let directive = match level.to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" | "off" => {
            format!("fork_core={},fork_cli={}", level, level)
        }
        _ => level.to_string(),
    };
    EnvFilter::try_new(&directive).map_err(|e| format!("Invalid log filter '{}': {}", directive, e))
}

/// Structured events for validation outcomes
pub struct ForkEventLogger;

impl ForkEventLogger {
    pub fn block_checked(hash: &str, txs: usize, size: usize, state: &ValidationState) {
        if state.is_valid() {
            info!(hash = hash, txs = txs, size_bytes = size, "Block accepted by fork rules");
        } else {
            warn!(
                hash = hash,
                txs = txs,
                size_bytes = size,
                reason = state.reject_reason(),
                dos = state.dos_score(),
                "Block rejected by fork rules"
            );
        }
    }

    pub fn tx_checked(txid: &str, outputs: usize, state: &ValidationState) {
        if state.is_valid() {
            info!(txid = txid, outputs = outputs, "Transaction accepted by fork rules");
        } else {
            warn!(
                txid = txid,
                outputs = outputs,
                reason = state.reject_reason(),
                "Transaction rejected by fork rules"
            );
        }
    }
}
