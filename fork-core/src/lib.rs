//! Consensus rules for a replay-protected hard fork
//!
//! Transactions that carry the replay-protection marker (`OP_RETURN <marker>`
//! as an output script) are valid only on the legacy chain; the fork rejects
//! them, and any block that contains one. The activation block must also be
//! larger than the legacy size limit, so the two chains diverge at once.

pub mod config;
pub mod consensus;
pub mod error;
pub mod script;
pub mod types;
pub mod util;
pub mod validation;

#[cfg(test)]
mod test_common;

pub use config::{ForkConfig, ForkConfigError};
pub use consensus::{
    check_excessive_block_size, check_fork_block_size, install_poison_pattern, poison_pattern,
    validate_block, validate_tx, ForkBlockValidator, ForkParams, ForkTxValidator, PoisonPattern,
};
pub use error::{ForkRuleError, ForkRuleResult};
pub use types::{Block, BlockHeader, Script, Transaction};
pub use validation::{ValidationSink, ValidationState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
