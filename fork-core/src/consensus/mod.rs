//! Fork consensus rules
//!
//! - `poison`: the replay-protection marker in force
//! - `fork_tx`: per-transaction rule (marker detection)
//! - `fork_block`: per-block rule built on the transaction rule
//! - `activation`: activation parameters and the size rules the caller
//!   applies once it knows the activation context

pub mod activation;
pub mod fork_block;
pub mod fork_tx;
pub mod poison;

pub use activation::{check_excessive_block_size, check_fork_block_size, ForkParams};
pub use fork_block::{validate_block, ForkBlockValidator};
pub use fork_tx::{is_tx_output_poisoned, validate_tx, ForkTxValidator};
pub use poison::{install_poison_pattern, poison_pattern, PoisonPattern, DEFAULT_POISON_PATTERN};
