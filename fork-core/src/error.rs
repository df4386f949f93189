//! Error types for the fork rules
//!
//! Validation entry points never return these across the boundary as a
//! panic; they are either handed back as a `Result` (transaction checks) or
//! mapped onto the caller's validation sink (block checks).

use thiserror::Error;

use crate::validation::state::{REJECT_INVALID, REJECT_MALFORMED};

/// Reject reason recorded for a transaction carrying the replay marker
pub const REASON_WRONG_FORK: &str = "bad-txns-wrong-fork";
/// Reject reason for an activation block that is not larger than the minimum
pub const REASON_FORK_BLOCK_SIZE: &str = "bad-fork-block";
/// Reject reason for a block above the size limit in force
pub const REASON_BLOCK_LENGTH: &str = "bad-blk-length";
/// Generic reason for a broken caller contract
pub const REASON_INTERNAL: &str = "bad-fork-internal";

/// DoS score for a consensus violation that proves the sender misbehaved
pub const DOS_BAN: u32 = 100;

/// Errors produced by the fork rules and their setup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForkRuleError {
    /// An output carries the replay-protection marker
    #[error("Transaction output {output_index} carries the replay-protection marker")]
    PoisonedOutput { output_index: usize },

    /// The activation block must be strictly larger than the minimum
    #[error("Fork block too small: {size} <= {min}")]
    ForkBlockTooSmall { size: usize, min: usize },

    /// Block exceeds the size limit in force
    #[error("Block too large: {size} > {max}")]
    BlockTooLarge { size: usize, max: usize },

    /// The caller handed over input it promised would never occur
    #[error("Internal contract violation: {0}")]
    InternalContractViolation(String),

    /// Replay marker must hold at least one byte
    #[error("Replay-protection marker must not be empty")]
    EmptyPoisonPattern,

    /// The process-wide marker was already set to a different value
    #[error("Replay-protection marker already installed")]
    PatternAlreadyInstalled,

    /// Marker supplied as hex could not be decoded
    #[error("Invalid replay-protection marker hex: {0}")]
    InvalidPatternHex(String),

    /// Fork parameters are inconsistent
    #[error("Invalid fork parameters: {0}")]
    InvalidParams(String),
}

impl ForkRuleError {
    /// Reason string written to the validation sink
    pub fn reject_reason(&self) -> &'static str {
        match self {
            ForkRuleError::PoisonedOutput { .. } => REASON_WRONG_FORK,
            ForkRuleError::ForkBlockTooSmall { .. } => REASON_FORK_BLOCK_SIZE,
            ForkRuleError::BlockTooLarge { .. } => REASON_BLOCK_LENGTH,
            _ => REASON_INTERNAL,
        }
    }

    /// P2P reject code
    pub fn reject_code(&self) -> u8 {
        if self.is_consensus_failure() {
            REJECT_INVALID
        } else {
            REJECT_MALFORMED
        }
    }

    /// Misbehaviour score charged to the peer that relayed the object
    pub fn dos_score(&self) -> u32 {
        if self.is_consensus_failure() {
            DOS_BAN
        } else {
            0
        }
    }

    /// True for verdicts about the object, false for setup or contract errors
    pub fn is_consensus_failure(&self) -> bool {
        matches!(
            self,
            ForkRuleError::PoisonedOutput { .. }
                | ForkRuleError::ForkBlockTooSmall { .. }
                | ForkRuleError::BlockTooLarge { .. }
        )
    }
}

/// Result type alias for fork rule operations
pub type ForkRuleResult<T> = Result<T, ForkRuleError>;
