//! Fork activation and block-size rules
//!
//! The fork activates on median time past. The first block built on a parent
//! whose MTP has reached `fork_time` is the activation block and must be
//! strictly larger than `min_fork_block_size`, which makes it invalid on the
//! legacy chain. After activation the excessive-block limit replaces the
//! legacy one.
//!
//! Deciding activation needs chain context, so these checks are separate
//! entry points that take the decision as an explicit argument.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ForkRuleError, ForkRuleResult};
use crate::types::block::Block;
use crate::validation::state::ValidationSink;

/// Default activation time (2017-08-01 12:20:00 UTC)
pub const DEFAULT_FORK_TIME: u64 = 1_501_590_000;
/// The activation block must be larger than this
pub const DEFAULT_MIN_FORK_BLOCK_SIZE: usize = 1_000_000;
/// Size miners target for the activation block
pub const DEFAULT_FORK_BLOCK_SIZE: usize = 2_000_000;
/// Largest block accepted once the fork is active
pub const DEFAULT_FORK_EXCESSIVE_BLOCK: usize = 8_000_000;
/// Largest block accepted before activation
pub const LEGACY_MAX_BLOCK_SIZE: usize = 1_000_000;

/// Consensus parameters of the fork
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForkParams {
    /// Activation time compared against median time past (unix seconds)
    pub fork_time: u64,
    /// Activation block must be strictly larger than this many bytes
    pub min_fork_block_size: usize,
    /// Size miners aim for when producing the activation block
    pub fork_block_size: usize,
    /// Excessive-block limit after activation
    pub fork_excessive_block: usize,
    /// Block size limit before activation
    pub legacy_max_block_size: usize,
}

impl Default for ForkParams {
    fn default() -> Self {
        Self {
            fork_time: DEFAULT_FORK_TIME,
            min_fork_block_size: DEFAULT_MIN_FORK_BLOCK_SIZE,
            fork_block_size: DEFAULT_FORK_BLOCK_SIZE,
            fork_excessive_block: DEFAULT_FORK_EXCESSIVE_BLOCK,
            legacy_max_block_size: LEGACY_MAX_BLOCK_SIZE,
        }
    }
}

impl ForkParams {
    /// Check the parameters are self-consistent
    ///
    /// # Errors
    /// Returns `ForkRuleError::InvalidParams` describing the first problem found
    pub fn validate(&self) -> ForkRuleResult<()> {
        if self.fork_time == 0 {
            return Err(ForkRuleError::InvalidParams(
                "fork_time must be non-zero".to_string(),
            ));
        }
        if self.fork_block_size <= self.min_fork_block_size {
            return Err(ForkRuleError::InvalidParams(format!(
                "fork_block_size {} must exceed min_fork_block_size {}",
                self.fork_block_size, self.min_fork_block_size
            )));
        }
        if self.fork_block_size > self.fork_excessive_block {
            return Err(ForkRuleError::InvalidParams(format!(
                "fork_block_size {} exceeds fork_excessive_block {}",
                self.fork_block_size, self.fork_excessive_block
            )));
        }
        if self.legacy_max_block_size == 0 {
            return Err(ForkRuleError::InvalidParams(
                "legacy_max_block_size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Fork rules apply to a block whose parent has this median time past
    pub fn is_active(&self, median_time_past: u64) -> bool {
        median_time_past >= self.fork_time
    }

    /// The parent crossed the fork time and the grandparent had not
    ///
    /// `grandparent_mtp` is `None` when the parent is genesis.
    pub fn is_activation_block(&self, parent_mtp: u64, grandparent_mtp: Option<u64>) -> bool {
        self.is_active(parent_mtp) && !grandparent_mtp.is_some_and(|mtp| self.is_active(mtp))
    }

    /// Size limit in force
    pub fn max_block_size(&self, fork_active: bool) -> usize {
        if fork_active {
            self.fork_excessive_block
        } else {
            self.legacy_max_block_size
        }
    }

    /// Minimum-size rule for the activation block
    ///
    /// # Errors
    /// Returns `ForkRuleError::ForkBlockTooSmall` when the flag is set and the
    /// block is not strictly larger than `min_fork_block_size`
    pub fn check_fork_block_size(&self, block_size: usize, is_activation_block: bool) -> ForkRuleResult<()> {
        if is_activation_block && block_size <= self.min_fork_block_size {
            return Err(ForkRuleError::ForkBlockTooSmall {
                size: block_size,
                min: self.min_fork_block_size,
            });
        }
        Ok(())
    }

    /// Excessive-block rule
    ///
    /// # Errors
    /// Returns `ForkRuleError::BlockTooLarge` above the limit in force
    pub fn check_block_size_limit(&self, block_size: usize, fork_active: bool) -> ForkRuleResult<()> {
        let max = self.max_block_size(fork_active);
        if block_size > max {
            return Err(ForkRuleError::BlockTooLarge {
                size: block_size,
                max,
            });
        }
        Ok(())
    }
}

/// Reject an activation block that is not larger than the minimum
///
/// Leaves `sink` untouched when the block passes or is not the activation block.
pub fn check_fork_block_size(
    block: &Block,
    is_activation_block: bool,
    params: &ForkParams,
    sink: &mut dyn ValidationSink,
) -> bool {
    let size = block.size();
    match params.check_fork_block_size(size, is_activation_block) {
        Ok(()) => {
            if is_activation_block {
                debug!(block = %block.hash_hex(), size, "Fork activation block size accepted");
            }
            true
        }
        Err(err) => {
            warn!(block = %block.hash_hex(), size, "Rejecting fork block: {}", err);
            sink.record(&err, format!("activation block {}: {}", block.hash_hex(), err));
            false
        }
    }
}

/// Reject a block above the size limit in force
pub fn check_excessive_block_size(
    block: &Block,
    fork_active: bool,
    params: &ForkParams,
    sink: &mut dyn ValidationSink,
) -> bool {
    let size = block.size();
    match params.check_block_size_limit(size, fork_active) {
        Ok(()) => true,
        Err(err) => {
            warn!(block = %block.hash_hex(), size, fork_active, "Rejecting block: {}", err);
            sink.record(&err, format!("block {}: {}", block.hash_hex(), err));
            false
        }
    }
}
