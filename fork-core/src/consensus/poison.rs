//! Replay-protection marker registry
//!
//! Transactions meant to be invalid on the fork chain carry an output
//! `OP_RETURN <marker>`. The marker is consensus-critical: every node on the
//! fork must use the same bytes or the fork itself splits.
//!
//! The value is fixed for the life of the process. It may be installed once
//! from configuration before validation starts; the first read without an
//! installation freezes the compiled-in default.

use once_cell::sync::OnceCell;
use std::fmt;

use crate::error::{ForkRuleError, ForkRuleResult};

/// Compiled-in marker: ASCII "Bitcoin: A Peer-to-Peer Electronic Cash System"
///
/// hex 426974636f696e3a204120506565722d746f2d5065657220456c656374726f6e696320436173682053797374656d
pub const DEFAULT_POISON_PATTERN: &[u8] = b"Bitcoin: A Peer-to-Peer Electronic Cash System";

static POISON_PATTERN: OnceCell<PoisonPattern> = OnceCell::new();

/// Immutable, non-empty marker bytes compared by exact equality
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PoisonPattern {
    bytes: Vec<u8>,
}

impl PoisonPattern {
    /// # Errors
    /// Returns `ForkRuleError::EmptyPoisonPattern` for an empty marker
    pub fn new(bytes: Vec<u8>) -> ForkRuleResult<Self> {
        if bytes.is_empty() {
            return Err(ForkRuleError::EmptyPoisonPattern);
        }
        Ok(Self { bytes })
    }

    /// Parse a marker given as hex (configuration files, CLI)
    pub fn from_hex(value: &str) -> ForkRuleResult<Self> {
        let bytes = hex::decode(value.trim())
            .map_err(|e| ForkRuleError::InvalidPatternHex(e.to_string()))?;
        Self::new(bytes)
    }

    /// The compiled-in marker
    pub fn default_marker() -> Self {
        Self {
            bytes: DEFAULT_POISON_PATTERN.to_vec(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Exact byte-for-byte comparison; prefixes and extensions do not match
    pub fn matches(&self, data: &[u8]) -> bool {
        self.bytes.as_slice() == data
    }
}

impl fmt::Debug for PoisonPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PoisonPattern").field(&self.to_hex()).finish()
    }
}

impl fmt::Display for PoisonPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Install the process-wide marker
///
/// Installing the value already in force is a no-op.
///
/// # Errors
/// Returns `ForkRuleError::PatternAlreadyInstalled` if a different marker is
/// already in force (installed earlier or frozen by a read).
pub fn install_poison_pattern(pattern: PoisonPattern) -> ForkRuleResult<()> {
    let current = POISON_PATTERN.get_or_init(|| pattern.clone());
    if *current == pattern {
        tracing::info!(marker = %current, "Replay-protection marker installed");
        Ok(())
    } else {
        Err(ForkRuleError::PatternAlreadyInstalled)
    }
}

/// Read-only accessor for the marker in force
pub fn poison_pattern() -> &'static PoisonPattern {
    POISON_PATTERN.get_or_init(PoisonPattern::default_marker)
}
