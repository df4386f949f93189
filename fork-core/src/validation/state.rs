//! Validation state owned by the chain-validation caller
//!
//! The fork rules report failures through [`ValidationSink`] instead of
//! returning errors up the block-processing stack. [`ValidationState`] is the
//! stock implementation; nodes with their own state object implement the
//! trait for it.

use serde::Serialize;
use std::fmt;

use crate::error::ForkRuleError;

// P2P reject codes
pub const REJECT_MALFORMED: u8 = 0x01;
pub const REJECT_INVALID: u8 = 0x10;

/// Where validation failures are recorded
pub trait ValidationSink {
    /// Record a consensus rejection of the object under test
    fn invalid(&mut self, reject_code: u8, reason: &str, dos_score: u32, debug_message: String);

    /// Record a failure that is not a verdict on the object (broken contract)
    fn error(&mut self, reason: &str, debug_message: String);

    /// Map a fork rule error onto the sink
    fn record(&mut self, err: &ForkRuleError, debug_message: String) {
        if err.is_consensus_failure() {
            self.invalid(err.reject_code(), err.reject_reason(), err.dos_score(), debug_message);
        } else {
            self.error(err.reject_reason(), debug_message);
        }
    }
}

/// Outcome category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationMode {
    /// Nothing recorded
    Valid,
    /// Object violates a consensus rule
    Invalid,
    /// Validation could not reach a verdict
    Error,
}

/// Default sink: holds the first rejection recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationState {
    mode: ValidationMode,
    reject_code: u8,
    reject_reason: String,
    dos_score: u32,
    debug_message: String,
}

impl Default for ValidationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationState {
    pub fn new() -> Self {
        Self {
            mode: ValidationMode::Valid,
            reject_code: 0,
            reject_reason: String::new(),
            dos_score: 0,
            debug_message: String::new(),
        }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn is_valid(&self) -> bool {
        self.mode == ValidationMode::Valid
    }

    pub fn is_invalid(&self) -> bool {
        self.mode == ValidationMode::Invalid
    }

    pub fn is_error(&self) -> bool {
        self.mode == ValidationMode::Error
    }

    pub fn reject_code(&self) -> u8 {
        self.reject_code
    }

    pub fn reject_reason(&self) -> &str {
        &self.reject_reason
    }

    pub fn dos_score(&self) -> u32 {
        self.dos_score
    }

    pub fn debug_message(&self) -> &str {
        &self.debug_message
    }
}

impl ValidationSink for ValidationState {
    fn invalid(&mut self, reject_code: u8, reason: &str, dos_score: u32, debug_message: String) {
        // first rejection wins
        if !self.is_valid() {
            return;
        }
        self.mode = ValidationMode::Invalid;
        self.reject_code = reject_code;
        self.reject_reason = reason.to_string();
        self.dos_score = dos_score;
        self.debug_message = debug_message;
    }

    fn error(&mut self, reason: &str, debug_message: String) {
        if !self.is_valid() {
            return;
        }
        self.mode = ValidationMode::Error;
        self.reject_reason = reason.to_string();
        self.debug_message = debug_message;
    }
}

impl fmt::Display for ValidationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            ValidationMode::Valid => write!(f, "valid"),
            ValidationMode::Invalid if self.debug_message.is_empty() => {
                write!(f, "{} (code 0x{:02x})", self.reject_reason, self.reject_code)
            }
            ValidationMode::Invalid => write!(
                f,
                "{} (code 0x{:02x}): {}",
                self.reject_reason, self.reject_code, self.debug_message
            ),
            ValidationMode::Error if self.debug_message.is_empty() => {
                write!(f, "error: {}", self.reject_reason)
            }
            ValidationMode::Error => write!(f, "error: {}: {}", self.reject_reason, self.debug_message),
        }
    }
}
