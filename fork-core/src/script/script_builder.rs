//! Script Builder
//!
//! Assembles output scripts, including replay-protection tagged outputs.

use thiserror::Error;

use crate::consensus::poison::PoisonPattern;
use crate::script::instruction::MAX_DIRECT_PUSH;
use crate::types::script::{OpCode, Script};

/// Errors that can occur when building scripts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptBuilderError {
    /// Payload does not fit in a single push
    #[error("Push data too large: {0} bytes")]
    PushTooLarge(usize),
}

/// Script builder
#[derive(Debug, Clone, Default)]
pub struct ScriptBuilder {
    script: Vec<u8>,
}

impl ScriptBuilder {
    /// Create a new empty script builder
    pub fn new() -> Self {
        Self { script: Vec::new() }
    }

    /// Push an opcode
    pub fn push_opcode(mut self, opcode: OpCode) -> Self {
        self.script.push(opcode.to_byte());
        self
    }

    /// Push data using the smallest encoding
    pub fn push_data(mut self, data: &[u8]) -> Self {
        let len = data.len();

        if len <= MAX_DIRECT_PUSH as usize {
            // Direct push (OP_0 for empty data)
            self.script.push(len as u8);
        } else if len <= 0xff {
            self.script.push(OpCode::OpPushData1.to_byte());
            self.script.push(len as u8);
        } else if len <= 0xffff {
            self.script.push(OpCode::OpPushData2.to_byte());
            self.script.extend_from_slice(&(len as u16).to_le_bytes());
        } else {
            self.script.push(OpCode::OpPushData4.to_byte());
            self.script.extend_from_slice(&(len as u32).to_le_bytes());
        }
        self.script.extend_from_slice(data);

        self
    }

    /// Push data with an explicit OP_PUSHDATA1 prefix even when a direct push would do
    ///
    /// # Errors
    /// Returns `ScriptBuilderError::PushTooLarge` if data exceeds 255 bytes
    pub fn push_data_pushdata1(mut self, data: &[u8]) -> Result<Self, ScriptBuilderError> {
        let len = u8::try_from(data.len()).map_err(|_| ScriptBuilderError::PushTooLarge(data.len()))?;
        self.script.push(OpCode::OpPushData1.to_byte());
        self.script.push(len);
        self.script.extend_from_slice(data);
        Ok(self)
    }

    /// Build the final script
    pub fn build(self) -> Script {
        Script::from_bytes(self.script)
    }

    /// `OP_RETURN <data>` null-data output script
    pub fn op_return(data: &[u8]) -> Script {
        Self::new()
            .push_opcode(OpCode::OpReturn)
            .push_data(data)
            .build()
    }

    /// `OP_RETURN <marker>`: the output that makes a transaction invalid on the fork chain
    pub fn replay_protection(pattern: &PoisonPattern) -> Script {
        Self::op_return(pattern.as_bytes())
    }
}
