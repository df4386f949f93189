//! Script instruction iteration
//!
//! Walks a script one instruction at a time, separating data pushes from
//! plain opcodes. Nothing is executed; this is the read-only view the fork
//! rules use to look at output scripts.

use thiserror::Error;

use crate::types::script::OpCode;

/// Largest opcode that pushes its own length (0x01..=0x4b bytes follow)
pub const MAX_DIRECT_PUSH: u8 = 0x4b;

/// A single decoded script instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction<'a> {
    /// A data push (OP_0, direct push, or OP_PUSHDATA1/2/4) with its payload
    Push(&'a [u8]),
    /// Any non-push opcode
    Op(u8),
}

/// Decoding failures; a malformed script simply stops iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InstructionError {
    /// A push length prefix was cut off
    #[error("Truncated push length at offset {0}")]
    TruncatedLength(usize),

    /// A push announced more bytes than the script holds
    #[error("Push of {wanted} bytes at offset {offset} exceeds script end")]
    TruncatedPush { offset: usize, wanted: usize },
}

/// Borrowing iterator over script instructions
///
/// Yields `Err` once on malformed input and then ends.
#[derive(Debug, Clone)]
pub struct Instructions<'a> {
    bytes: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> Instructions<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            done: false,
        }
    }

    fn read_len(&mut self, width: usize) -> Result<usize, InstructionError> {
        let start = self.pos;
        let end = start
            .checked_add(width)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(InstructionError::TruncatedLength(start))?;

        let mut len = 0usize;
        for (shift, byte) in self.bytes[start..end].iter().enumerate() {
            len |= (*byte as usize) << (8 * shift);
        }
        self.pos = end;
        Ok(len)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], InstructionError> {
        let offset = self.pos;
        let end = offset
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(InstructionError::TruncatedPush {
                offset,
                wanted: len,
            })?;
        self.pos = end;
        Ok(&self.bytes[offset..end])
    }

    fn decode(&mut self, opcode: u8) -> Result<Instruction<'a>, InstructionError> {
        let len = match opcode {
            0x00 => return Ok(Instruction::Push(&[])),
            0x01..=MAX_DIRECT_PUSH => opcode as usize,
            op if op == OpCode::OpPushData1.to_byte() => self.read_len(1)?,
            op if op == OpCode::OpPushData2.to_byte() => self.read_len(2)?,
            op if op == OpCode::OpPushData4.to_byte() => self.read_len(4)?,
            op => return Ok(Instruction::Op(op)),
        };
        self.take(len).map(Instruction::Push)
    }
}

impl<'a> Iterator for Instructions<'a> {
    type Item = Result<Instruction<'a>, InstructionError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.pos >= self.bytes.len() {
            return None;
        }

        let opcode = self.bytes[self.pos];
        self.pos += 1;

        let result = self.decode(opcode);
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}
