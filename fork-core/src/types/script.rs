//! Output and signature scripts (Bitcoin opcode encoding)
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::script::instruction::Instructions;

/// Script type for transaction inputs and outputs
///
/// Serialized as a hex string so JSON fixtures stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    /// Raw script bytes
    #[serde(with = "hex::serde")]
    bytes: Vec<u8>,
}

impl Script {
    /// Create a new empty script
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Create a script from bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Get the script bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get the script length
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the script is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Iterate the script instruction by instruction without executing it
    pub fn instructions(&self) -> Instructions<'_> {
        Instructions::new(&self.bytes)
    }

    /// Whether the first byte is OP_RETURN (provably unspendable output)
    pub fn is_op_return(&self) -> bool {
        self.bytes.first() == Some(&OpCode::OpReturn.to_byte())
    }

    /// Create a P2PKH (Pay to Public Key Hash) script
    pub fn p2pkh(pubkey_hash: &[u8; 20]) -> Self {
        let mut bytes = Vec::with_capacity(25);
        bytes.push(OpCode::OpDup.to_byte());
        bytes.push(OpCode::OpHash160.to_byte());
        bytes.push(0x14); // Push 20 bytes
        bytes.extend_from_slice(pubkey_hash);
        bytes.push(OpCode::OpEqualVerify.to_byte());
        bytes.push(OpCode::OpCheckSig.to_byte());
        Self { bytes }
    }

    /// Create a P2SH (Pay to Script Hash) script
    pub fn p2sh(script_hash: &[u8; 20]) -> Self {
        let mut bytes = Vec::with_capacity(23);
        bytes.push(OpCode::OpHash160.to_byte());
        bytes.push(0x14); // Push 20 bytes
        bytes.extend_from_slice(script_hash);
        bytes.push(OpCode::OpEqual.to_byte());
        Self { bytes }
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.bytes))
    }
}

/// Script opcodes the fork rules and script builder refer to
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    // Push prefixes
    OpPushData1 = 0x4c,
    OpPushData2 = 0x4d,
    OpPushData4 = 0x4e,

    // Control
    OpNop = 0x61,
    OpReturn = 0x6a,

    // Stack and comparison
    OpDup = 0x76,
    OpEqual = 0x87,
    OpEqualVerify = 0x88,

    // Crypto
    OpHash160 = 0xa9,
    OpCheckSig = 0xac,
}

impl OpCode {
    /// Raw byte value of the opcode
    pub const fn to_byte(self) -> u8 {
        self as u8
    }
}
