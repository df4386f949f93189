use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::script::Script;

/// Previous-output index carried by a coinbase input
pub const COINBASE_OUTPUT_INDEX: u32 = 0xffff_ffff;

/// Reference to a transaction output
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutPoint {
    /// Transaction ID (hash)
    #[serde(with = "hex::serde")]
    pub txid: [u8; 32],
    /// Output index in the transaction
    pub vout: u32,
}

impl OutPoint {
    pub fn new(txid: [u8; 32], vout: u32) -> Self {
        Self { txid, vout }
    }

    /// The outpoint a coinbase input "spends"
    pub fn null() -> Self {
        Self {
            txid: [0u8; 32],
            vout: COINBASE_OUTPUT_INDEX,
        }
    }

    pub fn is_null(&self) -> bool {
        self.txid == [0u8; 32] && self.vout == COINBASE_OUTPUT_INDEX
    }
}

/// Represents a transaction input referencing a previous output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    /// Output being spent
    previous_output: OutPoint,
    /// Signature script that satisfies the output's conditions
    signature_script: Script,
    /// Sequence number for replacement/locktime
    sequence: u32,
}

/// Represents a transaction output with an amount and spending conditions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    /// Amount in the smallest unit
    value: u64,
    /// Script that must be satisfied to spend this output
    script_pubkey: Script,
}

/// Transaction as seen by the fork rules: read-only, owned by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Version number for protocol upgrades
    version: u32,
    /// List of inputs spending previous outputs
    inputs: Vec<TransactionInput>,
    /// List of new outputs created by this transaction
    outputs: Vec<TransactionOutput>,
    /// Lock time (block height or timestamp)
    lock_time: u32,
}

impl TransactionInput {
    pub fn new(previous_output: OutPoint, signature_script: Script, sequence: u32) -> Self {
        Self {
            previous_output,
            signature_script,
            sequence,
        }
    }

    /// Coinbase input carrying arbitrary script data (height, extra nonce)
    pub fn new_coinbase(data: Vec<u8>) -> Self {
        Self {
            previous_output: OutPoint::null(),
            signature_script: Script::from_bytes(data),
            sequence: u32::MAX,
        }
    }

    fn serialized_size(&self) -> usize {
        32 + 4 + compact_size_len(self.signature_script.len()) + self.signature_script.len() + 4
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.previous_output.txid);
        out.extend_from_slice(&self.previous_output.vout.to_le_bytes());
        write_compact_size(out, self.signature_script.len());
        out.extend_from_slice(self.signature_script.as_bytes());
        out.extend_from_slice(&self.sequence.to_le_bytes());
    }
}

impl TransactionOutput {
    pub fn new(value: u64, script_pubkey: Script) -> Self {
        Self {
            value,
            script_pubkey,
        }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Get the script pubkey
    pub fn script_pubkey(&self) -> &Script {
        &self.script_pubkey
    }

    fn serialized_size(&self) -> usize {
        8 + compact_size_len(self.script_pubkey.len()) + self.script_pubkey.len()
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.value.to_le_bytes());
        write_compact_size(out, self.script_pubkey.len());
        out.extend_from_slice(self.script_pubkey.as_bytes());
    }
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        version: u32,
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
        lock_time: u32,
    ) -> Self {
        Self {
            version,
            inputs,
            outputs,
            lock_time,
        }
    }

    /// Get reference to outputs
    pub fn outputs(&self) -> &[TransactionOutput] {
        &self.outputs
    }

    /// A coinbase has exactly one input spending the null outpoint
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].previous_output.is_null()
    }

    /// Size of the consensus serialization in bytes
    pub fn serialized_size(&self) -> usize {
        4 + compact_size_len(self.inputs.len())
            + self.inputs.iter().map(TransactionInput::serialized_size).sum::<usize>()
            + compact_size_len(self.outputs.len())
            + self.outputs.iter().map(TransactionOutput::serialized_size).sum::<usize>()
            + 4
    }

    /// Consensus serialization (version, inputs, outputs, lock time)
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.version.to_le_bytes());
        write_compact_size(out, self.inputs.len());
        for input in &self.inputs {
            input.encode(out);
        }
        write_compact_size(out, self.outputs.len());
        for output in &self.outputs {
            output.encode(out);
        }
        out.extend_from_slice(&self.lock_time.to_le_bytes());
    }

    /// Double SHA-256 of the consensus serialization
    pub fn txid(&self) -> [u8; 32] {
        let mut buf = Vec::with_capacity(self.serialized_size());
        self.encode(&mut buf);

        let first = Sha256::digest(&buf);
        let second = Sha256::digest(first);
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&second);
        hash
    }

    /// Transaction id as hex, in the byte order it is hashed
    pub fn txid_hex(&self) -> String {
        hex::encode(self.txid())
    }
}

/// Bytes a CompactSize length prefix occupies
pub(crate) fn compact_size_len(n: usize) -> usize {
    match n {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

/// Append a CompactSize length prefix
pub(crate) fn write_compact_size(out: &mut Vec<u8>, n: usize) {
    match n {
        0..=0xfc => out.push(n as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&(n as u64).to_le_bytes());
        }
    }
}
