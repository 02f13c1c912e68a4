//! Script type - a sequence of opcodes and data pushes.
//!
//! Scripts appear in transaction inputs (unlocking) and outputs (locking).
//! A `Script` keeps the exact bytes it was built from alongside the chunks
//! decoded from them, so non-canonical encodings survive a round trip
//! untouched. Values are immutable once constructed; use `ScriptBuilder`
//! to assemble new ones.

use std::fmt;

use crate::builder::ScriptBuilder;
use crate::chunk::{decode_script, encode_chunks, ScriptChunk};
use crate::config::Config;
use crate::opcodes::{string_to_opcode, OP_DATA_1, OP_PUSHDATA4};
use crate::standard::{self, Capture, ScriptType};
use crate::ScriptError;

/// A script: raw bytes plus their decoded chunks.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Script {
    bytes: Vec<u8>,
    chunks: Vec<ScriptChunk>,
}

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create a new empty script.
    pub fn new() -> Self {
        Script {
            bytes: Vec::new(),
            chunks: Vec::new(),
        }
    }

    /// Create a script from raw bytes.
    ///
    /// Never fails: malformed or truncated input keeps every byte but only
    /// the chunks that decode cleanly.
    ///
    /// # Arguments
    /// * `bytes` - Raw script bytes.
    ///
    /// # Returns
    /// A `Script` owning a copy of the given bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_vec(bytes.to_vec())
    }

    /// Create a script taking ownership of the given bytes.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        let chunks = decode_script(&bytes);
        Script { bytes, chunks }
    }

    /// Create a script from a hex-encoded string.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string (e.g. "76a914...88ac").
    ///
    /// # Returns
    /// A `Script` wrapping the decoded bytes, or an error if the hex is invalid.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        let bytes = hex::decode(hex_str).map_err(|e| ScriptError::InvalidHex(e.to_string()))?;
        Ok(Self::from_vec(bytes))
    }

    /// Create a script by serializing a chunk sequence.
    ///
    /// Data chunks are written with the shortest push prefix. The stored
    /// chunks are decoded back from the serialized bytes, so an empty data
    /// chunk comes back as OP_0.
    pub fn from_chunks(chunks: &[ScriptChunk]) -> Result<Self, ScriptError> {
        Ok(Self::from_vec(encode_chunks(chunks)?))
    }

    /// Create a script from an ASM string.
    ///
    /// Tokens are whitespace separated. Opcode names (including aliases such
    /// as `OP_FALSE` and the `OP_UNKNOWN<n>` form) become opcodes; any other
    /// token must be hex and becomes a data push. Push opcodes cannot be
    /// named directly, since they need a payload.
    ///
    /// # Arguments
    /// * `asm` - An ASM string such as "OP_DUP OP_HASH160 <hex> ...".
    ///
    /// # Returns
    /// A `Script`, or `InvalidOpcodeData` naming the first bad token.
    pub fn from_asm(asm: &str) -> Result<Self, ScriptError> {
        let mut builder = ScriptBuilder::new();
        for token in asm.split_whitespace() {
            if let Some(opcode) = string_to_opcode(token) {
                if (OP_DATA_1..=OP_PUSHDATA4).contains(&opcode) {
                    return Err(ScriptError::InvalidOpcodeData(token.to_string()));
                }
                builder.write_opcode(opcode);
            } else {
                let data = hex::decode(token)
                    .map_err(|_| ScriptError::InvalidOpcodeData(token.to_string()))?;
                builder.write_data(&data)?;
            }
        }
        Ok(builder.into_script())
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The raw script bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// Consume the script, returning its raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The decoded chunks, in script order.
    pub fn chunks(&self) -> &[ScriptChunk] {
        &self.chunks
    }

    /// Return the length of the script in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the script is empty (zero bytes).
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Encode the script as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Convert the script to its ASM representation.
    ///
    /// Data pushes appear as hex, opcodes by name. Bytes after a truncated
    /// push are not represented.
    pub fn to_asm(&self) -> String {
        self.chunks
            .iter()
            .map(ScriptChunk::to_asm_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    // -----------------------------------------------------------------------
    // Classification
    // -----------------------------------------------------------------------

    /// Classify the script under the standard policy.
    pub fn script_type(&self) -> ScriptType {
        self.script_type_with(&Config::standard())
    }

    /// Classify the script under the given policy.
    pub fn script_type_with(&self, config: &Config) -> ScriptType {
        standard::classify(&self.chunks, config)
    }

    /// Return true unless the script is `NonStandard`.
    pub fn is_standard(&self) -> bool {
        self.script_type() != ScriptType::NonStandard
    }

    /// Extract the canonical payload under the standard policy.
    ///
    /// The embedded hash for pay-to-public-key-hash and pay-to-script-hash,
    /// the Hash160 of the key for pay-to-public-key, one Hash160 per key for
    /// multisig. Null-data and non-standard scripts capture nothing.
    pub fn capture(&self) -> Option<Capture> {
        self.capture_with(&Config::standard())
    }

    /// Extract the canonical payload under the given policy.
    pub fn capture_with(&self, config: &Config) -> Option<Capture> {
        standard::capture(&self.chunks, config)
    }

    /// The payload of a null-data script.
    pub fn null_data(&self) -> Option<&[u8]> {
        standard::null_data(&self.chunks)
    }

    /// The raw public keys of a pay-to-public-key or multisig script.
    pub fn public_keys(&self) -> Option<Vec<&[u8]>> {
        let config = Config::standard();
        match self.script_type_with(&config) {
            ScriptType::PubKey => standard::pubkey(&self.chunks, &config).map(|key| vec![key]),
            ScriptType::MultiSig => standard::multisig(&self.chunks, &config),
            _ => None,
        }
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_vec(bytes)
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for Script {
    /// Display the script as a lowercase hex string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
