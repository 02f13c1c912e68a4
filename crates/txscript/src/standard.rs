//! Standard script classification and payload capture.
//!
//! Patterns are tried in a fixed order against the whole chunk sequence and
//! the first match wins. Anything that matches none of them is
//! `NonStandard`. Neither classification nor capture can fail.

use std::fmt;

use serde::{Deserialize, Serialize};
use txscript_primitives::hash::{hash160, hash160_from_slice, HASH160_LEN};

use crate::chunk::ScriptChunk::{self, Data, Opcode};
use crate::config::Config;
use crate::opcodes::*;
use crate::ScriptError;

/// Classification of a script against the standard output patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptType {
    /// `OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG`
    PubKeyHash,
    /// `<33 or 65 byte key> OP_CHECKSIG`
    PubKey,
    /// `OP_m <key>... OP_n OP_CHECKMULTISIG`
    MultiSig,
    /// `OP_HASH160 <20 bytes> OP_EQUAL`
    ScriptHash,
    /// `OP_RETURN <data>`
    NullData,
    /// Anything else.
    NonStandard,
}

impl ScriptType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptType::PubKeyHash => "pubkeyhash",
            ScriptType::PubKey => "pubkey",
            ScriptType::MultiSig => "multisig",
            ScriptType::ScriptHash => "scripthash",
            ScriptType::NullData => "nulldata",
            ScriptType::NonStandard => "nonstandard",
        }
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The canonical payload extracted from a standard script.
///
/// Serializes as a hex string for a single hash and as a list of hex
/// strings for multisig.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "CaptureRepr", try_from = "CaptureRepr")]
pub enum Capture {
    /// A single Hash160: the embedded hash, or the hash of the embedded key.
    Hash([u8; HASH160_LEN]),
    /// One Hash160 per multisig public key, in script order.
    Hashes(Vec<[u8; HASH160_LEN]>),
}

impl Capture {
    /// The single hash, if this is not a multisig capture.
    pub fn as_hash(&self) -> Option<&[u8; HASH160_LEN]> {
        match self {
            Capture::Hash(hash) => Some(hash),
            Capture::Hashes(_) => None,
        }
    }

    /// All captured hashes; a single capture yields a one-element slice.
    pub fn hashes(&self) -> &[[u8; HASH160_LEN]] {
        match self {
            Capture::Hash(hash) => std::slice::from_ref(hash),
            Capture::Hashes(hashes) => hashes,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum CaptureRepr {
    Hash(String),
    Hashes(Vec<String>),
}

impl From<Capture> for CaptureRepr {
    fn from(capture: Capture) -> Self {
        match capture {
            Capture::Hash(hash) => CaptureRepr::Hash(hex::encode(hash)),
            Capture::Hashes(hashes) => CaptureRepr::Hashes(hashes.iter().map(hex::encode).collect()),
        }
    }
}

impl TryFrom<CaptureRepr> for Capture {
    type Error = ScriptError;

    fn try_from(repr: CaptureRepr) -> Result<Self, Self::Error> {
        fn decode(hex_str: &str) -> Result<[u8; HASH160_LEN], ScriptError> {
            let bytes = hex::decode(hex_str).map_err(|e| ScriptError::InvalidHex(e.to_string()))?;
            Ok(hash160_from_slice(&bytes)?)
        }

        match repr {
            CaptureRepr::Hash(hash) => Ok(Capture::Hash(decode(&hash)?)),
            CaptureRepr::Hashes(hashes) => hashes
                .iter()
                .map(|hash| decode(hash))
                .collect::<Result<Vec<_>, _>>()
                .map(Capture::Hashes),
        }
    }
}

/// One entry of the classification table.
struct Pattern {
    script_type: ScriptType,
    matches: fn(&[ScriptChunk], &Config) -> bool,
    extract: fn(&[ScriptChunk], &Config) -> Option<Capture>,
}

/// Patterns in priority order.
static PATTERNS: [Pattern; 5] = [
    Pattern {
        script_type: ScriptType::PubKeyHash,
        matches: is_pubkey_hash,
        extract: capture_pubkey_hash,
    },
    Pattern {
        script_type: ScriptType::PubKey,
        matches: is_pubkey,
        extract: capture_pubkey,
    },
    Pattern {
        script_type: ScriptType::MultiSig,
        matches: is_multisig,
        extract: capture_multisig,
    },
    Pattern {
        script_type: ScriptType::ScriptHash,
        matches: is_script_hash,
        extract: capture_script_hash,
    },
    Pattern {
        script_type: ScriptType::NullData,
        matches: is_null_data,
        extract: no_capture,
    },
];

/// Classify a chunk sequence.
pub fn classify(chunks: &[ScriptChunk], config: &Config) -> ScriptType {
    let script_type = PATTERNS
        .iter()
        .find(|pattern| (pattern.matches)(chunks, config))
        .map_or(ScriptType::NonStandard, |pattern| pattern.script_type);
    tracing::trace!(chunks = chunks.len(), %script_type, "classified script");
    script_type
}

/// Extract the payload of `chunks` as the given type.
///
/// Returns `None` for `NullData` and `NonStandard`, and for chunks that do
/// not actually have the shape of `script_type`.
pub fn extract_capture(
    chunks: &[ScriptChunk],
    script_type: ScriptType,
    config: &Config,
) -> Option<Capture> {
    PATTERNS
        .iter()
        .find(|pattern| pattern.script_type == script_type)
        .and_then(|pattern| (pattern.extract)(chunks, config))
}

/// Classify `chunks` and extract the payload of the matching pattern.
pub fn capture(chunks: &[ScriptChunk], config: &Config) -> Option<Capture> {
    extract_capture(chunks, classify(chunks, config), config)
}

// ---------------------------------------------------------------------------
// Structural matchers
// ---------------------------------------------------------------------------

pub(crate) fn pubkey_hash(chunks: &[ScriptChunk]) -> Option<&[u8]> {
    match chunks {
        [Opcode(OP_DUP), Opcode(OP_HASH160), Data(hash), Opcode(OP_EQUALVERIFY), Opcode(OP_CHECKSIG)]
            if hash.len() == HASH160_LEN =>
        {
            Some(hash.as_slice())
        }
        _ => None,
    }
}

pub(crate) fn pubkey<'a>(chunks: &'a [ScriptChunk], config: &Config) -> Option<&'a [u8]> {
    match chunks {
        [Data(key), Opcode(OP_CHECKSIG)] if config.accepts_pubkey(key) => Some(key.as_slice()),
        _ => None,
    }
}

/// Returns the public keys of a multisig script, in script order.
pub(crate) fn multisig<'a>(chunks: &'a [ScriptChunk], config: &Config) -> Option<Vec<&'a [u8]>> {
    let [Opcode(m_op), pushes @ .., Opcode(n_op), Opcode(OP_CHECKMULTISIG)] = chunks else {
        return None;
    };
    let m = small_int_value(*m_op)?;
    let n = small_int_value(*n_op)?;
    let keys = pushes
        .iter()
        .map(ScriptChunk::data)
        .collect::<Option<Vec<_>>>()?;

    let well_formed = !keys.is_empty()
        && keys.len() == n
        && config.accepts_threshold(m, n)
        && (!config.strict || keys.iter().all(|key| config.accepts_pubkey(key)));
    well_formed.then_some(keys)
}

pub(crate) fn script_hash(chunks: &[ScriptChunk]) -> Option<&[u8]> {
    match chunks {
        [Opcode(OP_HASH160), Data(hash), Opcode(OP_EQUAL)] if hash.len() == HASH160_LEN => {
            Some(hash.as_slice())
        }
        _ => None,
    }
}

pub(crate) fn null_data(chunks: &[ScriptChunk]) -> Option<&[u8]> {
    match chunks {
        [Opcode(OP_RETURN), Data(data)] => Some(data.as_slice()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Table adapters
// ---------------------------------------------------------------------------

fn is_pubkey_hash(chunks: &[ScriptChunk], _: &Config) -> bool {
    pubkey_hash(chunks).is_some()
}

fn is_pubkey(chunks: &[ScriptChunk], config: &Config) -> bool {
    pubkey(chunks, config).is_some()
}

fn is_multisig(chunks: &[ScriptChunk], config: &Config) -> bool {
    multisig(chunks, config).is_some()
}

fn is_script_hash(chunks: &[ScriptChunk], _: &Config) -> bool {
    script_hash(chunks).is_some()
}

fn is_null_data(chunks: &[ScriptChunk], _: &Config) -> bool {
    null_data(chunks).is_some()
}

fn capture_pubkey_hash(chunks: &[ScriptChunk], _: &Config) -> Option<Capture> {
    let hash = hash160_from_slice(pubkey_hash(chunks)?).ok()?;
    Some(Capture::Hash(hash))
}

fn capture_pubkey(chunks: &[ScriptChunk], config: &Config) -> Option<Capture> {
    pubkey(chunks, config).map(|key| Capture::Hash(hash160(key)))
}

fn capture_multisig(chunks: &[ScriptChunk], config: &Config) -> Option<Capture> {
    let keys = multisig(chunks, config)?;
    Some(Capture::Hashes(keys.into_iter().map(hash160).collect()))
}

fn capture_script_hash(chunks: &[ScriptChunk], _: &Config) -> Option<Capture> {
    let hash = hash160_from_slice(script_hash(chunks)?).ok()?;
    Some(Capture::Hash(hash))
}

fn no_capture(_: &[ScriptChunk], _: &Config) -> Option<Capture> {
    None
}
