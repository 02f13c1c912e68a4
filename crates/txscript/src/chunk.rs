//! Script chunk parsing and encoding.
//!
//! A script chunk is either an opcode or a data push. This module decodes
//! raw script bytes into structured chunks and encodes push data with the
//! shortest OP_PUSHDATA prefix.

use crate::opcodes::*;
use crate::ScriptError;

/// A single parsed element of a script.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScriptChunk {
    /// A control byte with no payload. Includes OP_0 and every non-push opcode.
    Opcode(u8),
    /// A data push of zero or more bytes, whatever prefix it was read with.
    Data(Vec<u8>),
}

impl ScriptChunk {
    /// Return true if this chunk is an opcode.
    pub fn is_opcode(&self) -> bool {
        matches!(self, ScriptChunk::Opcode(_))
    }

    /// Return true if this chunk is a data push.
    pub fn is_data(&self) -> bool {
        matches!(self, ScriptChunk::Data(_))
    }

    /// The opcode value, if this chunk is an opcode.
    pub fn opcode(&self) -> Option<u8> {
        match self {
            ScriptChunk::Opcode(op) => Some(*op),
            ScriptChunk::Data(_) => None,
        }
    }

    /// The pushed bytes, if this chunk is a data push.
    pub fn data(&self) -> Option<&[u8]> {
        match self {
            ScriptChunk::Opcode(_) => None,
            ScriptChunk::Data(data) => Some(data),
        }
    }

    /// Convert this chunk to its ASM string representation.
    ///
    /// Data pushes are rendered as hex strings; opcodes use their canonical
    /// OP_xxx name.
    pub fn to_asm_string(&self) -> String {
        match self {
            ScriptChunk::Opcode(op) => opcode_to_string(*op),
            ScriptChunk::Data(data) => hex::encode(data),
        }
    }

    /// Append the canonical encoding of this chunk to `buf`.
    pub(crate) fn encode_into(&self, buf: &mut Vec<u8>) -> Result<(), ScriptError> {
        match self {
            ScriptChunk::Opcode(op) => buf.push(*op),
            ScriptChunk::Data(data) => {
                buf.extend_from_slice(&push_data_prefix(data.len())?);
                buf.extend_from_slice(data);
            }
        }
        Ok(())
    }
}

impl From<u8> for ScriptChunk {
    fn from(op: u8) -> Self {
        ScriptChunk::Opcode(op)
    }
}

impl From<Vec<u8>> for ScriptChunk {
    fn from(data: Vec<u8>) -> Self {
        ScriptChunk::Data(data)
    }
}

impl From<&[u8]> for ScriptChunk {
    fn from(data: &[u8]) -> Self {
        ScriptChunk::Data(data.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for ScriptChunk {
    fn from(data: &[u8; N]) -> Self {
        ScriptChunk::Data(data.to_vec())
    }
}

/// Read a little-endian length field of `width` bytes starting at `pos`.
fn read_length(bytes: &[u8], pos: usize, width: usize) -> Option<usize> {
    let field = bytes.get(pos..pos + width)?;
    let mut le = [0u8; 4];
    le[..width].copy_from_slice(field);
    Some(u32::from_le_bytes(le) as usize)
}

/// Decode raw script bytes into a vector of `ScriptChunk` values.
///
/// Handles direct pushes (0x01..=0x4b) and OP_PUSHDATA1/2/4. Every other
/// byte, including OP_0, becomes an opcode chunk.
///
/// Decoding never fails. If a length prefix is cut short, or a push
/// declares more bytes than remain, decoding stops there and the chunks
/// read so far are returned.
///
/// # Arguments
/// * `bytes` - The raw script bytes to decode.
///
/// # Returns
/// The chunks decoded before the end of input or the first truncated push.
pub fn decode_script(bytes: &[u8]) -> Vec<ScriptChunk> {
    let mut chunks = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let op = bytes[pos];
        pos += 1;

        // Width of the little-endian length field following the opcode.
        let width = match op {
            OP_DATA_1..=OP_DATA_75 => 0,
            OP_PUSHDATA1 => 1,
            OP_PUSHDATA2 => 2,
            OP_PUSHDATA4 => 4,
            _ => {
                chunks.push(ScriptChunk::Opcode(op));
                continue;
            }
        };

        let length = if width == 0 {
            op as usize
        } else {
            let Some(length) = read_length(bytes, pos, width) else {
                tracing::trace!(offset = pos - 1, op, width, "push length prefix truncated");
                break;
            };
            pos += width;
            length
        };

        let Some(data) = pos.checked_add(length).and_then(|end| bytes.get(pos..end)) else {
            tracing::trace!(
                offset = pos,
                needed = length,
                available = bytes.len() - pos,
                "push data truncated"
            );
            break;
        };
        chunks.push(ScriptChunk::Data(data.to_vec()));
        pos += length;
    }

    chunks
}

/// Compute the OP_PUSHDATA prefix bytes for a data payload of the given length.
///
/// Uses the shortest applicable form: a single length byte below 0x4c,
/// then OP_PUSHDATA1, OP_PUSHDATA2 and OP_PUSHDATA4.
///
/// # Arguments
/// * `data_len` - The length of the data to be pushed.
///
/// # Returns
/// A byte vector containing the prefix, or `DataTooBig` if the length does
/// not fit in four bytes.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    if data_len < OP_PUSHDATA1 as usize {
        Ok(vec![data_len as u8])
    } else if data_len <= 0xFF {
        Ok(vec![OP_PUSHDATA1, data_len as u8])
    } else if data_len <= 0xFFFF {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        Ok(buf)
    } else if let Ok(len) = u32::try_from(data_len) {
        let mut buf = vec![OP_PUSHDATA4];
        buf.extend_from_slice(&len.to_le_bytes());
        Ok(buf)
    } else {
        Err(ScriptError::DataTooBig(data_len))
    }
}

/// Serialize a chunk sequence into raw script bytes.
///
/// Opcodes emit their byte; data pushes emit the shortest prefix followed
/// by the data.
pub fn encode_chunks(chunks: &[ScriptChunk]) -> Result<Vec<u8>, ScriptError> {
    let mut buf = Vec::new();
    for chunk in chunks {
        chunk.encode_into(&mut buf)?;
    }
    Ok(buf)
}

/// Encode multiple data payloads into a single byte vector with push prefixes.
///
/// # Arguments
/// * `parts` - Slice of data byte slices to encode.
///
/// # Returns
/// A byte vector containing all pushes concatenated, or `PartTooBig(i)` for
/// the first part that cannot be encoded.
pub fn encode_push_datas(parts: &[&[u8]]) -> Result<Vec<u8>, ScriptError> {
    let mut result = Vec::new();
    for (i, part) in parts.iter().enumerate() {
        let prefix = push_data_prefix(part.len()).map_err(|_| ScriptError::PartTooBig(i))?;
        result.extend_from_slice(&prefix);
        result.extend_from_slice(part);
    }
    Ok(result)
}
