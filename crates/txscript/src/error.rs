/// Error types for script operations.
///
/// Parsing, classification and capture never fail; these errors only come
/// from decoding text forms (hex, ASM) and from pushes too large to encode.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Invalid hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// An ASM token was neither an opcode name nor valid hex data.
    #[error("invalid opcode data: '{0}'")]
    InvalidOpcodeData(String),

    /// Push data exceeds what OP_PUSHDATA4 can describe.
    #[error("data too big: {0} bytes")]
    DataTooBig(usize),

    /// A push data part exceeds protocol limits.
    #[error("part too big '{0}'")]
    PartTooBig(usize),

    /// Error from primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] txscript_primitives::PrimitivesError),
}
