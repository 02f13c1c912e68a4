/// Unified error type for primitives operations.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid hash length: expected {expected}, got {got}")]
    InvalidHashLength { expected: usize, got: usize },
}
