/// Script primitives - hashing building blocks for the txscript codec.
///
/// Provides the digests used when deriving the canonical payload of
/// standard scripts:
/// - SHA-256 and RIPEMD-160
/// - Hash160 (RIPEMD-160 over SHA-256)

pub mod hash;

mod error;
pub use error::PrimitivesError;
