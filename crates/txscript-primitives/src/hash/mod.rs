//! Hash function primitives for script fingerprinting.
//!
//! Provides SHA-256, RIPEMD-160 and Hash160, the digests used to derive the
//! canonical payload of public keys and redeem scripts.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::PrimitivesError;

/// Length in bytes of a Hash160 digest.
pub const HASH160_LEN: usize = 20;

/// Compute SHA-256 hash of the input data.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte SHA-256 digest.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute RIPEMD-160 hash of the input data.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 20-byte RIPEMD-160 digest.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute Hash160: RIPEMD-160(SHA-256(data)).
///
/// This is the fingerprint embedded in pay-to-public-key-hash and
/// pay-to-script-hash outputs.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 20-byte Hash160 digest.
pub fn hash160(data: &[u8]) -> [u8; HASH160_LEN] {
    ripemd160(&sha256(data))
}

/// Copy an already-computed Hash160 digest out of a byte slice.
///
/// # Arguments
/// * `bytes` - Exactly 20 bytes.
///
/// # Returns
/// The digest as a fixed-size array, or `InvalidHashLength` if the slice is
/// any other length.
pub fn hash160_from_slice(bytes: &[u8]) -> Result<[u8; HASH160_LEN], PrimitivesError> {
    bytes
        .try_into()
        .map_err(|_| PrimitivesError::InvalidHashLength {
            expected: HASH160_LEN,
            got: bytes.len(),
        })
}
