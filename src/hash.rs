//! The hash function used by the abstract interpreter to evaluate `SHA3` over
//! known memory.

use sha3::{Digest, Keccak256};

use crate::constant::WORD_SIZE_BYTES;

/// A hash function producing a 32-byte digest.
///
/// The interpreter is generic over this so that tests can observe or replace
/// the hashing of memory.
pub trait Hasher: std::fmt::Debug {
    /// Computes the digest of `data`.
    fn digest(&self, data: &[u8]) -> [u8; WORD_SIZE_BYTES];
}

/// The Keccak-256 hash as used by the EVM's `SHA3` opcode.
///
/// Note that this is the original Keccak submission, and not the finalised
/// NIST SHA3-256 standard.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Keccak;

impl Hasher for Keccak {
    fn digest(&self, data: &[u8]) -> [u8; WORD_SIZE_BYTES] {
        let mut hasher = Keccak256::new();
        hasher.update(data);
        hasher.finalize().into()
    }
}
