//! Location and removal of the compiler metadata that `solc` appends to the
//! runtime bytecode of a contract.
//!
//! The metadata is a CBOR map that is never executed. Decoding it as code
//! produces garbage instructions, so it is cut off before disassembly.

use crate::constant::{METADATA_LENGTH_BYTES, METADATA_MARKERS};

/// Finds the offset at which the compiler metadata begins.
///
/// The metadata ends with its own length as a big-endian integer in the last
/// [`METADATA_LENGTH_BYTES`] bytes. It is only found if that length points
/// back at one of the known markers, so markers that occur earlier in the
/// bytecode (such as in the embedded code of another contract) are ignored.
#[must_use]
pub fn find_metadata(bytes: &[u8]) -> Option<usize> {
    let length_at = bytes.len().checked_sub(METADATA_LENGTH_BYTES)?;
    let length = bytes[length_at..]
        .iter()
        .fold(0usize, |acc, byte| (acc << 8) | usize::from(*byte));
    let start = length_at.checked_sub(length)?;

    METADATA_MARKERS
        .iter()
        .any(|marker| bytes[start..length_at].starts_with(marker))
        .then_some(start)
}

/// Removes the compiler metadata from the end of `bytes`.
///
/// If no metadata marker can be found, a warning is logged and the bytes are
/// returned unchanged.
#[must_use]
pub fn strip_metadata(bytes: &[u8]) -> &[u8] {
    match find_metadata(bytes) {
        Some(start) => {
            tracing::debug!(
                offset = start,
                stripped = bytes.len() - start,
                "Stripped compiler metadata"
            );
            &bytes[..start]
        }
        None => {
            tracing::warn!("No compiler metadata marker found, decoding the whole input");
            bytes
        }
    }
}
