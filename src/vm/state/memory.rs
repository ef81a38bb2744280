//! This module contains the definition of the abstract interpreter's memory.

use std::collections::HashMap;

use ethnum::U256;

use crate::{
    constant::WORD_SIZE_BYTES,
    vm::value::{known::KnownWord, AbstractValue},
};

/// A representation of the transient memory of the abstract interpreter.
///
/// Memory on the EVM is a byte array, and words written to it may later be
/// read back at any alignment. To support that, this memory tracks individual
/// bytes, each of which is either known or unknown.
///
/// Only known bytes are stored. Any address that has no entry is unknown,
/// which is also the state of the whole memory at the start of analysis.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Memory {
    bytes: HashMap<U256, u8>,
}

impl Memory {
    /// Constructs a new memory container in which every byte is unknown.
    #[must_use]
    pub fn new() -> Self {
        let bytes = HashMap::default();
        Self { bytes }
    }

    /// Stores the 32-byte `value` at `offset`, most significant byte first.
    ///
    /// Storing an unknown value forgets the bytes it covers. A store whose
    /// range would extend past the end of the address space has no effect.
    pub fn store_word(&mut self, offset: U256, value: AbstractValue) {
        let Some(addresses) = word_range(offset) else {
            tracing::debug!("Memory store at {offset:#x} overflows the address space");
            return;
        };

        match value.concrete() {
            Some(word) => {
                for (address, byte) in addresses.zip(word.bytes_be()) {
                    self.bytes.insert(address, byte);
                }
            }
            None => {
                for address in addresses {
                    self.bytes.remove(&address);
                }
            }
        }
    }

    /// Stores the least significant byte of `value` at `offset`.
    pub fn store_byte(&mut self, offset: U256, value: AbstractValue) {
        match value.concrete() {
            Some(word) => {
                self.bytes.insert(offset, word.low_byte());
            }
            None => {
                self.bytes.remove(&offset);
            }
        }
    }

    /// Loads the 32-byte word at `offset`.
    ///
    /// The result is only known if every one of the bytes it is built from is
    /// known.
    #[must_use]
    pub fn load_word(&self, offset: U256) -> AbstractValue {
        let Some(addresses) = word_range(offset) else {
            return AbstractValue::Top;
        };

        let mut buffer = [0u8; WORD_SIZE_BYTES];
        for (slot, address) in buffer.iter_mut().zip(addresses) {
            match self.bytes.get(&address) {
                Some(byte) => *slot = *byte,
                None => return AbstractValue::Top,
            }
        }

        AbstractValue::from(KnownWord::from_be_bytes(buffer))
    }

    /// Loads `length` bytes starting at `offset`, returning [`None`] if any of
    /// them is unknown or the range leaves the address space.
    #[must_use]
    pub fn load_bytes(&self, offset: U256, length: usize) -> Option<Vec<u8>> {
        let length_word = U256::from(u64::try_from(length).ok()?);
        if length_word > U256::ZERO {
            offset.checked_add(length_word - U256::ONE)?;
        }

        (0..length)
            .map(|i| {
                let address = offset.wrapping_add(U256::from(i as u64));
                self.bytes.get(&address).copied()
            })
            .collect()
    }

    /// Forgets the contents of the whole memory.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Computes the least upper bound of two memories, keeping only those
    /// bytes that are known to be the same in both.
    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        let bytes = self
            .bytes
            .iter()
            .filter(|(address, byte)| other.bytes.get(address) == Some(byte))
            .map(|(address, byte)| (*address, *byte))
            .collect();
        Self { bytes }
    }

    /// Gets the number of bytes whose value is known.
    ///
    /// This has no equivalent operation on the EVM and is primarily useful for
    /// introspection.
    #[must_use]
    pub fn known_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Checks if no byte of the memory is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.known_bytes() == 0
    }
}

/// Gets the addresses of the 32 bytes of the word starting at `offset`, or
/// [`None`] if the word does not fit in the address space.
fn word_range(offset: U256) -> Option<impl Iterator<Item = U256>> {
    offset.checked_add(U256::from(WORD_SIZE_BYTES as u64 - 1))?;
    Some((0..WORD_SIZE_BYTES as u64).map(move |i| offset + U256::from(i)))
}
