//! This module contains the definition of the abstract interpreter's storage
//! container.

use std::collections::HashMap;

use ethnum::U256;

use crate::vm::value::AbstractValue;

/// A representation of the persistent storage of the abstract interpreter.
///
/// Storage on the EVM is a word-addressed array of words. Unlike memory it is
/// never accessed at a finer granularity, so this tracks whole words keyed by
/// their slot.
///
/// Slots without an entry are unknown. Analysis never assumes the initial
/// contents of storage, as they depend on every transaction that came before.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Storage {
    slots: HashMap<U256, AbstractValue>,
}

impl Storage {
    /// Creates a new storage in which every slot is unknown.
    #[must_use]
    pub fn new() -> Self {
        let slots = HashMap::new();
        Self { slots }
    }

    /// Stores the provided `value` in storage at the provided `key`,
    /// overwriting any existing value at that key.
    pub fn store(&mut self, key: U256, value: AbstractValue) {
        if value.is_top() {
            self.slots.remove(&key);
        } else {
            self.slots.insert(key, value);
        }
    }

    /// Loads the value found at the provided `key`.
    #[must_use]
    pub fn load(&self, key: U256) -> AbstractValue {
        self.slots.get(&key).copied().unwrap_or_default()
    }

    /// Forgets the contents of every slot.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Computes the least upper bound of two storages, keeping only those
    /// slots that are known to be the same in both.
    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        let slots = self
            .slots
            .iter()
            .filter(|(key, value)| other.slots.get(key) == Some(value))
            .map(|(key, value)| (*key, *value))
            .collect();
        Self { slots }
    }

    /// Gets the number of slots whose value is known.
    #[must_use]
    pub fn known_slots(&self) -> usize {
        self.slots.len()
    }

    /// Checks if no slot of the storage is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod test {
    use ethnum::U256;

    use crate::vm::{
        state::storage::Storage,
        value::{known::KnownWord, AbstractValue},
    };

    fn known(value: u32) -> AbstractValue {
        AbstractValue::from(KnownWord::from(value))
    }

    #[test]
    fn unwritten_slots_are_unknown() {
        let storage = Storage::new();
        assert!(storage.load(U256::ZERO).is_top());
        assert!(storage.is_empty());
    }

    #[test]
    fn can_store_and_load() {
        let mut storage = Storage::new();
        storage.store(U256::ONE, known(42));

        assert_eq!(storage.load(U256::ONE), known(42));
        assert!(storage.load(U256::ZERO).is_top());
    }

    #[test]
    fn storing_unknown_value_forgets_slot() {
        let mut storage = Storage::new();
        storage.store(U256::ONE, known(42));
        storage.store(U256::ONE, AbstractValue::Top);

        assert!(storage.load(U256::ONE).is_top());
        assert_eq!(storage.known_slots(), 0);
    }

    #[test]
    fn can_clear_storage() {
        let mut storage = Storage::new();
        storage.store(U256::ONE, known(1));
        storage.store(U256::MAX, known(2));
        storage.clear();

        assert!(storage.is_empty());
    }

    #[test]
    fn join_keeps_agreeing_slots() {
        let mut left = Storage::new();
        let mut right = Storage::new();
        left.store(U256::ZERO, known(1));
        left.store(U256::ONE, known(2));
        right.store(U256::ZERO, known(1));
        right.store(U256::ONE, known(3));

        let joined = left.join(&right);
        assert_eq!(joined.load(U256::ZERO), known(1));
        assert!(joined.load(U256::ONE).is_top());
    }
}
