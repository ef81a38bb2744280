//! The state representation for the abstract interpreter, and utilities for
//! dealing with said representation.

pub mod memory;
pub mod stack;
pub mod storage;

use crate::vm::state::{memory::Memory, stack::Stack, storage::Storage};

/// The abstract machine state that the [`super::VM`] threads through the
/// instructions of a contract.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VMState {
    /// The operand stack.
    pub stack: Stack,

    /// The byte-addressed transient memory.
    pub memory: Memory,

    /// The word-addressed persistent storage.
    pub storage: Storage,
}

impl VMState {
    /// Creates a state in which nothing is known.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the least upper bound of two states, component-wise.
    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        Self {
            stack:   self.stack.join(&other.stack),
            memory:  self.memory.join(&other.memory),
            storage: self.storage.join(&other.storage),
        }
    }
}
