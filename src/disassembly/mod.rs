//! This module contains the instruction decoder, which turns the bytecode of a
//! contract into a [`ContractInfo`] of positioned [`Instruction`]s.

pub mod disassembler;
pub mod info;
pub mod instruction;
pub mod metadata;

pub use disassembler::disassemble;
pub use info::ContractInfo;
pub use instruction::Instruction;

use crate::constant::{DEFAULT_STRICT_MODE_ENABLED, DEFAULT_STRIP_METADATA_ENABLED};

/// The configuration for the decoder.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// Whether `DELEGATECALL` and `CALLCODE` are rejected.
    ///
    /// The abstract interpreter treats calls as opaque, but these two opcodes
    /// run foreign code against the contract's own storage, which makes the
    /// analysis unsound. Disabling strict mode decodes them anyway, which is
    /// useful when gathering statistics over many contracts.
    ///
    /// Defaults to [`DEFAULT_STRICT_MODE_ENABLED`].
    pub strict: bool,

    /// Whether compiler metadata is located and removed from the end of the
    /// bytecode before decoding.
    ///
    /// Defaults to [`DEFAULT_STRIP_METADATA_ENABLED`].
    pub strip_metadata: bool,
}

impl Config {
    /// Sets whether the decoder rejects `DELEGATECALL` and `CALLCODE`.
    #[must_use]
    pub fn with_strict(mut self, value: bool) -> Self {
        self.strict = value;
        self
    }

    /// Sets whether compiler metadata is stripped before decoding.
    #[must_use]
    pub fn with_strip_metadata(mut self, value: bool) -> Self {
        self.strip_metadata = value;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict:         DEFAULT_STRICT_MODE_ENABLED,
            strip_metadata: DEFAULT_STRIP_METADATA_ENABLED,
        }
    }
}
