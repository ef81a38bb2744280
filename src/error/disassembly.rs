//! This module contains the error type that pertains to the disassembly
//! process.

use thiserror::Error;

use crate::{error::container, opcode::Opcode};

/// Errors that occur during the process of disassembling the bytecode into
/// the library's [`crate::disassembly::Instruction`]s.
///
/// Most malformed input is tolerated by the decoder, so these are limited to
/// conditions that make the analysis of the contract meaningless.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("The `{_0}` opcode cannot be analyzed soundly and strict mode is enabled")]
    UnsoundOpcode(Opcode),

    #[error("The length of the bytecode exceeded {}", u32::MAX)]
    BytecodeTooLarge,

    #[error("The mnemonic {_0:?} does not name any known opcode")]
    UnknownMnemonic(String),
}

/// A disassembly error with an associated location in the bytecode.
pub type LocatedError = container::Located<Error>;

/// The result type for functions that may return disassembly errors.
pub type Result<T> = std::result::Result<T, LocatedError>;

/// Make it possible to attach locations to these errors.
impl container::Locatable for Error {
    type Located = LocatedError;

    fn locate(self, pc: u32) -> Self::Located {
        container::Located {
            location: pc,
            payload:  self,
        }
    }
}
