//! This module contains errors pertaining to the abstract interpretation of
//! the bytecode.

use thiserror::Error;

use crate::error::container;

/// Errors that occur during the execution of the bytecode by the
/// [`crate::vm::VM`].
///
/// Conditions such as stack underflow are not errors for the abstract
/// interpreter. These errors only arise when the inputs handed to the
/// interpreter are inconsistent with each other.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("The basic block {block} refers to an instruction that does not exist")]
    NoSuchInstruction { block: usize },

    #[error("The control-flow graph refers to block {block} which does not exist")]
    NoSuchBlock { block: usize },
}

/// An execution error with an associated location in the bytecode.
pub type LocatedError = container::Located<Error>;

/// The result type for methods that may have execution errors.
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
