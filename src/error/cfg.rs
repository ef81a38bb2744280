//! This module contains errors that occur while building the control-flow
//! graph for a contract.

use thiserror::Error;

use crate::error::container;

/// Errors that occur during construction of a
/// [`crate::cfg::ControlFlowGraph`].
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("The jump target {target:#x} does not lie within any basic block")]
    MissingJumpTarget { target: u32 },
}

/// A control-flow graph error located at the jump site that caused it.
pub type LocatedError = container::Located<Error>;

/// The result type for functions that may return control-flow graph errors.
pub type Result<T> = std::result::Result<T, LocatedError>;

impl container::Locatable for Error {
    type Located = LocatedError;

    fn locate(self, pc: u32) -> Self::Located {
        container::Located {
            location: pc,
            payload:  self,
        }
    }
}
