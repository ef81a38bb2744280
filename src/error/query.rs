//! This module contains the errors returned to callers of the
//! [`crate::query::Facts`] interface.
//!
//! These are programming errors on the part of the caller, and are kept
//! distinct from queries that legitimately produce no results, such as those
//! about a contract or instruction that does not exist.

use thiserror::Error;

use crate::{error::container, opcode::Opcode};

/// Errors produced when a query is malformed.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("Requested {requested} operands but `{opcode}` takes {expected}")]
    ArityMismatch {
        opcode:    Opcode,
        requested: usize,
        expected:  usize,
    },
}

/// A query error located at the program counter that was queried.
pub type LocatedError = container::Located<Error>;

/// The result type for queries.
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
