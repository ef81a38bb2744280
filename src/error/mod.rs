//! This module contains the primary error type for the library's interface.
//! It also re-exports the more specific error types that are
//! subsystem-specific.
//!
//! Only conditions that make a result meaningless are errors. Malformed
//! bytecode, stack underflow and unknown values are tolerated by the
//! subsystems and reported through logging instead.

pub mod cfg;
pub mod container;
pub mod disassembly;
pub mod execution;
pub mod input;
pub mod query;

use thiserror::Error;

/// The interface result type for the library.
///
/// # Usage
///
/// Any function considered to be part of the public interface of the library
/// should return this result type. Subsystems should return the more-specific
/// child error types as appropriate.
pub type Result<T> = std::result::Result<T, Errors>;

/// The interface error type for the library.
///
/// All errors returned from the library interface (and hence encountered by the
/// clients of the library) should be members of this enum.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Error {
    /// Errors that come from the disassembly process.
    #[error(transparent)]
    Disassembly(#[from] disassembly::Error),

    /// Errors from building the control-flow graph.
    #[error(transparent)]
    Cfg(#[from] cfg::Error),

    /// Errors from the abstract interpreter.
    #[error(transparent)]
    Execution(#[from] execution::Error),

    /// Errors from misuse of the query interface.
    #[error(transparent)]
    Query(#[from] query::Error),

    /// Errors from reading the contract input.
    #[error(transparent)]
    Input(#[from] input::Error),
}

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

/// A library error with an associated bytecode location.
pub type LocatedError = container::Located<Error>;

/// A container of errors that may occur during analysis.
pub type Errors = container::Errors<LocatedError>;

/// Generates the conversions that re-wrap a located subsystem error around the
/// more general payload, both on its own and inside the [`Errors`] container.
macro_rules! located_conversions {
    ($($module:ident),*$(,)?) => {
        $(
            impl From<$module::LocatedError> for LocatedError {
                fn from(value: $module::LocatedError) -> Self {
                    Self {
                        location: value.location,
                        payload:  Error::from(value.payload),
                    }
                }
            }

            impl From<$module::LocatedError> for Errors {
                fn from(value: $module::LocatedError) -> Self {
                    let re_wrapped: LocatedError = value.into();
                    re_wrapped.into()
                }
            }
        )*
    };
}

located_conversions!(disassembly, cfg, execution, query);

/// Input errors concern the contract as a whole, so they are reported at the
/// start of the bytecode.
impl From<input::Error> for Errors {
    fn from(value: input::Error) -> Self {
        let located = container::Located {
            location: 0,
            payload:  Error::from(value),
        };
        located.into()
    }
}

#[cfg(test)]
mod test {
    use crate::{
        error::{container::Locatable, disassembly, Error, Errors},
        opcode::Opcode,
    };

    #[test]
    fn can_rewrap_located_subsystem_errors() {
        let located = disassembly::Error::UnsoundOpcode(Opcode::DelegateCall).locate(0x0c);
        let errors: Errors = located.into();

        assert_eq!(errors.len(), 1);
        let first = &errors.payloads()[0];
        assert_eq!(first.location, 0x0c);
        assert_eq!(
            first.payload,
            Error::Disassembly(disassembly::Error::UnsoundOpcode(Opcode::DelegateCall))
        );
    }
}
