//! This module contains useful macros for working with bytecode and opcodes.

/// Constructs a bytecode input from the input instructions as literal opcodes.
///
/// Each element is either a bare [`crate::opcode::Opcode`] or a pair of an
/// opcode and an array of its immediate bytes.
///
/// # Usage
///
/// ```
/// use evm_fact_extractor::{bytecode, opcode::{Encode, Opcode}};
///
/// let bytes = bytecode![
///     (Opcode::Push(1), [0x02]),
///     Opcode::Jump,
///     Opcode::JumpDest,
///     Opcode::Stop,
/// ];
///
/// assert_eq!(bytes, vec![0x60, 0x02, 0x56, 0x5b, 0x00]);
/// ```
#[macro_export]
macro_rules! bytecode {
    ($($path:expr),*$(,)?) => {{
        use $crate::opcode::Encode;
        let mut vec: Vec<u8> = vec![];
        $(vec.extend($path.encode());)*
        vec
    }};
}

// Export it scoped
pub use bytecode;
