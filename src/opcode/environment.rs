//! Transfer functions for the opcodes that read the execution environment.
//!
//! Nothing about the environment is known statically, so every one of these
//! produces an unknown value. The exception is `SHA3`, which is computed when
//! the memory it hashes is entirely known.

use crate::{
    opcode::Opcode,
    vm::{
        step::Step,
        value::{known::KnownWord, AbstractValue},
    },
};

/// Executes the environment instruction in `step`.
pub fn transfer(step: &mut Step<'_>) {
    match step.opcode() {
        Opcode::Sha3 => sha3(step),
        _ => step.havoc(),
    }
}

/// Hashes `memory[offset..offset + length]`, where `offset` is on the top of
/// the stack and `length` is below it.
///
/// The result is unknown if either operand is unknown, if the length exceeds
/// the configured limit, or if any byte of the range is unknown.
fn sha3(step: &mut Step<'_>) {
    let [offset, length] = step.pop_operands::<2>();
    let result = hash_memory(step, offset, length).map_or(AbstractValue::Top, AbstractValue::from);
    step.push_result(result);
}

fn hash_memory(step: &Step<'_>, offset: AbstractValue, length: AbstractValue) -> Option<KnownWord> {
    let offset = offset.concrete()?;
    let length = length.concrete()?.to_usize()?;
    if length > step.config.max_hashed_bytes {
        tracing::debug!(
            pc = step.pc(),
            length,
            limit = step.config.max_hashed_bytes,
            "Not hashing a memory range above the limit"
        );
        return None;
    }

    let data = step.state.memory.load_bytes(offset.value(), length)?;
    Some(KnownWord::from_be_bytes(step.hasher.digest(&data)))
}
