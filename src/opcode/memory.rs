//! Transfer functions for the opcodes that move data between the stack,
//! memory and storage.
//!
//! # Unknown Addresses
//!
//! A store to an address that is not statically known could overwrite any
//! location, so the whole of the affected memory or storage is forgotten. A
//! load from such an address is unknown.

use crate::{
    opcode::Opcode,
    vm::{step::Step, value::AbstractValue},
};

/// Executes the stack, memory or storage instruction in `step`.
pub fn transfer(step: &mut Step<'_>) {
    match step.opcode() {
        Opcode::Push(_) => push(step),
        Opcode::Dup(n) => dup(step, n as usize),
        Opcode::Swap(n) => swap(step, n as usize),
        Opcode::Pop | Opcode::Log(_) | Opcode::TStore => {
            step.pop_all();
        }
        Opcode::MLoad => mload(step),
        Opcode::MStore | Opcode::MStore8 => mstore(step),
        Opcode::SLoad => sload(step),
        Opcode::SStore => sstore(step),
        Opcode::MCopy
        | Opcode::CallDataCopy
        | Opcode::CodeCopy
        | Opcode::ReturnDataCopy
        | Opcode::ExtCodeCopy => {
            step.pop_all();
            step.state.memory.clear();
        }
        _ => step.havoc(),
    }
}

fn push(step: &mut Step<'_>) {
    let value = AbstractValue::from(step.instruction.immediate);
    step.push_result(value);
}

/// `DUPn` records the `n` frames it reads as its operands without consuming
/// them.
fn dup(step: &mut Step<'_>, n: usize) {
    record_frames(step, n);
    let value = step.state.stack.dup(n.saturating_sub(1));
    step.instruction.result = value.concrete();
}

/// `SWAPn` records the `n + 1` frames it reorders as its operands.
fn swap(step: &mut Step<'_>, n: usize) {
    record_frames(step, n + 1);
    step.state.stack.swap(n);
}

fn record_frames(step: &mut Step<'_>, count: usize) {
    for (frame, slot) in step.instruction.operands.iter_mut().enumerate().take(count) {
        *slot = step.state.stack.read(frame).concrete();
    }
}

fn mload(step: &mut Step<'_>) {
    let [offset] = step.pop_operands::<1>();
    let value = offset
        .concrete()
        .map_or(AbstractValue::Top, |offset| step.state.memory.load_word(offset.value()));
    step.push_result(value);
}

fn mstore(step: &mut Step<'_>) {
    let [offset, value] = step.pop_operands::<2>();
    let Some(offset) = offset.concrete() else {
        tracing::warn!(
            pc = step.pc(),
            opcode = %step.opcode(),
            "Store to an unknown memory address, forgetting all of memory"
        );
        step.state.memory.clear();
        return;
    };

    if step.opcode() == Opcode::MStore8 {
        step.state.memory.store_byte(offset.value(), value);
    } else {
        step.state.memory.store_word(offset.value(), value);
    }
}

fn sload(step: &mut Step<'_>) {
    let [key] = step.pop_operands::<1>();
    let value = key
        .concrete()
        .map_or(AbstractValue::Top, |key| step.state.storage.load(key.value()));
    step.push_result(value);
}

fn sstore(step: &mut Step<'_>) {
    let [key, value] = step.pop_operands::<2>();
    match key.concrete() {
        Some(key) => step.state.storage.store(key.value(), value),
        None => {
            tracing::warn!(
                pc = step.pc(),
                "Store to an unknown storage slot, forgetting all of storage"
            );
            step.state.storage.clear();
        }
    }
}
