//! Transfer functions for the opcodes that perform control(-flow) operations,
//! including calls into other contracts.

use crate::{
    opcode::Opcode,
    vm::{step::Step, value::AbstractValue},
};

/// Executes the control-flow instruction in `step`.
pub fn transfer(step: &mut Step<'_>) {
    match step.opcode() {
        Opcode::JumpDest => (),
        Opcode::Jump | Opcode::JumpI => jump(step),
        Opcode::Call | Opcode::CallCode | Opcode::DelegateCall | Opcode::StaticCall => {
            step.havoc();
            step.state.storage.clear();
            step.state.memory.clear();
        }
        Opcode::Create | Opcode::Create2 => {
            step.havoc();
            step.state.storage.clear();
        }
        _ => step.havoc(),
    }
}

/// Narrows the recorded targets of the jump in `step` when its destination is
/// statically known.
///
/// A known destination that is a `JUMPDEST` becomes the only target, while
/// one that is not leaves the jump with no targets at all. Jumps to unknown
/// destinations keep whatever targets they already had.
fn jump(step: &mut Step<'_>) {
    let operands = step.pop_all();
    let Some(address) = operands.first().copied().and_then(AbstractValue::concrete) else {
        return;
    };

    let pc = step.pc();
    let Some(targets) = step.jumps.get_mut(&pc) else {
        tracing::warn!(pc, "Jump site was never seeded with targets");
        return;
    };

    match address.to_u32().filter(|t| step.jump_destinations.contains(t)) {
        Some(target) => {
            targets.retain(|t| *t == target);
            tracing::debug!(pc, target, "Resolved jump to a single target");
        }
        None => {
            targets.clear();
            tracing::debug!(pc, %address, "Jump destination is not a JUMPDEST, removing all targets");
        }
    }
    step.instruction.resolved_targets = targets.iter().copied().collect();
}
