//! This module contains the [`ContractInfo`], the per-contract store of
//! decoded instructions and what is known about the contract's jumps.

use std::collections::{BTreeMap, BTreeSet};

use crate::{disassembly::instruction::Instruction, opcode::Opcode};

/// Everything that the analysis knows about the code of a single contract.
///
/// # Jumps
///
/// The `jumps` map has an entry for every `JUMP` and `JUMPI` in the contract.
/// After decoding, each entry holds every `JUMPDEST` in the contract, which is
/// a safe over-approximation. The interpreter narrows an entry when it learns
/// the address being jumped to, either to that single address or to nothing
/// if the address is not a valid jump destination.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ContractInfo {
    /// The decoded instructions, keyed by their program counter.
    pub(crate) instructions: BTreeMap<u32, Instruction>,

    /// The program counters of every `JUMPDEST`.
    pub(crate) jump_destinations: BTreeSet<u32>,

    /// The possible targets of each jump, keyed by the program counter of the
    /// jump.
    pub(crate) jumps: BTreeMap<u32, BTreeSet<u32>>,
}

impl ContractInfo {
    /// Creates a new contract info with no instructions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `instruction` to the contract, recording it as a jump destination
    /// if it is a `JUMPDEST`.
    pub fn push(&mut self, instruction: Instruction) {
        if instruction.opcode == Opcode::JumpDest {
            self.jump_destinations.insert(instruction.pc);
        }
        self.instructions.insert(instruction.pc, instruction);
    }

    /// Gets the instructions of the contract in program counter order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.values()
    }

    /// Gets the instruction at `pc`, if there is one.
    #[must_use]
    pub fn instruction(&self, pc: u32) -> Option<&Instruction> {
        self.instructions.get(&pc)
    }

    /// Gets the number of instructions in the contract.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Checks if the contract has no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Gets the program counters of every `JUMPDEST`.
    #[must_use]
    pub fn jump_destinations(&self) -> &BTreeSet<u32> {
        &self.jump_destinations
    }

    /// Checks if `pc` is a valid target for a jump.
    #[must_use]
    pub fn is_jump_destination(&self, pc: u32) -> bool {
        self.jump_destinations.contains(&pc)
    }

    /// Gets the possible targets of every jump in the contract.
    #[must_use]
    pub fn jumps(&self) -> &BTreeMap<u32, BTreeSet<u32>> {
        &self.jumps
    }

    /// Gets the possible targets of the jump at `pc`, or [`None`] if there is
    /// no jump at `pc`.
    #[must_use]
    pub fn jump_targets(&self, pc: u32) -> Option<&BTreeSet<u32>> {
        self.jumps.get(&pc)
    }

    /// Sets the targets of every jump to the full set of jump destinations.
    pub fn seed_jumps(&mut self) {
        let sites: Vec<u32> = self
            .instructions
            .values()
            .filter(|instruction| instruction.opcode.is_jump())
            .map(|instruction| instruction.pc)
            .collect();

        self.jumps = sites
            .into_iter()
            .map(|site| (site, self.jump_destinations.clone()))
            .collect();
    }

    /// Replaces the targets of every jump with those given in `targets`.
    ///
    /// Jump sites that `targets` does not mention are given no targets at
    /// all, and entries in `targets` for locations that are not jumps are
    /// ignored.
    pub fn replace_jumps(&mut self, targets: &BTreeMap<u32, BTreeSet<u32>>) {
        for (site, known) in &mut self.jumps {
            *known = targets.get(site).cloned().unwrap_or_default();
        }

        for site in targets.keys().filter(|site| !self.jumps.contains_key(*site)) {
            tracing::warn!(pc = site, "Ignoring jump targets given for an instruction that is not a jump");
        }
    }

    /// Gets the program counter one past the end of the contract.
    ///
    /// A trailing `PUSH` is counted at its full declared size, even if the
    /// bytecode ended before all of its immediate bytes.
    #[must_use]
    pub fn end_pc(&self) -> u32 {
        self.instructions
            .values()
            .next_back()
            .map_or(0, Instruction::next_pc)
    }

    /// Re-encodes the instructions to bytecode.
    #[must_use]
    pub fn to_bytecode(&self) -> Vec<u8> {
        self.instructions.values().flat_map(Instruction::encode).collect()
    }

    /// Forgets everything that interpretation has attached to the
    /// instructions.
    pub fn clear_annotations(&mut self) {
        self.instructions
            .values_mut()
            .for_each(Instruction::clear_annotations);
    }
}
