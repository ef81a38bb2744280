//! This module contains the [`BasicBlock`] and the partitioning of a
//! contract's instructions into blocks.

use crate::{
    disassembly::{ContractInfo, Instruction},
    opcode::Opcode,
};

/// A straight-line run of instructions with a single entry point.
///
/// Blocks are numbered by their position in the sequence returned from
/// [`partition`], and that number is also the block's vertex in the
/// [`super::ControlFlowGraph`].
///
/// A block may be empty, which happens when a `JUMPDEST` directly follows a
/// terminating opcode. Empty blocks have no address range and take no part in
/// control flow.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BasicBlock {
    /// The position of the block in the partition.
    pub index: usize,

    /// The program counters of the instructions in the block, in order.
    pub pcs: Vec<u32>,

    /// The program counter one past the end of the block's last instruction.
    pub end: u32,

    /// The opcode of the block's last instruction.
    pub last_opcode: Option<Opcode>,
}

impl BasicBlock {
    /// Creates a new, empty block at `index`.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    /// Appends `instruction` to the end of the block.
    pub fn push(&mut self, instruction: &Instruction) {
        self.pcs.push(instruction.pc);
        self.end = instruction.next_pc();
        self.last_opcode = Some(instruction.opcode);
    }

    /// Gets the program counter of the first instruction in the block.
    #[must_use]
    pub fn start(&self) -> Option<u32> {
        self.pcs.first().copied()
    }

    /// Gets the program counter of the last instruction in the block.
    #[must_use]
    pub fn last_pc(&self) -> Option<u32> {
        self.pcs.last().copied()
    }

    /// Checks if `pc` lies within the address range of the block.
    #[must_use]
    pub fn contains(&self, pc: u32) -> bool {
        self.start().map_or(false, |start| start <= pc && pc < self.end)
    }

    /// Gets the number of instructions in the block.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pcs.len()
    }

    /// Checks if the block has no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pcs.is_empty()
    }

    /// Checks if the block ends in a `JUMP` or `JUMPI`.
    #[must_use]
    pub fn ends_in_jump(&self) -> bool {
        self.last_opcode.map_or(false, Opcode::is_jump)
    }

    /// Checks if control can continue into the block that follows this one by
    /// address.
    #[must_use]
    pub fn falls_through(&self) -> bool {
        self.last_opcode.map_or(false, Opcode::can_fall_through)
    }
}

/// Partitions the instructions of `info` into basic blocks in program counter
/// order.
///
/// A block ends after any block-terminating opcode, and before any
/// `JUMPDEST`, so every `JUMPDEST` starts exactly one block. The block that is
/// open at the end of the instructions is always kept, even if it is empty.
#[must_use]
pub fn partition(info: &ContractInfo) -> Vec<BasicBlock> {
    let mut blocks = Vec::new();
    let mut current = BasicBlock::new(0);

    for instruction in info.instructions() {
        if instruction.opcode == Opcode::JumpDest {
            let next = BasicBlock::new(current.index + 1);
            blocks.push(std::mem::replace(&mut current, next));
        }

        current.push(instruction);

        if instruction.opcode.is_block_terminator() {
            let next = BasicBlock::new(current.index + 1);
            blocks.push(std::mem::replace(&mut current, next));
        }
    }
    blocks.push(current);

    tracing::debug!(blocks = blocks.len(), "Partitioned instructions into blocks");
    blocks
}

/// Finds the non-empty block whose address range contains `pc`.
#[must_use]
pub fn block_containing(blocks: &[BasicBlock], pc: u32) -> Option<&BasicBlock> {
    blocks.iter().find(|block| block.contains(pc))
}
