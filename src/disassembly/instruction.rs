//! This module contains the definition of a decoded [`Instruction`], along
//! with the annotations that the abstract interpreter attaches to it.

use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::{opcode::Opcode, vm::value::known::KnownWord};

/// A single decoded instruction at a known position in the bytecode.
///
/// # Annotations
///
/// The `operands`, `result` and `resolved_targets` are empty after decoding,
/// and are filled in by [`crate::vm::VM`] as values become statically known.
/// An annotation that is [`None`] means nothing is known about that value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Instruction {
    /// The program counter of the opcode byte.
    pub pc: u32,

    /// The decoded opcode.
    pub opcode: Opcode,

    /// The immediate data of a `PUSH`, zero-padded on the right if the
    /// bytecode ended early.
    pub immediate: Option<KnownWord>,

    /// The number of immediate bytes that were actually present in the
    /// bytecode.
    pub immediate_len: usize,

    /// The statically known operands, where index 0 is the value that was on
    /// the top of the stack. This always has exactly
    /// [`Opcode::arg_count`] entries.
    pub operands: Vec<Option<KnownWord>>,

    /// The statically known result of the instruction.
    pub result: Option<KnownWord>,

    /// The jump targets that the interpreter proved for a `JUMP` or `JUMPI`.
    /// This is diagnostic only, and the authoritative record lives in the
    /// [`crate::disassembly::ContractInfo`].
    pub resolved_targets: Vec<u32>,
}

impl Instruction {
    /// Creates a new instruction without any known operands or result.
    #[must_use]
    pub fn new(pc: u32, opcode: Opcode) -> Self {
        Self {
            pc,
            opcode,
            immediate: None,
            immediate_len: 0,
            operands: vec![None; opcode.arg_count()],
            result: None,
            resolved_targets: Vec::new(),
        }
    }

    /// Creates a new `PUSH` instruction from its `immediate` bytes, which may
    /// be shorter than the push size if the bytecode was truncated.
    #[must_use]
    pub fn new_push(pc: u32, size: u8, immediate: &[u8]) -> Self {
        let mut buffer = immediate.to_vec();
        buffer.resize(size as usize, 0);

        let mut instruction = Self::new(pc, Opcode::Push(size));
        instruction.immediate = Some(KnownWord::from_be_slice(&buffer));
        instruction.immediate_len = immediate.len();
        instruction
    }

    /// Gets the number of bytes the instruction occupied in the decoded
    /// bytecode.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.opcode.immediate_size()
    }

    /// Gets the program counter of the byte after this instruction's
    /// immediate, counting the immediate at its declared size.
    #[must_use]
    pub fn next_pc(&self) -> u32 {
        self.pc.saturating_add(u32::try_from(self.len()).unwrap_or(u32::MAX))
    }

    /// Re-encodes the instruction to the bytes it was decoded from.
    ///
    /// The padding of a truncated immediate is not emitted, so concatenating
    /// the encodings of a decoded stream reproduces its input exactly.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = vec![self.opcode.as_byte()];
        if let Some(immediate) = self.immediate {
            let size = self.opcode.immediate_size();
            let word = immediate.bytes_be();
            let start = word.len() - size;
            bytes.extend_from_slice(&word[start..start + self.immediate_len.min(size)]);
        }
        bytes
    }

    /// Clears everything that the interpreter has learned about this
    /// instruction.
    pub fn clear_annotations(&mut self) {
        self.operands.iter_mut().for_each(|operand| *operand = None);
        self.result = None;
        self.resolved_targets.clear();
    }

    /// Gets the known operands if every one of them is known.
    #[must_use]
    pub fn known_operands(&self) -> Option<Vec<KnownWord>> {
        self.operands.iter().copied().collect()
    }
}

/// Displays the instruction as `pc: MNEMONIC immediate`, followed by whatever
/// is known about its operands and result.
impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#06x}: {}", self.pc, self.opcode)?;
        if let Some(immediate) = self.immediate {
            write!(f, " {immediate}")?;
        }
        if self.operands.iter().any(Option::is_some) {
            let operands = self
                .operands
                .iter()
                .map(|operand| operand.map_or_else(|| "⊤".to_string(), |w| w.to_string()))
                .join(", ");
            write!(f, " [{operands}]")?;
        }
        if let Some(result) = self.result {
            write!(f, " => {result}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{
        disassembly::instruction::Instruction,
        opcode::Opcode,
        vm::value::known::KnownWord,
    };

    #[test]
    fn new_instructions_have_one_slot_per_operand() {
        assert_eq!(Instruction::new(0, Opcode::Add).operands.len(), 2);
        assert_eq!(Instruction::new(0, Opcode::Call).operands.len(), 7);
        assert!(Instruction::new(0, Opcode::JumpDest).operands.is_empty());
    }

    #[test]
    fn truncated_push_is_padded_on_the_right() {
        let instruction = Instruction::new_push(3, 2, &[0x12]);

        assert_eq!(instruction.immediate, Some(KnownWord::from(0x1200u32)));
        assert_eq!(instruction.len(), 3);
        assert_eq!(instruction.next_pc(), 6);
        assert_eq!(instruction.encode(), vec![0x61, 0x12]);
    }

    #[test]
    fn complete_push_encodes_its_immediate() {
        let instruction = Instruction::new_push(0, 2, &[0x00, 0x01]);
        assert_eq!(instruction.encode(), vec![0x61, 0x00, 0x01]);
    }

    #[test]
    fn push0_has_a_zero_immediate() {
        let instruction = Instruction::new_push(0, 0, &[]);

        assert_eq!(instruction.immediate, Some(KnownWord::zero()));
        assert_eq!(instruction.encode(), vec![0x5f]);
    }

    #[test]
    fn displays_known_facts() {
        let mut instruction = Instruction::new(4, Opcode::Add);
        instruction.operands[0] = Some(KnownWord::from(2u32));
        instruction.result = None;

        assert_eq!(instruction.to_string(), "0x0004: ADD [0x2, ⊤]");

        instruction.operands[1] = Some(KnownWord::from(1u32));
        instruction.result = Some(KnownWord::from(3u32));
        assert_eq!(instruction.to_string(), "0x0004: ADD [0x2, 0x1] => 0x3");
    }

    #[test]
    fn can_clear_annotations() {
        let mut instruction = Instruction::new(0, Opcode::Jump);
        instruction.operands[0] = Some(KnownWord::one());
        instruction.resolved_targets.push(1);
        instruction.clear_annotations();

        assert_eq!(instruction, Instruction::new(0, Opcode::Jump));
    }
}
