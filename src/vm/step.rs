//! This module contains the [`Step`], the context through which the transfer
//! function of each opcode reads and updates the interpreter.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    disassembly::Instruction,
    hash::Hasher,
    opcode::Opcode,
    vm::{state::VMState, value::AbstractValue, Config},
};

/// Everything that the transfer function of a single instruction may touch.
///
/// Values popped through [`Step::pop_operands`] and [`Step::pop_all`] are
/// recorded as the instruction's operands, and values pushed through
/// [`Step::push_result`] are recorded as its result, whenever they are known.
#[derive(Debug)]
pub struct Step<'a> {
    /// The abstract machine state before the instruction.
    pub state: &'a mut VMState,

    /// The instruction being executed.
    pub instruction: &'a mut Instruction,

    /// The valid jump destinations of the contract.
    pub jump_destinations: &'a BTreeSet<u32>,

    /// The possible targets of each jump in the contract.
    pub jumps: &'a mut BTreeMap<u32, BTreeSet<u32>>,

    /// The hash function used for `SHA3`.
    pub hasher: &'a dyn Hasher,

    /// The interpreter configuration.
    pub config: &'a Config,
}

impl<'a> Step<'a> {
    /// Gets the program counter of the instruction.
    #[must_use]
    pub fn pc(&self) -> u32 {
        self.instruction.pc
    }

    /// Gets the opcode of the instruction.
    #[must_use]
    pub fn opcode(&self) -> Opcode {
        self.instruction.opcode
    }

    /// Pops a single value, warning if the stack had no known frames left.
    pub fn pop(&mut self) -> AbstractValue {
        if self.state.stack.is_empty() {
            tracing::warn!(
                pc = self.pc(),
                opcode = %self.opcode(),
                "Stack underflow, assuming an unknown value"
            );
        }
        self.state.stack.pop()
    }

    /// Pops `N` values, top of stack first, recording the known ones as the
    /// instruction's first `N` operands.
    pub fn pop_operands<const N: usize>(&mut self) -> [AbstractValue; N] {
        let values: [AbstractValue; N] = std::array::from_fn(|_| self.pop());
        self.record_operands(&values);
        values
    }

    /// Pops as many values as the opcode consumes, recording the known ones as
    /// operands.
    pub fn pop_all(&mut self) -> Vec<AbstractValue> {
        let values: Vec<AbstractValue> = (0..self.opcode().arg_count()).map(|_| self.pop()).collect();
        self.record_operands(&values);
        values
    }

    /// Pushes `value`, recording it as the instruction's result if it is known.
    pub fn push_result(&mut self, value: AbstractValue) {
        self.instruction.result = value.concrete();
        self.state.stack.push(value);
    }

    /// Executes the instruction as an opaque operation, consuming its operands
    /// and producing only unknown values.
    pub fn havoc(&mut self) {
        self.pop_all();
        for _ in 0..self.opcode().push_count() {
            self.state.stack.push(AbstractValue::Top);
        }
    }

    /// Records the known `values` in the corresponding operand slots.
    fn record_operands(&mut self, values: &[AbstractValue]) {
        for (slot, value) in self.instruction.operands.iter_mut().zip(values) {
            *slot = value.concrete();
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use std::collections::{BTreeMap, BTreeSet};

    use crate::{
        disassembly::Instruction,
        hash::Keccak,
        opcode::Opcode,
        vm::{
            state::VMState,
            step::Step,
            value::{known::KnownWord, AbstractValue},
            Config,
        },
    };

    /// The context needed to execute single instructions in tests.
    #[derive(Debug, Default)]
    pub struct Harness {
        pub state:             VMState,
        pub jump_destinations: BTreeSet<u32>,
        pub jumps:             BTreeMap<u32, BTreeSet<u32>>,
        pub config:            Config,
    }

    impl Harness {
        /// Creates a harness whose stack holds `values`, with the first on top.
        pub fn with_stack(values: &[AbstractValue]) -> Self {
            let mut harness = Self::default();
            for value in values.iter().rev() {
                harness.state.stack.push(*value);
            }
            harness
        }

        /// Executes `instruction` through `transfer`.
        pub fn run(&mut self, instruction: &mut Instruction, transfer: fn(&mut Step<'_>)) {
            let mut step = Step {
                state:             &mut self.state,
                instruction,
                jump_destinations: &self.jump_destinations,
                jumps:             &mut self.jumps,
                hasher:            &Keccak,
                config:            &self.config,
            };
            transfer(&mut step);
        }
    }

    /// Creates a known value for testing.
    pub fn known(value: u32) -> AbstractValue {
        AbstractValue::from(KnownWord::from(value))
    }

    #[test]
    fn pop_operands_records_known_values() {
        let mut harness = Harness::with_stack(&[known(1), AbstractValue::Top]);
        let mut instruction = Instruction::new(0, Opcode::Add);
        harness.run(&mut instruction, |step| {
            let [x, y] = step.pop_operands::<2>();
            assert_eq!(x, known(1));
            assert!(y.is_top());
        });

        assert_eq!(instruction.operands, vec![Some(KnownWord::from(1u32)), None]);
    }

    #[test]
    fn havoc_pushes_unknown_results() {
        let mut harness = Harness::with_stack(&[known(1)]);
        let mut instruction = Instruction::new(0, Opcode::Balance);
        harness.run(&mut instruction, |step| step.havoc());

        assert_eq!(harness.state.stack.depth(), 1);
        assert!(harness.state.stack.read(0).is_top());
        assert_eq!(instruction.operands, vec![Some(KnownWord::from(1u32))]);
        assert_eq!(instruction.result, None);
    }

    #[test]
    fn popping_empty_stack_gives_top() {
        let mut harness = Harness::default();
        let mut instruction = Instruction::new(0, Opcode::Pop);
        harness.run(&mut instruction, |step| {
            assert!(step.pop().is_top());
        });
    }
}
