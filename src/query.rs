//! This module contains [`Facts`], the read-only query interface over the
//! results of analyzing any number of contracts.
//!
//! Every query returns a possibly-empty collection. An empty collection means
//! that nothing is known, including when the contract or instruction asked
//! about does not exist. The only [`Err`] is for asking an instruction for a
//! different number of operands than it takes.

use std::collections::BTreeMap;

use num_bigint::BigUint;

use crate::{
    analyzer::{self, state::InterpretationComplete, Analyzer},
    contract::Contract,
    disassembly::{self, Instruction},
    error::{
        self,
        container::Locatable,
        query::{Error, Result},
    },
    opcode::Opcode,
    vm::{self, value::known::KnownWord},
};

/// The facts learned about a set of analyzed contracts, keyed by contract id.
#[derive(Clone, Debug, Default)]
pub struct Facts {
    contracts: BTreeMap<BigUint, InterpretationComplete>,
}

impl Facts {
    /// Creates a new, empty, set of facts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the results of a completed analysis, replacing any earlier results
    /// for a contract with the same id.
    pub fn add(&mut self, analyzer: Analyzer<InterpretationComplete>) {
        let (contract, state) = analyzer.into_parts();
        if self.contracts.insert(contract.id().clone(), state).is_some() {
            tracing::debug!(contract = %contract.id(), "Replaced facts for contract");
        }
    }

    /// Analyzes `contract` and adds the results.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the analysis fails, in which case no facts are added
    /// for the contract.
    pub fn analyze(
        &mut self,
        contract: Contract,
        disassembly_config: disassembly::Config,
        vm_config: vm::Config,
    ) -> error::Result<()> {
        let analyzer = analyzer::new(contract).analyze(disassembly_config, vm_config)?;
        self.add(analyzer);
        Ok(())
    }

    /// Gets the analysis results for the contract with `id`.
    #[must_use]
    pub fn get(&self, id: &BigUint) -> Option<&InterpretationComplete> {
        self.contracts.get(id)
    }

    /// Gets the ids of every analyzed contract, in ascending order.
    #[must_use]
    pub fn contracts(&self) -> Vec<BigUint> {
        self.contracts.keys().cloned().collect()
    }

    /// Gets the program counter of every instruction in the contract, or
    /// nothing if no contract with `id` has been analyzed.
    #[must_use]
    pub fn pcs(&self, id: &BigUint) -> Vec<u32> {
        self.contracts
            .get(id)
            .map(|contract| contract.info.instructions().map(|i| i.pc).collect())
            .unwrap_or_default()
    }

    /// Gets the program counter of every instruction in the contract with the
    /// given `opcode`.
    #[must_use]
    pub fn pcs_with_opcode(&self, id: &BigUint, opcode: Opcode) -> Vec<u32> {
        self.contracts
            .get(id)
            .map(|contract| {
                contract
                    .info
                    .instructions()
                    .filter(|i| i.opcode == opcode)
                    .map(|i| i.pc)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Gets the operands of the instruction at `pc` if all `arity` of them are
    /// statically known.
    ///
    /// The result has at most one entry, and is empty if there is no such
    /// contract or instruction.
    ///
    /// # Errors
    ///
    /// If `arity` is not the number of operands that the instruction takes.
    pub fn operands(&self, id: &BigUint, pc: u32, arity: usize) -> Result<Vec<Vec<BigUint>>> {
        let Some(instruction) = self.instruction(id, pc) else {
            return Ok(vec![]);
        };
        let expected = instruction.opcode.arg_count();
        if arity != expected {
            return Err(Error::ArityMismatch {
                opcode: instruction.opcode,
                requested: arity,
                expected,
            }
            .locate(pc));
        }

        Ok(instruction
            .known_operands()
            .map(|words| words.into_iter().map(to_biguint).collect())
            .into_iter()
            .collect())
    }

    /// Gets a single empty tuple if the instruction at `pc` takes no operands.
    ///
    /// # Errors
    ///
    /// As for [`Self::operands`].
    pub fn nullary(&self, id: &BigUint, pc: u32) -> Result<Vec<()>> {
        Ok(self.operands(id, pc, 0)?.into_iter().map(|_| ()).collect())
    }

    /// Gets the operand of a one-operand instruction if it is known.
    ///
    /// # Errors
    ///
    /// As for [`Self::operands`].
    pub fn unary(&self, id: &BigUint, pc: u32) -> Result<Vec<BigUint>> {
        Ok(self
            .operands(id, pc, 1)?
            .into_iter()
            .filter_map(|ops| ops.into_iter().next())
            .collect())
    }

    /// Gets the operands of a two-operand instruction if both are known, with
    /// the value from the top of the stack first.
    ///
    /// # Errors
    ///
    /// As for [`Self::operands`].
    pub fn binary(&self, id: &BigUint, pc: u32) -> Result<Vec<(BigUint, BigUint)>> {
        Ok(self
            .operands(id, pc, 2)?
            .into_iter()
            .filter_map(|ops| {
                let mut ops = ops.into_iter();
                Some((ops.next()?, ops.next()?))
            })
            .collect())
    }

    /// Gets the operands of a three-operand instruction if all are known, with
    /// the value from the top of the stack first.
    ///
    /// # Errors
    ///
    /// As for [`Self::operands`].
    pub fn ternary(&self, id: &BigUint, pc: u32) -> Result<Vec<(BigUint, BigUint, BigUint)>> {
        Ok(self
            .operands(id, pc, 3)?
            .into_iter()
            .filter_map(|ops| {
                let mut ops = ops.into_iter();
                Some((ops.next()?, ops.next()?, ops.next()?))
            })
            .collect())
    }

    /// Gets the operand at `index` of the instruction at `pc` if it is known,
    /// regardless of whether the other operands are.
    ///
    /// # Errors
    ///
    /// If the instruction exists but has no operand at `index`.
    pub fn operand_at(&self, id: &BigUint, pc: u32, index: usize) -> Result<Option<BigUint>> {
        let Some(instruction) = self.instruction(id, pc) else {
            return Ok(None);
        };
        let slot = instruction.operands.get(index).ok_or_else(|| {
            Error::ArityMismatch {
                opcode:    instruction.opcode,
                requested: index + 1,
                expected:  instruction.opcode.arg_count(),
            }
            .locate(pc)
        })?;

        Ok(slot.map(to_biguint))
    }

    /// Gets the result of the instruction at `pc` if it is known, paired with
    /// the number of values that the instruction pops from the stack.
    #[must_use]
    pub fn result(&self, id: &BigUint, pc: u32) -> Vec<(BigUint, usize)> {
        self.instruction(id, pc)
            .and_then(|instruction| {
                let pops = instruction.opcode.arg_count();
                instruction.result.map(|word| (to_biguint(word), pops))
            })
            .into_iter()
            .collect()
    }

    /// Gets the possible targets of the jump at `pc`, in ascending order.
    ///
    /// Locations that do not hold a `JUMP` or `JUMPI` have no targets.
    #[must_use]
    pub fn jump_targets(&self, id: &BigUint, pc: u32) -> Vec<u32> {
        self.contracts
            .get(id)
            .filter(|contract| contract.info.instruction(pc).map_or(false, |i| i.opcode.is_jump()))
            .and_then(|contract| contract.info.jump_targets(pc))
            .map(|targets| targets.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Gets the target of the jump at `pc` if it has exactly one.
    #[must_use]
    pub fn unique_jump(&self, id: &BigUint, pc: u32) -> Option<u32> {
        match self.jump_targets(id, pc).as_slice() {
            [target] => Some(*target),
            _ => None,
        }
    }

    /// Gets the program counter one past the end of the contract's
    /// instructions, if the contract has been analyzed.
    #[must_use]
    pub fn end_pc(&self, id: &BigUint) -> Option<u32> {
        self.contracts.get(id).map(|contract| contract.info.end_pc())
    }

    fn instruction(&self, id: &BigUint, pc: u32) -> Option<&Instruction> {
        self.contracts.get(id)?.info.instruction(pc)
    }
}

fn to_biguint(word: KnownWord) -> BigUint {
    BigUint::from_bytes_be(&word.bytes_be())
}
