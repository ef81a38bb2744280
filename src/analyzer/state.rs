//! This module contains the state tracking functionality for the analyzer.

use std::fmt::Debug;

use crate::{
    cfg::{BasicBlock, ControlFlowGraph},
    disassembly::ContractInfo,
    vm::ExecutionResult,
};

/// A marker trait that says that the type implementing it is an analyzer state.
pub trait State
where
    Self: Clone + Debug + Sized,
{
}

/// The initial state for the analyzer.
#[derive(Clone, Debug)]
pub struct HasContract;
impl State for HasContract {}

/// The analyzer has successfully disassembled the bytecode.
#[derive(Clone, Debug)]
pub struct DisassemblyComplete {
    /// The decoded instructions and jumps of the contract.
    pub info: ContractInfo,
}
impl State for DisassemblyComplete {}

/// The analyzer has split the instructions into basic blocks.
#[derive(Clone, Debug)]
pub struct Partitioned {
    pub info:   ContractInfo,
    pub blocks: Vec<BasicBlock>,
}
impl State for Partitioned {}

/// The analyzer has built the control-flow graph from the conservative jump
/// targets, and is ready to interpret the contract.
#[derive(Clone, Debug)]
pub struct CfgReady {
    pub info:   ContractInfo,
    pub blocks: Vec<BasicBlock>,
    pub cfg:    ControlFlowGraph,
}
impl State for CfgReady {}

/// The analyzer has interpreted the contract, and everything it learned is
/// available.
#[derive(Clone, Debug)]
pub struct InterpretationComplete {
    /// The instructions, annotated with their known operands and results, and
    /// the narrowed jumps.
    pub info: ContractInfo,

    /// The basic blocks of the contract.
    pub blocks: Vec<BasicBlock>,

    /// The control-flow graph, rebuilt from the narrowed jumps.
    pub cfg: ControlFlowGraph,

    /// The summary of the interpretation.
    pub execution_result: ExecutionResult,
}
impl State for InterpretationComplete {}
