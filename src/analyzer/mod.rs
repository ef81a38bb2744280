//! This module contains the definition of the analyzer itself.

pub mod state;

use crate::{
    analyzer::state::State,
    cfg::{self, ControlFlowGraph},
    contract::Contract,
    disassembly,
    error,
    vm::{self, VM},
};

/// Creates a new analyzer wrapping the provided `contract`.
#[must_use]
pub fn new(contract: Contract) -> Analyzer<state::HasContract> {
    let state = state::HasContract;
    Analyzer { contract, state }
}

/// The analysis session for a single contract, responsible for taking its
/// bytecode through decoding, partitioning, control-flow graph construction
/// and abstract interpretation.
///
/// # Basic Usage
///
/// For the most basic usage of the library, it is sufficient to construct an
/// `Analyzer` and call the `.analyze` method, passing your configuration.
///
/// ```
/// use evm_fact_extractor::{analyzer, contract::Contract, disassembly, vm};
///
/// let contract = Contract::from_hex(1u32, "6001600201").unwrap();
/// let analyzer = analyzer::new(contract)
///     .analyze(disassembly::Config::default(), vm::Config::default())
///     .unwrap();
///
/// let add = analyzer.state().info.instruction(4).unwrap();
/// assert_eq!(add.result, Some(3u32.into()));
/// ```
///
/// # Enforcing Valid State Transitions
///
/// The analyzer enforces that only correct state transitions can occur through
/// use of structs that implement the exact state required by it at any given
/// point.
///
/// There is the [`Self::state`] function that provides access to the state data
/// of whichever state it is in.
#[derive(Clone, Debug)]
pub struct Analyzer<S: State> {
    /// The contract that is being analyzed.
    contract: Contract,

    /// The internal state of the analyzer.
    state: S,
}

/// Safe operations available in all states.
impl<S: State> Analyzer<S> {
    /// Gets a reference to the contract being analyzed.
    #[must_use]
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Gets a reference to the current state of the analyzer.
    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Splits the analyzer into the contract and its current state.
    #[must_use]
    pub fn into_parts(self) -> (Contract, S) {
        (self.contract, self.state)
    }
}

/// Unsafe operations available in all states.
///
/// These operations are capable of **violating the state invariants** of the
/// analyzer, and must be used with the _utmost_ care.
impl<S: State> Analyzer<S> {
    /// Forces the analyzer into `new_state`, disregarding any safety with
    /// regards to state transitions.
    ///
    /// # Safety
    ///
    /// Do not force a state transition for the analyzer unless you totally
    /// understand the state that the analyzer is in, and the implications
    /// of doing so.
    pub unsafe fn set_state<NS: State>(self, new_state: NS) -> Analyzer<NS> {
        Analyzer {
            contract: self.contract,
            state:    new_state,
        }
    }

    /// Forces the analyzer into the state `NS`, with the value of the state
    /// created by applying `transform` to the analyzer's current state and
    /// disregarding any safety with regard to state transitions.
    ///
    /// # Safety
    ///
    /// Do not force a state transition for the analyzer unless you totally
    /// understand the state that the analyzer is in, and the implications
    /// of doing so.
    pub unsafe fn transform_state<NS: State>(
        self,
        transform: impl FnOnce(S) -> error::Result<NS>,
    ) -> error::Result<Analyzer<NS>> {
        let state = transform(self.state)?;
        let contract = self.contract;

        Ok(Analyzer { state, contract })
    }
}

/// Operations available on a newly-created analyzer.
impl Analyzer<state::HasContract> {
    /// Executes the analysis process for beginning to end, performing all the
    /// intermediate steps automatically.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if any step of the analysis fails.
    pub fn analyze(
        self,
        disassembly_config: disassembly::Config,
        vm_config: vm::Config,
    ) -> error::Result<Analyzer<state::InterpretationComplete>> {
        let analyzer = self.disassemble(disassembly_config)?;
        let analyzer = analyzer.partition();
        let analyzer = analyzer.build_cfg()?;
        let analyzer = analyzer.interpret(vm_config)?;

        tracing::debug!(
            contract = %analyzer.contract.id(),
            instructions = analyzer.state.info.len(),
            blocks = analyzer.state.blocks.len(),
            "Analyzed contract"
        );

        Ok(analyzer)
    }

    /// Decodes the bytecode of the contract into instructions, using `config`
    /// to control the decoder's behaviour.
    ///
    /// If the contract was supplied with explicit jump targets, they replace
    /// the conservative targets found by the decoder.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the bytecode cannot be decoded.
    pub fn disassemble(
        self,
        config: disassembly::Config,
    ) -> error::Result<Analyzer<state::DisassemblyComplete>> {
        let mut info = disassembly::disassemble(self.contract.bytecode(), &config)?;
        if let Some(jumps) = self.contract.jumps() {
            info.replace_jumps(jumps);
        }

        let state = state::DisassemblyComplete { info };
        Ok(unsafe { self.set_state(state) })
    }
}

/// Operations available on an analyzer that has completed the disassembly of
/// the bytecode.
impl Analyzer<state::DisassemblyComplete> {
    /// Partitions the decoded instructions into basic blocks.
    #[must_use]
    pub fn partition(self) -> Analyzer<state::Partitioned> {
        let blocks = cfg::partition(&self.state.info);
        let info = self.state.info;
        Analyzer {
            contract: self.contract,
            state:    state::Partitioned { info, blocks },
        }
    }
}

/// Operations available on an analyzer that has partitioned the instructions.
impl Analyzer<state::Partitioned> {
    /// Builds the control-flow graph over the basic blocks.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if a jump target lies outside every block.
    pub fn build_cfg(self) -> error::Result<Analyzer<state::CfgReady>> {
        unsafe {
            self.transform_state(|old_state| {
                let cfg = ControlFlowGraph::build(&old_state.info, &old_state.blocks)?;
                Ok(state::CfgReady {
                    info: old_state.info,
                    blocks: old_state.blocks,
                    cfg,
                })
            })
        }
    }
}

/// Operations available on an analyzer that has a control-flow graph ready to
/// interpret the bytecode against.
impl Analyzer<state::CfgReady> {
    /// Abstractly interprets the contract, using `config` to control the
    /// interpreter's behaviour.
    ///
    /// Interpretation may narrow the targets of jumps, so the control-flow
    /// graph is rebuilt afterwards to reflect them.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the interpreter is given inconsistent inputs, or if
    /// the rebuilt graph cannot be constructed.
    pub fn interpret(
        self,
        config: vm::Config,
    ) -> error::Result<Analyzer<state::InterpretationComplete>> {
        unsafe {
            self.transform_state(|mut old_state| {
                let vm = VM::new(config);
                let execution_result =
                    vm.execute(&mut old_state.info, &old_state.blocks, &old_state.cfg)?;
                let cfg = ControlFlowGraph::build(&old_state.info, &old_state.blocks)?;

                Ok(state::InterpretationComplete {
                    info: old_state.info,
                    blocks: old_state.blocks,
                    cfg,
                    execution_result,
                })
            })
        }
    }
}
