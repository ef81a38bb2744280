//! This module contains the abstract interpreter that computes which values in
//! a contract are statically known.

pub mod state;
pub mod step;
pub mod value;

use crate::{
    cfg::{BasicBlock, ControlFlowGraph, DirectedGraph},
    constant::DEFAULT_MAX_HASHED_BYTES,
    disassembly::ContractInfo,
    error::{
        container::Locatable,
        execution::{Error, Result},
    },
    hash::{Hasher, Keccak},
    opcode::{arithmetic, control, environment, logic, memory, Opcode},
    vm::{state::VMState, step::Step},
};

/// The abstract interpreter for EVM bytecode.
///
/// It executes the instructions of a contract over the two-point
/// [`value::AbstractValue`] lattice, annotating each
/// [`crate::disassembly::Instruction`] with the operands and result that are
/// statically known, and narrowing the targets of jumps whose destination is
/// known.
///
/// The interpreter is stateless between calls to [`VM::execute`], so a single
/// instance can be used for any number of contracts.
#[derive(Debug)]
pub struct VM {
    /// The configuration of the interpreter.
    config: Config,

    /// The hash function used to evaluate `SHA3`.
    hasher: Box<dyn Hasher>,
}

impl VM {
    /// Constructs a new interpreter with the provided `config`, hashing with
    /// Keccak-256.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_hasher(config, Box::new(Keccak))
    }

    /// Constructs a new interpreter that evaluates `SHA3` using `hasher`.
    #[must_use]
    pub fn with_hasher(config: Config, hasher: Box<dyn Hasher>) -> Self {
        Self { config, hasher }
    }

    /// Gets the configuration of the interpreter.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Executes the instructions of `info`, which have been partitioned into
    /// `blocks` with control flow between them described by `cfg`.
    ///
    /// Any annotations from a previous execution are discarded first, so the
    /// result depends only on the inputs. The narrowing of jumps is not
    /// undone, however, as it only ever removes targets that are impossible.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if `cfg` was built over a different number of blocks
    /// than it is given, or if a block refers to an instruction that `info`
    /// does not have.
    pub fn execute<G>(
        &self,
        info: &mut ContractInfo,
        blocks: &[BasicBlock],
        cfg: &ControlFlowGraph<G>,
    ) -> Result<ExecutionResult>
    where
        G: DirectedGraph,
    {
        if cfg.block_count() != blocks.len() {
            let block = cfg.block_count().min(blocks.len());
            return Err(Error::NoSuchBlock { block }.locate(0));
        }

        info.clear_annotations();

        let result = match self.config.mode {
            InterpretationMode::BlockLocal => self.execute_block_local(info, blocks)?,
            InterpretationMode::Topological => match cfg.topological_order() {
                Some(order) => self.execute_topological(info, blocks, cfg, &order)?,
                None => {
                    tracing::warn!(
                        "Control-flow graph has a cycle, falling back to block-local interpretation"
                    );
                    self.execute_block_local(info, blocks)?
                }
            },
        };

        tracing::debug!(
            mode = ?result.mode,
            blocks = result.blocks_executed,
            instructions = info.len(),
            "Finished abstract interpretation"
        );

        Ok(result)
    }

    /// Executes every block from a state in which nothing is known.
    fn execute_block_local(
        &self,
        info: &mut ContractInfo,
        blocks: &[BasicBlock],
    ) -> Result<ExecutionResult> {
        for block in blocks {
            let mut state = VMState::new();
            self.run_block(info, block, &mut state)?;
        }

        Ok(ExecutionResult {
            mode:            InterpretationMode::BlockLocal,
            blocks_executed: blocks.len(),
        })
    }

    /// Executes the blocks in topological `order`, entering each block with
    /// the join of the states its predecessors exit with.
    fn execute_topological<G>(
        &self,
        info: &mut ContractInfo,
        blocks: &[BasicBlock],
        cfg: &ControlFlowGraph<G>,
        order: &[usize],
    ) -> Result<ExecutionResult>
    where
        G: DirectedGraph,
    {
        let mut exits: Vec<Option<VMState>> = vec![None; blocks.len()];

        for index in order {
            let block = blocks
                .get(*index)
                .ok_or_else(|| Error::NoSuchBlock { block: *index }.locate(0))?;

            let mut state = cfg
                .predecessors(*index)
                .into_iter()
                .filter_map(|(predecessor, _)| exits.get(predecessor).and_then(Option::as_ref))
                .fold(None, |joined: Option<VMState>, exit| {
                    Some(joined.map_or_else(|| exit.clone(), |state| state.join(exit)))
                })
                .unwrap_or_default();

            self.run_block(info, block, &mut state)?;
            exits[*index] = Some(state);
        }

        Ok(ExecutionResult {
            mode:            InterpretationMode::Topological,
            blocks_executed: order.len(),
        })
    }

    /// Executes the instructions of `block` in order, starting from `state`.
    fn run_block(
        &self,
        info: &mut ContractInfo,
        block: &BasicBlock,
        state: &mut VMState,
    ) -> Result<()> {
        let ContractInfo {
            instructions,
            jump_destinations,
            jumps,
        } = info;

        for pc in &block.pcs {
            let instruction = instructions
                .get_mut(pc)
                .ok_or_else(|| Error::NoSuchInstruction { block: block.index }.locate(*pc))?;
            let transfer = transfer_for(instruction.opcode);

            let mut step = Step {
                state: &mut *state,
                instruction,
                jump_destinations: &*jump_destinations,
                jumps: &mut *jumps,
                hasher: self.hasher.as_ref(),
                config: &self.config,
            };
            transfer(&mut step);
            tracing::trace!(
                instruction = %step.instruction,
                depth = step.state.stack.depth(),
                "Executed instruction"
            );
        }

        Ok(())
    }
}

/// Selects the transfer function for `opcode` by its class.
fn transfer_for(opcode: Opcode) -> fn(&mut Step<'_>) {
    match opcode {
        Opcode::Add
        | Opcode::Mul
        | Opcode::Sub
        | Opcode::Div
        | Opcode::SDiv
        | Opcode::Mod
        | Opcode::SMod
        | Opcode::AddMod
        | Opcode::MulMod
        | Opcode::Exp
        | Opcode::SignExtend => arithmetic::transfer,
        Opcode::Lt
        | Opcode::Gt
        | Opcode::SLt
        | Opcode::SGt
        | Opcode::Eq
        | Opcode::IsZero
        | Opcode::And
        | Opcode::Or
        | Opcode::Xor
        | Opcode::Not
        | Opcode::Byte
        | Opcode::Shl
        | Opcode::Shr
        | Opcode::Sar => logic::transfer,
        Opcode::Sha3
        | Opcode::Address
        | Opcode::Balance
        | Opcode::Origin
        | Opcode::Caller
        | Opcode::CallValue
        | Opcode::CallDataLoad
        | Opcode::CallDataSize
        | Opcode::CodeSize
        | Opcode::GasPrice
        | Opcode::ExtCodeSize
        | Opcode::ReturnDataSize
        | Opcode::ExtCodeHash
        | Opcode::BlockHash
        | Opcode::Coinbase
        | Opcode::Timestamp
        | Opcode::Number
        | Opcode::Difficulty
        | Opcode::GasLimit
        | Opcode::ChainId
        | Opcode::SelfBalance
        | Opcode::BaseFee
        | Opcode::BlobHash
        | Opcode::BlobBaseFee
        | Opcode::Pc
        | Opcode::MSize
        | Opcode::Gas => environment::transfer,
        Opcode::Pop
        | Opcode::MLoad
        | Opcode::MStore
        | Opcode::MStore8
        | Opcode::SLoad
        | Opcode::SStore
        | Opcode::TLoad
        | Opcode::TStore
        | Opcode::MCopy
        | Opcode::CallDataCopy
        | Opcode::CodeCopy
        | Opcode::ReturnDataCopy
        | Opcode::ExtCodeCopy
        | Opcode::Push(_)
        | Opcode::Dup(_)
        | Opcode::Swap(_)
        | Opcode::Log(_) => memory::transfer,
        Opcode::Stop
        | Opcode::Jump
        | Opcode::JumpI
        | Opcode::JumpDest
        | Opcode::Create
        | Opcode::Call
        | Opcode::CallCode
        | Opcode::Return
        | Opcode::DelegateCall
        | Opcode::Create2
        | Opcode::StaticCall
        | Opcode::Revert
        | Opcode::Invalid
        | Opcode::SelfDestruct => control::transfer,
    }
}

/// The order in which the interpreter visits blocks, and hence the state that
/// each block starts from.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum InterpretationMode {
    /// Every block is executed from a state in which nothing is known.
    ///
    /// This is sound for any control-flow graph, including cyclic ones.
    #[default]
    BlockLocal,

    /// Blocks are executed in topological order of the control-flow graph,
    /// each starting from the join of its predecessors' final states.
    ///
    /// Cyclic graphs have no topological order, and are interpreted
    /// block-locally instead.
    Topological,
}

/// A summary of a completed execution.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExecutionResult {
    /// The mode that was actually used, which differs from the configured
    /// mode when a topological order did not exist.
    pub mode: InterpretationMode,

    /// The number of blocks that were executed.
    pub blocks_executed: usize,
}

/// The configuration for the abstract interpreter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// The order in which blocks are interpreted.
    ///
    /// Defaults to [`InterpretationMode::BlockLocal`].
    pub mode: InterpretationMode,

    /// The longest memory range, in bytes, that `SHA3` will hash. Longer
    /// ranges produce an unknown result.
    ///
    /// Defaults to [`DEFAULT_MAX_HASHED_BYTES`].
    pub max_hashed_bytes: usize,
}

impl Config {
    /// Sets the `mode` config parameter to `value`.
    #[must_use]
    pub fn with_mode(mut self, value: InterpretationMode) -> Self {
        self.mode = value;
        self
    }

    /// Sets the `max_hashed_bytes` config parameter to `value`.
    #[must_use]
    pub fn with_max_hashed_bytes(mut self, value: usize) -> Self {
        self.max_hashed_bytes = value;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode:             InterpretationMode::default(),
            max_hashed_bytes: DEFAULT_MAX_HASHED_BYTES,
        }
    }
}
