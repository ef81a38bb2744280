//! This library implements a static analysis of [EVM](https://ethereum.org/en/developers/docs/evm/)
//! bytecode that extracts facts about each instruction: the operands and
//! results that are known without running the contract, and the possible
//! targets of every jump. It is a _best effort_ analysis, and anything it
//! cannot determine is simply not reported.
//!
//! Note that this library is not intended to be nor expected to evolve into a
//! full decompiler for EVM bytecode.
//!
//! # How it Works
//!
//! From a very high level, fact extraction is performed as follows:
//!
//! 1. Bytecode is ingested as a [`contract::Contract`], any trailing compiler
//!    metadata is stripped, and the remainder is decoded into a
//!    [`disassembly::ContractInfo`] holding every [`opcode::Opcode`].
//! 2. The instructions are partitioned into [`cfg::BasicBlock`]s, which are
//!    joined into a [`cfg::ControlFlowGraph`] using a conservative estimate of
//!    where each jump may go.
//! 3. The blocks are interpreted on the abstract [`vm::VM`], where every
//!    value is either a concrete 256-bit word or unknown. Operands and results
//!    that are known are recorded on each instruction, and jumps whose target
//!    is known have their targets narrowed.
//! 4. The results are gathered into [`query::Facts`], which answers questions
//!    about any number of analyzed contracts.
//!
//! # Basic Usage
//!
//! For the most basic usage of the library, it is sufficient to construct an
//! `Analyzer` and call the `.analyze` method, passing your configuration.
//!
//! ```
//! use evm_fact_extractor as efe;
//! use evm_fact_extractor::{bytecode, contract::Contract, disassembly, opcode::Opcode, query::Facts, vm};
//! use num_bigint::BigUint;
//!
//! let bytes = bytecode![
//!     Opcode::JumpDest,          // The destination of the loop
//!     (Opcode::Push(1), [0x01]), // The condition of the jump
//!     (Opcode::Push(1), [0x00]), // The jump destination offset
//!     Opcode::JumpI,             // Jump back to the start if the condition holds
//! ];
//! let contract = Contract::new(1u32, bytes);
//!
//! let analyzer = efe::new(contract)
//!     .analyze(disassembly::Config::default(), vm::Config::default())
//!     .unwrap();
//!
//! let mut facts = Facts::new();
//! facts.add(analyzer);
//!
//! let id = BigUint::from(1u32);
//! assert_eq!(facts.unique_jump(&id, 5), Some(0));
//! ```

#![warn(clippy::all, clippy::cargo, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // Allows for better API naming

pub mod analyzer;
pub mod cfg;
pub mod constant;
pub mod contract;
pub mod disassembly;
pub mod error;
pub mod hash;
pub mod opcode;
pub mod query;
pub mod vm;

// Re-exports to provide the library interface.
pub use analyzer::new;
pub use query::Facts;
