//! This module contains common utilities for simplifying the writing of
//! integration tests for this library.

#![cfg(test)]

use evm_fact_extractor as efe;
use evm_fact_extractor::{
    analyzer::{state::InterpretationComplete, Analyzer},
    contract::Contract,
    disassembly,
    query::Facts,
    vm,
};
use num_bigint::BigUint;

/// The id under which the helpers here register a single contract.
#[allow(unused)] // It is actually
pub const CONTRACT_ID: u32 = 1;

/// Gets the id of the contract registered by [`facts_for`] as a big integer.
#[allow(unused)] // It is actually
pub fn contract_id() -> BigUint {
    BigUint::from(CONTRACT_ID)
}

/// A disassembly configuration that leaves the bytecode untouched, so that
/// short hand-written programs are never mistaken for compiler metadata.
#[allow(unused)] // It is actually
pub fn no_metadata() -> disassembly::Config {
    disassembly::Config::default().with_strip_metadata(false)
}

/// Analyzes the hex-encoded (with or without the `0x` prefix) bytecode in
/// `code` with the provided interpreter configuration.
#[allow(unused)] // It is actually
pub fn analyze_with(code: &str, config: vm::Config) -> anyhow::Result<Analyzer<InterpretationComplete>> {
    let contract = Contract::from_hex(CONTRACT_ID, code)?;
    Ok(efe::new(contract).analyze(no_metadata(), config)?)
}

/// Analyzes the hex-encoded bytecode in `code` and registers the results
/// under [`CONTRACT_ID`].
///
/// It uses the default interpreter configuration.
#[allow(unused)] // It is actually
pub fn facts_for(code: &str) -> anyhow::Result<Facts> {
    facts_for_with(code, vm::Config::default())
}

/// Analyzes the hex-encoded bytecode in `code` with the interpreter
/// configuration `config` and registers the results under [`CONTRACT_ID`].
#[allow(unused)] // It is actually
pub fn facts_for_with(code: &str, config: vm::Config) -> anyhow::Result<Facts> {
    let mut facts = Facts::new();
    facts.add(analyze_with(code, config)?);
    Ok(facts)
}

/// Gets both interpreter configurations, so that a test can check a property
/// holds in each mode.
#[allow(unused)] // It is actually
pub fn both_modes() -> [vm::Config; 2] {
    [
        vm::Config::default().with_mode(vm::InterpretationMode::BlockLocal),
        vm::Config::default().with_mode(vm::InterpretationMode::Topological),
    ]
}
