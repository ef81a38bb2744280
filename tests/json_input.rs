//! This module is an integration test that analyzes contracts described as
//! JSON, as they are handed over by the tooling that drives the library.
#![cfg(test)]

use std::path::PathBuf;

use evm_fact_extractor::{contract::Contract, error::input, query::Facts, vm};
use num_bigint::BigUint;

mod common;

/// Writes `contents` to a file unique to the test `name`, returning its path.
fn write_temp(name: &str, contents: &str) -> anyhow::Result<PathBuf> {
    let path = std::env::temp_dir().join(format!(
        "evm-fact-extractor-{name}-{}.json",
        std::process::id()
    ));
    std::fs::write(&path, contents)?;
    Ok(path)
}

#[test]
fn analyzes_contract_from_json_file() -> anyhow::Result<()> {
    let json = r#"{ "bytecode": "0x6001600201", "address": "0x00ff" }"#;
    let path = write_temp("simple", json)?;

    let contract = Contract::from_json_file(&path)?;
    std::fs::remove_file(&path)?;

    let mut facts = Facts::new();
    facts.analyze(contract, common::no_metadata(), vm::Config::default())?;

    let id = BigUint::from(0xff_u32);
    assert_eq!(facts.contracts(), vec![id.clone()]);
    assert_eq!(facts.result(&id, 4), vec![(BigUint::from(3u32), 2)]);

    Ok(())
}

#[test]
fn explicit_jumps_replace_inferred_jumps() -> anyhow::Result<()> {
    // CALLVALUE; JUMP; JUMPDEST; STOP; JUMPDEST; STOP
    let json = r#"{
        "bytecode": "34565b005b00",
        "address": "0x1",
        "jumpDestinations": { "1": [4] }
    }"#;

    let mut facts = Facts::new();
    facts.analyze(
        Contract::from_json_str(json)?,
        common::no_metadata(),
        vm::Config::default(),
    )?;

    let id = BigUint::from(1u32);
    assert_eq!(facts.jump_targets(&id, 1), vec![4]);
    assert_eq!(facts.unique_jump(&id, 1), Some(4));

    Ok(())
}

#[test]
fn unlisted_jump_sites_have_no_targets() -> anyhow::Result<()> {
    // JUMPDEST; PUSH1 1; PUSH1 0; JUMPI
    let json = r#"{ "bytecode": "5b6001600057", "address": "0x2", "jumpDestinations": {} }"#;

    let mut facts = Facts::new();
    facts.analyze(
        Contract::from_json_str(json)?,
        common::no_metadata(),
        vm::Config::default(),
    )?;

    assert!(facts.jump_targets(&BigUint::from(2u32), 5).is_empty());

    Ok(())
}

#[test]
fn keeps_contracts_apart() -> anyhow::Result<()> {
    let mut facts = Facts::new();
    for (address, code) in [("0xa", "6000"), ("0xb", "60016002")] {
        let json = format!(r#"{{ "bytecode": "{code}", "address": "{address}" }}"#);
        facts.analyze(
            Contract::from_json_str(&json)?,
            common::no_metadata(),
            vm::Config::default(),
        )?;
    }

    assert_eq!(
        facts.contracts(),
        vec![BigUint::from(0xa_u32), BigUint::from(0xb_u32)]
    );
    assert_eq!(facts.end_pc(&BigUint::from(0xa_u32)), Some(2));
    assert_eq!(facts.end_pc(&BigUint::from(0xb_u32)), Some(4));

    Ok(())
}

#[test]
fn malformed_descriptions_are_rejected() {
    assert!(matches!(
        Contract::from_json_str("not json"),
        Err(input::Error::Json(_))
    ));
    assert_eq!(
        Contract::from_json_str(r#"{ "bytecode": "0x6", "address": "0x1" }"#),
        Err(input::Error::InvalidHexLength)
    );
}
