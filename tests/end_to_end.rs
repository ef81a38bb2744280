//! This module is an integration test that runs small hand-assembled
//! contracts through the whole pipeline and inspects the facts it produces.
#![cfg(test)]

use evm_fact_extractor::{error::query::Error, opcode::Opcode, vm};
use num_bigint::BigUint;

mod common;

#[test]
fn reports_result_of_constant_addition() -> anyhow::Result<()> {
    // PUSH1 1; PUSH1 2; ADD
    let facts = common::facts_for("6001600201")?;
    let id = common::contract_id();

    assert_eq!(facts.result(&id, 4), vec![(BigUint::from(3u32), 2)]);
    assert_eq!(
        facts.binary(&id, 4)?,
        vec![(BigUint::from(2u32), BigUint::from(1u32))]
    );

    Ok(())
}

#[test]
fn end_pc_accounts_for_trailing_push() -> anyhow::Result<()> {
    // PUSH1 0
    let facts = common::facts_for("6000")?;
    assert_eq!(facts.end_pc(&common::contract_id()), Some(2));

    // PUSH2 with only one of its two immediate bytes present.
    let facts = common::facts_for("6100")?;
    assert_eq!(facts.end_pc(&common::contract_id()), Some(3));

    Ok(())
}

#[test]
fn resolves_loop_back_to_start() -> anyhow::Result<()> {
    // JUMPDEST; PUSH1 1; PUSH1 0; JUMPI
    for config in common::both_modes() {
        let facts = common::facts_for_with("5b6001600057", config)?;
        let id = common::contract_id();

        assert_eq!(facts.jump_targets(&id, 5), vec![0]);
        assert_eq!(facts.unique_jump(&id, 5), Some(0));
    }

    Ok(())
}

#[test]
fn eliminates_target_that_is_not_a_jumpdest() -> anyhow::Result<()> {
    // PUSH1 1; PUSH1 9; JUMPI
    let facts = common::facts_for("6001600957")?;
    let id = common::contract_id();

    assert!(facts.jump_targets(&id, 4).is_empty());
    assert_eq!(facts.unique_jump(&id, 4), None);

    Ok(())
}

#[test]
fn unknown_jump_keeps_every_destination() -> anyhow::Result<()> {
    // CALLVALUE; JUMP; JUMPDEST; STOP; JUMPDEST; STOP
    let facts = common::facts_for("34565b005b00")?;
    let id = common::contract_id();

    assert_eq!(facts.jump_targets(&id, 1), vec![2, 4]);
    assert_eq!(facts.unique_jump(&id, 1), None);

    Ok(())
}

#[test]
fn topological_mode_sees_values_across_blocks() -> anyhow::Result<()> {
    // PUSH1 2; JUMPDEST; PUSH1 3; ADD; STOP
    let code = "60025b60030100";
    let id = common::contract_id();

    let block_local = common::facts_for(code)?;
    assert!(block_local.result(&id, 5).is_empty());
    assert_eq!(block_local.operand_at(&id, 5, 0)?, Some(BigUint::from(3u32)));
    assert_eq!(block_local.operand_at(&id, 5, 1)?, None);

    let config = vm::Config::default().with_mode(vm::InterpretationMode::Topological);
    let topological = common::facts_for_with(code, config)?;
    assert_eq!(topological.result(&id, 5), vec![(BigUint::from(5u32), 2)]);

    Ok(())
}

#[test]
fn topological_mode_joins_the_untaken_branch() -> anyhow::Result<()> {
    // 0: PUSH1 1; 2: CALLDATASIZE; 3: PUSH1 9; 5: JUMPI; 6: POP; 7: PUSH1 2;
    // 9: JUMPDEST; 10: PUSH1 0; 12: ADD; 13: STOP
    let code = "6001366009575060025b60000100";
    let id = common::contract_id();

    let config = vm::Config::default().with_mode(vm::InterpretationMode::Topological);
    let facts = common::facts_for_with(code, config)?;

    // The merge block is reached with 1 when the jump is taken and with 2
    // when it is not, so neither may be reported.
    assert_eq!(facts.operand_at(&id, 12, 0)?, Some(BigUint::from(0u32)));
    assert_eq!(facts.operand_at(&id, 12, 1)?, None);
    assert!(facts.result(&id, 12).is_empty());
    assert_eq!(facts.jump_targets(&id, 5), vec![9]);

    Ok(())
}

#[test]
fn storage_and_memory_carry_values() -> anyhow::Result<()> {
    // PUSH1 0x2a; PUSH1 0; SSTORE; PUSH1 0; SLOAD;
    // PUSH1 0x20; MSTORE; PUSH1 0x20; MLOAD; STOP
    let facts = common::facts_for("602a60005560005460205260205100")?;
    let id = common::contract_id();
    let answer = BigUint::from(0x2a_u32);

    assert_eq!(facts.result(&id, 7), vec![(answer.clone(), 1)]);
    assert_eq!(facts.result(&id, 13), vec![(answer, 1)]);

    Ok(())
}

#[test]
fn hashes_known_memory() -> anyhow::Result<()> {
    // PUSH1 0; PUSH1 0; MSTORE; PUSH1 0x20; PUSH1 0; SHA3
    let facts = common::facts_for("6000600052602060002000")?;
    let id = common::contract_id();

    // The hash of 32 zero bytes.
    let expected = BigUint::parse_bytes(
        b"290decd9548b62a8d60345a988386fc84ba6bc95484008f6362f93160ef3e563",
        16,
    )
    .expect("Invalid hex literal");
    assert_eq!(facts.result(&id, 9), vec![(expected, 2)]);

    Ok(())
}

#[test]
fn can_filter_by_opcode() -> anyhow::Result<()> {
    let facts = common::facts_for("5b6001600057")?;
    let id = common::contract_id();

    assert_eq!(facts.pcs(&id), vec![0, 1, 3, 5]);
    assert_eq!(facts.pcs_with_opcode(&id, Opcode::Push(1)), vec![1, 3]);
    assert_eq!(facts.pcs_with_opcode(&id, Opcode::JumpI), vec![5]);

    Ok(())
}

#[test]
fn only_wrong_arity_is_an_error() -> anyhow::Result<()> {
    let facts = common::facts_for("6001600201")?;
    let id = common::contract_id();

    let error = facts.ternary(&id, 4).expect_err("Wrong arity was accepted");
    assert!(matches!(error.payload, Error::ArityMismatch { .. }));

    let unknown = BigUint::from(2u32);
    assert_eq!(facts.end_pc(&unknown), None);
    assert!(facts.ternary(&unknown, 4)?.is_empty());
    assert!(facts.jump_targets(&id, 4).is_empty());

    Ok(())
}
