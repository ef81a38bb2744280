//! This module contains the decoder for turning a stream of bytes into the
//! [`Instruction`]s of a [`ContractInfo`].
//!
//! # Implementation Note
//!
//! While it might make sense in the future to build a more robust parser based
//! on parser combinators from a library like [`nom`](https://docs.rs/nom), for
//! now it makes sense to stick to a simple system.

use crate::{
    disassembly::{info::ContractInfo, instruction::Instruction, metadata, Config},
    error::{
        container::Locatable,
        disassembly::{Error, Result},
    },
    opcode::Opcode,
};

/// Disassembles the input `bytes` into the instructions of a contract.
///
/// # Tolerated Input
///
/// Deployed bytecode frequently contains data that is not code, so decoding is
/// as permissive as possible:
///
/// - A `PUSH` whose immediate runs past the end of the bytes is padded with
///   zeroes on the right.
/// - A byte that is not a known opcode ends decoding, and everything from it
///   onwards is discarded.
///
/// Both of these are logged as warnings.
///
/// # Jumps
///
/// Every `JUMPDEST` is recorded as it is decoded, and after decoding every
/// jump is given every jump destination as its possible targets.
///
/// # Errors
///
/// When `bytes` is too large to be addressed by a [`u32`] program counter, or
/// when the configuration is strict and the bytes contain a `DELEGATECALL` or
/// `CALLCODE`.
pub fn disassemble(bytes: &[u8], config: &Config) -> Result<ContractInfo> {
    let code = if config.strip_metadata {
        metadata::strip_metadata(bytes)
    } else {
        bytes
    };

    if u32::try_from(code.len()).is_err() {
        return Err(Error::BytecodeTooLarge.locate(u32::MAX));
    }

    let mut info = ContractInfo::new();
    let mut offset: usize = 0;

    while offset < code.len() {
        // Guarded by the length check above.
        let pc = u32::try_from(offset).map_err(|_| Error::BytecodeTooLarge.locate(u32::MAX))?;
        let byte = code[offset];

        let Some(opcode) = Opcode::from_byte(byte) else {
            tracing::warn!(
                pc,
                byte,
                discarded = code.len() - offset,
                "Unknown opcode, discarding the rest of the bytecode"
            );
            break;
        };

        if opcode.is_unsound_call() {
            if config.strict {
                return Err(Error::UnsoundOpcode(opcode).locate(pc));
            }
            tracing::warn!(pc, %opcode, "Analysis of this opcode is unsound");
        }

        let instruction = match opcode {
            Opcode::Push(size) => {
                let start = offset + 1;
                let end = (start + size as usize).min(code.len());
                if end - start < size as usize {
                    tracing::warn!(
                        pc,
                        %opcode,
                        present = end - start,
                        "Truncated push immediate, padding with zeroes"
                    );
                }
                Instruction::new_push(pc, size, &code[start..end])
            }
            _ => Instruction::new(pc, opcode),
        };

        offset += instruction.len();
        info.push(instruction);
    }

    info.seed_jumps();
    tracing::debug!(
        bytes = code.len(),
        instructions = info.len(),
        jump_destinations = info.jump_destinations().len(),
        "Decoded bytecode"
    );

    Ok(info)
}
