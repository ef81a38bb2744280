//! This module contains constants that are needed throughout the codebase.

/// The base byte value for the `PUSH` opcode.
///
/// This is constructed such that for `PUSHN`, `PUSH_OPCODE_BASE_VALUE` + `N`
/// equals the byte value for the corresponding `PUSH` opcode. `PUSH0` sits
/// exactly at the base value.
pub const PUSH_OPCODE_BASE_VALUE: u8 = 0x5f;

/// The base byte value for the `DUP` opcode.
///
/// This is constructed such that for `DUPN`, `DUP_OPCODE_BASE_VALUE` + `N`
/// equals the byte value for the corresponding `DUP` opcode.
pub const DUP_OPCODE_BASE_VALUE: u8 = 0x7f;

/// The base byte value for the `SWAP` opcode.
///
/// This is constructed such that for `SWAPN`, `SWAP_OPCODE_BASE_VALUE` + `N`
/// equals the byte value for the corresponding `SWAP` opcode.
pub const SWAP_OPCODE_BASE_VALUE: u8 = 0x8f;

/// The base byte value for the `LOG` opcode.
///
/// This is constructed such that for `LOGN`, `LOG_OPCODE_BASE_VALUE` + `N`
/// equals the byte value for the corresponding `LOG` opcode.
pub const LOG_OPCODE_BASE_VALUE: u8 = 0xa0;

/// The maximum number of bytes that can be pushed at once using the `PUSH`
/// opcode.
pub const PUSH_OPCODE_MAX_BYTES: u8 = 32;

/// The largest `N` for the `DUPN` and `SWAPN` opcodes.
pub const DUP_SWAP_MAX_DEPTH: u8 = 16;

/// The largest number of topics that can be attached by a `LOGN` opcode.
pub const LOG_MAX_TOPICS: u8 = 4;

/// The maximum stack depth for the EVM.
pub const MAXIMUM_STACK_DEPTH: usize = 1024;

/// The width of word on the EVM in bits.
pub const WORD_SIZE_BITS: usize = 256;

/// The width of a byte on the EVM (and most other places) in bits.
pub const BYTE_SIZE_BITS: usize = 8;

/// The width of a word on the EVM in bytes.
pub const WORD_SIZE_BYTES: usize = WORD_SIZE_BITS / BYTE_SIZE_BITS;

/// The byte sequences that begin the CBOR-encoded metadata that `solc` appends
/// to the runtime bytecode of a contract.
///
/// In order, these are the `bzzr0`, `bzzr1` and `ipfs` flavours of the
/// metadata.
pub const METADATA_MARKERS: [&[u8]; 3] = [
    &[0xa1, 0x65, 0x62, 0x7a, 0x7a, 0x72, 0x30],
    &[0xa2, 0x65, 0x62, 0x7a, 0x7a, 0x72, 0x31],
    &[0xa2, 0x64, 0x69, 0x70, 0x66, 0x73, 0x58, 0x22],
];

/// The number of bytes at the very end of the bytecode that hold the length
/// of the compiler metadata, not counting those bytes themselves.
pub const METADATA_LENGTH_BYTES: usize = 2;

/// The default value for whether the decoder rejects `DELEGATECALL` and
/// `CALLCODE`.
///
/// Strict mode treats those opcodes as fatal as their semantics cannot be
/// modelled soundly by the abstract interpreter. See
/// [`crate::disassembly::Config`] for more information.
pub const DEFAULT_STRICT_MODE_ENABLED: bool = true;

/// The default value for whether compiler metadata is located and removed from
/// the end of the bytecode before decoding.
pub const DEFAULT_STRIP_METADATA_ENABLED: bool = true;

/// The default number of bytes of abstract memory that the interpreter will
/// read in order to evaluate a single `SHA3`.
///
/// Larger ranges are treated as malformed and produce an unknown result.
pub const DEFAULT_MAX_HASHED_BYTES: usize = 4096;
