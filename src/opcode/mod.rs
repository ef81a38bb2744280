//! This module contains the [`Opcode`] enumeration of the EVM's
//! [opcodes](https://ethereum.org/en/developers/docs/evm/opcodes/), the
//! static table describing each of them, and the per-class transfer functions
//! used by the abstract interpreter.
//!
//! # Static Data
//!
//! The number of stack items each opcode consumes and produces, and the size
//! of its immediate, are recorded exactly once in [`OPCODE_TABLE`]. Both the
//! decoder and the interpreter read them from there.

pub mod arithmetic;
pub mod control;
pub mod environment;
pub mod logic;
pub mod macros;
pub mod memory;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::{
    constant::{
        DUP_OPCODE_BASE_VALUE,
        DUP_SWAP_MAX_DEPTH,
        LOG_MAX_TOPICS,
        LOG_OPCODE_BASE_VALUE,
        PUSH_OPCODE_BASE_VALUE,
        PUSH_OPCODE_MAX_BYTES,
        SWAP_OPCODE_BASE_VALUE,
    },
    error::disassembly,
};

/// The closed set of opcodes understood by the library.
///
/// The families of opcodes that differ only by a size are represented by a
/// single variant carrying that size:
///
/// - `Push(n)` pushes an `n`-byte immediate, where `Push(0)` is `PUSH0`.
/// - `Dup(n)` and `Swap(n)` operate on stack item `n` for `1 <= n <= 16`.
/// - `Log(n)` attaches `n` topics for `0 <= n <= 4`.
///
/// Values of those variants outside the stated ranges do not correspond to any
/// byte, and [`Opcode::info`] returns [`None`] for them.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Opcode {
    Stop,
    Add,
    Mul,
    Sub,
    Div,
    SDiv,
    Mod,
    SMod,
    AddMod,
    MulMod,
    Exp,
    SignExtend,
    Lt,
    Gt,
    SLt,
    SGt,
    Eq,
    IsZero,
    And,
    Or,
    Xor,
    Not,
    Byte,
    Shl,
    Shr,
    Sar,
    Sha3,
    Address,
    Balance,
    Origin,
    Caller,
    CallValue,
    CallDataLoad,
    CallDataSize,
    CallDataCopy,
    CodeSize,
    CodeCopy,
    GasPrice,
    ExtCodeSize,
    ExtCodeCopy,
    ReturnDataSize,
    ReturnDataCopy,
    ExtCodeHash,
    BlockHash,
    Coinbase,
    Timestamp,
    Number,
    Difficulty,
    GasLimit,
    ChainId,
    SelfBalance,
    BaseFee,
    BlobHash,
    BlobBaseFee,
    Pop,
    MLoad,
    MStore,
    MStore8,
    SLoad,
    SStore,
    Jump,
    JumpI,
    Pc,
    MSize,
    Gas,
    JumpDest,
    TLoad,
    TStore,
    MCopy,
    Push(u8),
    Dup(u8),
    Swap(u8),
    Log(u8),
    Create,
    Call,
    CallCode,
    Return,
    DelegateCall,
    Create2,
    StaticCall,
    Revert,
    Invalid,
    SelfDestruct,
}

/// The static description of an opcode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OpcodeInfo {
    /// The opcode being described.
    pub opcode: Opcode,

    /// The canonical mnemonic for the opcode.
    pub mnemonic: &'static str,

    /// The number of stack items the opcode consumes.
    pub pops: u8,

    /// The number of stack items the opcode produces.
    pub pushes: u8,

    /// The number of bytes of immediate data that follow the opcode in the
    /// bytecode.
    pub immediate_size: u8,
}

/// The description of every byte that decodes to an opcode, indexed by that
/// byte.
pub static OPCODE_TABLE: [Option<OpcodeInfo>; 256] = build_table();

const PUSH_MNEMONICS: [&str; PUSH_OPCODE_MAX_BYTES as usize + 1] = [
    "PUSH0", "PUSH1", "PUSH2", "PUSH3", "PUSH4", "PUSH5", "PUSH6", "PUSH7", "PUSH8", "PUSH9",
    "PUSH10", "PUSH11", "PUSH12", "PUSH13", "PUSH14", "PUSH15", "PUSH16", "PUSH17", "PUSH18",
    "PUSH19", "PUSH20", "PUSH21", "PUSH22", "PUSH23", "PUSH24", "PUSH25", "PUSH26", "PUSH27",
    "PUSH28", "PUSH29", "PUSH30", "PUSH31", "PUSH32",
];

const DUP_MNEMONICS: [&str; DUP_SWAP_MAX_DEPTH as usize] = [
    "DUP1", "DUP2", "DUP3", "DUP4", "DUP5", "DUP6", "DUP7", "DUP8", "DUP9", "DUP10", "DUP11",
    "DUP12", "DUP13", "DUP14", "DUP15", "DUP16",
];

const SWAP_MNEMONICS: [&str; DUP_SWAP_MAX_DEPTH as usize] = [
    "SWAP1", "SWAP2", "SWAP3", "SWAP4", "SWAP5", "SWAP6", "SWAP7", "SWAP8", "SWAP9", "SWAP10",
    "SWAP11", "SWAP12", "SWAP13", "SWAP14", "SWAP15", "SWAP16",
];

const LOG_MNEMONICS: [&str; LOG_MAX_TOPICS as usize + 1] = ["LOG0", "LOG1", "LOG2", "LOG3", "LOG4"];

/// Alternative mnemonics accepted when parsing, mapped to their opcode.
const MNEMONIC_ALIASES: [(&str, Opcode); 3] = [
    ("KECCAK256", Opcode::Sha3),
    ("SUICIDE", Opcode::SelfDestruct),
    ("PREVRANDAO", Opcode::Difficulty),
];

/// Constructs the table entry for a fixed-size opcode.
const fn entry(opcode: Opcode, mnemonic: &'static str, pops: u8, pushes: u8) -> Option<OpcodeInfo> {
    Some(OpcodeInfo {
        opcode,
        mnemonic,
        pops,
        pushes,
        immediate_size: 0,
    })
}

/// Builds the opcode table at compile time.
#[allow(clippy::too_many_lines)] // It is a flat list of opcodes
const fn build_table() -> [Option<OpcodeInfo>; 256] {
    let mut t: [Option<OpcodeInfo>; 256] = [None; 256];

    t[0x00] = entry(Opcode::Stop, "STOP", 0, 0);
    t[0x01] = entry(Opcode::Add, "ADD", 2, 1);
    t[0x02] = entry(Opcode::Mul, "MUL", 2, 1);
    t[0x03] = entry(Opcode::Sub, "SUB", 2, 1);
    t[0x04] = entry(Opcode::Div, "DIV", 2, 1);
    t[0x05] = entry(Opcode::SDiv, "SDIV", 2, 1);
    t[0x06] = entry(Opcode::Mod, "MOD", 2, 1);
    t[0x07] = entry(Opcode::SMod, "SMOD", 2, 1);
    t[0x08] = entry(Opcode::AddMod, "ADDMOD", 3, 1);
    t[0x09] = entry(Opcode::MulMod, "MULMOD", 3, 1);
    t[0x0a] = entry(Opcode::Exp, "EXP", 2, 1);
    t[0x0b] = entry(Opcode::SignExtend, "SIGNEXTEND", 2, 1);
    t[0x10] = entry(Opcode::Lt, "LT", 2, 1);
    t[0x11] = entry(Opcode::Gt, "GT", 2, 1);
    t[0x12] = entry(Opcode::SLt, "SLT", 2, 1);
    t[0x13] = entry(Opcode::SGt, "SGT", 2, 1);
    t[0x14] = entry(Opcode::Eq, "EQ", 2, 1);
    t[0x15] = entry(Opcode::IsZero, "ISZERO", 1, 1);
    t[0x16] = entry(Opcode::And, "AND", 2, 1);
    t[0x17] = entry(Opcode::Or, "OR", 2, 1);
    t[0x18] = entry(Opcode::Xor, "XOR", 2, 1);
    t[0x19] = entry(Opcode::Not, "NOT", 1, 1);
    t[0x1a] = entry(Opcode::Byte, "BYTE", 2, 1);
    t[0x1b] = entry(Opcode::Shl, "SHL", 2, 1);
    t[0x1c] = entry(Opcode::Shr, "SHR", 2, 1);
    t[0x1d] = entry(Opcode::Sar, "SAR", 2, 1);
    t[0x20] = entry(Opcode::Sha3, "SHA3", 2, 1);
    t[0x30] = entry(Opcode::Address, "ADDRESS", 0, 1);
    t[0x31] = entry(Opcode::Balance, "BALANCE", 1, 1);
    t[0x32] = entry(Opcode::Origin, "ORIGIN", 0, 1);
    t[0x33] = entry(Opcode::Caller, "CALLER", 0, 1);
    t[0x34] = entry(Opcode::CallValue, "CALLVALUE", 0, 1);
    t[0x35] = entry(Opcode::CallDataLoad, "CALLDATALOAD", 1, 1);
    t[0x36] = entry(Opcode::CallDataSize, "CALLDATASIZE", 0, 1);
    t[0x37] = entry(Opcode::CallDataCopy, "CALLDATACOPY", 3, 0);
    t[0x38] = entry(Opcode::CodeSize, "CODESIZE", 0, 1);
    t[0x39] = entry(Opcode::CodeCopy, "CODECOPY", 3, 0);
    t[0x3a] = entry(Opcode::GasPrice, "GASPRICE", 0, 1);
    t[0x3b] = entry(Opcode::ExtCodeSize, "EXTCODESIZE", 1, 1);
    t[0x3c] = entry(Opcode::ExtCodeCopy, "EXTCODECOPY", 4, 0);
    t[0x3d] = entry(Opcode::ReturnDataSize, "RETURNDATASIZE", 0, 1);
    t[0x3e] = entry(Opcode::ReturnDataCopy, "RETURNDATACOPY", 3, 0);
    t[0x3f] = entry(Opcode::ExtCodeHash, "EXTCODEHASH", 1, 1);
    t[0x40] = entry(Opcode::BlockHash, "BLOCKHASH", 1, 1);
    t[0x41] = entry(Opcode::Coinbase, "COINBASE", 0, 1);
    t[0x42] = entry(Opcode::Timestamp, "TIMESTAMP", 0, 1);
    t[0x43] = entry(Opcode::Number, "NUMBER", 0, 1);
    t[0x44] = entry(Opcode::Difficulty, "DIFFICULTY", 0, 1);
    t[0x45] = entry(Opcode::GasLimit, "GASLIMIT", 0, 1);
    t[0x46] = entry(Opcode::ChainId, "CHAINID", 0, 1);
    t[0x47] = entry(Opcode::SelfBalance, "SELFBALANCE", 0, 1);
    t[0x48] = entry(Opcode::BaseFee, "BASEFEE", 0, 1);
    t[0x49] = entry(Opcode::BlobHash, "BLOBHASH", 1, 1);
    t[0x4a] = entry(Opcode::BlobBaseFee, "BLOBBASEFEE", 0, 1);
    t[0x50] = entry(Opcode::Pop, "POP", 1, 0);
    t[0x51] = entry(Opcode::MLoad, "MLOAD", 1, 1);
    t[0x52] = entry(Opcode::MStore, "MSTORE", 2, 0);
    t[0x53] = entry(Opcode::MStore8, "MSTORE8", 2, 0);
    t[0x54] = entry(Opcode::SLoad, "SLOAD", 1, 1);
    t[0x55] = entry(Opcode::SStore, "SSTORE", 2, 0);
    t[0x56] = entry(Opcode::Jump, "JUMP", 1, 0);
    t[0x57] = entry(Opcode::JumpI, "JUMPI", 2, 0);
    t[0x58] = entry(Opcode::Pc, "PC", 0, 1);
    t[0x59] = entry(Opcode::MSize, "MSIZE", 0, 1);
    t[0x5a] = entry(Opcode::Gas, "GAS", 0, 1);
    t[0x5b] = entry(Opcode::JumpDest, "JUMPDEST", 0, 0);
    t[0x5c] = entry(Opcode::TLoad, "TLOAD", 1, 1);
    t[0x5d] = entry(Opcode::TStore, "TSTORE", 2, 0);
    t[0x5e] = entry(Opcode::MCopy, "MCOPY", 3, 0);
    t[0xf0] = entry(Opcode::Create, "CREATE", 3, 1);
    t[0xf1] = entry(Opcode::Call, "CALL", 7, 1);
    t[0xf2] = entry(Opcode::CallCode, "CALLCODE", 7, 1);
    t[0xf3] = entry(Opcode::Return, "RETURN", 2, 0);
    t[0xf4] = entry(Opcode::DelegateCall, "DELEGATECALL", 6, 1);
    t[0xf5] = entry(Opcode::Create2, "CREATE2", 4, 1);
    t[0xfa] = entry(Opcode::StaticCall, "STATICCALL", 6, 1);
    t[0xfd] = entry(Opcode::Revert, "REVERT", 2, 0);
    t[0xfe] = entry(Opcode::Invalid, "INVALID", 0, 0);
    t[0xff] = entry(Opcode::SelfDestruct, "SELFDESTRUCT", 1, 0);

    let mut n = 0;
    while n <= PUSH_OPCODE_MAX_BYTES {
        t[(PUSH_OPCODE_BASE_VALUE + n) as usize] = Some(OpcodeInfo {
            opcode:         Opcode::Push(n),
            mnemonic:       PUSH_MNEMONICS[n as usize],
            pops:           0,
            pushes:         1,
            immediate_size: n,
        });
        n += 1;
    }

    let mut n = 1;
    while n <= DUP_SWAP_MAX_DEPTH {
        t[(DUP_OPCODE_BASE_VALUE + n) as usize] = Some(OpcodeInfo {
            opcode:         Opcode::Dup(n),
            mnemonic:       DUP_MNEMONICS[(n - 1) as usize],
            pops:           n,
            pushes:         n + 1,
            immediate_size: 0,
        });
        t[(SWAP_OPCODE_BASE_VALUE + n) as usize] = Some(OpcodeInfo {
            opcode:         Opcode::Swap(n),
            mnemonic:       SWAP_MNEMONICS[(n - 1) as usize],
            pops:           n + 1,
            pushes:         n + 1,
            immediate_size: 0,
        });
        n += 1;
    }

    let mut n = 0;
    while n <= LOG_MAX_TOPICS {
        t[(LOG_OPCODE_BASE_VALUE + n) as usize] = Some(OpcodeInfo {
            opcode:         Opcode::Log(n),
            mnemonic:       LOG_MNEMONICS[n as usize],
            pops:           n + 2,
            pushes:         0,
            immediate_size: 0,
        });
        n += 1;
    }

    t
}

impl Opcode {
    /// Decodes the opcode represented by `byte`, returning [`None`] if the
    /// byte does not correspond to any known opcode.
    #[must_use]
    pub fn from_byte(byte: u8) -> Option<Self> {
        OPCODE_TABLE[byte as usize].map(|info| info.opcode)
    }

    /// Gets the byte that encodes this opcode.
    #[must_use]
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Stop => 0x00,
            Self::Add => 0x01,
            Self::Mul => 0x02,
            Self::Sub => 0x03,
            Self::Div => 0x04,
            Self::SDiv => 0x05,
            Self::Mod => 0x06,
            Self::SMod => 0x07,
            Self::AddMod => 0x08,
            Self::MulMod => 0x09,
            Self::Exp => 0x0a,
            Self::SignExtend => 0x0b,
            Self::Lt => 0x10,
            Self::Gt => 0x11,
            Self::SLt => 0x12,
            Self::SGt => 0x13,
            Self::Eq => 0x14,
            Self::IsZero => 0x15,
            Self::And => 0x16,
            Self::Or => 0x17,
            Self::Xor => 0x18,
            Self::Not => 0x19,
            Self::Byte => 0x1a,
            Self::Shl => 0x1b,
            Self::Shr => 0x1c,
            Self::Sar => 0x1d,
            Self::Sha3 => 0x20,
            Self::Address => 0x30,
            Self::Balance => 0x31,
            Self::Origin => 0x32,
            Self::Caller => 0x33,
            Self::CallValue => 0x34,
            Self::CallDataLoad => 0x35,
            Self::CallDataSize => 0x36,
            Self::CallDataCopy => 0x37,
            Self::CodeSize => 0x38,
            Self::CodeCopy => 0x39,
            Self::GasPrice => 0x3a,
            Self::ExtCodeSize => 0x3b,
            Self::ExtCodeCopy => 0x3c,
            Self::ReturnDataSize => 0x3d,
            Self::ReturnDataCopy => 0x3e,
            Self::ExtCodeHash => 0x3f,
            Self::BlockHash => 0x40,
            Self::Coinbase => 0x41,
            Self::Timestamp => 0x42,
            Self::Number => 0x43,
            Self::Difficulty => 0x44,
            Self::GasLimit => 0x45,
            Self::ChainId => 0x46,
            Self::SelfBalance => 0x47,
            Self::BaseFee => 0x48,
            Self::BlobHash => 0x49,
            Self::BlobBaseFee => 0x4a,
            Self::Pop => 0x50,
            Self::MLoad => 0x51,
            Self::MStore => 0x52,
            Self::MStore8 => 0x53,
            Self::SLoad => 0x54,
            Self::SStore => 0x55,
            Self::Jump => 0x56,
            Self::JumpI => 0x57,
            Self::Pc => 0x58,
            Self::MSize => 0x59,
            Self::Gas => 0x5a,
            Self::JumpDest => 0x5b,
            Self::TLoad => 0x5c,
            Self::TStore => 0x5d,
            Self::MCopy => 0x5e,
            Self::Push(n) => PUSH_OPCODE_BASE_VALUE.wrapping_add(n),
            Self::Dup(n) => DUP_OPCODE_BASE_VALUE.wrapping_add(n),
            Self::Swap(n) => SWAP_OPCODE_BASE_VALUE.wrapping_add(n),
            Self::Log(n) => LOG_OPCODE_BASE_VALUE.wrapping_add(n),
            Self::Create => 0xf0,
            Self::Call => 0xf1,
            Self::CallCode => 0xf2,
            Self::Return => 0xf3,
            Self::DelegateCall => 0xf4,
            Self::Create2 => 0xf5,
            Self::StaticCall => 0xfa,
            Self::Revert => 0xfd,
            Self::Invalid => 0xfe,
            Self::SelfDestruct => 0xff,
        }
    }

    /// Gets the static description of the opcode, or [`None`] if the opcode
    /// carries a size that no byte encodes.
    #[must_use]
    pub fn info(self) -> Option<&'static OpcodeInfo> {
        OPCODE_TABLE[self.as_byte() as usize]
            .as_ref()
            .filter(|info| info.opcode == self)
    }

    /// Gets the number of stack items that the opcode consumes.
    ///
    /// This is also the number of operand slots recorded for each
    /// [`crate::disassembly::Instruction`] with this opcode.
    #[must_use]
    pub fn arg_count(self) -> usize {
        self.info().map_or(0, |info| info.pops as usize)
    }

    /// Gets the number of stack items that the opcode produces.
    #[must_use]
    pub fn push_count(self) -> usize {
        self.info().map_or(0, |info| info.pushes as usize)
    }

    /// Gets the number of immediate bytes that follow the opcode.
    #[must_use]
    pub fn immediate_size(self) -> usize {
        self.info().map_or(0, |info| info.immediate_size as usize)
    }

    /// Gets the canonical mnemonic for the opcode.
    #[must_use]
    pub fn mnemonic(self) -> &'static str {
        self.info().map_or("UNKNOWN", |info| info.mnemonic)
    }

    /// Checks if the opcode is `JUMP` or `JUMPI`.
    #[must_use]
    pub fn is_jump(self) -> bool {
        matches!(self, Self::Jump | Self::JumpI)
    }

    /// Checks if the opcode ends a basic block.
    #[must_use]
    pub fn is_block_terminator(self) -> bool {
        matches!(
            self,
            Self::Stop
                | Self::Jump
                | Self::JumpI
                | Self::Return
                | Self::Revert
                | Self::Invalid
                | Self::SelfDestruct
        )
    }

    /// Checks if execution can continue with the next instruction by address
    /// after executing this opcode.
    ///
    /// This is true of every opcode that does not end a block, and of `JUMPI`
    /// when its condition is false.
    #[must_use]
    pub fn can_fall_through(self) -> bool {
        !self.is_block_terminator() || self == Self::JumpI
    }

    /// Checks if the opcode delegates execution to external code in a way
    /// that the abstract interpreter cannot model soundly.
    #[must_use]
    pub fn is_unsound_call(self) -> bool {
        matches!(self, Self::DelegateCall | Self::CallCode)
    }

    /// Iterates over the description of every known opcode in byte order.
    pub fn all() -> impl Iterator<Item = &'static OpcodeInfo> {
        OPCODE_TABLE.iter().flatten()
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// Parses an opcode from its mnemonic, ignoring case.
impl FromStr for Opcode {
    type Err = disassembly::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::all()
            .find(|info| info.mnemonic == upper)
            .map(|info| info.opcode)
            .or_else(|| {
                MNEMONIC_ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == upper)
                    .map(|(_, opcode)| *opcode)
            })
            .ok_or(disassembly::Error::UnknownMnemonic(s.to_string()))
    }
}

/// Types that can be encoded as a fragment of bytecode.
///
/// This is used by the [`crate::bytecode`] macro to assemble programs.
pub trait Encode {
    /// Gets the bytes for this fragment.
    fn encode(&self) -> Vec<u8>;
}

impl Encode for Opcode {
    fn encode(&self) -> Vec<u8> {
        vec![self.as_byte()]
    }
}

/// An opcode together with its immediate bytes.
impl<const N: usize> Encode for (Opcode, [u8; N]) {
    fn encode(&self) -> Vec<u8> {
        let mut bytes = vec![self.0.as_byte()];
        bytes.extend_from_slice(&self.1);
        bytes
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use crate::opcode::{Opcode, OPCODE_TABLE};

    #[test]
    fn table_entries_are_indexed_by_their_byte() {
        for (byte, info) in OPCODE_TABLE.iter().enumerate() {
            if let Some(info) = info {
                assert_eq!(info.opcode.as_byte() as usize, byte);
                assert_eq!(Opcode::from_byte(info.opcode.as_byte()), Some(info.opcode));
            }
        }
    }

    #[test]
    fn table_covers_the_known_opcodes() {
        // 33 PUSH, 16 DUP, 16 SWAP, 5 LOG and 80 others.
        assert_eq!(Opcode::all().count(), 150);
        assert_eq!(Opcode::from_byte(0x0c), None);
        assert_eq!(Opcode::from_byte(0xef), None);
        assert_eq!(Opcode::from_byte(0xfb), None);
    }

    #[test]
    fn mnemonics_round_trip() {
        for info in Opcode::all() {
            assert_eq!(Opcode::from_str(info.mnemonic), Ok(info.opcode));
            assert_eq!(info.opcode.to_string(), info.mnemonic);
        }
    }

    #[test]
    fn can_parse_aliases_and_lower_case() {
        assert_eq!(Opcode::from_str("keccak256"), Ok(Opcode::Sha3));
        assert_eq!(Opcode::from_str("SUICIDE"), Ok(Opcode::SelfDestruct));
        assert_eq!(Opcode::from_str("push2"), Ok(Opcode::Push(2)));
        assert!(Opcode::from_str("FROB").is_err());
    }

    #[test]
    fn families_have_consistent_counts() {
        assert_eq!(Opcode::Push(0).immediate_size(), 0);
        assert_eq!(Opcode::Push(32).immediate_size(), 32);
        assert_eq!(Opcode::Dup(3).arg_count(), 3);
        assert_eq!(Opcode::Dup(3).push_count(), 4);
        assert_eq!(Opcode::Swap(2).arg_count(), 3);
        assert_eq!(Opcode::Log(4).arg_count(), 6);
        assert_eq!(Opcode::Call.arg_count(), 7);
        assert_eq!(Opcode::AddMod.arg_count(), 3);
    }

    #[test]
    fn out_of_range_family_members_have_no_info() {
        assert_eq!(Opcode::Push(33).info(), None);
        assert_eq!(Opcode::Dup(0).info(), None);
        assert_eq!(Opcode::Log(5).info(), None);
        assert_eq!(Opcode::Dup(17).arg_count(), 0);
    }

    #[test]
    fn classifies_block_terminators() {
        assert!(Opcode::JumpI.is_block_terminator());
        assert!(Opcode::JumpI.can_fall_through());
        assert!(!Opcode::Jump.can_fall_through());
        assert!(Opcode::Add.can_fall_through());
        assert!(!Opcode::JumpDest.is_block_terminator());
    }
}
