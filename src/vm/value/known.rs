//! This module contains a representation of concrete word values for the EVM
//! that can be known and manipulated statically.
//!
//! Every operation is total. Division and modulo by zero produce zero, shifts
//! by 256 or more saturate, and out-of-range byte indices select nothing, all
//! exactly as the EVM specifies.

use std::fmt::{Display, Formatter};

use ethnum::{I256, U256};

use crate::constant::{WORD_SIZE_BITS, WORD_SIZE_BYTES};

/// A 256-bit word whose value is concretely known during abstract
/// interpretation.
///
/// # Representation
///
/// At the low level at which this library works, all values on the EVM are
/// just bags of bits in a 256-bit word. Operations on a `KnownWord` may treat
/// this word numerically in a signed (two's complement) or unsigned fashion.
/// Such numeric operations are, where possible, implemented in terms of
/// standard operators to provide a natural usage experience, and all of them
/// wrap modulo `2^256`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct KnownWord {
    value: U256,
}

impl KnownWord {
    /// Creates a known value representing zero.
    #[must_use]
    pub fn zero() -> Self {
        Self { value: U256::ZERO }
    }

    /// Creates a known value representing one.
    #[must_use]
    pub fn one() -> Self {
        Self { value: U256::ONE }
    }

    /// Creates the known value with every bit set, which is both the largest
    /// unsigned word and `-1` in two's complement.
    #[must_use]
    pub fn max() -> Self {
        Self { value: U256::MAX }
    }

    /// Constructs a new `KnownWord` from the unsigned `value`.
    #[must_use]
    pub fn new(value: impl Into<U256>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Constructs a new `KnownWord` by reinterpreting the bits of the signed
    /// `value`.
    #[must_use]
    pub fn from_signed(value: impl Into<I256>) -> Self {
        let value = U256::from_ne_bytes(value.into().to_ne_bytes());
        Self { value }
    }

    /// Constructs a new `KnownWord` from `bytes` in big-endian (network)
    /// ordering.
    #[must_use]
    pub fn from_be_bytes(bytes: [u8; WORD_SIZE_BYTES]) -> Self {
        let value = U256::from_be_bytes(bytes);
        Self { value }
    }

    /// Constructs a new `KnownWord` from up to 32 big-endian `bytes`.
    ///
    /// Shorter inputs are treated as the low-order bytes of the word, which is
    /// how the `PUSH` opcodes place their immediates. Only the last 32 bytes
    /// of longer inputs are used.
    #[must_use]
    pub fn from_be_slice(bytes: &[u8]) -> Self {
        let mut buffer = [0u8; WORD_SIZE_BYTES];
        let used = bytes.len().min(WORD_SIZE_BYTES);
        buffer[WORD_SIZE_BYTES - used..].copy_from_slice(&bytes[bytes.len() - used..]);
        Self::from_be_bytes(buffer)
    }

    /// Gets the unsigned value of the word.
    #[must_use]
    pub fn value(&self) -> U256 {
        self.value
    }

    /// Gets the value of the word interpreted as a two's complement signed
    /// number.
    #[must_use]
    pub fn value_signed(&self) -> I256 {
        I256::from_ne_bytes(self.value.to_ne_bytes())
    }

    /// Gets the bytes of this word in big-endian ordering.
    #[must_use]
    pub fn bytes_be(&self) -> [u8; WORD_SIZE_BYTES] {
        self.value.to_be_bytes()
    }

    /// Gets the value as a [`u32`] if it fits.
    #[must_use]
    pub fn to_u32(&self) -> Option<u32> {
        if self.value <= U256::from(u32::MAX) {
            Some(self.value.as_u32())
        } else {
            None
        }
    }

    /// Gets the value as a [`usize`] if it fits.
    #[must_use]
    pub fn to_usize(&self) -> Option<usize> {
        let max = U256::from(u64::try_from(usize::MAX).unwrap_or(u64::MAX));
        if self.value <= max {
            Some(self.value.as_usize())
        } else {
            None
        }
    }

    /// Gets the least-significant byte of the word.
    #[must_use]
    pub fn low_byte(&self) -> u8 {
        self.bytes_be()[WORD_SIZE_BYTES - 1]
    }

    /// Checks if the word is zero.
    #[must_use]
    pub fn is_zero_value(&self) -> bool {
        self.value == U256::ZERO
    }

    /// Checks if the word is negative when interpreted as a signed number.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.value_signed() < I256::ZERO
    }

    /// Performs signed division of two known words, truncating towards zero.
    ///
    /// Division by zero yields zero, and `MIN / -1` overflows back to `MIN`.
    #[must_use]
    pub fn signed_div(self, rhs: Self) -> Self {
        if rhs.is_zero_value() {
            return Self::zero();
        }
        Self::from_signed(self.value_signed().wrapping_div(rhs.value_signed()))
    }

    /// Performs signed modulo of two known words.
    ///
    /// The sign of the result follows the dividend, and modulo by zero yields
    /// zero.
    #[must_use]
    pub fn signed_rem(self, rhs: Self) -> Self {
        if rhs.is_zero_value() {
            return Self::zero();
        }
        Self::from_signed(self.value_signed().wrapping_rem(rhs.value_signed()))
    }

    /// Computes `(self + rhs) % modulus` without the intermediate sum being
    /// truncated to 256 bits.
    #[must_use]
    pub fn add_mod(self, rhs: Self, modulus: Self) -> Self {
        if modulus.is_zero_value() {
            return Self::zero();
        }
        let n = modulus.value;
        let left = self.value % n;
        let right = rhs.value % n;

        // Both operands are below `n`, so a single subtraction of `n` suffices
        // and wraps correctly when the sum overflowed.
        let (sum, overflowed) = left.overflowing_add(right);
        if overflowed || sum >= n {
            Self::new(sum.wrapping_sub(n))
        } else {
            Self::new(sum)
        }
    }

    /// Computes `(self * rhs) % modulus` without the intermediate product
    /// being truncated to 256 bits.
    #[must_use]
    pub fn mul_mod(self, rhs: Self, modulus: Self) -> Self {
        if modulus.is_zero_value() {
            return Self::zero();
        }
        let base = Self::new(self.value % modulus.value);
        let multiplier = rhs.value % modulus.value;

        // Double-and-add over the bits of the multiplier, most significant
        // first.
        let mut result = Self::zero();
        for bit in (0..WORD_SIZE_BITS).rev() {
            result = result.add_mod(result, modulus);
            if bit_is_set(multiplier, bit) {
                result = result.add_mod(base, modulus);
            }
        }
        result
    }

    /// Raises `self` to the power of `exponent`, modulo `2^256`.
    #[must_use]
    pub fn exp(self, exponent: Self) -> Self {
        let mut result = U256::ONE;
        let mut base = self.value;
        let mut remaining = exponent.value;

        while remaining != U256::ZERO {
            if remaining & U256::ONE == U256::ONE {
                result = result.wrapping_mul(base);
            }
            base = base.wrapping_mul(base);
            remaining = remaining >> 1u32;
        }

        Self::new(result)
    }

    /// Computes less-than of two known words.
    #[must_use]
    pub fn lt(self, rhs: Self) -> Self {
        KnownWord::from(self.value < rhs.value)
    }

    /// Computes greater-than of two known words.
    #[must_use]
    pub fn gt(self, rhs: Self) -> Self {
        KnownWord::from(self.value > rhs.value)
    }

    /// Computes signed less-than of two known words.
    #[must_use]
    pub fn signed_lt(self, rhs: Self) -> Self {
        KnownWord::from(self.value_signed() < rhs.value_signed())
    }

    /// Computes signed greater-than of two known words.
    #[must_use]
    pub fn signed_gt(self, rhs: Self) -> Self {
        KnownWord::from(self.value_signed() > rhs.value_signed())
    }

    /// Computes equality of two known words.
    #[must_use]
    pub fn eq(self, rhs: Self) -> Self {
        KnownWord::from(self.value == rhs.value)
    }

    /// Checks if `self` is zero, producing the word `1` if so and `0`
    /// otherwise.
    #[must_use]
    pub fn is_zero(self) -> Self {
        KnownWord::from(self.is_zero_value())
    }

    /// Shifts `self` left by `shift` bits, producing zero for shifts of 256
    /// or more.
    #[must_use]
    pub fn shl(self, shift: Self) -> Self {
        match shift_amount(shift) {
            Some(bits) => Self::new(self.value << bits),
            None => Self::zero(),
        }
    }

    /// Shifts `self` right by `shift` bits, filling with zeroes, and producing
    /// zero for shifts of 256 or more.
    #[must_use]
    pub fn shr(self, shift: Self) -> Self {
        match shift_amount(shift) {
            Some(bits) => Self::new(self.value >> bits),
            None => Self::zero(),
        }
    }

    /// Computes the arithmetic right shift of `self` by `shift` bits.
    ///
    /// The sign bit is shifted in, so shifts of 256 or more produce `-1` for a
    /// negative `self` and zero otherwise.
    #[must_use]
    pub fn sar(self, shift: Self) -> Self {
        match shift_amount(shift) {
            Some(bits) => Self::from_signed(self.value_signed() >> bits),
            None if self.is_negative() => Self::max(),
            None => Self::zero(),
        }
    }

    /// Extracts the byte at `index` of `self`, where index zero is the most
    /// significant byte.
    ///
    /// Indices of 32 or more produce zero.
    #[must_use]
    pub fn byte(self, index: Self) -> Self {
        match index.to_usize() {
            Some(ix) if ix < WORD_SIZE_BYTES => Self::new(self.bytes_be()[ix]),
            _ => Self::zero(),
        }
    }

    /// Sign-extends `self` from the byte at (little-endian) position `byte`.
    ///
    /// Returns [`None`] when `byte` is 32 or more, where the operation has no
    /// defined byte to extend from.
    #[must_use]
    pub fn checked_sign_extend(self, byte: Self) -> Option<Self> {
        let index = byte.to_usize().filter(|ix| *ix < WORD_SIZE_BYTES)?;
        if index == WORD_SIZE_BYTES - 1 {
            return Some(self);
        }

        let sign_bit = u32::try_from(index * 8 + 7).ok()?;
        let mask = (U256::ONE << (sign_bit + 1)).wrapping_sub(U256::ONE);
        let value = if bit_is_set(self.value, sign_bit as usize) {
            self.value | !mask
        } else {
            self.value & mask
        };

        Some(Self::new(value))
    }

    /// Sign-extends `self` from the byte at (little-endian) position `byte`,
    /// leaving `self` unchanged when `byte` is 31 or more.
    #[must_use]
    pub fn sign_extend(self, byte: Self) -> Self {
        self.checked_sign_extend(byte).unwrap_or(self)
    }
}

/// Gets the shift distance in bits if it is less than the width of a word.
fn shift_amount(shift: KnownWord) -> Option<u32> {
    shift.to_u32().filter(|bits| (*bits as usize) < WORD_SIZE_BITS)
}

/// Checks whether the bit at position `bit` (counting from the least
/// significant) is set in `value`.
fn bit_is_set(value: U256, bit: usize) -> bool {
    u32::try_from(bit).map_or(false, |b| (value >> b) & U256::ONE == U256::ONE)
}

impl std::ops::Add<KnownWord> for KnownWord {
    type Output = KnownWord;

    /// Performs wrapping addition of two known words.
    fn add(self, rhs: KnownWord) -> Self::Output {
        KnownWord::new(self.value.wrapping_add(rhs.value))
    }
}

impl std::ops::Mul<KnownWord> for KnownWord {
    type Output = KnownWord;

    /// Performs wrapping multiplication of two known words.
    fn mul(self, rhs: KnownWord) -> Self::Output {
        KnownWord::new(self.value.wrapping_mul(rhs.value))
    }
}

impl std::ops::Sub<KnownWord> for KnownWord {
    type Output = KnownWord;

    /// Performs wrapping subtraction of two known words.
    fn sub(self, rhs: KnownWord) -> Self::Output {
        KnownWord::new(self.value.wrapping_sub(rhs.value))
    }
}

impl std::ops::Div<KnownWord> for KnownWord {
    type Output = KnownWord;

    /// Performs unsigned division of two known words.
    fn div(self, rhs: KnownWord) -> Self::Output {
        if rhs.is_zero_value() {
            KnownWord::zero()
        } else {
            KnownWord::new(self.value / rhs.value)
        }
    }
}

impl std::ops::Rem<KnownWord> for KnownWord {
    type Output = KnownWord;

    /// Performs unsigned modulo of two known words.
    fn rem(self, rhs: KnownWord) -> Self::Output {
        if rhs.is_zero_value() {
            KnownWord::zero()
        } else {
            KnownWord::new(self.value % rhs.value)
        }
    }
}

impl std::ops::BitAnd<KnownWord> for KnownWord {
    type Output = KnownWord;

    fn bitand(self, rhs: KnownWord) -> Self::Output {
        KnownWord::new(self.value & rhs.value)
    }
}

impl std::ops::BitOr<KnownWord> for KnownWord {
    type Output = KnownWord;

    fn bitor(self, rhs: KnownWord) -> Self::Output {
        KnownWord::new(self.value | rhs.value)
    }
}

impl std::ops::BitXor<KnownWord> for KnownWord {
    type Output = KnownWord;

    fn bitxor(self, rhs: KnownWord) -> Self::Output {
        KnownWord::new(self.value ^ rhs.value)
    }
}

impl std::ops::Not for KnownWord {
    type Output = KnownWord;

    /// Computes the bitwise negation of `self`.
    fn not(self) -> Self::Output {
        KnownWord::new(!self.value)
    }
}

impl From<u32> for KnownWord {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<U256> for KnownWord {
    fn from(value: U256) -> Self {
        Self { value }
    }
}

impl From<KnownWord> for U256 {
    fn from(value: KnownWord) -> Self {
        value.value
    }
}

impl From<bool> for KnownWord {
    /// Obtains a known word from a [`bool`], following the EVM convention of
    /// `1` for true and `0` for false.
    fn from(value: bool) -> Self {
        if value {
            Self::one()
        } else {
            Self::zero()
        }
    }
}

/// Pretty-prints the known word as a hexadecimal-encoded number using
/// big-endian byte ordering as it is easier for humans to work with.
impl Display for KnownWord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let str = hex::encode(self.value.to_be_bytes());
        let str = str.trim_start_matches('0');
        let str = if str.is_empty() { "0" } else { str };
        write!(f, "0x{str}")
    }
}
