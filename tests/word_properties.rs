//! This module is an integration test that checks the 256-bit word arithmetic
//! against an arbitrary-precision reference.
#![cfg(test)]

use evm_fact_extractor::vm::value::known::KnownWord;
use num_bigint::BigUint;
use proptest::prelude::*;

fn word(bytes: [u8; 32]) -> KnownWord {
    KnownWord::from_be_bytes(bytes)
}

fn big(word: KnownWord) -> BigUint {
    BigUint::from_bytes_be(&word.bytes_be())
}

fn modulus() -> BigUint {
    BigUint::from(1u32) << 256u32
}

proptest! {
    #[test]
    fn addition_is_commutative(x in any::<[u8; 32]>(), y in any::<[u8; 32]>()) {
        prop_assert_eq!(word(x) + word(y), word(y) + word(x));
    }

    #[test]
    fn zero_is_the_additive_identity(x in any::<[u8; 32]>()) {
        prop_assert_eq!(word(x) + KnownWord::zero(), word(x));
    }

    #[test]
    fn wrapping_arithmetic_matches_reference(x in any::<[u8; 32]>(), y in any::<[u8; 32]>()) {
        let (a, b) = (big(word(x)), big(word(y)));

        prop_assert_eq!(big(word(x) + word(y)), (&a + &b) % modulus());
        prop_assert_eq!(big(word(x) * word(y)), (&a * &b) % modulus());
        prop_assert_eq!(big(word(x) - word(y)), (&a + modulus() - &b) % modulus());
        prop_assert!(big(word(x) * word(y)) < modulus());
    }

    #[test]
    fn division_matches_reference(x in any::<[u8; 32]>(), y in any::<[u8; 32]>()) {
        let (a, b) = (big(word(x)), big(word(y)));
        prop_assume!(b != BigUint::from(0u32));

        prop_assert_eq!(big(word(x) / word(y)), &a / &b);
        prop_assert_eq!(big(word(x) % word(y)), &a % &b);
    }

    #[test]
    fn division_by_zero_is_zero(x in any::<[u8; 32]>()) {
        prop_assert_eq!(word(x) / KnownWord::zero(), KnownWord::zero());
        prop_assert_eq!(word(x) % KnownWord::zero(), KnownWord::zero());
        prop_assert_eq!(word(x).signed_div(KnownWord::zero()), KnownWord::zero());
        prop_assert_eq!(word(x).signed_rem(KnownWord::zero()), KnownWord::zero());
    }

    #[test]
    fn modular_arithmetic_does_not_wrap_early(
        x in any::<[u8; 32]>(),
        y in any::<[u8; 32]>(),
        m in any::<[u8; 32]>(),
    ) {
        let (a, b, n) = (big(word(x)), big(word(y)), big(word(m)));
        let expected_add = if n == BigUint::from(0u32) { n.clone() } else { (&a + &b) % &n };
        let expected_mul = if n == BigUint::from(0u32) { n.clone() } else { (&a * &b) % &n };

        prop_assert_eq!(big(word(x).add_mod(word(y), word(m))), expected_add);
        prop_assert_eq!(big(word(x).mul_mod(word(y), word(m))), expected_mul);
    }

    #[test]
    fn exponentiation_matches_reference(x in any::<[u8; 32]>(), e in any::<u32>()) {
        let exponent = KnownWord::from(e);
        let expected = big(word(x)).modpow(&BigUint::from(e), &modulus());

        prop_assert_eq!(big(word(x).exp(exponent)), expected);
    }

    #[test]
    fn shifts_match_reference(x in any::<[u8; 32]>(), shift in 0u32..300) {
        let a = big(word(x));
        let amount = KnownWord::from(shift);
        let expected_left = if shift >= 256 { BigUint::from(0u32) } else { (&a << shift) % modulus() };
        let expected_right = if shift >= 256 { BigUint::from(0u32) } else { &a >> shift };

        prop_assert_eq!(big(word(x).shl(amount)), expected_left);
        prop_assert_eq!(big(word(x).shr(amount)), expected_right);
    }

    #[test]
    fn byte_extracts_from_the_most_significant_end(x in any::<[u8; 32]>(), index in 0u32..40) {
        let expected = x.get(index as usize).copied().unwrap_or(0);
        prop_assert_eq!(word(x).byte(KnownWord::from(index)), KnownWord::from(u32::from(expected)));
    }

    #[test]
    fn comparisons_match_reference(x in any::<[u8; 32]>(), y in any::<[u8; 32]>()) {
        let (a, b) = (big(word(x)), big(word(y)));

        prop_assert_eq!(word(x).lt(word(y)), KnownWord::from(a < b));
        prop_assert_eq!(word(x).gt(word(y)), KnownWord::from(a > b));
        prop_assert_eq!(word(x).eq(word(y)), KnownWord::from(a == b));
    }

    #[test]
    fn sign_extension_preserves_low_bytes(x in any::<[u8; 32]>(), byte in 0u32..32) {
        let extended = word(x).sign_extend(KnownWord::from(byte)).bytes_be();
        let kept = 31 - byte as usize;

        prop_assert_eq!(&extended[kept..], &x[kept..]);
        let fill = if x[kept] & 0x80 == 0 { 0x00 } else { 0xff };
        prop_assert!(extended[..kept].iter().all(|b| *b == fill));
    }
}

#[test]
fn sign_extension_past_the_word_is_reported() {
    let value = KnownWord::from(0xff_u32);
    assert_eq!(value.checked_sign_extend(KnownWord::from(32u32)), None);
    assert_eq!(value.sign_extend(KnownWord::from(32u32)), value);
}
