//! Transfer functions for the comparison, bitwise and shifting opcodes.
//!
//! As with arithmetic, `x` is the operand from the top of the stack and `y` is
//! the one below it. Comparisons produce the word `1` for true and `0` for
//! false.

use ethnum::I256;

use crate::{
    opcode::Opcode,
    vm::{
        step::Step,
        value::{known::KnownWord, AbstractValue},
    },
};

/// Executes the logic instruction in `step`.
pub fn transfer(step: &mut Step<'_>) {
    let opcode = step.opcode();
    let result = match opcode {
        Opcode::IsZero | Opcode::Not => {
            let [x] = step.pop_operands::<1>();
            unary(opcode, x)
        }
        _ => {
            let [x, y] = step.pop_operands::<2>();
            binary(opcode, x, y)
        }
    };
    step.push_result(result);
}

/// Evaluates `ISZERO` or `NOT` over the abstract domain.
#[must_use]
pub fn unary(opcode: Opcode, x: AbstractValue) -> AbstractValue {
    match opcode {
        Opcode::IsZero => x.map(KnownWord::is_zero),
        Opcode::Not => x.map(|x| !x),
        _ => AbstractValue::Top,
    }
}

/// Evaluates a two-operand logic `opcode` over the abstract domain.
///
/// Some results are known even when one operand is not. `x AND 0` is zero
/// whatever `x` is, and nothing is below zero, for instance.
#[must_use]
pub fn binary(opcode: Opcode, x: AbstractValue, y: AbstractValue) -> AbstractValue {
    match (x.concrete(), y.concrete()) {
        (Some(x), Some(y)) => exact(opcode, x, y).into(),
        _ => absorb(opcode, x, y),
    }
}

fn exact(opcode: Opcode, x: KnownWord, y: KnownWord) -> Option<KnownWord> {
    let result = match opcode {
        Opcode::Lt => x.lt(y),
        Opcode::Gt => x.gt(y),
        Opcode::SLt => x.signed_lt(y),
        Opcode::SGt => x.signed_gt(y),
        Opcode::Eq => x.eq(y),
        Opcode::And => x & y,
        Opcode::Or => x | y,
        Opcode::Xor => x ^ y,
        Opcode::Byte => y.byte(x),
        Opcode::Shl => y.shl(x),
        Opcode::Shr => y.shr(x),
        Opcode::Sar => y.sar(x),
        _ => return None,
    };
    Some(result)
}

fn absorb(opcode: Opcode, x: AbstractValue, y: AbstractValue) -> AbstractValue {
    let zero = KnownWord::zero();
    let max = KnownWord::max();
    let signed_min = KnownWord::from_signed(I256::MIN);
    let signed_max = KnownWord::from_signed(I256::MAX);
    let at_least = |value: AbstractValue, bound: u32| {
        value.concrete().map_or(false, |v| v.to_u32().map_or(true, |v| v >= bound))
    };

    match opcode {
        Opcode::And if x.is(zero) || y.is(zero) => zero.into(),
        Opcode::Or if x.is(max) || y.is(max) => max.into(),
        Opcode::Lt if y.is(zero) || x.is(max) => zero.into(),
        Opcode::Gt if x.is(zero) || y.is(max) => zero.into(),
        Opcode::SLt if y.is(signed_min) || x.is(signed_max) => zero.into(),
        Opcode::SGt if x.is(signed_min) || y.is(signed_max) => zero.into(),
        Opcode::Byte if y.is(zero) || at_least(x, 32) => zero.into(),
        Opcode::Shl | Opcode::Shr if y.is(zero) || at_least(x, 256) => zero.into(),
        Opcode::Sar if y.is(zero) => zero.into(),
        Opcode::Sar if y.is(max) => max.into(),
        _ => AbstractValue::Top,
    }
}
