//! Transfer functions for the opcodes that perform arithmetic on the EVM.
//!
//! Throughout, `x` is the operand that was on the top of the stack and `y` is
//! the one below it.
//!
//! | Opcode       | Result                         |
//! | :----------: | :----------------------------: |
//! | `ADD`        | `(x + y) % 2**256`             |
//! | `MUL`        | `(x * y) % 2**256`             |
//! | `SUB`        | `(x - y) % 2**256`             |
//! | `DIV`        | `x / y`, or 0 if `y == 0`      |
//! | `SDIV`       | signed `x / y`                 |
//! | `MOD`        | `x % y`, or 0 if `y == 0`      |
//! | `SMOD`       | signed `x % y`                 |
//! | `ADDMOD`     | `(x + y) % N`, or 0 if `N == 0`|
//! | `MULMOD`     | `(x * y) % N`, or 0 if `N == 0`|
//! | `EXP`        | `x ** y % 2**256`              |
//! | `SIGNEXTEND` | `y` extended from byte `x`     |

use crate::{
    opcode::Opcode,
    vm::{
        step::Step,
        value::{known::KnownWord, AbstractValue},
    },
};

/// Executes the arithmetic instruction in `step`.
pub fn transfer(step: &mut Step<'_>) {
    let opcode = step.opcode();
    let result = match opcode {
        Opcode::AddMod | Opcode::MulMod => {
            let [x, y, n] = step.pop_operands::<3>();
            ternary(opcode, x, y, n)
        }
        _ => {
            let [x, y] = step.pop_operands::<2>();
            binary(opcode, x, y)
        }
    };
    step.push_result(result);
}

/// Evaluates a two-operand arithmetic `opcode` over the abstract domain.
///
/// When both operands are known the result is computed exactly. Otherwise the
/// result may still be known if one operand absorbs the other, such as a
/// multiplication by zero.
#[must_use]
pub fn binary(opcode: Opcode, x: AbstractValue, y: AbstractValue) -> AbstractValue {
    match (x.concrete(), y.concrete()) {
        (Some(x), Some(y)) => exact(opcode, x, y).into(),
        _ => absorb(opcode, x, y),
    }
}

/// Evaluates `ADDMOD` or `MULMOD` over the abstract domain.
#[must_use]
pub fn ternary(
    opcode: Opcode,
    x: AbstractValue,
    y: AbstractValue,
    n: AbstractValue,
) -> AbstractValue {
    let zero = KnownWord::zero();

    if let (Some(x), Some(y), Some(n)) = (x.concrete(), y.concrete(), n.concrete()) {
        return match opcode {
            Opcode::AddMod => x.add_mod(y, n).into(),
            Opcode::MulMod => x.mul_mod(y, n).into(),
            _ => AbstractValue::Top,
        };
    }

    // Everything is congruent to zero modulo zero or one.
    if n.is(zero) || n.is(KnownWord::one()) {
        return zero.into();
    }

    match opcode {
        Opcode::MulMod if x.is(zero) || y.is(zero) => zero.into(),
        _ => AbstractValue::Top,
    }
}

/// Computes the exact result of `opcode` on known operands.
fn exact(opcode: Opcode, x: KnownWord, y: KnownWord) -> Option<KnownWord> {
    let result = match opcode {
        Opcode::Add => x + y,
        Opcode::Mul => x * y,
        Opcode::Sub => x - y,
        Opcode::Div => x / y,
        Opcode::SDiv => x.signed_div(y),
        Opcode::Mod => x % y,
        Opcode::SMod => x.signed_rem(y),
        Opcode::Exp => x.exp(y),
        Opcode::SignExtend => y.sign_extend(x),
        _ => return None,
    };
    Some(result)
}

/// Computes what can be known about the result of `opcode` when at least one
/// operand is unknown.
fn absorb(opcode: Opcode, x: AbstractValue, y: AbstractValue) -> AbstractValue {
    let zero = KnownWord::zero();
    let one = KnownWord::one();

    match opcode {
        Opcode::Mul if x.is(zero) || y.is(zero) => zero.into(),
        Opcode::Div | Opcode::SDiv | Opcode::Mod | Opcode::SMod if x.is(zero) || y.is(zero) => {
            zero.into()
        }
        Opcode::Mod | Opcode::SMod if y.is(one) => zero.into(),
        Opcode::SMod if y.is(KnownWord::max()) => zero.into(),
        Opcode::Exp if y.is(zero) || x.is(one) => one.into(),
        Opcode::SignExtend if y.is(zero) => zero.into(),
        Opcode::SignExtend if x.concrete().map_or(false, |b| b.to_u32().map_or(true, |b| b >= 31)) => {
            y
        }
        _ => AbstractValue::Top,
    }
}
