//! This module contains the definition of the [`AbstractValue`], the domain
//! over which the abstract interpreter computes.

pub mod known;

use std::fmt::{Display, Formatter};

use crate::vm::value::known::KnownWord;

/// An element of the two-point constant-propagation lattice.
///
/// A value is either [`AbstractValue::Concrete`], meaning that it is the same
/// word on every execution that reaches it, or [`AbstractValue::Top`], meaning
/// that nothing is known about it. No other points exist.
///
/// `Top` carries no data and is freely copied, so there is no shared state
/// between any two unknown values.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum AbstractValue {
    /// The value could be any word.
    #[default]
    Top,

    /// The value is statically known to be this word.
    Concrete(KnownWord),
}

impl AbstractValue {
    /// Gets the concrete word if the value is known.
    #[must_use]
    pub fn concrete(self) -> Option<KnownWord> {
        match self {
            Self::Concrete(word) => Some(word),
            Self::Top => None,
        }
    }

    /// Checks if nothing is known about the value.
    #[must_use]
    pub fn is_top(self) -> bool {
        matches!(self, Self::Top)
    }

    /// Checks if the value is statically known to be exactly `word`.
    #[must_use]
    pub fn is(self, word: KnownWord) -> bool {
        self == Self::Concrete(word)
    }

    /// Computes the least upper bound of `self` and `other`.
    ///
    /// The result is only concrete if both sides agree on the same word.
    #[must_use]
    pub fn join(self, other: Self) -> Self {
        if self == other {
            self
        } else {
            Self::Top
        }
    }

    /// Applies `op` to the known word, leaving `Top` untouched.
    #[must_use]
    pub fn map(self, op: impl FnOnce(KnownWord) -> KnownWord) -> Self {
        self.concrete().map_or(Self::Top, |word| Self::Concrete(op(word)))
    }
}

impl From<KnownWord> for AbstractValue {
    fn from(value: KnownWord) -> Self {
        Self::Concrete(value)
    }
}

impl From<Option<KnownWord>> for AbstractValue {
    fn from(value: Option<KnownWord>) -> Self {
        value.map_or(Self::Top, Self::Concrete)
    }
}

impl Display for AbstractValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Top => write!(f, "⊤"),
            Self::Concrete(word) => write!(f, "{word}"),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::vm::value::{known::KnownWord, AbstractValue};

    #[test]
    fn join_keeps_agreeing_values() {
        let three = AbstractValue::from(KnownWord::from(3u32));
        assert_eq!(three.join(three), three);
    }

    #[test]
    fn join_loses_disagreeing_values() {
        let three = AbstractValue::from(KnownWord::from(3u32));
        let four = AbstractValue::from(KnownWord::from(4u32));

        assert_eq!(three.join(four), AbstractValue::Top);
        assert_eq!(three.join(AbstractValue::Top), AbstractValue::Top);
        assert_eq!(AbstractValue::Top.join(AbstractValue::Top), AbstractValue::Top);
    }

    #[test]
    fn map_only_applies_to_known_values() {
        let three = AbstractValue::from(KnownWord::from(3u32));

        assert_eq!(three.map(|w| w + w), AbstractValue::from(KnownWord::from(6u32)));
        assert!(AbstractValue::Top.map(|w| w + w).is_top());
    }

    #[test]
    fn displays_unknown_values_as_top() {
        assert_eq!(AbstractValue::Top.to_string(), "⊤");
        assert_eq!(AbstractValue::from(KnownWord::from(0x10u32)).to_string(), "0x10");
    }
}
