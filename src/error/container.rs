//! Generic wrappers that attach bytecode locations to errors and aggregate
//! multiple errors together.

use std::fmt::Formatter;

use itertools::Itertools;
use thiserror::Error;

/// An error that is localised to a particular program counter in the
/// bytecode.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub struct Located<E>
where
    E: Clone,
{
    /// The program counter at which the error occurred.
    pub location: u32,

    /// The error data
    pub payload: E,
}

/// Displays the error prefixed by the hexadecimal program counter at which it
/// occurred.
impl<E> std::fmt::Display for Located<E>
where
    E: std::fmt::Display + Clone,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:#06x}]: {}", self.location, self.payload)
    }
}

/// A trait for types that can have a program counter attached to them.
pub trait Locatable
where
    Self: Sized,
{
    /// The return type with the attached location.
    type Located;

    /// Attach the program counter `pc` to the error.
    fn locate(self, pc: u32) -> Self::Located;
}

/// A blanket implementation that allows for attaching a location to the error
/// in any result.
impl<T, E> Locatable for Result<T, E>
where
    E: std::error::Error + Clone,
{
    type Located = Result<T, Located<E>>;

    fn locate(self, pc: u32) -> Self::Located {
        self.map_err(|e| Located {
            location: pc,
            payload:  e,
        })
    }
}

/// An error that is a collection of errors.
///
/// Errors are kept in the order in which they were added, except for located
/// errors added through [`Errors::add_located`], which are kept sorted by
/// their program counter.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub struct Errors<E> {
    payloads: Vec<E>,
}

impl<E> Errors<E> {
    /// Creates a new container for errors.
    #[must_use]
    pub fn new() -> Self {
        Self { payloads: vec![] }
    }

    /// Gets the errors contained within this error.
    #[must_use]
    pub fn payloads(&self) -> &[E] {
        self.payloads.as_slice()
    }

    /// Gets the number of errors in the container.
    #[must_use]
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    /// Checks if the errors container is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Adds the provided `error` to the container.
    pub fn add(&mut self, error: E) {
        self.payloads.push(error);
    }
}

impl<E> Errors<Located<E>>
where
    E: Clone,
{
    /// Adds an error `payload` at the program counter `pc`.
    pub fn add_located(&mut self, pc: u32, payload: E) {
        self.payloads.push(Located {
            location: pc,
            payload,
        });
        self.payloads.sort_by_key(|item| item.location);
    }
}

impl<E> Default for Errors<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Allow conversion from any error type to a container of errors.
impl<E> From<E> for Errors<E>
where
    E: std::error::Error,
{
    fn from(value: E) -> Self {
        Self {
            payloads: vec![value],
        }
    }
}

impl<E> From<Errors<E>> for Vec<E> {
    fn from(value: Errors<E>) -> Self {
        value.payloads
    }
}

impl<E> From<Vec<E>> for Errors<E> {
    fn from(value: Vec<E>) -> Self {
        Self { payloads: value }
    }
}

/// Displays a header with the number of errors, followed by one error per
/// line.
impl<E> std::fmt::Display for Errors<E>
where
    E: std::fmt::Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.payloads.is_empty() {
            write!(f, "Encountered no errors")
        } else {
            writeln!(f, "Encountered {} errors:", self.payloads.len())?;
            write!(f, "{}", self.payloads.iter().join("\n"))
        }
    }
}

#[cfg(test)]
mod test {
    use crate::error::{
        cfg,
        container::{Errors, Locatable, Located},
    };

    fn missing(target: u32) -> cfg::Error {
        cfg::Error::MissingJumpTarget { target }
    }

    #[test]
    fn can_locate_a_result() {
        let result: Result<(), cfg::Error> = Err(missing(0x40));
        let located = result.locate(0x20).expect_err("Result was not an error");

        assert_eq!(located.location, 0x20);
        assert_eq!(located.payload, missing(0x40));
        assert_eq!(
            located.to_string(),
            "[0x0020]: The jump target 0x40 does not lie within any basic block"
        );
    }

    #[test]
    fn keeps_located_errors_sorted() {
        let mut errors: Errors<Located<cfg::Error>> = Errors::new();
        errors.add_located(7, missing(1));
        errors.add_located(2, missing(2));
        errors.add_located(4, missing(3));

        let locations: Vec<u32> = errors.payloads().iter().map(|e| e.location).collect();
        assert_eq!(locations, vec![2, 4, 7]);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn displays_empty_container() {
        let errors: Errors<Located<cfg::Error>> = Errors::default();
        assert!(errors.is_empty());
        assert_eq!(errors.to_string(), "Encountered no errors");
    }
}
