//! Quadrature rules for the reference domains used by `mortar2d`.
//!
//! The rules here are plain `(weights, points)` pairs over the reference
//! domains and carry no dependency on the rest of the engine, so they can be
//! used independently.
//!
//! Reference domain conventions:
//!
//! - The reference segment is the interval `[-1, 1]`.
//! - The reference triangle has vertices `(0, 0)`, `(1, 0)` and `(0, 1)`;
//!   the weights of a triangle rule sum to its area `1/2`.

use std::fmt;
use std::fmt::{Display, Formatter};

pub mod triangle;
pub mod univariate;

/// Library-wide error type.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Indicates that a rule satisfying the given requirements is not available.
    NoRuleAvailable,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRuleAvailable => {
                write!(f, "There is no quadrature rule satisfying the requirements available")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A D-dimensional point.
pub type Point<const D: usize> = [f64; D];

/// A D-dimensional rule.
pub type Rule<const D: usize> = (Vec<f64>, Vec<Point<D>>);

/// A one-dimensional quadrature rule.
pub type Rule1d = Rule<1>;

/// A two-dimensional quadrature rule.
pub type Rule2d = Rule<2>;
