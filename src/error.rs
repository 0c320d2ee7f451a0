//! Error types for the individual stages of the pipeline.
//!
//! Geometric, interface-construction and assembly errors are unrecoverable
//! precondition violations: the offending call fails fast and returns no
//! partial result. Solver errors are surfaced to the caller, who may decide
//! to constrain or re-assemble the system.

use std::error::Error;
use std::fmt;

/// Geometric precondition violations detected while building mappings or bases.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GeometryError {
    /// An element whose reference-to-physical map has a non-positive Jacobian
    /// determinant (degenerate or inverted element).
    DegenerateElement {
        element_index: usize,
        jacobian_determinant: f64,
    },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateElement {
                element_index,
                jacobian_determinant,
            } => write!(
                f,
                "element {} is degenerate or inverted (Jacobian determinant {:.3e})",
                element_index, jacobian_determinant
            ),
        }
    }
}

impl Error for GeometryError {}

/// Failures while constructing a mortar interface mesh from two parent meshes.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum InterfaceError {
    /// No boundary facet of the given side satisfied the matching predicate.
    NoMatchingFacets { side: usize },
    /// A mortar segment is not covered by any facet of the given side.
    UncoveredSegment { segment_index: usize, side: usize },
}

impl fmt::Display for InterfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatchingFacets { side } => {
                write!(f, "no boundary facets of side {} match the interface predicate", side)
            }
            Self::UncoveredSegment { segment_index, side } => write!(
                f,
                "mortar segment {} is not covered by any facet of side {}",
                segment_index, side
            ),
        }
    }
}

impl Error for InterfaceError {}

/// Failures while building a basis or assembling a global matrix/vector.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AssemblyError {
    /// A geometric error encountered while precomputing quadrature data.
    Geometry(GeometryError),
    /// No quadrature rule available for the requested order.
    UnsupportedQuadratureOrder { order: usize },
    /// Trial and test bases do not integrate over the same elements.
    IncompatibleBases {
        trial_elements: usize,
        test_elements: usize,
    },
    /// Trial and test bases disagree on the quadrature layout of an element.
    IncompatibleQuadrature {
        element_index: usize,
        trial_points: usize,
        test_points: usize,
    },
}

impl fmt::Display for AssemblyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geometry(err) => err.fmt(f),
            Self::UnsupportedQuadratureOrder { order } => {
                write!(f, "no quadrature rule available for order {}", order)
            }
            Self::IncompatibleBases {
                trial_elements,
                test_elements,
            } => write!(
                f,
                "trial basis has {} elements but test basis has {}",
                trial_elements, test_elements
            ),
            Self::IncompatibleQuadrature {
                element_index,
                trial_points,
                test_points,
            } => write!(
                f,
                "trial and test bases disagree on the quadrature of element {} ({} vs {} points)",
                element_index, trial_points, test_points
            ),
        }
    }
}

impl Error for AssemblyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Geometry(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GeometryError> for AssemblyError {
    fn from(err: GeometryError) -> Self {
        Self::Geometry(err)
    }
}

/// Failures reported by the linear solver.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SolveError {
    /// The factorization failed because the matrix is not positive definite,
    /// e.g. ill-posed boundary conditions leaving a rigid-body mode
    /// unconstrained.
    NotPositiveDefinite,
    /// The matrix is singular to working precision.
    Singular,
    /// The dimensions of the matrix, right-hand side or index set disagree.
    ShapeMismatch { expected: usize, found: usize },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPositiveDefinite => {
                write!(f, "matrix is not positive definite; the system may be ill-posed")
            }
            Self::Singular => write!(f, "matrix is singular to working precision"),
            Self::ShapeMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {}, found {}", expected, found)
            }
        }
    }
}

impl Error for SolveError {}
