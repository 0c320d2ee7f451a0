//! Quadrature rules on the reference domains, adapted to `nalgebra` points.
//!
//! The raw rules live in the `mortar2d-quadrature` crate; this module selects
//! a rule for a requested order and converts its points into the point types
//! used by the rest of the engine.

pub use mortar2d_quadrature::Error as QuadratureError;

use nalgebra::{Point1, Point2};

/// A quadrature rule as a pair of weights and points.
pub type QuadraturePair<P> = (Vec<f64>, Vec<P>);
pub type QuadraturePair1d = QuadraturePair<Point1<f64>>;
pub type QuadraturePair2d = QuadraturePair<Point2<f64>>;

/// Returns a rule for the reference triangle that is exact for polynomials
/// of total degree up to `order`.
pub fn triangle_quadrature(order: usize) -> Result<QuadraturePair2d, QuadratureError> {
    let (weights, points) = mortar2d_quadrature::triangle::triangle(order)?;
    let points = points.into_iter().map(|p| Point2::new(p[0], p[1])).collect();
    Ok((weights, points))
}

/// Returns the smallest Gauss rule on the reference interval `[-1, 1]` that
/// is exact for polynomials of degree up to `order`.
pub fn segment_quadrature(order: usize) -> Result<QuadraturePair1d, QuadratureError> {
    // n Gauss points are exact up to degree 2n - 1
    let num_points = order / 2 + 1;
    let (weights, points) = mortar2d_quadrature::univariate::gauss(num_points);
    let points = points.into_iter().map(|p| Point1::new(p[0])).collect();
    Ok((weights, points))
}
