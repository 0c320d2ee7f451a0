//! Symmetric quadrature rules for the reference triangle.
//!
//! The reference triangle has vertices `(0, 0)`, `(1, 0)` and `(0, 1)`. Rules
//! are indexed by *strength*: the highest total polynomial degree integrated
//! exactly. The point sets are the classical symmetric rules (Hammer-Stroud /
//! Dunavant); weights sum to the reference area `1/2`.

use crate::{Error, Rule2d};

/// The highest strength for which [`triangle`] has a rule available.
pub const MAX_TRIANGLE_STRENGTH: usize = 5;

/// Returns a quadrature rule for the reference triangle that integrates
/// polynomials of total degree up to `strength` exactly.
///
/// Returns [`Error::NoRuleAvailable`] if `strength` exceeds
/// [`MAX_TRIANGLE_STRENGTH`].
pub fn triangle(strength: usize) -> Result<Rule2d, Error> {
    // Each symmetric orbit (a, a), (1 - 2a, a), (a, 1 - 2a) shares one weight.
    let orbit = |a: f64| [[a, a], [1.0 - 2.0 * a, a], [a, 1.0 - 2.0 * a]];
    let centroid = [1.0 / 3.0, 1.0 / 3.0];

    let rule = match strength {
        0 | 1 => (vec![0.5], vec![centroid]),
        2 => {
            let points = orbit(1.0 / 6.0).to_vec();
            (vec![1.0 / 6.0; 3], points)
        }
        3 => {
            // Four points with a negative centroid weight.
            let mut points = vec![centroid];
            points.extend(orbit(0.2));
            let mut weights = vec![-27.0 / 96.0];
            weights.extend([25.0 / 96.0; 3]);
            (weights, points)
        }
        4 => {
            let a = 0.445948490915965;
            let b = 0.091576213509771;
            let mut points = orbit(a).to_vec();
            points.extend(orbit(b));
            let mut weights = vec![0.223381589678011 / 2.0; 3];
            weights.extend([0.109951743655322 / 2.0; 3]);
            (weights, points)
        }
        5 => {
            let a = 0.470142064105115;
            let b = 0.101286507323456;
            let mut points = vec![centroid];
            points.extend(orbit(a));
            points.extend(orbit(b));
            let mut weights = vec![0.225 / 2.0];
            weights.extend([0.132394152788506 / 2.0; 3]);
            weights.extend([0.125939180544827 / 2.0; 3]);
            (weights, points)
        }
        _ => return Err(Error::NoRuleAvailable),
    };

    Ok(rule)
}
