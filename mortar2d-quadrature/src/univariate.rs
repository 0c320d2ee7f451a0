//! Quadrature rules for the one-dimensional reference domain `[-1, 1]`.

use crate::Rule;
use std::f64::consts::PI;

/// Evaluates the Legendre polynomial `P_n` and its derivative at `x`.
///
/// Uses the three-term recurrence
///   `m P_m(x) = (2m - 1) x P_{m-1}(x) - (m - 1) P_{m-2}(x)`
/// for the value and the relation
///   `P_n'(x) = n (x P_n(x) - P_{n-1}(x)) / (x^2 - 1)`
/// for the derivative. The derivative formula is singular at `|x| == 1`, so
/// this is only valid on the open interval `(-1, 1)`, which is where all
/// Gauss points live.
fn legendre_value_and_derivative(n: usize, x: f64) -> (f64, f64) {
    let mut current = 1.0;
    let mut previous = 0.0;
    for m in 1..=n {
        let m = m as f64;
        let next = ((2.0 * m - 1.0) * x * current - (m - 1.0) * previous) / m;
        previous = current;
        current = next;
    }
    let derivative = n as f64 * (x * current - previous) / (x * x - 1.0);
    (current, derivative)
}

/// Gauss quadrature for the reference interval `[-1, 1]`.
///
/// Returns the [Gauss quadrature rule] with the given number of points. Given `n` points,
/// the rule integrates polynomials of degree up to `2n - 1` exactly.
///
/// # Panics
///
/// Panics if zero points are requested.
///
/// [Gauss quadrature rule]: https://en.wikipedia.org/wiki/Gaussian_quadrature
pub fn gauss(num_points: usize) -> Rule<1> {
    let n = num_points;
    assert!(n > 0, "number of points must be positive");

    let mut weights = Vec::with_capacity(n);
    let mut points = Vec::with_capacity(n);

    // The points are symmetric about the origin, so we only solve for the
    // first half and mirror the rest.
    let m = (n + 1) / 2;
    for i in 0..m {
        // Standard initial guess for the i-th root of P_n, followed by
        // Newton iterations on the Legendre recurrence.
        let mut x = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        let (mut p, mut dp) = legendre_value_and_derivative(n, x);
        loop {
            let dx = -p / dp;
            x += dx;
            let (p_new, dp_new) = legendre_value_and_derivative(n, x);
            p = p_new;
            dp = dp_new;
            if dx.abs() <= 1e-15 {
                break;
            }
        }

        let w = 2.0 / ((1.0 - x * x) * dp * dp);
        points.push([x]);
        weights.push(w);
    }

    for i in m..n {
        let mirror = n - i - 1;
        points.push([-points[mirror][0]]);
        weights.push(weights[mirror]);
    }

    debug_assert_eq!(points.len(), n);
    (weights, points)
}
