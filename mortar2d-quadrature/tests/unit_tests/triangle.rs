use matrixcompare::assert_scalar_eq;
use mortar2d_quadrature::triangle::{triangle, MAX_TRIANGLE_STRENGTH};
use mortar2d_quadrature::Error;

/// Exact integral of `x^a y^b` over the reference triangle:
/// `a! b! / (a + b + 2)!`.
fn monomial_integral(a: u32, b: u32) -> f64 {
    let factorial = |k: u32| (1..=k).map(|i| i as f64).product::<f64>();
    factorial(a) * factorial(b) / factorial(a + b + 2)
}

#[test]
fn triangle_weights_sum_to_reference_area() {
    for strength in 0..=MAX_TRIANGLE_STRENGTH {
        let (weights, points) = triangle(strength).unwrap();
        assert_eq!(weights.len(), points.len());
        let sum: f64 = weights.iter().sum();
        assert_scalar_eq!(sum, 0.5, comp = abs, tol = 1e-14);
    }
}

#[test]
fn triangle_points_lie_in_reference_triangle() {
    for strength in 0..=MAX_TRIANGLE_STRENGTH {
        let (_, points) = triangle(strength).unwrap();
        for p in points {
            assert!(p[0] >= 0.0 && p[1] >= 0.0 && p[0] + p[1] <= 1.0 + 1e-14);
        }
    }
}

#[test]
fn triangle_integrates_monomials_exactly() {
    for strength in 1..=MAX_TRIANGLE_STRENGTH {
        let (weights, points) = triangle(strength).unwrap();
        for a in 0..=strength as u32 {
            for b in 0..=(strength as u32 - a) {
                let integral: f64 = weights
                    .iter()
                    .zip(&points)
                    .map(|(w, p)| w * p[0].powi(a as i32) * p[1].powi(b as i32))
                    .sum();
                assert_scalar_eq!(integral, monomial_integral(a, b), comp = abs, tol = 1e-12);
            }
        }
    }
}

#[test]
fn triangle_rejects_unsupported_strength() {
    assert_eq!(
        triangle(MAX_TRIANGLE_STRENGTH + 1),
        Err(Error::NoRuleAvailable)
    );
}
