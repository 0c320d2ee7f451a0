//! Static condensation of Dirichlet dofs and sparse direct solution.

use crate::error::SolveError;
use log::debug;
use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::factorization::CscCholesky;
use nalgebra_sparse::{CooMatrix, CscMatrix, CsrMatrix};

/// Returns the sorted complement of `fixed` in `0..num_dofs`.
///
/// # Panics
///
/// Panics if any fixed dof is out of range.
pub fn free_dofs(num_dofs: usize, fixed: &[usize]) -> Vec<usize> {
    let mut is_fixed = vec![false; num_dofs];
    for &dof in fixed {
        assert!(dof < num_dofs, "fixed dof {} out of range ({} dofs)", dof, num_dofs);
        is_fixed[dof] = true;
    }
    (0..num_dofs).filter(|&dof| !is_fixed[dof]).collect()
}

/// Eliminates the fixed dofs of `matrix * x = rhs` by static condensation.
///
/// Dofs not listed in `free` are fixed at their value in `prescribed`; their
/// columns are moved to the right-hand side (for zero prescribed values this
/// reduces to restricting rows and columns to `free`). Returns the reduced
/// matrix and right-hand side over the free dofs, in the order given by
/// `free`.
pub fn condense(
    matrix: &CsrMatrix<f64>,
    rhs: &DVector<f64>,
    free: &[usize],
    prescribed: &DVector<f64>,
) -> Result<(CsrMatrix<f64>, DVector<f64>), SolveError> {
    let n = matrix.nrows();
    if matrix.ncols() != n {
        return Err(SolveError::ShapeMismatch { expected: n, found: matrix.ncols() });
    }
    if rhs.len() != n {
        return Err(SolveError::ShapeMismatch { expected: n, found: rhs.len() });
    }
    if prescribed.len() != n {
        return Err(SolveError::ShapeMismatch { expected: n, found: prescribed.len() });
    }

    // Map original dof index -> reduced index
    let mut reduced_index = vec![usize::MAX; n];
    for (new, &old) in free.iter().enumerate() {
        if old >= n {
            return Err(SolveError::ShapeMismatch { expected: n, found: old });
        }
        reduced_index[old] = new;
    }

    let mut reduced_rhs = DVector::zeros(free.len());
    for (new, &old) in free.iter().enumerate() {
        reduced_rhs[new] = rhs[old];
    }

    let mut coo = CooMatrix::new(free.len(), free.len());
    for (i, j, &value) in matrix.triplet_iter() {
        let row = reduced_index[i];
        if row == usize::MAX {
            continue;
        }
        let col = reduced_index[j];
        if col == usize::MAX {
            // Fixed column: its known value contributes to the rhs
            reduced_rhs[row] -= value * prescribed[j];
        } else {
            coo.push(row, col, value);
        }
    }

    debug!("condensed system from {} to {} dofs", n, free.len());
    Ok((CsrMatrix::from(&coo), reduced_rhs))
}

/// Solves a symmetric positive definite sparse system with a direct Cholesky
/// factorization.
///
/// Fails with [`SolveError::NotPositiveDefinite`] if the factorization
/// encounters a non-positive pivot, e.g. when ill-posed boundary conditions
/// leave a rigid-body mode unconstrained.
pub fn solve_cholesky(
    matrix: &CsrMatrix<f64>,
    rhs: &DVector<f64>,
) -> Result<DVector<f64>, SolveError> {
    if matrix.nrows() != matrix.ncols() || matrix.nrows() != rhs.len() {
        return Err(SolveError::ShapeMismatch {
            expected: matrix.nrows(),
            found: rhs.len(),
        });
    }

    let csc = CscMatrix::from(matrix);
    let factorization = CscCholesky::factor(&csc).map_err(|_| SolveError::NotPositiveDefinite)?;
    let rhs_matrix = DMatrix::from_column_slice(rhs.len(), 1, rhs.as_slice());
    let solution = factorization.solve(&rhs_matrix);
    debug!("solved {} unknowns by sparse Cholesky", rhs.len());
    Ok(DVector::from_column_slice(solution.as_slice()))
}

/// Solves a moderately sized (possibly indefinite) sparse system by dense LU
/// factorization.
///
/// The matrix is densified first, so this is intended for condensed systems
/// of moderate size where the Cholesky route is unavailable because the
/// matrix is not positive definite.
pub fn solve_dense_lu(
    matrix: &CsrMatrix<f64>,
    rhs: &DVector<f64>,
) -> Result<DVector<f64>, SolveError> {
    if matrix.nrows() != matrix.ncols() || matrix.nrows() != rhs.len() {
        return Err(SolveError::ShapeMismatch {
            expected: matrix.nrows(),
            found: rhs.len(),
        });
    }

    let dense = DMatrix::from(matrix);
    let lu = dense.lu();
    lu.solve(rhs).ok_or(SolveError::Singular)
}

/// Scatters a reduced solution back into the full dof space, leaving fixed
/// dofs at their prescribed values.
pub fn scatter(free: &[usize], reduced: &DVector<f64>, prescribed: &DVector<f64>) -> DVector<f64> {
    assert_eq!(free.len(), reduced.len(), "one reduced value per free dof required");
    let mut full = prescribed.clone();
    for (new, &old) in free.iter().enumerate() {
        full[old] = reduced[new];
    }
    full
}

/// Condenses, solves and scatters in one step: the full-space solution of
/// `matrix * x = rhs` with the non-free dofs fixed at `prescribed`.
pub fn solve_condensed(
    matrix: &CsrMatrix<f64>,
    rhs: &DVector<f64>,
    free: &[usize],
    prescribed: &DVector<f64>,
) -> Result<DVector<f64>, SolveError> {
    let (reduced_matrix, reduced_rhs) = condense(matrix, rhs, free, prescribed)?;
    let reduced_solution = solve_cholesky(&reduced_matrix, &reduced_rhs)?;
    Ok(scatter(free, &reduced_solution, prescribed))
}
