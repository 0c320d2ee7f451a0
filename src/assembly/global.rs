//! Global assembly drivers.

use crate::assembly::{BilinearForm, LinearForm};
use crate::basis::AssemblyBasis;
use crate::error::AssemblyError;
use log::debug;
use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::{CooMatrix, CsrMatrix};
use rayon::prelude::*;

/// Verifies that trial and test bases integrate over the same elements with
/// the same quadrature layout.
fn check_compatible(
    trial: &(impl AssemblyBasis + ?Sized),
    test: &(impl AssemblyBasis + ?Sized),
) -> Result<(), AssemblyError> {
    if trial.num_elements() != test.num_elements() {
        return Err(AssemblyError::IncompatibleBases {
            trial_elements: trial.num_elements(),
            test_elements: test.num_elements(),
        });
    }
    for element_index in 0..trial.num_elements() {
        let trial_points = trial.element_quadrature_size(element_index);
        let test_points = test.element_quadrature_size(element_index);
        if trial_points != test_points {
            return Err(AssemblyError::IncompatibleQuadrature {
                element_index,
                trial_points,
                test_points,
            });
        }
    }
    Ok(())
}

/// Assembles the global matrix of a bilinear form.
///
/// The result has one row per test dof and one column per trial dof; for the
/// usual Galerkin case, pass the same basis twice. Trial and test bases must
/// share the element loop and the quadrature points (the test basis supplies
/// weights and geometric context); for interface bases this holds by
/// construction for any pair of sides of one interface.
///
/// Local element matrices are computed in parallel into disjoint buffers and
/// merged sequentially, so the result is deterministic for fixed inputs.
pub fn assemble_bilinear<F, U, V>(form: &F, trial: &U, test: &V) -> eyre::Result<CsrMatrix<f64>>
where
    F: BilinearForm + Sync,
    U: AssemblyBasis + Sync,
    V: AssemblyBasis + Sync,
{
    check_compatible(trial, test)?;

    let local_matrices: Vec<_> = (0..test.num_elements())
        .into_par_iter()
        .map(|element_index| {
            let num_test_dofs = test.element_dof_count(element_index);
            let num_trial_dofs = trial.element_dof_count(element_index);

            let mut rows = vec![0; num_test_dofs];
            test.populate_element_dofs(&mut rows, element_index);
            let mut cols = vec![0; num_trial_dofs];
            trial.populate_element_dofs(&mut cols, element_index);

            let mut element_matrix = DMatrix::zeros(num_test_dofs, num_trial_dofs);
            for point_index in 0..test.element_quadrature_size(element_index) {
                let dx = test.quadrature_weight(element_index, point_index);
                let context = test.quadrature_context(element_index, point_index);
                for i in 0..num_test_dofs {
                    let v = test.shape_function(element_index, point_index, i);
                    for j in 0..num_trial_dofs {
                        let u = trial.shape_function(element_index, point_index, j);
                        element_matrix[(i, j)] += form.eval(&u, &v, &context) * dx;
                    }
                }
            }

            (rows, cols, element_matrix)
        })
        .collect();

    let mut coo = CooMatrix::new(test.num_dofs(), trial.num_dofs());
    for (rows, cols, element_matrix) in local_matrices {
        for (i, &row) in rows.iter().enumerate() {
            for (j, &col) in cols.iter().enumerate() {
                coo.push(row, col, element_matrix[(i, j)]);
            }
        }
    }

    // Duplicate coordinate entries are summed here; since summation over
    // elements and quadrature points is associative, the accumulation order
    // does not change the result.
    let matrix = CsrMatrix::from(&coo);
    debug!(
        "assembled {}x{} matrix with {} explicit entries from {} elements",
        matrix.nrows(),
        matrix.ncols(),
        matrix.nnz(),
        test.num_elements()
    );
    Ok(matrix)
}

/// Assembles the global vector of a linear form.
pub fn assemble_linear<F, V>(form: &F, basis: &V) -> eyre::Result<DVector<f64>>
where
    F: LinearForm,
    V: AssemblyBasis,
{
    let mut vector = DVector::zeros(basis.num_dofs());
    let mut dofs = Vec::new();
    for element_index in 0..basis.num_elements() {
        let num_dofs = basis.element_dof_count(element_index);
        dofs.resize(num_dofs, 0);
        basis.populate_element_dofs(&mut dofs, element_index);

        for point_index in 0..basis.element_quadrature_size(element_index) {
            let dx = basis.quadrature_weight(element_index, point_index);
            let context = basis.quadrature_context(element_index, point_index);
            for (i, &dof) in dofs.iter().enumerate() {
                let v = basis.shape_function(element_index, point_index, i);
                vector[dof] += form.eval(&v, &context) * dx;
            }
        }
    }

    debug!(
        "assembled vector of length {} from {} elements",
        vector.len(),
        basis.num_elements()
    );
    Ok(vector)
}
