use matrixcompare::assert_scalar_eq;
use mortar2d::assembly::global::{assemble_bilinear, assemble_linear};
use mortar2d::assembly::operators::{
    ConstantLoad, JumpPenalty, LameParameters, LinearElasticity, NitscheCoupling, YoungPoisson,
};
use mortar2d::assembly::BilinearForm;
use mortar2d::basis::{DofOffset, InteriorBasis};
use mortar2d::error::AssemblyError;
use mortar2d::interface::{InterfaceBasis, InterfaceMesh, Side, SIDES};
use mortar2d::mesh::procedural::create_unit_square_uniform_tri_mesh_2d;
use mortar2d::mesh::TriangleMesh2d;
use mortar2d::nalgebra::{DMatrix, DVector, Vector2};
use mortar2d::nalgebra_sparse::CsrMatrix;

fn material() -> LameParameters {
    YoungPoisson { young: 1000.0, poisson: 0.3 }.into()
}

fn elasticity_matrix(mesh: &TriangleMesh2d) -> CsrMatrix<f64> {
    let basis = InteriorBasis::new(mesh, 2).unwrap();
    assemble_bilinear(&LinearElasticity::new(material()), &basis, &basis).unwrap()
}

/// A deterministic pseudo-random vector for quadratic form checks.
fn test_vector(n: usize, seed: usize) -> DVector<f64> {
    DVector::from_fn(n, |i, _| ((i * 31 + seed * 17) as f64).sin())
}

#[test]
fn young_poisson_conversion_matches_lame_formulas() {
    let LameParameters { mu, lambda } = material();
    assert_scalar_eq!(mu, 1000.0 / 2.6, comp = abs, tol = 1e-12);
    assert_scalar_eq!(lambda, 1000.0 * 0.3 / (1.3 * 0.4), comp = abs, tol = 1e-12);
}

#[test]
fn elasticity_matrix_is_symmetric() {
    let mesh = create_unit_square_uniform_tri_mesh_2d(2);
    let matrix = DMatrix::from(&elasticity_matrix(&mesh));
    let asymmetry = (&matrix - matrix.transpose()).norm();
    assert_scalar_eq!(asymmetry, 0.0, comp = abs, tol = 1e-9 * matrix.norm());
}

#[test]
fn elasticity_matrix_annihilates_rigid_body_modes() {
    let mesh = create_unit_square_uniform_tri_mesh_2d(2);
    let matrix = elasticity_matrix(&mesh);
    let scale = DMatrix::from(&matrix).norm();

    // The three rigid-body modes in 2D: two translations and the
    // infinitesimal rotation (-y, x).
    let mut modes = vec![
        DVector::zeros(matrix.nrows()),
        DVector::zeros(matrix.nrows()),
        DVector::zeros(matrix.nrows()),
    ];
    for (node, p) in mesh.vertices().iter().enumerate() {
        modes[0][2 * node] = 1.0;
        modes[1][2 * node + 1] = 1.0;
        modes[2][2 * node] = -p.y;
        modes[2][2 * node + 1] = p.x;
    }

    let dense = DMatrix::from(&matrix);
    for mode in &modes {
        let residual = (&dense * mode).norm();
        assert_scalar_eq!(residual, 0.0, comp = abs, tol = 1e-10 * scale);
    }
}

#[test]
fn elasticity_matrix_is_positive_semidefinite() {
    let mesh = create_unit_square_uniform_tri_mesh_2d(2);
    let matrix = DMatrix::from(&elasticity_matrix(&mesh));
    for seed in 0..5 {
        let x = test_vector(matrix.nrows(), seed);
        let quadratic_form = x.dot(&(&matrix * &x));
        assert!(quadratic_form >= -1e-9 * matrix.norm() * x.norm_squared());
    }
}

#[test]
fn constant_load_integrates_to_total_force() {
    let mesh = create_unit_square_uniform_tri_mesh_2d(3);
    let basis = InteriorBasis::new(&mesh, 2).unwrap();
    let load = ConstantLoad { force: Vector2::new(0.0, -50.0) };
    let vector = assemble_linear(&load, &basis).unwrap();

    // Partition of unity: the components of the load vector sum to the
    // total force on the unit square.
    let sum_x: f64 = (0..mesh.num_vertices()).map(|node| vector[2 * node]).sum();
    let sum_y: f64 = (0..mesh.num_vertices()).map(|node| vector[2 * node + 1]).sum();
    assert_scalar_eq!(sum_x, 0.0, comp = abs, tol = 1e-12);
    assert_scalar_eq!(sum_y, -50.0, comp = abs, tol = 1e-12);
}

#[test]
fn assembly_is_deterministic() {
    let mesh = create_unit_square_uniform_tri_mesh_2d(2);
    let first = elasticity_matrix(&mesh);
    let second = elasticity_matrix(&mesh);
    assert_eq!(first, second);
}

#[test]
fn incompatible_bases_are_rejected() {
    let mesh_a = create_unit_square_uniform_tri_mesh_2d(1);
    let mesh_b = create_unit_square_uniform_tri_mesh_2d(2);
    let basis_a = InteriorBasis::new(&mesh_a, 2).unwrap();
    let basis_b = InteriorBasis::new(&mesh_b, 2).unwrap();

    let result = assemble_bilinear(&LinearElasticity::new(material()), &basis_a, &basis_b);
    let error = result.err().unwrap();
    assert!(matches!(
        error.downcast_ref::<AssemblyError>(),
        Some(AssemblyError::IncompatibleBases { .. })
    ));
}

#[test]
fn inverted_elements_are_rejected() {
    use mortar2d::connectivity::Tri3Connectivity;
    use mortar2d::error::GeometryError;
    use mortar2d::nalgebra::Point2;

    // A clockwise triangle has a negative Jacobian determinant
    let mesh = TriangleMesh2d::from_vertices_and_connectivity(
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ],
        vec![Tri3Connectivity([0, 2, 1])],
    );
    let result = InteriorBasis::new(&mesh, 2);
    assert!(matches!(
        result.err(),
        Some(AssemblyError::Geometry(GeometryError::DegenerateElement {
            element_index: 0,
            ..
        }))
    ));
}

#[test]
fn interior_basis_integrates_constants_to_the_domain_area() {
    let mesh = create_unit_square_uniform_tri_mesh_2d(3);
    let basis = InteriorBasis::new(&mesh, 2).unwrap();
    assert_scalar_eq!(basis.integrate(|_| 1.0), 1.0, comp = abs, tol = 1e-13);
    // A linear function is integrated exactly as well
    assert_scalar_eq!(basis.integrate(|p| p.x), 0.5, comp = abs, tol = 1e-13);
}

#[test]
fn unsupported_quadrature_order_is_rejected() {
    let mesh = create_unit_square_uniform_tri_mesh_2d(1);
    let result = InteriorBasis::new(&mesh, 100);
    assert!(matches!(
        result.err(),
        Some(AssemblyError::UnsupportedQuadratureOrder { order: 100 })
    ));
}

/// Assembles the four mortar coupling blocks of a form family into one
/// combined-space matrix.
fn assemble_coupling<F: BilinearForm + Sync>(
    bases: &[InterfaceBasis; 2],
    num_dofs_total: usize,
    offsets: [usize; 2],
    form: impl Fn(Side, Side) -> F,
) -> CsrMatrix<f64> {
    let mut total: Option<CsrMatrix<f64>> = None;
    for trial_side in SIDES {
        for test_side in SIDES {
            let trial = DofOffset::new(
                &bases[trial_side.index()],
                offsets[trial_side.index()],
                num_dofs_total,
            );
            let test = DofOffset::new(
                &bases[test_side.index()],
                offsets[test_side.index()],
                num_dofs_total,
            );
            let form = form(trial_side, test_side);
            let block = assemble_bilinear(&form, &trial, &test).unwrap();
            total = Some(match total {
                Some(sum) => &sum + &block,
                None => block,
            });
        }
    }
    total.unwrap()
}

fn two_body_setup() -> (TriangleMesh2d, TriangleMesh2d) {
    let left = create_unit_square_uniform_tri_mesh_2d(1).refined(2);
    let mut right = create_unit_square_uniform_tri_mesh_2d(3);
    right.translate(&Vector2::new(1.0, 0.0));
    (left, right)
}

fn penalty_matrix(left: &TriangleMesh2d, right: &TriangleMesh2d, alpha: f64) -> CsrMatrix<f64> {
    let interface = InterfaceMesh::from_meshes(
        left,
        right,
        |p| (p.x - 1.0).abs() < 1e-12,
        |p| p.y,
    )
    .unwrap();
    let bases = InterfaceBasis::pair(&interface, 2).unwrap();
    let n1 = 2 * left.num_vertices();
    let n = n1 + 2 * right.num_vertices();
    assemble_coupling(&bases, n, [0, n1], |trial_side, test_side| JumpPenalty {
        alpha,
        trial_side,
        test_side,
    })
}

#[test]
fn jump_penalty_matrix_is_symmetric_positive_semidefinite() {
    let (left, right) = two_body_setup();
    let penalty = DMatrix::from(&penalty_matrix(&left, &right, 1.0));

    let asymmetry = (&penalty - penalty.transpose()).norm();
    assert_scalar_eq!(asymmetry, 0.0, comp = abs, tol = 1e-10 * (1.0 + penalty.norm()));

    for seed in 0..5 {
        let x = test_vector(penalty.nrows(), seed);
        let quadratic_form = x.dot(&(&penalty * &x));
        assert!(quadratic_form >= -1e-10 * (1.0 + penalty.norm()) * x.norm_squared());
    }
}

#[test]
fn jump_penalty_stiffness_grows_monotonically_with_alpha() {
    let (left, right) = two_body_setup();
    let weak = DMatrix::from(&penalty_matrix(&left, &right, 1.0));
    let strong = DMatrix::from(&penalty_matrix(&left, &right, 10.0));

    for seed in 0..5 {
        let x = test_vector(weak.nrows(), seed);
        let weak_form = x.dot(&(&weak * &x));
        let strong_form = x.dot(&(&strong * &x));
        assert!(strong_form >= weak_form - 1e-12);
        // The penalty is homogeneous of degree one in alpha
        assert_scalar_eq!(strong_form, 10.0 * weak_form, comp = abs, tol = 1e-8 * (1.0 + weak_form.abs()));
    }
}

#[test]
fn nitsche_coupling_matrix_is_symmetric_and_couples_the_bodies() {
    let (left, right) = two_body_setup();
    let interface = InterfaceMesh::from_meshes(
        &left,
        &right,
        |p| (p.x - 1.0).abs() < 1e-12,
        |p| p.y,
    )
    .unwrap();
    let bases = InterfaceBasis::pair(&interface, 2).unwrap();
    let n1 = 2 * left.num_vertices();
    let n = n1 + 2 * right.num_vertices();
    let materials = [material(), material()];
    let coupling = assemble_coupling(&bases, n, [0, n1], |trial_side, test_side| {
        NitscheCoupling::new(1.0, materials, trial_side, test_side)
    });

    assert_eq!(coupling.nrows(), n);
    assert_eq!(coupling.ncols(), n);

    let dense = DMatrix::from(&coupling);
    let asymmetry = (&dense - dense.transpose()).norm();
    assert_scalar_eq!(asymmetry, 0.0, comp = abs, tol = 1e-9 * (1.0 + dense.norm()));

    // The off-diagonal blocks must actually couple the two bodies
    let off_diagonal_norm = dense.view((0, n1), (n1, n - n1)).norm();
    assert!(off_diagonal_norm > 1e-10);
}
