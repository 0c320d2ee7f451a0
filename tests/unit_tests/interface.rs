use matrixcompare::assert_scalar_eq;
use mortar2d::basis::AssemblyBasis;
use mortar2d::error::InterfaceError;
use mortar2d::interface::{InterfaceBasis, InterfaceMesh, SIDES};
use mortar2d::mesh::procedural::create_unit_square_uniform_tri_mesh_2d;
use mortar2d::mesh::TriangleMesh2d;
use mortar2d::nalgebra::{Point2, Vector2};

/// The two-body geometry of the reference scenario: a refined unit square
/// and a coarser triangulated square translated to `x = 1..2`, glued along
/// `x = 1`.
fn two_body_meshes() -> (TriangleMesh2d, TriangleMesh2d) {
    let left = create_unit_square_uniform_tri_mesh_2d(1).refined(3);
    let mut right = create_unit_square_uniform_tri_mesh_2d(5);
    right.translate(&Vector2::new(1.0, 0.0));
    (left, right)
}

#[test]
fn interface_merges_parameter_values_of_both_sides() {
    let (left, right) = two_body_meshes();
    let interface = InterfaceMesh::from_meshes(
        &left,
        &right,
        |p| (p.x - 1.0).abs() < 1e-12,
        |p| p.y,
    )
    .unwrap();

    // Side 0 has 8 facets on x = 1 (9 endpoint parameters), side 1 has 5
    // facets (6 parameters); only 0 and 1 coincide, so the merged ordering
    // has 13 values and 12 segments.
    assert_eq!(interface.num_segments(), 12);

    let total_length: f64 = (0..interface.num_segments())
        .map(|s| interface.segment_length(s))
        .sum();
    assert_scalar_eq!(total_length, 1.0, comp = abs, tol = 1e-12);
}

#[test]
fn interface_normals_point_from_side_0_into_side_1() {
    let (left, right) = two_body_meshes();
    let interface = InterfaceMesh::from_meshes(
        &left,
        &right,
        |p| (p.x - 1.0).abs() < 1e-12,
        |p| p.y,
    )
    .unwrap();

    for s in 0..interface.num_segments() {
        let normal = interface.segment_normal(s);
        assert_scalar_eq!(normal.x, 1.0, comp = abs, tol = 1e-12);
        assert_scalar_eq!(normal.y, 0.0, comp = abs, tol = 1e-12);
    }
}

#[test]
fn interface_supports_are_adjacent_to_the_interface() {
    let (left, right) = two_body_meshes();
    let interface = InterfaceMesh::from_meshes(
        &left,
        &right,
        |p| (p.x - 1.0).abs() < 1e-12,
        |p| p.y,
    )
    .unwrap();

    for side in SIDES {
        let mesh = interface.parent_mesh(side);
        for s in 0..interface.num_segments() {
            let cell = interface.support_cell(s, side);
            assert!(cell < mesh.num_elements());
            // The supporting cell must touch x = 1
            let touches_interface = mesh.connectivity()[cell]
                .0
                .iter()
                .any(|&v| (mesh.vertices()[v].x - 1.0).abs() < 1e-12);
            assert!(touches_interface);
        }
    }
}

#[test]
fn interface_construction_fails_without_matching_facets() {
    let (left, right) = two_body_meshes();
    let result = InterfaceMesh::from_meshes(
        &left,
        &right,
        |p| (p.x - 10.0).abs() < 1e-12,
        |p| p.y,
    );
    assert_eq!(result.err(), Some(InterfaceError::NoMatchingFacets { side: 0 }));
}

#[test]
fn interface_bases_share_quadrature_points_and_context() {
    let (left, right) = two_body_meshes();
    let interface = InterfaceMesh::from_meshes(
        &left,
        &right,
        |p| (p.x - 1.0).abs() < 1e-12,
        |p| p.y,
    )
    .unwrap();
    let [basis_0, basis_1] = InterfaceBasis::pair(&interface, 2).unwrap();

    assert_eq!(basis_0.num_elements(), basis_1.num_elements());
    assert_eq!(basis_0.num_dofs(), 2 * left.num_vertices());
    assert_eq!(basis_1.num_dofs(), 2 * right.num_vertices());

    for s in 0..basis_0.num_elements() {
        assert_eq!(
            basis_0.element_quadrature_size(s),
            basis_1.element_quadrature_size(s)
        );
        for q in 0..basis_0.element_quadrature_size(s) {
            let context_0 = basis_0.quadrature_context(s, q);
            let context_1 = basis_1.quadrature_context(s, q);
            // Shared physical quadrature points on x = 1
            assert_scalar_eq!(context_0.point.x, 1.0, comp = abs, tol = 1e-12);
            assert_scalar_eq!(context_0.point.x, context_1.point.x, comp = abs, tol = 1e-12);
            assert_scalar_eq!(context_0.point.y, context_1.point.y, comp = abs, tol = 1e-12);
            assert_scalar_eq!(
                context_0.element_size,
                context_1.element_size,
                comp = abs,
                tol = 1e-14
            );
            assert_eq!(
                basis_0.quadrature_weight(s, q),
                basis_1.quadrature_weight(s, q)
            );
        }
    }
}

#[test]
fn interface_basis_reproduces_linear_fields_on_both_sides() {
    let (left, right) = two_body_meshes();
    let interface = InterfaceMesh::from_meshes(
        &left,
        &right,
        |p| (p.x - 1.0).abs() < 1e-12,
        |p| p.y,
    )
    .unwrap();
    let [basis_0, basis_1] = InterfaceBasis::pair(&interface, 2).unwrap();

    // Nodal interpolant of the linear field u(x, y) = (x + 2y, y - x) on each
    // parent mesh; evaluating it through the interface basis must reproduce
    // the field exactly at the shared quadrature points.
    let field = |p: &Point2<f64>| Vector2::new(p.x + 2.0 * p.y, p.y - p.x);
    for (basis, mesh) in [(&basis_0, &left), (&basis_1, &right)] {
        let mut solution = vec![0.0; 2 * mesh.num_vertices()];
        for (node, p) in mesh.vertices().iter().enumerate() {
            let u = field(p);
            solution[2 * node] = u.x;
            solution[2 * node + 1] = u.y;
        }

        for s in 0..basis.num_elements() {
            for q in 0..basis.element_quadrature_size(s) {
                let x = basis.quadrature_context(s, q).point;
                let expected = field(&x);
                let value = basis.evaluate_solution(&solution, s, q);
                assert_scalar_eq!(value.x, expected.x, comp = abs, tol = 1e-12);
                assert_scalar_eq!(value.y, expected.y, comp = abs, tol = 1e-12);
            }
        }
    }
}
