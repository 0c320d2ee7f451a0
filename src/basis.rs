//! Quadrature bases: the coupling of a mesh, an element family and a
//! quadrature rule into assembler-ready data.
//!
//! A basis is built once and is read-only afterwards: all geometric
//! quantities (physical quadrature points, scaled weights, physical basis
//! gradients) and the local-to-global dof maps are precomputed at
//! construction, so assembly is a pure accumulation loop.
//!
//! The displacement field has two components per mesh node; dofs are
//! interleaved as `2 * node + component`.

use crate::element::{ElementConnectivity, FiniteElement, ReferenceFiniteElement, Tri3Element};
use crate::error::{AssemblyError, GeometryError};
use crate::mesh::TriangleMesh2d;
use crate::quadrature;
use itertools::izip;
use nalgebra::{DVector, Matrix1x3, Matrix2, Matrix2x3, Point2, Unit, Vector2};

/// Number of solution components per mesh node.
pub const SOLUTION_DIM: usize = 2;

/// Geometric data available to forms at a single quadrature point.
#[derive(Debug, Clone)]
pub struct QuadratureContext {
    /// The physical location of the quadrature point.
    pub point: Point2<f64>,
    /// The unit normal of the integration surface. `None` for interior
    /// (volumetric) integration.
    pub normal: Option<Unit<Vector2<f64>>>,
    /// The local mesh size `h`: the length of the facet for surface
    /// integration, the element diameter for interior integration.
    pub element_size: f64,
}

/// Value and spatial gradient of a single vector-valued shape function at a
/// quadrature point.
///
/// `gradient[(i, j)]` is the derivative of component `i` with respect to
/// physical coordinate `j`.
#[derive(Debug, Clone, Copy)]
pub struct ShapeFunction {
    pub value: Vector2<f64>,
    pub gradient: Matrix2<f64>,
}

/// Expands a scalar basis function into the vector-valued shape function of
/// one displacement component.
pub(crate) fn vector_shape_function(
    phi: f64,
    physical_gradient: &Vector2<f64>,
    component: usize,
) -> ShapeFunction {
    let mut value = Vector2::zeros();
    value[component] = phi;
    let mut gradient = Matrix2::zeros();
    gradient.set_row(component, &physical_gradient.transpose());
    ShapeFunction { value, gradient }
}

/// The assembler-facing view of a basis: dof layout and quadrature-point
/// evaluations.
///
/// Implementations must be deterministic: repeated queries return identical
/// values, so that assembly is reproducible.
pub trait AssemblyBasis {
    /// Total number of dofs in the global space this basis indexes into.
    fn num_dofs(&self) -> usize;

    /// Number of elements (integration cells) the basis iterates over.
    fn num_elements(&self) -> usize;

    /// Number of local dofs of the given element.
    fn element_dof_count(&self, element_index: usize) -> usize;

    /// Writes the global dof indices of the given element into `output`.
    fn populate_element_dofs(&self, output: &mut [usize], element_index: usize);

    /// Number of quadrature points of the given element.
    fn element_quadrature_size(&self, element_index: usize) -> usize;

    /// The integration weight of a quadrature point, including the Jacobian
    /// determinant of the reference-to-physical map.
    fn quadrature_weight(&self, element_index: usize, point_index: usize) -> f64;

    /// The geometric context of a quadrature point.
    fn quadrature_context(&self, element_index: usize, point_index: usize) -> QuadratureContext;

    /// Evaluates the shape function of a local dof at a quadrature point.
    fn shape_function(
        &self,
        element_index: usize,
        point_index: usize,
        local_dof: usize,
    ) -> ShapeFunction;
}

impl<B: AssemblyBasis + ?Sized> AssemblyBasis for &B {
    fn num_dofs(&self) -> usize {
        (**self).num_dofs()
    }

    fn num_elements(&self) -> usize {
        (**self).num_elements()
    }

    fn element_dof_count(&self, element_index: usize) -> usize {
        (**self).element_dof_count(element_index)
    }

    fn populate_element_dofs(&self, output: &mut [usize], element_index: usize) {
        (**self).populate_element_dofs(output, element_index)
    }

    fn element_quadrature_size(&self, element_index: usize) -> usize {
        (**self).element_quadrature_size(element_index)
    }

    fn quadrature_weight(&self, element_index: usize, point_index: usize) -> f64 {
        (**self).quadrature_weight(element_index, point_index)
    }

    fn quadrature_context(&self, element_index: usize, point_index: usize) -> QuadratureContext {
        (**self).quadrature_context(element_index, point_index)
    }

    fn shape_function(
        &self,
        element_index: usize,
        point_index: usize,
        local_dof: usize,
    ) -> ShapeFunction {
        (**self).shape_function(element_index, point_index, local_dof)
    }
}

/// Per-element quadrature data precomputed at basis construction.
#[derive(Debug, Clone)]
struct ElementQuadrature {
    /// Physical quadrature points.
    points: Vec<Point2<f64>>,
    /// Reference weights scaled by the Jacobian determinant.
    weights: Vec<f64>,
    /// Physical basis gradients, one column per node (constant on affine
    /// elements).
    physical_gradients: Matrix2x3<f64>,
    diameter: f64,
}

/// A basis for interior (volumetric) integration over a triangle mesh with
/// piecewise linear vector-valued shape functions.
pub struct InteriorBasis<'a> {
    mesh: &'a TriangleMesh2d,
    /// Scalar basis values at the reference quadrature points (shared by all
    /// elements of the affine family).
    basis_values: Vec<Matrix1x3<f64>>,
    elements: Vec<ElementQuadrature>,
}

impl<'a> InteriorBasis<'a> {
    /// Builds a basis with a quadrature rule exact for polynomials of total
    /// degree up to `order`.
    ///
    /// Fails if no rule of the requested order is available or if any element
    /// of the mesh is degenerate or inverted.
    pub fn new(mesh: &'a TriangleMesh2d, order: usize) -> Result<Self, AssemblyError> {
        let (ref_weights, ref_points) = quadrature::triangle_quadrature(order)
            .map_err(|_| AssemblyError::UnsupportedQuadratureOrder { order })?;

        let reference = Tri3Element::reference();
        let basis_values: Vec<_> = ref_points.iter().map(|xi| reference.evaluate_basis(xi)).collect();
        let reference_gradients = reference.gradients(&Point2::origin());

        let mut elements = Vec::with_capacity(mesh.num_elements());
        for (element_index, connectivity) in mesh.connectivity().iter().enumerate() {
            let element = connectivity
                .element(mesh.vertices())
                .expect("mesh connectivity indices must be in bounds");

            let jacobian = element.reference_jacobian(&Point2::origin());
            let jacobian_determinant = jacobian.determinant();
            let inverse = jacobian.try_inverse().filter(|_| jacobian_determinant > 0.0);
            let inverse = inverse.ok_or(GeometryError::DegenerateElement {
                element_index,
                jacobian_determinant,
            })?;

            let physical_gradients = inverse.transpose() * reference_gradients;
            let points = ref_points.iter().map(|xi| element.map_reference_coords(xi)).collect();
            let weights = ref_weights.iter().map(|w| w * jacobian_determinant).collect();

            elements.push(ElementQuadrature {
                points,
                weights,
                physical_gradients,
                diameter: element.diameter(),
            });
        }

        Ok(Self { mesh, basis_values, elements })
    }

    pub fn mesh(&self) -> &TriangleMesh2d {
        self.mesh
    }

    /// Returns the sorted dofs of all nodes whose coordinates satisfy the
    /// predicate (all components of each matching node).
    pub fn dofs_where(&self, predicate: impl Fn(&Point2<f64>) -> bool) -> Vec<usize> {
        let mut dofs = Vec::new();
        for (node, point) in self.mesh.vertices().iter().enumerate() {
            if predicate(point) {
                for component in 0..SOLUTION_DIM {
                    dofs.push(SOLUTION_DIM * node + component);
                }
            }
        }
        dofs
    }

    /// Splits an interleaved global solution vector into per-node
    /// displacement vectors.
    ///
    /// # Panics
    ///
    /// Panics if the solution length does not match the number of dofs.
    pub fn nodal_values(&self, solution: &DVector<f64>) -> Vec<Vector2<f64>> {
        assert_eq!(solution.len(), self.num_dofs(), "solution length must match dof count");
        (0..self.mesh.num_vertices())
            .map(|node| Vector2::new(solution[SOLUTION_DIM * node], solution[SOLUTION_DIM * node + 1]))
            .collect()
    }

    /// Integrates a function over the mesh with the basis' quadrature rule.
    pub fn integrate(&self, f: impl Fn(&Point2<f64>) -> f64) -> f64 {
        let mut integral = 0.0;
        for element in &self.elements {
            for (w, x) in izip!(&element.weights, &element.points) {
                integral += w * f(x);
            }
        }
        integral
    }
}

impl AssemblyBasis for InteriorBasis<'_> {
    fn num_dofs(&self) -> usize {
        SOLUTION_DIM * self.mesh.num_vertices()
    }

    fn num_elements(&self) -> usize {
        self.elements.len()
    }

    fn element_dof_count(&self, _element_index: usize) -> usize {
        SOLUTION_DIM * 3
    }

    fn populate_element_dofs(&self, output: &mut [usize], element_index: usize) {
        let nodes = &self.mesh.connectivity()[element_index].0;
        for (local_node, global_node) in nodes.iter().enumerate() {
            for component in 0..SOLUTION_DIM {
                output[SOLUTION_DIM * local_node + component] =
                    SOLUTION_DIM * global_node + component;
            }
        }
    }

    fn element_quadrature_size(&self, element_index: usize) -> usize {
        self.elements[element_index].weights.len()
    }

    fn quadrature_weight(&self, element_index: usize, point_index: usize) -> f64 {
        self.elements[element_index].weights[point_index]
    }

    fn quadrature_context(&self, element_index: usize, point_index: usize) -> QuadratureContext {
        let element = &self.elements[element_index];
        QuadratureContext {
            point: element.points[point_index],
            normal: None,
            element_size: element.diameter,
        }
    }

    fn shape_function(
        &self,
        element_index: usize,
        point_index: usize,
        local_dof: usize,
    ) -> ShapeFunction {
        let node = local_dof / SOLUTION_DIM;
        let component = local_dof % SOLUTION_DIM;
        let phi = self.basis_values[point_index][node];
        let gradient = self.elements[element_index]
            .physical_gradients
            .column(node)
            .into_owned();
        vector_shape_function(phi, &gradient, component)
    }
}

/// Embeds a basis into a larger combined dof space by offsetting its global
/// dof indices.
///
/// This is used to assemble multi-body systems: each body's matrix block (and
/// the mortar coupling blocks between bodies) land at the right position of
/// one combined matrix.
pub struct DofOffset<B> {
    basis: B,
    offset: usize,
    num_dofs: usize,
}

impl<B: AssemblyBasis> DofOffset<B> {
    /// Wraps `basis` so that its dofs `0..basis.num_dofs()` map to
    /// `offset..offset + basis.num_dofs()` inside a space of `num_dofs` dofs.
    ///
    /// # Panics
    ///
    /// Panics if the offset block does not fit into the combined space.
    pub fn new(basis: B, offset: usize, num_dofs: usize) -> Self {
        assert!(
            offset + basis.num_dofs() <= num_dofs,
            "offset dof block must fit into the combined dof space"
        );
        Self { basis, offset, num_dofs }
    }
}

impl<B: AssemblyBasis> AssemblyBasis for DofOffset<B> {
    fn num_dofs(&self) -> usize {
        self.num_dofs
    }

    fn num_elements(&self) -> usize {
        self.basis.num_elements()
    }

    fn element_dof_count(&self, element_index: usize) -> usize {
        self.basis.element_dof_count(element_index)
    }

    fn populate_element_dofs(&self, output: &mut [usize], element_index: usize) {
        self.basis.populate_element_dofs(output, element_index);
        for dof in output {
            *dof += self.offset;
        }
    }

    fn element_quadrature_size(&self, element_index: usize) -> usize {
        self.basis.element_quadrature_size(element_index)
    }

    fn quadrature_weight(&self, element_index: usize, point_index: usize) -> f64 {
        self.basis.quadrature_weight(element_index, point_index)
    }

    fn quadrature_context(&self, element_index: usize, point_index: usize) -> QuadratureContext {
        self.basis.quadrature_context(element_index, point_index)
    }

    fn shape_function(
        &self,
        element_index: usize,
        point_index: usize,
        local_dof: usize,
    ) -> ShapeFunction {
        self.basis.shape_function(element_index, point_index, local_dof)
    }
}
