//! Derived 1D mortar meshes between two non-matching triangle meshes, and
//! the two-sided quadrature bases used to integrate coupling terms over them.

use crate::basis::{
    vector_shape_function, AssemblyBasis, QuadratureContext, ShapeFunction, SOLUTION_DIM,
};
use crate::element::{
    ElementConnectivity, FiniteElement, ReferenceFiniteElement, Segment2Element,
    SurfaceFiniteElement, Tri3Element,
};
use crate::error::{AssemblyError, GeometryError, InterfaceError};
use crate::mesh::TriangleMesh2d;
use crate::quadrature;
use nalgebra::{Matrix1x3, Matrix2x3, Point2, Unit, Vector2};
use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

/// Identifies one of the two sides of an interface. An interface is always
/// exactly two-sided.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    First,
    Second,
}

/// Both sides, in index order.
pub const SIDES: [Side; 2] = [Side::First, Side::Second];

impl Side {
    pub fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }

    /// The sign of the jump contribution of this side: `+1` for the first
    /// side, `-1` for the second.
    pub fn sign(self) -> f64 {
        match self {
            Side::First => 1.0,
            Side::Second => -1.0,
        }
    }
}

/// Tolerance used to merge interface parameter values and to decide facet
/// coverage.
const PARAM_TOL: f64 = 1e-10;

/// A boundary facet of one parent mesh restricted to the interface, together
/// with its parameter interval.
#[derive(Debug, Clone)]
struct InterfaceFacet {
    /// Facet endpoints in the orientation of the owning cell.
    from: Point2<f64>,
    to: Point2<f64>,
    param_from: f64,
    param_to: f64,
    cell_index: usize,
}

impl InterfaceFacet {
    fn param_min(&self) -> f64 {
        self.param_from.min(self.param_to)
    }

    fn param_max(&self) -> f64 {
        self.param_from.max(self.param_to)
    }

    fn covers(&self, param: f64) -> bool {
        self.param_max() - self.param_min() > PARAM_TOL
            && param >= self.param_min() - PARAM_TOL
            && param <= self.param_max() + PARAM_TOL
    }

    /// The physical point at the given parameter value, by linear
    /// interpolation along the facet.
    fn point_at(&self, param: f64) -> Point2<f64> {
        let s = (param - self.param_from) / (self.param_to - self.param_from);
        self.from + (self.to - self.from) * s
    }
}

/// One mortar segment with its supporting cell on each side.
#[derive(Debug, Clone)]
struct MortarSegment {
    endpoints: [Point2<f64>; 2],
    /// Shared unit normal, oriented from side 0 into side 1.
    normal: Unit<Vector2<f64>>,
    length: f64,
    /// Supporting cell index in each parent mesh.
    support: [usize; 2],
}

/// A 1D mortar mesh derived from matching boundary facets of two parent
/// meshes.
///
/// Both parents' matching facets are projected onto a common scalar
/// parametrization; the merged parameter values define the mortar segments,
/// so every segment is covered by exactly one facet on each side. The
/// interface mesh borrows its parents but does not own them.
pub struct InterfaceMesh<'a> {
    meshes: [&'a TriangleMesh2d; 2],
    segments: Vec<MortarSegment>,
}

impl<'a> InterfaceMesh<'a> {
    /// Builds the mortar mesh between `mesh1` (side 0) and `mesh2` (side 1).
    ///
    /// A boundary facet belongs to the interface if both its endpoints
    /// satisfy `predicate`; `parametrization` maps interface points to the
    /// common scalar parameter (e.g. the `y` coordinate for a vertical
    /// interface).
    pub fn from_meshes(
        mesh1: &'a TriangleMesh2d,
        mesh2: &'a TriangleMesh2d,
        predicate: impl Fn(&Point2<f64>) -> bool,
        parametrization: impl Fn(&Point2<f64>) -> f64,
    ) -> Result<Self, InterfaceError> {
        let meshes = [mesh1, mesh2];

        let mut facets: [Vec<InterfaceFacet>; 2] = [Vec::new(), Vec::new()];
        for (side, mesh) in meshes.iter().enumerate() {
            for (face, cell_index, _) in mesh.find_boundary_faces() {
                let [a, b] = face.0;
                let from = mesh.vertices()[a];
                let to = mesh.vertices()[b];
                if predicate(&from) && predicate(&to) {
                    facets[side].push(InterfaceFacet {
                        from,
                        to,
                        param_from: parametrization(&from),
                        param_to: parametrization(&to),
                        cell_index,
                    });
                }
            }
            if facets[side].is_empty() {
                return Err(InterfaceError::NoMatchingFacets { side });
            }
        }

        // Merge the facet endpoint parameters of both sides into one sorted
        // ordering; consecutive values bound the mortar segments.
        let mut params: Vec<f64> = facets
            .iter()
            .flatten()
            .flat_map(|facet| [facet.param_from, facet.param_to])
            .collect();
        params.sort_by_key(|&p| NotNan::new(p).expect("interface parameters must not be NaN"));
        params.dedup_by(|a, b| (*a - *b).abs() <= PARAM_TOL);

        let mut segments = Vec::with_capacity(params.len().saturating_sub(1));
        for (segment_index, window) in params.windows(2).enumerate() {
            let [param_start, param_end] = [window[0], window[1]];
            let midpoint_param = 0.5 * (param_start + param_end);

            let mut support = [usize::MAX; 2];
            let mut side0_facet = None;
            for side in 0..2 {
                let facet = facets[side]
                    .iter()
                    .find(|facet| facet.covers(midpoint_param))
                    .ok_or(InterfaceError::UncoveredSegment { segment_index, side })?;
                support[side] = facet.cell_index;
                if side == 0 {
                    side0_facet = Some(facet);
                }
            }
            let side0_facet = side0_facet.expect("side 0 facet was just resolved");

            let endpoints = [
                side0_facet.point_at(param_start),
                side0_facet.point_at(param_end),
            ];
            // The side-0 facet is oriented as an edge of its (counter-
            // clockwise) cell, so its normal points out of side 0.
            let normal = Segment2Element::from_vertices(side0_facet.from, side0_facet.to)
                .normal(&nalgebra::Point1::origin());

            segments.push(MortarSegment {
                endpoints,
                normal,
                length: nalgebra::distance(&endpoints[0], &endpoints[1]),
                support,
            });
        }

        Ok(Self { meshes, segments })
    }

    /// The parent mesh of the given side.
    pub fn parent_mesh(&self, side: Side) -> &TriangleMesh2d {
        self.meshes[side.index()]
    }

    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// The length of the given mortar segment.
    pub fn segment_length(&self, segment_index: usize) -> f64 {
        self.segments[segment_index].length
    }

    /// The shared unit normal of the given segment, oriented from side 0
    /// into side 1.
    pub fn segment_normal(&self, segment_index: usize) -> Unit<Vector2<f64>> {
        self.segments[segment_index].normal
    }

    /// The parent cell supporting the given segment on the given side.
    pub fn support_cell(&self, segment_index: usize, side: Side) -> usize {
        self.segments[segment_index].support[side.index()]
    }
}

/// Per-segment quadrature data of one side of an interface basis.
#[derive(Debug, Clone)]
struct SegmentQuadrature {
    /// Physical quadrature points (shared by both sides).
    points: Vec<Point2<f64>>,
    /// Reference weights scaled by the segment Jacobian.
    weights: Vec<f64>,
    /// Parent-element scalar basis values at each quadrature point.
    basis_values: Vec<Matrix1x3<f64>>,
    /// Parent-element physical basis gradients.
    physical_gradients: Matrix2x3<f64>,
}

/// A basis for integrating over a mortar interface against the parent mesh
/// of one side.
///
/// Two sides of the same interface share the physical quadrature points, the
/// normal and the mesh size `h`, but evaluate their own parent's shape
/// functions and index into their own parent's dof space. This is what
/// produces the four coupling blocks of a mortar-coupled two-body system.
pub struct InterfaceBasis<'a> {
    interface: &'a InterfaceMesh<'a>,
    side: Side,
    segments: Vec<SegmentQuadrature>,
}

impl<'a> InterfaceBasis<'a> {
    /// Builds the fixed two-sided pair of bases over the interface with a
    /// quadrature rule exact for polynomials of degree up to `order`.
    pub fn pair(
        interface: &'a InterfaceMesh<'a>,
        order: usize,
    ) -> Result<[InterfaceBasis<'a>; 2], AssemblyError> {
        Ok([
            Self::new(interface, Side::First, order)?,
            Self::new(interface, Side::Second, order)?,
        ])
    }

    /// Builds the basis for one side of the interface.
    pub fn new(
        interface: &'a InterfaceMesh<'a>,
        side: Side,
        order: usize,
    ) -> Result<Self, AssemblyError> {
        let (ref_weights, ref_points) = quadrature::segment_quadrature(order)
            .map_err(|_| AssemblyError::UnsupportedQuadratureOrder { order })?;

        let mesh = interface.parent_mesh(side);
        let reference_gradients = Tri3Element::reference().gradients(&Point2::origin());

        let mut segments = Vec::with_capacity(interface.segments.len());
        for segment in &interface.segments {
            let element_index = segment.support[side.index()];
            let element: Tri3Element = mesh.connectivity()[element_index]
                .element(mesh.vertices())
                .expect("mesh connectivity indices must be in bounds");

            let jacobian = element.reference_jacobian(&Point2::origin());
            let jacobian_determinant = jacobian.determinant();
            let inverse = jacobian
                .try_inverse()
                .filter(|_| jacobian_determinant > 0.0)
                .ok_or(GeometryError::DegenerateElement {
                    element_index,
                    jacobian_determinant,
                })?;
            let physical_gradients = inverse.transpose() * reference_gradients;

            let mortar_element =
                Segment2Element::from_vertices(segment.endpoints[0], segment.endpoints[1]);
            let segment_jacobian = segment.length / 2.0;

            let mut points = Vec::with_capacity(ref_points.len());
            let mut weights = Vec::with_capacity(ref_points.len());
            let mut basis_values = Vec::with_capacity(ref_points.len());
            for (w, xi) in ref_weights.iter().zip(&ref_points) {
                let x = mortar_element.map_reference_coords(xi);
                // Pull the shared physical point back into the parent
                // element's reference coordinates; for boundary facets it
                // lies on the closure of the reference triangle.
                let parent_xi = element.try_inverse_map(&x).ok_or(
                    GeometryError::DegenerateElement {
                        element_index,
                        jacobian_determinant,
                    },
                )?;
                points.push(x);
                weights.push(w * segment_jacobian);
                basis_values.push(element.evaluate_basis(&parent_xi));
            }

            segments.push(SegmentQuadrature {
                points,
                weights,
                basis_values,
                physical_gradients,
            });
        }

        Ok(Self { interface, side, segments })
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn interface(&self) -> &InterfaceMesh<'a> {
        self.interface
    }

    /// Evaluates the displacement field of this side at a quadrature point,
    /// given the parent mesh's global solution vector.
    pub fn evaluate_solution(
        &self,
        solution: &[f64],
        segment_index: usize,
        point_index: usize,
    ) -> Vector2<f64> {
        let mut dofs = vec![0; self.element_dof_count(segment_index)];
        self.populate_element_dofs(&mut dofs, segment_index);
        let mut value = Vector2::zeros();
        for (local_dof, &dof) in dofs.iter().enumerate() {
            value += self
                .shape_function(segment_index, point_index, local_dof)
                .value
                * solution[dof];
        }
        value
    }
}

impl AssemblyBasis for InterfaceBasis<'_> {
    fn num_dofs(&self) -> usize {
        SOLUTION_DIM * self.interface.parent_mesh(self.side).num_vertices()
    }

    fn num_elements(&self) -> usize {
        self.segments.len()
    }

    fn element_dof_count(&self, _element_index: usize) -> usize {
        SOLUTION_DIM * 3
    }

    fn populate_element_dofs(&self, output: &mut [usize], element_index: usize) {
        let cell = self.interface.segments[element_index].support[self.side.index()];
        let nodes = &self.interface.parent_mesh(self.side).connectivity()[cell].0;
        for (local_node, global_node) in nodes.iter().enumerate() {
            for component in 0..SOLUTION_DIM {
                output[SOLUTION_DIM * local_node + component] =
                    SOLUTION_DIM * global_node + component;
            }
        }
    }

    fn element_quadrature_size(&self, element_index: usize) -> usize {
        self.segments[element_index].weights.len()
    }

    fn quadrature_weight(&self, element_index: usize, point_index: usize) -> f64 {
        self.segments[element_index].weights[point_index]
    }

    fn quadrature_context(&self, element_index: usize, point_index: usize) -> QuadratureContext {
        let mortar = &self.interface.segments[element_index];
        QuadratureContext {
            point: self.segments[element_index].points[point_index],
            normal: Some(mortar.normal),
            element_size: mortar.length,
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
        let segment = &self.segments[element_index];
        let phi = segment.basis_values[point_index][node];
        let gradient = segment.physical_gradients.column(node).into_owned();
        vector_shape_function(phi, &gradient, component)
    }
}
