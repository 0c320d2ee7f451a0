//! Reference elements and their affine reference-to-physical mappings.
//!
//! Elements are pure descriptions of local shape functions: they own their
//! physical vertices but no other state, and are constructed on the fly from
//! a connectivity and the global vertex array.

use crate::connectivity::{Connectivity, Segment2Connectivity, Tri3Connectivity};
use itertools::Itertools;
use nalgebra::{
    distance, Matrix1x2, Matrix1x3, Matrix2, Matrix2x3, Point1, Point2, Unit, Vector2,
};

/// Local shape functions of an element family on its reference domain.
pub trait ReferenceFiniteElement {
    /// A point on the reference domain of the element.
    type ReferencePoint;
    /// Row vector of basis function values, one entry per node.
    type BasisValues;
    /// Matrix of basis function gradients with respect to reference
    /// coordinates, one column per node.
    type BasisGradients;

    /// Returns the number of nodes in the element.
    fn num_nodes(&self) -> usize;

    /// Evaluates each basis function at the given reference coordinates.
    fn evaluate_basis(&self, xi: &Self::ReferencePoint) -> Self::BasisValues;

    /// Evaluates the reference-coordinate gradient of each basis function at
    /// the given reference coordinates.
    fn gradients(&self, xi: &Self::ReferencePoint) -> Self::BasisGradients;
}

/// An element with a concrete placement in physical space.
pub trait FiniteElement: ReferenceFiniteElement {
    /// The Jacobian of the reference-to-physical map. A matrix for volumetric
    /// elements, a tangent vector for surface elements.
    type Jacobian;

    /// Maps reference coordinates to physical coordinates in the element.
    fn map_reference_coords(&self, xi: &Self::ReferencePoint) -> Point2<f64>;

    /// Computes the Jacobian of the reference-to-physical map at the given
    /// reference coordinates.
    fn reference_jacobian(&self, xi: &Self::ReferencePoint) -> Self::Jacobian;

    /// The diameter of the element, i.e. the largest distance between any two
    /// of its vertices.
    fn diameter(&self) -> f64;
}

/// A surface (codimension 1) element embedded in two dimensions.
pub trait SurfaceFiniteElement: FiniteElement {
    /// Computes the unit normal at the given reference coordinates.
    ///
    /// When the element is an edge of a counterclockwise cell traversed in
    /// the cell's orientation, the normal points out of the cell.
    fn normal(&self, xi: &Self::ReferencePoint) -> Unit<Vector2<f64>>;
}

/// Constructs the element associated with a connectivity from the global
/// vertex array.
pub trait ElementConnectivity: Connectivity {
    type Element;

    /// Returns the element for this connectivity, or `None` if any vertex
    /// index is out of bounds.
    fn element(&self, vertices: &[Point2<f64>]) -> Option<Self::Element>;
}

/// A finite element representing linear basis functions on a triangle.
///
/// The reference element is the unit triangle with corners (0, 0), (1, 0)
/// and (0, 1), so the reference-to-physical map is affine with a constant
/// Jacobian.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tri3Element {
    vertices: [Point2<f64>; 3],
}

impl Tri3Element {
    pub fn from_vertices(vertices: [Point2<f64>; 3]) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point2<f64>; 3] {
        &self.vertices
    }

    pub fn reference() -> Self {
        Self::from_vertices([
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ])
    }

    /// Maps a physical point back to reference coordinates.
    ///
    /// Returns `None` for degenerate elements. The result may lie outside the
    /// reference triangle if the physical point is outside the element.
    pub fn try_inverse_map(&self, x: &Point2<f64>) -> Option<Point2<f64>> {
        let jacobian = self.reference_jacobian(&Point2::origin());
        let inverse = jacobian.try_inverse()?;
        Some(Point2::from(inverse * (x - self.vertices[0])))
    }
}

impl ReferenceFiniteElement for Tri3Element {
    type ReferencePoint = Point2<f64>;
    type BasisValues = Matrix1x3<f64>;
    type BasisGradients = Matrix2x3<f64>;

    fn num_nodes(&self) -> usize {
        3
    }

    fn evaluate_basis(&self, xi: &Point2<f64>) -> Matrix1x3<f64> {
        Matrix1x3::new(1.0 - xi.x - xi.y, xi.x, xi.y)
    }

    fn gradients(&self, _xi: &Point2<f64>) -> Matrix2x3<f64> {
        Matrix2x3::from_columns(&[
            Vector2::new(-1.0, -1.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 1.0),
        ])
    }
}

impl FiniteElement for Tri3Element {
    type Jacobian = Matrix2<f64>;

    fn map_reference_coords(&self, xi: &Point2<f64>) -> Point2<f64> {
        let [v0, v1, v2] = &self.vertices;
        v0 + (v1 - v0) * xi.x + (v2 - v0) * xi.y
    }

    fn reference_jacobian(&self, _xi: &Point2<f64>) -> Matrix2<f64> {
        let [v0, v1, v2] = &self.vertices;
        Matrix2::from_columns(&[v1 - v0, v2 - v0])
    }

    fn diameter(&self) -> f64 {
        self.vertices
            .iter()
            .tuple_combinations()
            .map(|(x, y)| distance(x, y))
            .fold(0.0, f64::max)
    }
}

impl ElementConnectivity for Tri3Connectivity {
    type Element = Tri3Element;

    fn element(&self, vertices: &[Point2<f64>]) -> Option<Self::Element> {
        let Self(indices) = self;
        let lookup_vertex = |local_index: usize| vertices.get(indices[local_index]).copied();

        Some(Tri3Element::from_vertices([
            lookup_vertex(0)?,
            lookup_vertex(1)?,
            lookup_vertex(2)?,
        ]))
    }
}

/// A linear segment element embedded in two dimensions.
///
/// The reference element is the interval `[-1, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Segment2Element {
    from: Point2<f64>,
    to: Point2<f64>,
}

impl Segment2Element {
    pub fn from_vertices(from: Point2<f64>, to: Point2<f64>) -> Self {
        Self { from, to }
    }

    pub fn from_point(&self) -> &Point2<f64> {
        &self.from
    }

    pub fn to_point(&self) -> &Point2<f64> {
        &self.to
    }

    pub fn length(&self) -> f64 {
        distance(&self.from, &self.to)
    }
}

impl ReferenceFiniteElement for Segment2Element {
    type ReferencePoint = Point1<f64>;
    type BasisValues = Matrix1x2<f64>;
    type BasisGradients = Matrix1x2<f64>;

    fn num_nodes(&self) -> usize {
        2
    }

    fn evaluate_basis(&self, xi: &Point1<f64>) -> Matrix1x2<f64> {
        let xi = xi.x;
        Matrix1x2::new((1.0 - xi) / 2.0, (1.0 + xi) / 2.0)
    }

    fn gradients(&self, _xi: &Point1<f64>) -> Matrix1x2<f64> {
        Matrix1x2::new(-0.5, 0.5)
    }
}

impl FiniteElement for Segment2Element {
    type Jacobian = Vector2<f64>;

    fn map_reference_coords(&self, xi: &Point1<f64>) -> Point2<f64> {
        let phi = self.evaluate_basis(xi);
        Point2::from(self.from.coords * phi[0] + self.to.coords * phi[1])
    }

    fn reference_jacobian(&self, _xi: &Point1<f64>) -> Vector2<f64> {
        (self.to - self.from) / 2.0
    }

    fn diameter(&self) -> f64 {
        self.length()
    }
}

impl SurfaceFiniteElement for Segment2Element {
    fn normal(&self, _xi: &Point1<f64>) -> Unit<Vector2<f64>> {
        let tangent = self.to - self.from;
        Unit::new_normalize(Vector2::new(tangent.y, -tangent.x))
    }
}

impl ElementConnectivity for Segment2Connectivity {
    type Element = Segment2Element;

    fn element(&self, vertices: &[Point2<f64>]) -> Option<Self::Element> {
        let Self([a, b]) = self;
        Some(Segment2Element::from_vertices(
            *vertices.get(*a)?,
            *vertices.get(*b)?,
        ))
    }
}
