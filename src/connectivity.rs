//! Index-based cell and facet connectivity.

use serde::{Deserialize, Serialize};

/// Vertex-index connectivity of a cell or facet.
pub trait Connectivity {
    type FaceConnectivity: Connectivity;

    fn vertex_indices(&self) -> &[usize];

    fn num_faces(&self) -> usize;

    /// Returns the connectivity of the face with the given local index.
    ///
    /// Faces are oriented consistently with the cell, so that for
    /// counterclockwise cells each face is traversed in counterclockwise
    /// order around the cell.
    fn get_face_connectivity(&self, index: usize) -> Option<Self::FaceConnectivity>;
}

/// Connectivity of a 3-node (linear) triangle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tri3Connectivity(pub [usize; 3]);

/// Connectivity of a 2-node (linear) segment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment2Connectivity(pub [usize; 2]);

impl Connectivity for Tri3Connectivity {
    type FaceConnectivity = Segment2Connectivity;

    fn vertex_indices(&self) -> &[usize] {
        &self.0
    }

    fn num_faces(&self) -> usize {
        3
    }

    fn get_face_connectivity(&self, index: usize) -> Option<Self::FaceConnectivity> {
        let Self([a, b, c]) = *self;
        match index {
            0 => Some(Segment2Connectivity([a, b])),
            1 => Some(Segment2Connectivity([b, c])),
            2 => Some(Segment2Connectivity([c, a])),
            _ => None,
        }
    }
}

impl Connectivity for Segment2Connectivity {
    type FaceConnectivity = Segment2Connectivity;

    fn vertex_indices(&self) -> &[usize] {
        &self.0
    }

    fn num_faces(&self) -> usize {
        0
    }

    fn get_face_connectivity(&self, _index: usize) -> Option<Self::FaceConnectivity> {
        None
    }
}
