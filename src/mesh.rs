//! Index-based storage for conforming triangle meshes and derived facets.

use crate::connectivity::{Connectivity, Tri3Connectivity};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod procedural;
pub mod refinement;

/// Index-based data structure for conforming meshes (no hanging nodes).
///
/// The vertex ordering of every cell is expected to be counterclockwise so
/// that the element Jacobian determinant is positive; this is checked when a
/// basis is built over the mesh, not at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh2d<Connectivity> {
    vertices: Vec<Point2<f64>>,
    connectivity: Vec<Connectivity>,
}

pub type TriangleMesh2d = Mesh2d<Tri3Connectivity>;

impl<C> Mesh2d<C> {
    /// Construct a mesh from vertices and connectivity.
    ///
    /// The connectivity is expected to reference only in-bounds vertex
    /// indices. This cannot be verified cheaply here, so consumers of the
    /// mesh are permitted to panic when they encounter an out-of-bounds
    /// index.
    pub fn from_vertices_and_connectivity(
        vertices: Vec<Point2<f64>>,
        connectivity: Vec<C>,
    ) -> Self {
        Self { vertices, connectivity }
    }

    pub fn vertices(&self) -> &[Point2<f64>] {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut [Point2<f64>] {
        &mut self.vertices
    }

    pub fn connectivity(&self) -> &[C] {
        &self.connectivity
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_elements(&self) -> usize {
        self.connectivity.len()
    }

    /// Translates all vertices of the mesh by the given translation vector.
    pub fn translate(&mut self, translation: &Vector2<f64>) {
        self.transform_vertices(|p| *p += translation);
    }

    /// Transform all vertices of the mesh by the given transformation function.
    pub fn transform_vertices<F>(&mut self, mut transformation: F)
    where
        F: FnMut(&mut Point2<f64>),
    {
        for p in &mut self.vertices {
            transformation(p);
        }
    }

    /// Moves every vertex by `scale` times its nodal displacement.
    ///
    /// Useful for visualizing or exporting a deformed configuration after a
    /// displacement field has been solved for.
    ///
    /// # Panics
    ///
    /// Panics if the number of displacements differs from the number of
    /// vertices.
    pub fn displace(&mut self, displacements: &[Vector2<f64>], scale: f64) {
        assert_eq!(
            displacements.len(),
            self.vertices.len(),
            "one displacement per vertex required"
        );
        for (p, d) in self.vertices.iter_mut().zip(displacements) {
            *p += d * scale;
        }
    }
}

impl<C> Mesh2d<C>
where
    C: Connectivity,
    C::FaceConnectivity: Clone,
{
    /// Finds faces which are connected to exactly one cell, along with the
    /// connected cell index and the local index of the face within that cell.
    pub fn find_boundary_faces(&self) -> Vec<(C::FaceConnectivity, usize, usize)> {
        let mut face_info = Vec::new();

        // Count occurrences of each face through its sorted vertex indices,
        // so that faces shared by two cells cancel out regardless of their
        // orientation. A BTreeMap keeps the result deterministic.
        let mut counts: BTreeMap<Vec<usize>, (usize, usize)> = BTreeMap::new();
        for (cell_index, cell) in self.connectivity.iter().enumerate() {
            for local_index in 0..cell.num_faces() {
                let face = cell
                    .get_face_connectivity(local_index)
                    .expect("local face index is in bounds");
                let mut key = face.vertex_indices().to_vec();
                key.sort_unstable();
                counts
                    .entry(key)
                    .and_modify(|(_, count)| *count += 1)
                    .or_insert((face_info.len(), 1));
                face_info.push((face, cell_index, local_index));
            }
        }

        counts
            .into_iter()
            .map(|(_, value)| value)
            .filter(|&(_, count)| count == 1)
            .map(|(first_occurrence, _)| face_info[first_occurrence].clone())
            .collect()
    }

    /// Returns a sorted list of vertices that belong to a boundary face.
    pub fn find_boundary_vertices(&self) -> Vec<usize> {
        let mut indices = Vec::new();
        for (face, _, _) in self.find_boundary_faces() {
            indices.extend(face.vertex_indices());
        }
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}
