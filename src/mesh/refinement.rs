//! Uniform refinement for triangle meshes.

use crate::connectivity::Tri3Connectivity;
use crate::mesh::TriangleMesh2d;
use nalgebra::center;
use rustc_hash::FxHashMap;

/// Applies one round of uniform refinement: every triangle is split into four
/// through its edge midpoints.
///
/// Original vertices keep their indices; midpoints are deduplicated across
/// neighboring triangles so the refined mesh stays conforming. The split
/// preserves triangle orientation.
pub fn refine_uniformly(mesh: &TriangleMesh2d) -> TriangleMesh2d {
    let mut vertices = mesh.vertices().to_vec();
    let mut midpoints: FxHashMap<(usize, usize), usize> = FxHashMap::default();
    let mut connectivity = Vec::with_capacity(4 * mesh.num_elements());

    let mut midpoint_index = |a: usize, b: usize, vertices: &mut Vec<_>| {
        let key = (a.min(b), a.max(b));
        *midpoints.entry(key).or_insert_with(|| {
            let index = vertices.len();
            let midpoint = center(&vertices[a], &vertices[b]);
            vertices.push(midpoint);
            index
        })
    };

    for cell in mesh.connectivity() {
        let Tri3Connectivity([v0, v1, v2]) = *cell;
        let m01 = midpoint_index(v0, v1, &mut vertices);
        let m12 = midpoint_index(v1, v2, &mut vertices);
        let m20 = midpoint_index(v2, v0, &mut vertices);

        connectivity.push(Tri3Connectivity([v0, m01, m20]));
        connectivity.push(Tri3Connectivity([m01, v1, m12]));
        connectivity.push(Tri3Connectivity([m20, m12, v2]));
        connectivity.push(Tri3Connectivity([m01, m12, m20]));
    }

    TriangleMesh2d::from_vertices_and_connectivity(vertices, connectivity)
}

impl TriangleMesh2d {
    /// Returns the mesh refined uniformly the given number of times.
    pub fn refined(&self, levels: usize) -> Self {
        let mut mesh = self.clone();
        for _ in 0..levels {
            mesh = refine_uniformly(&mesh);
        }
        mesh
    }
}
