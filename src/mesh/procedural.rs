//! Basic procedural mesh generation routines.

use crate::connectivity::Tri3Connectivity;
use crate::mesh::TriangleMesh2d;
use nalgebra::{Point2, Vector2};

/// Generates a triangulation of the unit square `[0, 1]^2` with
/// `2 * cells_per_dim^2` triangles.
pub fn create_unit_square_uniform_tri_mesh_2d(cells_per_dim: usize) -> TriangleMesh2d {
    create_rectangular_uniform_tri_mesh_2d(1.0, 1, 1, cells_per_dim, &Vector2::zeros())
}

/// Generates an axis-aligned rectangular uniform triangle mesh given a unit
/// length, dimensions as multipliers of the unit length and the number of
/// cells per unit length.
///
/// Each grid cell is split into two counterclockwise triangles along its
/// bottom-left-to-top-right diagonal.
pub fn create_rectangular_uniform_tri_mesh_2d(
    unit_length: f64,
    units_x: usize,
    units_y: usize,
    cells_per_unit: usize,
    bottom_left: &Vector2<f64>,
) -> TriangleMesh2d {
    if cells_per_unit == 0 || units_x == 0 || units_y == 0 {
        return TriangleMesh2d::from_vertices_and_connectivity(Vec::new(), Vec::new());
    }

    let cell_size = unit_length / cells_per_unit as f64;
    let num_cells_x = units_x * cells_per_unit;
    let num_cells_y = units_y * cells_per_unit;

    let to_global_vertex_index = |i, j| (num_cells_x + 1) * j + i;

    let mut vertices = Vec::with_capacity((num_cells_x + 1) * (num_cells_y + 1));
    for j in 0..=num_cells_y {
        for i in 0..=num_cells_x {
            let offset = Vector2::new(i as f64, j as f64) * cell_size;
            vertices.push(Point2::from(bottom_left + offset));
        }
    }

    let mut cells = Vec::with_capacity(2 * num_cells_x * num_cells_y);
    for j in 0..num_cells_y {
        for i in 0..num_cells_x {
            let bottom_left = to_global_vertex_index(i, j);
            let bottom_right = to_global_vertex_index(i + 1, j);
            let top_right = to_global_vertex_index(i + 1, j + 1);
            let top_left = to_global_vertex_index(i, j + 1);
            cells.push(Tri3Connectivity([bottom_left, bottom_right, top_right]));
            cells.push(Tri3Connectivity([bottom_left, top_right, top_left]));
        }
    }

    TriangleMesh2d::from_vertices_and_connectivity(vertices, cells)
}
