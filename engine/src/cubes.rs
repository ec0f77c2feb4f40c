//! Marching cubes over continuous 3D density fields.

use serde::{Deserialize, Serialize};

use crate::api::{CaveError, Result};
use crate::field::ScalarField;
use crate::lattice::{Axis, Layout, NodeArena, NodeId};
use crate::mesh::{Mesh, MeshBuilder};
use crate::squares::check_positive;
use crate::tables;

/// Placement of a surface crossing along a lattice edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    /// Linear position of the surface level between the two values.
    #[default]
    Linear,
    /// Scaled fraction kept for parity with meshes produced by older builds.
    Reference,
}

impl Interpolation {
    pub fn fraction(self, this: u32, neighbour: u32, surface: u32) -> f32 {
        match self {
            Interpolation::Linear => surface_percentage(this, neighbour, surface),
            Interpolation::Reference => reference_surface_percentage(this, neighbour, surface),
        }
    }
}

/// Where `surface` lies between `this` and `neighbour`, measured from `this`.
pub fn surface_percentage(this: u32, neighbour: u32, surface: u32) -> f32 {
    if this == neighbour {
        return 0.5;
    }
    let (a, b, s) = (this as f32, neighbour as f32, surface as f32);
    ((s - a) / (b - a)).clamp(0.0, 1.0)
}

/// `(s + |min|) / (|a - b| * 100)`, mirrored when `this > neighbour`.
pub fn reference_surface_percentage(this: u32, neighbour: u32, surface: u32) -> f32 {
    if this == neighbour {
        return 0.5;
    }
    let (a, b, s) = (this as f32, neighbour as f32, surface as f32);
    let range = (a - b).abs() * 100.0;
    let p = (s + a.min(b).abs()) / range;
    if a > b { 1.0 - p } else { p }
}

/// Corner offsets `(dx, dy, dz)` in canonical corner order.
const CORNER_OFFSETS: [[usize; 3]; 8] = [
    [0, 0, 1],
    [1, 0, 1],
    [1, 0, 0],
    [0, 0, 0],
    [0, 1, 1],
    [1, 1, 1],
    [1, 1, 0],
    [0, 1, 0],
];

/// Owning corner and axis of each canonical edge.
const EDGE_OWNERS: [(usize, Axis); 12] = [
    (0, Axis::Right),
    (2, Axis::Front),
    (3, Axis::Right),
    (3, Axis::Front),
    (4, Axis::Right),
    (6, Axis::Front),
    (7, Axis::Right),
    (7, Axis::Front),
    (0, Axis::Above),
    (1, Axis::Above),
    (2, Axis::Above),
    (3, Axis::Above),
];

#[derive(Debug, Clone, Copy)]
pub struct Cube {
    pub corners: [NodeId; 8],
    pub edges: [NodeId; 12],
    pub configuration: usize,
}

impl Cube {
    pub fn new(arena: &NodeArena, x: usize, y: usize, z: usize) -> Self {
        let at = |c: usize| {
            let [dx, dy, dz] = CORNER_OFFSETS[c];
            (x + dx, y + dy, z + dz)
        };
        let corners: [NodeId; 8] = std::array::from_fn(|c| {
            let (cx, cy, cz) = at(c);
            arena.control(cx, cy, cz)
        });
        let edges: [NodeId; 12] = std::array::from_fn(|e| {
            let (owner, axis) = EDGE_OWNERS[e];
            let (cx, cy, cz) = at(owner);
            arena.edge(cx, cy, cz, axis)
        });
        let configuration = corners
            .iter()
            .enumerate()
            .filter(|&(_, id)| !arena.is_active(*id))
            .fold(0usize, |acc, (c, _)| acc | (1 << c));
        Self { corners, edges, configuration }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MarchingCubes {
    pub cell_size: f32,
    pub surface_level: u32,
    pub interpolation: Interpolation,
}

impl MarchingCubes {
    pub fn new(cell_size: f32, surface_level: u32) -> Result<Self> {
        Self::with_interpolation(cell_size, surface_level, Interpolation::default())
    }

    pub fn with_interpolation(cell_size: f32, surface_level: u32, interpolation: Interpolation) -> Result<Self> {
        check_positive("cell size", cell_size)?;
        if surface_level == 0 {
            return Err(CaveError::Config("surface level must be at least 1".into()));
        }
        Ok(Self { cell_size, surface_level, interpolation })
    }

    pub fn triangulate(&self, field: &ScalarField) -> Result<Mesh> {
        let surface = self.surface_level;
        let interpolation = self.interpolation;
        let mut arena = NodeArena::build(
            field,
            self.cell_size,
            Layout::Volume,
            |v| v >= surface,
            |this, neighbour| interpolation.fraction(this, neighbour, surface),
        );

        let (w, h, d) = (field.width(), field.height(), field.depth());
        let mut builder = MeshBuilder::new();
        let mut cells = 0usize;
        for x in 0..w.saturating_sub(1) {
            for y in 0..h.saturating_sub(1) {
                for z in 0..d.saturating_sub(1) {
                    let cube = Cube::new(&arena, x, y, z);
                    triangulate_cube(&cube, &mut arena, &mut builder)?;
                    cells += 1;
                }
            }
        }

        let mesh = builder.build();
        log::info!(
            "3D cave mesh: {cells} cubes, {} vertices, {} triangles (surface {surface}, {interpolation:?})",
            mesh.vertices.len(),
            mesh.triangle_count()
        );
        Ok(mesh)
    }
}

fn triangulate_cube(cube: &Cube, arena: &mut NodeArena, builder: &mut MeshBuilder) -> Result<()> {
    let crossed = tables::crossed_edges(cube.configuration)?;
    if crossed == 0 {
        return Ok(());
    }
    let mut vertices = [0u32; 12];
    for (e, slot) in vertices.iter_mut().enumerate() {
        if crossed & (1 << e) != 0 {
            *slot = arena.vertex(cube.edges[e], builder);
        }
    }
    for [a, b, c] in tables::triangles(cube.configuration)? {
        builder.add_triangle(vertices[a], vertices[b], vertices[c]);
    }
    Ok(())
}

/// Isosurface of `field` at `surface_level` with linear edge interpolation.
pub fn generate_mesh_3d(field: &ScalarField, cell_size: f32, surface_level: u32) -> Result<Mesh> {
    MarchingCubes::new(cell_size, surface_level)?.triangulate(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::count_boundary_edges;
    use approx::assert_relative_eq;

    fn single_peak() -> ScalarField {
        let mut field = ScalarField::new_3d(3, 3, 3).unwrap();
        field.set(1, 1, 1, 100);
        field
    }

    #[test]
    fn equal_values_cross_at_midpoint() {
        for s in [1, 50, 99] {
            assert_relative_eq!(surface_percentage(7, 7, s), 0.5);
            assert_relative_eq!(reference_surface_percentage(7, 7, s), 0.5);
        }
    }

    #[test]
    fn linear_fraction_is_mirrored() {
        assert_relative_eq!(surface_percentage(0, 100, 25), 0.25);
        assert_relative_eq!(surface_percentage(100, 0, 25), 0.75);
        assert_relative_eq!(surface_percentage(0, 10, 50), 1.0);
    }

    #[test]
    fn reference_fraction_keeps_its_scale() {
        assert_relative_eq!(reference_surface_percentage(0, 100, 50), 0.005);
        assert_relative_eq!(reference_surface_percentage(100, 0, 50), 0.995);
    }

    #[test]
    fn single_peak_is_a_closed_octahedron() {
        let mesh = generate_mesh_3d(&single_peak(), 1.0, 50).unwrap();
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.triangle_count(), 8);
        assert_eq!(count_boundary_edges(&mesh), 0);
        for v in &mesh.vertices {
            // peak sits at -1.5 + 1 = -0.5 on every axis, crossings half a cell away
            let offset = *v - glam::Vec3::splat(-0.5);
            assert_relative_eq!(offset.length(), 0.5, epsilon = 1e-6);
        }
    }

    #[test]
    fn uniform_fields_emit_nothing() {
        let mut field = ScalarField::new_3d(4, 4, 4).unwrap();
        assert!(generate_mesh_3d(&field, 1.0, 10).unwrap().is_empty());
        field.fill(80);
        assert!(generate_mesh_3d(&field, 1.0, 10).unwrap().is_empty());
    }

    #[test]
    fn configuration_bits_mark_inactive_corners() {
        let field = single_peak();
        let arena = NodeArena::build(&field, 1.0, Layout::Volume, |v| v >= 50, |_, _| 0.5);
        // peak is corner 5 of the cube at the origin
        assert_eq!(Cube::new(&arena, 0, 0, 0).configuration, 0xff & !(1 << 5));
        // and corner 3 of the cube at (1, 1, 1)
        assert_eq!(Cube::new(&arena, 1, 1, 1).configuration, 0xff & !(1 << 3));
    }

    #[test]
    fn reference_mode_changes_placement_only() {
        let linear = generate_mesh_3d(&single_peak(), 1.0, 50).unwrap();
        let reference = MarchingCubes::with_interpolation(1.0, 50, Interpolation::Reference)
            .unwrap()
            .triangulate(&single_peak())
            .unwrap();
        assert_eq!(linear.triangles, reference.triangles);
        assert_ne!(linear.vertices, reference.vertices);
    }

    #[test]
    fn invalid_parameters_fail_fast() {
        assert!(matches!(MarchingCubes::new(1.0, 0), Err(CaveError::Config(_))));
        assert!(MarchingCubes::new(-1.0, 10).is_err());
        assert!(MarchingCubes::new(f32::INFINITY, 10).is_err());
    }
}
