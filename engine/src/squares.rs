//! Marching squares over binary 2D fields.

use std::collections::HashSet;

use crate::api::{CaveError, Result};
use crate::field::ScalarField;
use crate::lattice::{Axis, Layout, NodeArena, NodeId};
use crate::mesh::{Mesh, MeshBuilder};
use crate::outline::{self, OutlineLoop};

/// Default extrusion depth of 2D cave walls.
pub const DEFAULT_WALL_HEIGHT: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquarePoint {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    CentreTop,
    CentreRight,
    CentreBottom,
    CentreLeft,
}

use SquarePoint::*;

/// Fan point list per configuration (8 = top-left, 4 = top-right, 2 = bottom-right, 1 = bottom-left).
const SQUARE_POINTS: [&[SquarePoint]; 16] = [
    &[],
    &[CentreLeft, CentreBottom, BottomLeft],
    &[BottomRight, CentreBottom, CentreRight],
    &[CentreRight, BottomRight, BottomLeft, CentreLeft],
    &[TopRight, CentreRight, CentreTop],
    &[CentreTop, TopRight, CentreRight, CentreBottom, BottomLeft, CentreLeft],
    &[CentreTop, TopRight, BottomRight, CentreBottom],
    &[CentreTop, TopRight, BottomRight, BottomLeft, CentreLeft],
    &[TopLeft, CentreTop, CentreLeft],
    &[TopLeft, CentreTop, CentreBottom, BottomLeft],
    &[TopLeft, CentreTop, CentreRight, BottomRight, CentreBottom, CentreLeft],
    &[TopLeft, CentreTop, CentreRight, BottomRight, BottomLeft],
    &[TopLeft, TopRight, CentreRight, CentreLeft],
    &[TopLeft, TopRight, CentreRight, CentreBottom, BottomLeft],
    &[TopLeft, TopRight, BottomRight, CentreBottom, CentreLeft],
    &[TopLeft, TopRight, BottomRight, BottomLeft],
];

/// Ordered fan points for a square configuration.
pub fn square_points(config: usize) -> Result<&'static [SquarePoint]> {
    SQUARE_POINTS.get(config).copied().ok_or(CaveError::Lookup(config))
}

/// One cell of the square grid, holding arena ids of its corners and mid-edges.
#[derive(Debug, Clone, Copy)]
pub struct Square {
    pub top_left: NodeId,
    pub top_right: NodeId,
    pub bottom_right: NodeId,
    pub bottom_left: NodeId,
    pub centre_top: NodeId,
    pub centre_right: NodeId,
    pub centre_bottom: NodeId,
    pub centre_left: NodeId,
    pub configuration: usize,
}

impl Square {
    /// Square whose bottom-left corner is lattice point `(x, y)`.
    pub fn new(arena: &NodeArena, x: usize, y: usize) -> Self {
        let top_left = arena.control(x, y + 1, 0);
        let top_right = arena.control(x + 1, y + 1, 0);
        let bottom_right = arena.control(x + 1, y, 0);
        let bottom_left = arena.control(x, y, 0);

        let mut configuration = 0;
        if arena.is_active(top_left) { configuration += 8; }
        if arena.is_active(top_right) { configuration += 4; }
        if arena.is_active(bottom_right) { configuration += 2; }
        if arena.is_active(bottom_left) { configuration += 1; }

        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
            centre_top: arena.edge(x, y + 1, 0, Axis::Right),
            centre_right: arena.edge(x + 1, y, 0, Axis::Above),
            centre_bottom: arena.edge(x, y, 0, Axis::Right),
            centre_left: arena.edge(x, y, 0, Axis::Above),
            configuration,
        }
    }

    pub fn node(&self, point: SquarePoint) -> NodeId {
        match point {
            TopLeft => self.top_left,
            TopRight => self.top_right,
            BottomRight => self.bottom_right,
            BottomLeft => self.bottom_left,
            CentreTop => self.centre_top,
            CentreRight => self.centre_right,
            CentreBottom => self.centre_bottom,
            CentreLeft => self.centre_left,
        }
    }

    pub fn corners(&self) -> [NodeId; 4] {
        [self.top_left, self.top_right, self.bottom_right, self.bottom_left]
    }
}

/// Floor mesh of a 2D cave plus the vertices already enclosed by full squares.
#[derive(Debug, Clone, Default)]
pub struct SquareSurface {
    pub mesh: Mesh,
    /// Corner vertices of configuration-15 squares; outline tracing skips them.
    pub closed: HashSet<u32>,
}

/// Everything a 2D regeneration hands back to the host.
#[derive(Debug, Clone, Default)]
pub struct CaveMesh2d {
    pub surface: Mesh,
    pub walls: Mesh,
    pub outlines: Vec<OutlineLoop>,
}

#[derive(Debug, Clone, Copy)]
pub struct MarchingSquares {
    pub cell_size: f32,
    pub wall_height: f32,
}

impl MarchingSquares {
    pub fn new(cell_size: f32) -> Result<Self> {
        Self::with_wall_height(cell_size, DEFAULT_WALL_HEIGHT)
    }

    pub fn with_wall_height(cell_size: f32, wall_height: f32) -> Result<Self> {
        check_positive("cell size", cell_size)?;
        check_positive("wall height", wall_height)?;
        Ok(Self { cell_size, wall_height })
    }

    /// Builds the square grid and triangulates every cell.
    pub fn triangulate(&self, field: &ScalarField) -> Result<SquareSurface> {
        if !field.is_2d() {
            return Err(CaveError::Config(format!("marching squares needs a 2D field, got depth {}", field.depth())));
        }
        let mut arena = NodeArena::build(field, self.cell_size, Layout::Plane, |v| v == 1, |_, _| 0.5);

        let mut squares = Vec::with_capacity(field.width().saturating_sub(1) * field.height().saturating_sub(1));
        for x in 0..field.width().saturating_sub(1) {
            for y in 0..field.height().saturating_sub(1) {
                squares.push(Square::new(&arena, x, y));
            }
        }

        let mut builder = MeshBuilder::new();
        let mut closed = HashSet::new();
        for square in &squares {
            triangulate_square(square, &mut arena, &mut builder, &mut closed)?;
        }

        let mesh = builder.build();
        log::debug!(
            "marching squares: {} cells, {} vertices, {} triangles",
            squares.len(),
            mesh.vertices.len(),
            mesh.triangle_count()
        );
        Ok(SquareSurface { mesh, closed })
    }

    /// Surface, traced outlines and extruded walls in one pass.
    pub fn generate(&self, field: &ScalarField) -> Result<CaveMesh2d> {
        let SquareSurface { mesh, closed } = self.triangulate(field)?;
        let outlines = outline::trace_outlines(&mesh, &closed);
        let walls = outline::build_walls(&mesh, &outlines, self.wall_height);
        log::info!(
            "2D cave mesh: {} surface triangles, {} outlines, {} wall triangles",
            mesh.triangle_count(),
            outlines.len(),
            walls.triangle_count()
        );
        Ok(CaveMesh2d { surface: mesh, walls, outlines })
    }
}

fn triangulate_square(
    square: &Square,
    arena: &mut NodeArena,
    builder: &mut MeshBuilder,
    closed: &mut HashSet<u32>,
) -> Result<()> {
    let points = square_points(square.configuration)?;
    if points.is_empty() {
        return Ok(());
    }

    let vertices: Vec<u32> = points.iter().map(|&p| arena.vertex(square.node(p), builder)).collect();
    for i in 1..vertices.len() - 1 {
        builder.add_triangle(vertices[0], vertices[i], vertices[i + 1]);
    }

    if square.configuration == 15 {
        for corner in square.corners() {
            if let Some(v) = arena.node(corner).vertex() {
                closed.insert(v);
            }
        }
    }
    Ok(())
}

pub(crate) fn check_positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CaveError::Config(format!("{name} must be a positive number, got {value}")))
    }
}

/// Surface and wall meshes for a binary field, default wall height.
pub fn generate_mesh_2d(field: &ScalarField, cell_size: f32) -> Result<(Mesh, Mesh)> {
    let cave = MarchingSquares::new(cell_size)?.generate(field)?;
    Ok((cave.surface, cave.walls))
}
