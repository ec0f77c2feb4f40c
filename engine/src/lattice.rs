//! Control nodes and edge nodes for one generation pass.
//!
//! Every lattice point owns one control node and one edge node per axis. Ids
//! are arithmetic: control node `i` is the field index, the edge node along
//! `axis` is `len * (1 + axis) + i`. Cells never copy nodes, they hold ids, so
//! two cells sharing a lattice edge resolve to the same node and therefore the
//! same vertex.

use glam::Vec3;

use crate::field::ScalarField;
use crate::mesh::MeshBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize { self.0 as usize }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis { Right = 0, Above = 1, Front = 2 }

/// Lattice point (`active` is `Some`) or edge crossing (`active` is `None`).
#[derive(Debug, Clone, Copy)]
pub struct Node {
    pub position: Vec3,
    pub active: Option<bool>,
    vertex: Option<u32>,
}

impl Node {
    fn new(position: Vec3, active: Option<bool>) -> Self {
        Self { position, active, vertex: None }
    }

    pub fn vertex(&self) -> Option<u32> { self.vertex }
    pub fn is_active(&self) -> bool { self.active == Some(true) }
}

/// How lattice coordinates map into world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// 2D field on the XZ plane; lattice `y` runs along world Z.
    Plane,
    /// 3D field; lattice axes match world axes.
    Volume,
}

impl Layout {
    fn axes(self) -> &'static [Axis] {
        match self {
            Layout::Plane => &[Axis::Right, Axis::Above],
            Layout::Volume => &[Axis::Right, Axis::Above, Axis::Front],
        }
    }

    fn direction(self, axis: Axis) -> Vec3 {
        match (self, axis) {
            (_, Axis::Right) => Vec3::X,
            (Layout::Plane, Axis::Above) => Vec3::Z,
            (Layout::Volume, Axis::Above) => Vec3::Y,
            (_, Axis::Front) => Vec3::Z,
        }
    }

    fn position(self, field: &ScalarField, cell_size: f32, x: usize, y: usize, z: usize) -> Vec3 {
        let half_w = field.width() as f32 * cell_size / 2.0;
        let half_h = field.height() as f32 * cell_size / 2.0;
        let half_d = field.depth() as f32 * cell_size / 2.0;
        match self {
            Layout::Plane => Vec3::new(-half_w + x as f32 * cell_size, 0.0, -half_h + y as f32 * cell_size),
            Layout::Volume => Vec3::new(
                -half_w + x as f32 * cell_size,
                -half_h + y as f32 * cell_size,
                -half_d + z as f32 * cell_size,
            ),
        }
    }
}

pub struct NodeArena {
    width: usize,
    height: usize,
    len: usize,
    nodes: Vec<Node>,
}

impl NodeArena {
    /// Builds every node of the lattice. `fraction(this, neighbour)` places an
    /// edge node along its edge; slots past the far faces (no neighbour) sit at
    /// the midpoint and are never referenced by a cell.
    pub fn build(
        field: &ScalarField,
        cell_size: f32,
        layout: Layout,
        is_active: impl Fn(u32) -> bool,
        fraction: impl Fn(u32, u32) -> f32,
    ) -> Self {
        let len = field.len();
        let axes = layout.axes();
        let mut nodes = Vec::with_capacity(len * (1 + axes.len()));

        for z in 0..field.depth() {
            for y in 0..field.height() {
                for x in 0..field.width() {
                    let value = field.get(x, y, z);
                    nodes.push(Node::new(layout.position(field, cell_size, x, y, z), Some(is_active(value))));
                }
            }
        }

        for &axis in axes {
            let dir = layout.direction(axis) * cell_size;
            for z in 0..field.depth() {
                for y in 0..field.height() {
                    for x in 0..field.width() {
                        let value = field.get(x, y, z);
                        let t = match neighbour(field, x, y, z, axis) {
                            Some(n) => fraction(value, n),
                            None => 0.5,
                        };
                        let origin = nodes[field.index(x, y, z)].position;
                        nodes.push(Node::new(origin + dir * t, None));
                    }
                }
            }
        }

        Self { width: field.width(), height: field.height(), len, nodes }
    }

    #[inline]
    fn lattice_index(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.height + y) * self.width + x
    }

    pub fn control(&self, x: usize, y: usize, z: usize) -> NodeId {
        NodeId(self.lattice_index(x, y, z) as u32)
    }

    pub fn edge(&self, x: usize, y: usize, z: usize, axis: Axis) -> NodeId {
        NodeId((self.len * (1 + axis as usize) + self.lattice_index(x, y, z)) as u32)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn is_active(&self, id: NodeId) -> bool {
        self.nodes[id.index()].is_active()
    }

    /// Vertex index of `id`, pushing its position into `mesh` on first use.
    pub fn vertex(&mut self, id: NodeId, mesh: &mut MeshBuilder) -> u32 {
        let node = &mut self.nodes[id.index()];
        if let Some(v) = node.vertex {
            return v;
        }
        let v = mesh.push_vertex(node.position);
        node.vertex = Some(v);
        v
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
}

fn neighbour(field: &ScalarField, x: usize, y: usize, z: usize, axis: Axis) -> Option<u32> {
    match axis {
        Axis::Right if x + 1 < field.width() => Some(field.get(x + 1, y, z)),
        Axis::Above if y + 1 < field.height() => Some(field.get(x, y + 1, z)),
        Axis::Front if z + 1 < field.depth() => Some(field.get(x, y, z + 1)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn plane_layout_centres_lattice_on_origin() {
        let field = ScalarField::new_2d(4, 2).unwrap();
        let arena = NodeArena::build(&field, 2.0, Layout::Plane, |v| v == 1, |_, _| 0.5);
        let p = arena.node(arena.control(0, 0, 0)).position;
        assert_relative_eq!(p.x, -4.0);
        assert_relative_eq!(p.y, 0.0);
        assert_relative_eq!(p.z, -2.0);
        let above = arena.node(arena.edge(1, 0, 0, Axis::Above)).position;
        assert_relative_eq!(above.x, -2.0);
        assert_relative_eq!(above.z, -1.0);
        assert_eq!(arena.node_count(), 8 * 3);
    }

    #[test]
    fn edge_nodes_are_shared_and_indexed_once() {
        let field = ScalarField::new_3d(3, 3, 3).unwrap();
        let mut arena = NodeArena::build(&field, 1.0, Layout::Volume, |v| v > 0, |_, _| 0.25);
        let mut mesh = MeshBuilder::new();
        let id = arena.edge(1, 1, 1, Axis::Front);
        assert_eq!(arena.edge(1, 1, 1, Axis::Front), id);
        assert!(arena.node(id).active.is_none());
        assert_eq!(arena.vertex(id, &mut mesh), 0);
        assert_eq!(arena.vertex(id, &mut mesh), 0);
        assert_eq!(mesh.vertex_count(), 1);
        let p = arena.node(id).position;
        assert_relative_eq!(p.z, -1.5 + 1.0 + 0.25);
    }
}
