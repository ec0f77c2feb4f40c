use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Indexed triangle list. `triangles` has stride 3.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<u32>,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize { self.triangles.len() / 3 }

    pub fn is_empty(&self) -> bool { self.triangles.is_empty() }

    pub fn triangle(&self, i: usize) -> [u32; 3] {
        [self.triangles[i * 3], self.triangles[i * 3 + 1], self.triangles[i * 3 + 2]]
    }

    pub fn iter_triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.triangles.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Positions as plain arrays, ready for a vertex buffer.
    pub fn positions(&self) -> Vec<[f32; 3]> {
        self.vertices.iter().map(|v| [v.x, v.y, v.z]).collect()
    }

    /// Axis-aligned bounds, `None` for a mesh without vertices.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), v| (lo.min(*v), hi.max(*v))))
    }
}

#[derive(Default)]
pub struct MeshBuilder {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self { positions: Vec::new(), indices: Vec::new() }
    }

    /// Appends a vertex and returns its index.
    pub fn push_vertex(&mut self, position: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        index
    }

    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Four fresh vertices, triangles (tl, bl, br) and (br, tr, tl).
    pub fn add_quad(&mut self, top_left: Vec3, top_right: Vec3, bottom_left: Vec3, bottom_right: Vec3) {
        let base = self.positions.len() as u32;
        for p in [top_left, top_right, bottom_left, bottom_right] {
            self.positions.push(p);
        }
        for index in [0, 2, 3, 3, 1, 0] {
            self.indices.push(base + index);
        }
    }

    pub fn vertex_count(&self) -> usize { self.positions.len() }

    pub fn build(self) -> Mesh {
        Mesh { vertices: self.positions, triangles: self.indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_winding_is_fixed() {
        let mut b = MeshBuilder::new();
        b.add_quad(Vec3::ZERO, Vec3::X, Vec3::NEG_Y, Vec3::new(1.0, -1.0, 0.0));
        let mesh = b.build();
        assert_eq!(mesh.triangles, vec![0, 2, 3, 3, 1, 0]);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn bounds_span_all_vertices() {
        let mut b = MeshBuilder::new();
        let i = b.push_vertex(Vec3::new(-1.0, 2.0, 0.5));
        let j = b.push_vertex(Vec3::new(3.0, -4.0, 0.0));
        let k = b.push_vertex(Vec3::ZERO);
        b.add_triangle(i, j, k);
        let mesh = b.build();
        assert_eq!(mesh.bounds(), Some((Vec3::new(-1.0, -4.0, 0.0), Vec3::new(3.0, 2.0, 0.5))));
        assert_eq!(mesh.triangle(0), [0, 1, 2]);
        assert_eq!(mesh.positions()[1], [3.0, -4.0, 0.0]);
        assert_eq!(Mesh::default().bounds(), None);
    }
}
