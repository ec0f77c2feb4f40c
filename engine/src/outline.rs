//! Boundary tracing over a welded surface mesh, and wall extrusion along the traced loops.

use std::collections::{HashMap, HashSet};

use glam::Vec3;

use crate::mesh::{Mesh, MeshBuilder};

/// Vertex indices of one boundary loop; the first index is repeated at the end.
pub type OutlineLoop = Vec<u32>;

/// Triangles touching each vertex, by triangle number.
struct VertexTriangles {
    mesh_triangles: Vec<[u32; 3]>,
    by_vertex: Vec<Vec<usize>>,
}

impl VertexTriangles {
    fn new(mesh: &Mesh) -> Self {
        let mesh_triangles: Vec<[u32; 3]> = mesh.iter_triangles().collect();
        let mut by_vertex = vec![Vec::new(); mesh.vertices.len()];
        for (t, tri) in mesh_triangles.iter().enumerate() {
            for &v in tri {
                if let Some(list) = by_vertex.get_mut(v as usize) {
                    list.push(t);
                }
            }
        }
        Self { mesh_triangles, by_vertex }
    }

    fn of(&self, vertex: u32) -> &[usize] {
        self.by_vertex.get(vertex as usize).map_or(&[], Vec::as_slice)
    }

    /// An edge is on the outline when exactly one triangle uses it.
    fn is_outline_edge(&self, a: u32, b: u32) -> bool {
        self.of(a)
            .iter()
            .filter(|&&t| self.mesh_triangles[t].contains(&b))
            .take(2)
            .count()
            == 1
    }

    fn connected_outline_vertex(&self, vertex: u32, checked: &HashSet<u32>) -> Option<u32> {
        for &t in self.of(vertex) {
            for &other in &self.mesh_triangles[t] {
                if other != vertex && !checked.contains(&other) && self.is_outline_edge(vertex, other) {
                    return Some(other);
                }
            }
        }
        None
    }
}

/// Walks every boundary loop of `mesh`. Vertices in `excluded` are treated as
/// already visited and never start or join a loop.
pub fn trace_outlines(mesh: &Mesh, excluded: &HashSet<u32>) -> Vec<OutlineLoop> {
    let index = VertexTriangles::new(mesh);
    let mut checked = excluded.clone();
    let mut outlines = Vec::new();

    for start in 0..mesh.vertices.len() as u32 {
        if checked.contains(&start) {
            continue;
        }
        let Some(mut next) = index.connected_outline_vertex(start, &checked) else {
            continue;
        };
        checked.insert(start);
        let mut outline = vec![start];
        loop {
            outline.push(next);
            checked.insert(next);
            match index.connected_outline_vertex(next, &checked) {
                Some(v) => next = v,
                None => break,
            }
        }
        outline.push(start);
        outlines.push(outline);
    }

    log::debug!("traced {} outline loops", outlines.len());
    outlines
}

/// One quad per consecutive pair in each loop, hanging `wall_height` below the surface.
pub fn build_walls(mesh: &Mesh, outlines: &[OutlineLoop], wall_height: f32) -> Mesh {
    let drop = Vec3::Y * wall_height;
    let mut walls = MeshBuilder::new();
    for outline in outlines {
        for pair in outline.windows(2) {
            let (Some(&left), Some(&right)) = (mesh.vertices.get(pair[0] as usize), mesh.vertices.get(pair[1] as usize)) else {
                continue;
            };
            walls.add_quad(left, right, left - drop, right - drop);
        }
    }
    walls.build()
}

/// Number of undirected edges used by exactly one triangle.
pub fn count_boundary_edges(mesh: &Mesh) -> usize {
    let mut uses: HashMap<(u32, u32), u32> = HashMap::new();
    for [a, b, c] in mesh.iter_triangles() {
        for (p, q) in [(a, b), (b, c), (c, a)] {
            *uses.entry((p.min(q), p.max(q))).or_default() += 1;
        }
    }
    uses.values().filter(|&&n| n == 1).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ScalarField;
    use crate::squares::MarchingSquares;
    use approx::assert_relative_eq;

    fn ring_5x5() -> ScalarField {
        let mut rows = vec![vec![1; 5]; 5];
        for row in rows.iter_mut().take(4).skip(1) {
            row[1..4].fill(0);
        }
        ScalarField::from_rows(&rows).unwrap()
    }

    fn edge_count(outlines: &[OutlineLoop]) -> usize {
        outlines.iter().map(|o| o.len() - 1).sum()
    }

    #[test]
    fn open_ring_has_inner_and_outer_loops() {
        let surface = MarchingSquares::new(1.0).unwrap().triangulate(&ring_5x5()).unwrap();
        let outlines = trace_outlines(&surface.mesh, &surface.closed);
        assert_eq!(outlines.len(), 2);
        let mut lens: Vec<usize> = outlines.iter().map(|o| o.len() - 1).collect();
        lens.sort_unstable();
        assert_eq!(lens, vec![12, 16]);
        assert_eq!(edge_count(&outlines), count_boundary_edges(&surface.mesh));
    }

    #[test]
    fn framed_ring_keeps_only_the_cave_loop() {
        let field = ring_5x5().with_border(1);
        let surface = MarchingSquares::new(1.0).unwrap().triangulate(&field).unwrap();
        let outlines = trace_outlines(&surface.mesh, &surface.closed);
        assert_eq!(outlines.len(), 1);
        assert_eq!(outlines[0].len(), 13);
        assert_eq!(outlines[0].first(), outlines[0].last());

        let walls = build_walls(&surface.mesh, &outlines, 5.0);
        assert_eq!(walls.vertices.len(), 48);
        assert_eq!(walls.triangles.len(), 72);
    }

    #[test]
    fn wall_quads_hang_below_the_outline() {
        let field = ring_5x5().with_border(1);
        let surface = MarchingSquares::new(2.0).unwrap().triangulate(&field).unwrap();
        let outlines = trace_outlines(&surface.mesh, &surface.closed);
        let walls = build_walls(&surface.mesh, &outlines, 3.0);
        for quad in walls.vertices.chunks_exact(4) {
            assert_relative_eq!(quad[0].y, 0.0);
            assert_relative_eq!(quad[2].y, -3.0);
            assert_relative_eq!(quad[2].x, quad[0].x);
            assert_relative_eq!(quad[3].z, quad[1].z);
        }
    }

    #[test]
    fn excluded_vertices_never_appear() {
        let surface = MarchingSquares::new(1.0).unwrap().triangulate(&ring_5x5().with_border(1)).unwrap();
        let outlines = trace_outlines(&surface.mesh, &surface.closed);
        assert!(outlines.iter().flatten().all(|v| !surface.closed.contains(v)));
    }

    #[test]
    fn lone_triangle_is_one_loop() {
        let mut b = MeshBuilder::new();
        let p = b.push_vertex(Vec3::ZERO);
        let q = b.push_vertex(Vec3::X);
        let r = b.push_vertex(Vec3::Z);
        b.add_triangle(p, q, r);
        let mesh = b.build();
        let outlines = trace_outlines(&mesh, &HashSet::new());
        assert_eq!(outlines, vec![vec![0, 1, 2, 0]]);
        assert_eq!(count_boundary_edges(&mesh), 3);
        assert!(trace_outlines(&Mesh::default(), &HashSet::new()).is_empty());
    }
}
