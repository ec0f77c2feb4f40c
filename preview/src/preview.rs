use cave_engine::{Cave2d, Cave3d, Mesh, ScalarField};
use serde::Serialize;

use crate::ui_strings::UiStrings;

const RAMP: &[u8] = b" .:-=+*#%@";

/// One character per value, darker for denser; `max_value` maps to the last ramp entry.
pub fn shade_layer(field: &ScalarField, z: usize, max_value: u32) -> String {
    let max = max_value.max(1) as f32;
    let mut out = String::with_capacity((field.width() + 1) * field.height());
    for y in (0..field.height()).rev() {
        for x in 0..field.width() {
            let v = (field.get(x, y, z) as f32 / max).clamp(0.0, 1.0);
            let i = (v * (RAMP.len() - 1) as f32).round() as usize;
            out.push(RAMP[i] as char);
        }
        out.push('\n');
    }
    out
}

/// Horizontal cut through a 3D field at height `y`, laid out with `z` as rows.
pub fn horizontal_slice(field: &ScalarField, y: usize) -> anyhow::Result<ScalarField> {
    anyhow::ensure!(y < field.height(), "slice {y} outside field height {}", field.height());
    let mut slice = ScalarField::new_2d(field.width(), field.depth())?;
    for x in 0..field.width() {
        for z in 0..field.depth() {
            slice.set(x, z, 0, field.get(x, y, z));
        }
    }
    Ok(slice)
}

#[derive(Debug, Serialize)]
pub struct MeshSummary {
    pub vertices: usize,
    pub triangles: usize,
    pub bounds: Option<[[f32; 3]; 2]>,
}

impl From<&Mesh> for MeshSummary {
    fn from(mesh: &Mesh) -> Self {
        Self {
            vertices: mesh.vertices.len(),
            triangles: mesh.triangle_count(),
            bounds: mesh.bounds().map(|(lo, hi)| [lo.to_array(), hi.to_array()]),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub mode: &'static str,
    pub surface: MeshSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub walls: Option<MeshSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlines: Option<Vec<usize>>,
}

impl Report {
    pub fn for_2d(cave: &Cave2d) -> Self {
        Self {
            mode: "2d",
            surface: MeshSummary::from(&cave.surface),
            walls: Some(MeshSummary::from(&cave.walls)),
            outlines: Some(cave.outlines.iter().map(|o| o.len().saturating_sub(1)).collect()),
        }
    }

    pub fn for_3d(cave: &Cave3d) -> Self {
        Self { mode: "3d", surface: MeshSummary::from(&cave.mesh), walls: None, outlines: None }
    }

    pub fn render(&self, ui: &UiStrings) -> String {
        let s = &ui.summary;
        let mut out = format!(
            "{} ({})\n  {}: {}\n  {}: {}\n",
            s.title, self.mode, s.vertices, self.surface.vertices, s.triangles, self.surface.triangles
        );
        if let Some(walls) = &self.walls {
            out.push_str(&format!("  {}: {}\n", s.walls, walls.triangles));
        }
        if let Some(outlines) = &self.outlines {
            out.push_str(&format!("  {}: {}\n", s.outlines, outlines.len()));
        }
        if let Some([lo, hi]) = self.surface.bounds {
            out.push_str(&format!("  {}: {lo:?} .. {hi:?}\n", s.bounds));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_spans_empty_to_full() {
        let field = ScalarField::from_rows(&[vec![0, 50, 100]]).unwrap();
        assert_eq!(shade_layer(&field, 0, 100), " +@\n");
    }

    #[test]
    fn slice_reads_one_height() {
        let mut field = ScalarField::new_3d(2, 3, 4).unwrap();
        field.set(1, 2, 3, 9);
        let slice = horizontal_slice(&field, 2).unwrap();
        assert_eq!((slice.width(), slice.height()), (2, 4));
        assert_eq!(slice.get(1, 3, 0), 9);
        assert!(horizontal_slice(&field, 3).is_err());
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        let summary = MeshSummary::from(&Mesh::default());
        assert_eq!(summary.triangles, 0);
        assert!(summary.bounds.is_none());
    }
}
