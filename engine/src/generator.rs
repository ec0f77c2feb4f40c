use serde::Serialize;

use crate::api::Result;
use crate::config::{Cave2dConfig, Cave3dConfig, CaveConfig, VolumeFill};
use crate::cubes::MarchingCubes;
use crate::field::ScalarField;
use crate::fill;
use crate::mesh::Mesh;
use crate::outline::OutlineLoop;
use crate::squares::MarchingSquares;

/// Output of one 2D regeneration.
#[derive(Debug, Clone, Serialize)]
pub struct Cave2d {
    /// Smoothed field before the border is added.
    pub field: ScalarField,
    pub surface: Mesh,
    pub walls: Mesh,
    pub outlines: Vec<OutlineLoop>,
}

/// Output of one 3D regeneration.
#[derive(Debug, Clone, Serialize)]
pub struct Cave3d {
    pub field: ScalarField,
    pub mesh: Mesh,
}

/// Runs complete field-to-mesh pipelines. Holds no state between calls.
pub struct CaveGenerator {
    config: CaveConfig,
}

impl CaveGenerator {
    pub fn new(config: CaveConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CaveConfig {
        &self.config
    }

    /// Fill, smooth, frame and mesh a 2D cave.
    pub fn generate_2d(&self) -> Result<Cave2d> {
        let cfg: &Cave2dConfig = &self.config.cave_2d;
        let mut field = fill::generate_field_2d(cfg.width, cfg.height, &cfg.seed, cfg.use_random_seed, cfg.fill_percentage)?;
        fill::smooth(&mut field, cfg.smoothing_passes);

        let framed = field.with_border(cfg.border_size);
        let cave = MarchingSquares::with_wall_height(cfg.cell_size, cfg.wall_height)?.generate(&framed)?;

        log::info!(
            "generated 2D cave {}x{} (border {}): {} open cells, {} outlines",
            cfg.width,
            cfg.height,
            cfg.border_size,
            field.count_where(|v| v == 0),
            cave.outlines.len()
        );
        Ok(Cave2d { field, surface: cave.surface, walls: cave.walls, outlines: cave.outlines })
    }

    /// Fill and mesh a 3D cave.
    pub fn generate_3d(&self) -> Result<Cave3d> {
        let cfg: &Cave3dConfig = &self.config.cave_3d;
        let seed = cfg.seed();
        let field = match cfg.fill {
            VolumeFill::Noise => fill::generate_field_3d_with(
                cfg.width,
                cfg.height,
                cfg.depth,
                seed,
                cfg.noise_scale,
                cfg.floor_level,
                cfg.max_value,
                cfg.noise,
            )?,
            VolumeFill::Random { smoothing_passes } => {
                let mut field = fill::generate_random_field_3d(cfg.width, cfg.height, cfg.depth, seed, cfg.max_value)?;
                for _ in 0..smoothing_passes {
                    fill::smooth_3d(&mut field);
                }
                field
            }
        };

        let mesh = MarchingCubes::with_interpolation(cfg.cell_size, cfg.surface_level, cfg.interpolation)?.triangulate(&field)?;
        log::info!(
            "generated 3D cave {}x{}x{} ({:?}): {} triangles",
            cfg.width,
            cfg.height,
            cfg.depth,
            cfg.fill,
            mesh.triangle_count()
        );
        Ok(Cave3d { field, mesh })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CaveError;

    fn small() -> CaveConfig {
        let mut config = CaveConfig::default();
        config.cave_2d.width = 40;
        config.cave_2d.height = 24;
        config.cave_3d.width = 12;
        config.cave_3d.height = 12;
        config.cave_3d.depth = 12;
        config
    }

    #[test]
    fn rejects_invalid_config_up_front() {
        let mut config = small();
        config.cave_3d.surface_level = 500;
        assert!(matches!(CaveGenerator::new(config), Err(CaveError::Config(_))));
    }

    #[test]
    fn same_config_same_cave() {
        let generator = CaveGenerator::new(small()).unwrap();
        let a = generator.generate_2d().unwrap();
        let b = generator.generate_2d().unwrap();
        assert_eq!(a.field, b.field);
        assert_eq!(a.surface, b.surface);
        assert_eq!(a.walls, b.walls);
        assert_eq!(generator.generate_3d().unwrap().mesh, generator.generate_3d().unwrap().mesh);
    }

    #[test]
    fn walls_follow_outlines() {
        let cave = CaveGenerator::new(small()).unwrap().generate_2d().unwrap();
        let edges: usize = cave.outlines.iter().map(|o| o.len() - 1).sum();
        assert_eq!(cave.walls.triangle_count(), edges * 2);
        assert_eq!(cave.walls.vertices.len(), edges * 4);
        assert_eq!(cave.field.width(), 40);
    }

    #[test]
    fn random_fill_meshes_too() {
        let mut config = small();
        config.cave_3d.fill = VolumeFill::Random { smoothing_passes: 1 };
        let cave = CaveGenerator::new(config).unwrap().generate_3d().unwrap();
        assert_eq!(cave.field.depth(), 12);
        assert!(cave.mesh.triangles.iter().all(|&i| (i as usize) < cave.mesh.vertices.len()));
    }
}
