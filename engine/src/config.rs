use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::api::{CaveError, NoiseKind, Result, Seed};
use crate::cubes::Interpolation;
use crate::fill::SMOOTHING_PASSES;
use crate::squares::{check_positive, DEFAULT_WALL_HEIGHT};

/// 2D cave generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cave2dConfig {
    pub width: usize,
    pub height: usize,
    pub seed: String,
    pub use_random_seed: bool,
    /// Chance in percent that an interior cell starts solid.
    pub fill_percentage: u32,
    pub smoothing_passes: usize,
    /// Solid frame added around the smoothed field before meshing.
    pub border_size: usize,
    pub cell_size: f32,
    pub wall_height: f32,
}

impl Default for Cave2dConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 72,
            seed: "cave".into(),
            use_random_seed: false,
            fill_percentage: 48,
            smoothing_passes: SMOOTHING_PASSES,
            border_size: 5,
            cell_size: 1.0,
            wall_height: DEFAULT_WALL_HEIGHT,
        }
    }
}

impl Cave2dConfig {
    pub fn validate(&self) -> Result<()> {
        check_dimensions(&[self.width, self.height])?;
        if self.fill_percentage > 100 {
            return Err(CaveError::Config(format!("fill_percentage must be within 0..=100, got {}", self.fill_percentage)));
        }
        check_positive("cell_size", self.cell_size)?;
        check_positive("wall_height", self.wall_height)
    }

    pub fn seed(&self) -> Seed {
        Seed::resolve(&self.seed, self.use_random_seed)
    }
}

/// How a 3D density field is populated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeFill {
    /// Coherent noise with an empty shell and a solid floor.
    #[default]
    Noise,
    /// Uniform random density averaged over diagonal neighbours.
    Random { smoothing_passes: usize },
}

/// 3D cave generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cave3dConfig {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
    pub seed: String,
    pub use_random_seed: bool,
    /// Lattice units per noise period; larger values give broader caverns.
    pub noise_scale: u32,
    /// Rows below this `y` are forced solid.
    pub floor_level: usize,
    pub max_value: u32,
    pub surface_level: u32,
    pub cell_size: f32,
    pub noise: NoiseKind,
    pub interpolation: Interpolation,
    pub fill: VolumeFill,
}

impl Default for Cave3dConfig {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
            depth: 32,
            seed: "cave".into(),
            use_random_seed: false,
            noise_scale: 10,
            floor_level: 2,
            max_value: 100,
            surface_level: 50,
            cell_size: 1.0,
            noise: NoiseKind::default(),
            interpolation: Interpolation::default(),
            fill: VolumeFill::default(),
        }
    }
}

impl Cave3dConfig {
    pub fn validate(&self) -> Result<()> {
        check_dimensions(&[self.width, self.height, self.depth])?;
        if self.noise_scale == 0 {
            return Err(CaveError::Config("noise_scale must be at least 1".into()));
        }
        if self.max_value < 2 {
            return Err(CaveError::Config(format!("max_value must be at least 2, got {}", self.max_value)));
        }
        if self.surface_level == 0 || self.surface_level >= self.max_value {
            return Err(CaveError::Config(format!(
                "surface_level must be within 1..{}, got {}",
                self.max_value, self.surface_level
            )));
        }
        check_positive("cell_size", self.cell_size)
    }

    pub fn seed(&self) -> Seed {
        Seed::resolve(&self.seed, self.use_random_seed)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveConfig {
    pub cave_2d: Cave2dConfig,
    pub cave_3d: Cave3dConfig,
}

impl CaveConfig {
    pub fn from_ron(text: &str) -> Result<Self> {
        let config: CaveConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::info!("loading cave config from {}", path.display());
        Self::from_ron(&text)
    }

    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| CaveError::Config(format!("cannot serialize config: {e}")))
    }

    pub fn validate(&self) -> Result<()> {
        self.cave_2d.validate()?;
        self.cave_3d.validate()
    }
}

fn check_dimensions(dims: &[usize]) -> Result<()> {
    if dims.iter().any(|&d| d == 0) {
        return Err(CaveError::Config(format!("dimensions must be positive, got {dims:?}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        CaveConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_ron_fills_in_defaults() {
        let config = CaveConfig::from_ron(
            r#"(
                cave_2d: (width: 40, height: 30, seed: "1234"),
                cave_3d: (noise: Perlin, fill: Random(smoothing_passes: 2), interpolation: Reference),
            )"#,
        )
        .unwrap();
        assert_eq!(config.cave_2d.width, 40);
        assert_eq!(config.cave_2d.fill_percentage, 48);
        assert_eq!(config.cave_2d.seed(), Seed(1234));
        assert_eq!(config.cave_3d.noise, NoiseKind::Perlin);
        assert_eq!(config.cave_3d.fill, VolumeFill::Random { smoothing_passes: 2 });
        assert_eq!(config.cave_3d.interpolation, Interpolation::Reference);
        assert_eq!(config.cave_3d.surface_level, 50);
    }

    #[test]
    fn surface_level_must_sit_below_max() {
        let mut cfg = Cave3dConfig::default();
        cfg.surface_level = cfg.max_value;
        assert!(matches!(cfg.validate(), Err(CaveError::Config(_))));
        cfg.surface_level = 0;
        assert!(cfg.validate().is_err());
        cfg.surface_level = cfg.max_value - 1;
        cfg.validate().unwrap();
    }

    #[test]
    fn bad_2d_values_are_rejected() {
        let cfg = Cave2dConfig { fill_percentage: 101, ..Default::default() };
        assert!(cfg.validate().is_err());
        let cfg = Cave2dConfig { width: 0, ..Default::default() };
        assert!(cfg.validate().is_err());
        let cfg = Cave2dConfig { wall_height: 0.0, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        assert!(matches!(CaveConfig::from_ron("(cave_2d: (width: \"wide\"))"), Err(CaveError::Parse(_))));
    }

    #[test]
    fn ron_output_loads_back() {
        let config = CaveConfig::default();
        let text = config.to_ron().unwrap();
        assert_eq!(CaveConfig::from_ron(&text).unwrap(), config);
    }
}
