pub mod api;
pub mod config;
pub mod cubes;
pub mod field;
pub mod fill;
pub mod generator;
pub mod lattice;
pub mod mesh;
pub mod outline;
pub mod sampling;
pub mod squares;
pub mod tables;

pub use api::{CaveError, DensitySource, NoiseKind, Result, Seed};
pub use config::{Cave2dConfig, Cave3dConfig, CaveConfig, VolumeFill};
pub use cubes::{generate_mesh_3d, surface_percentage, Interpolation, MarchingCubes};
pub use field::ScalarField;
pub use fill::{generate_field_2d, generate_field_3d, smooth};
pub use generator::{Cave2d, Cave3d, CaveGenerator};
pub use mesh::Mesh;
pub use outline::OutlineLoop;
pub use squares::{generate_mesh_2d, CaveMesh2d, MarchingSquares};
