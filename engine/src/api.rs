use serde::{Deserialize, Serialize}; use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaveError {
    #[error("invalid configuration: {0}")] Config(String),
    #[error("lookup table inconsistency: configuration {0} has no entry")] Lookup(usize),
    #[error("failed to parse config: {0}")] Parse(#[from] ron::error::SpannedError),
    #[error("failed to read config: {0}")] Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CaveError>;

/// Seed for every pseudo-random and noise stream of a generation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seed(pub u64);

impl Seed {
    /// Numeric text is taken as-is, anything else is hashed so the same text always maps to the same seed.
    pub fn from_text(text: &str) -> Self {
        match text.trim().parse::<u64>() {
            Ok(n) => Seed(n),
            Err(_) => Seed(crc32fast::hash(text.as_bytes()) as u64),
        }
    }

    pub fn from_clock() -> Self {
        let now = chrono::Utc::now();
        Seed(now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp_millis()) as u64)
    }

    /// `use_random` overrides `text` with a time-derived seed.
    pub fn resolve(text: &str, use_random: bool) -> Self {
        if use_random {
            let seed = Self::from_clock();
            log::warn!("random seed requested, ignoring configured seed {text:?} (using {})", seed.0);
            seed
        } else {
            Self::from_text(text)
        }
    }

    /// Noise backends take 32-bit seeds; fold the high half in instead of truncating it.
    pub fn noise_seed(self) -> u32 { (self.0 ^ (self.0 >> 32)) as u32 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoiseKind { #[default] OpenSimplex, Perlin, FastSimplex }

/// Coherent noise in roughly [-1, 1], sampled at lattice coordinates already divided by the noise scale.
pub trait DensitySource {
    fn sample_2d(&self, x: f64, y: f64) -> f64;
    fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64;
}
