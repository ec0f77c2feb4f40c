use crate::api::*;
use fastnoise_lite::{FastNoiseLite, NoiseType};
use noise::{NoiseFn, OpenSimplex, Perlin};

/// Seeded coherent noise behind a single `DensitySource` seam.
pub enum NoiseSampler {
    OpenSimplex(OpenSimplex),
    Perlin(Perlin),
    Fast(FastNoiseLite),
}

impl NoiseSampler {
    pub fn new(kind: NoiseKind, seed: Seed) -> Self {
        let s = seed.noise_seed();
        match kind {
            NoiseKind::OpenSimplex => NoiseSampler::OpenSimplex(OpenSimplex::new(s)),
            NoiseKind::Perlin => NoiseSampler::Perlin(Perlin::new(s)),
            NoiseKind::FastSimplex => {
                let mut f = FastNoiseLite::with_seed(s as i32);
                f.set_noise_type(Some(NoiseType::OpenSimplex2));
                // callers already divide by the noise scale
                f.set_frequency(Some(1.0));
                NoiseSampler::Fast(f)
            }
        }
    }
}

impl DensitySource for NoiseSampler {
    fn sample_2d(&self, x: f64, y: f64) -> f64 {
        match self {
            NoiseSampler::OpenSimplex(n) => n.get([x, y]),
            NoiseSampler::Perlin(n) => n.get([x, y]),
            NoiseSampler::Fast(f) => f.get_noise_2d(x as f32, y as f32) as f64,
        }
    }

    fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        match self {
            NoiseSampler::OpenSimplex(n) => n.get([x, y, z]),
            NoiseSampler::Perlin(n) => n.get([x, y, z]),
            NoiseSampler::Fast(f) => f.get_noise_3d(x as f32, y as f32, z as f32) as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_samples_identically() {
        for kind in [NoiseKind::OpenSimplex, NoiseKind::Perlin, NoiseKind::FastSimplex] {
            let a = NoiseSampler::new(kind, Seed(42));
            let b = NoiseSampler::new(kind, Seed(42));
            for i in 0..20 {
                let p = i as f64 * 0.37;
                assert_eq!(a.sample_3d(p, p * 0.5, 1.0 - p), b.sample_3d(p, p * 0.5, 1.0 - p));
                assert_eq!(a.sample_2d(p, 2.0 * p), b.sample_2d(p, 2.0 * p));
            }
        }
    }

    #[test]
    fn samples_stay_near_unit_range() {
        let n = NoiseSampler::new(NoiseKind::OpenSimplex, Seed(7));
        for i in 0..200 {
            let p = i as f64 * 0.13;
            let v = n.sample_3d(p, p * 1.7, p * 0.3);
            assert!((-1.5..=1.5).contains(&v), "sample {v} out of range");
        }
    }
}
