//! Field population: seeded random fill, cellular-automata smoothing and
//! coherent-noise density for 3D caves.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::api::*;
use crate::field::ScalarField;
use crate::sampling::NoiseSampler;

/// Smoothing passes the 2D pipeline runs after filling.
pub const SMOOTHING_PASSES: usize = 5;
/// Neighbour count above which a cell turns solid, below which it empties.
const WALL_MAJORITY: u32 = 4;

/// Binary cave field: solid border, interior solid with probability `fill_percentage`%.
pub fn generate_field_2d(
    width: usize,
    height: usize,
    seed: &str,
    use_random_seed: bool,
    fill_percentage: u32,
) -> Result<ScalarField> {
    if fill_percentage > 100 {
        return Err(CaveError::Config(format!("fill percentage must be within 0..=100, got {fill_percentage}")));
    }
    let mut field = ScalarField::new_2d(width, height)?;
    let seed = Seed::resolve(seed, use_random_seed);
    let mut rng = StdRng::seed_from_u64(seed.0);

    for x in 0..width {
        for y in 0..height {
            let solid = if x == 0 || x == width - 1 || y == 0 || y == height - 1 {
                true
            } else {
                rng.gen_range(0..100) < fill_percentage
            };
            field.set(x, y, 0, solid as u32);
        }
    }
    log::debug!("filled {width}x{height} field, {} solid cells", field.count_where(|v| v == 1));
    Ok(field)
}

/// Majority-rule cellular automaton. Out-of-bounds neighbours count as wall and
/// cells are rewritten in place as the sweep advances.
pub fn smooth(field: &mut ScalarField, passes: usize) {
    let (w, h) = (field.width(), field.height());
    for _ in 0..passes {
        for x in 0..w {
            for y in 0..h {
                let walls = surrounding_wall_count(field, x, y);
                if walls > WALL_MAJORITY {
                    field.set(x, y, 0, 1);
                } else if walls < WALL_MAJORITY {
                    field.set(x, y, 0, 0);
                }
            }
        }
    }
}

fn surrounding_wall_count(field: &ScalarField, gx: usize, gy: usize) -> u32 {
    let mut count = 0;
    for nx in gx as isize - 1..=gx as isize + 1 {
        for ny in gy as isize - 1..=gy as isize + 1 {
            if nx < 0 || ny < 0 || nx >= field.width() as isize || ny >= field.height() as isize {
                count += 1;
            } else if nx as usize != gx || ny as usize != gy {
                count += field.get(nx as usize, ny as usize, 0);
            }
        }
    }
    count
}

/// Continuous 3D density: empty outer shell, solid floor below `floor_level`,
/// coherent noise remapped to `[0, max_value]` everywhere else.
#[allow(clippy::too_many_arguments)]
pub fn generate_field_3d(
    width: usize,
    height: usize,
    depth: usize,
    seed: &str,
    use_random_seed: bool,
    noise_scale: u32,
    floor_level: usize,
    max_value: u32,
) -> Result<ScalarField> {
    generate_field_3d_with(width, height, depth, Seed::resolve(seed, use_random_seed), noise_scale, floor_level, max_value, NoiseKind::default())
}

#[allow(clippy::too_many_arguments)]
pub fn generate_field_3d_with(
    width: usize,
    height: usize,
    depth: usize,
    seed: Seed,
    noise_scale: u32,
    floor_level: usize,
    max_value: u32,
    kind: NoiseKind,
) -> Result<ScalarField> {
    check_density_params(noise_scale, max_value)?;
    let mut field = ScalarField::new_3d(width, height, depth)?;
    let noise = NoiseSampler::new(kind, seed);
    let scale = noise_scale as f64;

    for x in 0..width {
        for y in 0..height {
            for z in 0..depth {
                let interior = x > 0 && x < width - 1 && y > 0 && y < height - 1 && z > 0 && z < depth - 1;
                let value = if !interior {
                    // 最外层保持空，保证等值面闭合
                    0
                } else if y < floor_level {
                    max_value
                } else {
                    let n = noise.sample_3d(x as f64 / scale, y as f64 / scale, z as f64 / scale);
                    remap_noise(n, max_value)
                };
                field.set(x, y, z, value);
            }
        }
    }
    log::debug!(
        "filled {width}x{height}x{depth} density field ({kind:?}, scale {noise_scale}, floor {floor_level})"
    );
    Ok(field)
}

/// How a 2D preview field is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewNoise {
    /// Independent uniform values in `[0, max_value)`.
    PseudoRandom,
    /// Coherent noise remapped to `[0, max_value]`.
    Coherent(NoiseKind),
}

/// 2D density field for comparing noise types side by side.
pub fn generate_noise_field_2d(
    width: usize,
    height: usize,
    seed: Seed,
    noise_scale: u32,
    max_value: u32,
    mode: PreviewNoise,
) -> Result<ScalarField> {
    check_density_params(noise_scale, max_value)?;
    let mut field = ScalarField::new_2d(width, height)?;
    match mode {
        PreviewNoise::PseudoRandom => {
            let mut rng = StdRng::seed_from_u64(seed.0);
            for x in 0..width {
                for y in 0..height {
                    field.set(x, y, 0, rng.gen_range(0..max_value));
                }
            }
        }
        PreviewNoise::Coherent(kind) => {
            let noise = NoiseSampler::new(kind, seed);
            let scale = noise_scale as f64;
            for x in 0..width {
                for y in 0..height {
                    let n = noise.sample_2d(x as f64 / scale, y as f64 / scale);
                    field.set(x, y, 0, remap_noise(n, max_value));
                }
            }
        }
    }
    Ok(field)
}

/// Uniform random 3D density in `[0, max_value)`.
pub fn generate_random_field_3d(width: usize, height: usize, depth: usize, seed: Seed, max_value: u32) -> Result<ScalarField> {
    check_density_params(1, max_value)?;
    let mut field = ScalarField::new_3d(width, height, depth)?;
    let mut rng = StdRng::seed_from_u64(seed.0);
    for x in 0..width {
        for y in 0..height {
            for z in 0..depth {
                field.set(x, y, z, rng.gen_range(0..max_value));
            }
        }
    }
    Ok(field)
}

/// One in-place averaging pass: each point becomes the integer mean of its
/// in-bounds diagonal neighbours (those differing on all three axes).
pub fn smooth_3d(field: &mut ScalarField) {
    let (w, h, d) = (field.width() as isize, field.height() as isize, field.depth() as isize);
    for x in 0..w {
        for y in 0..h {
            for z in 0..d {
                let mut total = 0u64;
                let mut count = 0u64;
                for dx in [-1, 1] {
                    for dy in [-1, 1] {
                        for dz in [-1, 1] {
                            let (nx, ny, nz) = (x + dx, y + dy, z + dz);
                            if nx >= 0 && nx < w && ny >= 0 && ny < h && nz >= 0 && nz < d {
                                total += field.get(nx as usize, ny as usize, nz as usize) as u64;
                                count += 1;
                            }
                        }
                    }
                }
                let mean = if count > 0 { (total / count) as u32 } else { 0 };
                field.set(x as usize, y as usize, z as usize, mean);
            }
        }
    }
}

/// Maps noise from [-1, 1] onto `[0, max_value]`, truncating toward zero.
#[inline]
pub fn remap_noise(n: f64, max_value: u32) -> u32 {
    let v = ((n + 1.0) * 0.5 * max_value as f64) as i64;
    v.clamp(0, max_value as i64) as u32
}

fn check_density_params(noise_scale: u32, max_value: u32) -> Result<()> {
    if noise_scale == 0 {
        return Err(CaveError::Config("noise scale must be at least 1".into()));
    }
    if max_value == 0 {
        return Err(CaveError::Config("max value must be at least 1".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn border_holds(field: &ScalarField) -> bool {
        let (w, h) = (field.width(), field.height());
        (0..w).all(|x| field.get(x, 0, 0) == 1 && field.get(x, h - 1, 0) == 1)
            && (0..h).all(|y| field.get(0, y, 0) == 1 && field.get(w - 1, y, 0) == 1)
    }

    #[test]
    fn fill_2d_is_deterministic_per_seed() {
        let a = generate_field_2d(40, 30, "caves", false, 47).unwrap();
        let b = generate_field_2d(40, 30, "caves", false, 47).unwrap();
        assert_eq!(a, b);
        let c = generate_field_2d(40, 30, "other", false, 47).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn fill_2d_forces_solid_border() {
        let field = generate_field_2d(17, 9, "abc", false, 0).unwrap();
        assert!(border_holds(&field));
        assert_eq!(field.count_where(|v| v == 1), 2 * 17 + 2 * 9 - 4);
    }

    #[test]
    fn full_fill_is_all_solid() {
        let field = generate_field_2d(10, 10, "abc", false, 100).unwrap();
        assert_eq!(field.count_where(|v| v == 1), 100);
    }

    #[test]
    fn fill_2d_rejects_bad_input() {
        assert!(matches!(generate_field_2d(0, 10, "a", false, 40), Err(CaveError::Config(_))));
        assert!(matches!(generate_field_2d(10, 10, "a", false, 101), Err(CaveError::Config(_))));
    }

    #[test]
    fn smoothing_all_solid_is_fixed_point() {
        let mut field = ScalarField::new_2d(12, 8).unwrap();
        field.fill(1);
        let before = field.clone();
        smooth(&mut field, SMOOTHING_PASSES);
        assert_eq!(field, before);
    }

    #[test]
    fn smoothing_counts_outside_as_wall() {
        let mut field = ScalarField::new_2d(6, 6).unwrap();
        smooth(&mut field, 1);
        // corners see five out-of-bounds walls, everything else stays open
        assert_eq!(field.get(0, 0, 0), 1);
        assert_eq!(field.get(3, 3, 0), 0);
    }

    #[test]
    fn smoothing_keeps_border_and_converges() {
        let mut field = generate_field_2d(48, 32, "smooth", false, 45).unwrap();
        let mut passes = 0;
        loop {
            let before = field.clone();
            smooth(&mut field, 1);
            assert!(border_holds(&field));
            if field == before {
                break;
            }
            passes += 1;
            assert!(passes < 500, "smoothing never settled");
        }
        let converged = field.clone();
        smooth(&mut field, SMOOTHING_PASSES);
        assert_eq!(field, converged);
    }

    #[test]
    fn fill_3d_shell_floor_and_range() {
        let field = generate_field_3d(9, 8, 7, "deep", false, 3, 2, 100).unwrap();
        for x in 0..9 {
            for y in 0..8 {
                for z in 0..7 {
                    let v = field.get(x, y, z);
                    assert!(v <= 100);
                    let shell = x == 0 || x == 8 || y == 0 || y == 7 || z == 0 || z == 6;
                    if shell {
                        assert_eq!(v, 0, "shell point ({x},{y},{z})");
                    } else if y < 2 {
                        assert_eq!(v, 100, "floor point ({x},{y},{z})");
                    }
                }
            }
        }
    }

    #[test]
    fn fill_3d_is_deterministic_per_seed() {
        for kind in [NoiseKind::OpenSimplex, NoiseKind::Perlin, NoiseKind::FastSimplex] {
            let a = generate_field_3d_with(10, 10, 10, Seed(99), 4, 2, 100, kind).unwrap();
            let b = generate_field_3d_with(10, 10, 10, Seed(99), 4, 2, 100, kind).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn fill_3d_rejects_bad_input() {
        assert!(generate_field_3d(4, 4, 0, "a", false, 1, 2, 100).is_err());
        assert!(generate_field_3d(4, 4, 4, "a", false, 0, 2, 100).is_err());
        assert!(generate_field_3d(4, 4, 4, "a", false, 1, 2, 0).is_err());
    }

    #[test]
    fn remap_covers_value_range() {
        assert_eq!(remap_noise(-1.0, 100), 0);
        assert_eq!(remap_noise(0.0, 100), 50);
        assert_eq!(remap_noise(1.0, 100), 100);
        assert_eq!(remap_noise(1.3, 100), 100);
        assert_eq!(remap_noise(-1.4, 100), 0);
    }

    #[test]
    fn preview_fields_stay_in_range() {
        let random = generate_noise_field_2d(16, 16, Seed(3), 1, 32, PreviewNoise::PseudoRandom).unwrap();
        assert!(random.values().iter().all(|&v| v < 32));
        let coherent = generate_noise_field_2d(16, 16, Seed(3), 4, 32, PreviewNoise::Coherent(NoiseKind::Perlin)).unwrap();
        assert!(coherent.values().iter().all(|&v| v <= 32));
    }

    #[test]
    fn smooth_3d_flattens_uniform_field() {
        let mut field = generate_random_field_3d(5, 5, 5, Seed(11), 32).unwrap();
        assert!(field.values().iter().all(|&v| v < 32));
        field.fill(17);
        smooth_3d(&mut field);
        assert!(field.values().iter().all(|&v| v == 17));
    }
}
