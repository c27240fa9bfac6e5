//! # Noise Field
//!
//! Seeded 2D gradient noise in `[0, 1]`.
//!
//! A permutation of `0..256` is shuffled once from the seed and stored twice in a
//! row so lattice hashes never need to wrap. Sampling hashes the four lattice
//! corners around the point, takes the dot product of each corner's gradient with
//! the offset to the point, and blends the four values with the quintic fade curve
//! `6t⁵ - 15t⁴ + 10t³`, which has zero first and second derivatives at the lattice.

use noise::NoiseFn;

/// Deterministic 2D gradient noise.
///
/// The permutation table is read-only after construction, so one field can be
/// shared by every build worker.
#[derive(Clone, Debug)]
pub struct NoiseField {
    seed: u32,
    permutation: [u8; 512],
}

impl NoiseField {
    /// Builds the permutation table for `seed`.
    pub fn new(seed: u32) -> Self {
        let mut table: Vec<u8> = (0..=255).collect();
        fastrand::Rng::with_seed(u64::from(seed)).shuffle(&mut table);

        let mut permutation = [0u8; 512];
        for (i, slot) in permutation.iter_mut().enumerate() {
            *slot = table[i & 255];
        }

        NoiseField { seed, permutation }
    }

    /// The seed this field was built from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Samples the field at `(x, y)`. The result lies in `[0, 1]`; lattice points
    /// sample to exactly `0.5`.
    pub fn noise(&self, x: f64, y: f64) -> f64 {
        let x_floor = x.floor();
        let y_floor = y.floor();
        let xi = (x_floor as i64 & 255) as usize;
        let yi = (y_floor as i64 & 255) as usize;
        let xf = x - x_floor;
        let yf = y - y_floor;

        let u = fade(xf);
        let v = fade(yf);

        let p = &self.permutation;
        let aa = p[p[xi] as usize + yi];
        let ab = p[p[xi] as usize + yi + 1];
        let ba = p[p[xi + 1] as usize + yi];
        let bb = p[p[xi + 1] as usize + yi + 1];

        let bottom = lerp(u, grad(aa, xf, yf), grad(ba, xf - 1.0, yf));
        let top = lerp(u, grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0));
        let value = lerp(v, bottom, top);

        ((value + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

impl NoiseFn<f64, 2> for NoiseField {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.noise(point[0], point[1])
    }
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product of the hashed corner gradient with the offset `(x, y)`.
fn grad(hash: u8, x: f64, y: f64) -> f64 {
    match hash & 7 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        3 => -x - y,
        4 => x,
        5 => -x,
        6 => y,
        _ => -y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn same_seed_same_samples() {
        let a = NoiseField::new(7);
        let b = NoiseField::new(7);
        for i in 0..200 {
            let (x, y) = (i as f64 * 0.173 - 11.0, i as f64 * -0.311 + 4.0);
            assert_eq!(a.noise(x, y).to_bits(), b.noise(x, y).to_bits());
        }
    }

    #[test]
    fn different_seeds_differ_somewhere() {
        let a = NoiseField::new(1);
        let b = NoiseField::new(2);
        let differs = (0..100).any(|i| {
            let x = i as f64 * 0.37 + 0.5;
            a.noise(x, x * 0.5) != b.noise(x, x * 0.5)
        });
        assert!(differs);
    }

    #[test]
    fn samples_stay_in_unit_range() {
        let field = NoiseField::new(42);
        for i in 0..50 {
            for j in 0..50 {
                let value = field.noise(i as f64 * 0.137 - 3.0, j as f64 * 0.291 - 7.0);
                assert!((0.0..=1.0).contains(&value), "{value}");
            }
        }
    }

    #[test]
    fn lattice_points_sample_to_midpoint() {
        let field = NoiseField::new(42);
        for (x, y) in [(0.0, 0.0), (3.0, -5.0), (-128.0, 77.0), (1000.0, 1000.0)] {
            assert_abs_diff_eq!(field.noise(x, y), 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn small_steps_produce_small_changes() {
        let field = NoiseField::new(9);
        let step = 1e-3;
        for i in 0..500 {
            let x = i as f64 * 0.05 - 10.0;
            let y = i as f64 * 0.03 + 2.0;
            let delta = (field.noise(x + step, y) - field.noise(x, y)).abs();
            assert!(delta < 0.01, "jump of {delta} at ({x}, {y})");
        }
    }

    #[test]
    fn usable_through_noise_fn() {
        let field = NoiseField::new(3);
        assert_eq!(NoiseFn::get(&field, [1.25, 2.5]), field.noise(1.25, 2.5));
        assert_eq!(field.seed(), 3);
    }
}
