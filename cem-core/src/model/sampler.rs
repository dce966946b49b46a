use rand::distributions::{Distribution, Normal};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

/// Draws Gaussian noise for the search distribution along with a separate stream of
/// episode seeds, so that simulator randomness never perturbs the parameter noise.
pub struct GaussianSampler {
    n: Normal,
    rng: XorShiftRng,
    seeds: XorShiftRng,
}

impl GaussianSampler {
    /// Creates a new sampler.  The episode seed stream uses `seed + 1`.
    pub fn new(seed: u64) -> Self {
        GaussianSampler {
            n: Normal::new(0.0, 1.0),
            rng: XorShiftRng::seed_from_u64(seed),
            seeds: XorShiftRng::seed_from_u64(seed.wrapping_add(1)),
        }
    }

    /// Returns a vector of `dims` independent standard normal draws, scaled by `scale`
    pub fn standard_vector(&mut self, dims: usize, scale: f32) -> Vec<f32> {
        let zero = vec![0f32; dims];
        let mut v = vec![0f32; dims];
        self.perturb(&zero, scale, &mut v);
        v
    }

    /// Writes `center + scale * N(0, I)` into `out`
    pub fn perturb(&mut self, center: &[f32], scale: f32, out: &mut [f32]) -> () {
        assert_eq!(center.len(), out.len());
        for (o, c) in out.iter_mut().zip(center.iter()) {
            *o = c + scale * self.n.sample(&mut self.rng) as f32;
        }
    }

    /// Samples `size` candidates around `center`, each with its own independent noise
    pub fn population(&mut self, center: &[f32], scale: f32, size: usize) -> Vec<Vec<f32>> {
        (0..size)
            .map(|_| {
                let mut c = vec![0f32; center.len()];
                self.perturb(center, scale, &mut c);
                c
            })
            .collect()
    }

    /// Hands out the seed for the next episode
    pub fn episode_seed(&mut self) -> u64 {
        self.seeds.gen()
    }
}
