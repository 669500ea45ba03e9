//! Per-worker render context.
//!
//! Every worker owns one context for the lifetime of a renderer. The
//! context carries the worker's random stream and its ray counter, and is
//! passed explicitly into every sampling routine, so reproducibility only
//! depends on the base seed and the worker index.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Derive the seed of worker `worker` from the run's base seed.
pub fn worker_seed(seed: u64, worker: usize) -> u64 {
    seed ^ (worker as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

pub struct RenderContext {
    worker: usize,
    rng: StdRng,
    rays: u64,
}

impl RenderContext {
    pub fn new(seed: u64, worker: usize) -> Self {
        Self {
            worker,
            rng: StdRng::seed_from_u64(worker_seed(seed, worker)),
            rays: 0,
        }
    }

    /// Restart the random stream from `seed` and drop pending counters.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(worker_seed(seed, self.worker));
        self.rays = 0;
    }

    /// Uniform sample in [0, 1).
    #[inline]
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    #[inline]
    pub fn count_ray(&mut self) {
        self.rays += 1;
    }

    /// Rays traced since the last call.
    pub fn take_ray_count(&mut self) -> u64 {
        std::mem::take(&mut self.rays)
    }
}
