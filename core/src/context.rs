//! Seeded random source threaded through a generation run.

use std::ops::RangeInclusive;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Explicit generation context carrying the random source.
///
/// Every stage of the pipeline draws from the same context, in a fixed order,
/// so two runs started from the same seed produce identical manors.
#[derive(Clone, Debug)]
pub struct GenerationContext {
    rng: ChaCha8Rng,
    seed: u64,
}

impl GenerationContext {
    /// Creates a context seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed the context was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform value in `0..n`. Returns 0 when `n` is 0.
    pub fn below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Uniform value in the inclusive range. Returns the start when the range
    /// is empty.
    pub fn range(&mut self, range: RangeInclusive<i32>) -> i32 {
        if range.is_empty() {
            return *range.start();
        }
        self.rng.gen_range(range)
    }

    /// Returns true with probability `1/n`.
    pub fn one_in(&mut self, n: u32) -> bool {
        n <= 1 || self.rng.gen_range(0..n) == 0
    }

    /// Fair coin flip.
    pub fn coin(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }

    /// Chooses a random element, or `None` when the slice is empty.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            items.get(self.below(items.len()))
        }
    }
}
