//! Seeded randomness for the search.
//!
//! The search owns one `GameRng` seeded from its config. Expansion draws
//! from it directly; every playout runs on its own forked stream, so an
//! iteration-bounded search replays exactly for a fixed seed.
//!
//! ```
//! use connect_mcts::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//! let mut playout = rng.fork();
//!
//! let columns = [0usize, 1, 2, 3];
//! assert!(playout.choose(&columns).is_some());
//! assert!(rng.below(4) < 4);
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Odd constant spreading successive fork seeds across the seed space.
const FORK_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// ChaCha8 stream that can split off independent playout streams.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    forks: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            forks: 0,
        }
    }

    /// Split off a new stream. The n-th fork of a given seed is always the
    /// same stream, and forking does not advance this one.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.forks += 1;
        Self::new(self.seed.wrapping_add(self.forks.wrapping_mul(FORK_STRIDE)))
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn below(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }

    /// Uniform pick from `items`, `None` when empty.
    #[must_use]
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.inner)
    }
}
