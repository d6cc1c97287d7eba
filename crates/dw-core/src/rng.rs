//! Seeded random numbers for catalog ordering
//!
//! The solver itself is deterministic. Variety between dungeons comes from
//! permuting the catalog before a search, so a seed fully determines a layout.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Reproducible RNG used to order catalogs and draw follow-up seeds
#[derive(Debug, Clone)]
pub struct DungeonRng {
    rng: ChaCha8Rng,
}

impl DungeonRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Draw a fresh seed for the next dungeon
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }

    /// Permute `items` in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}
