//! Bag module - 7-bag randomizer
//!
//! Each bag holds one of every kind in a uniformly shuffled order. Kinds are
//! handed out front to back and a fresh bag is shuffled only once the
//! current one is empty, so any 7 consecutive pops aligned to a refill
//! contain every kind exactly once.
//!
//! The shuffle is seeded explicitly so a match can be replayed.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::types::ShapeKind;

const BAG_SIZE: usize = ShapeKind::ALL.len();

#[derive(Debug, Clone)]
pub struct Bag {
    pending: [ShapeKind; BAG_SIZE],
    /// Index of the next kind to pop; `BAG_SIZE` means empty
    next: usize,
    rng: Pcg32,
}

impl Bag {
    /// Create an empty bag. The first `pop` shuffles the first permutation.
    pub fn new(seed: u64) -> Self {
        Self {
            pending: ShapeKind::ALL,
            next: BAG_SIZE,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn refill(&mut self) {
        self.pending = ShapeKind::ALL;
        self.pending.shuffle(&mut self.rng);
        self.next = 0;
    }

    /// Take the next kind, refilling first if the bag is empty
    pub fn pop(&mut self) -> ShapeKind {
        if self.next >= BAG_SIZE {
            self.refill();
        }
        let kind = self.pending[self.next];
        self.next += 1;
        kind
    }

    /// The kind the next `pop` will return.
    ///
    /// When the bag is empty this shuffles a copy of the RNG, so the preview
    /// matches the next refill without disturbing it.
    pub fn peek(&self) -> ShapeKind {
        if self.next < BAG_SIZE {
            return self.pending[self.next];
        }
        let mut preview_rng = self.rng.clone();
        let mut preview = ShapeKind::ALL;
        preview.shuffle(&mut preview_rng);
        preview[0]
    }

    /// Kinds left before the next refill
    pub fn remaining(&self) -> &[ShapeKind] {
        &self.pending[self.next..]
    }
}

impl Default for Bag {
    fn default() -> Self {
        Self::new(1)
    }
}
