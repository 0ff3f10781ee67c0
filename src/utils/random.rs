//! Injected randomness shared by code generation and shuffling.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform indices, safe to share between concurrent callers.
pub trait RandomSource: Send + Sync {
    /// Uniform draw in `0..upper`. Returns `0` when `upper <= 1`.
    fn next_index(&self, upper: usize) -> usize;
}

/// `StdRng` behind a mutex, seeded from entropy or a fixed seed.
pub struct SharedRng {
    rng: Mutex<StdRng>,
}

impl SharedRng {
    /// `Some(seed)` gives reproducible draws (tests, replays); `None` uses system entropy.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            rng: Mutex::new(rng),
        }
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }
}

impl fmt::Debug for SharedRng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedRng").finish_non_exhaustive()
    }
}

impl RandomSource for SharedRng {
    fn next_index(&self, upper: usize) -> usize {
        if upper <= 1 {
            return 0;
        }
        // A poisoned RNG is still a valid RNG.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(0..upper)
    }
}

/// Replays a fixed sequence of raw values, each reduced modulo `upper`.
///
/// Lets tests pin exact codes and permutations.
#[derive(Debug)]
pub struct SequenceSource {
    values: Vec<usize>,
    cursor: Mutex<usize>,
}

impl SequenceSource {
    #[must_use]
    pub const fn new(values: Vec<usize>) -> Self {
        Self {
            values,
            cursor: Mutex::new(0),
        }
    }
}

impl RandomSource for SequenceSource {
    fn next_index(&self, upper: usize) -> usize {
        if upper <= 1 || self.values.is_empty() {
            return 0;
        }
        let mut cursor = self.cursor.lock().unwrap_or_else(PoisonError::into_inner);
        let value = self.values[*cursor % self.values.len()];
        *cursor += 1;
        value % upper
    }
}

/// Fisher-Yates shuffle driven by `source`.
pub fn shuffle<T>(source: &dyn RandomSource, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = source.next_index(i + 1);
        items.swap(i, j);
    }
}
