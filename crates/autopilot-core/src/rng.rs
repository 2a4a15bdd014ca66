//! Deterministic RNG for automation choices.
//!
//! Not cryptographic. Every random pick made on behalf of a unit draws from a
//! stream derived from `(turn seed, unit, stream)`, so a replay of the same
//! world with the same seed makes the same choices.

/// SplitMix64 generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        mix64(self.state)
    }

    /// Uniform index in `0..len` (rejection sampled). `len` must be non-zero.
    pub fn gen_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "gen_index on empty range");
        let span = len as u64;
        let zone = u64::MAX - (u64::MAX % span);
        loop {
            let x = self.next_u64();
            if x < zone {
                return (x % span) as usize;
            }
        }
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.gen_index(items.len());
        items.get(index)
    }
}

pub fn mix64(mut x: u64) -> u64 {
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

pub fn derive_seed(turn_seed: u64, entity: u64, stream: u64) -> u64 {
    mix64(turn_seed ^ mix64(entity.wrapping_add(0x9E37_79B9_7F4A_7C15)) ^ mix64(stream))
}
