//! Seeded shuffling.
//!
//! Estimators that scale their totals assume every slice is a uniform random sample
//! (without replacement) of the rows not yet seen. Shuffling a dataset once with
//! [`shuffle_in_place`] and then cutting it into contiguous slices satisfies that.
//! The same seed always produces the same permutation.

#[derive(Clone, Copy, Debug)]
pub(crate) struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub(crate) const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    pub(crate) const fn next_u64(&mut self) -> u64 {
        let mut z = {
            self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
            self.state
        };
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform integer in `0..bound` (Lemire's multiply-shift reduction).
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn next_below(&mut self, bound: u64) -> u64 {
        ((self.next_u64() as u128 * bound as u128) >> 64) as u64
    }
}

/// Fisher-Yates shuffle driven by a seeded `SplitMix64`.
pub fn shuffle_in_place<T>(items: &mut [T], seed: u64) {
    let mut rng = SplitMix64::new(seed);
    for i in (1..items.len()).rev() {
        #[allow(clippy::cast_possible_truncation)]
        let j = rng.next_below(i as u64 + 1) as usize;
        items.swap(i, j);
    }
}
