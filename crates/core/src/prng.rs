//! Deterministic PRNG based on the Xorshift64 algorithm.
//!
//! Seeds the white-noise input texture when the caller does not supply one.
//! Same seed always produces the same texture across all platforms (pure
//! integer arithmetic, no floating point in the core algorithm). The
//! generator is passed explicitly by `&mut` reference wherever randomness is
//! needed; there is no process-global seed state.

/// Xorshift64 deterministic PRNG. Same seed always produces the same sequence.
///
/// Uses the standard shift parameters (13, 7, 17) for good statistical
/// properties across the full 64-bit state space. Seed of 0 is automatically
/// replaced with a non-zero fallback to avoid the all-zeros fixed point.
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Fallback seed used when the caller provides 0, which is a fixed point
    /// of the xorshift algorithm.
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a new PRNG with the given seed.
    ///
    /// If `seed` is 0, uses `0x5EED_DEAD_BEEF_CAFE` as a fallback to avoid
    /// the xorshift all-zeros fixed point.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    ///
    /// Implements xorshift64 with shifts (13, 7, 17).
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Returns a uniformly distributed f64 in [0, 1).
    ///
    /// Uses the upper 53 bits of `next_u64()` divided by 2^53 for
    /// full mantissa precision.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Golden value --

    #[test]
    fn next_u64_produces_known_golden_value_for_seed_42() {
        // Golden value for xorshift64(seed=42, shifts=13,7,17).
        // If this test breaks, the PRNG algorithm changed and every noise
        // texture generated from a recorded seed is invalidated.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    // -- Seed=0 guard --

    #[test]
    fn seed_zero_does_not_produce_all_zeros() {
        let mut rng = Xorshift64::new(0);
        // If seed=0 were used directly, xorshift would return 0 forever.
        // The guard must replace it, so the first value should be non-zero.
        let first = rng.next_u64();
        assert_ne!(first, 0, "seed=0 guard failed: first value is 0");
        let second = rng.next_u64();
        let third = rng.next_u64();
        assert_ne!(second, 0);
        assert_ne!(third, 0);
    }

    // -- Determinism --

    #[test]
    fn two_instances_with_same_seed_produce_identical_sequences() {
        let mut rng_a = Xorshift64::new(42);
        let mut rng_b = Xorshift64::new(42);
        for i in 0..1000 {
            assert_eq!(
                rng_a.next_u64(),
                rng_b.next_u64(),
                "sequences diverged at index {i}"
            );
        }
    }

    // -- next_f64 range --

    #[test]
    fn next_f64_always_in_unit_interval() {
        let mut rng = Xorshift64::new(12345);
        for i in 0..10_000 {
            let v = rng.next_f64();
            assert!(
                (0.0..1.0).contains(&v),
                "next_f64() = {v} out of [0, 1) at iteration {i}"
            );
        }
    }

    // -- Property-based tests --

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_f64_in_unit_interval_for_any_seed(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_f64();
                    prop_assert!(
                        (0.0..1.0).contains(&v),
                        "next_f64() = {v} out of [0, 1) for seed {seed}"
                    );
                }
            }

            #[test]
            fn next_f64_approximate_uniformity(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                let mut buckets = [0u32; 10];
                for _ in 0..10_000 {
                    let v = rng.next_f64();
                    let idx = (v * 10.0).min(9.0) as usize;
                    buckets[idx] += 1;
                }
                // Each bucket should have at least 500 out of 10000 (expected ~1000).
                // This is a very loose bound to avoid flaky tests.
                for (i, &count) in buckets.iter().enumerate() {
                    prop_assert!(
                        count >= 500,
                        "bucket {i} has only {count} values (expected ~1000) for seed {seed}"
                    );
                }
            }
        }
    }
}
