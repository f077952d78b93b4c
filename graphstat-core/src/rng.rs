//! Seedable random streams and seed derivation helpers.
//!
//! Every stream is a [`SmallRng`] seeded from a SplitMix64-mixed value, so
//! neighbouring seeds produce unrelated sequences. Sub-streams are derived
//! from the parent's seed rather than its state, which keeps them
//! independent of how many values the parent has already produced.

use rand::{Rng, SeedableRng, rngs::SmallRng};

/// SplitMix64 increment (the 64-bit golden ratio).
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;
const SPLITMIX_MULT_A: u64 = 0xBF58_476D_1CE4_E5B9;
const SPLITMIX_MULT_B: u64 = 0x94D0_49BB_1331_11EB;

/// Applies one SplitMix64 finalisation round to `state`.
///
/// # Examples
/// ```
/// use graphstat_core::splitmix64;
///
/// assert_eq!(splitmix64(7), splitmix64(7));
/// assert_ne!(splitmix64(7), splitmix64(8));
/// ```
#[inline]
#[must_use]
pub const fn splitmix64(state: u64) -> u64 {
    let mut z = state.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX_MULT_A);
    z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX_MULT_B);
    z ^ (z >> 31)
}

#[inline]
const fn mix_pair(left: u64, right: u64) -> u64 {
    splitmix64(left ^ splitmix64(right.wrapping_add(GOLDEN_GAMMA)))
}

/// A deterministic pseudo-random stream.
///
/// A stream must not be shared between concurrently running trials; derive a
/// [`substream`](Self::substream) for each independent unit of work instead.
///
/// # Examples
/// ```
/// use graphstat_core::RandomStream;
///
/// let mut first = RandomStream::from_seed_pair(2, 3);
/// let mut second = RandomStream::from_seed_pair(2, 3);
/// let value = first.next_uniform();
/// assert!((0.0..1.0).contains(&value));
/// assert_eq!(value.to_bits(), second.next_uniform().to_bits());
/// ```
#[derive(Clone, Debug)]
pub struct RandomStream {
    seed: u64,
    rng: SmallRng,
}

impl RandomStream {
    /// Creates a stream from a single seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        let mixed = splitmix64(seed);
        Self {
            seed: mixed,
            rng: SmallRng::seed_from_u64(mixed),
        }
    }

    /// Creates a stream from a pair of seeds, as consumed by the R-MAT
    /// generator.
    #[must_use]
    pub fn from_seed_pair(seed1: u64, seed2: u64) -> Self {
        Self::from_seed(mix_pair(seed1, seed2))
    }

    /// Derives the `index`-th independent sub-stream of this stream.
    ///
    /// The result depends only on this stream's seed and `index`, never on
    /// values already drawn from `self`.
    #[must_use]
    pub fn substream(&self, index: u64) -> Self {
        Self::from_seed(mix_pair(self.seed, index))
    }

    /// Returns a uniformly distributed real in `[0, 1)`.
    pub fn next_uniform(&mut self) -> f64 {
        self.rng.gen_range(0.0_f64..1.0)
    }

    /// Returns a uniformly distributed integer in the inclusive range
    /// `[lo, hi]`.
    ///
    /// # Panics
    /// Panics when `lo > hi`; an inverted range is a programming error.
    pub fn next_uniform_int(&mut self, lo: u64, hi: u64) -> u64 {
        assert!(lo <= hi, "next_uniform_int called with lo={lo} > hi={hi}");
        self.rng.gen_range(lo..=hi)
    }

    /// Returns a uniformly distributed index in `[0, len)`.
    ///
    /// # Panics
    /// Panics when `len` is zero.
    pub(crate) fn next_index(&mut self, len: usize) -> usize {
        assert!(len > 0, "next_index called with an empty range");
        self.rng.gen_range(0..len)
    }
}

/// Per-trial seeds derived from the run seed.
///
/// `seed1 = splitmix64(run_seed ^ splitmix64(2k + 1))` and
/// `seed2 = splitmix64(run_seed ^ splitmix64(2k + 2))` for trial `k`. The
/// derivation depends only on `(run_seed, k)`, so trial `k` reproduces the
/// same graph regardless of how many trials the run contains.
///
/// # Examples
/// ```
/// use graphstat_core::TrialSeeds;
///
/// let first = TrialSeeds::derive(777, 0);
/// assert_eq!(first, TrialSeeds::derive(777, 0));
/// assert_ne!(first, TrialSeeds::derive(777, 1));
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TrialSeeds {
    /// First generator seed.
    pub seed1: u64,
    /// Second generator seed.
    pub seed2: u64,
}

impl TrialSeeds {
    /// Derives the seeds for trial `trial` of a run seeded with `run_seed`.
    #[must_use]
    pub const fn derive(run_seed: u64, trial: u64) -> Self {
        let base = trial.wrapping_mul(2);
        Self {
            seed1: splitmix64(run_seed ^ splitmix64(base.wrapping_add(1))),
            seed2: splitmix64(run_seed ^ splitmix64(base.wrapping_add(2))),
        }
    }

    /// Returns a fresh stream seeded from both trial seeds.
    #[must_use]
    pub fn stream(self) -> RandomStream {
        RandomStream::from_seed_pair(self.seed1, self.seed2)
    }
}
