//! Seeded random source for candidate generation.
//!
//! Every random draw in the pipeline goes through one [`Rng`] that the caller
//! creates from a seed, so the same seed and options always produce the same
//! pattern.

/// A fast, deterministic pseudo-random number generator.
///
/// Linear Congruential Generator with the Numerical Recipes / Knuth MMIX
/// constants; the high bits are used for floats.
///
/// # Example
/// ```
/// use circuit_fill::rng::Rng;
///
/// let mut rng = Rng::new(7);
/// let heading = rng.next_index(8) as f64 * 45.0;
/// assert!(heading < 360.0);
/// ```
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
    seed: u64,
}

impl Rng {
    /// Create a new RNG with the given seed.
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self { state: seed.wrapping_add(1), seed }
    }

    /// The seed this generator was created with.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Random f64 in [0, 1).
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Random f64 in [min, max).
    #[inline]
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Random index in [0, len). Returns 0 for an empty range.
    #[inline]
    pub fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f64() * len as f64) as usize).min(len - 1)
    }

    /// Either `1` or `-1` with equal probability.
    #[inline]
    pub fn next_sign(&mut self) -> i32 {
        if self.next_f64() < 0.5 { -1 } else { 1 }
    }

    /// `value` randomized by up to ±`fraction` of itself.
    #[inline]
    pub fn jitter(&mut self, value: f64, fraction: f64) -> f64 {
        value * self.next_range(1.0 - fraction, 1.0 + fraction)
    }
}

impl Default for Rng {
    fn default() -> Self {
        Self::new(0)
    }
}
