//! Draw helpers over the run's single random source.

use fastrand::Rng;

/// Uniform sample from `[low, high)`.
pub fn uniform(rng: &mut Rng, low: f64, high: f64) -> f64 {
    low + rng.f64() * (high - low)
}

/// True with probability `p`.
pub fn chance(rng: &mut Rng, p: f64) -> bool {
    rng.f64() < p
}

/// `1.0` or `-1.0` with equal probability.
pub fn random_sign(rng: &mut Rng) -> f64 {
    if rng.bool() {
        1.0
    } else {
        -1.0
    }
}
