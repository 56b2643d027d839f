//! Thermal-noise power and white-Gaussian-noise sample generation.

use rand_distr::{Distribution, Normal};
use rand_mt::Mt19937GenRand64;

/// Thermal noise power `P = k_B * T * B`.
pub fn noise_temperature_to_power(boltzmann_k: f64, temperature: f64, bandwidth: f64) -> f64 {
    boltzmann_k * temperature * bandwidth
}

/// Draws one white-Gaussian-noise sample with the given standard deviation;
/// `0.0` for a non-positive `stddev` (a disabled noise source).
pub fn wgn_sample(rng: &mut Mt19937GenRand64, stddev: f64) -> f64 {
    if stddev <= f64::EPSILON {
        return 0.0;
    }
    let dist = Normal::new(0.0, stddev).expect("stddev already checked positive");
    dist.sample(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn zero_stddev_returns_zero() {
        let mut rng = Mt19937GenRand64::seed_from_u64(1);
        assert_eq!(wgn_sample(&mut rng, 0.0), 0.0);
    }

    #[test]
    fn noise_power_matches_formula() {
        let p = noise_temperature_to_power(1.3806503e-23, 290.0, 1e6);
        assert!((p - 1.3806503e-23 * 290.0 * 1e6).abs() < 1e-30);
    }

    #[test]
    fn nonzero_stddev_produces_finite_samples() {
        let mut rng = Mt19937GenRand64::seed_from_u64(2);
        for _ in 0..20 {
            assert!(wgn_sample(&mut rng, 1.0).is_finite());
        }
    }
}
